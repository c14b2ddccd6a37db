use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;

use crate::{
    assets::decode::{self, ImageKind, PreparedImage},
    assets::fetch::ImageFetcher,
    assets::font::FontLocator,
    assets::text::{PreparedText, TextBrushRgba8, TextLayoutEngine},
    compose::layout::{self, FontRole},
    compose::plan::{ImageLayer, ImageSource, LayerOp, TextLayer},
    config::ThumbnailConfig,
    foundation::core::{Affine, Canvas, Rgba8, Vec2},
    foundation::error::{MsemError, MsemResult},
};

const TEXT_FILL: TextBrushRgba8 = TextBrushRgba8 {
    r: 255,
    g: 255,
    b: 255,
    a: 255,
};
const TEXT_OUTLINE: Rgba8 = Rgba8::BLACK;
const BACKGROUND: Rgba8 = Rgba8::BLACK;

#[derive(Clone, Debug)]
/// Font files for each text role, located lazily.
pub struct FontSet {
    title: String,
    deckname: String,
    locator: FontLocator,
}

impl FontSet {
    pub fn new(title: impl Into<String>, deckname: impl Into<String>, locator: FontLocator) -> Self {
        Self {
            title: title.into(),
            deckname: deckname.into(),
            locator,
        }
    }

    /// Fonts named by `config`, falling back to the stock faces, searched next to the config.
    pub fn from_config(config: &ThumbnailConfig) -> Self {
        Self::new(
            config
                .title_font
                .as_deref()
                .unwrap_or(layout::DEFAULT_TITLE_FONT),
            config
                .deckname_font
                .as_deref()
                .unwrap_or(layout::DEFAULT_DECKNAME_FONT),
            FontLocator::new(config.base_dir.as_deref()),
        )
    }

    fn name_for(&self, role: FontRole) -> &str {
        match role {
            FontRole::Title => &self.title,
            FontRole::Deckname => &self.deckname,
        }
    }
}

/// Paints a layer plan onto an opaque canvas with `vello_cpu`.
///
/// Layers are drawn strictly in plan order with source-over blending, so later layers cover
/// earlier ones.
pub struct CpuPainter {
    canvas: Canvas,
    fonts: FontSet,
    font_cache: HashMap<FontRole, (PathBuf, Arc<Vec<u8>>)>,
    text_engine: TextLayoutEngine,
}

impl std::fmt::Debug for CpuPainter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuPainter")
            .field("canvas", &self.canvas)
            .field("fonts", &self.fonts)
            .finish()
    }
}

impl CpuPainter {
    pub fn new(canvas: Canvas, fonts: FontSet) -> MsemResult<Self> {
        let canvas = Canvas::new(canvas.width, canvas.height)?;
        Ok(Self {
            canvas,
            fonts,
            font_cache: HashMap::new(),
            text_engine: TextLayoutEngine::new(),
        })
    }

    /// Paint `layers` and return the opaque RGB result.
    #[tracing::instrument(skip_all, fields(layers = layers.len()))]
    pub fn paint(
        &mut self,
        layers: &[LayerOp],
        fetcher: &mut dyn ImageFetcher,
    ) -> MsemResult<image::RgbImage> {
        let (w16, h16) = self.canvas_u16()?;
        let mut ctx = vello_cpu::RenderContext::new(w16, h16);

        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(color_to_cpu(BACKGROUND));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(self.canvas.width),
            f64::from(self.canvas.height),
        ));

        for layer in layers {
            match layer {
                LayerOp::Image(l) => self.draw_image(&mut ctx, l, fetcher)?,
                LayerOp::Text(l) => self.draw_text(&mut ctx, l)?,
            }
        }

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
        ctx.render_to_pixmap(&mut pixmap);

        readback_rgb8(&pixmap, self.canvas)
    }

    fn canvas_u16(&self) -> MsemResult<(u16, u16)> {
        let w: u16 = self
            .canvas
            .width
            .try_into()
            .map_err(|_| MsemError::validation("canvas width exceeds u16"))?;
        let h: u16 = self
            .canvas
            .height
            .try_into()
            .map_err(|_| MsemError::validation("canvas height exceeds u16"))?;
        Ok((w, h))
    }

    fn draw_image(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        layer: &ImageLayer,
        fetcher: &mut dyn ImageFetcher,
    ) -> MsemResult<()> {
        let prepared = load_image(&layer.source, layer.slot.bounds, fetcher)?;
        if prepared.width == 0 || prepared.height == 0 {
            return Ok(());
        }
        tracing::debug!(
            kind = ?layer.kind,
            width = prepared.width,
            height = prepared.height,
            "draw image layer"
        );

        let pixmap = image_premul_bytes_to_pixmap(
            prepared.rgba8_premul.as_slice(),
            prepared.width,
            prepared.height,
        )?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };

        let transform = layout::slot_transform(&layer.slot, prepared.width, prepared.height);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(affine_to_cpu(transform));
        ctx.set_paint(paint);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(prepared.width),
            f64::from(prepared.height),
        ));
        Ok(())
    }

    fn draw_text(&mut self, ctx: &mut vello_cpu::RenderContext, layer: &TextLayer) -> MsemResult<()> {
        if layer.text.is_empty() {
            return Ok(());
        }
        let slot = layer.slot;
        let (font_path, font_bytes) = self.font_for(slot.font)?;
        let text = self.text_engine.layout_centered(
            &layer.text,
            &font_path,
            font_bytes,
            slot.face_index,
            slot.size_px,
            TEXT_FILL,
        )?;
        tracing::debug!(kind = ?layer.kind, family = %text.font_family, "draw text layer");

        let origin = text_origin(&text, slot.anchor.x, slot.anchor.y);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(affine_to_cpu(Affine::translate(origin)));

        for line in text.layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let font_size = run.run().font_size();
                // Positioned glyphs carry the run offset and line baseline.
                let glyphs = || {
                    run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    })
                };

                // The outline straddles the glyph edge; the fill then covers its inner half.
                if slot.stroke_width > 0.0 {
                    ctx.set_stroke(vello_cpu::kurbo::Stroke::new(
                        f64::from(slot.stroke_width) * 2.0,
                    ));
                    ctx.set_paint(color_to_cpu(TEXT_OUTLINE));
                    ctx.glyph_run(&text.font)
                        .font_size(font_size)
                        .stroke_glyphs(glyphs());
                }

                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                ctx.glyph_run(&text.font)
                    .font_size(font_size)
                    .fill_glyphs(glyphs());
            }
        }
        Ok(())
    }

    fn font_for(&mut self, role: FontRole) -> MsemResult<(PathBuf, Arc<Vec<u8>>)> {
        if let Some((path, bytes)) = self.font_cache.get(&role) {
            return Ok((path.clone(), Arc::clone(bytes)));
        }
        let path = self.fonts.locator.locate(self.fonts.name_for(role))?;
        let bytes = std::fs::read(&path)
            .with_context(|| format!("read font '{}'", path.display()))?;
        tracing::debug!(?role, path = %path.display(), "loaded font");

        let bytes = Arc::new(bytes);
        self.font_cache
            .insert(role, (path.clone(), Arc::clone(&bytes)));
        Ok((path, bytes))
    }
}

/// Top-left of a text layout whose first line is centered on `x` with its ascender on `y`.
pub fn text_origin(text: &PreparedText, x: f64, y: f64) -> Vec2 {
    Vec2::new(
        x - f64::from(text.width()) / 2.0,
        y - f64::from(text.ascender_top()),
    )
}

fn load_image(
    source: &ImageSource,
    bounds: (u32, u32),
    fetcher: &mut dyn ImageFetcher,
) -> MsemResult<PreparedImage> {
    match source {
        ImageSource::File(path) => {
            let bytes = read_file(path)?;
            decode::decode_contained(&bytes, ImageKind::from_path(path), bounds)
                .with_context(|| format!("decode image '{}'", path.display()))
                .map_err(MsemError::from)
        }
        ImageSource::Url(url) => {
            let bytes = fetcher.fetch(url)?;
            decode::decode_contained(&bytes, ImageKind::Raster, bounds)
                .with_context(|| format!("decode card image from '{url}'"))
                .map_err(MsemError::from)
        }
    }
}

fn read_file(path: &Path) -> MsemResult<Vec<u8>> {
    std::fs::read(path)
        .with_context(|| format!("read image from '{}'", path.display()))
        .map_err(MsemError::from)
}

fn readback_rgb8(pixmap: &vello_cpu::Pixmap, canvas: Canvas) -> MsemResult<image::RgbImage> {
    let data = pixmap.data_as_u8_slice();
    let mut rgb = Vec::with_capacity(canvas.width as usize * canvas.height as usize * 3);
    for px in data.chunks_exact(4) {
        let [r, g, b, a] = [px[0], px[1], px[2], px[3]];
        if a == 255 || a == 0 {
            rgb.extend_from_slice(&[r, g, b]);
        } else {
            let unpremul = |c: u8| ((u16::from(c) * 255 + u16::from(a) / 2) / u16::from(a)) as u8;
            rgb.extend_from_slice(&[unpremul(r), unpremul(g), unpremul(b)]);
        }
    }
    image::RgbImage::from_raw(canvas.width, canvas.height, rgb)
        .ok_or_else(|| MsemError::validation("canvas readback size mismatch"))
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> MsemResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| MsemError::validation("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| MsemError::validation("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(MsemError::validation("prepared image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
