use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{MsemError, MsemResult};

#[derive(Clone, Debug)]
/// Raster image in premultiplied RGBA8 form, ready to be painted.
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Encoded image flavour, chosen from the file extension or response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageKind {
    /// Anything the `image` crate can sniff: PNG, JPEG, WebP, GIF...
    Raster,
    /// SVG document, rasterised at the fit size.
    Svg,
}

impl ImageKind {
    /// Classify by extension; `.svg` is vector, everything else is raster.
    pub fn from_path(path: &std::path::Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => Self::Svg,
            _ => Self::Raster,
        }
    }
}

/// Size of an image scaled to fit inside `bounds` while keeping its aspect ratio.
///
/// Images smaller than the box are scaled up. The side that does not touch the box is rounded
/// to the nearest pixel.
pub fn contain_size(width: u32, height: u32, bounds: (u32, u32)) -> (u32, u32) {
    let (bw, bh) = bounds;
    if width == 0 || height == 0 {
        return (0, 0);
    }
    let im_ratio = f64::from(width) / f64::from(height);
    let box_ratio = f64::from(bw) / f64::from(bh);

    if (im_ratio - box_ratio).abs() < f64::EPSILON {
        (bw, bh)
    } else if im_ratio > box_ratio {
        let h = (f64::from(height) / f64::from(width) * f64::from(bw)).round() as u32;
        (bw, h.max(1))
    } else {
        let w = (f64::from(width) / f64::from(height) * f64::from(bh)).round() as u32;
        (w.max(1), bh)
    }
}

/// Decode encoded bytes and resize them to fit inside `bounds`.
pub fn decode_contained(
    bytes: &[u8],
    kind: ImageKind,
    bounds: (u32, u32),
) -> MsemResult<PreparedImage> {
    match kind {
        ImageKind::Raster => {
            let img = image::load_from_memory(bytes).context("decode image from memory")?;
            Ok(contain_raster(&img, bounds))
        }
        ImageKind::Svg => {
            let tree = parse_svg(bytes)?;
            rasterize_svg_contained(&tree, bounds)
        }
    }
}

/// Resize a decoded raster to fit `bounds` with bicubic filtering.
pub fn contain_raster(img: &image::DynamicImage, bounds: (u32, u32)) -> PreparedImage {
    let (w, h) = contain_size(img.width(), img.height(), bounds);
    let rgba = if (w, h) == (img.width(), img.height()) {
        img.to_rgba8()
    } else {
        image::imageops::resize(
            &img.to_rgba8(),
            w,
            h,
            image::imageops::FilterType::CatmullRom,
        )
    };
    premultiplied(rgba)
}

/// Convert straight RGBA8 into a [`PreparedImage`].
pub fn premultiplied(rgba: image::RgbaImage) -> PreparedImage {
    let (width, height) = rgba.dimensions();
    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);
    PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    }
}

/// Parse SVG bytes into a `usvg` tree.
pub fn parse_svg(bytes: &[u8]) -> MsemResult<usvg::Tree> {
    let mut opts = usvg::Options::default();
    opts.fontdb_mut().load_system_fonts();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;
    Ok(tree)
}

/// Rasterise `tree` directly at its contained size.
pub fn rasterize_svg_contained(
    tree: &usvg::Tree,
    bounds: (u32, u32),
) -> MsemResult<PreparedImage> {
    fn to_px(v: f32) -> MsemResult<u32> {
        if !v.is_finite() || v <= 0.0 {
            return Err(MsemError::validation("svg has invalid width/height"));
        }
        Ok((v.ceil() as u32).max(1))
    }

    let size = tree.size();
    let (w, h) = contain_size(to_px(size.width())?, to_px(size.height())?, bounds);

    let mut pixmap = resvg::tiny_skia::Pixmap::new(w, h)
        .ok_or_else(|| MsemError::validation("failed to allocate svg pixmap"))?;
    let sx = (w as f32) / size.width();
    let sy = (h as f32) / size.height();
    resvg::render(
        tree,
        resvg::tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );

    // tiny-skia pixmaps are already premultiplied RGBA8.
    Ok(PreparedImage {
        width: w,
        height: h,
        rgba8_premul: Arc::new(pixmap.take()),
    })
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
