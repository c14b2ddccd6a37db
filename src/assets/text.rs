use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::foundation::error::{MsemError, MsemResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

#[derive(Clone)]
/// Shaped text plus the font face it was shaped with.
pub struct PreparedText {
    /// Layout with every line centered on the widest one.
    pub layout: Arc<parley::Layout<TextBrushRgba8>>,
    /// Face used for glyph outlines; matches the face Parley shaped with.
    pub font: vello_cpu::peniko::FontData,
    /// Family name of the selected face.
    pub font_family: String,
}

impl std::fmt::Debug for PreparedText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedText")
            .field("layout_ptr", &Arc::as_ptr(&self.layout))
            .field("font_family", &self.font_family)
            .finish()
    }
}

impl PreparedText {
    /// Layout width in pixels.
    pub fn width(&self) -> f32 {
        self.layout.width()
    }

    /// Distance from the layout top to the first line's ascender.
    pub fn ascender_top(&self) -> f32 {
        self.layout
            .lines()
            .next()
            .map(|line| {
                let m = line.metrics();
                m.baseline - m.ascent
            })
            .unwrap_or(0.0)
    }
}

/// Stateful helper for building Parley text layouts from raw font bytes.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    registered: HashMap<PathBuf, RegisteredFaces>,
}

type RegisteredFaces = Vec<(parley::fontique::FamilyId, Vec<parley::fontique::FontInfo>)>;

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Construct a new layout engine with fresh Parley contexts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            registered: HashMap::new(),
        }
    }

    /// Shape `text` with face `face_index` of the font file at `font_path`, centering lines.
    ///
    /// `font_bytes` are the contents of `font_path`; each path is registered with Parley once.
    /// `face_index` selects a face inside a collection (`.ttc`); for single-face files it must
    /// be 0.
    pub fn layout_centered(
        &mut self,
        text: &str,
        font_path: &Path,
        font_bytes: Arc<Vec<u8>>,
        face_index: u32,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> MsemResult<PreparedText> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(MsemError::validation("text size_px must be finite and > 0"));
        }

        if !self.registered.contains_key(font_path) {
            let blob = parley::fontique::Blob::from(font_bytes.as_ref().clone());
            let families = self.font_ctx.collection.register_fonts(blob, None);
            self.registered.insert(font_path.to_path_buf(), families);
        }
        let (family_id, face) = self.registered[font_path]
            .iter()
            .find_map(|(id, faces)| {
                faces
                    .iter()
                    .find(|f| f.index() == face_index)
                    .map(|f| (*id, f.clone()))
            })
            .ok_or_else(|| {
                MsemError::validation(format!("font has no face with index {face_index}"))
            })?;

        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| MsemError::validation("registered font family has no name"))?
            .to_string();

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontWeight(face.weight()));
        builder.push_default(parley::style::StyleProperty::FontStyle(face.style()));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        let width = layout.width();
        layout.align(
            Some(width),
            parley::Alignment::Center,
            parley::AlignmentOptions::default(),
        );

        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(font_bytes.as_ref().clone()),
            face_index,
        );

        Ok(PreparedText {
            layout: Arc::new(layout),
            font,
            font_family: family_name,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/text.rs"]
mod tests;
