use std::path::PathBuf;

pub use kurbo::{Affine, Point, Size, Vec2};

use crate::foundation::error::{MsemError, MsemResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    /// 1080p video thumbnail.
    pub const THUMBNAIL: Canvas = Canvas {
        width: 1920,
        height: 1080,
    };

    pub fn new(width: u32, height: u32) -> MsemResult<Self> {
        if width == 0 || height == 0 {
            return Err(MsemError::validation("canvas dimensions must be > 0"));
        }
        if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
            return Err(MsemError::validation("canvas dimensions exceed u16"));
        }
        Ok(Self { width, height })
    }

    pub fn center_x(self) -> f64 {
        f64::from(self.width) / 2.0
    }

    pub fn size(self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }
}

/// Straight (non-premultiplied) RGBA8.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const BLACK: Rgba8 = Rgba8::opaque(0, 0, 0);
    pub const WHITE: Rgba8 = Rgba8::opaque(255, 255, 255);

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Expand a leading `~` to the current user's home directory.
///
/// Paths without a leading `~`, and `~user` forms, are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    let rest = if path == "~" {
        Some("")
    } else {
        path.strip_prefix("~/")
            .or_else(|| path.strip_prefix("~\\"))
    };

    match (rest, directories::BaseDirs::new()) {
        (Some(rest), Some(dirs)) if rest.is_empty() => dirs.home_dir().to_path_buf(),
        (Some(rest), Some(dirs)) => dirs.home_dir().join(rest),
        _ => PathBuf::from(path),
    }
}
