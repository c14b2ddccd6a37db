//! msem-thumb builds match thumbnails for MSEM (Magic Set Editor Modern) videos.
//!
//! Two jobs share this crate:
//!
//! - Card lookup: find a card in a Cockatrice `cards.xml` catalog and derive the URL of its scan
//!   ([`CatalogRegistry`], [`download_cards`]).
//! - Thumbnail composition: turn a [`ThumbnailConfig`] into a 1920×1080 image by layering a
//!   logo, profile pictures, rotated card scans and text labels ([`ThumbnailComposer`]).
//!
//! Composition is split into a pure planning step ([`plan_layers`]) and a CPU painter
//! ([`CpuPainter`]), with card downloads behind the [`ImageFetcher`] trait.
#![forbid(unsafe_code)]

mod assets;
mod catalog;
mod foundation;

pub(crate) mod compose;
pub(crate) mod config;
pub(crate) mod download;
pub(crate) mod logging;
pub(crate) mod render;

pub use crate::foundation::core::{Affine, Canvas, Point, Rgba8, Vec2, expand_home};
pub use crate::foundation::error::{MsemError, MsemResult};

pub use crate::assets::decode::{ImageKind, PreparedImage, contain_size, decode_contained};
pub use crate::assets::fetch::{HttpFetcher, ImageFetcher, MemoryFetcher};
pub use crate::assets::font::FontLocator;
pub use crate::assets::text::{PreparedText, TextBrushRgba8, TextLayoutEngine};
pub use crate::catalog::record::{CardRecord, Catalog, DEFAULT_URL_TEMPLATE, SetEntry};
pub use crate::catalog::registry::{CatalogRef, CatalogRegistry, CatalogSource, FsCatalogSource};
pub use crate::compose::layout;
pub use crate::compose::plan::{ImageLayer, ImageSource, LayerKind, LayerOp, TextLayer, plan_layers};
pub use crate::compose::{ThumbnailComposer, save_png};
pub use crate::config::{SideConfig, ThumbnailConfig};
pub use crate::download::{
    DownloadEntry, DownloadOutcome, DownloadReport, download_cards, image_file_name,
};
pub use crate::logging::init_tracing;
pub use crate::render::cpu::{CpuPainter, FontSet};
