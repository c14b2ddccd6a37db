pub mod layout;
pub(crate) mod plan;

use std::path::Path;

use anyhow::Context;

use crate::{
    assets::fetch::ImageFetcher,
    catalog::registry::CatalogRegistry,
    config::ThumbnailConfig,
    foundation::error::MsemResult,
    render::cpu::{CpuPainter, FontSet},
};

/// Builds thumbnails from [`ThumbnailConfig`] documents.
///
/// Owns the catalog cache and the card fetcher, so composing several thumbnails in one run
/// parses each `cards.xml` once.
pub struct ThumbnailComposer {
    catalogs: CatalogRegistry,
    fetcher: Box<dyn ImageFetcher>,
}

impl std::fmt::Debug for ThumbnailComposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThumbnailComposer")
            .field("catalogs", &self.catalogs)
            .finish_non_exhaustive()
    }
}

impl ThumbnailComposer {
    pub fn new(catalogs: CatalogRegistry, fetcher: impl ImageFetcher + 'static) -> Self {
        Self {
            catalogs,
            fetcher: Box::new(fetcher),
        }
    }

    pub fn catalogs(&self) -> &CatalogRegistry {
        &self.catalogs
    }

    /// Plan and paint one thumbnail.
    ///
    /// Card lookups happen before anything is fetched or drawn, so an unknown card fails fast.
    #[tracing::instrument(skip_all, fields(title = config.title.as_deref().unwrap_or("")))]
    pub fn compose(&mut self, config: &ThumbnailConfig) -> MsemResult<image::RgbImage> {
        let layers = plan::plan_layers(config, &mut self.catalogs)?;
        let mut painter = CpuPainter::new(layout::CANVAS, FontSet::from_config(config))?;
        let img = painter.paint(&layers, self.fetcher.as_mut())?;
        tracing::info!(layers = layers.len(), "composed thumbnail");
        Ok(img)
    }
}

/// Write `img` as PNG to `path`.
pub fn save_png(img: &image::RgbImage, path: &Path) -> MsemResult<()> {
    img.save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/compose.rs"]
mod tests;
