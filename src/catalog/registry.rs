use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;

use crate::{
    catalog::record::{CardRecord, Catalog},
    foundation::core::expand_home,
    foundation::error::{MsemError, MsemResult},
};

/// Where catalog documents are read from.
pub trait CatalogSource {
    /// Read the whole document at `path`.
    fn read_to_string(&self, path: &Path) -> MsemResult<String>;
}

#[derive(Clone, Copy, Debug, Default)]
/// Reads catalogs from the local filesystem.
pub struct FsCatalogSource;

impl CatalogSource for FsCatalogSource {
    fn read_to_string(&self, path: &Path) -> MsemResult<String> {
        std::fs::read_to_string(path)
            .with_context(|| format!("read cards.xml from '{}'", path.display()))
            .map_err(MsemError::from)
    }
}

#[derive(Clone, Copy, Debug)]
/// A catalog argument: either already parsed, or a path to load through the registry.
pub enum CatalogRef<'a> {
    /// Parsed catalog owned by the caller.
    Loaded(&'a Catalog),
    /// Path to a `cards.xml` document; `~` is expanded.
    Path(&'a str),
}

impl<'a> From<&'a Catalog> for CatalogRef<'a> {
    fn from(value: &'a Catalog) -> Self {
        Self::Loaded(value)
    }
}

impl<'a> From<&'a str> for CatalogRef<'a> {
    fn from(value: &'a str) -> Self {
        Self::Path(value)
    }
}

/// Process-wide cache of parsed catalogs keyed by resolved path.
///
/// Each distinct path is parsed at most once; entries are never evicted. Returned catalogs are
/// shared read-only.
pub struct CatalogRegistry {
    source: Box<dyn CatalogSource>,
    loaded: HashMap<PathBuf, Arc<Catalog>>,
    parse_counts: HashMap<PathBuf, u32>,
}

impl std::fmt::Debug for CatalogRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogRegistry")
            .field("loaded", &self.loaded.keys().collect::<Vec<_>>())
            .field("parse_counts", &self.parse_counts)
            .finish()
    }
}

impl Default for CatalogRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogRegistry {
    /// Registry reading from the filesystem.
    pub fn new() -> Self {
        Self::with_source(FsCatalogSource)
    }

    /// Registry reading through a custom [`CatalogSource`].
    pub fn with_source(source: impl CatalogSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            loaded: HashMap::new(),
            parse_counts: HashMap::new(),
        }
    }

    /// Load and parse the catalog at `path`, or return the cached parse.
    #[tracing::instrument(skip(self))]
    pub fn load(&mut self, path: &str) -> MsemResult<Arc<Catalog>> {
        let resolved = resolve_path(path)?;
        if let Some(catalog) = self.loaded.get(&resolved) {
            return Ok(Arc::clone(catalog));
        }

        let xml = self.source.read_to_string(&resolved)?;
        let catalog = Arc::new(Catalog::parse(&xml)?);
        *self.parse_counts.entry(resolved.clone()).or_default() += 1;
        tracing::info!(
            path = %resolved.display(),
            cards = catalog.len(),
            "loaded card catalog"
        );

        self.loaded.insert(resolved, Arc::clone(&catalog));
        Ok(catalog)
    }

    /// How many times the document at `path` has been parsed (0 or 1).
    pub fn parse_count(&self, path: &str) -> u32 {
        resolve_path(path)
            .ok()
            .and_then(|p| self.parse_counts.get(&p).copied())
            .unwrap_or(0)
    }

    /// Exact-match lookup of `name`, loading the catalog if given a path.
    pub fn find_card<'a>(
        &mut self,
        name: &str,
        catalog: impl Into<CatalogRef<'a>>,
    ) -> MsemResult<CardRecord> {
        match catalog.into() {
            CatalogRef::Loaded(c) => c.find(name).cloned(),
            CatalogRef::Path(p) => self.load(p)?.find(name).cloned(),
        }
    }

    /// Image URL for `name` built from `url_template`.
    ///
    /// See [`crate::DEFAULT_URL_TEMPLATE`] for the placeholder syntax.
    pub fn resolve_image_url<'a>(
        &mut self,
        name: &str,
        catalog: impl Into<CatalogRef<'a>>,
        url_template: &str,
    ) -> MsemResult<String> {
        let record = self.find_card(name, catalog)?;
        let url = record.image_url(url_template)?;
        tracing::debug!(card = name, %url, "resolved card image url");
        Ok(url)
    }
}

fn resolve_path(path: &str) -> MsemResult<PathBuf> {
    if path.trim().is_empty() {
        return Err(MsemError::config("path to cards.xml not given"));
    }
    Ok(expand_home(path))
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/registry.rs"]
mod tests;
