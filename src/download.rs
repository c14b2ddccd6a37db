use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    assets::fetch::ImageFetcher,
    catalog::registry::{CatalogRef, CatalogRegistry},
    foundation::error::MsemResult,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Image written to this path.
    Saved(PathBuf),
    /// Card missing from the catalog; nothing was fetched.
    Skipped(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadEntry {
    pub name: String,
    pub outcome: DownloadOutcome,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Per-name results of a batch download, in request order.
pub struct DownloadReport {
    pub entries: Vec<DownloadEntry>,
}

impl DownloadReport {
    pub fn saved(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, DownloadOutcome::Saved(_)))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.entries.len() - self.saved()
    }
}

/// Fetch the image of every card in `names` into `out_dir/<name>.jpg`.
///
/// Names missing from the catalog are logged and skipped. Any other failure (unreadable
/// catalog, HTTP error, write error) aborts the batch.
#[tracing::instrument(skip(names, catalogs, fetcher))]
pub fn download_cards<'n>(
    names: impl IntoIterator<Item = &'n str>,
    catalog_path: &str,
    url_template: &str,
    catalogs: &mut CatalogRegistry,
    fetcher: &mut dyn ImageFetcher,
    out_dir: &Path,
) -> MsemResult<DownloadReport> {
    let catalog = catalogs.load(catalog_path)?;
    let mut report = DownloadReport::default();

    for name in names {
        let url =
            match catalogs.resolve_image_url(name, CatalogRef::Loaded(&catalog), url_template) {
                Ok(url) => url,
                Err(e) if e.is_card_not_found() => {
                    tracing::warn!(card = name, "{e}");
                    report.entries.push(DownloadEntry {
                        name: name.to_string(),
                        outcome: DownloadOutcome::Skipped(e.to_string()),
                    });
                    continue;
                }
                Err(e) => return Err(e),
            };

        let bytes = fetcher.fetch(&url)?;
        let path = out_dir.join(image_file_name(name));
        std::fs::write(&path, &bytes)
            .with_context(|| format!("write card image '{}'", path.display()))?;
        tracing::info!(card = name, %url, path = %path.display(), "saved card image");

        report.entries.push(DownloadEntry {
            name: name.to_string(),
            outcome: DownloadOutcome::Saved(path),
        });
    }

    Ok(report)
}

/// `<name>.jpg`, with path separators replaced so a name can never leave the output directory.
pub fn image_file_name(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' => '_',
            c => c,
        })
        .collect();
    format!("{stem}.jpg")
}

#[cfg(test)]
#[path = "../tests/unit/download.rs"]
mod tests;
