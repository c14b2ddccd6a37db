use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use msem_thumb::{CatalogRegistry, HttpFetcher, ThumbnailComposer, ThumbnailConfig};

/// Generate an MSEM match thumbnail from a JSON config.
#[derive(Parser, Debug)]
#[command(name = "msem-thumb", version)]
struct Cli {
    /// Thumbnail config JSON.
    config: PathBuf,

    /// Output path without extension; `.png` is appended.
    #[arg(short, long, default_value = "thumbnail")]
    output: PathBuf,

    /// Log at debug level unless RUST_LOG is set.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    msem_thumb::init_tracing(cli.verbose);

    let config = ThumbnailConfig::from_path(&cli.config)?;
    let mut composer = ThumbnailComposer::new(CatalogRegistry::new(), HttpFetcher::new()?);
    let img = composer.compose(&config)?;

    let out = png_path(cli.output);
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    msem_thumb::save_png(&img, &out)?;

    eprintln!("wrote {}", out.display());
    Ok(())
}

fn png_path(base: PathBuf) -> PathBuf {
    let mut name = base.into_os_string();
    name.push(".png");
    PathBuf::from(name)
}
