use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use msem_thumb::{
    CatalogRegistry, DEFAULT_URL_TEMPLATE, DownloadOutcome, HttpFetcher, download_cards,
};

/// Download card images from the MSEM website.
#[derive(Parser, Debug)]
#[command(name = "cardimgdl", version)]
struct Cli {
    /// Path to Cockatrice cards.xml.
    #[arg(short = 'c', long = "cardxml")]
    cardxml: String,

    /// Image URL template with {setcode} and {setnum} placeholders.
    #[arg(long, default_value = DEFAULT_URL_TEMPLATE)]
    url_template: String,

    /// Directory the images are written to.
    #[arg(short = 'd', long, default_value = ".")]
    out_dir: PathBuf,

    /// Card names, as they appear in Cockatrice.
    #[arg(required = true)]
    names: Vec<String>,

    /// Log at debug level unless RUST_LOG is set.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    msem_thumb::init_tracing(cli.verbose);

    std::fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("create output dir '{}'", cli.out_dir.display()))?;

    let mut catalogs = CatalogRegistry::new();
    let mut fetcher = HttpFetcher::new()?;
    let report = download_cards(
        cli.names.iter().map(String::as_str),
        &cli.cardxml,
        &cli.url_template,
        &mut catalogs,
        &mut fetcher,
        &cli.out_dir,
    )?;

    for entry in &report.entries {
        match &entry.outcome {
            DownloadOutcome::Saved(path) => println!("saved {} -> {}", entry.name, path.display()),
            DownloadOutcome::Skipped(reason) => println!("skipped {}: {reason}", entry.name),
        }
    }
    println!(
        "{} downloaded, {} failed",
        report.saved(),
        report.skipped()
    );
    Ok(())
}
