//! Meli-Scout main entry point
//!
//! This is the command-line interface for the Meli-Scout marketplace scraper.

use anyhow::Context;
use clap::Parser;
use meli_scout::browser::{BrowserSession, ChromeSession, HttpSession};
use meli_scout::config::{load_config_or_default, Config, Engine};
use meli_scout::crawler::Coordinator;
use meli_scout::output::{
    csv_slug, print_csv_table, print_image_urls, print_record, print_statistics, CsvExporter,
    RecordExporter,
};
use meli_scout::url::with_default_scheme;
use meli_scout::{classify_url, UrlKind};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Meli-Scout: a polite marketplace product scraper
///
/// Give it a product URL to scrape one product, or a listing URL to walk
/// the search results and scrape up to --max-items products.
#[derive(Parser, Debug)]
#[command(name = "meli-scout")]
#[command(version)]
#[command(about = "A polite marketplace product scraper", long_about = None)]
struct Cli {
    /// Marketplace URL to scrape; the page type is detected from its prefix
    #[arg(long, default_value = "")]
    url: String,

    /// Max products to scrape from a listing URL
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    max_items: Option<u32>,

    /// Only print the image URLs of a product URL
    #[arg(long)]
    only_images: bool,

    /// Write the scraped listing products to a CSV file
    #[arg(long)]
    create_csv: bool,

    /// Print crawl statistics after a listing run
    #[arg(long)]
    stats: bool,

    /// Path to an optional TOML configuration file
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Page engine to use
    #[arg(long, value_enum)]
    engine: Option<Engine>,

    /// Show the browser window
    #[arg(long)]
    headed: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = load_config_or_default(cli.config.as_deref()).with_context(|| {
        match &cli.config {
            Some(path) => format!("Failed to load configuration from {}", path.display()),
            None => "Invalid built-in configuration".to_string(),
        }
    })?;
    apply_overrides(&mut config, &cli);

    let url = with_default_scheme(&cli.url);
    let kind = classify_url(&url, &config.crawl);
    if url.is_empty() {
        eprintln!("URL is empty, please provide a marketplace URL with --url");
        return Ok(());
    }
    if kind == UrlKind::Unrecognized {
        eprintln!("Not a recognized marketplace URL: {}", url);
        return Ok(());
    }
    tracing::info!("Scraping {:?} URL {}", kind, url);

    match config.browser.engine {
        Engine::Chrome => {
            let session = ChromeSession::launch(&config.browser)
                .await
                .context("Could not start the browser")?;
            run(session, config, &cli, &url, kind).await
        }
        Engine::Http => {
            let session = HttpSession::new(&config.browser).context("Could not start the HTTP engine")?;
            run(session, config, &cli, &url, kind).await
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("meli_scout=info,warn"),
            1 => EnvFilter::new("meli_scout=debug,info"),
            2 => EnvFilter::new("meli_scout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Applies command-line overrides on top of the loaded configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(max_items) = cli.max_items {
        config.crawl.max_items = max_items as usize;
    }
    if let Some(engine) = cli.engine {
        config.browser.engine = engine;
    }
    if cli.headed {
        config.browser.headless = false;
    }
}

/// Runs one scrape on an open session and always shuts the session down
async fn run<S: BrowserSession>(
    session: S,
    config: Config,
    cli: &Cli,
    url: &str,
    kind: UrlKind,
) -> anyhow::Result<()> {
    let coordinator = Coordinator::new(session, config);

    let result = match kind {
        UrlKind::Product if cli.only_images => handle_images(&coordinator, url).await,
        UrlKind::Product => handle_product(&coordinator, url).await,
        UrlKind::Listing => {
            if cli.only_images {
                tracing::warn!("--only-images applies to product URLs only, ignoring it");
            }
            handle_listing(&coordinator, url, cli).await
        }
        UrlKind::Unrecognized => Ok(()),
    };

    if let Err(e) = coordinator.shutdown().await {
        tracing::warn!("Browser shutdown failed: {}", e);
    }

    result
}

/// Handles a product URL in images-only mode
async fn handle_images<S: BrowserSession>(
    coordinator: &Coordinator<S>,
    url: &str,
) -> anyhow::Result<()> {
    let images = coordinator
        .scrape_product_images(url)
        .await
        .with_context(|| format!("Failed to load {}", url))?;
    print_image_urls(&images);
    Ok(())
}

/// Handles a single product URL
async fn handle_product<S: BrowserSession>(
    coordinator: &Coordinator<S>,
    url: &str,
) -> anyhow::Result<()> {
    let record = coordinator
        .scrape_product(url)
        .await
        .with_context(|| format!("No product could be extracted from {}", url))?;
    print_record(&record)?;
    Ok(())
}

/// Handles a listing URL: paginate, extract, print and optionally export
async fn handle_listing<S: BrowserSession>(
    coordinator: &Coordinator<S>,
    url: &str,
    cli: &Cli,
) -> anyhow::Result<()> {
    let config = coordinator.config();
    let report = coordinator
        .scrape_listing(url, config.crawl.max_items)
        .await?;

    for record in &report.records {
        print_record(record)?;
    }
    println!("Total products scraped: {}", report.records.len());

    if cli.create_csv {
        let exporter = CsvExporter::from_config(&config.output);
        let path = exporter
            .export(&report.records, &csv_slug(url))
            .with_context(|| format!("Failed to write CSV into {}", exporter.dir().display()))?;
        println!("CSV written to {}", path.display());

        if config.output.print_table {
            print_csv_table(&path)?;
        }
    }

    if cli.stats {
        print_statistics(&report.stats);
    }

    Ok(())
}
