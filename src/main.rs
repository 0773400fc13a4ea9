use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use catalog_scraper::storage::{DatasetSink, JsonStorage};
use catalog_scraper::utils::http::HttpSource;
use catalog_scraper::{scrape_term, Config};

/// Scrape the course catalog for one term into JSON files.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Term identifier, e.g. 2025-2. Defaults to the configured term.
    #[arg(long)]
    term: Option<String>,

    /// Directory the term folder is written under.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Maximum detail pages fetched at once.
    #[arg(long)]
    concurrency: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("catalog_scraper=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let mut config = Config::load()?;
    if let Some(output) = args.output {
        config.output_dir = output;
    }
    if let Some(concurrency) = args.concurrency {
        config.concurrency = concurrency;
    }
    let term_id = args.term.unwrap_or_else(|| config.default_term.clone());

    info!("Starting catalog scrape for term {}", term_id);

    let source = Arc::new(HttpSource::new(&config)?);
    let dataset = scrape_term(&config, source, &term_id).await?;

    let storage = JsonStorage::new(&config.output_dir);
    storage.persist(&dataset).await?;

    Ok(())
}
