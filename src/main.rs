//! # Habr Scraper
//!
//! Harvests article metadata from habr.com search results and saves it as
//! CSV or JSON.
//!
//! ## Features
//!
//! - Walks search result pages for a query, period and page limit
//! - Extracts title, URL, author and snippet with layout fallbacks
//! - Drops repeated titles across pages
//! - Optionally downloads every article and extracts its body text
//! - Writes a BOM-prefixed CSV file or a JSON report
//!
//! ## Usage
//!
//! ```sh
//! habr_scraper -q rust -p 2 --period week -o rust.csv
//! ```
//!
//! Without `--query` the scraper asks for its parameters interactively.

use clap::Parser;
use std::error::Error;
use std::io;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod config;
mod models;
mod outputs;
mod prompt;
mod scrapers;
mod utils;

use cli::Cli;
use config::ScraperConfig;
use models::{ArticleRecord, SearchParams};
use outputs::{OutputFormat, console, csv, json};
use prompt::{Prompter, SaveChoice, resolve_filename};
use scrapers::search::SearchHarvester;
use utils::ensure_parent_dir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(io::stderr)
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = match args.config.as_deref() {
        Some(path) => ScraperConfig::load(path).await?,
        None => ScraperConfig::default(),
    };
    let config = args.apply_overrides(config);

    let prompter = Prompter::new();

    let params = match args.search_params() {
        Some(params) if !args.needs_prompt() => params,
        _ => prompter.search_params()?,
    };

    let harvester = SearchHarvester::new(config)?;

    info!(query = %params.query, "Looking for articles | start");
    let articles = harvester.harvest(&params).await;
    info!(query = %params.query, count = articles.len(), "Looking for articles | done");

    if articles.is_empty() {
        warn!("No articles found and nothing to save");
        return Ok(());
    }

    console::print_articles(&mut io::stdout().lock(), &articles)?;

    let target = match args.output.clone() {
        Some(filename) => Some(filename),
        None if args.needs_prompt() => match prompter.save_choice(args.format)? {
            SaveChoice::Save { filename } => Some(filename),
            SaveChoice::Skip => None,
        },
        None => None,
    };

    match target {
        Some(filename) => save(&filename, args.format, &params, articles).await,
        None => info!("Results were not saved; see the listing above"),
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, secs = elapsed.as_secs(), "Execution complete");
    Ok(())
}

/// Save results, reporting failures instead of aborting the run.
#[instrument(level = "info", skip(params, articles), fields(count = articles.len()))]
async fn save(filename: &str, format: OutputFormat, params: &SearchParams, articles: Vec<ArticleRecord>) {
    let filename = resolve_filename(filename, format);
    let filename = filename.as_str();
    info!("Saving results | start");

    let result = match ensure_parent_dir(filename).await {
        Err(e) => Err(e),
        Ok(()) => match format {
            OutputFormat::Csv => {
                csv::write_articles(filename, &articles, params.fetch_full_text).await
            }
            OutputFormat::Json => {
                json::write_report(filename, &json::build_report(params, articles)).await
            }
        },
    };

    match result {
        Ok(()) => info!(path = %filename, "Saving results | done"),
        Err(e) => error!(path = %filename, error = %e, "Saving results | failed"),
    }
}
