//! Dining Crawler CLI
//!
//! Local execution entry point for the scrape and import pipeline.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dining_crawler::{
    error::{AppError, Result},
    models::{CanonicalRecord, Config},
    pipeline,
    services::Fetcher,
    storage::{LocalStore, local::EXPORT_FILE},
    utils::time::{SystemClock, TokioPacer},
};

/// Campus dining locations crawler
#[derive(Parser, Debug)]
#[command(
    name = "dining-crawler",
    version,
    about = "Campus dining location scraper and importer"
)]
struct Cli {
    /// Path to storage directory containing config and output files
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape all source pages and assemble location records
    Scrape {
        /// Write the export artifacts but skip the store import
        #[arg(long)]
        no_import: bool,
    },

    /// Import a previously exported record array into the store
    Import {
        /// Path to the record array (default: {storage_dir}/dining-locations.json)
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Validate configuration files
    Validate,

    /// Show current export/store info
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("Dining crawler starting...");

    // Load configuration
    let config_path = cli.storage_dir.join("config.toml");
    let config = Config::load_or_default(&config_path);

    let store = LocalStore::new(&cli.storage_dir, config.store.clone());

    match cli.command {
        Command::Scrape { no_import } => {
            config.validate()?;

            let fetcher = Fetcher::new(&config.crawler)?;
            let outcome =
                pipeline::run_scrape(&config, &fetcher, &TokioPacer, &SystemClock).await?;

            store.write_export(&outcome.records, &outcome.summary).await?;
            log::info!(
                "Exported {} records from {} venues to {}",
                outcome.records.len(),
                outcome.venue_count,
                cli.storage_dir.join(EXPORT_FILE).display()
            );

            if no_import {
                log::info!("Skipping store import (--no-import)");
            } else {
                pipeline::run_import(&store, &outcome.records).await?;
            }

            log::info!(
                "Scrape complete: {} concepts, {} detail failures, {} with hours",
                outcome.detail_total,
                outcome.detail_failures,
                outcome.hours_matched
            );
        }

        Command::Import { file } => {
            let records: Vec<CanonicalRecord> = match file {
                Some(path) => {
                    if !path.exists() {
                        log::error!("Record file not found at {}", path.display());
                        return Err(AppError::config("Record file not found"));
                    }
                    let content = std::fs::read_to_string(&path)?;
                    serde_json::from_str(&content)?
                }
                None => store.load_export().await?,
            };

            log::info!("Loaded {} records", records.len());
            let report = pipeline::run_import(&store, &records).await?;

            if report.failed_batches > 0 {
                log::warn!("{} sub-batches failed to commit", report.failed_batches);
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK (sources, geo tables, and tag keywords)");

            log::info!("All validations passed!");
        }

        Command::Info => {
            log::info!("Storage directory: {}", cli.storage_dir.display());

            match store.load_summary().await? {
                Some(summary) => {
                    log::info!("Last scrape: {}", summary.scrape_date);
                    log::info!(
                        "{} locations across {} buildings",
                        summary.total_locations,
                        summary.buildings.len()
                    );
                }
                None => log::info!("No scrape summary found yet."),
            }

            let export_path = cli.storage_dir.join(EXPORT_FILE);
            log::info!(
                "Export: {}",
                if export_path.exists() {
                    "exists"
                } else {
                    "not found"
                }
            );
        }
    }

    log::info!("Done!");

    Ok(())
}
