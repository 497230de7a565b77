//! Salesboard API Server
//!
//! Run with: cargo run --bin salesboard
//!
//! # Configuration
//!
//! Read from `--config PATH`, or the first of
//! `~/.config/salesboard/config.toml`, `/etc/salesboard/config.toml` and
//! `./config.toml`. `SALESBOARD_*` environment variables override the file;
//! `RUST_LOG` overrides the configured log level.

use clap::Parser;
use std::path::PathBuf;

use salesboard::analytics::AnalyticsService;
use salesboard::api::{serve, AppState};
use salesboard::config::Config;
use salesboard::import::SeedImporter;
use salesboard::storage::{open_store, RecordStore};

#[derive(Parser)]
#[command(name = "salesboard")]
#[command(about = "Sales dashboard API server", version)]
struct Args {
    /// Config file (defaults to the standard locations)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed the store before serving, even if it already has records
    #[arg(long)]
    seed: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };

    salesboard::logging::init(&config.logging, false)?;

    tracing::info!("Starting Salesboard API server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        backend = ?config.storage.backend,
        reference_year = config.analytics.reference_year,
        "Loaded configuration"
    );

    let store = open_store(&config.storage)?;
    let importer = SeedImporter::new(config.import.clone())?;

    if importer.is_enabled() {
        seed_at_startup(&importer, store.as_ref(), args.seed, config.import.seed_on_empty).await;
    }

    let analytics = AnalyticsService::new(store, config.analytics.clone());
    let state = AppState::new(analytics, importer, config);

    serve(state).await?;

    tracing::info!("Salesboard API server stopped");
    Ok(())
}

/// Seed when forced, or when asked to and the store is empty
///
/// Failures are logged; the server still starts and can be seeded later.
async fn seed_at_startup(
    importer: &SeedImporter,
    store: &dyn RecordStore,
    force: bool,
    on_empty: bool,
) {
    if !force {
        if !on_empty {
            return;
        }
        match store.total().await {
            Ok(0) => {}
            Ok(records) => {
                tracing::info!(records, "Store already populated, skipping seed");
                return;
            }
            Err(e) => {
                tracing::warn!("Could not count records before seeding: {}", e);
                return;
            }
        }
    }

    match importer.run(store).await {
        Ok(report) => tracing::info!(stored = report.stored, "Seeded record store"),
        Err(e) => tracing::warn!("Startup seed failed: {} (use /api/transactions/seed to retry)", e),
    }
}
