//! Parcel Tracker main entry point
//!
//! This is the command-line interface for looking up shipments and managing
//! the local tracking list.

use anyhow::Context;
use clap::{CommandFactory, Parser};
use parcel_tracker::config::{load_config_or_default, Config};
use parcel_tracker::courier::{parse_offline, Courier, Tracker};
use parcel_tracker::refresh::{refresh_all, RefreshOutcome};
use parcel_tracker::store::{AddOutcome, DeleteOutcome, TrackingStore};
use parcel_tracker::TrackingRecord;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Parcel Tracker: multi-courier shipment tracking
///
/// Looks up Blue Dart, DTDC and Delhivery shipments and keeps a local
/// watch-list of tracking numbers. Exactly one action runs per invocation.
#[derive(Parser, Debug)]
#[command(name = "parcel-tracker")]
#[command(version)]
#[command(about = "Multi-courier shipment tracker", long_about = None)]
struct Cli {
    /// Tracking number to look up
    #[arg(value_name = "TRACKING_NUMBER", conflicts_with = "tracking_number")]
    lookup: Option<String>,

    /// Tracking number to look up
    #[arg(long = "tracking_number", value_name = "ID")]
    tracking_number: Option<String>,

    /// Add a tracking number to the list
    #[arg(long, value_name = "ID")]
    add: Option<String>,

    /// Delete a tracking number from the list
    #[arg(long, value_name = "ID")]
    delete: Option<String>,

    /// Courier name: "Blue Dart", "DTDC" or "Delhivery"
    #[arg(long, default_value = "Blue Dart")]
    courier: String,

    /// Output JSON
    #[arg(long)]
    json: bool,

    /// List stored tracking numbers
    #[arg(long)]
    list: bool,

    /// Look up every stored tracking number and update the list
    #[arg(long)]
    refresh: bool,

    /// Also refresh entries already marked delivered
    #[arg(long, requires = "refresh")]
    force: bool,

    /// Parse a saved courier response instead of fetching
    #[arg(long, value_name = "PATH")]
    test_file: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_config_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;

    if let Some(id) = &cli.add {
        return handle_add(&config, id, &cli.courier);
    }

    if let Some(id) = &cli.delete {
        return handle_delete(&config, id);
    }

    if cli.list {
        let store = TrackingStore::open(&config.store);
        return print_json(store.list());
    }

    if cli.refresh {
        return handle_refresh(&config, cli.force).await;
    }

    let tracking_number = cli.lookup.as_deref().or(cli.tracking_number.as_deref());

    if let Some(path) = &cli.test_file {
        let record = handle_test_file(path, &cli.courier, tracking_number.unwrap_or_default())?;
        return print_record(&record, cli.json);
    }

    if let Some(id) = tracking_number {
        let tracker = Tracker::new(&config).context("Failed to build HTTP client")?;
        let record = tracker.route(&cli.courier, id).await;
        return print_record(&record, cli.json);
    }

    Cli::command().print_help()?;
    println!();
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout stays valid JSON.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("parcel_tracker=warn,warn"),
            1 => EnvFilter::new("parcel_tracker=info,warn"),
            2 => EnvFilter::new("parcel_tracker=debug,info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles --add: stores the tracking number as pending
fn handle_add(config: &Config, id: &str, courier: &str) -> anyhow::Result<()> {
    if Courier::from_name(courier).is_none() {
        tracing::warn!("'{}' is not a supported courier; lookups will fail", courier);
    }

    let mut store = TrackingStore::open(&config.store);
    match store.add(id, courier).context("Failed to save tracking list")? {
        AddOutcome::Added => println!("Added {} ({})", id, courier),
        AddOutcome::AlreadyExists => println!("Tracking number {} already exists.", id),
    }

    Ok(())
}

/// Handles --delete: removes the tracking number if present
fn handle_delete(config: &Config, id: &str) -> anyhow::Result<()> {
    let mut store = TrackingStore::open(&config.store);
    match store.delete(id).context("Failed to save tracking list")? {
        DeleteOutcome::Deleted => println!("Deleted {}", id),
        DeleteOutcome::NotFound => println!("ID {} not found", id),
    }

    Ok(())
}

/// Handles --refresh: looks up every stored entry and prints the results
async fn handle_refresh(config: &Config, force: bool) -> anyhow::Result<()> {
    let mut store = TrackingStore::open(&config.store);
    let tracker = Tracker::new(config).context("Failed to build HTTP client")?;

    let outcomes = refresh_all(&mut store, &tracker, force)
        .await
        .context("Failed to save tracking list")?;

    // Skipped entries are reported with their stored snapshot
    let mut results = serde_json::Map::new();
    for (id, outcome) in outcomes {
        let value = match outcome {
            RefreshOutcome::Looked(record) => serde_json::to_value(record)?,
            RefreshOutcome::Skipped => serde_json::to_value(store.get(&id))?,
        };
        results.insert(id, value);
    }

    print_json(&results)
}

/// Handles --test-file: parses a captured response body
fn handle_test_file(path: &Path, courier: &str, id: &str) -> anyhow::Result<TrackingRecord> {
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(parse_offline(courier, &body, id))
}

/// Prints a lookup result
///
/// Plain and `--json` output are the same indented JSON.
fn print_record(record: &TrackingRecord, _json: bool) -> anyhow::Result<()> {
    print_json(record)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
