mod commands;
mod config;
mod server;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::commands::{build_clock, cmd_alerts, cmd_energy, cmd_summary};
use crate::config::Config;
use forage_core::models::DEFAULT_WINDOW_DAYS;
use forage_core::service::AnalyticsService;
use forage_core::store::SnapshotStore;

const DEFAULT_LOG_FILTER: &str = "forage=info,forage_core=info,tower_http=info";

#[derive(Parser)]
#[command(
    name = "forage",
    version,
    about = "Nutrition analytics, energy estimates and pantry alerts"
)]
struct Cli {
    /// Path to the data snapshot (overrides FORAGE_SNAPSHOT and the default location)
    #[arg(long, global = true, value_name = "PATH")]
    snapshot: Option<PathBuf>,
    /// Evaluate as of this instant (RFC 3339, default: now)
    #[arg(long, global = true, value_name = "TIMESTAMP")]
    now: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the nutrition summary and insights for an owner
    Summary {
        /// Owner (user) ID
        owner: String,
        /// Window length in days (1-365)
        #[arg(short, long, default_value_t = DEFAULT_WINDOW_DAYS)]
        days: u32,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show expiring and low-stock inventory items for an owner
    Alerts {
        /// Owner (user) ID
        owner: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Estimate the daily energy requirement from body metrics
    Energy {
        /// Body weight in kg
        #[arg(long)]
        weight: Option<f64>,
        /// Height in cm
        #[arg(long)]
        height: Option<f64>,
        /// Age in years
        #[arg(long)]
        age: Option<u32>,
        /// Gender ("male" selects the male formula)
        #[arg(long)]
        gender: Option<String>,
        /// Activity level: sedentary, light, moderate, active, very_active
        #[arg(long)]
        activity: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Start the REST API server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
        /// Address to bind to (default: 127.0.0.1, use 0.0.0.0 to expose to network)
        #[arg(short, long, default_value = "127.0.0.1")]
        bind: String,
    },
}

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    // stdout carries command output, so logs go to stderr.
    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn open_service(cli_snapshot: Option<PathBuf>, now: Option<&str>) -> Result<AnalyticsService> {
    let config = Config::load(cli_snapshot)?;
    debug!(
        data_dir = %config.data_dir.display(),
        snapshot = %config.snapshot_path.display(),
        "resolved paths"
    );
    let store = SnapshotStore::open(&config.snapshot_path)?;
    let loaded = store.snapshot();
    info!(
        exported_at = ?loaded.exported_at,
        profiles = loaded.profiles.len(),
        products = loaded.products.len(),
        inventory = loaded.inventory.len(),
        "snapshot loaded"
    );
    let clock = build_clock(now)?;
    Ok(AnalyticsService::new(Arc::new(store), clock))
}

async fn run(cli: Cli) -> Result<()> {
    let Cli {
        snapshot,
        now,
        command,
    } = cli;

    match command {
        Commands::Summary { owner, days, json } => {
            let service = open_service(snapshot, now.as_deref())?;
            cmd_summary(&service, &owner, days, json)
        }
        Commands::Alerts { owner, json } => {
            let service = open_service(snapshot, now.as_deref())?;
            cmd_alerts(&service, &owner, json)
        }
        Commands::Energy {
            weight,
            height,
            age,
            gender,
            activity,
            json,
        } => cmd_energy(
            weight,
            height,
            age,
            gender.as_deref(),
            activity.as_deref(),
            json,
        ),
        Commands::Serve { port, bind } => {
            let service = open_service(snapshot, now.as_deref())?;
            server::start_server(service, port, &bind).await
        }
    }
}
