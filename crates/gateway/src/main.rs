//! picdock gateway - HTTP entrypoint for the images emulator.
//!
//! Parses configuration from the command line, builds the service state
//! (database, blob store, upload worker), and serves the emulated API
//! until ctrl-c.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;
use clap::Parser;
use tokio::sync::watch;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};
use url::Url;

use service::{Config, ServiceState};

/// picdock - a local emulator for a hosted images API
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on for HTTP requests
    #[arg(short, long, default_value = "8000")]
    port: u16,

    /// Public base URL upload URLs are issued against
    #[arg(long)]
    public_url: Url,

    /// Path to SQLite database file (omit for in-memory state)
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Root directory for stored images (omit for a temporary directory)
    #[arg(short, long)]
    storage: Option<PathBuf>,

    /// Seed the default account at startup
    #[arg(long)]
    seed_default_account: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let (non_blocking_writer, _guard) = tracing_appender::non_blocking(std::io::stdout());
    let log_level: tracing::Level = args.log_level.parse().unwrap_or(tracing::Level::INFO);
    let env_filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();

    let stdout_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(non_blocking_writer)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(stdout_layer).init();

    tracing::info!("Starting picdock gateway");

    let config = Config {
        listen_addr: SocketAddr::from_str(&format!("0.0.0.0:{}", args.port))?,
        public_url: args.public_url,
        sqlite_path: args.database,
        storage_path: args.storage,
        seed_default_account: args.seed_default_account,
        log_level,
    };

    // Create state
    let state = match ServiceState::from_config(&config).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to create service state: {}", e);
            std::process::exit(1);
        }
    };

    // Set up graceful shutdown
    let (shutdown_tx, shutdown_rx) = watch::channel(());
    let graceful_shutdown = async move {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl+c");
        tracing::info!("Received shutdown signal");
        let _ = shutdown_tx.send(());
    };
    tokio::spawn(graceful_shutdown);

    let router = service::http_server::router(state, config.log_level);
    service::http_server::run(config.listen_addr, router, shutdown_rx).await?;

    tracing::info!("Gateway shutdown complete");
    Ok(())
}
