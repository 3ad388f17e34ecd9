//! forest-cover - FAO forest statistics service
//!
//! # Usage
//!
//! ```bash
//! # Serve data/Deforestation.csv on 0.0.0.0:8000
//! cargo run --release
//!
//! # Custom inputs and address
//! ./forest-cover --data fao.csv --long-range forecasts.csv --addr 127.0.0.1:9000
//! ```
//!
//! # Environment Variables
//!
//! - `FOREST_CONFIG`: path to a TOML config file
//! - `FOREST_SERVER_ADDR`: bind address (same as `--addr`)
//! - `FOREST_CORS_ORIGINS`: comma-separated CORS origins
//! - `RUST_LOG`: logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use forest_cover::api::{create_app, ApiState};
use forest_cover::config::{self, AppConfig};
use forest_cover::data::DataStore;
use forest_cover::model::ModelSet;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "forest-cover")]
#[command(about = "Forest cover statistics and long-range series service")]
#[command(version)]
struct CliArgs {
    /// Override the server address (default: "0.0.0.0:8000")
    #[arg(short, long, env = "FOREST_SERVER_ADDR")]
    addr: Option<String>,

    /// Config file; skips the FOREST_CONFIG / ./forest_config.toml search
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Measurement table (CSV, areas in hectares)
    #[arg(long, value_name = "PATH")]
    data: Option<PathBuf>,

    /// Long-range forecast table (CSV)
    #[arg(long, value_name = "PATH")]
    long_range: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }
}

/// Config from the search order (or `--config`), with CLI overrides applied.
fn resolve_config(args: &CliArgs) -> Result<AppConfig> {
    let mut app_config = match &args.config {
        Some(path) => AppConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => AppConfig::load().context("Failed to load configuration")?,
    };

    if let Some(addr) = &args.addr {
        app_config.server.addr = addr.clone();
    }
    if let Some(data) = &args.data {
        app_config.data.measurements_path = data.clone();
    }
    if let Some(long_range) = &args.long_range {
        app_config.data.long_range_path = long_range.clone();
    }
    app_config
        .validate()
        .context("Invalid configuration after command-line overrides")?;
    Ok(app_config)
}

async fn serve(
    listener: tokio::net::TcpListener,
    app: axum::Router,
    cancel_token: CancellationToken,
) -> Result<()> {
    let result = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            cancel_token.cancelled().await;
            info!("[HttpServer] Received shutdown signal");
        })
        .await;

    match result {
        Ok(()) => {
            info!("[HttpServer] Graceful shutdown complete");
            Ok(())
        }
        Err(e) => {
            error!("[HttpServer] Server error: {}", e);
            Err(anyhow::anyhow!("HTTP server error: {}", e))
        }
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.log_json);

    config::init(resolve_config(&args)?);
    let cfg = config::get();

    let store = DataStore::load(&cfg.data.measurements_path, cfg.data.strict).with_context(|| {
        format!(
            "Failed to load measurements from {}",
            cfg.data.measurements_path.display()
        )
    })?;
    let models = ModelSet::build(cfg.model.source, &store, &cfg.data.long_range_path)
        .context("Failed to initialise the predictive model")?;

    let state = ApiState::new(Arc::new(store), models, cfg.series.moderating_factor);
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&cfg.server.addr)
        .await
        .with_context(|| format!("Failed to bind to {}", cfg.server.addr))?;
    info!(addr = %cfg.server.addr, "HTTP server listening");

    // Graceful shutdown via Ctrl+C
    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received Ctrl+C, initiating shutdown...");
        shutdown_token.cancel();
    });

    serve(listener, app, cancel_token).await?;
    info!("forest-cover shutdown complete");
    Ok(())
}
