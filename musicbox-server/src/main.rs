//! musicbox-server - Musicbox catalog and entitlement service
//!
//! Serves user registration, the artist/album catalog, subscriptions with
//! premium status, and audio upload and download over HTTP.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use musicbox_common::config::{
    load_module_config, load_toml_config, RootFolderInitializer, RootFolderResolver, TomlConfig,
};
use musicbox_server::services::ExpirySweeper;
use musicbox_server::{build_router, AppState, MODULE_NAME};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for musicbox-server
#[derive(Parser, Debug)]
#[command(name = "musicbox-server")]
#[command(about = "Musicbox catalog, subscription and audio service")]
#[command(version)]
struct Args {
    /// Root folder holding the database and uploads
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Port to listen on (overrides config file)
    #[arg(short, long, env = "MUSICBOX_PORT")]
    port: Option<u16>,

    /// Explicit config file (skips the default search locations)
    #[arg(short, long, env = "MUSICBOX_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is read before logging exists; problems are reported after init
    let (config, config_error) = match &args.config {
        Some(path) => match load_toml_config(path) {
            Ok(config) => (config, None),
            Err(e) => (TomlConfig::default(), Some(e)),
        },
        None => (load_module_config(MODULE_NAME), None),
    };

    init_tracing(&config)?;

    info!(
        "Starting {} v{} [{}] built {} ({})",
        MODULE_NAME,
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    if let Some(e) = config_error {
        warn!("{}; using built-in defaults", e);
    }

    // Step 1: Resolve and create root folder
    let root_folder = RootFolderResolver::new(MODULE_NAME)
        .with_cli_override(args.root_folder.clone())
        .with_toml_config(&config)
        .resolve();
    let initializer = RootFolderInitializer::new(root_folder);
    initializer
        .ensure_directory_exists()
        .context("Failed to initialize root folder")?;
    info!("Root folder: {}", initializer.root_folder().display());

    // Step 2: Open or create database
    let db_path = initializer.database_path();
    let db_pool = musicbox_common::db::init_database_with(&db_path, &config.storage)
        .await
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;

    let upload_root = initializer.upload_root(&config.storage);
    info!("Upload directory: {}", upload_root.display());

    let state = AppState::new(db_pool, upload_root);

    // Step 3: Background expiry sweep
    let shutdown = CancellationToken::new();
    let sweeper = ExpirySweeper::new(
        state.entitlements.clone(),
        config.subscriptions.expiry_sweep_interval_secs,
        shutdown.clone(),
    )
    .run();

    // Step 4: Serve
    let app = build_router(state, config.server.max_upload_bytes);
    let port = args.port.unwrap_or(config.server.port);
    let addr = format!("{}:{}", config.server.host, port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    shutdown.cancel();
    if let Some(handle) = sweeper {
        if let Err(e) = handle.await {
            error!("Expiry sweeper task failed: {}", e);
        }
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Log to stderr, or to `logging.file` when configured. `RUST_LOG` wins over
/// `logging.level`.
fn init_tracing(config: &TomlConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},tower_http=info", config.logging.level)));

    match &config.logging.file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(Arc::new(file)))
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
