use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use karaokify_core::{
    create_event_system, load_config, validate_config, FfmpegMuxer, GeniusClient, HttpAligner,
    KaraokePipeline, LyricsOvhClient, PipelineComponents, VocalRemoverSeparator, YtDlpFetcher,
};
use karaokify_server::api::create_router;
use karaokify_server::state::AppState;

/// Buffer size for the pipeline event channel
const EVENT_BUFFER_SIZE: usize = 1000;

/// How long to wait for queued events to be logged on shutdown
const EVENT_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("KARAOKIFY_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!(
        "Output directory: {:?} (isolated requests: {})",
        config.output.dir, config.output.isolate_requests
    );

    tokio::fs::create_dir_all(&config.output.dir)
        .await
        .with_context(|| format!("Failed to create output directory {:?}", config.output.dir))?;

    // Create collaborators
    let catalog =
        GeniusClient::new(config.catalog.clone()).context("Failed to create catalog client")?;
    info!("Catalog: {}", config.catalog.base_url);

    let lyrics =
        LyricsOvhClient::new(config.lyrics.clone()).context("Failed to create lyrics client")?;
    info!("Lyrics: {}", config.lyrics.base_url);

    info!("Aligner: {}", config.aligner.base_url);

    let components = PipelineComponents {
        catalog: Arc::new(catalog),
        lyrics: Arc::new(lyrics),
        fetcher: Arc::new(YtDlpFetcher::new(config.fetcher.clone())),
        separator: Arc::new(VocalRemoverSeparator::new(config.separator.clone())),
        muxer: Arc::new(FfmpegMuxer::new(config.muxer.clone())),
        aligner: Arc::new(HttpAligner::new(config.aligner.clone())),
    };

    // Create event system
    let (events, event_logger) = create_event_system(EVENT_BUFFER_SIZE);
    let logger_handle = tokio::spawn(event_logger.run());

    let pipeline = KaraokePipeline::new(config.clone(), components).with_events(events);

    // Cancelled on shutdown so running pipelines stop instead of holding the
    // server open
    let shutdown = CancellationToken::new();

    let state = Arc::new(AppState::new(config.clone(), pipeline, shutdown.clone()));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            info!("Shutdown requested, cancelling running pipelines");
            shutdown.cancel();
        })
        .await
        .context("Server error")?;

    info!("Server shutting down...");

    // The router (and every pipeline clone) is gone, so the event channel
    // closes once the logger has drained it
    match tokio::time::timeout(EVENT_DRAIN_TIMEOUT, logger_handle).await {
        Ok(_) => info!("Event logger stopped"),
        Err(_) => warn!("Event logger did not stop in time"),
    }

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
