// src/main.rs

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use poem_stream::api::create_router;
use poem_stream::{AppState, PoemConfig};

#[derive(Parser)]
#[command(name = "poem-stream")]
#[command(about = "Streams generated poems over WebSocket with per-line emotion analysis")]
#[command(version)]
struct Args {
    /// Host to bind (overrides POEM_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides POEM_PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Default log filter when RUST_LOG is unset (overrides POEM_LOG_LEVEL)
    #[arg(long)]
    log_level: Option<String>,

    /// Verbose diagnostics, same as --log-level debug
    #[arg(long, env = "POEM_DEBUG")]
    debug: bool,
}

/// Graceful shutdown signal handler for SIGTERM and Ctrl+C
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, closing connections...");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = PoemConfig::from_env()?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    if args.debug {
        config.logging.level = "debug".to_string();
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))?;
    fmt().with_env_filter(filter).init();

    config.validate()?;

    info!("Starting poem-stream v{}", env!("CARGO_PKG_VERSION"));
    info!("Generator model: {}", config.gemini.model);
    info!("Emotion model: {}", config.classifier.model);
    info!("Allowed origins: {}", config.server.allowed_origins.join(", "));

    let app_state = Arc::new(AppState::new(&config)?);
    let app = create_router(app_state);

    let bind_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;

    info!("WebSocket server listening on ws://{}/ws", bind_address);
    info!("Health endpoints: /health, /live");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Shutdown complete");
    Ok(())
}
