use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use lens_relay::config::Config;
use lens_relay::{AppState, build_router, logging};

/// Image analysis relay in front of the Gemini generateContent API
#[derive(Debug, Parser)]
#[command(name = "lens-relay", version, about)]
struct Args {
    /// Path to a TOML config file (default: conf/config.toml or config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Load and validate the configuration, then exit
    #[arg(long)]
    check_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let config = logging::with_bootstrap_logging(|| Config::load(args.config.as_deref()))?;
    let _log_guard = logging::init(&config.logging);

    if args.check_config {
        tracing::info!("Configuration OK: {:?}", config);
        return Ok(());
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let state = Arc::new(AppState::new(config));
    let app = build_router(state);

    tracing::info!("lens-relay {} listening on http://{}", env!("CARGO_PKG_VERSION"), addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
