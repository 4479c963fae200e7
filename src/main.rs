//! Elysia relay binary: loads config, sets up logging, serves the rendering
//! client until SIGINT/SIGTERM.
//!
//! Usage: `elysia-relay [CONFIG_DIR]` (falls back to `$ELYSIA_CONFIG_DIR`,
//! then the platform config directory).

use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use elysia_relay::config::{resolve_config_dir, RELAY_CONFIG_FILE};
use elysia_relay::relay;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config_dir, config_source) = resolve_config_dir(std::env::args().nth(1));
    let relay_config =
        relay::load_config(&config_dir.join(RELAY_CONFIG_FILE)).resolve_paths(&config_dir);

    // RUST_LOG wins over the configured level.
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&relay_config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!(
        source = config_source,
        path = %config_dir.display(),
        "resolved config directory"
    );

    let session = elysia_relay::build_session(&config_dir, &relay_config)
        .await
        .context("failed to initialize relay")?;

    relay::serve(relay_config.addr(), Arc::new(session), shutdown_signal())
        .await
        .context("relay server error")?;

    Ok(())
}

/// Waits for SIGINT (Ctrl+C) or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { tracing::info!("received SIGINT, shutting down"); }
        () = terminate => { tracing::info!("received SIGTERM, shutting down"); }
    }
}
