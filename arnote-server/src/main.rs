//! # Arnote Server
//!
//! Avatar and QR styling service for AR reminders.

use arnote_server::{build_router, metrics, AppState, LogFormat, ServerArgs, ServerConfig};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize structured tracing.
///
/// Set `RUST_LOG` to control log levels (default: info,arnote_server=debug,tower_http=debug).
/// JSON output with `--log-format json` or `RUST_LOG_FORMAT=json`.
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,arnote_server=debug,tower_http=debug"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true);

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from(ServerArgs::parse());
    init_tracing(config.log_format);

    let metrics_handle = metrics::init_metrics()
        .map_err(|e| anyhow::anyhow!("Failed to initialize Prometheus metrics: {e}"))?;
    tracing::info!("Prometheus metrics initialized");

    let addr = config.addr;
    tracing::info!(
        origin = %config.public_origin,
        data_dir = ?config.data_dir,
        canvas = ?config.canvas,
        "Loaded configuration"
    );
    let state = AppState::from_config(config)?;
    let app = build_router(state, Some(metrics_handle));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Arnote server starting on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
