//! pingmeter service
//!
//! - Registers the HTTP and runtime metric set
//! - Samples alive tokio tasks on a timer
//! - Serves the registry at `{exposition.path}` on its own listener
//! - Ctrl+C / SIGTERM cancels both loops and waits for them

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pingmeter_service::{config, lifecycle, ServiceMetrics};

const CONFIG_ENV: &str = "PINGMETER_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "pingmeter.yaml";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::load_or_default(&path)?;

    tracing::info!(
        config = %path,
        port = cfg.exposition.port,
        path = %cfg.exposition.path,
        interval_ms = cfg.sampler.interval_ms,
        "pingmeter starting"
    );

    // Registration conflicts surface here, before anything is served.
    let metrics = Arc::new(ServiceMetrics::from_config(&cfg)?);

    let cancel = CancellationToken::new();
    let signal = cancel.clone();
    tokio::spawn(async move {
        lifecycle::shutdown_signal().await;
        signal.cancel();
    });

    lifecycle::run(cfg, metrics, cancel).await;

    tracing::info!("shutdown complete");
    Ok(())
}
