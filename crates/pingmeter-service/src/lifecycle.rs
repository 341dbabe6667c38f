//! Process lifecycle: `init` → `run` → shutdown.
//!
//! [`run`] drives the sampler and the exposition endpoint under one
//! cancellation token and returns once both have stopped.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::app_state::AppState;
use crate::config::ServiceConfig;
use crate::metrics::ServiceMetrics;
use crate::{sampler, server};

pub async fn run(cfg: ServiceConfig, metrics: Arc<ServiceMetrics>, cancel: CancellationToken) {
    let sampler = sampler::spawn_sampler(&metrics, cfg.sampler.interval(), cancel.clone());
    let exposition = server::spawn_exposition(
        cfg.exposition.clone(),
        AppState::new(Arc::clone(&metrics)),
        cancel.clone(),
    );

    if let Err(e) = sampler.await {
        tracing::error!(error = %e, "sampler task aborted");
    }
    if let Err(e) = exposition.await {
        tracing::error!(error = %e, "exposition task aborted");
    }
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "failed to install SIGTERM handler");
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
    tracing::info!("signal received, starting graceful shutdown");
}
