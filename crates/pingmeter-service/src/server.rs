//! Exposition listener.
//!
//! Binding and serving are split so callers (and tests) can learn the bound
//! address before traffic starts. A bind failure is fatal for this component
//! only: [`spawn_exposition`] logs it and lets the host process carry on.

use std::net::SocketAddr;

use pingmeter_core::error::{MetricsError, Result};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{app_state::AppState, config::ExpositionSection, router};

pub struct ExpositionServer {
    listener: TcpListener,
    path: String,
    state: AppState,
}

impl ExpositionServer {
    pub async fn bind(cfg: &ExpositionSection, state: AppState) -> Result<Self> {
        let addr = cfg.listen_addr()?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| MetricsError::Bind {
                addr: addr.to_string(),
                source,
            })?;

        Ok(Self {
            listener,
            path: cfg.path.clone(),
            state,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener
            .local_addr()
            .map_err(|e| MetricsError::Internal(format!("local_addr failed: {e}")))
    }

    /// Serve scrapes until `cancel` fires, then drain in-flight requests.
    pub async fn serve(self, cancel: CancellationToken) -> Result<()> {
        let addr = self.local_addr()?;
        let app = router::build_router(self.state, &self.path);

        tracing::info!(%addr, path = %self.path, "exposition endpoint listening");
        axum::serve(self.listener, app)
            .with_graceful_shutdown(async move { cancel.cancelled().await })
            .await
            .map_err(|e| MetricsError::Internal(format!("exposition server failed: {e}")))?;

        tracing::info!(%addr, "exposition endpoint stopped");
        Ok(())
    }
}

/// Bind and serve on a separate task. Errors are logged, never propagated.
pub fn spawn_exposition(
    cfg: ExpositionSection,
    state: AppState,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let server = match ExpositionServer::bind(&cfg, state).await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, class = e.class().as_str(), "exposition endpoint failed to start");
                return;
            }
        };
        if let Err(e) = server.serve(cancel).await {
            tracing::error!(error = %e, "exposition endpoint exited");
        }
    })
}
