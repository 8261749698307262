//! Listener lifecycle: the `start(port)` / `stop()` pair exposed to the host.

use std::future::Future;
use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info};

use crate::error::{AppError, AppResult};
use crate::handlers::http::AppState;

/// A running cast control service. Dropping the handle shuts the listener down.
#[derive(Debug)]
pub struct CastServer {
    local_addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<std::io::Result<()>>,
}

impl CastServer {
    /// Bind `0.0.0.0:port` and start serving in the background.
    /// Port 0 picks an ephemeral port; see [`CastServer::local_addr`].
    pub async fn start(port: u16, state: AppState) -> AppResult<Self> {
        let listener = TcpListener::bind(SocketAddr::from(([0, 0, 0, 0], port)))
            .await
            .map_err(|source| AppError::Bind { port, source })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| AppError::Bind { port, source })?;

        let (shutdown, rx) = oneshot::channel::<()>();
        let app = crate::create_app(state);
        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = rx.await;
                })
                .await
        });

        info!(addr = %local_addr, "cast control service listening");
        Ok(Self {
            local_addr,
            shutdown,
            task,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting connections and wait for in-flight requests to finish.
    pub async fn stop(self) -> AppResult<()> {
        let _ = self.shutdown.send(());
        let outcome = self.task.await;
        Self::finish(self.local_addr, outcome)
    }

    /// Serve until `shutdown` resolves, then stop. Returns early with an error
    /// if the serve task exits on its own first.
    pub async fn serve_until<F>(mut self, shutdown: F) -> AppResult<()>
    where
        F: Future<Output = ()>,
    {
        let early = tokio::select! {
            _ = shutdown => None,
            outcome = &mut self.task => Some(outcome),
        };
        match early {
            None => self.stop().await,
            Some(outcome) => {
                error!(addr = %self.local_addr, "cast control service exited unexpectedly");
                Self::finish(self.local_addr, outcome)?;
                Err(AppError::Internal(anyhow::anyhow!(
                    "cast control service exited before shutdown"
                )))
            }
        }
    }

    fn finish(
        local_addr: SocketAddr,
        outcome: Result<std::io::Result<()>, JoinError>,
    ) -> AppResult<()> {
        let result =
            outcome.map_err(|e| AppError::Internal(anyhow::anyhow!("server task: {}", e)))?;
        match result {
            Ok(()) => {
                info!(addr = %local_addr, "cast control service stopped");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "cast control service failed");
                Err(AppError::Internal(e.into()))
            }
        }
    }
}
