//! API server implementation

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::signal;

use crate::Result;
use crate::routes::router;
use crate::state::AppState;

/// ESGM API server
#[derive(Debug)]
pub struct Server {
    state: AppState,
}

impl Server {
    /// Create a server for the given state.
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Bind `server.host:server.port` from the config.
    pub async fn bind(&self) -> Result<TcpListener> {
        let address = self.state.config.server.address();
        tracing::info!(%address, "Binding");
        Ok(TcpListener::bind(&address).await?)
    }

    /// Serve until Ctrl-C or SIGTERM.
    pub async fn run(self) -> Result<()> {
        let listener = self.bind().await?;
        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already-bound listener until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local: SocketAddr = listener.local_addr()?;
        tracing::info!(
            address = %local,
            environment = self.state.config.environment.as_str(),
            evaluator = self.state.dispatcher.evaluator_name(),
            "Server running"
        );

        axum::serve(listener, router(self.state))
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Server shut down");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install signal handler");
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
