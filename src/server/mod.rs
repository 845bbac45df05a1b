//! HTTP server exposing the scrape endpoint.
//!
//! Each `GET /metrics` runs the full bridge pipeline: fetch one fresh
//! snapshot from the device, apply it to the gauge registry, then
//! render the registry in text exposition format. The steps are
//! strictly ordered within a request; across concurrent requests the
//! only coordination is the registry's own per-gauge atomicity.
//!
//! A failed upstream fetch aborts that scrape with `502 Bad Gateway`
//! and leaves the registry untouched. The process keeps serving:
//! device flakiness is a per-request condition, never fatal.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use thiserror::Error;

use crate::fetch::Fetcher;
use crate::metrics::MeterMetrics;

/// Fixed listening port for the scrape endpoint.
pub const LISTEN_PORT: u16 = 8080;

/// Errors that can occur during server operations.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listening socket could not be bound.
    #[error("failed to bind to address: {0}")]
    Bind(#[from] std::io::Error),

    /// The server failed while accepting or serving connections.
    #[error("server error: {0}")]
    Server(String),
}

/// Shared state for the scrape handlers.
pub struct AppState {
    /// Upstream device client.
    pub fetcher: Fetcher,
    /// Gauge registry, shared across all requests.
    pub metrics: MeterMetrics,
}

/// Builds the bridge router over the given state.
///
/// Exposed separately from [`BridgeServer::run`] so tests can drive the
/// routes on an ephemeral port.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/metrics", get(scrape_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// HTTP server for the bridge.
pub struct BridgeServer {
    state: Arc<AppState>,
}

impl BridgeServer {
    /// Creates a server over the given fetcher and registry.
    pub fn new(fetcher: Fetcher, metrics: MeterMetrics) -> Self {
        Self {
            state: Arc::new(AppState { fetcher, metrics }),
        }
    }

    /// Starts the HTTP server on the fixed port.
    ///
    /// Runs until the process receives SIGTERM or ctrl-c, then drains
    /// in-flight scrapes and returns.
    pub async fn run(self) -> Result<(), ServerError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], LISTEN_PORT));
        let listener = tokio::net::TcpListener::bind(addr).await?;

        self.serve(listener, shutdown_signal()).await
    }

    /// Serves on an already-bound listener until `shutdown` resolves.
    pub async fn serve(
        self,
        listener: tokio::net::TcpListener,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        let app = router(self.state);

        if let Ok(addr) = listener.local_addr() {
            tracing::info!(addr = %addr, "bridge listening");
        }

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ServerError::Server(e.to_string()))?;

        Ok(())
    }
}

/// Resolves when the process is asked to terminate.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install ctrl-c handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
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
        _ = ctrl_c => tracing::info!("received ctrl-c, shutting down"),
        _ = terminate => tracing::info!("received sigterm, shutting down"),
    }
}

/// Handler for the /metrics endpoint: fetch, apply, render.
async fn scrape_handler(State(state): State<Arc<AppState>>) -> Response {
    // The fetch holds no registry lock; a slow device blocks only this
    // request.
    let measurements = match state.fetcher.fetch().await {
        Ok(measurements) => measurements,
        Err(e) => {
            tracing::warn!(error = %e, "scrape aborted, upstream fetch failed");
            return (StatusCode::BAD_GATEWAY, format!("upstream fetch failed: {e}\n"))
                .into_response();
        }
    };

    state.metrics.apply(&measurements);

    match state.metrics.encode() {
        Ok(output) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            output,
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("failed to encode metrics: {e}\n"),
        )
            .into_response(),
    }
}

/// Handler for the /health endpoint.
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
