//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with all handlers
//! - Wire up middleware (tracing, limits, timeout, request ID)
//! - Bind the server to a listener and serve until shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::MonitorConfig;
use crate::http::handlers;
use crate::ingest::IngestGateway;
use crate::store::StatusStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<StatusStore>,
    pub gateway: Arc<IngestGateway>,
    pub application_name: String,
    pub services: Vec<String>,
}

/// HTTP server exposing the monitoring API.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server around an already-connected store.
    pub fn new(config: &MonitorConfig, store: Arc<StatusStore>) -> Self {
        let gateway = Arc::new(IngestGateway::new(store.clone()));

        let state = AppState {
            store,
            gateway,
            application_name: config.monitoring.application_name.clone(),
            services: config.monitoring.services.clone(),
        };

        let router = Self::build_router(config, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &MonitorConfig, state: AppState) -> Router {
        Router::new()
            .route("/", get(handlers::root))
            .route("/add", post(handlers::add_observation))
            .route("/healthcheck", get(handlers::healthcheck_all))
            .route("/healthcheck/{name}", get(handlers::healthcheck_one))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(RequestBodyLimitLayer::new(config.listener.max_body_bytes))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener until
    /// the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
