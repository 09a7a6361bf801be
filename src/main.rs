//! Service status monitor.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌────────────────────────────────────────────────┐
//!                    │                STATUS MONITOR                   │
//!                    │                                                 │
//!  POST /add ────────┼─▶ http ──▶ ingest gateway ──┐                  │
//!  GET /healthcheck ─┼─▶ http ───────────────┐     │                  │
//!                    │                        ▼     ▼                  │
//!                    │  schedule ──▶ round   status store              │
//!                    │      │          │    (indexed │ degraded)       │
//!                    │      ▼          ▼                               │
//!                    │   prober     builder ──▶ files / remote ingest  │
//!                    │                                                 │
//!                    │  Cross-cutting: config, lifecycle, tracing,     │
//!                    │  metrics                                        │
//!                    └────────────────────────────────────────────────┘
//! ```

use std::path::Path;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use status_monitor::config::{self, MonitorConfig};
use status_monitor::http::HttpServer;
use status_monitor::ingest::RemoteForwarder;
use status_monitor::lifecycle::Shutdown;
use status_monitor::monitor::{Aggregator, MonitorSchedule, ObservationBuilder, StatusFileWriter};
use status_monitor::observability::metrics;
use status_monitor::probe::ServiceProber;
use status_monitor::store::StatusStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration before logging is up; loader errors surface
    // through main's Err path.
    let config = match std::env::args().nth(1) {
        Some(path) => config::load_config(Path::new(&path))?,
        None => MonitorConfig::default(),
    };

    // Initialize tracing subscriber. RUST_LOG wins over the configured
    // level.
    let default_filter = format!(
        "status_monitor={level},tower_http={level}",
        level = config.observability.log_level
    );
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&default_filter)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "status-monitor starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        application = %config.monitoring.application_name,
        services = ?config.monitoring.services,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    // Select the store backend once; unreachable backends degrade to
    // in-memory records.
    let store = Arc::new(StatusStore::connect(&config.store).await);
    tracing::info!(mode = %store.mode(), "Status store ready");

    // Wire the probing round.
    let mut aggregator = Aggregator::new(
        ServiceProber::new(&config.probe),
        ObservationBuilder::from_host(),
        &config.monitoring,
    )
    .with_store(store.clone());

    if let Some(dir) = &config.monitoring.output_dir {
        match StatusFileWriter::create(dir) {
            Ok(writer) => aggregator = aggregator.with_writer(writer),
            Err(e) => tracing::warn!(
                dir = %dir.display(),
                error = %e,
                "Could not prepare output directory; status files disabled"
            ),
        }
    }
    if let Some(url) = &config.monitoring.ingest_url {
        aggregator = aggregator.with_forwarder(RemoteForwarder::new(url));
    }
    let aggregator = Arc::new(aggregator);

    // One round at startup so queries have data immediately.
    let round = aggregator.run_round().await;
    for observation in &round {
        tracing::info!(
            subject = observation.subject_name(),
            status = %observation.status(),
            "Startup probe"
        );
    }

    let shutdown = Shutdown::new();
    shutdown.trigger_on_ctrl_c();

    let schedule = MonitorSchedule::new(aggregator.clone(), config.schedule.clone());
    let schedule_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        schedule.run(schedule_shutdown).await;
    });

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(&config, store);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
