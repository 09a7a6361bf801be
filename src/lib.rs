//! Service status monitoring library.
//!
//! Probes a fixed set of named services, derives a composite application
//! status, persists every observation, and answers current-status queries
//! over HTTP — durably when the search-index backend is reachable,
//! in-memory otherwise.

// Core subsystems
pub mod config;
pub mod http;
pub mod model;
pub mod store;

// Observation production
pub mod ingest;
pub mod monitor;
pub mod probe;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::MonitorConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use store::StatusStore;
