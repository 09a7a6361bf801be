//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (structured fields, request IDs from middleware)
//!     → metrics.rs (counters)
//!
//! Consumers:
//!     → log output (stdout, filtered via RUST_LOG or config)
//!     → metrics endpoint (Prometheus scrape, optional)
//! ```

pub mod metrics;
