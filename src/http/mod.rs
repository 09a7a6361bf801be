//! HTTP API subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, state)
//!     → handlers.rs (decode request, call core)
//!         /add            → ingest gateway → status store
//!         /healthcheck    → store list + derived application status
//!         /healthcheck/:n → store latest-by-name
//!     → response.rs (wire shapes, error mapping)
//! ```

pub mod handlers;
pub mod response;
pub mod server;

pub use response::ApiError;
pub use server::{AppState, HttpServer};
