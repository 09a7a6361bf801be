//! Monitoring subsystem: the probing round and its plumbing.
//!
//! # Data Flow
//! ```text
//! schedule.rs (interval tick)
//!     → round.rs Aggregator::run_round
//!         → probe each configured service
//!         → builder.rs stamps host + timestamp
//!         → record via the wired sinks:
//!             status store (co-located)
//!             writer.rs (one JSON file per observation)
//!             ingest forwarder (remote /add)
//!         → derive the application observation from the round
//! ```
//!
//! # Design Decisions
//! - Sinks are optional and independent; a sink failure is logged and the
//!   round continues — a DOWN observation is itself a valid fact worth
//!   keeping
//! - The application record is derived from this round's results, not from
//!   a second probe pass

pub mod builder;
pub mod round;
pub mod schedule;
pub mod writer;

pub use builder::ObservationBuilder;
pub use round::Aggregator;
pub use schedule::MonitorSchedule;
pub use writer::{StatusFileWriter, WriterError};
