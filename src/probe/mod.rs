//! Service probing subsystem.
//!
//! # Data Flow
//! ```text
//! Primary probe (supervisor.rs):
//!     ask the host's service supervisor about the unit
//!     → clean answer: active ⇒ UP, anything else ⇒ DOWN
//!     → timeout ⇒ DOWN (warn, round continues)
//!     → supervisor missing on this host ⇒ fall through
//!
//! Fallback probe (process.rs):
//!     look for any live process matching the service's aliases
//!     → one alive ⇒ UP, none ⇒ DOWN
//!     → fallback itself errors ⇒ DOWN (warn)
//! ```
//!
//! # Design Decisions
//! - A probe never fails the batch: every outcome resolves to a status
//! - Total probe failure reports DOWN; an unreachable probe path is no
//!   evidence of a healthy service
//! - Each probe is individually time-boxed; there is no retry

pub mod process;
pub mod supervisor;

use std::collections::HashMap;
use std::time::Duration;

use thiserror::Error;

use crate::config::ProbeConfig;
use crate::model::Status;
use crate::observability::metrics;

/// Errors internal to a single probe attempt. None of these escape
/// [`ServiceProber::probe`]; they decide the fallback path and the logged
/// warning.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("probe timed out after {0:?}")]
    Timeout(Duration),

    #[error("service supervisor unavailable on this host")]
    MechanismUnavailable,

    #[error("probe failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Determines the current UP/DOWN state of one named service.
pub struct ServiceProber {
    timeout: Duration,
    aliases: HashMap<String, Vec<String>>,
}

impl ServiceProber {
    pub fn new(config: &ProbeConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.timeout_secs),
            aliases: config.aliases.clone(),
        }
    }

    /// Probe one service. Infallible by design: every failure mode maps to
    /// a status, and only the happy supervisor path can report UP.
    pub async fn probe(&self, service: &str) -> Status {
        let status = match supervisor::unit_is_active(service, self.timeout).await {
            Ok(true) => Status::Up,
            Ok(false) => Status::Down,
            Err(ProbeError::MechanismUnavailable) => {
                tracing::debug!(
                    service = %service,
                    "Service supervisor unavailable; falling back to process check"
                );
                self.probe_processes(service).await
            }
            Err(e) => {
                tracing::warn!(service = %service, error = %e, "Probe failed; reporting DOWN");
                Status::Down
            }
        };

        metrics::record_probe(service, status);
        status
    }

    async fn probe_processes(&self, service: &str) -> Status {
        let own_name = [service.to_string()];
        let candidates = self
            .aliases
            .get(service)
            .map(Vec::as_slice)
            .unwrap_or(&own_name);

        match process::any_alive(candidates, self.timeout).await {
            Ok(true) => Status::Up,
            Ok(false) => Status::Down,
            Err(e) => {
                tracing::warn!(
                    service = %service,
                    error = %e,
                    "Process fallback failed; reporting DOWN"
                );
                Status::Down
            }
        }
    }
}
