//! Observation construction.

use crate::model::{self, ApplicationObservation, ServiceObservation, Status};

/// Builds observation records stamped with this host's identity and the
/// current UTC time. The hostname is resolved once at construction.
#[derive(Debug, Clone)]
pub struct ObservationBuilder {
    host: String,
}

impl ObservationBuilder {
    /// Resolve the local hostname. Falls back to a fixed marker rather
    /// than failing startup — observations from an unnamed host are still
    /// observations.
    pub fn from_host() -> Self {
        let host = match hostname::get() {
            Ok(name) => name.to_string_lossy().into_owned(),
            Err(e) => {
                tracing::warn!(error = %e, "Could not resolve hostname");
                "unknown".to_string()
            }
        };
        Self { host }
    }

    pub fn with_host(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn service(&self, name: &str, status: Status) -> ServiceObservation {
        ServiceObservation {
            service_name: name.to_string(),
            service_status: status,
            host_name: Some(self.host.clone()),
            timestamp: Some(model::now_rfc3339()),
        }
    }

    /// Build the application record for one round. DOWN is contagious: any
    /// dependent DOWN makes the application DOWN.
    pub fn application(
        &self,
        name: &str,
        dependent_services: Vec<ServiceObservation>,
    ) -> ApplicationObservation {
        let application_status = if dependent_services
            .iter()
            .any(|service| service.service_status.is_down())
        {
            Status::Down
        } else {
            Status::Up
        };

        ApplicationObservation {
            application_name: name.to_string(),
            application_status,
            host_name: Some(self.host.clone()),
            timestamp: Some(model::now_rfc3339()),
            dependent_services,
        }
    }
}
