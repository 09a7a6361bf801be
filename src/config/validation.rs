//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check monitored names are usable as record subjects
//! - Validate value ranges (timeouts > 0, URLs well-formed)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function: MonitorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;
use url::Url;

use crate::config::schema::MonitorConfig;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("monitoring.services is empty; nothing to probe")]
    NoServices,

    #[error("monitoring.services contains an empty name")]
    EmptyServiceName,

    #[error("monitoring.application_name is empty")]
    EmptyApplicationName,

    #[error("store.endpoints is empty")]
    NoStoreEndpoints,

    #[error("invalid store endpoint `{0}`: {1}")]
    BadStoreEndpoint(String, url::ParseError),

    #[error("invalid monitoring.ingest_url `{0}`: {1}")]
    BadIngestUrl(String, url::ParseError),

    #[error("probe.timeout_secs must be greater than zero")]
    ZeroProbeTimeout,

    #[error("schedule.interval_secs must be greater than zero")]
    ZeroScheduleInterval,

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,
}

/// Check a parsed configuration for semantic problems.
pub fn validate_config(config: &MonitorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.monitoring.services.is_empty() {
        errors.push(ValidationError::NoServices);
    }
    if config.monitoring.services.iter().any(|s| s.trim().is_empty()) {
        errors.push(ValidationError::EmptyServiceName);
    }
    if config.monitoring.application_name.trim().is_empty() {
        errors.push(ValidationError::EmptyApplicationName);
    }

    if config.store.endpoints.is_empty() {
        errors.push(ValidationError::NoStoreEndpoints);
    }
    for endpoint in &config.store.endpoints {
        if let Err(e) = Url::parse(endpoint) {
            errors.push(ValidationError::BadStoreEndpoint(endpoint.clone(), e));
        }
    }
    if let Some(url) = &config.monitoring.ingest_url {
        if let Err(e) = Url::parse(url) {
            errors.push(ValidationError::BadIngestUrl(url.clone(), e));
        }
    }

    if config.probe.timeout_secs == 0 {
        errors.push(ValidationError::ZeroProbeTimeout);
    }
    if config.schedule.enabled && config.schedule.interval_secs == 0 {
        errors.push(ValidationError::ZeroScheduleInterval);
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&MonitorConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_error() {
        let mut config = MonitorConfig::default();
        config.monitoring.services.clear();
        config.store.endpoints = vec!["not a url".to_string()];
        config.probe.timeout_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn rejects_blank_names() {
        let mut config = MonitorConfig::default();
        config.monitoring.services = vec!["httpd".to_string(), "  ".to_string()];
        config.monitoring.application_name = String::new();

        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::EmptyServiceName)));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::EmptyApplicationName)));
    }
}
