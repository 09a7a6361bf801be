//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! monitor. All types derive Serde traits for deserialization from config
//! files.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Root configuration for the status monitor.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MonitorConfig {
    /// Listener configuration (bind address, body limits).
    pub listener: ListenerConfig,

    /// Status store backend settings.
    pub store: StoreConfig,

    /// Service probe settings.
    pub probe: ProbeConfig,

    /// Scheduled probing round settings.
    pub schedule: ScheduleConfig,

    /// What to monitor and where round output goes.
    pub monitoring: MonitoringConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,

    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
            max_body_bytes: 2 * 1024 * 1024,
        }
    }
}

/// Status store backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Backend endpoints, tried in order until one answers.
    pub endpoints: Vec<String>,

    /// Index holding observation records.
    pub index: String,

    /// Optional basic-auth username.
    pub username: Option<String>,

    /// Optional basic-auth password.
    pub password: Option<String>,

    /// Per-request timeout against the backend in seconds.
    pub request_timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            endpoints: vec!["http://localhost:9200".to_string()],
            index: "service-status".to_string(),
            username: None,
            password: None,
            request_timeout_secs: 5,
        }
    }
}

/// Service probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Per-probe timeout in seconds.
    pub timeout_secs: u64,

    /// Fallback process names per service, used when the service
    /// supervisor is not available on the host.
    pub aliases: HashMap<String, Vec<String>>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 5,
            aliases: default_aliases(),
        }
    }
}

/// Stock alias map for the default service set.
pub fn default_aliases() -> HashMap<String, Vec<String>> {
    let mut aliases = HashMap::new();
    aliases.insert(
        "httpd".to_string(),
        vec!["httpd".to_string(), "apache2".to_string()],
    );
    aliases.insert(
        "rabbitmq-server".to_string(),
        vec!["rabbitmq".to_string(), "beam.smp".to_string()],
    );
    aliases.insert(
        "postgresql".to_string(),
        vec!["postgres".to_string(), "postgresql".to_string()],
    );
    aliases
}

/// Scheduled probing round configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Enable the periodic probing round.
    pub enabled: bool,

    /// Round interval in seconds.
    pub interval_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 60,
        }
    }
}

/// What to monitor and where round output goes.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MonitoringConfig {
    /// Service units whose liveness is tracked.
    pub services: Vec<String>,

    /// Name of the composite application derived from the services.
    pub application_name: String,

    /// Directory for per-observation JSON files; disabled when unset.
    pub output_dir: Option<PathBuf>,

    /// Remote ingestion endpoint for a monitor running disconnected from
    /// the store; observations from each round are uploaded there.
    pub ingest_url: Option<String>,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            services: vec![
                "httpd".to_string(),
                "rabbitmq-server".to_string(),
                "postgresql".to_string(),
            ],
            application_name: "app1".to_string(),
            output_dir: None,
            ingest_url: None,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
