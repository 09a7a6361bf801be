//! Status store subsystem.
//!
//! # Data Flow
//! ```text
//! StatusStore::connect
//!     → index.rs answers the connectivity ping
//!         → backed mode (search-index records, durable)
//!     → no endpoint answers
//!         → memory.rs (in-process records, lost on restart)
//!
//! put / list_all / find_latest_by_name
//!     → dispatched to whichever backend was selected
//! application_status
//!     → derived on the facade from find_latest_by_name, mode-independent
//! ```
//!
//! # Design Decisions
//! - Both backends implement one `ObservationStore` contract; callers never
//!   branch on the mode
//! - The mode is fixed at startup; later backend failures surface as
//!   per-call errors rather than flipping the store mid-run
//! - The only externally visible mode difference is the `mode` annotation
//!   on a put receipt (and that degraded records do not survive restart)
//! - Records are append-only and immutable once written

pub mod index;
pub mod memory;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::config::StoreConfig;
use crate::model::{self, Observation, Status};
use crate::observability::metrics;

pub use index::IndexedStore;
pub use memory::MemoryStore;

/// Upper bound on `list_all` responses.
pub const LIST_LIMIT: usize = 100;

/// Errors surfaced by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no reachable store endpoint: {0}")]
    Unreachable(String),

    #[error("store write failed: {0}")]
    Write(String),

    #[error("store query failed: {0}")]
    Query(String),

    #[error("failed to encode observation: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Which backend a store instance is running on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreMode {
    Indexed,
    Degraded,
}

impl StoreMode {
    pub fn is_indexed(&self) -> bool {
        matches!(self, StoreMode::Indexed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreMode::Indexed => "indexed",
            StoreMode::Degraded => "degraded",
        }
    }
}

impl std::fmt::Display for StoreMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of persisting one observation.
#[derive(Debug, Clone, Serialize)]
pub struct PutReceipt {
    /// Backend-assigned record identifier.
    pub id: String,

    /// Backend result verb, normally `created`.
    pub result: String,

    /// Annotated on the wire only when the store runs degraded.
    #[serde(skip_serializing_if = "StoreMode::is_indexed")]
    pub mode: StoreMode,
}

/// Application status derived from the latest per-service records.
///
/// Computed on every read; never persisted itself.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationHealth {
    pub application_name: String,
    pub application_status: Status,
    pub down_services: Vec<String>,
    pub timestamp: String,
}

/// Contract shared by both store backends.
#[async_trait]
pub trait ObservationStore: Send + Sync {
    /// Persist one observation, stamping a timestamp if the producer left
    /// it blank. Append-only; existing records are never touched.
    async fn put(&self, observation: Observation) -> Result<PutReceipt, StoreError>;

    /// All records, newest timestamp first, capped at [`LIST_LIMIT`].
    async fn list_all(&self) -> Result<Vec<Observation>, StoreError>;

    /// The single most recent record whose subject equals `name`.
    async fn find_latest_by_name(&self, name: &str) -> Result<Option<Observation>, StoreError>;

    fn mode(&self) -> StoreMode;
}

/// Facade over the selected backend.
pub struct StatusStore {
    inner: Box<dyn ObservationStore>,
}

impl StatusStore {
    /// Select a backend: the first configured endpoint that answers wins;
    /// if none does, fall back to in-process records. Never fails — backend
    /// unavailability is exactly what the degraded mode absorbs.
    pub async fn connect(config: &StoreConfig) -> Self {
        match IndexedStore::connect(config).await {
            Ok(store) => {
                tracing::info!(index = %config.index, "Connected to status store backend");
                Self {
                    inner: Box::new(store),
                }
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Store backend unreachable; recording observations in memory only"
                );
                Self::in_memory()
            }
        }
    }

    /// A store running degraded from the start. Used directly by tests and
    /// by anything that wants explicitly ephemeral records.
    pub fn in_memory() -> Self {
        Self {
            inner: Box::new(MemoryStore::new()),
        }
    }

    pub fn mode(&self) -> StoreMode {
        self.inner.mode()
    }

    pub async fn put(&self, observation: Observation) -> Result<PutReceipt, StoreError> {
        let result = self.inner.put(observation).await;
        metrics::record_store_write(self.inner.mode(), result.is_ok());
        result
    }

    pub async fn list_all(&self) -> Result<Vec<Observation>, StoreError> {
        self.inner.list_all().await
    }

    pub async fn find_latest_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Observation>, StoreError> {
        self.inner.find_latest_by_name(name).await
    }

    /// Derive the application status from current store contents: a service
    /// with no record at all, or whose latest record is DOWN, is down; the
    /// application is DOWN exactly when any service is.
    pub async fn application_status(
        &self,
        application_name: &str,
        services: &[String],
    ) -> Result<ApplicationHealth, StoreError> {
        let mut down_services = Vec::new();
        for service in services {
            let latest = self.find_latest_by_name(service).await?;
            match latest {
                Some(observation) if !observation.status().is_down() => {}
                _ => down_services.push(service.clone()),
            }
        }

        let application_status = if down_services.is_empty() {
            Status::Up
        } else {
            Status::Down
        };

        Ok(ApplicationHealth {
            application_name: application_name.to_string(),
            application_status,
            down_services,
            timestamp: model::now_rfc3339(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ServiceObservation;

    fn service(name: &str, status: Status, ts: &str) -> Observation {
        Observation::Service(ServiceObservation {
            service_name: name.to_string(),
            service_status: status,
            host_name: Some("h1".to_string()),
            timestamp: Some(ts.to_string()),
        })
    }

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[tokio::test]
    async fn one_down_service_is_contagious() {
        let store = StatusStore::in_memory();
        store
            .put(service("a", Status::Up, "2026-01-01T00:00:01Z"))
            .await
            .unwrap();
        store
            .put(service("b", Status::Down, "2026-01-01T00:00:02Z"))
            .await
            .unwrap();
        store
            .put(service("c", Status::Up, "2026-01-01T00:00:03Z"))
            .await
            .unwrap();

        let health = store
            .application_status("app1", &names(&["a", "b", "c"]))
            .await
            .unwrap();
        assert_eq!(health.application_status, Status::Down);
        assert_eq!(health.down_services, vec!["b"]);
    }

    #[tokio::test]
    async fn all_up_yields_up_and_empty_down_set() {
        let store = StatusStore::in_memory();
        for name in ["a", "b", "c"] {
            store
                .put(service(name, Status::Up, "2026-01-01T00:00:01Z"))
                .await
                .unwrap();
        }

        let health = store
            .application_status("app1", &names(&["a", "b", "c"]))
            .await
            .unwrap();
        assert_eq!(health.application_status, Status::Up);
        assert!(health.down_services.is_empty());
    }

    #[tokio::test]
    async fn unobserved_service_counts_as_down() {
        let store = StatusStore::in_memory();
        store
            .put(service("a", Status::Up, "2026-01-01T00:00:01Z"))
            .await
            .unwrap();

        let health = store
            .application_status("app1", &names(&["a", "ghost"]))
            .await
            .unwrap();
        assert_eq!(health.application_status, Status::Down);
        assert_eq!(health.down_services, vec!["ghost"]);
    }

    #[tokio::test]
    async fn only_the_latest_record_decides() {
        let store = StatusStore::in_memory();
        store
            .put(service("a", Status::Down, "2026-01-01T00:00:01Z"))
            .await
            .unwrap();
        store
            .put(service("a", Status::Up, "2026-01-01T00:00:02Z"))
            .await
            .unwrap();

        let health = store
            .application_status("app1", &names(&["a"]))
            .await
            .unwrap();
        assert_eq!(health.application_status, Status::Up);
    }

    #[test]
    fn receipt_mode_is_annotated_only_when_degraded() {
        let degraded = PutReceipt {
            id: "x".to_string(),
            result: "created".to_string(),
            mode: StoreMode::Degraded,
        };
        let encoded = serde_json::to_string(&degraded).unwrap();
        assert!(encoded.contains(r#""mode":"degraded""#));

        let indexed = PutReceipt {
            id: "x".to_string(),
            result: "created".to_string(),
            mode: StoreMode::Indexed,
        };
        let encoded = serde_json::to_string(&indexed).unwrap();
        assert!(!encoded.contains("mode"));
    }

    #[test]
    fn application_health_serializes_the_wire_shape() {
        let health = ApplicationHealth {
            application_name: "app1".to_string(),
            application_status: Status::Down,
            down_services: vec!["b".to_string()],
            timestamp: "2026-01-01T00:00:00Z".to_string(),
        };
        let value = serde_json::to_value(&health).unwrap();
        assert_eq!(value["application_status"], "DOWN");
        assert_eq!(value["down_services"][0], "b");
    }
}
