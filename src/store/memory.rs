//! Degraded-mode backend: an in-process append-only record log.
//!
//! # Responsibilities
//! - Honor the full store contract with no external backend
//! - Keep appends atomic under concurrent submitters
//!
//! # Design Decisions
//! - Records live in a mutex-guarded `Vec`; the lock is never held across
//!   an await point
//! - Ordering ties on equal timestamps keep insertion order, so the
//!   earliest-inserted record of a tie wins a latest-by-name lookup
//! - Data does not survive a process restart

use std::cmp::Ordering;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::DateTime;
use uuid::Uuid;

use crate::model::{self, Observation};
use crate::store::{ObservationStore, PutReceipt, StoreError, StoreMode, LIST_LIMIT};

struct StoredObservation {
    id: String,
    observation: Observation,
}

/// In-process store used whenever the search-index backend is unavailable.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<StoredObservation>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<StoredObservation>> {
        // The log is append-only, so it stays usable even if a writer
        // panicked mid-call.
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ObservationStore for MemoryStore {
    async fn put(&self, mut observation: Observation) -> Result<PutReceipt, StoreError> {
        observation.set_timestamp_if_missing(model::now_rfc3339());
        let id = Uuid::new_v4().to_string();

        self.lock().push(StoredObservation {
            id: id.clone(),
            observation,
        });

        Ok(PutReceipt {
            id,
            result: "created".to_string(),
            mode: StoreMode::Degraded,
        })
    }

    async fn list_all(&self) -> Result<Vec<Observation>, StoreError> {
        let mut observations: Vec<Observation> = self
            .lock()
            .iter()
            .map(|record| record.observation.clone())
            .collect();

        // Stable sort: equal timestamps keep insertion order.
        observations
            .sort_by(|a, b| compare_timestamps(b.timestamp(), a.timestamp()));
        observations.truncate(LIST_LIMIT);
        Ok(observations)
    }

    async fn find_latest_by_name(&self, name: &str) -> Result<Option<Observation>, StoreError> {
        let records = self.lock();
        let mut latest: Option<&Observation> = None;
        for observation in records
            .iter()
            .map(|record| &record.observation)
            .filter(|observation| observation.subject_name() == name)
        {
            let newer = match latest {
                None => true,
                // Strictly greater, so the earliest-inserted of a timestamp
                // tie keeps winning.
                Some(current) => {
                    compare_timestamps(observation.timestamp(), current.timestamp())
                        == Ordering::Greater
                }
            };
            if newer {
                latest = Some(observation);
            }
        }
        Ok(latest.cloned())
    }

    fn mode(&self) -> StoreMode {
        StoreMode::Degraded
    }
}

/// Compare two wire timestamps as instants where possible. Producers are
/// not forced onto one sub-second precision, and raw string comparison
/// misorders `...00Z` against `...00.5Z`.
fn compare_timestamps(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => {
            match (
                DateTime::parse_from_rfc3339(a),
                DateTime::parse_from_rfc3339(b),
            ) {
                (Ok(a_instant), Ok(b_instant)) => a_instant.cmp(&b_instant),
                _ => a.cmp(b),
            }
        }
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}
