//! Observation ingestion.
//!
//! # Responsibilities
//! - Accept externally-submitted observation documents
//! - Reject what cannot become a valid record before any state changes
//! - Route accepted documents into the status store
//!
//! # Design Decisions
//! - Malformed JSON and schema problems are distinct client errors;
//!   neither mutates any state
//! - This gateway is the only write path open to external producers; the
//!   co-located round talks to the store directly

pub mod forwarder;

use std::sync::Arc;

use thiserror::Error;

use crate::model::Observation;
use crate::store::{PutReceipt, StatusStore, StoreError};

pub use forwarder::{ForwardError, RemoteForwarder};

/// Errors surfaced to submitters.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("payload is not valid JSON: {0}")]
    MalformedInput(#[source] serde_json::Error),

    #[error("document carries no service or application identifier")]
    SchemaViolation,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Validates and stores externally-submitted observation documents.
pub struct IngestGateway {
    store: Arc<StatusStore>,
}

impl IngestGateway {
    pub fn new(store: Arc<StatusStore>) -> Self {
        Self { store }
    }

    /// Parse, check and persist one submitted document.
    pub async fn submit(&self, payload: &[u8]) -> Result<PutReceipt, IngestError> {
        let document: serde_json::Value =
            serde_json::from_slice(payload).map_err(IngestError::MalformedInput)?;

        // Valid JSON that doesn't decode as an observation is a schema
        // problem, not a parse problem.
        let observation: Observation =
            serde_json::from_value(document).map_err(|_| IngestError::SchemaViolation)?;

        if observation.subject_name().trim().is_empty() {
            return Err(IngestError::SchemaViolation);
        }

        let receipt = self.store.put(observation).await?;
        tracing::info!(id = %receipt.id, "Accepted submitted observation");
        Ok(receipt)
    }
}
