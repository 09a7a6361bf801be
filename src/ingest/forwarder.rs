//! Client side of the ingestion contract.
//!
//! Used by a monitor running disconnected from the store: each observation
//! is uploaded as a multipart JSON file to a remote `/add` endpoint.

use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::model::Observation;

#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("could not encode observation: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("upload failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("remote ingest endpoint answered {0}")]
    Rejected(StatusCode),
}

/// Uploads observations to a remote ingestion endpoint.
pub struct RemoteForwarder {
    client: Client,
    url: String,
}

impl RemoteForwarder {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    pub async fn submit(&self, observation: &Observation) -> Result<(), ForwardError> {
        let body = serde_json::to_vec_pretty(observation)?;
        let part = Part::bytes(body)
            .file_name(format!("{}-status.json", observation.subject_name()))
            .mime_str("application/json")?;
        let form = Form::new().part("file", part);

        let response = self.client.post(&self.url).multipart(form).send().await?;
        if !response.status().is_success() {
            return Err(ForwardError::Rejected(response.status()));
        }

        tracing::debug!(url = %self.url, "Forwarded observation");
        Ok(())
    }
}
