//! Response shapes and error mapping for the HTTP API.
//!
//! # Design Decisions
//! - Error bodies are `{"detail": ...}` with the appropriate status code
//! - Every handler error funnels through `ApiError`; unexpected internal
//!   failures become plain 500s so one bad request never takes the
//!   process down

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::ingest::IngestError;
use crate::model::{Observation, Status};
use crate::store::{PutReceipt, StoreError};

/// Body of a successful `/add`.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub message: String,
    pub data: PutReceipt,
}

/// Body of `/healthcheck`.
#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: Status,
    pub services: Vec<ServiceStatusView>,
    pub timestamp: String,
}

/// One subject's latest known state, as shown to API consumers.
#[derive(Debug, Serialize)]
pub struct ServiceStatusView {
    pub name: String,
    pub status: Status,
    pub host: Option<String>,
    pub timestamp: Option<String>,
}

impl ServiceStatusView {
    pub fn from_observation(name: impl Into<String>, observation: &Observation) -> Self {
        Self {
            name: name.into(),
            status: observation.status(),
            host: observation.host_name().map(str::to_string),
            timestamp: observation.timestamp().map(str::to_string),
        }
    }
}

/// Handler-level errors with their HTTP mapping.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

impl From<IngestError> for ApiError {
    fn from(error: IngestError) -> Self {
        match error {
            IngestError::MalformedInput(_) | IngestError::SchemaViolation => {
                ApiError::BadRequest(error.to_string())
            }
            IngestError::Store(inner) => ApiError::Internal(inner.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        ApiError::Internal(error.to_string())
    }
}
