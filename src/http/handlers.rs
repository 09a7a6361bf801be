//! HTTP API handlers.

use std::collections::HashSet;

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::http::response::{ApiError, HealthCheckResponse, ServiceStatusView, StatusResponse};
use crate::http::server::AppState;
use crate::model;
use crate::observability::metrics;

#[derive(Serialize)]
pub struct Liveness {
    pub status: &'static str,
    pub version: &'static str,
}

/// `GET /` — process liveness, nothing more.
pub async fn root() -> Json<Liveness> {
    Json(Liveness {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `POST /add` — accept one observation document as a file upload.
pub async fn add_observation(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<StatusResponse>), ApiError> {
    // The first part is the upload, whatever the producer named the field.
    let field = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart payload: {e}")))?
        .ok_or_else(|| ApiError::BadRequest("request carries no file upload".to_string()))?;

    let payload = field
        .bytes()
        .await
        .map_err(|e| ApiError::BadRequest(format!("could not read upload: {e}")))?;

    match state.gateway.submit(&payload).await {
        Ok(receipt) => {
            metrics::record_ingest("accepted");
            Ok((
                StatusCode::CREATED,
                Json(StatusResponse {
                    message: "Observation recorded".to_string(),
                    data: receipt,
                }),
            ))
        }
        Err(error) => {
            metrics::record_ingest("rejected");
            Err(error.into())
        }
    }
}

/// `GET /healthcheck` — application status plus the latest observation for
/// every subject ever seen.
pub async fn healthcheck_all(
    State(state): State<AppState>,
) -> Result<Json<HealthCheckResponse>, ApiError> {
    let application = state
        .store
        .application_status(&state.application_name, &state.services)
        .await?;

    // Newest-first scan; the first occurrence of a subject is its latest
    // record.
    let records = state.store.list_all().await?;
    let mut seen = HashSet::new();
    let mut services = Vec::new();
    for observation in &records {
        let name = observation.subject_name();
        if seen.insert(name.to_string()) {
            services.push(ServiceStatusView::from_observation(name, observation));
        }
    }

    Ok(Json(HealthCheckResponse {
        status: application.application_status,
        services,
        timestamp: model::now_rfc3339(),
    }))
}

/// `GET /healthcheck/{name}` — the latest observation for one subject.
pub async fn healthcheck_one(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ServiceStatusView>, ApiError> {
    let observation = state
        .store
        .find_latest_by_name(&name)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("service '{name}' not found")))?;

    Ok(Json(ServiceStatusView::from_observation(
        name,
        &observation,
    )))
}
