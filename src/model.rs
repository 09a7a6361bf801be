//! Observation wire types.
//!
//! # Responsibilities
//! - Define the service/application observation documents
//! - Preserve the external JSON field names used by producers
//! - Give the rest of the crate a uniform view (subject, status, kind)
//!
//! # Design Decisions
//! - `Observation` is an untagged enum: the document shape itself decides
//!   whether a record describes a service or the application, so externally
//!   submitted JSON needs no extra discriminant field
//! - Timestamps stay strings on the wire; producers may omit them and the
//!   store assigns one at write time

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Current UTC instant in the wire timestamp format: RFC3339 with a
/// trailing `Z`.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Liveness state of a service or application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Up,
    Down,
}

impl Status {
    pub fn is_down(self) -> bool {
        matches!(self, Status::Down)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Up => write!(f, "UP"),
            Status::Down => write!(f, "DOWN"),
        }
    }
}

/// Which kind of subject an observation describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservationKind {
    Service,
    Application,
}

/// One liveness fact about a single named service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceObservation {
    pub service_name: String,
    pub service_status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Application-level status derived from one probing round.
///
/// Embeds the per-service observations the derivation was based on; those
/// are also persisted as independent records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationObservation {
    pub application_name: String,
    pub application_status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub dependent_services: Vec<ServiceObservation>,
}

/// A persisted or submitted observation document.
///
/// Deserialization tries the application shape first; a document carrying
/// neither identifier field fails both variants and is rejected upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Observation {
    Application(ApplicationObservation),
    Service(ServiceObservation),
}

impl Observation {
    pub fn kind(&self) -> ObservationKind {
        match self {
            Observation::Service(_) => ObservationKind::Service,
            Observation::Application(_) => ObservationKind::Application,
        }
    }

    /// The service or application identifier this observation is about.
    pub fn subject_name(&self) -> &str {
        match self {
            Observation::Service(s) => &s.service_name,
            Observation::Application(a) => &a.application_name,
        }
    }

    pub fn status(&self) -> Status {
        match self {
            Observation::Service(s) => s.service_status,
            Observation::Application(a) => a.application_status,
        }
    }

    pub fn host_name(&self) -> Option<&str> {
        match self {
            Observation::Service(s) => s.host_name.as_deref(),
            Observation::Application(a) => a.host_name.as_deref(),
        }
    }

    pub fn timestamp(&self) -> Option<&str> {
        match self {
            Observation::Service(s) => s.timestamp.as_deref(),
            Observation::Application(a) => a.timestamp.as_deref(),
        }
    }

    /// Stamp the record at write time if the producer left it blank.
    pub fn set_timestamp_if_missing(&mut self, ts: impl Into<String>) {
        let slot = match self {
            Observation::Service(s) => &mut s.timestamp,
            Observation::Application(a) => &mut a.timestamp,
        };
        if slot.is_none() {
            *slot = Some(ts.into());
        }
    }
}

impl From<ServiceObservation> for Observation {
    fn from(obs: ServiceObservation) -> Self {
        Observation::Service(obs)
    }
}

impl From<ApplicationObservation> for Observation {
    fn from(obs: ApplicationObservation) -> Self {
        Observation::Application(obs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_document_deserializes() {
        let doc = r#"{"service_name":"httpd","service_status":"UP","host_name":"h1","timestamp":"2026-01-29T10:30:00Z"}"#;
        let obs: Observation = serde_json::from_str(doc).unwrap();
        assert_eq!(obs.kind(), ObservationKind::Service);
        assert_eq!(obs.subject_name(), "httpd");
        assert_eq!(obs.status(), Status::Up);
        assert_eq!(obs.host_name(), Some("h1"));
    }

    #[test]
    fn application_document_deserializes_with_dependents() {
        let doc = r#"{
            "application_name": "app1",
            "application_status": "DOWN",
            "host_name": "h1",
            "timestamp": "2026-01-29T10:30:00Z",
            "dependent_services": [
                {"service_name": "httpd", "service_status": "DOWN", "host_name": "h1"}
            ]
        }"#;
        let obs: Observation = serde_json::from_str(doc).unwrap();
        assert_eq!(obs.kind(), ObservationKind::Application);
        assert_eq!(obs.subject_name(), "app1");
        assert!(obs.status().is_down());
        match obs {
            Observation::Application(app) => assert_eq!(app.dependent_services.len(), 1),
            Observation::Service(_) => panic!("expected application variant"),
        }
    }

    #[test]
    fn document_without_identifier_is_rejected() {
        let doc = r#"{"status":"UP","host_name":"h1"}"#;
        assert!(serde_json::from_str::<Observation>(doc).is_err());
    }

    #[test]
    fn unknown_status_value_is_rejected() {
        let doc = r#"{"service_name":"httpd","service_status":"SORTA","host_name":"h1"}"#;
        assert!(serde_json::from_str::<Observation>(doc).is_err());
    }

    #[test]
    fn missing_timestamp_round_trips_as_absent() {
        let doc = r#"{"service_name":"httpd","service_status":"UP"}"#;
        let obs: Observation = serde_json::from_str(doc).unwrap();
        assert_eq!(obs.timestamp(), None);
        let encoded = serde_json::to_string(&obs).unwrap();
        assert!(!encoded.contains("timestamp"));
    }

    #[test]
    fn wire_timestamps_carry_a_trailing_z() {
        let ts = now_rfc3339();
        assert!(ts.ends_with('Z'), "unexpected timestamp format: {ts}");
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }

    #[test]
    fn timestamp_is_stamped_only_when_missing() {
        let mut obs: Observation = serde_json::from_str(
            r#"{"service_name":"httpd","service_status":"UP","timestamp":"2026-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        obs.set_timestamp_if_missing("2026-02-02T00:00:00Z");
        assert_eq!(obs.timestamp(), Some("2026-01-01T00:00:00Z"));

        let mut blank: Observation =
            serde_json::from_str(r#"{"service_name":"httpd","service_status":"UP"}"#).unwrap();
        blank.set_timestamp_if_missing("2026-02-02T00:00:00Z");
        assert_eq!(blank.timestamp(), Some("2026-02-02T00:00:00Z"));
    }
}
