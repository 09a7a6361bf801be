//! Per-observation JSON files.
//!
//! One pretty-printed file per observation, named
//! `{subject}-status-{YYYYMMDD-HHMMSS}.json`, for producers that keep a
//! local paper trail or hand results to an out-of-band uploader.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;

use crate::model::Observation;

#[derive(Debug, Error)]
pub enum WriterError {
    #[error("could not write status file: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not encode observation: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Writes observations into a fixed output directory.
pub struct StatusFileWriter {
    dir: PathBuf,
}

impl StatusFileWriter {
    /// Create the writer, making sure the output directory exists.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self, WriterError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write one observation; returns the path of the new file.
    pub fn write(&self, observation: &Observation) -> Result<PathBuf, WriterError> {
        let stamp = Utc::now().format("%Y%m%d-%H%M%S");
        let path = self
            .dir
            .join(format!("{}-status-{}.json", observation.subject_name(), stamp));

        fs::write(&path, serde_json::to_vec_pretty(observation)?)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ServiceObservation, Status};

    #[test]
    fn writes_a_pretty_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let writer = StatusFileWriter::create(dir.path()).unwrap();

        let observation = Observation::Service(ServiceObservation {
            service_name: "httpd".to_string(),
            service_status: Status::Up,
            host_name: Some("h1".to_string()),
            timestamp: Some("2026-01-29T10:30:00Z".to_string()),
        });

        let path = writer.write(&observation).unwrap();
        let file_name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(file_name.starts_with("httpd-status-"));
        assert!(file_name.ends_with(".json"));

        let content = fs::read_to_string(&path).unwrap();
        // Pretty-printed, and decodes back to the same record.
        assert!(content.contains('\n'));
        let decoded: Observation = serde_json::from_str(&content).unwrap();
        assert_eq!(decoded, observation);
    }

    #[test]
    fn creates_missing_output_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("status").join("out");
        let writer = StatusFileWriter::create(&nested).unwrap();
        assert!(writer.dir().is_dir());
    }
}
