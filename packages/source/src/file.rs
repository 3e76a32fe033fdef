//! Incident source backed by a JSON export on disk.
//!
//! The file holds the same array of rows the hosted table returns, so an
//! export from the admin console can be mapped offline.

use std::path::PathBuf;

use async_trait::async_trait;
use gppg_incident_models::IncidentRecord;

use crate::supabase::parse_body;
use crate::{IncidentSource, SourceError};

/// Reads incident rows from a local JSON file.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Creates a source reading from `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl IncidentSource for FileSource {
    fn id(&self) -> &'static str {
        "file"
    }

    fn name(&self) -> &'static str {
        "Local incident export"
    }

    async fn fetch_incidents(&self) -> Result<Vec<IncidentRecord>, SourceError> {
        log::info!("Reading pangolin reports from {}", self.path.display());
        let body = tokio::fs::read_to_string(&self.path).await?;
        parse_body(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_rows_from_disk() {
        let path = std::env::temp_dir().join(format!("gppg_file_source_{}.json", std::process::id()));
        tokio::fs::write(
            &path,
            r#"[{ "id": 1, "municipality": "Cuyo", "status": "alive", "created_at": "2025-06-02" }]"#,
        )
        .await
        .unwrap();

        let records = FileSource::new(&path).fetch_incidents().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].region(), Some("Cuyo"));

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let result = FileSource::new("/nonexistent/gppg/pangolins.json")
            .fetch_incidents()
            .await;
        assert!(matches!(result, Err(SourceError::Io(_))));
    }
}
