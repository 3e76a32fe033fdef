//! Hosted backend (`Supabase` / `PostgREST`) incident source.
//!
//! Issues a single `GET {url}/rest/v1/{table}` request ordered by
//! `found_at` descending, the same query the admin map runs. There is no
//! automatic retry: a failed fetch is reported once and the caller decides
//! whether to try again.

use async_trait::async_trait;
use gppg_incident_models::IncidentRecord;
use serde::Deserialize;

use crate::rows::{PangolinRow, SELECT_COLUMNS, normalize_rows};
use crate::{IncidentSource, SourceError};

/// Maximum length of the response body preview included in error logs.
const BODY_PREVIEW_LEN: usize = 500;

/// Incident source backed by the hosted `pangolins` table.
pub struct SupabaseSource {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    table: String,
}

impl SupabaseSource {
    /// Creates a source for `table` on the project at `base_url`.
    #[must_use]
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            table: table.into(),
        }
    }

    /// REST endpoint for the table.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }
}

/// Error body returned by `PostgREST`.
#[derive(Debug, Default, Deserialize)]
struct PostgrestError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Maps a `PostgREST` error code and message onto a [`SourceError`].
#[must_use]
pub fn classify_backend_error(code: Option<&str>, message: &str) -> SourceError {
    match code {
        Some("PGRST116") => SourceError::TableNotFound,
        Some("42501") => SourceError::PermissionDenied,
        _ if message.contains("JWT") => SourceError::AuthExpired,
        _ => SourceError::Backend {
            message: message.to_string(),
        },
    }
}

/// Parses a successful response body into records.
///
/// # Errors
///
/// Returns [`SourceError::InvalidFormat`] if the body isn't a JSON array
/// of rows.
pub fn parse_body(body: &str) -> Result<Vec<IncidentRecord>, SourceError> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    if !value.is_array() {
        return Err(SourceError::InvalidFormat);
    }
    let rows: Vec<PangolinRow> = serde_json::from_value(value)?;
    Ok(normalize_rows(rows))
}

#[async_trait]
impl IncidentSource for SupabaseSource {
    fn id(&self) -> &'static str {
        "supabase"
    }

    fn name(&self) -> &'static str {
        "Hosted pangolin reports"
    }

    async fn fetch_incidents(&self) -> Result<Vec<IncidentRecord>, SourceError> {
        let url = self.endpoint();
        log::info!("Fetching pangolin reports from {url}");

        let response = self
            .client
            .get(&url)
            .query(&[("select", SELECT_COLUMNS), ("order", "found_at.desc")])
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let preview = body.chars().take(BODY_PREVIEW_LEN).collect::<String>();
            log::error!("Backend request failed\n  url: {url}\n  status: {status}\n  body: {preview}");

            let error: PostgrestError = serde_json::from_str(&body).unwrap_or_default();
            let message = error
                .message
                .unwrap_or_else(|| format!("request failed with status {status}"));
            return Err(classify_backend_error(error.code.as_deref(), &message));
        }

        parse_body(&body)
    }
}
