#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Pangolin incident sources and map configuration.
//!
//! Each provider implements the [`IncidentSource`] trait to fetch the
//! report list and normalize it into [`IncidentRecord`]s. The map layer
//! treats the result as an injected snapshot; it never builds queries
//! itself.

pub mod config;
pub mod file;
pub mod parsing;
pub mod rows;
pub mod supabase;

use async_trait::async_trait;
use gppg_incident_models::IncidentRecord;

/// Errors that can occur while fetching incidents or loading config.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file is invalid.
    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// A required setting is missing.
    #[error("Missing setting: {name} is not set")]
    MissingSetting {
        /// Environment variable or key that must be provided.
        name: &'static str,
    },

    /// The reports table doesn't exist.
    #[error("Pangolins table not found. Please check your database setup.")]
    TableNotFound,

    /// The API key isn't allowed to read the reports table.
    #[error("Access denied. Please check your database permissions.")]
    PermissionDenied,

    /// The session token has expired.
    #[error("Authentication expired. Please sign in again.")]
    AuthExpired,

    /// Any other backend error.
    #[error("Database error: {message}")]
    Backend {
        /// Message reported by the backend.
        message: String,
    },

    /// The backend answered with something other than a list of rows.
    #[error("Invalid data format received from database")]
    InvalidFormat,
}

/// Trait that all incident sources must implement.
#[async_trait]
pub trait IncidentSource: Send + Sync {
    /// Returns a unique identifier for this source (e.g., `"supabase"`).
    fn id(&self) -> &str;

    /// Returns the human-readable name of this source.
    fn name(&self) -> &str;

    /// Fetches the full incident list, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the source is unreachable or returns data
    /// that can't be parsed.
    async fn fetch_incidents(&self) -> Result<Vec<IncidentRecord>, SourceError>;
}
