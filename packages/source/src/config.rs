//! Map configuration.
//!
//! Configuration is TOML. The defaults ship embedded in the binary
//! (`config/default.toml`); a user file only needs the keys it changes.
//! Secrets never live in the file: the backend API key comes from the
//! environment.

use std::path::Path;

use gppg_incident_models::TimeWindow;
use serde::{Deserialize, Serialize};

use crate::SourceError;
use crate::supabase::SupabaseSource;

/// Embedded default configuration.
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../config/default.toml");

/// Overrides `backend.url`.
pub const ENV_BACKEND_URL: &str = "SUPABASE_URL";
/// Supplies the backend API key.
pub const ENV_BACKEND_KEY: &str = "SUPABASE_ANON_KEY";
/// Overrides `boundaries.location`.
pub const ENV_BOUNDARIES: &str = "GPPG_BOUNDARIES";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Where the municipal boundaries come from.
    pub boundaries: BoundaryConfig,
    /// Hosted backend holding the incident reports.
    pub backend: BackendConfig,
    /// Map display defaults.
    pub map: DisplayConfig,
}

/// Boundary dataset settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryConfig {
    /// File path or `http(s)` URL of the `GeoJSON` dataset.
    pub location: String,
    /// Feature property holding the municipality name.
    pub name_property: String,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            location: "maps/Municipals.geojson".to_string(),
            name_property: "ADM3_EN".to_string(),
        }
    }
}

/// Hosted backend settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Project URL (e.g. `https://xyz.supabase.co`).
    pub url: String,
    /// Table holding the reports.
    pub table: String,
    /// API key, only ever read from the environment.
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            table: "pangolins".to_string(),
            api_key: None,
        }
    }
}

/// Map display defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Time window selected when the map opens.
    #[serde(rename = "default_window_months")]
    pub default_window: TimeWindow,
    /// Maximum number of search suggestions.
    pub suggestion_limit: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            default_window: TimeWindow::SixMonths,
            suggestion_limit: 8,
        }
    }
}

impl MapConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Config`] if the TOML is invalid.
    pub fn from_toml_str(text: &str) -> Result<Self, SourceError> {
        Ok(toml::from_str(text)?)
    }

    /// Loads the configuration from `path` (or the embedded defaults) and
    /// applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the file can't be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, SourceError> {
        let mut config = match path {
            Some(path) => {
                log::info!("Loading configuration from {}", path.display());
                Self::from_toml_str(&std::fs::read_to_string(path)?)?
            }
            None => Self::from_toml_str(DEFAULT_CONFIG_TOML)?,
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Applies overrides from a key lookup (normally the environment).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_BACKEND_URL).filter(|v| !v.is_empty()) {
            self.backend.url = url;
        }
        if let Some(key) = lookup(ENV_BACKEND_KEY).filter(|v| !v.is_empty()) {
            self.backend.api_key = Some(key);
        }
        if let Some(location) = lookup(ENV_BOUNDARIES).filter(|v| !v.is_empty()) {
            self.boundaries.location = location;
        }
    }

    /// Builds the hosted incident source.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::MissingSetting`] if the backend URL or API
    /// key is not configured.
    pub fn incident_source(&self, client: reqwest::Client) -> Result<SupabaseSource, SourceError> {
        if self.backend.url.is_empty() {
            return Err(SourceError::MissingSetting {
                name: ENV_BACKEND_URL,
            });
        }
        let Some(api_key) = &self.backend.api_key else {
            return Err(SourceError::MissingSetting {
                name: ENV_BACKEND_KEY,
            });
        };

        Ok(SupabaseSource::new(
            client,
            self.backend.url.clone(),
            api_key.clone(),
            self.backend.table.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_defaults_match_default_impl() {
        let config = MapConfig::from_toml_str(DEFAULT_CONFIG_TOML).unwrap();
        assert_eq!(config, MapConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = MapConfig::from_toml_str(
            r#"
            [map]
            default_window_months = 12
            "#,
        )
        .unwrap();
        assert_eq!(config.map.default_window, TimeWindow::TwelveMonths);
        assert_eq!(config.map.suggestion_limit, 8);
        assert_eq!(config.boundaries.name_property, "ADM3_EN");
    }

    #[test]
    fn rejects_unsupported_window() {
        let result = MapConfig::from_toml_str("[map]\ndefault_window_months = 5\n");
        assert!(matches!(result, Err(SourceError::Config(_))));
    }

    #[test]
    fn environment_overrides_apply() {
        let mut config = MapConfig::default();
        config.apply_overrides(|key| match key {
            ENV_BACKEND_URL => Some("https://abc.supabase.co".to_string()),
            ENV_BACKEND_KEY => Some("anon".to_string()),
            _ => None,
        });

        assert_eq!(config.backend.url, "https://abc.supabase.co");
        assert_eq!(config.backend.api_key.as_deref(), Some("anon"));
        assert_eq!(config.boundaries.location, "maps/Municipals.geojson");
    }

    #[test]
    fn incident_source_requires_url_and_key() {
        let mut config = MapConfig::default();
        assert!(matches!(
            config.incident_source(reqwest::Client::new()),
            Err(SourceError::MissingSetting { name: ENV_BACKEND_URL })
        ));

        config.backend.url = "https://abc.supabase.co".to_string();
        assert!(matches!(
            config.incident_source(reqwest::Client::new()),
            Err(SourceError::MissingSetting { name: ENV_BACKEND_KEY })
        ));

        config.backend.api_key = Some("anon".to_string());
        let source = config.incident_source(reqwest::Client::new()).unwrap();
        assert_eq!(source.endpoint(), "https://abc.supabase.co/rest/v1/pangolins");
    }
}
