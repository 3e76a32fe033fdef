//! Boundary dataset loading from a static asset URL or a local file.
//!
//! This is a one-shot load. A failure is returned to the caller, who
//! decides whether to retry; nothing here retries on its own.

use std::path::Path;

use crate::{BoundaryError, BoundarySet};

/// Loads the boundary dataset from `location`.
///
/// Locations starting with `http://` or `https://` are fetched over
/// HTTP; anything else is treated as a file path.
///
/// # Errors
///
/// Returns [`BoundaryError`] if the dataset is unreachable or malformed.
pub async fn load(
    client: &reqwest::Client,
    location: &str,
    name_property: &str,
) -> Result<BoundarySet, BoundaryError> {
    let text = if is_url(location) {
        fetch_text(client, location).await?
    } else {
        read_text(Path::new(location)).await?
    };

    BoundarySet::from_geojson_str(&text, name_property)
}

/// Fetches the `GeoJSON` document at `url`.
///
/// # Errors
///
/// Returns [`BoundaryError`] if the request fails or the server responds
/// with a non-success status.
pub async fn fetch_text(client: &reqwest::Client, url: &str) -> Result<String, BoundaryError> {
    log::info!("Fetching boundaries from {url}");

    let resp = client.get(url).send().await?;
    if !resp.status().is_success() {
        return Err(BoundaryError::Malformed {
            message: format!("GeoJSON request failed with status {}", resp.status()),
        });
    }

    Ok(resp.text().await?)
}

/// Reads the `GeoJSON` document at `path`.
///
/// # Errors
///
/// Returns [`BoundaryError::Io`] if the file can't be read.
pub async fn read_text(path: &Path) -> Result<String, BoundaryError> {
    log::info!("Reading boundaries from {}", path.display());
    Ok(tokio::fs::read_to_string(path).await?)
}

fn is_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_NAME_PROPERTY;
    use crate::test_fixtures::PALAWAN_NORTH;

    #[test]
    fn detects_urls() {
        assert!(is_url("https://example.org/maps/Municipals.geojson"));
        assert!(is_url("http://localhost:5173/maps/Municipals.geojson"));
        assert!(!is_url("maps/Municipals.geojson"));
        assert!(!is_url("/srv/gppg/Municipals.geojson"));
    }

    #[tokio::test]
    async fn loads_from_file() {
        let path = std::env::temp_dir().join(format!(
            "gppg_boundary_fetch_{}.geojson",
            std::process::id()
        ));
        tokio::fs::write(&path, PALAWAN_NORTH).await.unwrap();

        let client = reqwest::Client::new();
        let set = load(&client, &path.to_string_lossy(), DEFAULT_NAME_PROPERTY)
            .await
            .unwrap();
        assert_eq!(set.len(), 3);

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let client = reqwest::Client::new();
        let result = load(
            &client,
            "/nonexistent/gppg/Municipals.geojson",
            DEFAULT_NAME_PROPERTY,
        )
        .await;
        assert!(matches!(result, Err(BoundaryError::Io(_))));
    }
}
