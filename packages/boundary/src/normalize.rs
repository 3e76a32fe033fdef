//! Normalizes raw `GeoJSON` features into named municipality polygons.
//!
//! Each feature's name is read from a configurable property (the
//! municipal dataset uses `ADM3_EN`). Features without a usable name or
//! without polygonal geometry are skipped.

use geo::MultiPolygon;
use geojson::{Feature, GeoJson};

use crate::BoundaryError;

/// A boundary polygon paired with its display name.
#[derive(Debug, Clone)]
pub struct NamedPolygon {
    /// Region name in display casing.
    pub name: String,
    /// Polygon geometry.
    pub polygon: MultiPolygon<f64>,
}

/// Extracts named polygons from a parsed `GeoJSON` document.
///
/// # Errors
///
/// Returns [`BoundaryError::Malformed`] if the document is not a
/// `FeatureCollection`.
pub fn normalize_document(
    document: GeoJson,
    name_property: &str,
) -> Result<Vec<NamedPolygon>, BoundaryError> {
    let GeoJson::FeatureCollection(collection) = document else {
        return Err(BoundaryError::Malformed {
            message: "expected a FeatureCollection".to_string(),
        });
    };

    let total = collection.features.len();
    let polygons: Vec<NamedPolygon> = collection
        .features
        .into_iter()
        .filter_map(|feature| normalize_feature(feature, name_property))
        .collect();

    if polygons.len() < total {
        log::warn!(
            "Skipped {} of {total} boundary features without a '{name_property}' name or polygon geometry",
            total - polygons.len()
        );
    }

    Ok(polygons)
}

/// Normalizes a single feature.
fn normalize_feature(feature: Feature, name_property: &str) -> Option<NamedPolygon> {
    let name = feature
        .property(name_property)
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())?
        .to_string();

    let Some(geometry) = feature.geometry else {
        log::debug!("Boundary '{name}' has no geometry");
        return None;
    };

    let polygon = to_multipolygon(geometry);
    if polygon.is_none() {
        log::debug!("Boundary '{name}' is not a polygon");
    }

    Some(NamedPolygon {
        name,
        polygon: polygon?,
    })
}

/// Converts a `GeoJSON` geometry into a [`MultiPolygon`].
/// Handles both `Polygon` and `MultiPolygon` geometry types.
fn to_multipolygon(geometry: geojson::Geometry) -> Option<MultiPolygon<f64>> {
    let geo_geom: geo::Geometry<f64> = geometry.try_into().ok()?;
    match geo_geom {
        geo::Geometry::MultiPolygon(mp) => Some(mp),
        geo::Geometry::Polygon(p) => Some(MultiPolygon(vec![p])),
        _ => None,
    }
}
