#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Municipality boundary store.
//!
//! Loads the static municipal `GeoJSON` dataset once at startup and
//! indexes its polygons by lower-cased name. The resulting
//! [`BoundarySet`] is immutable; every other map component borrows it to
//! validate region names, resolve searches and compute fly-to extents.

pub mod fetch;
pub mod normalize;

use std::collections::BTreeMap;

use geo::{BoundingRect, MultiPolygon};
use geojson::GeoJson;
use gppg_boundary_models::Bounds;
use thiserror::Error;

use crate::normalize::NamedPolygon;

/// Property holding the municipality name in the PSA administrative
/// boundary dataset.
pub const DEFAULT_NAME_PROPERTY: &str = "ADM3_EN";

/// Errors that can occur while loading the boundary dataset.
#[derive(Debug, Error)]
pub enum BoundaryError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Reading the dataset from disk failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not valid `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// The document parsed but doesn't describe usable boundaries.
    #[error("Malformed boundary data: {message}")]
    Malformed {
        /// Description of what went wrong.
        message: String,
    },
}

/// A single municipality boundary.
#[derive(Debug, Clone)]
pub struct BoundaryFeature {
    name: String,
    polygon: MultiPolygon<f64>,
    bounds: Bounds,
}

impl BoundaryFeature {
    /// Region name in display casing.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Polygon geometry.
    #[must_use]
    pub const fn polygon(&self) -> &MultiPolygon<f64> {
        &self.polygon
    }

    /// Bounding box of the polygon.
    #[must_use]
    pub const fn bounds(&self) -> Bounds {
        self.bounds
    }
}

/// Immutable index of municipality boundaries.
#[derive(Debug, Clone)]
pub struct BoundarySet {
    /// lower-cased name -> feature
    features: BTreeMap<String, BoundaryFeature>,
    /// display names, sorted case-insensitively
    names: Vec<String>,
}

impl BoundarySet {
    /// Parses a `GeoJSON` `FeatureCollection` string.
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryError`] if the text is not `GeoJSON`, is not a
    /// `FeatureCollection`, or contains no named polygon features.
    pub fn from_geojson_str(text: &str, name_property: &str) -> Result<Self, BoundaryError> {
        let document: GeoJson = text.parse()?;
        let polygons = normalize::normalize_document(document, name_property)?;

        if polygons.is_empty() {
            return Err(BoundaryError::Malformed {
                message: format!("no polygon features with a '{name_property}' property"),
            });
        }

        let set = Self::from_polygons(polygons);
        log::info!("Loaded {} municipality boundaries", set.len());

        Ok(set)
    }

    /// Builds the index from already-normalized polygons.
    ///
    /// Polygons sharing a name (case-insensitively) are merged into one
    /// feature; the first spelling seen is kept for display.
    #[must_use]
    pub fn from_polygons(polygons: Vec<NamedPolygon>) -> Self {
        let mut features: BTreeMap<String, BoundaryFeature> = BTreeMap::new();

        for NamedPolygon { name, polygon } in polygons {
            let key = name.to_lowercase();
            let Some(bounds) = compute_bounds(&polygon) else {
                log::warn!("Boundary '{name}' has an empty polygon, skipping");
                continue;
            };

            match features.get_mut(&key) {
                Some(existing) => {
                    log::debug!("Merging duplicate boundary '{name}'");
                    existing.polygon.0.extend(polygon.0);
                    existing.bounds = existing.bounds.union(bounds);
                }
                None => {
                    features.insert(
                        key,
                        BoundaryFeature {
                            name,
                            polygon,
                            bounds,
                        },
                    );
                }
            }
        }

        let mut names: Vec<String> = features.values().map(|f| f.name.clone()).collect();
        names.sort_by(|a, b| {
            a.to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b))
        });

        Self { features, names }
    }

    /// All region names in display casing, sorted for stable UI ordering.
    #[must_use]
    pub fn all_names(&self) -> &[String] {
        &self.names
    }

    /// Case-insensitive exact lookup.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&BoundaryFeature> {
        self.features.get(&name.to_lowercase())
    }

    /// Iterates features in display-name order.
    pub fn iter(&self) -> impl Iterator<Item = &BoundaryFeature> {
        self.names.iter().filter_map(|name| self.lookup(name))
    }

    /// Number of regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the set has no regions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Extent of all regions combined.
    #[must_use]
    pub fn extent(&self) -> Option<Bounds> {
        self.features
            .values()
            .map(BoundaryFeature::bounds)
            .reduce(Bounds::union)
    }
}

/// Computes the bounding box of a [`MultiPolygon`].
fn compute_bounds(mp: &MultiPolygon<f64>) -> Option<Bounds> {
    mp.bounding_rect().map(|rect| {
        Bounds::from_corners((rect.min().x, rect.min().y), (rect.max().x, rect.max().y))
    })
}
