#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Municipality boundary extents and map viewport types.
//!
//! These are the geometry-derived values the map layer hands to the
//! renderer: bounding boxes to fly to and the default viewport to return
//! to. The polygons themselves stay inside the boundary store.

use serde::{Deserialize, Serialize};

/// Padding applied around a region's bounds when focusing on it (5% on
/// every side).
pub const FOCUS_PADDING: f64 = 0.05;

/// Axis-aligned bounding box in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    /// Western edge (minimum longitude).
    pub min_lon: f64,
    /// Southern edge (minimum latitude).
    pub min_lat: f64,
    /// Eastern edge (maximum longitude).
    pub max_lon: f64,
    /// Northern edge (maximum latitude).
    pub max_lat: f64,
}

impl Bounds {
    /// Creates bounds from two opposite corners given as `(lon, lat)`.
    #[must_use]
    pub const fn from_corners(a: (f64, f64), b: (f64, f64)) -> Self {
        Self {
            min_lon: a.0.min(b.0),
            min_lat: a.1.min(b.1),
            max_lon: a.0.max(b.0),
            max_lat: a.1.max(b.1),
        }
    }

    /// Grows the box by `ratio` of its width and height on each side.
    #[must_use]
    pub fn pad(self, ratio: f64) -> Self {
        let width_buffer = (self.max_lon - self.min_lon).abs() * ratio;
        let height_buffer = (self.max_lat - self.min_lat).abs() * ratio;

        Self {
            min_lon: self.min_lon - width_buffer,
            min_lat: self.min_lat - height_buffer,
            max_lon: self.max_lon + width_buffer,
            max_lat: self.max_lat + height_buffer,
        }
    }

    /// Smallest box containing both `self` and `other`.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self {
            min_lon: self.min_lon.min(other.min_lon),
            min_lat: self.min_lat.min(other.min_lat),
            max_lon: self.max_lon.max(other.max_lon),
            max_lat: self.max_lat.max(other.max_lat),
        }
    }

    /// Center of the box as `(lat, lon)`.
    #[must_use]
    pub fn center(self) -> (f64, f64) {
        (
            f64::midpoint(self.min_lat, self.max_lat),
            f64::midpoint(self.min_lon, self.max_lon),
        )
    }
}

/// A map viewport (center and zoom level).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    /// Center latitude.
    pub center_lat: f64,
    /// Center longitude.
    pub center_lon: f64,
    /// Zoom level.
    pub zoom: u8,
}

impl Viewport {
    /// Lowest zoom the map allows.
    pub const MIN_ZOOM: u8 = 8;
    /// Highest zoom the map allows.
    pub const MAX_ZOOM: u8 = 12;

    /// Panning limits for the Palawan map.
    #[must_use]
    pub const fn max_bounds() -> Bounds {
        Bounds {
            min_lon: 116.5,
            min_lat: 7.5,
            max_lon: 121.0,
            max_lat: 12.5,
        }
    }
}

impl Default for Viewport {
    /// Province-wide view centered on Puerto Princesa.
    fn default() -> Self {
        Self {
            center_lat: 9.7394,
            center_lon: 118.7378,
            zoom: Self::MIN_ZOOM,
        }
    }
}
