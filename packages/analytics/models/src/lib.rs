#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Per-municipality aggregate and density types for the pangolin map.
//!
//! These values are always derived from the incident list; nothing here is
//! persisted. They are serialized to JSON for the map panel and the CLI.

use gppg_incident_models::{IncidentCategory, TimeWindow};
use serde::Serialize;
use strum_macros::{AsRefStr, Display};

/// Incident counts broken down by status category.
///
/// Counts can only grow through [`CategoryCounts::record`], which keeps
/// `total` equal to the sum of the four categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCounts {
    alive: u64,
    dead: u64,
    illegal_trade: u64,
    poaching: u64,
    total: u64,
}

impl CategoryCounts {
    /// Counts one incident of `category`.
    pub const fn record(&mut self, category: IncidentCategory) {
        match category {
            IncidentCategory::Alive => self.alive += 1,
            IncidentCategory::Dead => self.dead += 1,
            IncidentCategory::IllegalTrade => self.illegal_trade += 1,
            IncidentCategory::Poaching => self.poaching += 1,
        }
        self.total += 1;
    }

    /// Adds another set of counts into this one.
    pub const fn merge(&mut self, other: &Self) {
        self.alive += other.alive;
        self.dead += other.dead;
        self.illegal_trade += other.illegal_trade;
        self.poaching += other.poaching;
        self.total += other.total;
    }

    /// Count for a single category.
    #[must_use]
    pub const fn get(&self, category: IncidentCategory) -> u64 {
        match category {
            IncidentCategory::Alive => self.alive,
            IncidentCategory::Dead => self.dead,
            IncidentCategory::IllegalTrade => self.illegal_trade,
            IncidentCategory::Poaching => self.poaching,
        }
    }

    /// Live sightings.
    #[must_use]
    pub const fn alive(&self) -> u64 {
        self.alive
    }

    /// Carcasses found.
    #[must_use]
    pub const fn dead(&self) -> u64 {
        self.dead
    }

    /// Illegal trade seizures.
    #[must_use]
    pub const fn illegal_trade(&self) -> u64 {
        self.illegal_trade
    }

    /// Poaching evidence.
    #[must_use]
    pub const fn poaching(&self) -> u64 {
        self.poaching
    }

    /// Sum of all four categories.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }
}

impl FromIterator<IncidentCategory> for CategoryCounts {
    fn from_iter<I: IntoIterator<Item = IncidentCategory>>(iter: I) -> Self {
        let mut counts = Self::default();
        for category in iter {
            counts.record(category);
        }
        counts
    }
}

/// Incident counts for one municipality within the active time window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionAggregate {
    /// Region name as reported on the incidents.
    pub region_name: String,
    /// Counts by category.
    pub counts: CategoryCounts,
}

impl RegionAggregate {
    /// Creates an empty aggregate for `region_name`.
    #[must_use]
    pub fn empty(region_name: impl Into<String>) -> Self {
        Self {
            region_name: region_name.into(),
            counts: CategoryCounts::default(),
        }
    }
}

/// Visual intensity tier of a municipality on the density map.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Display,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DensityTier {
    /// No incidents.
    None,
    /// 1-2 incidents.
    Low,
    /// 3-5 incidents.
    Medium,
    /// 6-10 incidents.
    High,
    /// More than 10 incidents.
    VeryHigh,
}

impl DensityTier {
    /// Legend label for this tier.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "No Data",
            Self::Low => "1-2",
            Self::Medium => "3-5",
            Self::High => "6-10",
            Self::VeryHigh => "11+",
        }
    }

    /// Returns all variants of this enum, lowest first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::None,
            Self::Low,
            Self::Medium,
            Self::High,
            Self::VeryHigh,
        ]
    }
}

/// Province-wide summary of the incidents inside a time window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowSummary {
    /// Window the summary covers.
    pub window: TimeWindow,
    /// Records inside the window, including those without a region.
    pub record_count: usize,
    /// Counts across all regions.
    pub totals: CategoryCounts,
    /// Number of regions with at least one incident.
    pub regions_with_data: usize,
}

/// Incident counts for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCount {
    /// Period label (e.g. "2025-01").
    pub period: String,
    /// Counts by category.
    pub counts: CategoryCounts,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_tracks_every_category() {
        let counts: CategoryCounts = [
            IncidentCategory::Alive,
            IncidentCategory::Dead,
            IncidentCategory::Dead,
            IncidentCategory::IllegalTrade,
            IncidentCategory::Poaching,
        ]
        .into_iter()
        .collect();

        assert_eq!(counts.alive(), 1);
        assert_eq!(counts.dead(), 2);
        assert_eq!(counts.illegal_trade(), 1);
        assert_eq!(counts.poaching(), 1);
        assert_eq!(counts.total(), 5);
        let sum: u64 = IncidentCategory::all().iter().map(|c| counts.get(*c)).sum();
        assert_eq!(sum, counts.total());
    }

    #[test]
    fn merge_adds_counts() {
        let mut a: CategoryCounts = [IncidentCategory::Alive].into_iter().collect();
        let b: CategoryCounts = [IncidentCategory::Poaching, IncidentCategory::Alive]
            .into_iter()
            .collect();
        a.merge(&b);
        assert_eq!(a.alive(), 2);
        assert_eq!(a.poaching(), 1);
        assert_eq!(a.total(), 3);
    }

    #[test]
    fn serializes_camel_case() {
        let counts: CategoryCounts = [IncidentCategory::IllegalTrade].into_iter().collect();
        let json = serde_json::to_value(counts).unwrap();
        assert_eq!(json["illegalTrade"], 1);
        assert_eq!(json["total"], 1);
    }

    #[test]
    fn tiers_are_ordered() {
        let tiers = DensityTier::all();
        assert!(tiers.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(DensityTier::VeryHigh.as_ref(), "very_high");
        assert_eq!(DensityTier::VeryHigh.label(), "11+");
    }
}
