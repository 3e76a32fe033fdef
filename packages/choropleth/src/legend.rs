//! Legend rows for the density map.

use gppg_analytics_models::DensityTier;
use serde::Serialize;

use crate::style::{SELECTED_STYLE, density_style};

/// One row of the map legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendEntry {
    /// Text shown next to the swatch.
    pub label: &'static str,
    /// Swatch fill.
    pub fill_color: &'static str,
    /// Swatch border.
    pub stroke_color: &'static str,
}

/// Smallest incident total that falls into `tier`.
const fn tier_floor(tier: DensityTier) -> u64 {
    match tier {
        DensityTier::None => 0,
        DensityTier::Low => 1,
        DensityTier::Medium => 3,
        DensityTier::High => 6,
        DensityTier::VeryHigh => 11,
    }
}

/// Returns one entry per density tier, lowest first, followed by the
/// "Selected" entry.
#[must_use]
pub fn legend() -> Vec<LegendEntry> {
    DensityTier::all()
        .iter()
        .map(|&tier| {
            let style = density_style(tier_floor(tier));
            LegendEntry {
                label: tier.label(),
                fill_color: style.fill_color,
                stroke_color: style.stroke_color,
            }
        })
        .chain(std::iter::once(LegendEntry {
            label: "Selected",
            fill_color: SELECTED_STYLE.fill_color,
            stroke_color: SELECTED_STYLE.stroke_color,
        }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gppg_analytics::classify;

    #[test]
    fn legend_lists_tiers_then_selected() {
        let labels: Vec<_> = legend().iter().map(|e| e.label).collect();
        assert_eq!(labels, ["No Data", "1-2", "3-5", "6-10", "11+", "Selected"]);
    }

    #[test]
    fn legend_colors_match_map_styles() {
        let entries = legend();
        assert_eq!(entries[0].fill_color, "#f8f9fa");
        assert_eq!(entries[0].stroke_color, "#6b7280");
        assert_eq!(entries[4].fill_color, "#ec4899");
        assert_eq!(entries[4].stroke_color, "#4a1d1f");
        assert_eq!(entries[5].fill_color, "#fecaca");
    }

    #[test]
    fn tier_floors_agree_with_classification() {
        for &tier in DensityTier::all() {
            assert_eq!(classify(tier_floor(tier)), tier);
        }
    }
}
