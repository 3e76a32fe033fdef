//! Feature styling for the density map.
//!
//! Precedence is selected, then hovered, then the density tier. The
//! palette is the maroon/rose theme used across the admin console.

use gppg_analytics::classify;
use gppg_analytics_models::{DensityTier, RegionAggregate};
use serde::Serialize;

use crate::interaction::InteractionState;

/// Stroke used for regions with data and for the selection.
pub const DATA_STROKE: &str = "#4a1d1f";
/// Stroke used for regions without data.
pub const NO_DATA_STROKE: &str = "#6b7280";

/// Visual style of one map feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    /// Polygon fill.
    pub fill_color: &'static str,
    /// Outline color.
    pub stroke_color: &'static str,
    /// Outline width in pixels.
    pub stroke_weight: f64,
    /// Fill opacity (0-1).
    pub fill_opacity: f64,
    /// Dash pattern of the outline, `None` for solid.
    pub dash_array: Option<&'static str>,
}

/// Style of the selected region.
pub const SELECTED_STYLE: Style = Style {
    fill_color: "#fecaca",
    stroke_color: DATA_STROKE,
    stroke_weight: 4.0,
    fill_opacity: 0.95,
    dash_array: Some("8, 4"),
};

/// Style of the hovered region (when it isn't selected).
pub const HOVER_STYLE: Style = Style {
    fill_color: "#fef2f2",
    stroke_color: "#7c2d12",
    stroke_weight: 3.0,
    fill_opacity: 0.95,
    dash_array: None,
};

/// Fill color for a density tier.
#[must_use]
pub const fn tier_fill_color(tier: DensityTier) -> &'static str {
    match tier {
        DensityTier::None => "#f8f9fa",
        DensityTier::Low => "#fdf2f8",
        DensityTier::Medium => "#fce7f3",
        DensityTier::High => "#f9a8d4",
        DensityTier::VeryHigh => "#ec4899",
    }
}

/// Style of a region that is neither selected nor hovered.
///
/// Regions with data get a darker, heavier outline and a more opaque fill
/// so they stand out from empty ones even in the lowest tier.
#[must_use]
pub const fn density_style(total: u64) -> Style {
    let has_data = total > 0;
    Style {
        fill_color: tier_fill_color(classify(total)),
        stroke_color: if has_data { DATA_STROKE } else { NO_DATA_STROKE },
        stroke_weight: if has_data { 2.5 } else { 1.5 },
        fill_opacity: if has_data { 0.95 } else { 0.7 },
        dash_array: None,
    }
}

/// Resolves the style of `region`.
///
/// `aggregate` is the region's counts in the active window, `None` when it
/// has no incidents.
#[must_use]
pub fn style_for(
    region: &str,
    aggregate: Option<&RegionAggregate>,
    interaction: &InteractionState,
) -> Style {
    if interaction.selected_region() == Some(region) {
        return SELECTED_STYLE;
    }
    if interaction.hovered_region() == Some(region) {
        return HOVER_STYLE;
    }

    density_style(aggregate.map_or(0, |a| a.counts.total()))
}
