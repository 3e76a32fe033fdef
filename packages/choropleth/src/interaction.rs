//! Hover, selection and search state of the municipality map.
//!
//! Hover and selection are independent: hovering another region never
//! clears the selection, and only a click, a resolved search or a reset
//! changes it. Every name stored here is a display name taken from the
//! [`BoundarySet`]; names that don't resolve are ignored.

use gppg_boundary::BoundarySet;
use gppg_boundary_models::{Bounds, FOCUS_PADDING, Viewport};
use gppg_incident_models::TimeWindow;
use serde::Serialize;

use crate::search;

/// Camera movement requested from the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewportCommand {
    /// Fit the map to these bounds.
    FlyToBounds {
        /// Target extent, already padded.
        bounds: Bounds,
    },
    /// Move to a fixed center and zoom.
    FlyTo {
        /// Target viewport.
        viewport: Viewport,
    },
}

/// Result of submitting a search query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SearchOutcome {
    /// The query resolved to a region, which is now selected.
    Resolved {
        /// Display name of the selected region.
        region: String,
        /// Camera movement to focus the region.
        viewport: ViewportCommand,
    },
    /// Nothing matched; state is unchanged.
    NoMatch,
}

/// Per-session interaction state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionState {
    hovered_region: Option<String>,
    selected_region: Option<String>,
    search_query: String,
    time_window: TimeWindow,
}

impl InteractionState {
    /// Creates an idle state with the given time window.
    #[must_use]
    pub fn new(time_window: TimeWindow) -> Self {
        Self {
            time_window,
            ..Self::default()
        }
    }

    /// Region under the pointer.
    #[must_use]
    pub fn hovered_region(&self) -> Option<&str> {
        self.hovered_region.as_deref()
    }

    /// Selected region.
    #[must_use]
    pub fn selected_region(&self) -> Option<&str> {
        self.selected_region.as_deref()
    }

    /// Text in the search box.
    #[must_use]
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Active time window.
    #[must_use]
    pub const fn time_window(&self) -> TimeWindow {
        self.time_window
    }

    /// Pointer entered a region. Unknown names are ignored.
    pub fn on_hover(&mut self, boundaries: &BoundarySet, name: &str) {
        match boundaries.lookup(name) {
            Some(feature) => self.hovered_region = Some(feature.name().to_string()),
            None => log::debug!("Ignoring hover over unknown region '{name}'"),
        }
    }

    /// Pointer left the hovered region.
    pub fn on_unhover(&mut self) {
        self.hovered_region = None;
    }

    /// A region was clicked. Unknown names are ignored.
    pub fn on_click(&mut self, boundaries: &BoundarySet, name: &str) {
        match boundaries.lookup(name) {
            Some(feature) => self.selected_region = Some(feature.name().to_string()),
            None => log::debug!("Ignoring click on unknown region '{name}'"),
        }
    }

    /// The search box text changed.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    /// Submits `query` as a search.
    ///
    /// On a match the region is selected, the query is kept and a padded
    /// fly-to is requested. A miss leaves the state untouched.
    pub fn on_search_submit(&mut self, boundaries: &BoundarySet, query: &str) -> SearchOutcome {
        let Some(feature) = search::resolve(boundaries, query) else {
            log::debug!("Search '{query}' matched no region");
            return SearchOutcome::NoMatch;
        };

        self.search_query = query.to_string();
        self.selected_region = Some(feature.name().to_string());
        SearchOutcome::Resolved {
            region: feature.name().to_string(),
            viewport: ViewportCommand::FlyToBounds {
                bounds: feature.bounds().pad(FOCUS_PADDING),
            },
        }
    }

    /// Clears hover, selection and the search query, and requests the
    /// default viewport. The time window is kept.
    pub fn on_reset(&mut self) -> ViewportCommand {
        self.hovered_region = None;
        self.selected_region = None;
        self.search_query.clear();

        ViewportCommand::FlyTo {
            viewport: Viewport::default(),
        }
    }

    /// Changes the time window. Returns whether it actually changed, i.e.
    /// whether aggregates need rebuilding.
    pub fn set_time_window(&mut self, window: TimeWindow) -> bool {
        let changed = self.time_window != window;
        self.time_window = window;
        changed
    }
}
