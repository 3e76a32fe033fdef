//! One map session: the immutable boundary set, the latest incident
//! snapshot, its aggregates and the user's interaction state.
//!
//! The incident list is replaced wholesale on every successful fetch. A
//! failed fetch keeps the previous snapshot and only flips the status, so
//! the map can keep showing stale data next to an error banner.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use gppg_analytics::{aggregate, classify, monthly_series, summarize};
use gppg_analytics_models::{
    CategoryCounts, DensityTier, MonthlyCount, RegionAggregate, WindowSummary,
};
use gppg_boundary::{BoundarySet, fetch};
use gppg_incident_models::{IncidentRecord, TimeWindow};
use gppg_source::config::{BoundaryConfig, DisplayConfig};
use gppg_source::{IncidentSource, SourceError};
use serde::Serialize;

use crate::LoadError;
use crate::interaction::{InteractionState, SearchOutcome, ViewportCommand};
use crate::search::{DEFAULT_SUGGESTION_LIMIT, NavigationKey, SuggestionList};
use crate::style::{self, Style};

/// Loads the boundary dataset described by `config`.
///
/// # Errors
///
/// Returns [`LoadError::Boundaries`] if the dataset is unreachable or
/// malformed.
pub async fn load_boundaries(
    client: &reqwest::Client,
    config: &BoundaryConfig,
) -> Result<BoundarySet, LoadError> {
    log::debug!("Loading boundaries from {}", config.location);
    Ok(fetch::load(client, &config.location, &config.name_property).await?)
}

/// State of the incident fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FetchStatus {
    /// Nothing fetched yet.
    #[default]
    Idle,
    /// A fetch is in flight.
    Pending,
    /// The last fetch succeeded.
    Ready,
    /// The last fetch failed. Any earlier snapshot is still in place.
    Failed {
        /// User-facing error message.
        message: String,
    },
}

/// Counts and styling of one region, as shown in the detail panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionDetail {
    /// Region name in display casing.
    pub region_name: String,
    /// Counts inside the active window (all zero when there are none).
    pub counts: CategoryCounts,
    /// Density tier of the total.
    pub tier: DensityTier,
    /// Style the region is currently drawn with.
    pub style: Style,
}

/// A single user's view of the density map.
#[derive(Debug)]
pub struct MapSession {
    boundaries: Arc<BoundarySet>,
    records: Vec<IncidentRecord>,
    aggregates: BTreeMap<String, RegionAggregate>,
    interaction: InteractionState,
    suggestions: SuggestionList,
    suggestion_limit: usize,
    status: FetchStatus,
    clock: fn() -> DateTime<Utc>,
    as_of: DateTime<Utc>,
    last_loaded_at: Option<DateTime<Utc>>,
}

impl MapSession {
    /// Creates a session with no incidents and the default time window.
    #[must_use]
    pub fn new(boundaries: impl Into<Arc<BoundarySet>>) -> Self {
        Self {
            boundaries: boundaries.into(),
            records: Vec::new(),
            aggregates: BTreeMap::new(),
            interaction: InteractionState::default(),
            suggestions: SuggestionList::default(),
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
            status: FetchStatus::Idle,
            clock: Utc::now,
            as_of: Utc::now(),
            last_loaded_at: None,
        }
    }

    /// Creates a session using the configured display defaults.
    #[must_use]
    pub fn from_config(boundaries: impl Into<Arc<BoundarySet>>, config: &DisplayConfig) -> Self {
        Self::new(boundaries)
            .with_time_window(config.default_window)
            .with_suggestion_limit(config.suggestion_limit)
    }

    /// Replaces the clock used to anchor time windows.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self.recompute();
        self
    }

    /// Sets the initial time window.
    #[must_use]
    pub fn with_time_window(mut self, window: TimeWindow) -> Self {
        self.interaction.set_time_window(window);
        self.recompute();
        self
    }

    /// Sets the maximum number of search suggestions.
    #[must_use]
    pub fn with_suggestion_limit(mut self, limit: usize) -> Self {
        self.suggestion_limit = limit;
        self
    }

    /// Marks a fetch as started.
    pub fn begin_fetch(&mut self) {
        self.status = FetchStatus::Pending;
    }

    /// Applies the outcome of an incident fetch.
    ///
    /// On success the snapshot is replaced and aggregates are rebuilt. On
    /// failure the previous snapshot is kept.
    ///
    /// # Errors
    ///
    /// Returns the fetch error wrapped in [`LoadError::Incidents`].
    pub fn apply_fetch(
        &mut self,
        result: Result<Vec<IncidentRecord>, SourceError>,
    ) -> Result<(), LoadError> {
        match result {
            Ok(records) => {
                log::info!("Loaded {} pangolin reports", records.len());
                self.records = records;
                self.status = FetchStatus::Ready;
                self.recompute();
                self.last_loaded_at = Some(self.as_of);
                Ok(())
            }
            Err(e) => {
                log::warn!(
                    "Incident fetch failed, keeping {} previous records: {e}",
                    self.records.len()
                );
                self.status = FetchStatus::Failed {
                    message: e.to_string(),
                };
                Err(e.into())
            }
        }
    }

    /// Fetches incidents from `source` and applies the result. Calling it
    /// again is the retry.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Incidents`] if the fetch fails.
    pub async fn refresh(&mut self, source: &dyn IncidentSource) -> Result<(), LoadError> {
        log::debug!("Refreshing incidents from {}", source.id());
        self.begin_fetch();
        let result = source.fetch_incidents().await;
        self.apply_fetch(result)
    }

    /// Dismisses the error banner of a failed fetch.
    pub fn dismiss_error(&mut self) {
        if matches!(self.status, FetchStatus::Failed { .. }) {
            self.status = if self.last_loaded_at.is_some() {
                FetchStatus::Ready
            } else {
                FetchStatus::Idle
            };
        }
    }

    /// Pointer entered a region. Unknown names are ignored.
    pub fn on_hover(&mut self, name: &str) {
        self.interaction.on_hover(&self.boundaries, name);
    }

    /// Pointer left the hovered region.
    pub fn on_unhover(&mut self) {
        self.interaction.on_unhover();
    }

    /// A region was clicked. Unknown names are ignored.
    pub fn on_click(&mut self, name: &str) {
        self.interaction.on_click(&self.boundaries, name);
    }

    /// Updates the search text and recomputes suggestions.
    pub fn set_search_query(&mut self, query: &str) {
        self.interaction.set_search_query(query);
        self.suggestions
            .update(&self.boundaries, query, self.suggestion_limit);
    }

    /// Submits a search and closes the suggestion list.
    pub fn on_search_submit(&mut self, query: &str) -> SearchOutcome {
        self.suggestions.close();
        self.interaction.on_search_submit(&self.boundaries, query)
    }

    /// Handles a key in the search box. `Enter` on a suggestion submits it.
    pub fn on_key(&mut self, key: NavigationKey) -> Option<SearchOutcome> {
        let pick = self.suggestions.handle_key(key)?;
        Some(self.on_search_submit(&pick))
    }

    /// Clears hover, selection, the search box and its suggestions.
    pub fn on_reset(&mut self) -> ViewportCommand {
        self.suggestions.clear();
        self.interaction.on_reset()
    }

    /// Switches the time window and rebuilds aggregates if it changed.
    pub fn set_time_window(&mut self, window: TimeWindow) {
        if self.interaction.set_time_window(window) {
            self.recompute();
        }
    }

    fn recompute(&mut self) {
        self.as_of = (self.clock)();
        self.aggregates = aggregate(&self.records, self.interaction.time_window(), self.as_of);
    }

    /// Style of the named region, or `None` if it has no boundary.
    #[must_use]
    pub fn style_for(&self, name: &str) -> Option<Style> {
        let feature = self.boundaries.lookup(name)?;
        Some(style::style_for(
            feature.name(),
            self.aggregates.get(feature.name()),
            &self.interaction,
        ))
    }

    /// Styles of every region, in sorted name order.
    #[must_use]
    pub fn styles(&self) -> Vec<(&str, Style)> {
        self.boundaries
            .all_names()
            .iter()
            .map(|name| {
                (
                    name.as_str(),
                    style::style_for(name, self.aggregates.get(name), &self.interaction),
                )
            })
            .collect()
    }

    /// Aggregate for a region name as reported on the incidents.
    #[must_use]
    pub fn aggregate_for(&self, name: &str) -> Option<&RegionAggregate> {
        self.aggregates.get(name)
    }

    /// Detail of the named region; zero counts when it has no incidents.
    #[must_use]
    pub fn region_detail(&self, name: &str) -> Option<RegionDetail> {
        let feature = self.boundaries.lookup(name)?;
        let counts = self
            .aggregates
            .get(feature.name())
            .map(|a| a.counts)
            .unwrap_or_default();

        Some(RegionDetail {
            region_name: feature.name().to_string(),
            counts,
            tier: classify(counts.total()),
            style: style::style_for(
                feature.name(),
                self.aggregates.get(feature.name()),
                &self.interaction,
            ),
        })
    }

    /// Detail of the selected region.
    #[must_use]
    pub fn selected_detail(&self) -> Option<RegionDetail> {
        self.region_detail(self.interaction.selected_region()?)
    }

    /// Province-wide summary of the active window.
    #[must_use]
    pub fn summary(&self) -> WindowSummary {
        summarize(&self.records, self.interaction.time_window(), self.as_of)
    }

    /// Monthly trend of the active window.
    #[must_use]
    pub fn monthly_series(&self) -> Vec<MonthlyCount> {
        monthly_series(&self.records, self.interaction.time_window(), self.as_of)
    }

    /// The immutable boundary set.
    #[must_use]
    pub fn boundaries(&self) -> &BoundarySet {
        &self.boundaries
    }

    /// Current incident snapshot.
    #[must_use]
    pub fn records(&self) -> &[IncidentRecord] {
        &self.records
    }

    /// Aggregates of the active window, keyed by reported region name.
    #[must_use]
    pub const fn aggregates(&self) -> &BTreeMap<String, RegionAggregate> {
        &self.aggregates
    }

    /// Hover, selection, search and window state.
    #[must_use]
    pub const fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    /// Suggestion dropdown under the search box.
    #[must_use]
    pub const fn suggestions(&self) -> &SuggestionList {
        &self.suggestions
    }

    /// State of the last incident fetch.
    #[must_use]
    pub const fn status(&self) -> &FetchStatus {
        &self.status
    }

    /// When the current snapshot was loaded.
    #[must_use]
    pub const fn last_loaded_at(&self) -> Option<DateTime<Utc>> {
        self.last_loaded_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{HOVER_STYLE, SELECTED_STYLE, density_style};
    use crate::test_support::{boundaries, now, record};
    use async_trait::async_trait;
    use gppg_boundary_models::Viewport;
    use gppg_incident_models::IncidentCategory;

    struct Fixed(Vec<IncidentRecord>);

    #[async_trait]
    impl IncidentSource for Fixed {
        fn id(&self) -> &'static str {
            "fixed"
        }

        fn name(&self) -> &'static str {
            "Fixed records"
        }

        async fn fetch_incidents(&self) -> Result<Vec<IncidentRecord>, SourceError> {
            Ok(self.0.clone())
        }
    }

    struct Down;

    #[async_trait]
    impl IncidentSource for Down {
        fn id(&self) -> &'static str {
            "down"
        }

        fn name(&self) -> &'static str {
            "Unreachable backend"
        }

        async fn fetch_incidents(&self) -> Result<Vec<IncidentRecord>, SourceError> {
            Err(SourceError::TableNotFound)
        }
    }

    fn counts(categories: &[IncidentCategory]) -> CategoryCounts {
        categories.iter().copied().collect()
    }

    fn scenario() -> Vec<IncidentRecord> {
        vec![
            record("1", "A", IncidentCategory::Dead, 31),
            record("2", "A", IncidentCategory::Alive, 1220),
            record("3", "B", IncidentCategory::Poaching, 61),
        ]
    }

    fn session() -> MapSession {
        MapSession::new(boundaries(&["A", "B"]))
            .with_clock(now)
            .with_time_window(TimeWindow::TwelveMonths)
    }

    #[test]
    fn end_to_end_twelve_month_window() {
        let mut session = session();
        session.apply_fetch(Ok(scenario())).unwrap();

        let a = session.aggregate_for("A").unwrap();
        assert_eq!(a.counts, counts(&[IncidentCategory::Dead]));
        assert_eq!(a.counts.alive(), 0);
        let b = session.aggregate_for("B").unwrap();
        assert_eq!(b.counts, counts(&[IncidentCategory::Poaching]));

        assert_eq!(session.style_for("A"), Some(density_style(1)));
        assert_eq!(session.region_detail("B").unwrap().tier, DensityTier::Low);
        assert_eq!(session.status(), &FetchStatus::Ready);
        assert_eq!(session.last_loaded_at(), Some(now()));
    }

    #[test]
    fn time_window_change_keeps_selection() {
        let mut session = session();
        session.apply_fetch(Ok(scenario())).unwrap();
        session.on_click("B");

        session.set_time_window(TimeWindow::ThreeMonths);
        assert!(session.aggregate_for("B").is_some());
        session.set_time_window(TimeWindow::TwelveMonths);
        assert_eq!(session.summary().record_count, 2);
        assert_eq!(session.interaction().selected_region(), Some("B"));
    }

    #[test]
    fn selected_detail_falls_back_to_zero_counts() {
        let mut session = MapSession::new(boundaries(&["A", "B", "C"])).with_clock(now);
        session.apply_fetch(Ok(scenario())).unwrap();

        assert_eq!(session.selected_detail(), None);
        session.on_click("c");
        let detail = session.selected_detail().unwrap();
        assert_eq!(detail.region_name, "C");
        assert_eq!(detail.counts, CategoryCounts::default());
        assert_eq!(detail.tier, DensityTier::None);
        assert_eq!(detail.style, SELECTED_STYLE);
    }

    #[test]
    fn styles_cover_every_boundary() {
        let mut session = session();
        session.apply_fetch(Ok(scenario())).unwrap();
        session.on_hover("B");

        let styles = session.styles();
        assert_eq!(styles.len(), 2);
        assert_eq!(styles[0], ("A", density_style(1)));
        assert_eq!(styles[1], ("B", HOVER_STYLE));
        assert_eq!(session.style_for("Atlantis"), None);
    }

    #[test]
    fn keyboard_enter_submits_search() {
        let mut session = MapSession::new(boundaries(&["Coron", "Culion", "Cuyo"]));
        session.set_search_query("cu");
        assert_eq!(session.suggestions().items(), ["Culion", "Cuyo"]);

        session.on_key(NavigationKey::Down);
        session.on_key(NavigationKey::Down);
        let outcome = session.on_key(NavigationKey::Enter).unwrap();
        assert!(matches!(outcome, SearchOutcome::Resolved { ref region, .. } if region == "Cuyo"));
        assert_eq!(session.interaction().selected_region(), Some("Cuyo"));
        assert_eq!(session.interaction().search_query(), "Cuyo");
        assert!(!session.suggestions().is_open());
    }

    #[test]
    fn reset_clears_search_box() {
        let mut session = MapSession::new(boundaries(&["Coron", "Culion"]));
        session.set_search_query("co");
        session.on_search_submit("co");
        session.on_hover("Culion");

        let command = session.on_reset();
        assert_eq!(
            command,
            ViewportCommand::FlyTo {
                viewport: Viewport::default()
            }
        );
        assert_eq!(session.interaction(), &InteractionState::default());
        assert!(session.suggestions().items().is_empty());
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_snapshot() {
        let mut session = session();
        session.refresh(&Fixed(scenario())).await.unwrap();
        assert_eq!(session.records().len(), 3);

        let err = session.refresh(&Down).await.unwrap_err();
        assert!(matches!(err, LoadError::Incidents(SourceError::TableNotFound)));
        assert_eq!(session.records().len(), 3);
        assert!(session.aggregate_for("A").is_some());
        assert!(matches!(session.status(), FetchStatus::Failed { message } if message.contains("not found")));

        session.dismiss_error();
        assert_eq!(session.status(), &FetchStatus::Ready);
    }

    #[tokio::test]
    async fn load_boundaries_reads_configured_file() {
        let path = std::env::temp_dir().join(format!("gppg_session_{}.geojson", std::process::id()));
        let text = serde_json::json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": { "ADM3_EN": "Coron" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[120.0, 11.8], [120.4, 11.8], [120.4, 12.2], [120.0, 12.2], [120.0, 11.8]]]
                }
            }]
        });
        std::fs::write(&path, text.to_string()).unwrap();

        let config = BoundaryConfig {
            location: path.display().to_string(),
            ..BoundaryConfig::default()
        };
        let set = load_boundaries(&reqwest::Client::new(), &config).await.unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(set.all_names(), ["Coron"]);

        let missing = BoundaryConfig {
            location: "/nonexistent/municipals.geojson".to_string(),
            ..BoundaryConfig::default()
        };
        assert!(matches!(
            load_boundaries(&reqwest::Client::new(), &missing).await,
            Err(LoadError::Boundaries(_))
        ));
    }

    #[tokio::test]
    async fn failed_first_fetch_dismisses_to_idle() {
        let mut session = session();
        assert!(session.refresh(&Down).await.is_err());
        assert!(session.records().is_empty());
        session.dismiss_error();
        assert_eq!(session.status(), &FetchStatus::Idle);
    }
}
