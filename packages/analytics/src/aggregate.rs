//! Buckets incident records by municipality and category.
//!
//! Aggregates are always rebuilt from scratch: the record list is small
//! (hundreds to low thousands of rows) and is replaced wholesale on every
//! fetch, so there is nothing to update incrementally.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};
use gppg_analytics_models::{CategoryCounts, MonthlyCount, RegionAggregate, WindowSummary};
use gppg_incident_models::{IncidentRecord, TimeWindow};

/// Aggregates `records` inside `window` (ending at `now`) by region name.
///
/// Records without a region are dropped. Region names are not checked
/// against the boundary set; unmatched names are still counted and simply
/// never drawn. The result is independent of input order.
#[must_use]
pub fn aggregate(
    records: &[IncidentRecord],
    window: TimeWindow,
    now: DateTime<Utc>,
) -> BTreeMap<String, RegionAggregate> {
    let mut aggregates: BTreeMap<String, RegionAggregate> = BTreeMap::new();

    for record in in_window(records, window, now) {
        let Some(region) = record.region() else {
            continue;
        };

        aggregates
            .entry(region.to_string())
            .or_insert_with(|| RegionAggregate::empty(region))
            .counts
            .record(record.category);
    }

    log::debug!(
        "Aggregated {} records into {} regions for the last {window}",
        records.len(),
        aggregates.len()
    );

    aggregates
}

/// Summarizes the records inside `window` across the whole province.
#[must_use]
pub fn summarize(
    records: &[IncidentRecord],
    window: TimeWindow,
    now: DateTime<Utc>,
) -> WindowSummary {
    let record_count = in_window(records, window, now).count();
    let aggregates = aggregate(records, window, now);

    let mut totals = CategoryCounts::default();
    for region in aggregates.values() {
        totals.merge(&region.counts);
    }

    WindowSummary {
        window,
        record_count,
        totals,
        regions_with_data: aggregates.values().filter(|a| a.counts.total() > 0).count(),
    }
}

/// Counts the records inside `window` per calendar month, oldest first.
///
/// Every month from the cutoff month through the month of `now` is
/// present, even when empty. Records without a region are included since
/// the trend is province-wide. Records dated after `now` are left out so
/// the series never extends past the current month.
#[must_use]
pub fn monthly_series(
    records: &[IncidentRecord],
    window: TimeWindow,
    now: DateTime<Utc>,
) -> Vec<MonthlyCount> {
    let mut months: BTreeMap<(i32, u32), CategoryCounts> = BTreeMap::new();

    let cutoff = window.cutoff(now);
    let (mut year, mut month) = (cutoff.year(), cutoff.month());
    while (year, month) <= (now.year(), now.month()) {
        months.insert((year, month), CategoryCounts::default());
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }

    for record in in_window(records, window, now) {
        let at = record.occurred_at();
        if at > now {
            continue;
        }
        months
            .entry((at.year(), at.month()))
            .or_default()
            .record(record.category);
    }

    months
        .into_iter()
        .map(|((year, month), counts)| MonthlyCount {
            period: format!("{year:04}-{month:02}"),
            counts,
        })
        .collect()
}

/// Records whose occurrence time falls inside `window`.
fn in_window(
    records: &[IncidentRecord],
    window: TimeWindow,
    now: DateTime<Utc>,
) -> impl Iterator<Item = &IncidentRecord> {
    let cutoff = window.cutoff(now);
    records.iter().filter(move |r| r.occurred_at() >= cutoff)
}
