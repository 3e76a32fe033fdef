#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Pangolin incident record types, status categories and reporting windows.
//!
//! Every report submitted through the dashboard ends up as one
//! [`IncidentRecord`]. The map layer only ever reads these records; it
//! never mutates them.

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Status category of a pangolin incident.
///
/// The wire representation (`snake_case`) matches the `status` column of
/// the hosted `pangolins` table.
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
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum IncidentCategory {
    /// A live pangolin was sighted or rescued.
    Alive,
    /// A pangolin carcass was found.
    Dead,
    /// Pangolins or scales seized from illegal trade.
    IllegalTrade,
    /// Evidence of poaching (snares, hunting camps, etc.).
    Poaching,
}

impl IncidentCategory {
    /// Human-readable label as shown in the admin console.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Alive => "Alive",
            Self::Dead => "Dead",
            Self::IllegalTrade => "Illegal Trades",
            Self::Poaching => "Poaching",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Alive, Self::Dead, Self::IllegalTrade, Self::Poaching]
    }
}

/// Time window used to filter incidents on the map ("last N months").
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u32", into = "u32")]
pub enum TimeWindow {
    /// Last 3 calendar months.
    ThreeMonths,
    /// Last 6 calendar months.
    #[default]
    SixMonths,
    /// Last 12 calendar months.
    TwelveMonths,
}

impl TimeWindow {
    /// Number of calendar months covered by this window.
    #[must_use]
    pub const fn months(self) -> u32 {
        match self {
            Self::ThreeMonths => 3,
            Self::SixMonths => 6,
            Self::TwelveMonths => 12,
        }
    }

    /// Creates a window from a month count.
    ///
    /// # Errors
    ///
    /// Returns an error if `months` is not one of 3, 6 or 12.
    pub const fn from_months(months: u32) -> Result<Self, InvalidTimeWindowError> {
        match months {
            3 => Ok(Self::ThreeMonths),
            6 => Ok(Self::SixMonths),
            12 => Ok(Self::TwelveMonths),
            _ => Err(InvalidTimeWindowError { months }),
        }
    }

    /// Earliest instant still inside the window.
    ///
    /// Uses calendar-month subtraction: the day of month is kept, clamped
    /// to the last day of the target month when it doesn't exist there.
    #[must_use]
    pub fn cutoff(self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_months(Months::new(self.months()))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Whether `at` falls inside the window ending at `now` (inclusive
    /// lower bound).
    #[must_use]
    pub fn contains(self, now: DateTime<Utc>, at: DateTime<Utc>) -> bool {
        at >= self.cutoff(now)
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::ThreeMonths, Self::SixMonths, Self::TwelveMonths]
    }
}

impl TryFrom<u32> for TimeWindow {
    type Error = InvalidTimeWindowError;

    fn try_from(months: u32) -> Result<Self, Self::Error> {
        Self::from_months(months)
    }
}

impl From<TimeWindow> for u32 {
    fn from(window: TimeWindow) -> Self {
        window.months()
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}m", self.months())
    }
}

/// Error returned when attempting to create a [`TimeWindow`] from an
/// unsupported month count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTimeWindowError {
    /// The month count that was provided.
    pub months: u32,
}

impl std::fmt::Display for InvalidTimeWindowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid time window of {} months: expected 3, 6 or 12",
            self.months
        )
    }
}

impl std::error::Error for InvalidTimeWindowError {}

/// A single pangolin incident as consumed by the map layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentRecord {
    /// Opaque backend identifier.
    pub id: String,
    /// Field tag (e.g. "PPC-001"), if one was assigned.
    pub tag_id: Option<String>,
    /// Municipality the incident was reported in.
    pub region_name: Option<String>,
    /// Status category.
    pub category: IncidentCategory,
    /// When the pangolin was found, if recorded.
    pub found_at: Option<DateTime<Utc>>,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
}

impl IncidentRecord {
    /// When the incident happened, falling back to the report creation
    /// time if the find time was not recorded.
    #[must_use]
    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.found_at.unwrap_or(self.created_at)
    }

    /// The trimmed region name, or `None` if it is missing or blank.
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.region_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}
