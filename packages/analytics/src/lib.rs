#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident aggregation, density classification and trend summaries.
//!
//! Everything in this crate is a pure function of the incident list, the
//! selected [`TimeWindow`](gppg_incident_models::TimeWindow) and the
//! current time. Empty inputs are valid and produce empty results.

pub mod aggregate;
pub mod density;

pub use aggregate::{aggregate, monthly_series, summarize};
pub use density::classify;
