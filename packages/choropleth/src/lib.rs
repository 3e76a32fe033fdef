#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Municipality density map for pangolin incident reports.
//!
//! Ties the boundary store, the incident snapshot and the aggregation
//! engine together behind a [`MapSession`]: hover, click and search
//! events go in; per-region styles, viewport commands, legend entries and
//! summaries come out. Rendering itself is left to the caller.

pub mod export;
pub mod interaction;
pub mod legend;
pub mod search;
pub mod session;
pub mod style;

use gppg_boundary::BoundaryError;
use gppg_source::SourceError;
use thiserror::Error;

pub use interaction::{InteractionState, SearchOutcome, ViewportCommand};
pub use legend::{LegendEntry, legend};
pub use search::{NavigationKey, SuggestionList};
pub use session::{FetchStatus, MapSession, RegionDetail, load_boundaries};
pub use style::{Style, style_for};

/// Errors that can occur while loading map data.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The boundary dataset couldn't be loaded.
    #[error(transparent)]
    Boundaries(#[from] BoundaryError),

    /// The incident list couldn't be fetched.
    #[error(transparent)]
    Incidents(#[from] SourceError),
}
