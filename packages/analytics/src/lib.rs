#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregations and selection logic behind the flood dashboard.
//!
//! [`selector`] turns the year and city choices into a [`FilteredView`]
//! over the loaded records, always derived from the full set. [`aggregate`]
//! holds the pure functions that turn records into chart series, summary
//! metrics, and map markers. Nothing here mutates the records.

pub mod aggregate;
pub mod selector;

pub use selector::{CitySelection, FilteredView, Selection, YearSelection};
use thiserror::Error;

/// Errors that can occur resolving a selection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalyticsError {
    /// The year text is not a number.
    #[error("Invalid year '{value}'")]
    InvalidYear {
        /// The raw input.
        value: String,
    },

    /// No record falls in the requested year.
    #[error("Year {year} is not present in the data")]
    UnknownYear {
        /// The requested year.
        year: i32,
    },

    /// No record names the requested city.
    #[error("City '{city}' is not present in the data")]
    UnknownCity {
        /// The requested city.
        city: String,
    },
}
