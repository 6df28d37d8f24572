#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregate result types for the flood dashboard.
//!
//! Every chart series, the summary metrics, and the map markers are plain
//! serializable values so the terminal report and the HTTP API render the
//! same numbers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Incidents in one calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearCount {
    /// Calendar year.
    pub year: i32,
    /// Number of incidents.
    pub count: u64,
}

/// Incidents in one month of the year, across all years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthCount {
    /// Month, `1..=12`.
    pub month: u32,
    /// Number of incidents.
    pub count: u64,
}

/// Incidents sharing one label (a city or a cause).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameCount {
    /// Group label.
    pub name: String,
    /// Number of incidents.
    pub count: u64,
}

/// A mapped city with its incident count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    /// City name.
    pub city: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Number of incidents.
    pub count: u64,
    /// Marker radius in screen pixels.
    pub radius: f64,
}

/// Headline metrics for the current selection plus dataset context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Incidents in the selection.
    pub incidents: u64,
    /// Deaths in the selection.
    pub deaths: u64,
    /// Damaged houses in the selection.
    pub damaged_houses: u64,
    /// Records in the whole dataset.
    pub dataset_size: u64,
    /// Earliest date in the whole dataset.
    pub first_date: Option<NaiveDate>,
    /// Latest date in the whole dataset.
    pub last_date: Option<NaiveDate>,
    /// Distinct cities in the whole dataset.
    pub distinct_cities: u64,
}
