#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the flood dashboard.
//!
//! These types are serialized to JSON for the REST API and rendered by the
//! terminal report. They are separate from the record and aggregate types
//! to allow independent evolution of the API contract.

use chrono::NaiveDate;
use flood_map_analytics_models::{GeoPoint, MonthCount, NameCount, Summary, YearCount};
use flood_map_disaster_models::DisasterRecord;
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Always `true` while the process is serving.
    pub healthy: bool,
    /// Crate version.
    pub version: String,
}

/// Selector choices available in the loaded data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiFilters {
    /// Distinct years, first-appearance order.
    pub years: Vec<i32>,
    /// Distinct cities, first-appearance order.
    pub cities: Vec<String>,
}

/// Query parameters for the dashboard and map endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQueryParams {
    /// Year, or `all` / absent for every year.
    pub year: Option<String>,
    /// City, or `all` / absent for every city.
    pub city: Option<String>,
}

/// The selection a dashboard was computed for. `None` means all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSelection {
    /// Selected year.
    pub year: Option<i32>,
    /// Selected city.
    pub city: Option<String>,
}

/// One row of the preview table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRecord {
    /// Event date.
    pub date: NaiveDate,
    /// Province.
    pub province: String,
    /// City.
    pub city: String,
    /// Disaster type label.
    pub disaster_type: String,
    /// Cause, if recorded.
    pub cause: Option<String>,
    /// Deaths.
    pub death: u64,
    /// Damaged houses.
    pub damaged_house: u64,
}

impl From<&DisasterRecord> for ApiRecord {
    fn from(record: &DisasterRecord) -> Self {
        Self {
            date: record.date,
            province: record.province.clone(),
            city: record.city.clone(),
            disaster_type: record.disaster_type.clone(),
            cause: record.cause.clone(),
            death: record.death,
            damaged_house: record.damaged_house,
        }
    }
}

/// The four chart series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCharts {
    /// Cities with the most incidents in the selection.
    pub top_cities: Vec<NameCount>,
    /// Incidents per year over the whole dataset.
    pub per_year: Vec<YearCount>,
    /// Incidents per month of the year over the whole dataset.
    pub per_month: Vec<MonthCount>,
    /// Most frequent causes in the selection.
    pub top_causes: Vec<NameCount>,
}

/// Initial map viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMapCenter {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Web-map zoom level.
    pub zoom: u8,
}

/// Map markers plus the companion coordinate table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMap {
    /// Starting viewport.
    pub center: ApiMapCenter,
    /// One marker per mapped city.
    pub markers: Vec<GeoPoint>,
    /// Coordinate table rows.
    pub coordinate_rows: Vec<GeoPoint>,
}

/// Everything the dashboard shows for one selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDashboard {
    /// The selection applied.
    pub selection: ApiSelection,
    /// Headline metrics.
    pub summary: Summary,
    /// First rows of the selection.
    pub preview: Vec<ApiRecord>,
    /// Chart series.
    pub charts: ApiCharts,
    /// Map data.
    pub map: ApiMap,
}

/// Machine-readable error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ApiErrorKind {
    /// The extracted CSV does not exist.
    MissingFile,
    /// Loading or aggregating failed for another reason.
    Presentation,
    /// A selector value is not present in the data.
    InvalidSelection,
}

/// Error body returned by data endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Error category.
    pub error: ApiErrorKind,
    /// Human-readable description.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_is_camel_case() {
        let body = ApiError {
            error: ApiErrorKind::MissingFile,
            message: "gone".to_string(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["error"], "missingFile");
        assert_eq!(json["message"], "gone");
    }

    #[test]
    fn query_params_are_optional() {
        let params: DashboardQueryParams = serde_json::from_str("{}").unwrap();
        assert!(params.year.is_none());
        assert!(params.city.is_none());
    }
}
