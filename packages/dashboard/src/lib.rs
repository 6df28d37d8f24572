#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Flood dashboard over the extracted West Java flood CSV.
//!
//! Loads the extracted records once, then recomputes the whole dashboard
//! (summary metrics, preview, four chart series, map markers) for every
//! year/city selection. Two front-ends share that computation: an
//! Actix-Web JSON API ([`run_server`]) and a terminal report
//! ([`report`], [`interactive`]). Load failures never bring either down;
//! they are reported in place of the data.

mod handlers;
pub mod interactive;
pub mod map;
pub mod report;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use flood_map_analytics::{
    AnalyticsError, CitySelection, Selection, YearSelection,
    aggregate::{self, COORDINATE_ROWS, PREVIEW_ROWS, TOP_CAUSES, TOP_CITIES},
    selector,
};
use flood_map_dashboard_models::{
    ApiCharts, ApiDashboard, ApiErrorKind, ApiFilters, ApiMap, ApiMapCenter, ApiRecord,
    ApiSelection,
};
use flood_map_disaster_models::DisasterRecord;
use flood_map_extract::{ExtractError, dataset::Dataset};
use flood_map_geography::CoordinateTable;
use thiserror::Error;

/// Environment variable overriding the data file path.
pub const DATA_ENV: &str = "FLOOD_MAP_DATA";

/// Environment variable naming a replacement coordinate table.
pub const COORDINATES_ENV: &str = "FLOOD_MAP_COORDINATES";

/// Errors surfaced by the dashboard.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The extracted CSV does not exist.
    #[error("Data file {} not found; run the extractor first", path.display())]
    MissingFile {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// Any other load or aggregation failure.
    #[error("Unable to present data: {message}")]
    Presentation {
        /// Description of the underlying failure.
        message: String,
    },

    /// A selector value is malformed or absent from the data.
    #[error("Invalid selection: {0}")]
    InvalidSelection(#[from] AnalyticsError),
}

impl DashboardError {
    /// API error category for this error.
    #[must_use]
    pub const fn kind(&self) -> ApiErrorKind {
        match self {
            Self::MissingFile { .. } => ApiErrorKind::MissingFile,
            Self::Presentation { .. } => ApiErrorKind::Presentation,
            Self::InvalidSelection(_) => ApiErrorKind::InvalidSelection,
        }
    }
}

/// Where the dashboard reads its inputs from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Extracted flood CSV.
    pub data_path: PathBuf,
    /// Replacement coordinate table; the embedded West Java table if `None`.
    pub coordinates_path: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: flood_map_extract::paths::default_output_path(),
            coordinates_path: None,
        }
    }
}

/// Loads the extracted CSV.
///
/// # Errors
///
/// Returns [`DashboardError::MissingFile`] if `path` does not exist and
/// [`DashboardError::Presentation`] for any other failure.
pub fn load_dataset(path: &Path) -> Result<Dataset, DashboardError> {
    Dataset::load(path).map_err(|e| match e {
        ExtractError::Io(ref io) if io.kind() == std::io::ErrorKind::NotFound => {
            DashboardError::MissingFile {
                path: path.to_path_buf(),
            }
        }
        other => DashboardError::Presentation {
            message: other.to_string(),
        },
    })
}

/// Loads the coordinate table from `path`, or the embedded default.
///
/// # Errors
///
/// Returns [`DashboardError::Presentation`] if the table cannot be read.
pub fn load_coordinates(path: Option<&Path>) -> Result<CoordinateTable, DashboardError> {
    CoordinateTable::load_or_default(path).map_err(|e| DashboardError::Presentation {
        message: e.to_string(),
    })
}

/// Selector choices present in `records`.
#[must_use]
pub fn filters(records: &[DisasterRecord]) -> ApiFilters {
    ApiFilters {
        years: selector::year_options(records),
        cities: selector::city_options(records),
    }
}

/// Computes every dashboard panel for `selection`.
///
/// The city, cause, map and metric panels follow the selection; the year
/// and month trends always cover the whole record set.
#[must_use]
pub fn build_dashboard(
    records: &[DisasterRecord],
    selection: &Selection,
    table: &CoordinateTable,
) -> ApiDashboard {
    let view = selection.apply(records);

    ApiDashboard {
        selection: ApiSelection {
            year: match selection.year {
                YearSelection::All => None,
                YearSelection::Year(year) => Some(year),
            },
            city: match &selection.city {
                CitySelection::All => None,
                CitySelection::City(city) => Some(city.clone()),
            },
        },
        summary: aggregate::summarize(&view, records),
        preview: aggregate::preview(&view, PREVIEW_ROWS)
            .into_iter()
            .map(ApiRecord::from)
            .collect(),
        charts: ApiCharts {
            top_cities: aggregate::top_cities(&view, TOP_CITIES),
            per_year: aggregate::count_by_year(records),
            per_month: aggregate::count_by_month(records),
            top_causes: aggregate::top_causes(&view, TOP_CAUSES),
        },
        map: ApiMap {
            center: ApiMapCenter {
                latitude: table.center.latitude,
                longitude: table.center.longitude,
                zoom: table.center.zoom,
            },
            markers: aggregate::geo_join(&view, table),
            coordinate_rows: aggregate::coordinate_rows(&view, table, COORDINATE_ROWS),
        },
    }
}

/// Parses and validates raw selector values against `records`.
///
/// # Errors
///
/// Returns [`DashboardError::InvalidSelection`] for a malformed year or a
/// value that does not occur in the data.
pub fn resolve_selection(
    records: &[DisasterRecord],
    year: Option<&str>,
    city: Option<&str>,
) -> Result<Selection, DashboardError> {
    let selection = Selection::parse(year, city)?;
    selection.validate(records)?;
    Ok(selection)
}

/// Shared application state.
pub struct AppState {
    /// The loaded records, or why they could not be loaded.
    pub dataset: Result<Arc<Dataset>, DashboardError>,
    /// City coordinates for the map.
    pub coordinates: Arc<CoordinateTable>,
}

impl AppState {
    /// Loads the dataset and coordinate table named by `config`.
    ///
    /// A dataset failure is kept in the state and reported per request.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError`] if the coordinate table cannot be loaded.
    pub fn load(config: &DashboardConfig) -> Result<Self, DashboardError> {
        let coordinates = load_coordinates(config.coordinates_path.as_deref())?;
        let dataset = load_dataset(&config.data_path).map(Arc::new);
        if let Err(e) = &dataset {
            log::error!("{e}");
        }

        Ok(Self {
            dataset,
            coordinates: Arc::new(coordinates),
        })
    }
}

/// Starts the dashboard API server.
///
/// Loads the data named by `config` and serves it under `/api`. Binds to
/// `BIND_ADDR` (default `127.0.0.1`) and `PORT` (default `8080`). The
/// caller provides the async runtime; see [`serve_blocking`].
///
/// # Errors
///
/// Returns an `std::io::Result` error if the coordinate table cannot be
/// loaded, or the HTTP server fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: DashboardConfig) -> std::io::Result<()> {
    log::info!("Loading dashboard data from {}", config.data_path.display());
    let state = web::Data::new(AppState::load(&config).map_err(std::io::Error::other)?);

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(web::scope("/api").configure(handlers::configure))
    })
    .bind((bind_addr, port))?
    .run()
    .await
}

/// Runs [`run_server`] on a fresh Actix system, blocking until it stops.
///
/// # Errors
///
/// See [`run_server`].
pub fn serve_blocking(config: DashboardConfig) -> std::io::Result<()> {
    actix_rt::System::new().block_on(run_server(config))
}
