//! HTTP handler functions for the flood dashboard API.

use actix_web::{HttpResponse, web};
use flood_map_analytics::aggregate;
use flood_map_dashboard_models::{ApiError, ApiErrorKind, ApiHealth, DashboardQueryParams};
use flood_map_extract::dataset::Dataset;

use crate::{AppState, DashboardError, build_dashboard, filters as list_filters, map};

/// Registers the API routes on a `/api` scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/filters", web::get().to(filters))
        .route("/dashboard", web::get().to(dashboard))
        .route("/map", web::get().to(map_markers));
}

/// Renders `err` as a JSON error body with a matching status code.
fn error_response(err: &DashboardError) -> HttpResponse {
    let body = ApiError {
        error: err.kind(),
        message: err.to_string(),
    };
    match body.error {
        ApiErrorKind::MissingFile => {
            log::warn!("{err}");
            HttpResponse::NotFound().json(body)
        }
        ApiErrorKind::InvalidSelection => {
            log::debug!("{err}");
            HttpResponse::BadRequest().json(body)
        }
        ApiErrorKind::Presentation => {
            log::error!("{err}");
            HttpResponse::InternalServerError().json(body)
        }
    }
}

fn loaded(state: &AppState) -> Result<&Dataset, HttpResponse> {
    state
        .dataset
        .as_deref()
        .map_err(error_response)
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/filters`
///
/// Lists the years and cities present in the data.
pub async fn filters(state: web::Data<AppState>) -> HttpResponse {
    match loaded(&state) {
        Ok(dataset) => HttpResponse::Ok().json(list_filters(&dataset.records)),
        Err(response) => response,
    }
}

/// `GET /api/dashboard?year=&city=`
///
/// Computes every dashboard panel for the selection.
pub async fn dashboard(
    state: web::Data<AppState>,
    params: web::Query<DashboardQueryParams>,
) -> HttpResponse {
    let dataset = match loaded(&state) {
        Ok(dataset) => dataset,
        Err(response) => return response,
    };

    match crate::resolve_selection(
        &dataset.records,
        params.year.as_deref(),
        params.city.as_deref(),
    ) {
        Ok(selection) => HttpResponse::Ok().json(build_dashboard(
            &dataset.records,
            &selection,
            &state.coordinates,
        )),
        Err(e) => error_response(&e),
    }
}

/// `GET /api/map?year=&city=`
///
/// Returns the city markers for the selection as a `GeoJSON`
/// `FeatureCollection`.
pub async fn map_markers(
    state: web::Data<AppState>,
    params: web::Query<DashboardQueryParams>,
) -> HttpResponse {
    let dataset = match loaded(&state) {
        Ok(dataset) => dataset,
        Err(response) => return response,
    };

    match crate::resolve_selection(
        &dataset.records,
        params.year.as_deref(),
        params.city.as_deref(),
    ) {
        Ok(selection) => {
            let view = selection.apply(&dataset.records);
            let points = aggregate::geo_join(&view, &state.coordinates);
            HttpResponse::Ok().json(map::marker_collection(&points))
        }
        Err(e) => error_response(&e),
    }
}
