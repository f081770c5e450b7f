//! HTTP handler functions for the disaster dashboard API.

use std::fmt;

use actix_web::{HttpRequest, HttpResponse, error::InternalError, web};
use disaster_dash_analytics::{aggregate::filter_options, build_dashboard};
use disaster_dash_analytics_models::FilterParams;
use disaster_dash_disaster_models::DisasterType;
use disaster_dash_server_models::{ApiDisasterType, ApiError, ApiHealth, DashboardQueryParams};

use crate::AppState;

/// Turns an extractor failure into a `400` with an [`ApiError`] body.
pub fn bad_request<E>(err: E, _req: &HttpRequest) -> actix_web::Error
where
    E: fmt::Debug + fmt::Display + 'static,
{
    log::debug!("Rejected request: {err}");
    let body = ApiError {
        error: err.to_string(),
    };
    InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
}

/// `GET /api/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        records: state.dataset.len(),
    })
}

/// `GET /api/types`
///
/// Returns every disaster type with its numeric code.
pub async fn types() -> HttpResponse {
    let types: Vec<ApiDisasterType> = DisasterType::all()
        .iter()
        .copied()
        .map(ApiDisasterType::from)
        .collect();

    HttpResponse::Ok().json(types)
}

/// `GET /api/options`
///
/// Lists the regions, types, and year bounds present in the dataset.
pub async fn options(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(filter_options(&state.dataset.view()))
}

fn render(state: &AppState, params: &FilterParams) -> HttpResponse {
    let response = build_dashboard(&state.dataset, params, &state.layers);
    log::debug!("Dashboard request matched {} records", response.record_count);
    HttpResponse::Ok().json(response)
}

/// `GET /api/dashboard`
///
/// Builds the dashboard for filters given as query parameters.
pub async fn dashboard_query(
    state: web::Data<AppState>,
    params: web::Query<DashboardQueryParams>,
) -> HttpResponse {
    render(&state, &params.into_inner().into_filter_params())
}

/// `POST /api/dashboard`
///
/// Builds the dashboard for filters given as a JSON body.
pub async fn dashboard_body(
    state: web::Data<AppState>,
    params: web::Json<FilterParams>,
) -> HttpResponse {
    render(&state, &params)
}
