use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use utoipa::{IntoParams, OpenApi, ToSchema};

use crate::dataset::{
    CityOption, CitySeries, DatasetSummary, IndicatorInfo, SeriesPoint, SeriesResponse,
};
use crate::services::{DashboardService, SeriesFilter};

const INDEX_HTML: &str = include_str!("../static/index.html");

#[derive(Clone)]
pub struct AppState {
    pub dashboard_service: DashboardService,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub dataset: DatasetSummary,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CitiesQuery {
    /// Comma-separated state codes
    pub states: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SeriesQuery {
    /// Exact indicator name
    pub indicator: String,
    /// Comma-separated state codes
    pub states: Option<String>,
    /// Comma-separated city names
    pub cities: Option<String>,
}

/// Split a comma-separated query value, dropping empty items
fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(OpenApi)]
#[openapi(
    paths(health, get_indicators, get_states, get_cities, get_series),
    components(schemas(
        HealthResponse,
        DatasetSummary,
        IndicatorInfo,
        CityOption,
        SeriesResponse,
        CitySeries,
        SeriesPoint
    )),
    tags((name = "dashboard", description = "Municipal financial indicator dashboard"))
)]
pub struct ApiDoc;

pub fn generate_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health))
        .route("/indicators", get(get_indicators))
        .route("/states", get(get_states))
        .route("/cities", get(get_cities))
        .route("/series", get(get_series))
        .with_state(state);

    Router::new()
        .route("/", get(index))
        .nest("/api/v1", api_routes)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "dashboard",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
#[instrument(skip(state))]
async fn health(State(state): State<AppState>) -> impl IntoResponse {
    debug!("Health check requested");
    let response = HealthResponse {
        status: "healthy".to_string(),
        dataset: state.dashboard_service.summary(),
    };
    (StatusCode::OK, Json(response))
}

#[utoipa::path(
    get,
    path = "/api/v1/indicators",
    tag = "dashboard",
    responses((status = 200, description = "Indicators in tab order", body = [IndicatorInfo]))
)]
#[instrument(skip(state))]
async fn get_indicators(State(state): State<AppState>) -> Json<Vec<IndicatorInfo>> {
    Json(state.dashboard_service.indicators())
}

#[utoipa::path(
    get,
    path = "/api/v1/states",
    tag = "dashboard",
    responses((status = 200, description = "Sorted state codes", body = [String]))
)]
#[instrument(skip(state))]
async fn get_states(State(state): State<AppState>) -> Json<Vec<String>> {
    let states = state.dashboard_service.states();
    debug!("Returning {} states", states.len());
    Json(states)
}

#[utoipa::path(
    get,
    path = "/api/v1/cities",
    tag = "dashboard",
    params(CitiesQuery),
    responses((status = 200, description = "City picker options", body = [CityOption]))
)]
#[instrument(skip(state))]
async fn get_cities(
    State(state): State<AppState>,
    Query(params): Query<CitiesQuery>,
) -> Json<Vec<CityOption>> {
    let states = split_list(params.states.as_deref());
    Json(state.dashboard_service.city_options(&states))
}

#[utoipa::path(
    get,
    path = "/api/v1/series",
    tag = "dashboard",
    params(SeriesQuery),
    responses(
        (status = 200, description = "Per-city time series", body = SeriesResponse),
        (status = 404, description = "Unknown indicator")
    )
)]
#[instrument(skip(state))]
async fn get_series(
    State(state): State<AppState>,
    Query(params): Query<SeriesQuery>,
) -> Result<Json<SeriesResponse>, StatusCode> {
    let filter = SeriesFilter {
        states: split_list(params.states.as_deref()),
        cities: split_list(params.cities.as_deref()),
    };

    let response = state
        .dashboard_service
        .series(&params.indicator, &filter)
        .ok_or_else(|| {
            warn!("Unknown indicator '{}'", params.indicator);
            StatusCode::NOT_FOUND
        })?;

    info!(
        "Serving {} series for '{}'",
        response.series.len(),
        params.indicator
    );
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(Some("AZ, MB,,")), vec!["AZ", "MB"]);
        assert!(split_list(None).is_empty());
        assert!(split_list(Some("")).is_empty());
    }

    #[test]
    fn test_openapi_lists_series_path() {
        let spec = generate_openapi_spec();
        assert!(spec.paths.paths.contains_key("/api/v1/series"));
    }
}
