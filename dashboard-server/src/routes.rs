use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use dashboard_core::{CityQuery, CurrentWeather, ForecastReport, UpstreamError, WeatherProvider};
use serde::Serialize;
use tracing::error;

use crate::{AppState, error::ApiError};

/// The query string as raw pairs, so malformed or repeated parameters never
/// produce a non-JSON rejection.
type CityParams = Result<Query<Vec<(String, String)>>, QueryRejection>;

#[derive(Debug, Serialize)]
pub struct Health {
    status: &'static str,
}

/// Validate the request before any upstream call: city first, then credential.
fn prepare(state: &AppState, params: CityParams) -> Result<(Arc<dyn WeatherProvider>, CityQuery), ApiError> {
    let city = city_param(params).ok_or_else(ApiError::missing_city)?;

    let provider = state.provider.clone().ok_or_else(ApiError::missing_api_key)?;

    Ok((provider, city))
}

/// The first `city` value, trimmed; `None` when absent or blank.
fn city_param(params: CityParams) -> Option<CityQuery> {
    let Query(pairs) = params.ok()?;
    pairs
        .into_iter()
        .find(|(key, _)| key == "city")
        .and_then(|(_, value)| CityQuery::parse(&value))
}

/// GET /health
pub async fn health() -> Json<Health> {
    Json(Health { status: "Backend is running!" })
}

/// GET /api/weather/current?city=<name>
pub async fn current(
    State(state): State<AppState>,
    params: CityParams,
) -> Result<Json<CurrentWeather>, ApiError> {
    let (provider, city) = prepare(&state, params)?;

    provider.current(&city).await.map(Json).map_err(|err| match err {
        UpstreamError::NotFound => ApiError::city_not_found(),
        UpstreamError::Unauthorized => ApiError::invalid_api_key(),
        other => {
            error!(city = %city, error = %other, "Weather API error");
            ApiError::internal("Failed to fetch weather data").with_detail(state.environment, &other)
        }
    })
}

/// GET /api/weather/forecast?city=<name>
pub async fn forecast(
    State(state): State<AppState>,
    params: CityParams,
) -> Result<Json<ForecastReport>, ApiError> {
    let (provider, city) = prepare(&state, params)?;

    provider.forecast(&city).await.map(Json).map_err(|err| match err {
        UpstreamError::NotFound => ApiError::city_not_found(),
        other => {
            error!(city = %city, error = %other, "Forecast API error");
            ApiError::internal("Failed to fetch forecast data").with_detail(state.environment, &other)
        }
    })
}

pub async fn not_found() -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "Not found")
}
