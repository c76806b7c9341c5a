//! HTTP backend for the weather dashboard.
//!
//! Proxies city lookups to OpenWeather and reshapes the responses:
//! - `GET /api/weather/current?city=<name>`
//! - `GET /api/weather/forecast?city=<name>`
//! - `GET /health`

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use dashboard_core::{Environment, ServerConfig, WeatherProvider, provider::provider_from_config};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;

mod error;
mod routes;

pub use error::ApiError;

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// `None` while no API key is configured.
    provider: Option<Arc<dyn WeatherProvider>>,
    environment: Environment,
}

impl AppState {
    pub fn new(provider: Option<Arc<dyn WeatherProvider>>, environment: Environment) -> Self {
        Self { provider, environment }
    }

    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let provider = match config.api_key() {
            Some(_) => Some(provider_from_config(config)?),
            None => {
                warn!("OPENWEATHER_API_KEY is not set; weather endpoints will return 500");
                None
            }
        };
        Ok(Self::new(provider, config.environment))
    }
}

/// Build the application router with CORS restricted to `frontend_url`.
pub fn router(state: AppState, frontend_url: &str) -> Result<Router> {
    let origin = HeaderValue::from_str(frontend_url)
        .with_context(|| format!("Invalid frontend URL: '{frontend_url}'"))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Ok(Router::new()
        .route("/health", get(routes::health))
        .route("/api/weather/current", get(routes::current))
        .route("/api/weather/forecast", get(routes::forecast))
        .fallback(routes::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state))
}
