use crate::{
    ServerConfig,
    model::{CityQuery, CurrentWeather, ForecastReport},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

/// Failures talking to the upstream weather API.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("city not found upstream")]
    NotFound,

    #[error("upstream rejected the API key")]
    Unauthorized,

    #[error("upstream request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to reach upstream: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to parse upstream {what} JSON: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, city: &CityQuery) -> Result<CurrentWeather, UpstreamError>;

    /// Forecast with entries already grouped per local calendar day.
    async fn forecast(&self, city: &CityQuery) -> Result<ForecastReport, UpstreamError>;
}

/// Construct the upstream provider from config.
pub fn provider_from_config(config: &ServerConfig) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for OpenWeather.\n\
                 Hint: set OPENWEATHER_API_KEY or `api_key` in the server config file."
        )
    })?;

    let provider = OpenWeatherProvider::new(
        api_key.to_owned(),
        config.upstream_base_url.clone(),
        config.request_timeout(),
    )?;

    Ok(Arc::new(provider))
}
