//! Client for the dashboard backend, plus the state the dashboard renders from.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    config::ClientConfig,
    model::{CityQuery, CurrentWeather, ForecastReport},
};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Either of the two lookups came back with a non-success status.
    #[error("City not found")]
    CityNotFound,

    #[error("Failed to fetch weather data")]
    Network(#[from] reqwest::Error),
}

/// Current conditions and forecast for one city.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherBundle {
    pub current: CurrentWeather,
    pub forecast: ForecastReport,
}

#[derive(Debug, Deserialize)]
struct HealthBody {
    status: String,
}

#[derive(Debug, Clone)]
pub struct DashboardClient {
    base_url: String,
    http: Client,
}

impl DashboardClient {
    /// `base_url` is the API root, e.g. "http://localhost:5000/api".
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { base_url, http })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::new(config.api_base_url.clone(), config.request_timeout())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Fetch current conditions and the forecast concurrently.
    ///
    /// Both requests are awaited before their statuses are inspected; if
    /// either is not a success the whole lookup fails with
    /// [`ClientError::CityNotFound`].
    pub async fn fetch_weather(&self, city: &CityQuery) -> Result<WeatherBundle, ClientError> {
        let params = [("city", city.as_str())];
        let current = self.http.get(self.endpoint("weather/current")).query(&params).send();
        let forecast = self.http.get(self.endpoint("weather/forecast")).query(&params).send();

        let (current, forecast) = tokio::join!(current, forecast);
        let (current, forecast) = (current?, forecast?);

        if !current.status().is_success() || !forecast.status().is_success() {
            debug!(
                city = %city,
                current = %current.status(),
                forecast = %forecast.status(),
                "weather lookup rejected by backend"
            );
            return Err(ClientError::CityNotFound);
        }

        let current: CurrentWeather = current.json().await?;
        let forecast: ForecastReport = forecast.json().await?;

        Ok(WeatherBundle { current, forecast })
    }

    /// Ask the backend whether it is up; returns its status message.
    pub async fn health(&self) -> Result<String, ClientError> {
        let root = self.base_url.strip_suffix("/api").unwrap_or(&self.base_url);
        let body: HealthBody = self
            .http
            .get(format!("{root}/health"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(body.status)
    }
}

/// What the dashboard should show.
#[derive(Debug, PartialEq)]
pub enum View<'a> {
    Loading,
    Error(&'a str),
    Weather(&'a WeatherBundle),
    Welcome,
}

/// Dashboard state across fetches.
#[derive(Debug, Default)]
pub struct DashboardState {
    loading: bool,
    city: Option<String>,
    weather: Option<WeatherBundle>,
    error: Option<String>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter the loading state; any previous error is dismissed.
    pub fn begin_fetch(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Leave the loading state and apply `result`.
    ///
    /// On failure all weather data is dropped so nothing stale is shown.
    /// Returns `true` on success.
    pub fn finish(&mut self, city: &CityQuery, result: Result<WeatherBundle, ClientError>) -> bool {
        self.loading = false;
        match result {
            Ok(bundle) => {
                self.weather = Some(bundle);
                self.city = Some(city.to_string());
                true
            }
            Err(err) => {
                warn!(city = %city, error = %err, "weather lookup failed");
                self.weather = None;
                self.error = Some(err.to_string());
                false
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The last city that was fetched successfully.
    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    pub fn weather(&self) -> Option<&WeatherBundle> {
        self.weather.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn view(&self) -> View<'_> {
        if let Some(err) = &self.error {
            return View::Error(err);
        }
        if self.loading {
            return View::Loading;
        }
        match &self.weather {
            Some(bundle) => View::Weather(bundle),
            None => View::Welcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ForecastByDay;
    use chrono::DateTime;

    fn bundle() -> WeatherBundle {
        WeatherBundle {
            current: CurrentWeather {
                city: "London".into(),
                country: "GB".into(),
                temperature: 12.0,
                feels_like: 11.0,
                humidity: 70,
                pressure: 1015,
                description: "overcast clouds".into(),
                icon: "04d".into(),
                wind_speed: 3.2,
                cloudiness: 90,
                timestamp: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            },
            forecast: ForecastReport {
                city: "London".into(),
                country: "GB".into(),
                forecast: ForecastByDay::default(),
            },
        }
    }

    #[test]
    fn fresh_state_shows_welcome() {
        assert_eq!(DashboardState::new().view(), View::Welcome);
    }

    #[test]
    fn loading_then_success() {
        let city = CityQuery::parse("London").unwrap();
        let mut state = DashboardState::new();

        state.begin_fetch();
        assert_eq!(state.view(), View::Loading);

        assert!(state.finish(&city, Ok(bundle())));
        assert!(!state.is_loading());
        assert_eq!(state.city(), Some("London"));
        assert!(matches!(state.view(), View::Weather(b) if b.current.city == "London"));
    }

    #[test]
    fn failure_clears_previous_weather() {
        let city = CityQuery::parse("London").unwrap();
        let missing = CityQuery::parse("Nonexistentville").unwrap();
        let mut state = DashboardState::new();

        state.begin_fetch();
        state.finish(&city, Ok(bundle()));

        state.begin_fetch();
        assert!(!state.finish(&missing, Err(ClientError::CityNotFound)));

        assert!(!state.is_loading());
        assert!(state.weather().is_none());
        assert_eq!(state.view(), View::Error("City not found"));
    }

    #[test]
    fn new_fetch_dismisses_error() {
        let city = CityQuery::parse("Nowhere").unwrap();
        let mut state = DashboardState::new();
        state.finish(&city, Err(ClientError::CityNotFound));

        state.begin_fetch();
        assert!(state.error().is_none());
        assert_eq!(state.view(), View::Loading);
    }

    #[test]
    fn base_url_trailing_slash_is_ignored() {
        let client = DashboardClient::new("http://localhost:5000/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.endpoint("weather/current"), "http://localhost:5000/api/weather/current");
    }
}
