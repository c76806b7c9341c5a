use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;

use crate::{
    forecast::{ForecastEntry, group_by_day},
    model::{CityQuery, CurrentWeather, ForecastReport},
};

use super::{UpstreamError, WeatherProvider};

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        city: &CityQuery,
        what: &'static str,
    ) -> Result<T, UpstreamError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(%url, city = %city, "requesting OpenWeather {what}");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        match status {
            StatusCode::NOT_FOUND => Err(UpstreamError::NotFound),
            StatusCode::UNAUTHORIZED => Err(UpstreamError::Unauthorized),
            s if !s.is_success() => Err(UpstreamError::Status {
                status: s.as_u16(),
                body: truncate_body(&body),
            }),
            _ => serde_json::from_str(&body).map_err(|source| UpstreamError::Decode { what, source }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u32,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwClouds {
    all: u32,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    #[serde(default)]
    sys: OwSys,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    #[serde(default)]
    clouds: OwClouds,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwForecastMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

/// Description and icon of the first condition, if any.
fn condition(weather: Vec<OwWeather>) -> (String, String) {
    weather
        .into_iter()
        .next()
        .map(|w| (w.description, w.icon))
        .unwrap_or_else(|| ("Unknown".to_string(), String::new()))
}

impl From<OwCurrentResponse> for CurrentWeather {
    fn from(parsed: OwCurrentResponse) -> Self {
        let (description, icon) = condition(parsed.weather);

        CurrentWeather {
            city: parsed.name,
            country: parsed.sys.country,
            temperature: parsed.main.temp,
            feels_like: parsed.main.feels_like,
            humidity: parsed.main.humidity,
            pressure: parsed.main.pressure,
            description,
            icon,
            wind_speed: parsed.wind.speed,
            cloudiness: parsed.clouds.all,
            timestamp: DateTime::from_timestamp(parsed.dt, 0).unwrap_or_else(Utc::now),
        }
    }
}

impl From<OwForecastEntry> for ForecastEntry {
    fn from(entry: OwForecastEntry) -> Self {
        let (description, icon) = condition(entry.weather);

        ForecastEntry {
            dt: entry.dt,
            temperature: entry.main.temp,
            description,
            icon,
            wind_speed: entry.wind.speed,
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, city: &CityQuery) -> Result<CurrentWeather, UpstreamError> {
        let parsed: OwCurrentResponse = self.get("weather", city, "current weather").await?;
        Ok(parsed.into())
    }

    async fn forecast(&self, city: &CityQuery) -> Result<ForecastReport, UpstreamError> {
        let parsed: OwForecastResponse = self.get("forecast", city, "forecast").await?;

        let forecast = group_by_day(parsed.list.into_iter().map(ForecastEntry::from), &Local);

        Ok(ForecastReport {
            city: parsed.city.name,
            country: parsed.city.country,
            forecast,
        })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_body_limits_length() {
        let long = "x".repeat(500);
        let out = truncate_body(&long);
        assert_eq!(out.len(), 203);
        assert!(out.ends_with("..."));
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(300);
        let out = truncate_body(&long);
        assert_eq!(out.chars().count(), 203);
    }

    #[test]
    fn current_response_maps_to_flat_record() {
        let raw = r#"{
            "name": "London",
            "dt": 1700000000,
            "sys": { "country": "GB" },
            "main": { "temp": 11.3, "feels_like": 10.2, "humidity": 81, "pressure": 1011 },
            "weather": [{ "description": "light rain", "icon": "10d" }],
            "wind": { "speed": 4.6 },
            "clouds": { "all": 75 }
        }"#;

        let parsed: OwCurrentResponse = serde_json::from_str(raw).unwrap();
        let weather = CurrentWeather::from(parsed);

        assert_eq!(weather.city, "London");
        assert_eq!(weather.country, "GB");
        assert_eq!(weather.pressure, 1011);
        assert_eq!(weather.description, "light rain");
        assert_eq!(weather.icon, "10d");
        assert_eq!(weather.cloudiness, 75);
        assert_eq!(weather.timestamp.timestamp(), 1_700_000_000);
    }

    #[test]
    fn missing_condition_falls_back_to_unknown() {
        let (description, icon) = condition(Vec::new());
        assert_eq!(description, "Unknown");
        assert!(icon.is_empty());
    }
}
