use anyhow::bail;
use dashboard_core::{
    CityQuery, ClientConfig, DashboardClient, DashboardState, FileRecentStore, RecentCities,
    RecentStore, RecentTracker,
};
use tracing::warn;

use crate::render;

/// Backend client, on-screen state and recent searches for one session.
pub struct Dashboard<S> {
    client: DashboardClient,
    state: DashboardState,
    recent: RecentTracker<S>,
}

impl Dashboard<FileRecentStore> {
    /// Recent cities are kept in the platform data directory.
    pub fn open(config: &ClientConfig) -> anyhow::Result<Self> {
        let client = DashboardClient::from_config(config)?;
        Ok(Self::new(client, FileRecentStore::default_location()?))
    }
}

impl<S: RecentStore> Dashboard<S> {
    pub fn new(client: DashboardClient, store: S) -> Self {
        Self { client, state: DashboardState::new(), recent: RecentTracker::open(store) }
    }

    /// Look up `raw` and print the result. A successful lookup is remembered
    /// in the recent-city list. Returns whether the lookup succeeded.
    pub async fn search(&mut self, raw: &str) -> anyhow::Result<bool> {
        let Some(city) = CityQuery::parse(raw) else {
            bail!("City name must not be empty");
        };

        self.state.begin_fetch();
        eprintln!("{}", render::view(&self.state.view()));

        let result = self.client.fetch_weather(&city).await;
        let found = self.state.finish(&city, result);
        if found {
            if let Err(err) = self.recent.record(city.as_str()) {
                warn!(error = %err, "failed to save recent cities");
            }
        }

        println!("{}", render::view(&self.state.view()));
        Ok(found)
    }

    pub fn recent(&self) -> &RecentCities {
        self.recent.cities()
    }

    pub fn clear_recent(&mut self) -> anyhow::Result<()> {
        self.recent.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_core::{MemoryRecentStore, View};
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn backend(current_status: u16) -> MockServer {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/weather/current"))
            .respond_with(ResponseTemplate::new(current_status).set_body_json(serde_json::json!({
                "city": "London",
                "country": "GB",
                "temperature": 12.4,
                "feelsLike": 11.0,
                "humidity": 72,
                "pressure": 1014,
                "description": "broken clouds",
                "icon": "04d",
                "windSpeed": 5.1,
                "cloudiness": 68,
                "timestamp": "2024-03-10T12:00:00.000Z"
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/weather/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "city": "London",
                "country": "GB",
                "forecast": {}
            })))
            .mount(&server)
            .await;

        server
    }

    fn dashboard(server: &MockServer, store: MemoryRecentStore) -> Dashboard<MemoryRecentStore> {
        let client =
            DashboardClient::new(format!("{}/api", server.uri()), Duration::from_secs(5)).unwrap();
        Dashboard::new(client, store)
    }

    #[tokio::test]
    async fn successful_search_is_recorded() {
        let server = backend(200).await;
        let mut dash = dashboard(&server, MemoryRecentStore::with_raw(r#"["Oslo"]"#));

        assert!(dash.search("  london ").await.unwrap());

        assert_eq!(dash.recent().as_slice(), ["london", "Oslo"]);
        assert_eq!(dash.recent.store().raw().as_deref(), Some(r#"["london","Oslo"]"#));
        assert!(matches!(dash.state.view(), View::Weather(b) if b.current.city == "London"));
    }

    #[tokio::test]
    async fn failed_search_leaves_recent_untouched() {
        let server = backend(404).await;
        let mut dash = dashboard(&server, MemoryRecentStore::with_raw(r#"["Oslo"]"#));

        assert!(!dash.search("Nonexistentville").await.unwrap());

        assert_eq!(dash.recent().as_slice(), ["Oslo"]);
        assert_eq!(dash.recent.store().raw().as_deref(), Some(r#"["Oslo"]"#));
        assert_eq!(dash.state.view(), View::Error("City not found"));
        assert!(dash.state.weather().is_none());
    }

    #[tokio::test]
    async fn blank_search_is_rejected_before_any_request() {
        let server = backend(200).await;
        let mut dash = dashboard(&server, MemoryRecentStore::default());

        assert!(dash.search("   ").await.is_err());
        assert!(dash.recent().is_empty());
        assert_eq!(dash.state.view(), View::Welcome);
    }
}
