//! DashboardClient against a mock backend.

use std::time::Duration;

use dashboard_core::{CityQuery, ClientError, DashboardClient, DashboardState, View};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> DashboardClient {
    DashboardClient::new(format!("{}/api", server.uri()), Duration::from_secs(5)).unwrap()
}

fn city(name: &str) -> CityQuery {
    CityQuery::parse(name).unwrap()
}

fn current_body(city: &str) -> serde_json::Value {
    serde_json::json!({
        "city": city,
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
    })
}

fn forecast_body(city: &str) -> serde_json::Value {
    let slot = |time: &str, temp: f64| {
        serde_json::json!({
            "time": time,
            "temperature": temp,
            "description": "light rain",
            "icon": "10d",
            "windSpeed": 3.0
        })
    };
    serde_json::json!({
        "city": city,
        "country": "GB",
        "forecast": {
            "3/10/2024": [slot("3:00:00 PM", 12.0), slot("6:00:00 PM", 10.5)],
            "3/11/2024": [slot("12:00:00 AM", 8.0)]
        }
    })
}

#[tokio::test]
async fn fetches_both_and_combines() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/weather/current"))
        .and(query_param("city", "London"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("London")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/weather/forecast"))
        .and(query_param("city", "London"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body("London")))
        .expect(1)
        .mount(&server)
        .await;

    let bundle = client(&server).fetch_weather(&city("London")).await.unwrap();

    assert_eq!(bundle.current.city, "London");
    assert_eq!(bundle.current.country, "GB");
    assert_eq!(bundle.forecast.city, "London");
    assert_eq!(
        bundle.forecast.forecast.labels().collect::<Vec<_>>(),
        vec!["3/10/2024", "3/11/2024"]
    );
    assert_eq!(bundle.forecast.forecast.get("3/10/2024").unwrap().len(), 2);
}

#[tokio::test]
async fn city_with_spaces_is_encoded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/weather/current"))
        .and(query_param("city", "New York"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("New York")))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/weather/forecast"))
        .and(query_param("city", "New York"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body("New York")))
        .mount(&server)
        .await;

    let bundle = client(&server).fetch_weather(&city("New York")).await.unwrap();
    assert_eq!(bundle.current.city, "New York");
}

#[tokio::test]
async fn current_not_found_fails_whole_lookup() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/weather/current"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(serde_json::json!({ "error": "City not found" })),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/weather/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body("Nonexistentville")))
        .mount(&server)
        .await;

    let missing = city("Nonexistentville");
    let result = client(&server).fetch_weather(&missing).await;
    assert!(matches!(result, Err(ClientError::CityNotFound)));

    let mut state = DashboardState::new();
    state.begin_fetch();
    state.finish(&missing, result);
    assert_eq!(state.view(), View::Error("City not found"));
    assert!(state.weather().is_none());
}

#[tokio::test]
async fn forecast_failure_fails_whole_lookup() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/weather/current"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("London")))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/weather/forecast"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(serde_json::json!({ "error": "Failed to fetch forecast data" })),
        )
        .mount(&server)
        .await;

    let result = client(&server).fetch_weather(&city("London")).await;
    assert!(matches!(result, Err(ClientError::CityNotFound)));
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    // Grab a free port, then close it so nothing is listening there.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let client =
        DashboardClient::new(format!("http://127.0.0.1:{port}/api"), Duration::from_secs(2)).unwrap();
    let result = client.fetch_weather(&city("London")).await;
    assert!(matches!(result, Err(ClientError::Network(_))));
}

#[tokio::test]
async fn health_reads_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "status": "Backend is running!" })),
        )
        .mount(&server)
        .await;

    let status = client(&server).health().await.unwrap();
    assert_eq!(status, "Backend is running!");
}
