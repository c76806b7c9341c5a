use std::fmt::Display;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use dashboard_core::Environment;
use serde::Serialize;

/// An error response: `{"error": "..."}` plus an optional `message` with
/// details, only filled in development.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: &'static str,
    message: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
}

impl ApiError {
    pub fn new(status: StatusCode, error: &'static str) -> Self {
        Self { status, error, message: None }
    }

    pub fn missing_city() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "City parameter is required")
    }

    pub fn missing_api_key() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "API key not configured")
    }

    pub fn city_not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "City not found")
    }

    pub fn invalid_api_key() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Invalid API key")
    }

    pub fn internal(error: &'static str) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error)
    }

    /// Attach `detail` when running in development.
    pub fn with_detail(mut self, environment: Environment, detail: impl Display) -> Self {
        if environment.is_development() {
            self.message = Some(detail.to_string());
        }
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody { error: self.error, message: self.message.as_deref() };
        (self.status, Json(body)).into_response()
    }
}
