//! Mapping of upstream failures onto HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use weather_core::ProviderError;

use crate::templates::ErrorTemplate;

/// A failed weather lookup, rendered as an HTML error page.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub city: String,
    pub message: String,
}

impl AppError {
    pub fn from_provider(city: &str, err: &ProviderError) -> Self {
        let status = match err {
            ProviderError::CityNotFound { .. } => StatusCode::NOT_FOUND,
            ProviderError::Request(_) if err.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            ProviderError::Request(_)
            | ProviderError::Unauthorized
            | ProviderError::Status { .. }
            | ProviderError::Decode(_) => StatusCode::BAD_GATEWAY,
        };

        Self { status, city: city.to_string(), message: err.to_string() }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let page = ErrorTemplate { city: self.city, message: self.message };
        (self.status, page).into_response()
    }
}

/// The same failure, rendered as `{ "error": ... }` for the JSON endpoint.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({ "city": self.0.city, "error": self.0.message });
        (self.0.status, Json(body)).into_response()
    }
}
