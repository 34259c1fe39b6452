use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{Config, config::DEFAULT_BASE_URL, model::WeatherRequest};

use super::{ProviderError, WeatherProvider};

const CURRENT_PATH: &str = "/data/2.5/weather";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point the provider at an alternate host, e.g. a proxy or a test server.
    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        Self::with_client(api_key, base_url, Client::new())
    }

    fn with_client(api_key: String, base_url: impl Into<String>, http: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { api_key, base_url, http }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.api_key().ok_or_else(|| {
            anyhow!(
                "No API key configured for OpenWeather.\n\
                 Hint: run `weather configure` or set the API_KEY environment variable."
            )
        })?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.provider.timeout_secs))
            .build()?;

        Ok(Self::with_client(api_key.to_owned(), config.provider.base_url.as_str(), http))
    }

    async fn fetch_current(&self, city: &str) -> Result<Value, ProviderError> {
        let url = format!("{}{}", self.base_url, CURRENT_PATH);
        debug!(%city, %url, "requesting current weather");

        let res = self
            .http
            .get(&url)
            .query(&[("q", city), ("appid", self.api_key.as_str()), ("units", "metric")])
            .send()
            .await
            .map_err(request_error)?;

        let status = res.status();
        let body = res.text().await.map_err(request_error)?;

        if !status.is_success() {
            warn!(%city, %status, "OpenWeather current request failed");
            return Err(status_error(status, city, &body));
        }

        serde_json::from_str(&body).map_err(ProviderError::Decode)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, request: &WeatherRequest) -> Result<Value, ProviderError> {
        self.fetch_current(&request.city).await
    }
}

/// The request URL carries the API key, so it never leaves this module.
fn request_error(err: reqwest::Error) -> ProviderError {
    ProviderError::Request(err.without_url())
}

fn status_error(status: StatusCode, city: &str, body: &str) -> ProviderError {
    match status {
        StatusCode::NOT_FOUND => ProviderError::CityNotFound { city: city.to_string() },
        StatusCode::UNAUTHORIZED => ProviderError::Unauthorized,
        _ => ProviderError::Status { status, message: error_message(body) },
    }
}

/// Prefer the provider's own `message` field over the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| truncate_body(body))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
