use crate::{Config, WeatherRequest, provider::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::fmt::Debug;
use thiserror::Error;

pub mod openweather;

/// Failures talking to the upstream weather service.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Failed to reach the weather service: {0}")]
    Request(#[source] reqwest::Error),

    #[error("City '{city}' was not found by the weather service")]
    CityNotFound { city: String },

    #[error("The weather service rejected the configured API key")]
    Unauthorized,

    #[error("Weather service request failed with status {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("Failed to parse weather service response: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ProviderError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::CityNotFound { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ProviderError::Request(e) if e.is_timeout())
    }
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Fetch the raw "current weather" payload for the requested city.
    async fn current_weather(&self, request: &WeatherRequest) -> Result<Value, ProviderError>;
}

/// Construct the provider described by config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let provider = OpenWeatherProvider::from_config(config)?;
    Ok(Box::new(provider))
}
