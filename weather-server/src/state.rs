//! Application state shared across handlers.

use std::sync::Arc;

use weather_core::WeatherProvider;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    provider: Box<dyn WeatherProvider>,
    default_city: String,
}

impl AppState {
    pub fn new(provider: Box<dyn WeatherProvider>, default_city: impl Into<String>) -> Self {
        Self { inner: Arc::new(InnerState { provider, default_city: default_city.into() }) }
    }

    pub fn provider(&self) -> &dyn WeatherProvider {
        self.inner.provider.as_ref()
    }

    /// City used when a request does not name one.
    pub fn default_city(&self) -> &str {
        &self.inner.default_city
    }
}
