//! Core library for the `weather` page service.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Abstraction over the upstream weather provider
//! - The presentation model derived from provider payloads
//! - Display-class selection by condition and time of day
//!
//! It is used by `weather-server`, but can also be reused by other binaries or services.

pub mod config;
pub mod display;
pub mod model;
pub mod provider;

pub use config::{Config, ProviderSettings, ServerConfig};
pub use display::{DisplayClass, TimeOfDay, display_class};
pub use model::{DEFAULT_CITY, DetailedWeather, PLACEHOLDER, WeatherRequest};
pub use provider::{ProviderError, WeatherProvider, provider_from_config};
