//! Askama templates for the HTML pages.

use askama::Template;
use askama_web::WebTemplate;
use weather_core::DetailedWeather;

/// Current weather for one city.
#[derive(Template, WebTemplate)]
#[template(path = "weather.html")]
pub struct WeatherTemplate {
    pub data: DetailedWeather,
}

/// Shown when the upstream lookup fails.
#[derive(Template, WebTemplate)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub city: String,
    pub message: String,
}
