use chrono::DateTime;
use serde::Serialize;
use serde_json::Value;

use crate::display::display_class;

/// City shown when the request does not name one.
pub const DEFAULT_CITY: &str = "London";

/// Rendered in place of any field the provider did not return.
pub const PLACEHOLDER: &str = "N/A";

/// Condition assumed when the payload carries no `weather` entry.
const DEFAULT_CONDITION: &str = "Clear";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherRequest {
    pub city: String,
}

impl WeatherRequest {
    pub fn new(city: impl Into<String>) -> Self {
        Self { city: city.into() }
    }

    /// Build a request from an optional `city` query value, falling back to `default_city`
    /// when it is absent or blank.
    pub fn for_query(city: Option<&str>, default_city: &str) -> Self {
        match city.map(str::trim).filter(|c| !c.is_empty()) {
            Some(city) => Self::new(city),
            None => Self::new(default_city),
        }
    }
}

impl Default for WeatherRequest {
    fn default() -> Self {
        Self::new(DEFAULT_CITY)
    }
}

/// Presentation fields handed to the weather page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailedWeather {
    pub city: String,
    pub temperature: String,
    pub weather: String,
    pub humidity: String,
    pub wind_speed: String,
    pub pressure: String,
    pub sunrise: String,
    pub sunset: String,
    pub background_class: String,
}

impl DetailedWeather {
    /// Derive the page fields from a raw OpenWeather "current weather" payload.
    ///
    /// `city` is echoed as requested; `local_hour` selects the day or night variant of
    /// the display class.
    pub fn from_payload(city: &str, payload: &Value, local_hour: u32) -> Self {
        let main = payload.get("main");
        let first_weather = payload
            .get("weather")
            .and_then(Value::as_array)
            .and_then(|w| w.first());

        let condition = first_weather
            .and_then(|w| w.get("main"))
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_CONDITION);

        Self {
            city: city.to_string(),
            temperature: field_or_placeholder(main.and_then(|m| m.get("temp"))),
            weather: field_or_placeholder(first_weather.and_then(|w| w.get("description"))),
            humidity: field_or_placeholder(main.and_then(|m| m.get("humidity"))),
            wind_speed: field_or_placeholder(payload.get("wind").and_then(|w| w.get("speed"))),
            pressure: field_or_placeholder(main.and_then(|m| m.get("pressure"))),
            sunrise: sys_timestamp(payload, "sunrise"),
            sunset: sys_timestamp(payload, "sunset"),
            background_class: display_class(condition, local_hour),
        }
    }
}

fn field_or_placeholder(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => PLACEHOLDER.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// A missing timestamp counts as the epoch; a malformed one renders the placeholder.
fn sys_timestamp(payload: &Value, key: &str) -> String {
    let Some(raw) = payload.get("sys").and_then(|s| s.get(key)) else {
        return format_utc(0).unwrap_or_else(|| PLACEHOLDER.to_string());
    };

    raw.as_i64()
        .or_else(|| raw.as_f64().map(|f| f.trunc() as i64))
        .and_then(format_utc)
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

fn format_utc(ts: i64) -> Option<String> {
    DateTime::from_timestamp(ts, 0).map(|dt| dt.format(TIMESTAMP_FORMAT).to_string())
}
