//! Request handlers.

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{Local, Timelike};
use serde::Deserialize;
use tracing::{info, warn};
use weather_core::{DetailedWeather, WeatherRequest};

use crate::{
    error::{ApiError, AppError},
    state::AppState,
    templates::WeatherTemplate,
};

#[derive(Debug, Default, Deserialize)]
pub struct WeatherQuery {
    pub city: Option<String>,
}

/// HTML page with the current weather for `?city=` (or the default city).
pub async fn weather_page(
    State(state): State<AppState>,
    Query(query): Query<WeatherQuery>,
) -> Result<WeatherTemplate, AppError> {
    let data = lookup(&state, query.city.as_deref()).await?;
    Ok(WeatherTemplate { data })
}

/// JSON form of the same fields.
pub async fn weather_json(
    State(state): State<AppState>,
    Query(query): Query<WeatherQuery>,
) -> Result<Json<DetailedWeather>, ApiError> {
    let data = lookup(&state, query.city.as_deref()).await?;
    Ok(Json(data))
}

pub async fn health() -> &'static str {
    "ok"
}

async fn lookup(state: &AppState, city: Option<&str>) -> Result<DetailedWeather, AppError> {
    let request = WeatherRequest::for_query(city, state.default_city());

    let payload = state.provider().current_weather(&request).await.map_err(|err| {
        warn!(city = %request.city, error = %err, "weather lookup failed");
        AppError::from_provider(&request.city, &err)
    })?;

    let data = DetailedWeather::from_payload(&request.city, &payload, Local::now().hour());
    info!(city = %data.city, class = %data.background_class, "weather lookup served");

    Ok(data)
}
