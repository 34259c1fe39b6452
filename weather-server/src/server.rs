//! Router configuration and the HTTP server loop.

use std::time::Duration;

use anyhow::{Context, Result};
use axum::{Router, http::StatusCode, routing::get};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;
use weather_core::{Config, provider_from_config};

use crate::{handlers, state::AppState};

/// Headroom on top of the upstream timeout before a request is abandoned.
const REQUEST_TIMEOUT_SLACK: Duration = Duration::from_secs(5);

/// Create the router with all routes.
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/", get(handlers::weather_page))
        .route("/weather", get(handlers::weather_page))
        .route("/api/weather", get(handlers::weather_json))
        .route("/health", get(handlers::health))
        .layer(TimeoutLayer::with_status_code(StatusCode::GATEWAY_TIMEOUT, request_timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the configured address and serve until Ctrl+C.
pub async fn run(config: Config) -> Result<()> {
    let provider = provider_from_config(&config)?;
    let state = AppState::new(provider, config.default_city());

    let request_timeout = Duration::from_secs(config.provider.timeout_secs) + REQUEST_TIMEOUT_SLACK;
    let app = create_router(state, request_timeout);

    let listener = TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.server.bind))?;

    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    info!("Shutting down gracefully...");
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::{body::Body, http::Request};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use weather_core::{
        ProviderError, WeatherProvider, WeatherRequest, provider::openweather::OpenWeatherProvider,
    };
    use wiremock::{Mock, MockServer, ResponseTemplate, matchers::method};

    /// Answers from a fixed table keyed by city.
    #[derive(Debug)]
    struct StubProvider;

    #[async_trait]
    impl WeatherProvider for StubProvider {
        async fn current_weather(&self, request: &WeatherRequest) -> Result<Value, ProviderError> {
            match request.city.as_str() {
                "Atlantis" => Err(ProviderError::CityNotFound { city: request.city.clone() }),
                "Broken" => Err(ProviderError::Status {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "upstream exploded".into(),
                }),
                "Sparse" => Ok(json!({})),
                _ => Ok(json!({
                    "weather": [{ "main": "Snow", "description": "light snow" }],
                    "main": { "temp": -2.5, "pressure": 1003, "humidity": 93 },
                    "wind": { "speed": 5.1 },
                    "sys": { "sunrise": 1700000000, "sunset": 1700032400 }
                })),
            }
        }
    }

    fn app() -> Router {
        let state = AppState::new(Box::new(StubProvider), "London");
        create_router(state, Duration::from_secs(5))
    }

    async fn fetch(app: Router, uri: &str) -> (StatusCode, String) {
        let res = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        let status = res.status();
        let bytes = res.into_body().collect().await.expect("body").to_bytes();
        (status, String::from_utf8(bytes.to_vec()).expect("utf-8"))
    }

    #[tokio::test]
    async fn page_renders_requested_city() {
        let (status, body) = fetch(app(), "/weather?city=Oslo").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<h1>Oslo</h1>"));
        assert!(body.contains("-2.5"));
        assert!(body.contains("light snow"));
        assert!(body.contains("2023-11-14 22:13:20"));
        assert!(body.contains(r#"<body class="snowy"#));
    }

    #[tokio::test]
    async fn page_defaults_to_london() {
        let (status, body) = fetch(app(), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<h1>London</h1>"));
    }

    #[tokio::test]
    async fn sparse_payload_renders_placeholders() {
        let (status, body) = fetch(app(), "/api/weather?city=Sparse").await;
        assert_eq!(status, StatusCode::OK);

        let json: Value = serde_json::from_str(&body).expect("json");
        assert_eq!(json["city"], "Sparse");
        assert_eq!(json["temperature"], "N/A");
        assert_eq!(json["weather"], "N/A");
        assert_eq!(json["pressure"], "N/A");
        assert_eq!(json["sunrise"], "1970-01-01 00:00:00");
    }

    #[tokio::test]
    async fn api_returns_detailed_fields() {
        let (status, body) = fetch(app(), "/api/weather?city=Oslo").await;
        assert_eq!(status, StatusCode::OK);

        let json: Value = serde_json::from_str(&body).expect("json");
        assert_eq!(json["temperature"], "-2.5");
        assert_eq!(json["humidity"], "93");
        assert_eq!(json["wind_speed"], "5.1");
        assert_eq!(json["sunset"], "2023-11-15 07:13:20");

        let class = json["background_class"].as_str().expect("class");
        assert!(class == "snowy" || class == "snowy_night");
    }

    #[tokio::test]
    async fn unknown_city_is_404_page() {
        let (status, body) = fetch(app(), "/weather?city=Atlantis").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Weather unavailable"));
        assert!(body.contains("Atlantis"));
    }

    #[tokio::test]
    async fn upstream_failure_is_bad_gateway_json() {
        let (status, body) = fetch(app(), "/api/weather?city=Broken").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);

        let json: Value = serde_json::from_str(&body).expect("json");
        assert!(json["error"].as_str().expect("error").contains("upstream exploded"));
    }

    #[tokio::test]
    async fn city_is_html_escaped() {
        let (_, body) = fetch(app(), "/weather?city=%3Cscript%3E").await;
        assert!(!body.contains("<script>"));
    }

    #[tokio::test]
    async fn upstream_timeout_is_gateway_timeout_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.provider.base_url = server.uri();
        cfg.provider.timeout_secs = 1;

        let provider = OpenWeatherProvider::from_config(&cfg).expect("configured");
        let state = AppState::new(Box::new(provider), "London");
        let app = create_router(state, Duration::from_secs(10));

        let (status, body) = fetch(app, "/weather?city=Slowtown").await;

        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert!(body.contains("Weather unavailable"));
        assert!(body.contains("Slowtown"));
    }

    #[derive(Debug)]
    struct HangingProvider;

    #[async_trait]
    impl WeatherProvider for HangingProvider {
        async fn current_weather(&self, _request: &WeatherRequest) -> Result<Value, ProviderError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn request_deadline_answers_gateway_timeout() {
        let state = AppState::new(Box::new(HangingProvider), "London");
        let app = create_router(state, Duration::from_millis(100));

        let (status, _) = fetch(app, "/weather").await;

        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (status, body) = fetch(app(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }
}
