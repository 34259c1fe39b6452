use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, Timelike};
use clap::{Parser, Subcommand};
use inquire::{Password, Text};
use weather_core::{
    Config, DetailedWeather, WeatherProvider, WeatherRequest, provider_from_config,
};

use crate::server;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather page service")]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the weather page over HTTP.
    Serve {
        /// Address to listen on, e.g. "0.0.0.0:8000".
        #[arg(long)]
        bind: Option<String>,
    },

    /// Store the OpenWeather API key and default city.
    Configure,

    /// Print the current weather for a city once.
    Show {
        /// City name; falls back to the configured default.
        city: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Serve { bind } => {
                let mut config = load_config(self.config.as_deref())?;
                if let Some(bind) = bind {
                    config.server.bind = bind;
                }
                server::run(config).await
            }
            Command::Configure => configure(self.config.as_deref()),
            Command::Show { city } => {
                let config = load_config(self.config.as_deref())?;
                let provider = provider_from_config(&config)?;
                let request = WeatherRequest::for_query(city.as_deref(), config.default_city());
                let report = show(provider.as_ref(), &request, Local::now().hour()).await?;
                println!("{report}");
                Ok(())
            }
        }
    }
}

/// File config with environment overrides layered on top.
fn load_config(path: Option<&Path>) -> Result<Config> {
    let mut config = match path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    config.apply_env_overrides();
    Ok(config)
}

fn configure(path: Option<&Path>) -> Result<()> {
    let mut config = match path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(api_key.trim().to_string());

    let city = Text::new("Default city:")
        .with_default(config.default_city())
        .prompt()
        .context("Failed to read default city")?;
    config.default_city = Some(city.trim().to_string());

    let saved_to = match path {
        Some(path) => {
            config.save_to(path)?;
            path.to_path_buf()
        }
        None => config.save()?,
    };

    println!("Configuration saved to {}", saved_to.display());
    Ok(())
}

/// Fetch once and format the fields as plain text.
async fn show(
    provider: &dyn WeatherProvider,
    request: &WeatherRequest,
    local_hour: u32,
) -> Result<String> {
    let payload = provider
        .current_weather(request)
        .await
        .with_context(|| format!("Failed to fetch weather for '{}'", request.city))?;
    let data = DetailedWeather::from_payload(&request.city, &payload, local_hour);

    Ok(render_plain(&data))
}

fn render_plain(data: &DetailedWeather) -> String {
    [
        format!("City:        {}", data.city),
        format!("Temperature: {} °C", data.temperature),
        format!("Weather:     {}", data.weather),
        format!("Humidity:    {} %", data.humidity),
        format!("Wind speed:  {} m/s", data.wind_speed),
        format!("Pressure:    {} hPa", data.pressure),
        format!("Sunrise:     {} UTC", data.sunrise),
        format!("Sunset:      {} UTC", data.sunset),
        format!("Display:     {}", data.background_class),
    ]
    .join("\n")
}
