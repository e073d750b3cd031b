use anyhow::Context;
use clap::{Parser, Subcommand};
use gramsetu_weather::{Config, CurrentConditions, WeatherService};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "gramsetu", version, about = "GramSetu weather CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and a default coordinate.
    Configure,

    /// Show current conditions at the configured location.
    Current {
        /// Look up a named place instead of the configured coordinate.
        #[arg(long)]
        city: Option<String>,
    },

    /// Show the daily forecast for the configured location (up to 7 days).
    Forecast,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Current { city } => {
                let service = service()?;
                let current = match city {
                    Some(city) => service.weather_by_city(&city).await,
                    None => service.current_weather().await,
                }
                .context("Failed to load weather data")?;

                print_current(&current);
                Ok(())
            }
            Command::Forecast => {
                let service = service()?;
                let days = service.forecast().await.context("Failed to load forecast data")?;

                if days.is_empty() {
                    println!("No forecast data available.");
                }
                for day in &days {
                    println!(
                        "{:>9}  {}  {:>3}° / {:>3}°  rain {:>3}%  {}",
                        day.day_label,
                        day.icon,
                        day.high_c,
                        day.low_c,
                        day.rain_chance_pct,
                        day.condition,
                    );
                }
                Ok(())
            }
        }
    }
}

fn service() -> anyhow::Result<WeatherService> {
    let config = Config::load()?;
    let service = WeatherService::from_config(&config)?;
    Ok(service)
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = inquire::Text::new("OpenWeather API key:")
        .with_initial_value(config.api_key.as_deref().unwrap_or(""))
        .prompt()
        .context("Failed to read API key")?;
    config.api_key = Some(api_key.trim().to_string()).filter(|key| !key.is_empty());

    config.latitude = prompt_coordinate("Default latitude (blank to skip):", config.latitude)?;
    config.longitude = prompt_coordinate("Default longitude (blank to skip):", config.longitude)?;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn prompt_coordinate(message: &str, existing: Option<f64>) -> anyhow::Result<Option<f64>> {
    let initial = existing.map(|v| v.to_string()).unwrap_or_default();
    let answer = inquire::Text::new(message)
        .with_initial_value(&initial)
        .prompt()
        .context("Failed to read coordinate")?;

    let trimmed = answer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value: f64 = trimmed.parse().with_context(|| format!("Not a number: {trimmed}"))?;
    Ok(Some(value))
}

fn print_current(current: &CurrentConditions) {
    println!("{}  {}", current.icon, current.location);
    println!("  {}, {}°C", current.condition, current.temperature_c);
    println!(
        "  humidity {}%  wind {} km/h",
        current.humidity_pct, current.wind_speed_kmh
    );
    println!(
        "  pressure {} hPa  visibility {} km  UV index {}",
        current.pressure_hpa, current.visibility_km, current.uv_index
    );
}
