use async_trait::async_trait;
use std::fmt::Debug;

use crate::config::Config;
use crate::error::WeatherError;
use crate::model::{Coordinate, CurrentConditions, DailyForecast};
use crate::provider::openweather::OpenWeatherClient;

pub mod openweather;

/// Abstraction over the remote weather provider.
///
/// The facade only speaks this trait; the concrete OpenWeather client (and
/// any test double) lives behind it.
#[async_trait]
pub trait WeatherApi: Send + Sync + Debug {
    /// One normalized snapshot for a coordinate.
    async fn current(&self, coord: Coordinate) -> Result<CurrentConditions, WeatherError>;

    /// One normalized snapshot for a named place.
    async fn current_by_name(&self, city: &str) -> Result<CurrentConditions, WeatherError>;

    /// Daily summaries for a coordinate, chronological, at most 7 entries.
    async fn forecast(&self, coord: Coordinate) -> Result<Vec<DailyForecast>, WeatherError>;
}

/// Construct the OpenWeather client from config.
///
/// A missing API key is reported here as a configuration error; it never
/// crashes the process.
pub fn openweather_from_config(config: &Config) -> Result<OpenWeatherClient, WeatherError> {
    openweather_with_key(config.resolved_api_key(), config)
}

fn openweather_with_key(
    api_key: Option<String>,
    config: &Config,
) -> Result<OpenWeatherClient, WeatherError> {
    let api_key = api_key.ok_or_else(|| {
        WeatherError::Config(
            "no OpenWeather API key configured; run `gramsetu configure` or set \
             OPENWEATHER_API_KEY"
                .to_string(),
        )
    })?;

    match &config.base_url {
        Some(base) => OpenWeatherClient::with_base_url(api_key, base.clone()),
        None => OpenWeatherClient::new(api_key),
    }
}
