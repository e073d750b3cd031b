use tracing::{debug, warn};

use crate::config::Config;
use crate::error::WeatherError;
use crate::location::{ConfiguredLocation, LocationSource};
use crate::model::{Coordinate, CurrentConditions, DailyForecast};
use crate::provider::{WeatherApi, openweather_from_config};

/// Facade over location resolution and the weather provider.
///
/// These three operations are the only entry points the rest of the
/// application uses to obtain weather data. Each call is a stateless
/// single-pass pipeline: resolve, fetch, normalize, return. Nothing is
/// cached and nothing is retried; callers wanting resilience re-invoke.
pub struct WeatherService {
    location: Box<dyn LocationSource>,
    api: Box<dyn WeatherApi>,
}

impl WeatherService {
    pub fn new(location: Box<dyn LocationSource>, api: Box<dyn WeatherApi>) -> Self {
        Self { location, api }
    }

    /// Build the production service: configured location + OpenWeather.
    pub fn from_config(config: &Config) -> Result<Self, WeatherError> {
        let api = openweather_from_config(config)?;
        Ok(Self::new(Box::new(ConfiguredLocation::new(config)), Box::new(api)))
    }

    /// Current conditions at the resolved location.
    pub async fn current_weather(&self) -> Result<CurrentConditions, WeatherError> {
        let coord = self.resolve_location().await?;
        self.api.current(coord).await
    }

    /// Seven-day forecast at the resolved location.
    pub async fn forecast(&self) -> Result<Vec<DailyForecast>, WeatherError> {
        let coord = self.resolve_location().await?;
        self.api.forecast(coord).await
    }

    /// Current conditions for a named place; does not touch the location source.
    pub async fn weather_by_city(&self, city: &str) -> Result<CurrentConditions, WeatherError> {
        self.api.current_by_name(city).await
    }

    // Short-circuits before any network I/O when no coordinate is available.
    async fn resolve_location(&self) -> Result<Coordinate, WeatherError> {
        match self.location.resolve().await {
            Some(coord) => {
                debug!(lat = coord.latitude, lon = coord.longitude, "resolved location");
                Ok(coord)
            }
            None => {
                warn!("location unavailable, skipping weather fetch");
                Err(WeatherError::LocationUnavailable)
            }
        }
    }
}
