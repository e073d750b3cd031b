//! Core weather library for GramSetu.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Location resolution (best-effort, nullable)
//! - The OpenWeather client and its wire-format mapping
//! - Day-bucketed forecast aggregation
//! - The `WeatherService` facade consumed by the rest of the application
//!
//! It is used by `gramsetu-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod forecast;
pub mod location;
pub mod model;
pub mod provider;
pub mod service;
pub mod units;

pub use config::Config;
pub use error::WeatherError;
pub use location::{ConfiguredLocation, LocationSource};
pub use model::{Coordinate, CurrentConditions, DailyForecast};
pub use provider::{WeatherApi, openweather::OpenWeatherClient};
pub use service::WeatherService;
