use thiserror::Error;

/// Failure reasons surfaced by the weather facade.
///
/// Nothing in this crate panics or throws past the public contract; every
/// fallible operation returns one of these variants so callers can decide
/// how to degrade (typically by showing "weather unavailable").
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Location permission was denied or no coordinate is configured.
    /// Facade operations short-circuit on this before any network I/O.
    #[error("location unavailable")]
    LocationUnavailable,

    /// The provider request could not be sent, or came back non-2xx.
    #[error("weather provider request failed: {0}")]
    Provider(String),

    /// The provider answered 2xx but the body did not match the expected shape.
    #[error("failed to parse provider response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Missing or unusable configuration, e.g. no API key.
    #[error("configuration error: {0}")]
    Config(String),
}
