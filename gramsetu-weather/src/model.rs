use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A geographic coordinate pair, produced by a [`crate::LocationSource`].
///
/// Consumed immediately by the fetchers; never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// A single normalized weather snapshot, ready for display.
///
/// All numeric fields are rounded to the nearest integer at the
/// normalization boundary; this rounding is part of the display contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature_c: i32,
    pub humidity_pct: i32,
    pub wind_speed_kmh: i32,
    pub condition: String,
    /// Display token, e.g. an emoji glyph. See [`crate::units::icon_for`].
    pub icon: String,
    pub pressure_hpa: i32,
    pub visibility_km: i32,
    /// Always 0: the snapshot endpoint carries no UV data and the dedicated
    /// UV endpoint is not integrated. Known data gap, not a bug.
    pub uv_index: i32,
    /// `"{name}, {country}"` as reported by the provider.
    pub location: String,
}

/// One calendar day of aggregated forecast data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub date: NaiveDate,
    /// "Today", "Tomorrow", or a three-letter weekday abbreviation.
    pub day_label: String,
    pub high_c: i32,
    pub low_c: i32,
    pub condition: String,
    pub icon: String,
    /// Maximum precipitation probability over the day's samples, in percent.
    pub rain_chance_pct: i32,
}
