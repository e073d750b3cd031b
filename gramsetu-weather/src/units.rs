//! Pure unit and icon normalization.
//!
//! Everything here is stateless; these functions are the only place where
//! provider-native units and condition codes are translated into the
//! display-ready values of [`crate::model`]. Swapping weather providers
//! should only require touching this module and the wire mapping in
//! [`crate::provider`].

use chrono::NaiveDate;

/// Convert a wind speed in m/s to a rounded km/h value.
pub fn wind_ms_to_kmh(ms: f64) -> i32 {
    (ms * 3.6).round() as i32
}

/// Convert a distance in meters to a rounded kilometer value.
pub fn meters_to_km(m: f64) -> i32 {
    (m / 1000.0).round() as i32
}

/// Map an OpenWeather icon code to a display token.
///
/// Unmapped codes fall back to a generic partly-visible token instead of
/// failing; the provider occasionally introduces new codes.
pub fn icon_for(code: &str) -> &'static str {
    match code {
        "01d" => "☀️",
        "01n" => "🌙",
        "02d" => "⛅",
        "02n" => "☁️",
        "03d" | "03n" => "☁️",
        "04d" | "04n" => "☁️",
        "09d" | "09n" => "🌧️",
        "10d" => "🌦️",
        "10n" => "🌧️",
        "11d" | "11n" => "⛈️",
        "13d" | "13n" => "❄️",
        "50d" | "50n" => "🌫️",
        _ => "🌤️",
    }
}

/// Label a forecast date relative to a reference "today".
///
/// The reference date is passed in explicitly rather than read from the
/// wall clock, so the function stays deterministic under test.
pub fn day_label(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        "Today".to_string()
    } else if today.succ_opt().is_some_and(|tomorrow| date == tomorrow) {
        "Tomorrow".to_string()
    } else {
        date.format("%a").to_string()
    }
}
