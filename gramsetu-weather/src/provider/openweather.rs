use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Offset, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::error::WeatherError;
use crate::forecast::{self, Sample};
use crate::model::{Coordinate, CurrentConditions, DailyForecast};
use crate::units::{icon_for, meters_to_km, wind_ms_to_kmh};

use super::WeatherApi;

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// The provider and the OS location subsystem are both external and
/// unbounded; this caps worst-case latency per request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the OpenWeather `weather` and `forecast` endpoints.
///
/// Constructed explicitly by the caller and holds only immutable
/// configuration; there is no shared global instance. Every call builds its
/// result from scratch, with no caching.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Result<Self, WeatherError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Mainly for tests pointing at a local mock server.
    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| WeatherError::Provider(format!("failed to build http client: {e}")))?;

        Ok(Self { api_key, base_url, http })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, WeatherError> {
        let url = format!("{}/{endpoint}", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(query)
            .query(&[("appid", self.api_key.as_str()), ("units", "metric")])
            .send()
            .await
            .map_err(|e| {
                WeatherError::Provider(format!("failed to send request to {endpoint}: {e}"))
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            WeatherError::Provider(format!("failed to read {endpoint} response body: {e}"))
        })?;

        if !status.is_success() {
            return Err(WeatherError::Provider(format!(
                "{endpoint} request failed with status {status}: {}",
                truncate_body(&body),
            )));
        }

        Ok(serde_json::from_str(&body)?)
    }

    async fn fetch_current(
        &self,
        query: &[(&str, String)],
    ) -> Result<CurrentConditions, WeatherError> {
        let parsed: OwCurrentResponse = self.get_json("weather", query).await?;

        let condition = parsed.weather.first();

        Ok(CurrentConditions {
            temperature_c: parsed.main.temp.round() as i32,
            humidity_pct: parsed.main.humidity.round() as i32,
            wind_speed_kmh: wind_ms_to_kmh(parsed.wind.speed),
            condition: condition
                .map(|w| w.description.clone())
                .unwrap_or_else(|| "Unknown".to_string()),
            icon: icon_for(condition.map(|w| w.icon.as_str()).unwrap_or("")).to_string(),
            pressure_hpa: parsed.main.pressure.round() as i32,
            visibility_km: meters_to_km(parsed.visibility),
            // The snapshot endpoint carries no UV data; the dedicated UV
            // endpoint is deliberately not integrated.
            uv_index: 0,
            location: format!("{}, {}", parsed.name, parsed.sys.country),
        })
    }
}

fn coord_query(coord: Coordinate) -> Vec<(&'static str, String)> {
    vec![
        ("lat", coord.latitude.to_string()),
        ("lon", coord.longitude.to_string()),
    ]
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }
    // Byte 200 may land inside a multibyte character; back up to a boundary.
    let cut = (0..=MAX).rev().find(|&i| body.is_char_boundary(i)).unwrap_or(0);
    format!("{}...", &body[..cut])
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: f64,
    #[serde(default)]
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    // Occasionally absent from the snapshot response.
    #[serde(default)]
    visibility: f64,
    sys: OwSys,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwForecastMain,
    weather: Vec<OwWeather>,
    #[serde(default)]
    pop: f64,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    /// Offset from UTC in seconds for the queried location.
    #[serde(default)]
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
    city: OwCity,
}

impl OwForecastEntry {
    fn into_sample(self) -> Option<Sample> {
        let timestamp = DateTime::<Utc>::from_timestamp(self.dt, 0)?;
        let condition = self.weather.into_iter().next();

        Some(Sample {
            timestamp,
            temp_c: self.main.temp,
            pop: self.pop,
            condition: condition
                .as_ref()
                .map(|w| w.description.clone())
                .unwrap_or_else(|| "Unknown".to_string()),
            icon_code: condition.map(|w| w.icon).unwrap_or_default(),
        })
    }
}

#[async_trait]
impl WeatherApi for OpenWeatherClient {
    async fn current(&self, coord: Coordinate) -> Result<CurrentConditions, WeatherError> {
        debug!(lat = coord.latitude, lon = coord.longitude, "fetching current conditions");
        self.fetch_current(&coord_query(coord)).await
    }

    async fn current_by_name(&self, city: &str) -> Result<CurrentConditions, WeatherError> {
        debug!(city, "fetching current conditions by name");
        self.fetch_current(&[("q", city.to_string())]).await
    }

    async fn forecast(&self, coord: Coordinate) -> Result<Vec<DailyForecast>, WeatherError> {
        debug!(lat = coord.latitude, lon = coord.longitude, "fetching forecast series");
        let parsed: OwForecastResponse = self.get_json("forecast", &coord_query(coord)).await?;

        let offset =
            FixedOffset::east_opt(parsed.city.timezone).unwrap_or_else(|| Utc.fix());
        let today = Utc::now().with_timezone(&offset).date_naive();

        let samples: Vec<Sample> =
            parsed.list.into_iter().filter_map(OwForecastEntry::into_sample).collect();

        Ok(forecast::aggregate_daily(&samples, offset, today))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> OpenWeatherClient {
        OpenWeatherClient::with_base_url("TEST_KEY".into(), server.uri())
            .expect("client must build")
    }

    const CURRENT_BODY: &str = r#"{
        "name": "Pune",
        "main": { "temp": 30.4, "humidity": 64, "pressure": 1009 },
        "weather": [ { "description": "clear sky", "icon": "01d" } ],
        "wind": { "speed": 5.0 },
        "visibility": 8000,
        "sys": { "country": "IN" }
    }"#;

    #[tokio::test]
    async fn current_normalizes_units_and_location() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("lat", "18.52"))
            .and(query_param("lon", "73.86"))
            .and(query_param("appid", "TEST_KEY"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(CURRENT_BODY, "application/json"))
            .mount(&server)
            .await;

        let coord = Coordinate { latitude: 18.52, longitude: 73.86 };
        let current = client(&server).current(coord).await.expect("fetch must succeed");

        assert_eq!(current.temperature_c, 30);
        assert_eq!(current.humidity_pct, 64);
        assert_eq!(current.wind_speed_kmh, 18); // 5.0 m/s * 3.6
        assert_eq!(current.visibility_km, 8); // 8000 m
        assert_eq!(current.pressure_hpa, 1009);
        assert_eq!(current.condition, "clear sky");
        assert_eq!(current.icon, "☀️");
        assert_eq!(current.uv_index, 0);
        assert_eq!(current.location, "Pune, IN");
    }

    #[tokio::test]
    async fn current_by_name_queries_by_place() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "Nashik"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(CURRENT_BODY, "application/json"))
            .mount(&server)
            .await;

        let current =
            client(&server).current_by_name("Nashik").await.expect("fetch must succeed");

        assert_eq!(current.location, "Pune, IN");
    }

    #[tokio::test]
    async fn non_success_status_is_a_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(401).set_body_string("{\"message\":\"bad key\"}"))
            .mount(&server)
            .await;

        let coord = Coordinate { latitude: 18.52, longitude: 73.86 };
        let err = client(&server).current(coord).await.expect_err("401 must fail");

        assert!(matches!(err, WeatherError::Provider(_)));
        assert!(err.to_string().contains("status 401"));
    }

    #[tokio::test]
    async fn multibyte_error_body_is_truncated_without_panicking() {
        // 199 ASCII bytes followed by a four-byte glyph straddling the
        // truncation point.
        let body = format!("{}🌧", "x".repeat(199));

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(500).set_body_string(body))
            .mount(&server)
            .await;

        let coord = Coordinate { latitude: 18.52, longitude: 73.86 };
        let err = client(&server).current(coord).await.expect_err("500 must fail");

        assert!(matches!(err, WeatherError::Provider(_)));
        assert!(err.to_string().contains("status 500"));
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let body = format!("{}🌧 and more", "x".repeat(199));
        let truncated = truncate_body(&body);

        // The glyph starts at byte 199 and would split at byte 200.
        assert_eq!(truncated, format!("{}...", "x".repeat(199)));

        let short = "🌧".repeat(10);
        assert_eq!(truncate_body(&short), short);
    }

    #[tokio::test]
    async fn malformed_body_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let coord = Coordinate { latitude: 18.52, longitude: 73.86 };
        let err = client(&server).current(coord).await.expect_err("garbage must fail");

        assert!(matches!(err, WeatherError::Parse(_)));
    }

    #[tokio::test]
    async fn forecast_buckets_samples_into_days() {
        // 2024-01-16 06:00, 09:00, 12:00 UTC and 2024-01-17 06:00 UTC, IST offset.
        let body = r#"{
            "city": { "timezone": 19800 },
            "list": [
                { "dt": 1705384800, "main": { "temp": 14.4 },
                  "weather": [ { "description": "clear sky", "icon": "01d" } ], "pop": 0.1 },
                { "dt": 1705395600, "main": { "temp": 27.6 },
                  "weather": [ { "description": "light rain", "icon": "10d" } ], "pop": 0.8 },
                { "dt": 1705406400, "main": { "temp": 22.0 },
                  "weather": [ { "description": "clear sky", "icon": "01d" } ], "pop": 0.2 },
                { "dt": 1705471200, "main": { "temp": 19.0 },
                  "weather": [ { "description": "haze", "icon": "50d" } ], "pop": 0.0 }
            ]
        }"#;

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .and(query_param("lat", "18.52"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
            .mount(&server)
            .await;

        let coord = Coordinate { latitude: 18.52, longitude: 73.86 };
        let days = client(&server).forecast(coord).await.expect("fetch must succeed");

        assert_eq!(days.len(), 2);

        let first = &days[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 1, 16).expect("valid date"));
        assert_eq!(first.high_c, 28);
        assert_eq!(first.low_c, 14);
        assert_eq!(first.rain_chance_pct, 80);
        // Middle of three samples.
        assert_eq!(first.condition, "light rain");
        assert_eq!(first.icon, "🌦️");

        let second = &days[1];
        assert_eq!(second.date, NaiveDate::from_ymd_opt(2024, 1, 17).expect("valid date"));
        assert_eq!(second.high_c, 19);
        assert_eq!(second.low_c, 19);
        assert_eq!(second.condition, "haze");
    }

    #[tokio::test]
    async fn forecast_tolerates_missing_pop() {
        let body = r#"{
            "city": { "timezone": 0 },
            "list": [
                { "dt": 1705406400, "main": { "temp": 22.0 },
                  "weather": [ { "description": "clear sky", "icon": "01d" } ] }
            ]
        }"#;

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
            .mount(&server)
            .await;

        let coord = Coordinate { latitude: 18.52, longitude: 73.86 };
        let days = client(&server).forecast(coord).await.expect("fetch must succeed");

        assert_eq!(days.len(), 1);
        assert_eq!(days[0].rain_chance_pct, 0);
    }
}
