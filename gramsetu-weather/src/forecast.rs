//! Day-bucketed forecast aggregation.
//!
//! The provider returns a flat chronological series of 3-hour samples; this
//! module reduces it to one summary per calendar day. The reduction is pure
//! so it can be tested without a network or a wall clock.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

use crate::model::DailyForecast;
use crate::units::{day_label, icon_for};

/// The output series is capped at the first 7 distinct days.
pub const MAX_FORECAST_DAYS: usize = 7;

/// One fine-grained observation from the forecast series, provider units.
#[derive(Debug, Clone)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub temp_c: f64,
    /// Precipitation probability as a 0–1 fraction.
    pub pop: f64,
    pub condition: String,
    /// Provider icon code, mapped to a display token during aggregation.
    pub icon_code: String,
}

/// Reduce a chronological sample series to at most [`MAX_FORECAST_DAYS`]
/// daily summaries.
///
/// Samples are bucketed by calendar date in the `offset` timezone (the
/// observed location's local representation), so each sample belongs to
/// exactly one day. Per bucket: high is the max temperature, low the min,
/// rain chance the max precipitation probability (a single rain-bearing
/// sample must not be diluted by averaging), and the condition/icon come
/// from the temporally-middle sample, index `len / 2`.
///
/// Days beyond the cap are dropped, not merged; fewer than 7 days in the
/// input yields fewer than 7 summaries, with no padding.
pub fn aggregate_daily(
    samples: &[Sample],
    offset: FixedOffset,
    today: NaiveDate,
) -> Vec<DailyForecast> {
    let mut order: Vec<NaiveDate> = Vec::new();
    let mut buckets: HashMap<NaiveDate, Vec<&Sample>> = HashMap::new();

    for sample in samples {
        let date = sample.timestamp.with_timezone(&offset).date_naive();
        buckets
            .entry(date)
            .or_insert_with(|| {
                order.push(date);
                Vec::new()
            })
            .push(sample);
    }

    order
        .into_iter()
        .take(MAX_FORECAST_DAYS)
        .filter_map(|date| {
            let day = buckets.get(&date)?;
            // Buckets are non-empty by construction.
            let middle = day.get(day.len() / 2)?;

            let mut high = f64::NEG_INFINITY;
            let mut low = f64::INFINITY;
            let mut max_pop = 0.0_f64;
            for sample in day {
                high = high.max(sample.temp_c);
                low = low.min(sample.temp_c);
                max_pop = max_pop.max(sample.pop);
            }

            Some(DailyForecast {
                date,
                day_label: day_label(date, today),
                high_c: high.round() as i32,
                low_c: low.round() as i32,
                condition: middle.condition.clone(),
                icon: icon_for(&middle.icon_code).to_string(),
                rain_chance_pct: (max_pop * 100.0).round() as i32,
            })
        })
        .collect()
}
