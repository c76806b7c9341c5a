//! Reshaping of the flat upstream forecast into per-day buckets.

use std::fmt::Display;

use chrono::{DateTime, TimeZone};
use tracing::warn;

use crate::model::{ForecastByDay, ForecastSlot};

/// Number of slots per day the dashboard shows; the backend does not truncate.
pub const SLOTS_PER_DAY_SHOWN: usize = 4;

/// A single upstream forecast point, already reduced to the fields we keep.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastEntry {
    /// Unix timestamp, seconds.
    pub dt: i64,
    pub temperature: f64,
    pub description: String,
    pub icon: String,
    pub wind_speed: f64,
}

/// Bucket `entries` by the calendar date of their timestamp in `tz`.
///
/// Days appear in first-seen order; slots keep input order within a day.
pub fn group_by_day<Tz>(entries: impl IntoIterator<Item = ForecastEntry>, tz: &Tz) -> ForecastByDay
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut out = ForecastByDay::default();

    for entry in entries {
        let Some(at) = tz.timestamp_opt(entry.dt, 0).single() else {
            warn!(dt = entry.dt, "skipping forecast entry with out-of-range timestamp");
            continue;
        };

        out.push(
            day_label(&at),
            ForecastSlot {
                time: time_label(&at),
                temperature: entry.temperature,
                description: entry.description,
                icon: entry.icon,
                wind_speed: entry.wind_speed,
            },
        );
    }

    out
}

/// `M/D/YYYY`, no zero padding.
pub fn day_label<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.format("%-m/%-d/%Y").to_string()
}

/// `h:MM:SS AM`, 12-hour clock.
pub fn time_label<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.format("%-I:%M:%S %p").to_string()
}
