use std::fmt;

use chrono::{DateTime, Utc};
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, Visitor},
    ser::SerializeMap,
};

/// A user-entered city name, trimmed and guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CityQuery(String);

impl CityQuery {
    /// Trim `raw`; returns `None` when nothing is left.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() { None } else { Some(Self(trimmed.to_string())) }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Case-insensitive comparison against another city name.
    pub fn matches(&self, other: &str) -> bool {
        self.0.to_lowercase() == other.trim().to_lowercase()
    }
}

impl fmt::Display for CityQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Current conditions, flattened from the upstream response (metric units).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentWeather {
    pub city: String,
    pub country: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: u32,
    pub pressure: u32,
    pub description: String,
    pub icon: String,
    pub wind_speed: f64,
    pub cloudiness: u32,
    #[serde(with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
}

/// One forecast point inside a day bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastSlot {
    pub time: String,
    pub temperature: f64,
    pub description: String,
    pub icon: String,
    pub wind_speed: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayForecast {
    pub label: String,
    pub slots: Vec<ForecastSlot>,
}

/// Forecast slots keyed by day-label.
///
/// Days keep the order in which their label was first seen and serialize as
/// a JSON object in that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastByDay {
    days: Vec<DayForecast>,
}

impl ForecastByDay {
    /// Append `slot` to the bucket for `label`, creating the bucket if needed.
    pub fn push(&mut self, label: String, slot: ForecastSlot) {
        self.extend_day(label, std::iter::once(slot));
    }

    fn extend_day(&mut self, label: String, slots: impl IntoIterator<Item = ForecastSlot>) {
        match self.days.iter_mut().find(|d| d.label == label) {
            Some(day) => day.slots.extend(slots),
            None => self.days.push(DayForecast { label, slots: slots.into_iter().collect() }),
        }
    }

    pub fn days(&self) -> impl Iterator<Item = (&str, &[ForecastSlot])> {
        self.days.iter().map(|d| (d.label.as_str(), d.slots.as_slice()))
    }

    pub fn get(&self, label: &str) -> Option<&[ForecastSlot]> {
        self.days.iter().find(|d| d.label == label).map(|d| d.slots.as_slice())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.days.iter().map(|d| d.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl Serialize for ForecastByDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.days.len()))?;
        for day in &self.days {
            map.serialize_entry(&day.label, &day.slots)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ForecastByDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DaysVisitor;

        impl<'de> Visitor<'de> for DaysVisitor {
            type Value = ForecastByDay;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of day labels to forecast slots")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut out = ForecastByDay::default();
                while let Some((label, slots)) = access.next_entry::<String, Vec<ForecastSlot>>()? {
                    out.extend_day(label, slots);
                }
                Ok(out)
            }
        }

        deserializer.deserialize_map(DaysVisitor)
    }
}

/// Response body of the forecast endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastReport {
    pub city: String,
    pub country: String,
    pub forecast: ForecastByDay,
}

/// RFC 3339 timestamps with millisecond precision and a `Z` suffix.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(D::Error::custom)
    }
}
