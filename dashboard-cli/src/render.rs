//! Plain-text rendering of the dashboard.

use chrono::Local;
use dashboard_core::{
    CurrentWeather, ForecastReport, Highlight, RecentCities, View, forecast::SLOTS_PER_DAY_SHOWN,
};

pub fn weather_emoji(icon: &str) -> &'static str {
    match icon {
        "01d" => "☀️",
        "01n" => "🌙",
        "02d" => "⛅",
        "02n" | "03d" | "03n" | "04d" | "04n" => "☁️",
        "09d" | "09n" | "10d" | "10n" => "🌧️",
        "11d" | "11n" => "⛈️",
        "13d" | "13n" => "❄️",
        "50d" | "50n" => "🌫️",
        _ => "🌤️",
    }
}

/// Round half up, so -2.5 becomes -2.
fn round_temp(t: f64) -> i64 {
    (t + 0.5).floor() as i64
}

pub fn view(view: &View<'_>) -> String {
    match view {
        View::Loading => "Loading...".to_string(),
        View::Error(message) => format!("⚠️  {message}"),
        View::Weather(bundle) => {
            format!("{}\n{}", current(&bundle.current), forecast(&bundle.forecast))
        }
        View::Welcome => "Search for a city to see its weather".to_string(),
    }
}

pub fn current(weather: &CurrentWeather) -> String {
    let updated = weather.timestamp.with_timezone(&Local).format("%-m/%-d/%Y, %-I:%M:%S %p");

    format!(
        "{}, {}\n\
         Last updated: {updated}\n\
         {}  {}°C  (feels like {}°C)\n\
         {}\n\
         💧 Humidity {}%  💨 Wind {} m/s  🔽 Pressure {} hPa  ☁️ Cloudiness {}%\n",
        weather.city,
        weather.country,
        weather_emoji(&weather.icon),
        round_temp(weather.temperature),
        round_temp(weather.feels_like),
        weather.description.to_uppercase(),
        weather.humidity,
        weather.wind_speed,
        weather.pressure,
        weather.cloudiness,
    )
}

/// Each day shows at most its first few slots.
pub fn forecast(report: &ForecastReport) -> String {
    let days: String = report
        .forecast
        .days()
        .map(|(day, slots)| {
            let rows: String = slots
                .iter()
                .take(SLOTS_PER_DAY_SHOWN)
                .map(|slot| {
                    format!(
                        "  {:>11}  {}  {:>3}°C  {:<20}  💨 {} m/s\n",
                        slot.time,
                        weather_emoji(&slot.icon),
                        round_temp(slot.temperature),
                        slot.description,
                        slot.wind_speed,
                    )
                })
                .collect();
            format!("\n{day}\n{rows}")
        })
        .collect();

    format!("5-Day Forecast\n{days}")
}

/// One per line; the default highlighted entry is marked.
pub fn suggestions(list: &[String]) -> String {
    let highlight = Highlight::reset(list.len());
    list.iter()
        .enumerate()
        .map(|(i, city)| {
            let marker = if highlight.index() == Some(i) { '>' } else { ' ' };
            format!("{marker} {city}\n")
        })
        .collect()
}

pub fn recent(cities: &RecentCities) -> String {
    if cities.is_empty() {
        return "No recent searches.\n".to_string();
    }
    cities.iter().map(|c| format!("{c}\n")).collect()
}
