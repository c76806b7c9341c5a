//! Core library for the weather dashboard.
//!
//! This crate defines:
//! - Shared domain models (current conditions, per-day forecasts, city queries)
//! - City search suggestions and the recent-search list
//! - Grouping of flat upstream forecasts into per-day buckets
//! - The upstream OpenWeather provider used by the backend
//! - The dashboard client that talks to the backend
//! - Configuration for both sides
//!
//! It is used by `dashboard-server` and `dashboard-cli`.

pub mod client;
pub mod config;
pub mod forecast;
pub mod model;
pub mod provider;
pub mod recent;
pub mod suggest;

pub use client::{ClientError, DashboardClient, DashboardState, View, WeatherBundle};
pub use config::{ClientConfig, Environment, ServerConfig};
pub use forecast::{ForecastEntry, group_by_day};
pub use model::{CityQuery, CurrentWeather, DayForecast, ForecastByDay, ForecastReport, ForecastSlot};
pub use provider::{UpstreamError, WeatherProvider};
pub use recent::{FileRecentStore, MemoryRecentStore, RecentCities, RecentStore, RecentTracker};
pub use suggest::{Catalog, Highlight, SuggestionMatcher};
