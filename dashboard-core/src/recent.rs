//! Bounded, most-recent-first list of searched cities and its persistence.

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, warn};

use crate::{config::project_dirs, model::CityQuery};

pub const MAX_RECENT: usize = 6;

const RECENT_FILE: &str = "recent_cities.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RecentCities(Vec<String>);

impl RecentCities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move `city` to the front, dropping any case-insensitive duplicate.
    /// Blank input leaves the list unchanged.
    pub fn record(&self, city: &str) -> Self {
        let Some(query) = CityQuery::parse(city) else {
            return self.clone();
        };

        let mut cities = Vec::with_capacity(MAX_RECENT);
        cities.push(query.as_str().to_string());
        cities.extend(self.0.iter().filter(|c| !query.matches(c)).cloned());
        cities.truncate(MAX_RECENT);
        Self(cities)
    }

    /// Parse a persisted value.
    ///
    /// Returns `None` unless `raw` is a JSON array. Non-string and blank
    /// elements are dropped and the result is capped at [`MAX_RECENT`].
    pub fn from_stored(raw: &str) -> Option<Self> {
        let items: Vec<serde_json::Value> = serde_json::from_str(raw).ok()?;
        let cities = items
            .into_iter()
            .filter_map(|v| match v {
                serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
                _ => None,
            })
            .take(MAX_RECENT)
            .collect();
        Some(Self(cities))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Durable storage for the recent-city list.
pub trait RecentStore {
    /// Never fails; missing or corrupt data yields an empty list.
    fn load(&self) -> RecentCities;

    /// Persist the full list. An empty list clears the stored value.
    fn save(&self, cities: &RecentCities) -> Result<()>;
}

/// Stores the list as a JSON array in a single file.
#[derive(Debug, Clone)]
pub struct FileRecentStore {
    path: PathBuf,
}

impl FileRecentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under the platform data directory.
    pub fn default_location() -> Result<Self> {
        let dirs = project_dirs()?;
        Ok(Self::new(dirs.data_dir().join(RECENT_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecentStore for FileRecentStore {
    fn load(&self) -> RecentCities {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no recent cities stored yet");
                return RecentCities::new();
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "failed to read recent cities");
                return RecentCities::new();
            }
        };

        RecentCities::from_stored(&raw).unwrap_or_else(|| {
            warn!(path = %self.path.display(), "ignoring malformed recent cities data");
            RecentCities::new()
        })
    }

    fn save(&self, cities: &RecentCities) -> Result<()> {
        if cities.is_empty() {
            return match fs::remove_file(&self.path) {
                Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err).with_context(|| {
                    format!("Failed to remove recent cities file: {}", self.path.display())
                }),
                _ => Ok(()),
            };
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create data directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string(cities).context("Failed to serialize recent cities")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write recent cities file: {}", self.path.display()))
    }
}

/// Keeps the serialized value in memory.
#[derive(Debug, Default)]
pub struct MemoryRecentStore {
    raw: Mutex<Option<String>>,
}

impl MemoryRecentStore {
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self { raw: Mutex::new(Some(raw.into())) }
    }

    pub fn raw(&self) -> Option<String> {
        self.raw.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl RecentStore for MemoryRecentStore {
    fn load(&self) -> RecentCities {
        match self.raw() {
            Some(raw) => RecentCities::from_stored(&raw).unwrap_or_else(|| {
                warn!("ignoring malformed recent cities data");
                RecentCities::new()
            }),
            None => RecentCities::new(),
        }
    }

    fn save(&self, cities: &RecentCities) -> Result<()> {
        let value = if cities.is_empty() {
            None
        } else {
            Some(serde_json::to_string(cities).context("Failed to serialize recent cities")?)
        };
        *self.raw.lock().unwrap_or_else(PoisonError::into_inner) = value;
        Ok(())
    }
}

/// The recent-city list together with the store that persists it.
#[derive(Debug)]
pub struct RecentTracker<S> {
    store: S,
    cities: RecentCities,
}

impl<S: RecentStore> RecentTracker<S> {
    /// Load the initial list from `store`.
    pub fn open(store: S) -> Self {
        let cities = store.load();
        Self { store, cities }
    }

    /// Record a search and persist the resulting list when it changed.
    pub fn record(&mut self, city: &str) -> Result<()> {
        let updated = self.cities.record(city);
        if updated == self.cities {
            return Ok(());
        }
        self.cities = updated;
        self.store.save(&self.cities)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.cities = RecentCities::new();
        self.store.save(&self.cities)
    }

    pub fn cities(&self) -> &RecentCities {
        &self.cities
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
