use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::warn;

use crate::suggest::Catalog;

const SERVER_CONFIG_FILE: &str = "server.toml";
const CLIENT_CONFIG_FILE: &str = "client.toml";

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";
pub const DEFAULT_UPSTREAM_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Deployment environment; `development` exposes error details in responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    pub fn is_development(self) -> bool {
        self == Environment::Development
    }
}

impl TryFrom<&str> for Environment {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(anyhow!(
                "Unknown environment '{value}'. Supported values: development, production."
            )),
        }
    }
}

/// Backend configuration.
///
/// Example TOML:
/// api_key = "..."
/// port = 5000
/// frontend_url = "http://localhost:5173"
/// environment = "development"
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// OpenWeather credential. Requests fail with 500 while it is unset.
    pub api_key: Option<String>,
    pub port: u16,
    /// The only origin allowed by CORS.
    pub frontend_url: String,
    pub environment: Environment,
    pub upstream_base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            port: DEFAULT_PORT,
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            environment: Environment::default(),
            upstream_base_url: DEFAULT_UPSTREAM_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ServerConfig {
    /// Load from the default config file (if any), then apply environment variables.
    pub fn load() -> Result<Self> {
        let path = config_file_path(SERVER_CONFIG_FILE)?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let cfg: Self = read_toml(path)?;
        cfg.with_env(|key| std::env::var(key).ok())
    }

    /// Overlay values from `lookup` (normally the process environment):
    /// `OPENWEATHER_API_KEY`, `PORT`, `FRONTEND_URL`, `APP_ENV`, `OPENWEATHER_BASE_URL`.
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("OPENWEATHER_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(port) = lookup("PORT") {
            self.port = port
                .trim()
                .parse()
                .with_context(|| format!("Invalid PORT value: '{port}'"))?;
        }
        if let Some(url) = lookup("FRONTEND_URL") {
            self.frontend_url = url;
        }
        if let Some(env) = lookup("APP_ENV") {
            self.environment = Environment::try_from(env.as_str()).unwrap_or_else(|err| {
                warn!(error = %err, "falling back to production");
                Environment::Production
            });
        }
        if let Some(url) = lookup("OPENWEATHER_BASE_URL") {
            self.upstream_base_url = url;
        }
        Ok(self)
    }

    /// Returns the API key, treating a blank value as absent.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Terminal dashboard configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the backend API, e.g. "http://localhost:5000/api".
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    /// Replaces the built-in list of known cities used for suggestions.
    pub catalog: Option<Vec<String>>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            catalog: None,
        }
    }
}

impl ClientConfig {
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let cfg: Self = read_toml(&path)?;
        Ok(cfg.with_env(|key| std::env::var(key).ok()))
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// `WEATHER_API_URL` overrides the backend base URL.
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("WEATHER_API_URL") {
            self.api_base_url = url;
        }
        self
    }

    pub fn catalog(&self) -> Catalog {
        match &self.catalog {
            Some(cities) => Catalog::new(cities.iter().cloned()),
            None => Catalog::default(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn config_file_path() -> Result<PathBuf> {
        config_file_path(CLIENT_CONFIG_FILE)
    }
}

pub(crate) fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "weather-dashboard", "weather-dashboard")
        .ok_or_else(|| anyhow!("Could not determine platform config directory"))
}

fn config_file_path(name: &str) -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join(name))
}

/// Read a TOML file, or return defaults if it doesn't exist yet.
fn read_toml<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Ok(T::default());
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}
