use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::core::{EngineSettings, TravelModel};
use crate::models::{filters::DEFAULT_MAX_DISTANCE_KM, PriceRange, SearchFilters};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub directory: DirectorySettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectorySettings {
    /// Base URL of the provider directory; empty uses the built-in catalog
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    pub timeout_secs: Option<u64>,
    pub cache_ttl_secs: Option<u64>,
    pub cache_capacity: Option<u64>,
}

impl DirectorySettings {
    pub fn is_remote(&self) -> bool {
        !self.endpoint.trim().is_empty()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_max_distance_km")]
    pub default_max_distance_km: f64,
    #[serde(default = "default_price_min")]
    pub default_price_min: f64,
    #[serde(default = "default_price_max")]
    pub default_price_max: f64,
    #[serde(default)]
    pub travel: TravelModel,
    #[serde(default = "default_location_timeout_secs")]
    pub location_timeout_secs: u64,
    #[serde(default = "default_search_timeout_secs")]
    pub search_timeout_secs: u64,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            default_max_distance_km: default_max_distance_km(),
            default_price_min: default_price_min(),
            default_price_max: default_price_max(),
            travel: TravelModel::default(),
            location_timeout_secs: default_location_timeout_secs(),
            search_timeout_secs: default_search_timeout_secs(),
        }
    }
}

impl MatchingSettings {
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            default_filters: SearchFilters::with_defaults(
                self.default_max_distance_km,
                PriceRange::new(self.default_price_min, self.default_price_max),
            ),
            travel: self.travel,
            location_timeout: Duration::from_secs(self.location_timeout_secs),
            search_timeout: Duration::from_secs(self.search_timeout_secs),
        }
    }
}

fn default_max_distance_km() -> f64 { DEFAULT_MAX_DISTANCE_KM }
fn default_price_min() -> f64 { 0.0 }
fn default_price_max() -> f64 { 200.0 }
fn default_location_timeout_secs() -> u64 { 15 }
fn default_search_timeout_secs() -> u64 { 20 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Later sources override earlier ones:
    /// 1. Default values in the structs
    /// 2. config/default.toml
    /// 3. config/local.toml (development overrides)
    /// 4. Environment variables prefixed with MEDLOC, e.g.
    ///    MEDLOC__SERVER__PORT -> server.port
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(env_source())
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?
            .try_deserialize()
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("MEDLOC")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
