//! Configuration management for `TravelMagic`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::TravelMagicError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `TravelMagic` application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TravelMagicConfig {
    /// Weather and geocoding API configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Language model configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Persistent store configuration
    #[serde(default)]
    pub storage: StorageConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Itinerary planner settings
    #[serde(default)]
    pub planner: PlannerConfig,
}

/// Weather API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Disable all weather lookups and use seasonal placeholders
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Base URL for the forecast API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Base URL for the geocoding API
    #[serde(default = "default_geocoding_base_url")]
    pub geocoding_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_seconds: u32,
    /// Maximum number of retries for transient failures
    #[serde(default = "default_weather_max_retries")]
    pub max_retries: u32,
    /// How many days ahead the forecast API can answer
    #[serde(default = "default_forecast_horizon")]
    pub forecast_horizon_days: u32,
}

/// Language model configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Use the language model before falling back to templates
    #[serde(default)]
    pub enabled: bool,
    /// Base URL of an OpenAI-compatible API
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    /// Model name
    #[serde(default = "default_llm_model")]
    pub model: String,
    /// API key (falls back to `OPENAI_API_KEY`)
    pub api_key: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_llm_timeout")]
    pub timeout_seconds: u32,
    /// Retries for transient failures before falling back to templates
    #[serde(default = "default_llm_max_retries")]
    pub max_retries: u32,
    /// Completion token limit
    #[serde(default = "default_llm_max_tokens")]
    pub max_tokens: u32,
    /// Sampling temperature
    #[serde(default = "default_llm_temperature")]
    pub temperature: f32,
}

/// Persistent store configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Store directory location
    #[serde(default = "default_storage_location")]
    pub location: String,
    /// Weather cache TTL in hours
    #[serde(default = "default_weather_ttl")]
    pub weather_ttl_hours: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// HTTP server configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
}

/// Itinerary planner settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Fixed RNG seed for reproducible template itineraries
    pub seed: Option<u64>,
    /// Longest trip accepted, in days
    #[serde(default = "default_max_trip_days")]
    pub max_trip_days: u32,
}

// Default value functions
fn default_true() -> bool {
    true
}

fn default_weather_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_geocoding_base_url() -> String {
    "https://geocoding-api.open-meteo.com/v1".to_string()
}

fn default_weather_timeout() -> u32 {
    30
}

fn default_weather_max_retries() -> u32 {
    3
}

fn default_forecast_horizon() -> u32 {
    16
}

fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_llm_timeout() -> u32 {
    60
}

fn default_llm_max_retries() -> u32 {
    2
}

fn default_llm_max_tokens() -> u32 {
    2048
}

fn default_llm_temperature() -> f32 {
    0.7
}

fn default_storage_location() -> String {
    "~/.local/share/travelmagic".to_string()
}

fn default_weather_ttl() -> u32 {
    6
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_max_trip_days() -> u32 {
    30
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_weather_base_url(),
            geocoding_url: default_geocoding_base_url(),
            timeout_seconds: default_weather_timeout(),
            max_retries: default_weather_max_retries(),
            forecast_horizon_days: default_forecast_horizon(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            api_key: None,
            timeout_seconds: default_llm_timeout(),
            max_retries: default_llm_max_retries(),
            max_tokens: default_llm_max_tokens(),
            temperature: default_llm_temperature(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            location: default_storage_location(),
            weather_ttl_hours: default_weather_ttl(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_trip_days: default_max_trip_days(),
        }
    }
}

impl TravelMagicConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // TRAVELMAGIC_LLM__API_KEY -> llm.api_key
        builder = builder.add_source(
            Environment::with_prefix("TRAVELMAGIC")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: TravelMagicConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("travelmagic").join("config.toml"))
    }

    /// Apply default values to empty or zeroed configuration fields
    pub fn apply_defaults(&mut self) {
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.geocoding_url.is_empty() {
            self.weather.geocoding_url = default_geocoding_base_url();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_weather_timeout();
        }
        if self.weather.forecast_horizon_days == 0 {
            self.weather.forecast_horizon_days = default_forecast_horizon();
        }
        if self.llm.base_url.is_empty() {
            self.llm.base_url = default_llm_base_url();
        }
        if self.llm.model.is_empty() {
            self.llm.model = default_llm_model();
        }
        if self.llm.api_key.is_none() {
            self.llm.api_key = std::env::var("OPENAI_API_KEY").ok();
        }
        if self.storage.location.is_empty() {
            self.storage.location = default_storage_location();
        }
        if self.storage.weather_ttl_hours == 0 {
            self.storage.weather_ttl_hours = default_weather_ttl();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.planner.max_trip_days == 0 {
            self.planner.max_trip_days = default_max_trip_days();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate the language model credentials when the model is enabled
    pub fn validate_api_keys(&self) -> Result<()> {
        if !self.llm.enabled {
            return Ok(());
        }

        match &self.llm.api_key {
            None => Err(TravelMagicError::config(
                "Language model is enabled but no API key is set. Set llm.api_key or OPENAI_API_KEY.",
            )
            .into()),
            Some(key) if key.trim().is_empty() => Err(TravelMagicError::config(
                "Language model API key cannot be empty",
            )
            .into()),
            Some(key) if key.len() < 8 => Err(TravelMagicError::config(
                "Language model API key appears to be invalid (too short)",
            )
            .into()),
            Some(_) => Ok(()),
        }
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.weather.timeout_seconds > 300 {
            return Err(
                TravelMagicError::config("Weather API timeout cannot exceed 300 seconds").into(),
            );
        }

        if self.weather.max_retries > 10 {
            return Err(TravelMagicError::config("Weather API max retries cannot exceed 10").into());
        }

        if self.llm.timeout_seconds > 600 {
            return Err(TravelMagicError::config(
                "Language model timeout cannot exceed 600 seconds",
            )
            .into());
        }

        if self.llm.max_retries > 10 {
            return Err(
                TravelMagicError::config("Language model max retries cannot exceed 10").into(),
            );
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(TravelMagicError::config(
                "Language model temperature must be between 0.0 and 2.0",
            )
            .into());
        }

        if self.storage.weather_ttl_hours > 168 {
            return Err(TravelMagicError::config(
                "Weather cache TTL cannot exceed 168 hours (1 week)",
            )
            .into());
        }

        if self.planner.max_trip_days > 90 {
            return Err(TravelMagicError::config("Maximum trip length cannot exceed 90 days").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(TravelMagicError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(TravelMagicError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("Weather API base URL", &self.weather.base_url),
            ("Geocoding API base URL", &self.weather.geocoding_url),
            ("Language model base URL", &self.llm.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(TravelMagicError::config(format!(
                    "{name} must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }

    /// Store directory with a leading `~` expanded
    #[must_use]
    pub fn storage_path(&self) -> PathBuf {
        expand_home(&self.storage.location)
    }
}

fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}
