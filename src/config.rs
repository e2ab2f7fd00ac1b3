//! Configuration management for the weather gateway
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use std::env;
use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::WeatherError;

/// Environment variable holding the OpenWeatherMap API key
pub const API_KEY_VAR: &str = "OPENWEATHERMAP_API_KEY";

/// Root configuration structure for the weather gateway
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GatewayConfig {
    /// HTTP listener configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Upstream provider configuration
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Upstream provider settings
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key from the config file; the environment variable wins when set
    #[serde(default)]
    pub api_key: Option<String>,
    /// Base URL of the provider API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-call timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Answer with scaffold responses when no API key is configured
    #[serde(default = "default_scaffold_fallback")]
    pub scaffold_fallback: bool,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty, compact or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_base_url() -> String {
    "https://api.openweathermap.org".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_scaffold_fallback() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            scaffold_fallback: default_scaffold_fallback(),
        }
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &self.api_key.as_deref().map(mask_key))
            .field("base_url", &self.base_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("scaffold_fallback", &self.scaffold_fallback)
            .finish()
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

/// First four characters of a key, for logs
#[must_use]
pub fn mask_key(key: &str) -> String {
    let prefix: String = key.chars().take(4).collect();
    format!("{prefix}...")
}

/// Where the API key comes from.
///
/// Looked up on every request so a key added or removed at runtime takes
/// effect without a restart. Empty values count as missing.
#[derive(Clone)]
pub enum CredentialSource {
    /// Read an environment variable, falling back to a configured key
    Environment {
        variable: String,
        fallback: Option<String>,
    },
    /// Fixed key, mostly for tests
    Fixed(Option<String>),
}

impl CredentialSource {
    /// Environment lookup of [`API_KEY_VAR`] backed by the file-configured key
    #[must_use]
    pub fn from_config(config: &ProviderConfig) -> Self {
        Self::Environment {
            variable: API_KEY_VAR.to_string(),
            fallback: config.api_key.clone(),
        }
    }

    /// Current API key, if any
    #[must_use]
    pub fn current(&self) -> Option<String> {
        let key = match self {
            Self::Environment { variable, fallback } => env::var(variable)
                .ok()
                .filter(|k| !k.trim().is_empty())
                .or_else(|| fallback.clone()),
            Self::Fixed(key) => key.clone(),
        };
        key.filter(|k| !k.trim().is_empty())
    }
}

impl fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Environment { variable, fallback } => f
                .debug_struct("Environment")
                .field("variable", variable)
                .field("fallback", &fallback.as_deref().map(mask_key))
                .finish(),
            Self::Fixed(key) => f
                .debug_tuple("Fixed")
                .field(&key.as_deref().map(mask_key))
                .finish(),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from the given file (or the default location) and
    /// environment variables
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
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

        // Add environment variable overrides with WEATHER_GATEWAY_ prefix
        builder = builder.add_source(
            Environment::with_prefix("WEATHER_GATEWAY")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // Plain PORT wins, as most hosting platforms set it
        builder = builder
            .set_override_option("server.port", env::var("PORT").ok())
            .with_context(|| "Failed to apply PORT override")?;

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: GatewayConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        // Apply defaults for missing values
        config.apply_defaults();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("weather-gateway").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.provider.base_url.is_empty() {
            self.provider.base_url = default_base_url();
        }
        if self.provider.timeout_seconds == 0 {
            self.provider.timeout_seconds = default_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(WeatherError::config("Server port must be greater than 0").into());
        }

        if self.provider.timeout_seconds > 300 {
            return Err(
                WeatherError::config("Provider timeout cannot exceed 300 seconds").into(),
            );
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(WeatherError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "compact", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(WeatherError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.provider.base_url.starts_with("http://")
            && !self.provider.base_url.starts_with("https://")
        {
            return Err(WeatherError::config(
                "Provider base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        Ok(())
    }

    /// Address the HTTP listener binds to
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
