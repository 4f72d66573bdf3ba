//! Configuration management for the `TravelAI` gateway
//!
//! Settings come from built-in defaults, an optional TOML file and
//! `TRAVELAI__`-prefixed environment variables. Provider credentials are read
//! separately from their well-known variables (`AMADEUS_API_KEY`, ...) and
//! default to empty strings, so a missing key only surfaces once the provider
//! rejects a request.
//!
//! The resulting [`GatewayConfig`] is built once in `main` and handed to the
//! provider clients by value; nothing reads the environment after startup.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::GatewayError;

pub const AMADEUS_API_KEY: &str = "AMADEUS_API_KEY";
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const GEOAPIFY_API_KEY: &str = "GEOAPIFY_API_KEY";
pub const OPENMETEO_API_KEY: &str = "OPENMETEO_API_KEY";

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_VAR: &str = "TRAVELAI_CONFIG";

const MAX_TIMEOUT_SECONDS: u32 = 300;

/// Root configuration structure for the gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Inbound HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Flight offer search provider
    #[serde(default = "default_amadeus")]
    pub amadeus: ProviderConfig,
    /// Text completion provider
    #[serde(default)]
    pub openai: OpenAiConfig,
    /// Points-of-interest provider
    #[serde(default = "default_geoapify")]
    pub geoapify: ProviderConfig,
    /// Forecast provider
    #[serde(default = "default_open_meteo")]
    pub open_meteo: ProviderConfig,
    /// Provider API keys, never read from or written to the config file
    #[serde(skip)]
    pub credentials: ProviderCredentials,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Largest accepted inbound body in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
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

/// Connection settings shared by every provider client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Empty means the provider's public endpoint
    #[serde(default)]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Completion model identifier
    #[serde(default = "default_openai_model")]
    pub model: String,
}

/// API keys for the four providers
///
/// Empty strings stand for "not configured". The forecast provider needs no
/// key; `openmeteo_api_key` is loaded so a keyed plan can be added later.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ProviderCredentials {
    pub amadeus_api_key: String,
    pub openai_api_key: String,
    pub geoapify_api_key: String,
    pub openmeteo_api_key: String,
}

impl fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redact(key: &str) -> &'static str {
            if key.is_empty() { "<unset>" } else { "<redacted>" }
        }

        f.debug_struct("ProviderCredentials")
            .field("amadeus_api_key", &redact(&self.amadeus_api_key))
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("geoapify_api_key", &redact(&self.geoapify_api_key))
            .field("openmeteo_api_key", &redact(&self.openmeteo_api_key))
            .finish()
    }
}

impl ProviderCredentials {
    /// Read every key from the process environment
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read every key through `lookup`, defaulting absent ones to empty
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).unwrap_or_default();
        Self {
            amadeus_api_key: read(AMADEUS_API_KEY),
            openai_api_key: read(OPENAI_API_KEY),
            geoapify_api_key: read(GEOAPIFY_API_KEY),
            openmeteo_api_key: read(OPENMETEO_API_KEY),
        }
    }

    /// Names of the variables that are unset or empty
    #[must_use]
    pub fn missing(&self) -> Vec<&'static str> {
        [
            (AMADEUS_API_KEY, &self.amadeus_api_key),
            (OPENAI_API_KEY, &self.openai_api_key),
            (GEOAPIFY_API_KEY, &self.geoapify_api_key),
        ]
        .into_iter()
        .filter(|(_, key)| key.is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

impl ProviderConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }
}

impl OpenAiConfig {
    #[must_use]
    pub fn provider(&self) -> ProviderConfig {
        ProviderConfig {
            base_url: self.base_url.clone(),
            timeout_seconds: self.timeout_seconds,
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_max_body_bytes() -> usize {
    64 * 1024
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_timeout() -> u32 {
    15
}

fn default_amadeus_base_url() -> String {
    "https://api.amadeus.com".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_openai_model() -> String {
    "gpt-3.5-turbo-instruct".to_string()
}

fn default_geoapify_base_url() -> String {
    "https://api.geoapify.com".to_string()
}

fn default_open_meteo_base_url() -> String {
    "https://api.open-meteo.com".to_string()
}

fn default_amadeus() -> ProviderConfig {
    ProviderConfig {
        base_url: default_amadeus_base_url(),
        timeout_seconds: default_timeout(),
    }
}

fn default_geoapify() -> ProviderConfig {
    ProviderConfig {
        base_url: default_geoapify_base_url(),
        timeout_seconds: default_timeout(),
    }
}

fn default_open_meteo() -> ProviderConfig {
    ProviderConfig {
        base_url: default_open_meteo_base_url(),
        timeout_seconds: default_timeout(),
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
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

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: default_openai_base_url(),
            timeout_seconds: default_timeout(),
            model: default_openai_model(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            amadeus: default_amadeus(),
            openai: OpenAiConfig::default(),
            geoapify: default_geoapify(),
            open_meteo: default_open_meteo(),
            credentials: ProviderCredentials::default(),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_VAR).ok().map(PathBuf::from);
        Self::load_from_path(path)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|path| path.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(FileFormat::Toml),
            );
        }

        // e.g. TRAVELAI__SERVER__PORT=8080
        builder = builder.add_source(
            Environment::with_prefix("TRAVELAI")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| format!("Failed to build configuration from {}", config_file.display()))?;

        let mut config: GatewayConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.credentials = ProviderCredentials::from_env();
        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("travelai").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.server.port == 0 {
            self.server.port = default_port();
        }
        if self.server.max_body_bytes == 0 {
            self.server.max_body_bytes = default_max_body_bytes();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.openai.model.is_empty() {
            self.openai.model = default_openai_model();
        }
        if self.openai.base_url.is_empty() {
            self.openai.base_url = default_openai_base_url();
        }
        if self.openai.timeout_seconds == 0 {
            self.openai.timeout_seconds = default_timeout();
        }

        for (provider, base_url) in [
            (&mut self.amadeus, default_amadeus_base_url()),
            (&mut self.geoapify, default_geoapify_base_url()),
            (&mut self.open_meteo, default_open_meteo_base_url()),
        ] {
            if provider.base_url.is_empty() {
                provider.base_url = base_url;
            }
            if provider.timeout_seconds == 0 {
                provider.timeout_seconds = default_timeout();
            }
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_providers()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_providers(&self) -> Result<()> {
        let openai = self.openai.provider();
        for (name, provider) in [
            ("amadeus", &self.amadeus),
            ("openai", &openai),
            ("geoapify", &self.geoapify),
            ("open_meteo", &self.open_meteo),
        ] {
            if provider.timeout_seconds == 0 || provider.timeout_seconds > MAX_TIMEOUT_SECONDS {
                return Err(GatewayError::config(format!(
                    "{name} timeout must be between 1 and {MAX_TIMEOUT_SECONDS} seconds"
                ))
                .into());
            }

            if !provider.base_url.starts_with("http://") && !provider.base_url.starts_with("https://") {
                return Err(GatewayError::config(format!(
                    "{name} base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(GatewayError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(GatewayError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = GatewayConfig::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.amadeus.base_url, "https://api.amadeus.com");
        assert_eq!(config.open_meteo.timeout(), Duration::from_secs(15));
        assert_eq!(config.logging.level, "info");
        assert!(config.credentials.amadeus_api_key.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_credentials_default_to_empty() {
        let env = HashMap::from([(OPENAI_API_KEY, "sk-test".to_string())]);
        let credentials = ProviderCredentials::from_lookup(|name| env.get(name).cloned());

        assert_eq!(credentials.openai_api_key, "sk-test");
        assert_eq!(credentials.amadeus_api_key, "");
        assert_eq!(credentials.geoapify_api_key, "");
        assert_eq!(credentials.openmeteo_api_key, "");
        assert_eq!(credentials.missing(), vec![AMADEUS_API_KEY, GEOAPIFY_API_KEY]);
    }

    #[test]
    fn test_credentials_debug_is_redacted() {
        let credentials = ProviderCredentials {
            amadeus_api_key: "super-secret".to_string(),
            ..Default::default()
        };
        let debug = format!("{credentials:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
        assert!(debug.contains("<unset>"));
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = GatewayConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_timeout_range() {
        let mut config = GatewayConfig::default();
        config.geoapify.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("geoapify timeout"));
    }

    #[test]
    fn test_config_validation_base_url() {
        let mut config = GatewayConfig::default();
        config.openai.base_url = "ftp://example.com".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("openai base URL"));
    }

    #[test]
    fn test_apply_defaults_repairs_zero_values() {
        let mut config = GatewayConfig::default();
        config.amadeus.timeout_seconds = 0;
        config.open_meteo.base_url.clear();
        config.server.port = 0;
        config.apply_defaults();

        assert_eq!(config.amadeus.timeout_seconds, 15);
        assert_eq!(config.open_meteo.base_url, "https://api.open-meteo.com");
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_load_from_toml_file() {
        let path = std::env::temp_dir().join(format!("travelai-gateway-{}.toml", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[server]
port = 8088

[amadeus]
base_url = "https://test.api.amadeus.com"
timeout_seconds = 20

[openai]
model = "custom-model"
"#
        )
        .unwrap();

        let config = GatewayConfig::load_from_path(Some(path.clone()));
        std::fs::remove_file(&path).unwrap();
        let config = config.unwrap();

        assert_eq!(config.server.port, 8088);
        assert_eq!(config.amadeus.base_url, "https://test.api.amadeus.com");
        assert_eq!(config.amadeus.timeout_seconds, 20);
        assert_eq!(config.openai.model, "custom-model");
        assert_eq!(config.geoapify.base_url, "https://api.geoapify.com");
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = GatewayConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("travelai"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}
