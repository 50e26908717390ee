//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `slidelink.toml` in the working directory, or the file named by
//! `SLIDELINK_CONFIG`. Connection settings have sensible defaults; the text
//! targets and trigger rules are what make a configuration useful.
//! Environment variables take precedence over file values.

use std::time::Duration;

use serde::Deserialize;

use slidelink_adapter_osc::OscConfig;
use slidelink_adapter_propresenter::ProPresenterConfig;
use slidelink_domain::rule::MatchRule;

const DEFAULT_PATH: &str = "slidelink.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Upstream ProPresenter stage display.
    pub propresenter: ProPresenterConfig,
    /// OSC output towards the control surface.
    pub osc: OscConfig,
    /// Relay behaviour.
    pub relay: RelayConfig,
    /// Ordered trigger rules; the first match wins.
    pub triggers: Vec<MatchRule>,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Relay behaviour.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// OSC addresses that receive every slide text (e.g. text block inputs).
    pub text_addresses: Vec<String>,
    /// Only the text before the first occurrence of this delimiter is relayed.
    pub split_delimiter: Option<String>,
    /// Seconds to wait after losing ProPresenter before reconnecting.
    pub reconnect_cooldown_secs: u16,
    /// Seconds between reconnect checks.
    pub tick_interval_secs: u16,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from the config file (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("SLIDELINK_CONFIG").unwrap_or_else(|_| DEFAULT_PATH.to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("SLIDELINK_PROPRESENTER_HOST") {
            self.propresenter.host = val;
        }
        if let Ok(val) = std::env::var("SLIDELINK_PROPRESENTER_PORT") {
            if let Ok(port) = val.parse() {
                self.propresenter.port = port;
            }
        }
        if let Ok(val) = std::env::var("SLIDELINK_PROPRESENTER_PASSWORD") {
            self.propresenter.password = val;
        }
        if let Ok(val) = std::env::var("SLIDELINK_OSC_HOST") {
            self.osc.host = val;
        }
        if let Ok(val) = std::env::var("SLIDELINK_OSC_PORT") {
            if let Ok(port) = val.parse() {
                self.osc.port = port;
            }
        }
        if let Ok(val) = std::env::var("SLIDELINK_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.propresenter.port == 0 {
            return Err(ConfigError::Validation(
                "propresenter port must be non-zero".to_string(),
            ));
        }
        if self.osc.port == 0 {
            return Err(ConfigError::Validation(
                "osc port must be non-zero".to_string(),
            ));
        }
        if self.relay.tick_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "tick interval must be non-zero".to_string(),
            ));
        }
        if self.relay.text_addresses.is_empty() && self.triggers.is_empty() {
            return Err(ConfigError::Validation(
                "at least one text address or trigger is required".to_string(),
            ));
        }
        if let Some(address) = self
            .relay
            .text_addresses
            .iter()
            .find(|address| !address.starts_with('/'))
        {
            return Err(ConfigError::Validation(format!(
                "text address {address:?} must start with '/'"
            )));
        }
        for (index, rule) in self.triggers.iter().enumerate() {
            rule.validate()
                .map_err(|err| ConfigError::Validation(format!("trigger #{index}: {err}")))?;
        }
        Ok(())
    }
}

impl RelayConfig {
    #[must_use]
    pub fn reconnect_cooldown(&self) -> Duration {
        Duration::from_secs(u64::from(self.reconnect_cooldown_secs))
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.tick_interval_secs))
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            text_addresses: Vec::new(),
            split_delimiter: None,
            reconnect_cooldown_secs: 5,
            tick_interval_secs: 2,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "slidelinkd=info,slidelink=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
