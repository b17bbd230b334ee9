//! Application configuration
//!
//! Settings are read from a TOML file; every field has a default so an empty
//! file is a valid configuration.

use crate::error::{Error, Result};
use crate::wallet::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Valid log levels for configuration validation.
pub const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Contents of the `gap.toml` configuration file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub wallet_client: WalletClientSettings,

    #[serde(default)]
    pub payouts: PayoutSettings,
}

/// Waiting for a wallet client after a network switch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletClientSettings {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutSettings {
    /// Community whose payout address is preferred
    #[serde(default)]
    pub community_id: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_attempts() -> u32 {
    5
}

fn default_retry_delay_ms() -> u64 {
    500
}

impl Default for WalletClientSettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl Default for GapConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            wallet_client: WalletClientSettings::default(),
            payouts: PayoutSettings::default(),
        }
    }
}

impl GapConfig {
    /// Load and validate a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::config_at(
                format!("Configuration file not found: {}", path.display()),
                path,
            ));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: GapConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !VALID_LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(Error::config(format!(
                "Invalid log_level '{}', expected one of {}",
                self.log_level,
                VALID_LOG_LEVELS.join(", ")
            )));
        }
        Ok(())
    }

    pub fn wallet_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.wallet_client.max_attempts,
            Duration::from_millis(self.wallet_client.retry_delay_ms),
        )
    }
}

/// Runtime configuration of the CLI
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Verbosity level for logging
    pub verbose: u8,
    pub gap: GapConfig,
}

impl AppConfig {
    pub fn new(verbose: u8, gap: GapConfig) -> Self {
        Self { verbose, gap }
    }

    /// Get the log filter based on verbosity, falling back to the configured level
    pub fn log_level(&self) -> &str {
        match self.verbose {
            0 => self.gap.log_level.as_str(),
            1 => "debug",
            2 => "trace",
            _ => "trace,tokio=debug",
        }
    }
}
