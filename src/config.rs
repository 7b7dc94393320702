//! Optional TOML configuration.
//!
//! Settings are layered, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. A file passed with `--config` (never looked up implicitly)
//! 3. Command-line arguments
//!
//! # Example Configuration File
//!
//! ```toml
//! hosts = ["example.com", "example.com:8443"]
//! insecure = true
//! yellow = 30
//! red = -1
//! timeout = 10
//! output = "log"
//! on_error = "abort"
//! ```

use crate::check::FailurePolicy;
use crate::output::OutputFormat;
use crate::probe::DEFAULT_TIMEOUT_SECS;
use crate::validity::{Thresholds, DEFAULT_RED_DAYS, DEFAULT_YELLOW_DAYS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Every field is optional so partial files and CLI overrides can be merged.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Endpoints to check, `host` or `host:port`
    pub hosts: Option<Vec<String>>,
    /// Skip chain trust and hostname verification
    pub insecure: Option<bool>,
    /// Days-remaining cutoff for a warning
    pub yellow: Option<i64>,
    /// Days-remaining cutoff for a failure
    pub red: Option<i64>,
    /// Connect and handshake timeout, in seconds
    pub timeout: Option<u64>,
    /// Output format: log, json, table
    pub output: Option<String>,
    /// Connectivity failure policy: abort, red
    pub on_error: Option<String>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub hosts: Vec<String>,
    pub insecure: bool,
    pub thresholds: Thresholds,
    pub timeout: Duration,
    pub output: OutputFormat,
    pub on_error: FailurePolicy,
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// * `ConfigError::Io` - File could not be read
    /// * `ConfigError::Parse` - File contains invalid TOML or unknown keys
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;

        let config: Config =
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        Ok(config)
    }

    /// The built-in defaults: verification skipped, yellow at 30 days,
    /// red at -1 days, 10 second timeout, log output, abort on failure.
    pub fn builtin() -> Self {
        Config {
            hosts: None,
            insecure: Some(true),
            yellow: Some(DEFAULT_YELLOW_DAYS),
            red: Some(DEFAULT_RED_DAYS),
            timeout: Some(DEFAULT_TIMEOUT_SECS),
            output: Some(OutputFormat::default().to_string()),
            on_error: Some(FailurePolicy::default().to_string()),
        }
    }

    /// Merges this configuration with another, prioritizing the other's values.
    pub fn merge_with(self, other: Config) -> Self {
        Config {
            hosts: other.hosts.or(self.hosts),
            insecure: other.insecure.or(self.insecure),
            yellow: other.yellow.or(self.yellow),
            red: other.red.or(self.red),
            timeout: other.timeout.or(self.timeout),
            output: other.output.or(self.output),
            on_error: other.on_error.or(self.on_error),
        }
    }

    /// Validates the merged configuration and fills any gaps with defaults.
    pub fn resolve(self) -> Result<Settings, ConfigError> {
        let merged = Config::builtin().merge_with(self);

        let timeout = merged.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout == 0 {
            return Err(ConfigError::Validation(
                "timeout must be at least one second".to_string(),
            ));
        }

        let output = match merged.output {
            Some(name) => name.parse::<OutputFormat>().map_err(|_| {
                ConfigError::Validation(format!("unknown output format '{}'", name))
            })?,
            None => OutputFormat::default(),
        };
        let on_error = match merged.on_error {
            Some(name) => name.parse::<FailurePolicy>().map_err(|_| {
                ConfigError::Validation(format!("unknown failure policy '{}'", name))
            })?,
            None => FailurePolicy::default(),
        };

        Ok(Settings {
            hosts: merged.hosts.unwrap_or_default(),
            insecure: merged.insecure.unwrap_or(true),
            thresholds: Thresholds {
                yellow_days: merged.yellow.unwrap_or(DEFAULT_YELLOW_DAYS),
                red_days: merged.red.unwrap_or(DEFAULT_RED_DAYS),
            },
            timeout: Duration::from_secs(timeout),
            output,
            on_error,
        })
    }

    /// A sample configuration file with every option set.
    pub fn example_toml() -> String {
        let example = Config {
            hosts: Some(vec![
                "example.com".to_string(),
                "example.com:8443".to_string(),
                "[2001:db8::1]:443".to_string(),
            ]),
            ..Config::builtin()
        };

        toml::to_string_pretty(&example)
            .unwrap_or_else(|_| "# Error generating example".to_string())
    }
}

/// Errors that can occur during configuration loading and parsing.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error (file not found, permission denied, etc.)
    Io(String),
    /// TOML parsing error (invalid syntax, type mismatch, etc.)
    Parse(String),
    /// Value out of range or not recognised
    Validation(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "IO Error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Parse Error: {}", msg),
            ConfigError::Validation(msg) => write!(f, "Validation Error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
