//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Root configuration for mom
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Message bus configuration
    #[serde(default)]
    pub bus: BusConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// How a publish reacts to a failing handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    /// Stop at the first failure and return it to the publisher
    #[default]
    FailFast,
    /// Invoke every handler and only log failures
    Collect,
}

/// Message bus configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BusConfig {
    /// Fill in `Message::timestamp` at publish time when it is unset
    #[serde(default)]
    pub stamp_on_publish: bool,
    /// Dispatch behavior for `publish_message`
    #[serde(default)]
    pub dispatch: DispatchMode,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (text, json)
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Directory for log files
    #[serde(default = "default_log_dir")]
    pub dir: String,
    /// Days to keep rotated log files
    #[serde(default = "default_retention_days")]
    pub retention_days: u64,
    /// Module-specific overrides
    #[serde(default)]
    pub overrides: HashMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_retention_days() -> u64 {
    7
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            dir: default_log_dir(),
            retention_days: default_retention_days(),
            overrides: HashMap::new(),
        }
    }
}
