//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Root configuration for lexchat
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Chat service endpoint
    #[serde(default)]
    pub service: ServiceConfig,
    /// Document drafting service endpoint
    #[serde(default)]
    pub drafter: DrafterConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Chat service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the chat service (new_chat, process_query, ...)
    #[serde(default = "default_service_url")]
    pub base_url: String,
    /// Transport timeout; requests wait indefinitely when unset
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_service_url() -> String {
    "http://localhost:8000".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_service_url(),
            request_timeout_secs: None,
        }
    }
}

/// Drafting service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrafterConfig {
    #[serde(default = "default_drafter_url")]
    pub base_url: String,
    /// Template used when a draft request names none
    #[serde(default = "default_template")]
    pub default_template: String,
}

fn default_drafter_url() -> String {
    "http://localhost:8001".to_string()
}

fn default_template() -> String {
    "domicile_certificate".to_string()
}

impl Default for DrafterConfig {
    fn default() -> Self {
        Self {
            base_url: default_drafter_url(),
            default_template: default_template(),
        }
    }
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

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            dir: default_log_dir(),
            overrides: HashMap::new(),
        }
    }
}
