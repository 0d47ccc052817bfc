// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    #[serde(default)]
    pub routes: RoutesConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive: bool,
    /// Whole-connection timeout in seconds, 0 disables it.
    /// Must stay above the longest sleep of the timeout endpoint when enabled.
    pub connection_timeout: u64,
    pub max_connections: Option<u64>,
    /// Seconds in-flight connections get to finish after a shutdown signal
    pub shutdown_grace: u64,
}

/// Routes configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct RoutesConfig {
    #[serde(default)]
    pub root_policy: RootPolicy,
}

/// How requests that match no registered route are answered
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RootPolicy {
    /// Only the exact path `/` answers OK, everything else is 404
    #[default]
    Strict,
    /// Every unmatched path answers OK like `/`
    CatchAll,
}
