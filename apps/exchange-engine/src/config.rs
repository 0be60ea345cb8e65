//! Configuration module for the exchange engine.
//!
//! Loads a YAML file with environment variable interpolation, applies
//! defaults, and validates the result.
//!
//! # Usage
//!
//! ```rust,ignore
//! use exchange_engine::config::{Config, load_config};
//!
//! // Load from default path (config.yaml)
//! let config = load_config(None)?;
//!
//! // Access configuration values
//! println!("expiry: {}h", config.exchange.expiry_hours);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::exchange::services::ValuationTable;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Exchange lifecycle configuration.
    #[serde(default)]
    pub exchange: ExchangeConfig,
    /// Lead valuation configuration.
    #[serde(default)]
    pub valuation: ValuationConfig,
    /// Expiry sweep configuration.
    #[serde(default)]
    pub sweep: SweepConfig,
    /// Event delivery configuration.
    #[serde(default)]
    pub events: EventsConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Exchange lifecycle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// Hours a pending application lives before the sweep expires it.
    #[serde(default = "default_expiry_hours")]
    pub expiry_hours: i64,
    /// Fairness band around the target value, as a fraction (0.10 = 10%).
    #[serde(default = "default_fairness_tolerance")]
    pub fairness_tolerance: f64,
    /// Default page size for application listings.
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            expiry_hours: default_expiry_hours(),
            fairness_tolerance: default_fairness_tolerance(),
            default_page_size: default_page_size(),
        }
    }
}

impl ExchangeConfig {
    /// Fairness tolerance as a `Decimal`, falling back to 10% when the
    /// float cannot be represented.
    #[must_use]
    pub fn fairness_tolerance_decimal(&self) -> rust_decimal::Decimal {
        rust_decimal::Decimal::try_from(self.fairness_tolerance)
            .unwrap_or_else(|_| rust_decimal::Decimal::new(1, 1))
    }
}

const fn default_expiry_hours() -> i64 {
    72
}
const fn default_fairness_tolerance() -> f64 {
    0.10
}
const fn default_page_size() -> u32 {
    20
}

/// Lead valuation configuration.
///
/// Loaded once at startup; the resulting table is immutable for the
/// lifetime of the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationConfig {
    /// Credit value of an A-rated lead.
    #[serde(default = "default_value_a")]
    pub a: u32,
    /// Credit value of a B-rated lead.
    #[serde(default = "default_value_b")]
    pub b: u32,
    /// Credit value of a C-rated lead.
    #[serde(default = "default_value_c")]
    pub c: u32,
    /// Credit value of a D-rated lead.
    #[serde(default = "default_value_d")]
    pub d: u32,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            a: default_value_a(),
            b: default_value_b(),
            c: default_value_c(),
            d: default_value_d(),
        }
    }
}

impl ValuationConfig {
    /// Build the immutable valuation table.
    #[must_use]
    pub const fn to_table(&self) -> ValuationTable {
        ValuationTable::new(self.a, self.b, self.c, self.d)
    }
}

const fn default_value_a() -> u32 {
    8
}
const fn default_value_b() -> u32 {
    4
}
const fn default_value_c() -> u32 {
    2
}
const fn default_value_d() -> u32 {
    1
}

/// Expiry sweep configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Enable the periodic sweep.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Seconds between sweep runs.
    #[serde(default = "default_sweep_interval")]
    pub interval_secs: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: default_sweep_interval(),
        }
    }
}

const fn default_true() -> bool {
    true
}
const fn default_sweep_interval() -> u64 {
    3600
}

/// Event delivery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsConfig {
    /// Bounded queue capacity between the engine and the delivery worker.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
        }
    }
}

const fn default_queue_capacity() -> usize {
    1024
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format: "json" or "pretty".
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to "config.yaml".
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or("config.yaml");

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let mut result = input.to_string();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    for cap in re.captures_iter(input) {
        let Some(full_match) = cap.get(0) else {
            continue;
        };
        let Some(var_match) = cap.get(1) else {
            continue;
        };
        let full_match = full_match.as_str();
        let var_name = var_match.as_str();
        let default_value = cap.get(2).map(|m| m.as_str());

        let value = match std::env::var(var_name) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.map_or_else(String::new, str::to_string),
        };

        result = result.replace(full_match, &value);
    }

    result
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.exchange.expiry_hours <= 0 {
        return Err(ConfigError::ValidationError(
            "exchange.expiry_hours must be positive".to_string(),
        ));
    }

    if config.exchange.fairness_tolerance < 0.0 || config.exchange.fairness_tolerance > 1.0 {
        return Err(ConfigError::ValidationError(
            "exchange.fairness_tolerance must be between 0.0 and 1.0".to_string(),
        ));
    }

    if config.exchange.default_page_size == 0 {
        return Err(ConfigError::ValidationError(
            "exchange.default_page_size must be positive".to_string(),
        ));
    }

    // Rating values must preserve the A > B > C > D ordering.
    let v = &config.valuation;
    if !(v.a > v.b && v.b > v.c && v.c > v.d) {
        return Err(ConfigError::ValidationError(
            "valuation values must be strictly decreasing from a to d".to_string(),
        ));
    }
    if v.d == 0 {
        return Err(ConfigError::ValidationError(
            "valuation.d must be positive".to_string(),
        ));
    }

    if config.sweep.interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "sweep.interval_secs must be positive".to_string(),
        ));
    }

    if config.events.queue_capacity == 0 {
        return Err(ConfigError::ValidationError(
            "events.queue_capacity must be positive".to_string(),
        ));
    }

    Ok(())
}
