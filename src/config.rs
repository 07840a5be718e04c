use crate::error::{ProcwatchError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// The base config directory name under ~/.config/
const CONFIG_DIR_NAME: &str = "procwatch";

/// The filename for the configuration file.
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_CPU_THRESHOLD: f64 = 50.0;
pub const DEFAULT_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_TOP_N: usize = 5;
pub const DEFAULT_OUTPUT_FILE: &str = "process_snapshot.csv";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Keys accepted by `procwatch config set`.
pub const VALID_KEYS: &[&str] = &[
    "base_url",
    "cpu_threshold",
    "interval_secs",
    "top_n",
    "output_file",
    "timeout_secs",
];

// ============================================================================
// Client Configuration
// ============================================================================

/// Settings shared by every procwatch command.
///
/// Loaded from `~/.config/procwatch/config.toml`. Missing fields fall back to
/// the built-in defaults, so a partial file is valid. Command-line flags take
/// precedence over anything stored here.
///
/// # Example
///
/// ```toml
/// base_url = "http://localhost:8080/api"
/// cpu_threshold = 50.0
/// interval_secs = 5
/// top_n = 5
/// output_file = "process_snapshot.csv"
/// timeout_secs = 10
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the Process Manager API, without a trailing path.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Alert when a process's CPU usage is strictly above this percentage.
    #[serde(default = "default_cpu_threshold")]
    pub cpu_threshold: f64,

    /// Seconds to wait between monitor polls.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Maximum number of alerts printed per poll.
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Destination of `procwatch export`.
    #[serde(default = "default_output_file")]
    pub output_file: String,

    /// HTTP request timeout in seconds. `0` leaves the client default in place.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_cpu_threshold() -> f64 {
    DEFAULT_CPU_THRESHOLD
}

fn default_interval_secs() -> u64 {
    DEFAULT_INTERVAL_SECS
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

fn default_output_file() -> String {
    DEFAULT_OUTPUT_FILE.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            cpu_threshold: DEFAULT_CPU_THRESHOLD,
            interval_secs: DEFAULT_INTERVAL_SECS,
            top_n: DEFAULT_TOP_N,
            output_file: default_output_file(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

// ============================================================================
// Config Validation
// ============================================================================

use std::error::Error;
use std::fmt;

/// Error type for configuration validation failures.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The base URL does not use http or https.
    InvalidBaseUrl(String),
    /// The CPU threshold is negative, NaN, or infinite.
    InvalidThreshold(f64),
    /// The polling interval is zero.
    ZeroInterval,
    /// The alert limit is zero.
    ZeroTopN,
    /// The export file name is empty.
    EmptyOutputFile,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidBaseUrl(url) => write!(
                f,
                "base_url must start with http:// or https:// (got \"{}\")",
                url
            ),
            ConfigError::InvalidThreshold(value) => write!(
                f,
                "cpu_threshold must be a finite, non-negative percentage (got {})",
                value
            ),
            ConfigError::ZeroInterval => write!(f, "interval_secs must be at least 1"),
            ConfigError::ZeroTopN => write!(f, "top_n must be at least 1"),
            ConfigError::EmptyOutputFile => write!(f, "output_file must not be empty"),
        }
    }
}

impl Error for ConfigError {}

/// Validate a configuration for logical consistency.
///
/// # Example
///
/// ```
/// use procwatch::config::{validate_config, Config};
///
/// assert!(validate_config(&Config::default()).is_ok());
///
/// let invalid = Config {
///     interval_secs: 0,
///     ..Default::default()
/// };
/// assert!(validate_config(&invalid).is_err());
/// ```
pub fn validate_config(config: &Config) -> std::result::Result<(), ConfigError> {
    if !(config.base_url.starts_with("http://") || config.base_url.starts_with("https://")) {
        return Err(ConfigError::InvalidBaseUrl(config.base_url.clone()));
    }
    if !config.cpu_threshold.is_finite() || config.cpu_threshold < 0.0 {
        return Err(ConfigError::InvalidThreshold(config.cpu_threshold));
    }
    if config.interval_secs == 0 {
        return Err(ConfigError::ZeroInterval);
    }
    if config.top_n == 0 {
        return Err(ConfigError::ZeroTopN);
    }
    if config.output_file.trim().is_empty() {
        return Err(ConfigError::EmptyOutputFile);
    }
    Ok(())
}

// ============================================================================
// Config File Management
// ============================================================================

/// Generate config file content with explanatory comments.
///
/// Used both for the file written on first run and by `config set`/`reset`.
pub fn generate_config_with_comments(config: &Config) -> String {
    format!(
        r#"# procwatch configuration

# Base URL of the Process Manager REST API
base_url = "{}"

# Alert when a process uses strictly more CPU than this percentage
cpu_threshold = {:?}

# Seconds between monitor polls
interval_secs = {}

# Maximum number of alerts printed per poll
top_n = {}

# File written by `procwatch export`
output_file = "{}"

# HTTP request timeout in seconds (0 = client default)
timeout_secs = {}
"#,
        escape_toml_string(&config.base_url),
        config.cpu_threshold,
        config.interval_secs,
        config.top_n,
        escape_toml_string(&config.output_file),
        config.timeout_secs
    )
}

fn escape_toml_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Get the procwatch config directory path (~/.config/procwatch/).
///
/// Does not create the directory.
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| ProcwatchError::Config("Could not determine home directory".to_string()))?;
    Ok(home.join(".config").join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (~/.config/procwatch/config.toml).
pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILENAME))
}

/// Load the configuration from `~/.config/procwatch/config.toml`.
///
/// If the file doesn't exist, it is created with default values and comments.
/// The loaded configuration is validated before it is returned.
pub fn load_config() -> Result<Config> {
    load_config_at(&config_path()?)
}

/// Load a configuration file, creating it with defaults if missing.
pub fn load_config_at(path: &Path) -> Result<Config> {
    if !path.exists() {
        let config = Config::default();
        save_config_at(path, &config)?;
        log::info!("Created default config at {}", path.display());
        return Ok(config);
    }

    let config = read_config_file(path)?;
    validate_config(&config).map_err(|e| ProcwatchError::Config(e.to_string()))?;
    Ok(config)
}

/// Parse a config file without creating it and without validation.
pub fn read_config_file(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| {
        ProcwatchError::Config(format!(
            "Failed to parse config file at {:?}: {}",
            path, e
        ))
    })
}

/// Write `config` to `path` with explanatory comments.
///
/// Overwrites any existing file, including user-added comments.
pub fn save_config_at(path: &Path, config: &Config) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, generate_config_with_comments(config))?;
    Ok(())
}

/// Return a copy of `config` with `key` set to the parsed `value`.
///
/// The result is validated, so `config set interval_secs 0` is rejected
/// before anything is written.
pub fn apply_config_value(config: &Config, key: &str, value: &str) -> Result<Config> {
    let mut updated = config.clone();
    let value = value.trim();

    match key {
        "base_url" => updated.base_url = value.trim_end_matches('/').to_string(),
        "cpu_threshold" => updated.cpu_threshold = parse_value(key, value)?,
        "interval_secs" => updated.interval_secs = parse_value(key, value)?,
        "top_n" => updated.top_n = parse_value(key, value)?,
        "output_file" => updated.output_file = value.to_string(),
        "timeout_secs" => updated.timeout_secs = parse_value(key, value)?,
        _ => {
            return Err(ProcwatchError::Config(format!(
                "Unknown config key '{}'. Valid keys: {}",
                key,
                VALID_KEYS.join(", ")
            )))
        }
    }

    validate_config(&updated).map_err(|e| ProcwatchError::Config(e.to_string()))?;
    Ok(updated)
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse::<T>().map_err(|_| {
        ProcwatchError::Config(format!("Invalid value '{}' for key '{}'", value, key))
    })
}
