//! CLI command handlers for procwatch.
//!
//! # Commands
//!
//! - [`monitor`] - Poll `/processes` and alert on high CPU usage
//! - [`export`] - Write one process snapshot to CSV
//! - [`system`] - Show host information from `/system`
//! - [`health`] - Check the API's `/health` endpoint
//! - [`config`] - Show, set, or reset configuration values
//!
//! API failures inside a command are reported and the command still returns
//! `Ok(())`. Only setup problems (bad options, unusable config, no signal
//! handler) surface as errors.

mod config;
mod export;
mod health;
mod monitor;
mod system;

pub use config::{
    config_display_command, config_path_command, config_reset_command, config_set_command,
    config_to_toml_string,
};
pub use export::{export_command, ExportOptions};
pub use health::health_command;
pub use monitor::{monitor_command, MonitorOptions};
pub use system::system_command;

use crate::config::{validate_config, Config};
use crate::error::{ProcwatchError, Result};

/// Apply a `--url` override to the loaded config and validate the result.
pub fn resolve_config(loaded: &Config, url: Option<&str>) -> Result<Config> {
    let mut config = loaded.clone();
    if let Some(url) = url {
        config.base_url = url.trim_end_matches('/').to_string();
    }
    validate_config(&config).map_err(|e| ProcwatchError::Config(e.to_string()))?;
    Ok(config)
}
