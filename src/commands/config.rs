//! Config command handler.
//!
//! Displays, modifies, and resets procwatch configuration values.

use std::path::Path;

use crate::config::{
    apply_config_value, config_path, read_config_file, save_config_at, Config,
};
use crate::error::Result;
use crate::output::{print_success, BOLD, CYAN, GRAY, RESET, YELLOW};

/// Display the configuration file, or the defaults if it does not exist.
pub fn config_display_command() -> Result<()> {
    display_config_at(&config_path()?)
}

fn display_config_at(path: &Path) -> Result<()> {
    println!("{BOLD}# procwatch config{RESET}");
    println!("{GRAY}# {}{RESET}", path.display());
    println!();

    if !path.exists() {
        println!("{YELLOW}# (file does not exist, using defaults){RESET}");
        println!();
        print_config_as_toml(&Config::default());
        return Ok(());
    }

    print_config_as_toml(&read_config_file(path)?);
    Ok(())
}

/// Set one key in the config file, creating the file if needed.
pub fn config_set_command(key: &str, value: &str) -> Result<()> {
    let path = config_path()?;
    let updated = set_value_at(&path, key, value)?;
    print_success(&format!("Set {} in {}", key, path.display()));
    print_config_as_toml(&updated);
    Ok(())
}

fn set_value_at(path: &Path, key: &str, value: &str) -> Result<Config> {
    let current = if path.exists() {
        read_config_file(path)?
    } else {
        Config::default()
    };
    let updated = apply_config_value(&current, key, value)?;
    save_config_at(path, &updated)?;
    Ok(updated)
}

/// Overwrite the config file with default values.
pub fn config_reset_command() -> Result<()> {
    let path = config_path()?;
    save_config_at(&path, &Config::default())?;
    print_success(&format!("Reset {} to defaults", path.display()));
    Ok(())
}

/// Print the config file location.
pub fn config_path_command() -> Result<()> {
    println!("{}", config_path()?.display());
    Ok(())
}

fn print_config_as_toml(config: &Config) {
    for line in config_to_toml_string(config).lines() {
        match line.split_once(" = ") {
            Some((key, value)) => println!("{CYAN}{key}{RESET} = {value}"),
            None => println!("{line}"),
        }
    }
}

/// Convert a Config to a TOML string without comments.
pub fn config_to_toml_string(config: &Config) -> String {
    format!(
        "base_url = {:?}\n\
         cpu_threshold = {:?}\n\
         interval_secs = {}\n\
         top_n = {}\n\
         output_file = {:?}\n\
         timeout_secs = {}",
        config.base_url,
        config.cpu_threshold,
        config.interval_secs,
        config.top_n,
        config.output_file,
        config.timeout_secs
    )
}
