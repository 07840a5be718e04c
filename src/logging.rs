//! Diagnostic logging setup.
//!
//! User-facing output goes to stdout through [`crate::output`]; log records go
//! to stderr so they never mix with alerts or exported data.

use env_logger::{Builder, Target};
use log::LevelFilter;

/// Environment variable that overrides the log level.
pub const LOG_ENV_VAR: &str = "PROCWATCH_LOG";

const LOG_ERROR_LEVEL_MOD: &[&str] = &["reqwest::connect", "hyper_util::client"];

pub fn parse_level(level: &str) -> LevelFilter {
    match level.trim().to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Warn,
    }
}

/// Split a level spec such as `debug` or `warn,procwatch::client=trace` into
/// a default level and per-module overrides.
pub fn parse_level_spec(spec: &str) -> (Option<LevelFilter>, Vec<(String, LevelFilter)>) {
    let mut default = None;
    let mut modules = Vec::new();

    for pair in spec.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match pair.split_once('=') {
            Some((module, level)) => modules.push((module.trim().to_string(), parse_level(level))),
            None => default = Some(parse_level(pair)),
        }
    }

    (default, modules)
}

/// Initialise the global logger.
///
/// Priority: `PROCWATCH_LOG`, then `--verbose` (debug), then `warn`.
pub fn init_logger(verbose: bool) {
    let env_spec = std::env::var(LOG_ENV_VAR).ok();

    let mut builder = Builder::new();
    builder.target(Target::Stderr);
    builder.format_timestamp_secs();

    let fallback = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    match env_spec.as_deref().map(parse_level_spec) {
        Some((default, modules)) => {
            builder.filter_level(default.unwrap_or(fallback));
            for (module, level) in modules {
                builder.filter_module(&module, level);
            }
        }
        None => {
            builder.filter_level(fallback);
        }
    }

    for module in LOG_ERROR_LEVEL_MOD {
        builder.filter_module(module, LevelFilter::Error);
    }

    // A second initialisation (e.g. from tests) is harmless.
    let _ = builder.try_init();
}
