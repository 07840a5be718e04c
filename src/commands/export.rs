//! Export command handler.
//!
//! Fetches one snapshot and writes it to CSV.

use std::path::PathBuf;

use crate::client::{ApiClient, ProcessQuery, PROCESSES_PATH};
use crate::config::Config;
use crate::error::Result;
use crate::export::{export_to_file, ExportSummary};
use crate::output::{print_export_started, print_export_success, print_failure};
use crate::record::RawRecord;

/// Command-line options for `procwatch export`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportOptions {
    /// Overrides `output_file` from the config.
    pub output: Option<PathBuf>,
    pub query: ProcessQuery,
}

impl ExportOptions {
    pub fn output_path(&self, config: &Config) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.output_file))
    }
}

/// How an export attempt ended.
#[derive(Debug)]
pub enum ExportOutcome {
    Written(ExportSummary),
    /// The API call failed; nothing was written.
    FetchFailed(String),
    /// The file could not be written; any previous file is unchanged.
    WriteFailed(String),
}

/// Write `records` (or the fetch error) to `path`, without printing.
pub fn run_export(fetched: Result<Vec<RawRecord>>, path: &std::path::Path) -> ExportOutcome {
    let records = match fetched {
        Ok(records) => records,
        Err(e) => return ExportOutcome::FetchFailed(e.to_string()),
    };

    match export_to_file(path, &records) {
        Ok(summary) => ExportOutcome::Written(summary),
        Err(e) => ExportOutcome::WriteFailed(e.to_string()),
    }
}

/// Export the current process snapshot to CSV.
///
/// # Returns
///
/// * `Ok(())` once the result (success or failure) has been reported
/// * `Err(ProcwatchError)` if the options are invalid
pub fn export_command(config: &Config, options: &ExportOptions) -> Result<()> {
    options.query.validate()?;
    let client = ApiClient::from_config(config)?;
    let path = options.output_path(config);

    print_export_started(&client.url(PROCESSES_PATH));

    let fetched = client.fetch_processes(&options.query);
    if let Ok(records) = &fetched {
        println!("Retrieved {} processes", records.len());
    }

    match run_export(fetched, &path) {
        ExportOutcome::Written(summary) => print_export_success(&summary),
        ExportOutcome::FetchFailed(message) => print_failure(&format!("Error: {}", message)),
        ExportOutcome::WriteFailed(message) => print_failure(&format!("File error: {}", message)),
    }
    Ok(())
}
