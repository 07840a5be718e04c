pub mod client;
pub mod commands;
pub mod completion;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod monitor;
pub mod output;
pub mod record;
pub mod signal;

#[cfg(test)]
pub(crate) mod test_utils;

pub use client::{ApiClient, ProcessQuery, ProcessSource};
pub use config::Config;
pub use error::{ProcwatchError, Result};
pub use export::{ExportSummary, CSV_COLUMNS};
pub use monitor::{CpuMonitor, MonitorSettings};
pub use record::{ProcessRecord, RawRecord, SystemInfo};
pub use signal::SignalHandler;
