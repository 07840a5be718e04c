//! High-CPU monitor loop.
//!
//! Each poll fetches a fresh snapshot, keeps the processes whose CPU usage is
//! strictly above the threshold, and reports the busiest few. Nothing carries
//! over between polls: a process that stays hot is reported every time.

use std::time::Duration;

use chrono::{DateTime, Local};
use log::debug;

use crate::client::ProcessSource;
use crate::config::Config;
use crate::output::{format_alert, format_failure, format_normal_status};
use crate::record::{decode_records, ProcessRecord};
use crate::signal::SignalHandler;

/// Resolved monitor parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorSettings {
    pub threshold: f64,
    pub interval: Duration,
    pub top_n: usize,
}

impl MonitorSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            threshold: config.cpu_threshold,
            interval: Duration::from_secs(config.interval_secs),
            top_n: config.top_n,
        }
    }
}

/// What one successful poll found.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    /// Processes above the threshold, busiest first.
    Alerts(Vec<ProcessRecord>),
    /// The snapshot had processes and none were above the threshold.
    Normal,
    /// The server returned no processes; nothing to report.
    Empty,
}

/// Result of one monitor iteration.
#[derive(Debug, Clone, PartialEq)]
pub enum PollResult {
    Checked(CheckOutcome),
    FetchFailed(String),
}

/// Processes with `cpu_usage > threshold`, sorted by CPU descending, at most
/// `top_n` of them. Equal CPU values keep their snapshot order.
pub fn select_alerts(records: &[ProcessRecord], threshold: f64, top_n: usize) -> Vec<ProcessRecord> {
    let mut hot: Vec<ProcessRecord> = records
        .iter()
        .filter(|record| record.cpu_usage > threshold)
        .cloned()
        .collect();
    hot.sort_by(|a, b| b.cpu_usage.total_cmp(&a.cpu_usage));
    hot.truncate(top_n);
    hot
}

/// Classify a decoded snapshot.
pub fn check(records: &[ProcessRecord], threshold: f64, top_n: usize) -> CheckOutcome {
    if records.is_empty() {
        return CheckOutcome::Empty;
    }
    let alerts = select_alerts(records, threshold, top_n);
    if alerts.is_empty() {
        CheckOutcome::Normal
    } else {
        CheckOutcome::Alerts(alerts)
    }
}

/// Render what a poll found, one entry per printed block.
///
/// Alert blocks carry a trailing blank line; a failed fetch is a single line.
pub fn format_report(result: &PollResult, at: &DateTime<Local>) -> Vec<String> {
    match result {
        PollResult::Checked(CheckOutcome::Alerts(alerts)) => alerts
            .iter()
            .map(|record| format!("{}\n", format_alert(record, at)))
            .collect(),
        PollResult::Checked(CheckOutcome::Normal) => vec![format_normal_status(at)],
        PollResult::Checked(CheckOutcome::Empty) => Vec::new(),
        PollResult::FetchFailed(message) => {
            vec![format_failure(&format!("Error fetching processes: {}", message))]
        }
    }
}

/// Print what a poll found.
pub fn report(result: &PollResult) {
    for block in format_report(result, &Local::now()) {
        println!("{}", block);
    }
}

/// Counters for a finished monitor run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonitorStats {
    pub iterations: u64,
    pub alerts: u64,
    pub fetch_failures: u64,
    /// True when the loop ended because of a shutdown request.
    pub interrupted: bool,
}

impl MonitorStats {
    fn record(&mut self, result: &PollResult) {
        self.iterations += 1;
        match result {
            PollResult::Checked(CheckOutcome::Alerts(alerts)) => {
                self.alerts += alerts.len() as u64
            }
            PollResult::FetchFailed(_) => self.fetch_failures += 1,
            PollResult::Checked(_) => {}
        }
    }
}

pub struct CpuMonitor<S: ProcessSource> {
    source: S,
    settings: MonitorSettings,
}

impl<S: ProcessSource> CpuMonitor<S> {
    pub fn new(source: S, settings: MonitorSettings) -> Self {
        Self { source, settings }
    }

    pub fn settings(&self) -> &MonitorSettings {
        &self.settings
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch and classify one snapshot without printing.
    pub fn poll(&self) -> PollResult {
        match self.source.snapshot() {
            Ok(raw) => {
                let records = decode_records(&raw);
                debug!(
                    "Checking {} of {} records against {}%",
                    records.len(),
                    raw.len(),
                    self.settings.threshold
                );
                PollResult::Checked(check(&records, self.settings.threshold, self.settings.top_n))
            }
            Err(e) => {
                debug!("Skipping this poll: {}", e);
                PollResult::FetchFailed(e.to_string())
            }
        }
    }

    /// Poll, report, and sleep until shutdown is requested.
    ///
    /// With `once`, exactly one poll is made and no sleep follows it.
    pub fn run(&self, signals: &SignalHandler, once: bool) -> MonitorStats {
        let mut stats = MonitorStats::default();

        loop {
            if signals.is_shutdown_requested() {
                stats.interrupted = true;
                break;
            }

            let result = self.poll();
            report(&result);
            stats.record(&result);

            if once {
                break;
            }
            if !signals.sleep(self.settings.interval) {
                stats.interrupted = true;
                break;
            }
        }

        stats
    }
}
