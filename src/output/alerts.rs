//! CPU monitor output.

use chrono::{DateTime, Local};

use super::colors::*;
use crate::record::ProcessRecord;

/// Timestamp format used on every monitor line.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_timestamp(at: &DateTime<Local>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Print the monitor's startup lines.
pub fn print_monitor_header(base_url: &str, threshold: f64, interval_secs: u64, top_n: usize) {
    println!("{BOLD}Process Manager API - High CPU Monitor{RESET}");
    println!("{BLUE}API:{RESET}       {}", base_url);
    println!("{BLUE}Threshold:{RESET} CPU usage > {}%", threshold);
    println!(
        "{BLUE}Interval:{RESET}  every {} second{} (top {} alerts)",
        interval_secs,
        if interval_secs == 1 { "" } else { "s" },
        top_n
    );
    println!("{GRAY}Press Ctrl+C to stop{RESET}");
    println!();
}

/// Format one high-CPU alert block.
///
/// ```text
/// [2026-10-18 10:00:00] ⚠️  HIGH CPU ALERT!
///   Process: stress (PID: 4242)
///   CPU Usage: 97.3%
///   Memory: 2048 KB
///   User: alice
/// ```
pub fn format_alert(record: &ProcessRecord, at: &DateTime<Local>) -> String {
    format!(
        "{GRAY}[{}]{RESET} {YELLOW}{BOLD}⚠️  HIGH CPU ALERT!{RESET}\n\
         \x20 Process: {} (PID: {})\n\
         \x20 CPU Usage: {:.1}%\n\
         \x20 Memory: {} KB\n\
         \x20 User: {}",
        format_timestamp(at),
        record.name,
        record.pid,
        record.cpu_usage,
        record.memory_usage,
        record.user
    )
}

pub fn format_normal_status(at: &DateTime<Local>) -> String {
    format!(
        "{GRAY}[{}]{RESET} {GREEN}✓{RESET} All processes within normal CPU range",
        format_timestamp(at)
    )
}

pub fn print_monitor_stopped() {
    println!();
    println!();
    println!("{YELLOW}Monitoring stopped.{RESET}");
}
