//! CSV export output.

use super::colors::*;
use super::messages::print_success;
use crate::export::ExportSummary;

pub fn print_export_started(url: &str) {
    println!("Fetching process data from {CYAN}{}{RESET}...", url);
}

pub fn print_export_success(summary: &ExportSummary) {
    print_success(&format!("Data exported to {}", summary.path.display()));
    println!("  Rows: {}", summary.rows);
    println!(
        "  Timestamp: {}",
        summary.exported_at.format("%Y-%m-%d %H:%M:%S%.6f")
    );
}
