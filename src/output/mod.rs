//! Terminal output formatting for procwatch.
//!
//! Functions are organized by domain:
//!
//! - [`banner`] - Section banners
//! - [`messages`] - Error, warning, and status-glyph lines
//! - [`alerts`] - CPU monitor alerts and status lines
//! - [`export`] - CSV export results
//! - [`system`] - Host summary from `/system` and `/health`
//!
//! `format_*` functions return the text so it can be asserted on;
//! `print_*` wrappers write it to stdout.

pub mod alerts;
pub mod banner;
pub mod export;
pub mod messages;
pub mod system;

/// ANSI color codes for terminal output.
pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const RED: &str = "\x1b[31m";
    pub const GRAY: &str = "\x1b[90m";
}

pub use colors::*;

pub use alerts::{
    format_alert, format_normal_status, format_timestamp, print_monitor_header,
    print_monitor_stopped,
};
pub use banner::{format_banner, print_banner, BannerColor};
pub use export::{print_export_started, print_export_success};
pub use messages::{format_failure, print_error, print_failure, print_success, print_warning};
pub use system::{format_health, format_system_info, format_system_summary, format_uptime};
