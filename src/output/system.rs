//! Host summary display for `/system` and `/health`.

use super::colors::*;
use crate::record::{HealthStatus, SystemInfo};

const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Render seconds as `Xd Yh Zm`, dropping leading zero units.
pub fn format_uptime(seconds: u64) -> String {
    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3_600;
    let minutes = (seconds % 3_600) / 60;

    if days > 0 {
        format!("{}d {}h {}m", days, hours, minutes)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

fn gib(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_GIB
}

/// Multi-line host report for `procwatch system`.
pub fn format_system_info(info: &SystemInfo) -> String {
    format!(
        "{BLUE}CPUs:{RESET}         {}\n\
         {BLUE}Memory:{RESET}       {:.1} / {:.1} GiB ({:.1}%)\n\
         {BLUE}Swap:{RESET}         {:.1} / {:.1} GiB ({:.1}%)\n\
         {BLUE}Uptime:{RESET}       {}\n\
         {BLUE}Load average:{RESET} {:.2} {:.2} {:.2}",
        info.cpu_count,
        gib(info.used_memory),
        gib(info.total_memory),
        info.memory_percent(),
        gib(info.used_swap),
        gib(info.total_swap),
        info.swap_percent(),
        format_uptime(info.uptime),
        info.load_average.one,
        info.load_average.five,
        info.load_average.fifteen
    )
}

/// One-line host summary printed when the monitor starts.
pub fn format_system_summary(info: &SystemInfo) -> String {
    format!(
        "{GRAY}Host: {} CPUs, memory {:.1}% used, load {:.2}, up {}{RESET}",
        info.cpu_count,
        info.memory_percent(),
        info.load_average.one,
        format_uptime(info.uptime)
    )
}

pub fn format_health(health: &HealthStatus) -> String {
    let color = if health.is_healthy() {
        GREEN
    } else {
        YELLOW
    };
    if health.timestamp.is_empty() {
        format!("{color}{}{RESET}", health.status)
    } else {
        format!(
            "{color}{}{RESET} {GRAY}(server time {}){RESET}",
            health.status, health.timestamp
        )
    }
}
