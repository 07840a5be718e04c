//! Monitor command handler.
//!
//! Polls the API until Ctrl+C and prints high-CPU alerts.

use crate::client::{ApiClient, ProcessSource};
use crate::config::{validate_config, Config};
use crate::error::{ProcwatchError, Result};
use crate::monitor::{CpuMonitor, MonitorSettings, MonitorStats};
use crate::output::{
    format_system_summary, print_monitor_header, print_monitor_stopped, print_warning,
};
use crate::signal::SignalHandler;

/// Command-line overrides for `procwatch monitor`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonitorOptions {
    pub threshold: Option<f64>,
    pub interval_secs: Option<u64>,
    pub top_n: Option<usize>,
    pub once: bool,
}

impl MonitorOptions {
    /// Overlay these options on `config`, validating the result.
    pub fn apply(&self, config: &Config) -> Result<Config> {
        let mut config = config.clone();
        if let Some(threshold) = self.threshold {
            config.cpu_threshold = threshold;
        }
        if let Some(interval) = self.interval_secs {
            config.interval_secs = interval;
        }
        if let Some(top_n) = self.top_n {
            config.top_n = top_n;
        }
        validate_config(&config).map_err(|e| ProcwatchError::Config(e.to_string()))?;
        Ok(config)
    }
}

/// Run the CPU monitor.
///
/// # Returns
///
/// * `Ok(())` when interrupted, or after one poll with `--once`
/// * `Err(ProcwatchError)` if the options are invalid or Ctrl+C cannot be trapped
pub fn monitor_command(config: &Config, options: &MonitorOptions) -> Result<()> {
    let config = options.apply(config)?;
    let client = ApiClient::from_config(&config)?;
    let settings = MonitorSettings::from_config(&config);
    let signals = SignalHandler::new()?;

    print_monitor_header(
        client.base_url(),
        settings.threshold,
        config.interval_secs,
        settings.top_n,
    );

    let stats = start_monitor(client, settings, &signals, options.once);

    log::info!(
        "Monitor finished after {} polls ({} alerts, {} failed fetches)",
        stats.iterations,
        stats.alerts,
        stats.fetch_failures
    );

    if stats.interrupted {
        print_monitor_stopped();
    }
    Ok(())
}

/// Print the host summary, then poll until `signals` asks to stop.
///
/// `signals` must already be registered: a Ctrl+C during the `/system`
/// request stops the monitor before its first poll.
fn start_monitor<S: ProcessSource>(
    source: S,
    settings: MonitorSettings,
    signals: &SignalHandler,
    once: bool,
) -> MonitorStats {
    match source.system_info() {
        Ok(info) => {
            println!("{}", format_system_summary(&info));
            println!();
        }
        Err(e) => print_warning(&format!("Could not fetch system info: {}", e)),
    }

    CpuMonitor::new(source, settings).run(signals, once)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{RawRecord, SystemInfo};
    use std::cell::Cell;
    use std::time::Duration;

    /// Simulates Ctrl+C arriving while `/system` is in flight.
    struct InterruptedDuringStartup {
        signals: SignalHandler,
        snapshots: Cell<usize>,
    }

    impl ProcessSource for InterruptedDuringStartup {
        fn snapshot(&self) -> Result<Vec<RawRecord>> {
            self.snapshots.set(self.snapshots.get() + 1);
            Ok(Vec::new())
        }

        fn system_info(&self) -> Result<SystemInfo> {
            self.signals.request_shutdown();
            Ok(SystemInfo::default())
        }
    }

    #[test]
    fn test_interrupt_during_startup_stops_before_first_poll() {
        let signals = SignalHandler::detached();
        let source = InterruptedDuringStartup {
            signals: signals.clone(),
            snapshots: Cell::new(0),
        };
        let settings = MonitorSettings {
            threshold: 50.0,
            interval: Duration::from_millis(10),
            top_n: 5,
        };

        let stats = start_monitor(source, settings, &signals, false);

        assert!(stats.interrupted);
        assert_eq!(stats.iterations, 0);
    }

    #[test]
    fn test_options_override_config() {
        let options = MonitorOptions {
            threshold: Some(90.0),
            interval_secs: Some(1),
            top_n: Some(10),
            once: false,
        };
        let config = options.apply(&Config::default()).unwrap();
        assert_eq!(config.cpu_threshold, 90.0);
        assert_eq!(config.interval_secs, 1);
        assert_eq!(config.top_n, 10);
    }

    #[test]
    fn test_empty_options_keep_config() {
        let base = Config {
            cpu_threshold: 20.0,
            ..Default::default()
        };
        assert_eq!(MonitorOptions::default().apply(&base).unwrap(), base);
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let options = MonitorOptions {
            interval_secs: Some(0),
            ..Default::default()
        };
        assert!(options.apply(&Config::default()).is_err());

        let options = MonitorOptions {
            threshold: Some(-5.0),
            ..Default::default()
        };
        assert!(options.apply(&Config::default()).is_err());
    }
}
