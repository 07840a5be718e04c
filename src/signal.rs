//! Signal handling infrastructure for graceful shutdown.
//!
//! Registers a SIGINT (Ctrl+C) handler that raises a flag. The monitor loop
//! polls the flag between short sleep slices, so an interrupt ends the wait
//! promptly and the loop can print its shutdown message and return normally.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{ProcwatchError, Result};

/// Granularity of [`SignalHandler::sleep`].
const SLEEP_SLICE: Duration = Duration::from_millis(100);

/// Handles SIGINT signals for graceful shutdown.
///
/// Cloning shares the underlying flag.
#[derive(Clone)]
pub struct SignalHandler {
    shutdown_flag: Arc<AtomicBool>,
}

impl SignalHandler {
    /// Creates a new `SignalHandler` and registers the SIGINT handler.
    ///
    /// # Errors
    ///
    /// Returns an error if the signal handler cannot be registered (ctrlc
    /// allows only one handler per process).
    pub fn new() -> Result<Self> {
        let shutdown_flag = Arc::new(AtomicBool::new(false));
        let flag_clone = Arc::clone(&shutdown_flag);

        ctrlc::set_handler(move || {
            flag_clone.store(true, Ordering::SeqCst);
        })
        .map_err(|e| ProcwatchError::SignalHandler(e.to_string()))?;

        Ok(Self { shutdown_flag })
    }

    /// A handler that is not wired to any OS signal. Shutdown is requested
    /// through [`SignalHandler::request_shutdown`].
    pub fn detached() -> Self {
        Self {
            shutdown_flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Checks if a shutdown has been requested (non-blocking).
    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag.load(Ordering::SeqCst)
    }

    /// Raise the shutdown flag as if SIGINT had arrived.
    pub fn request_shutdown(&self) {
        self.shutdown_flag.store(true, Ordering::SeqCst);
    }

    /// Sleep for `duration`, waking early if shutdown is requested.
    ///
    /// Returns `true` if the full duration elapsed, `false` if interrupted.
    pub fn sleep(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        loop {
            if self.is_shutdown_requested() {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            thread::sleep(SLEEP_SLICE.min(deadline - now));
        }
    }
}
