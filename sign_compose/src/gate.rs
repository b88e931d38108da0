//! The insert gate and the timer thread that reopens it.
//!
//! The composer consumes the gate (sets it `false`) each time it accepts an
//! edit; the timer notices a closed gate, waits one interval and opens it
//! again.  Together they throttle editing to one gesture per interval.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

// ════════════════════════════════════════════════════════════════════════════
// InsertGate
// ════════════════════════════════════════════════════════════════════════════

/// Shared "may insert" flag.  Clones share the same flag.
#[derive(Clone, Debug)]
pub struct InsertGate(Arc<AtomicBool>);

impl InsertGate {
    /// A new, open gate.
    pub fn new() -> Self { InsertGate(Arc::new(AtomicBool::new(true))) }

    pub fn is_open(&self) -> bool { self.0.load(Ordering::Acquire) }

    pub fn open(&self)  { self.0.store(true,  Ordering::Release); }
    pub fn close(&self) { self.0.store(false, Ordering::Release); }
}

impl Default for InsertGate {
    fn default() -> Self { Self::new() }
}

// ════════════════════════════════════════════════════════════════════════════
// TimerSettings
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerSettings {
    /// How long the gate stays closed after an accepted edit.
    pub interval_ms: u64,
    /// How often an open gate is checked.
    pub poll_ms:     u64,
}

impl Default for TimerSettings {
    fn default() -> Self {
        TimerSettings { interval_ms: 2000, poll_ms: 10 }
    }
}

impl TimerSettings {
    pub fn interval(&self) -> Duration { Duration::from_millis(self.interval_ms) }
    pub fn poll(&self)     -> Duration { Duration::from_millis(self.poll_ms.max(1)) }
}

// ════════════════════════════════════════════════════════════════════════════
// GateTimer: the reopening thread
// ════════════════════════════════════════════════════════════════════════════

/// Handle to the gate-reopening thread.  Stopping (or dropping) the handle
/// signals the thread and joins it; a thread waiting out an interval wakes
/// immediately.
pub struct GateTimer {
    stop_tx: Option<Sender<()>>,
    handle:  Option<JoinHandle<()>>,
}

impl GateTimer {
    pub fn spawn(gate: InsertGate, settings: TimerSettings) -> Self {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            debug!(interval_ms = settings.interval_ms, "gate timer started");
            loop {
                let was_open = gate.is_open();
                let wait = if was_open { settings.poll() } else { settings.interval() };
                match stop_rx.recv_timeout(wait) {
                    Err(RecvTimeoutError::Timeout) => {
                        if !was_open {
                            gate.open();
                            debug!("insert gate reopened");
                        }
                    }
                    // stop message, or the handle was dropped
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            debug!("gate timer stopped");
        });

        GateTimer { stop_tx: Some(stop_tx), handle: Some(handle) }
    }

    /// Signal the thread and wait for it to exit.
    pub fn stop(mut self) { self.shutdown(); }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    fn shutdown(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("gate timer thread panicked");
            }
        }
    }
}

impl Drop for GateTimer {
    fn drop(&mut self) { self.shutdown(); }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
