//! Expiry notification hook.
//!
//! The countdown's only externally observable side effect is a single
//! notification fired when the remaining time reaches zero. The original
//! behavior was a blocking alert; here it is a trait seam so the daemon can
//! stay decoupled from how the alert is delivered, and tests can observe
//! firings without touching the terminal.

use std::io::Write;

use crate::types::TimerMode;

// ============================================================================
// NotifyError
// ============================================================================

/// Notification delivery error.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The notification could not be written
    #[error("Failed to deliver notification: {0}")]
    DeliveryError(String),
}

// ============================================================================
// Notifier
// ============================================================================

/// Trait for expiry notification implementations.
///
/// Implementations must be non-blocking; the daemon loop calls this inline.
pub trait Notifier: Send + Sync {
    /// Delivers the expiry notification.
    ///
    /// `sound` requests an audible cue in addition to the visible alert.
    ///
    /// # Errors
    ///
    /// Returns an error if delivery fails.
    fn notify_expired(&self, mode: TimerMode, sound: bool) -> Result<(), NotifyError>;
}

// ============================================================================
// ConsoleNotifier
// ============================================================================

/// Notifier that writes the alert to the daemon's stdout.
///
/// The audible cue is the terminal bell.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    /// Creates a new console notifier.
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for ConsoleNotifier {
    fn notify_expired(&self, mode: TimerMode, sound: bool) -> Result<(), NotifyError> {
        let mut stdout = std::io::stdout().lock();
        if sound {
            // BEL
            let _ = stdout.write_all(b"\x07");
        }
        writeln!(stdout, "Time's up! {} finished.", mode.label())
            .map_err(|e| NotifyError::DeliveryError(e.to_string()))?;
        stdout
            .flush()
            .map_err(|e| NotifyError::DeliveryError(e.to_string()))?;
        Ok(())
    }
}

// ============================================================================
// MockNotifier
// ============================================================================

/// Mock notifier for testing.
#[derive(Debug, Default)]
pub struct MockNotifier {
    calls: std::sync::Mutex<Vec<(TimerMode, bool)>>,
    should_fail: std::sync::atomic::AtomicBool,
}

impl MockNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self {
            calls: std::sync::Mutex::new(Vec::new()),
            should_fail: std::sync::atomic::AtomicBool::new(false),
        }
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail
            .store(should_fail, std::sync::atomic::Ordering::SeqCst);
    }

    #[must_use]
    pub fn notify_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    #[must_use]
    pub fn get_calls(&self) -> Vec<(TimerMode, bool)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl Notifier for MockNotifier {
    fn notify_expired(&self, mode: TimerMode, sound: bool) -> Result<(), NotifyError> {
        if self.should_fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(NotifyError::DeliveryError("Mock failure".to_string()));
        }
        self.calls.lock().unwrap().push((mode, sound));
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
