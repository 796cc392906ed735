//! Side channel for per-element failures
//!
//! Units never return their errors up the control-flow path; they hand them to
//! a `FailureReporter` and leave the element untouched.

use parking_lot::Mutex;

use super::types::AssetFailure;

/// Receives every per-element failure of a cure
pub trait FailureReporter: Send + Sync {
    fn report(&self, failure: &AssetFailure);
}

/// Logs each failure at warn level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl FailureReporter for LogReporter {
    fn report(&self, failure: &AssetFailure) {
        log::warn!("{failure}");
    }
}

/// Keeps every reported failure in memory
#[derive(Debug, Default)]
pub struct CollectingReporter {
    failures: Mutex<Vec<AssetFailure>>,
}

impl CollectingReporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the failures reported so far
    #[must_use]
    pub fn failures(&self) -> Vec<AssetFailure> {
        self.failures.lock().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.failures.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.failures.lock().is_empty()
    }

    /// Drain the collected failures
    pub fn take(&self) -> Vec<AssetFailure> {
        std::mem::take(&mut *self.failures.lock())
    }
}

impl FailureReporter for CollectingReporter {
    fn report(&self, failure: &AssetFailure) {
        self.failures.lock().push(failure.clone());
    }
}
