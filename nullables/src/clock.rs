//! Nullable clock: deterministic time for testing.

use std::sync::atomic::{AtomicU64, Ordering};
use tcr_types::Timestamp;

/// A deterministic clock. Time only advances when you tell it to.
///
/// Atomic rather than `Cell` so a single clock can be shared (via `Arc`)
/// between the test body and a `NullLedger` running on other tasks.
pub struct NullClock {
    current: AtomicU64,
}

impl NullClock {
    pub fn new(initial_secs: u64) -> Self {
        Self {
            current: AtomicU64::new(initial_secs),
        }
    }

    /// Get the current time.
    pub fn now(&self) -> Timestamp {
        Timestamp::new(self.current.load(Ordering::SeqCst))
    }

    /// Advance time by a number of seconds.
    pub fn advance(&self, secs: u64) {
        self.current.fetch_add(secs, Ordering::SeqCst);
    }

    /// Set the time to a specific value.
    pub fn set(&self, secs: u64) {
        self.current.store(secs, Ordering::SeqCst);
    }
}
