//! Cooperative cancellation for long-running queries.
//!
//! The engines check the signal between steps (and between yielded
//! proofs), never mid-inference. Timeouts are implemented by the caller
//! cancelling from another thread or between `step()` calls.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A shared flag that a caller can raise to abort a query between steps.
#[derive(Debug, Clone, Default)]
pub struct CancellationSignal {
    flag: Arc<AtomicBool>,
}

impl CancellationSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the signal. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
