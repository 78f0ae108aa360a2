//! One-shot cancellation signal

use std::sync::atomic::{AtomicBool, Ordering};
use tokio_util::sync::CancellationToken;

/// Idempotent stop request shared by the consumer and the producer
///
/// The consumer calls [`fire`](Self::fire); the producer waits on
/// [`cancelled`](Self::cancelled) while delivering and calls
/// [`retire`](Self::retire) when it shuts down. Only the first of `fire` or
/// `retire` has any effect.
#[derive(Debug, Default)]
pub struct CancelSignal {
    token: CancellationToken,
    retired: AtomicBool,
}

impl CancelSignal {
    /// Create a new, unfired signal
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    ///
    /// Returns `true` only for the call that actually fired the signal.
    /// Calls after the first, or after the producer retired the signal, are
    /// no-ops.
    pub fn fire(&self) -> bool {
        if self.retired.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.token.cancel();
        true
    }

    /// Retire the signal at producer shutdown
    pub fn retire(&self) {
        self.retired.store(true, Ordering::Release);
    }

    /// Check if the signal can no longer be fired
    pub fn is_retired(&self) -> bool {
        self.retired.load(Ordering::Acquire)
    }

    /// Check if cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait until cancellation is requested
    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }
}
