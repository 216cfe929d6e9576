//! Cooperative cancellation.
//!
//! The driver consults a [`CancellationToken`] only at phase boundaries.
//! Another thread (an IDE, a build server) may flip the token at any time;
//! the flag is the only state the driver reads concurrently.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

/// The compilation was cancelled at a checkpoint.
///
/// Not a diagnostic: partially written artifacts are undefined and must be
/// discarded by the caller.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Error)]
#[error("compilation aborted")]
pub struct Cancelled;

/// Shared cancellation flag. Clones observe the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Takes effect at the next checkpoint.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Checkpoint: `Err(Cancelled)` once cancellation was requested.
    pub fn check_canceled(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            tracing::debug!("cancellation observed at checkpoint");
            return Err(Cancelled);
        }
        Ok(())
    }
}
