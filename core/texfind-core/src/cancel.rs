//! Cancellation token shared between racing traversals.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A flag that only ever goes from "running" to "cancelled".
///
/// Clones share the same flag, so the coordinator keeps one handle and hands
/// the others to the traversal tasks.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every holder of this token to stop at its next check.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}
