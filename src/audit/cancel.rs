//! Cooperative cancellation for audit runs.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{AuditError, AuditResult};

/// A shared cancellation flag.
///
/// Clones share the same flag. The pipeline polls it between stages and
/// between rows; once set, the run stops and returns
/// [`AuditError::Cancelled`] without producing partial results.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns true once [`cancel`](Self::cancel) has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Returns `Err(AuditError::Cancelled)` if cancellation was requested.
    pub fn check(&self) -> AuditResult<()> {
        if self.is_cancelled() {
            Err(AuditError::Cancelled)
        } else {
            Ok(())
        }
    }
}
