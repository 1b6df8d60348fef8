//! Cooperative cancellation for lint runs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct Inner {
    flag: AtomicBool,
    deadline: Option<Instant>,
}

/// Caller-supplied cancellation token.
///
/// The engine polls the token between traversal steps and between autofix
/// passes. A cancelled file is abandoned with a file-scoped error; files
/// already completed are unaffected and no partial text is ever returned.
/// Timeouts are tokens constructed with a deadline.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

impl CancelToken {
    /// Creates a token that only cancels when [`CancelToken::cancel`] is
    /// called.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a token that auto-cancels after `timeout`.
    #[must_use]
    pub fn with_deadline(timeout: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                flag: AtomicBool::new(false),
                deadline: Some(Instant::now() + timeout),
            }),
        }
    }

    /// Requests cancellation. All clones of this token observe it.
    pub fn cancel(&self) {
        self.inner.flag.store(true, Ordering::Relaxed);
    }

    /// Returns true if cancellation was requested or the deadline passed.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        if self.inner.flag.load(Ordering::Relaxed) {
            return true;
        }
        self.inner
            .deadline
            .map_or(false, |deadline| Instant::now() >= deadline)
    }
}
