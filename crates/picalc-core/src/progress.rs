//! Progress tracking and cooperative cancellation.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::calculator::PiError;
use crate::observer::ProgressObserver;

/// Progress update sent from the calculator to observers.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    /// Leaf terms evaluated so far.
    pub completed_terms: u64,
    /// Total leaf terms in this computation.
    pub total_terms: u64,
    /// `completed_terms / total_terms`, in [0.0, 1.0].
    pub progress: f64,
    /// Whether this is the final update.
    pub done: bool,
}

impl ProgressUpdate {
    /// Create a new progress update.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(completed_terms: u64, total_terms: u64) -> Self {
        let progress = if total_terms == 0 {
            0.0
        } else {
            (completed_terms as f64 / total_terms as f64).min(1.0)
        };
        Self {
            completed_terms,
            total_terms,
            progress,
            done: false,
        }
    }

    /// Create a completion update.
    #[must_use]
    pub fn done(total_terms: u64) -> Self {
        Self {
            completed_terms: total_terms,
            total_terms,
            progress: 1.0,
            done: true,
        }
    }
}

/// Shared leaf counter for one computation.
///
/// Leaves increment the counter atomically from any worker. Observer
/// notifications go through a small lock so counts are delivered in
/// non-decreasing order even when leaves finish out of order. A worker that
/// finds the lock taken skips its notification instead of waiting, except
/// for the final leaf, whose count is always delivered.
pub struct ProgressTracker {
    completed: AtomicU64,
    total: u64,
    last_reported: Mutex<u64>,
    observer: Arc<dyn ProgressObserver>,
    enabled: bool,
}

impl ProgressTracker {
    /// Create a tracker for `total` leaves reporting to `observer`.
    #[must_use]
    pub fn new(total: u64, observer: Arc<dyn ProgressObserver>, enabled: bool) -> Self {
        Self {
            completed: AtomicU64::new(0),
            total,
            last_reported: Mutex::new(0),
            observer,
            enabled,
        }
    }

    /// Record one evaluated leaf.
    pub fn leaf_done(&self) {
        let completed = self.completed.fetch_add(1, Ordering::Relaxed) + 1;
        if !self.enabled {
            return;
        }
        let mut last = match self.last_reported.try_lock() {
            Some(last) => last,
            None if completed >= self.total => self.last_reported.lock(),
            None => return,
        };
        if completed > *last {
            *last = completed;
            self.observer
                .on_progress(&ProgressUpdate::new(completed, self.total));
        }
    }

    /// Send the final update.
    pub fn finish(&self) {
        if self.enabled {
            let _last = self.last_reported.lock();
            self.observer.on_progress(&ProgressUpdate::done(self.total));
        }
    }

    /// Leaves evaluated so far.
    #[must_use]
    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    /// Total leaves expected.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }
}

/// Cooperative cancellation token, optionally bound to a deadline.
///
/// Clones share the cancellation flag, so cancelling any clone cancels
/// every computation holding one.
///
/// # Example
/// ```
/// use picalc_core::progress::CancellationToken;
///
/// let token = CancellationToken::new();
/// assert!(!token.is_cancelled());
///
/// token.cancel();
/// assert!(token.is_cancelled());
/// assert!(token.check_cancelled().is_err());
/// ```
#[derive(Clone, Debug)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancellationToken {
    /// Create a new cancellation token with no deadline.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: None,
        }
    }

    /// Create a token that also counts as cancelled once `timeout` elapses.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: Some(Instant::now() + timeout),
        }
    }

    /// Check if cancellation has been requested or the deadline has passed.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire) || self.deadline_passed()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Check for cancellation, returning an error if cancelled.
    ///
    /// Manual cancellation wins over an elapsed deadline.
    pub fn check_cancelled(&self) -> Result<(), PiError> {
        if self.cancelled.load(Ordering::Acquire) {
            return Err(PiError::Cancelled);
        }
        if self.deadline_passed() {
            return Err(PiError::Timeout("deadline exceeded".to_string()));
        }
        Ok(())
    }

    /// Time left before the deadline, if one is set.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    fn deadline_passed(&self) -> bool {
        self.deadline
            .is_some_and(|deadline| Instant::now() >= deadline)
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}
