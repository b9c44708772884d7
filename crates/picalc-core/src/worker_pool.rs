//! Bounded worker pool for range computations.
//!
//! `WorkerPool` runs range-bounded closures on a fixed set of rayon worker
//! threads and hands back a [`RangeHandle`] per submission. Shutdown is
//! cooperative: `close()` cancels queued work, then waits for everything
//! already accepted to finish running.

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError};
use parking_lot::{Condvar, Mutex};
use rayon::{ThreadPool, ThreadPoolBuilder, Yield};
use tracing::{debug, warn};

use crate::calculator::PiError;
use crate::progress::CancellationToken;

/// How long an idle waiting worker blocks before looking for work again.
const IDLE_POLL: Duration = Duration::from_micros(200);

/// Get the number of execution units on this host (at least 1).
#[must_use]
pub fn default_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(1)
}

/// Normalize a requested worker count: `<= 0` selects the host parallelism.
#[must_use]
pub fn normalize_workers(requested: isize) -> usize {
    usize::try_from(requested)
        .ok()
        .filter(|&n| n > 0)
        .unwrap_or_else(default_parallelism)
        .max(1)
}

#[derive(Default)]
struct InFlightState {
    running: usize,
    closed: bool,
}

/// Wait group over accepted submissions.
#[derive(Default)]
struct InFlight {
    state: Mutex<InFlightState>,
    idle: Condvar,
}

impl InFlight {
    /// Register a submission unless the pool is closed.
    fn try_enter(&self) -> bool {
        let mut state = self.state.lock();
        if state.closed {
            return false;
        }
        state.running += 1;
        true
    }

    fn exit(&self) {
        let mut state = self.state.lock();
        state.running -= 1;
        if state.running == 0 {
            self.idle.notify_all();
        }
    }

    /// Mark closed. Returns `true` on the first call only.
    fn mark_closed(&self) -> bool {
        let mut state = self.state.lock();
        !std::mem::replace(&mut state.closed, true)
    }

    fn wait_idle(&self) {
        let mut state = self.state.lock();
        while state.running > 0 {
            self.idle.wait(&mut state);
        }
    }

    fn is_closed(&self) -> bool {
        self.state.lock().closed
    }
}

/// Decrements the in-flight count when a submission ends, even by panic.
struct InFlightGuard(Arc<InFlight>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.exit();
    }
}

/// Handle to the eventual result of one submission.
#[must_use = "a range handle does nothing unless waited on"]
pub struct RangeHandle<T> {
    rx: Receiver<T>,
}

impl<T> RangeHandle<T> {
    /// Block until the result is available.
    ///
    /// Returns `None` when the submission was rejected by a closed pool or
    /// skipped because the pool was cancelled before it started. Called from
    /// a worker thread, the wait keeps that worker busy with other queued
    /// pool jobs, so nested submissions cannot exhaust the pool.
    pub fn wait(self) -> Option<T> {
        loop {
            match self.rx.try_recv() {
                Ok(value) => return Some(value),
                Err(TryRecvError::Disconnected) => return None,
                Err(TryRecvError::Empty) => {}
            }
            match rayon::yield_now() {
                Some(Yield::Executed) => {}
                Some(Yield::Idle) => match self.rx.recv_timeout(IDLE_POLL) {
                    Ok(value) => return Some(value),
                    Err(RecvTimeoutError::Disconnected) => return None,
                    Err(RecvTimeoutError::Timeout) => {}
                },
                None => return self.rx.recv().ok(),
            }
        }
    }
}

/// Bounded-concurrency executor for range computations.
pub struct WorkerPool {
    pool: ThreadPool,
    workers: usize,
    in_flight: Arc<InFlight>,
    cancel: CancellationToken,
}

impl WorkerPool {
    /// Create a pool with `workers` threads (`<= 0` selects the host
    /// parallelism).
    pub fn new(workers: isize) -> Result<Self, PiError> {
        let workers = normalize_workers(workers);
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("picalc-worker-{i}"))
            .build()
            .map_err(|e| PiError::Calculation(format!("failed to create thread pool: {e}")))?;
        debug!(workers, "Worker pool started");
        Ok(Self {
            pool,
            workers,
            in_flight: Arc::new(InFlight::default()),
            cancel: CancellationToken::new(),
        })
    }

    /// Number of worker threads.
    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.workers
    }

    /// Token cancelled when the pool closes, for long-running closures.
    #[must_use]
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Whether `close()` has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.in_flight.is_closed()
    }

    /// Schedule `compute(start, end)` on a free worker.
    ///
    /// After `close()` the returned handle resolves to `None` immediately.
    pub fn submit<T, F>(&self, start: u64, end: u64, compute: F) -> RangeHandle<T>
    where
        T: Send + 'static,
        F: FnOnce(u64, u64) -> T + Send + 'static,
    {
        let (tx, rx) = crossbeam_channel::bounded(1);
        if !self.in_flight.try_enter() {
            warn!(start, end, "Submission rejected by closed worker pool");
            return RangeHandle { rx };
        }
        let guard = InFlightGuard(Arc::clone(&self.in_flight));
        let cancel = self.cancel.clone();
        self.pool.spawn(move || {
            let _guard = guard;
            if cancel.is_cancelled() {
                return;
            }
            let _ = tx.send(compute(start, end));
        });
        RangeHandle { rx }
    }

    /// Stop accepting work, cancel queued submissions, and wait for every
    /// accepted submission to finish. Safe to call more than once.
    ///
    /// Must not be called from one of this pool's own workers.
    pub fn close(&self) {
        if self.in_flight.mark_closed() {
            self.cancel.cancel();
            debug!(workers = self.workers, "Worker pool closing");
        }
        self.in_flight.wait_idle();
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Signal only: the last reference may be dropped on a worker thread.
        if self.in_flight.mark_closed() {
            self.cancel.cancel();
        }
    }
}
