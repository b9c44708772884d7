//! Calculator trait and the Chudnovsky implementation.
//!
//! `Calculator` is the public trait consumed by the application.
//! `ChudnovskyCalculator` derives the term count, evaluates the series by
//! binary splitting (in parallel through a [`WorkerPool`] above the
//! configured range threshold) and assembles the decimal digits.

use std::sync::Arc;
use std::time::Instant;

use num_bigint::BigUint;
use num_traits::Zero;
use tracing::{debug, info};

use crate::config::PiConfig;
use crate::constants::{GUARD_DIGITS, PI_SCALE, SQRT_RADICAND};
use crate::observer::ProgressObserver;
use crate::progress::{CancellationToken, ProgressTracker};
use crate::splitter::{self, Triple};
use crate::worker_pool::{RangeHandle, WorkerPool};

/// Error type for pi computations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PiError {
    /// The requested digit count is out of bounds.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Calculation was cancelled.
    #[error("calculation cancelled")]
    Cancelled,

    /// The cancellation deadline elapsed.
    #[error("calculation timed out: {0}")]
    Timeout(String),

    /// A size derivation overflowed.
    #[error("arithmetic overflow: {0}")]
    Overflow(String),

    /// An arithmetic invariant was violated.
    #[error("calculation error: {0}")]
    Calculation(String),
}

/// Public trait for pi calculators.
pub trait Calculator: Send + Sync {
    /// Compute pi as `"3."` followed by `digits` fractional digits.
    fn compute_pi(
        &self,
        cancel: &CancellationToken,
        observer: Arc<dyn ProgressObserver>,
        digits: u64,
    ) -> Result<String, PiError>;

    /// Number of series terms (progress leaves) used for `digits`.
    fn terms(&self, digits: u64) -> Result<u64, PiError>;

    /// Get the name of this calculator.
    fn name(&self) -> &str;
}

/// Chudnovsky series evaluated by parallel binary splitting.
pub struct ChudnovskyCalculator {
    config: PiConfig,
}

impl ChudnovskyCalculator {
    /// Create a calculator from a configuration (normalized on entry).
    #[must_use]
    pub fn new(config: PiConfig) -> Self {
        Self {
            config: config.normalize(),
        }
    }

    /// The effective configuration.
    #[must_use]
    pub fn config(&self) -> &PiConfig {
        &self.config
    }
}

impl Default for ChudnovskyCalculator {
    fn default() -> Self {
        Self::new(PiConfig::default())
    }
}

impl Calculator for ChudnovskyCalculator {
    fn compute_pi(
        &self,
        cancel: &CancellationToken,
        observer: Arc<dyn ProgressObserver>,
        digits: u64,
    ) -> Result<String, PiError> {
        self.config.validate_digits(digits)?;
        let terms = self.terms(digits)?;
        cancel.check_cancelled()?;

        let start = Instant::now();
        let progress = Arc::new(ProgressTracker::new(
            terms,
            observer,
            self.config.progress,
        ));

        let pool = if terms > self.config.min_pool_range {
            Some(Arc::new(WorkerPool::new(self.config.workers)?))
        } else {
            None
        };
        info!(
            digits,
            terms,
            workers = pool.as_ref().map_or(1, |p| p.worker_count()),
            "Computing pi"
        );

        let job = RangeJob {
            cancel: cancel.clone(),
            progress: Arc::clone(&progress),
            pool: pool.clone(),
            min_pool_range: self.config.min_pool_range,
        };
        let root = compute_range(&job, 0, terms);
        if let Some(pool) = &pool {
            pool.close();
        }
        let root = root?;
        if progress.completed() != progress.total() {
            return Err(PiError::Calculation(format!(
                "evaluated {} of {} terms",
                progress.completed(),
                progress.total()
            )));
        }
        progress.finish();

        cancel.check_cancelled()?;
        let result = assemble_digits(&root, digits)?;
        info!(
            digits,
            terms,
            elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Pi computed"
        );
        Ok(result)
    }

    fn terms(&self, digits: u64) -> Result<u64, PiError> {
        self.config.terms_for(digits)
    }

    fn name(&self) -> &str {
        "Chudnovsky"
    }
}

/// Shared context for one partitioned computation.
#[derive(Clone)]
struct RangeJob {
    cancel: CancellationToken,
    progress: Arc<ProgressTracker>,
    pool: Option<Arc<WorkerPool>>,
    min_pool_range: u64,
}

/// Triple for `[a, b)`, fanning out through the pool above the threshold.
fn compute_range(job: &RangeJob, a: u64, b: u64) -> Result<Triple, PiError> {
    let pool = match &job.pool {
        Some(pool) if b - a > job.min_pool_range => pool,
        _ => {
            return splitter::split_with(a, b, &|| job.progress.leaf_done(), &|| {
                job.cancel.check_cancelled()
            });
        }
    };

    job.cancel.check_cancelled()?;
    let m = splitter::midpoint(a, b);
    debug!(a, m, b, "Submitting range halves");

    let left = submit_range(pool, job, a, m);
    let right = submit_range(pool, job, m, b);
    // Both children are joined before either result is inspected.
    let left = left.wait();
    let right = right.wait();
    let (left, right) = match (left, right) {
        (Some(left), Some(right)) => (left?, right?),
        _ => return Err(PiError::Cancelled),
    };

    job.cancel.check_cancelled()?;
    Ok(left.merge(right))
}

fn submit_range(
    pool: &WorkerPool,
    job: &RangeJob,
    a: u64,
    b: u64,
) -> RangeHandle<Result<Triple, PiError>> {
    let child = job.clone();
    pool.submit(a, b, move |a, b| compute_range(&child, a, b))
}

/// Turn the root triple for `[0, terms)` into `"3."` plus `digits` digits.
///
/// Uses pi = 426880 * sqrt(10005) * Q / T in fixed point with
/// `digits + GUARD_DIGITS` decimal places; the guard digits are truncated.
pub fn assemble_digits(root: &Triple, digits: u64) -> Result<String, PiError> {
    let precision = digits
        .checked_add(u64::from(GUARD_DIGITS))
        .and_then(|p| u32::try_from(p).ok())
        .ok_or_else(|| PiError::Overflow(format!("precision for {digits} digits")))?;
    let expected_len = usize::try_from(digits)
        .ok()
        .and_then(|d| d.checked_add(1))
        .ok_or_else(|| PiError::Overflow(format!("length of {digits} digits")))?;

    let q = root
        .q
        .to_biguint()
        .ok_or_else(|| PiError::Calculation("negative denominator product".into()))?;
    let t = root
        .t
        .to_biguint()
        .filter(|t| !t.is_zero())
        .ok_or_else(|| PiError::Calculation("non-positive series sum".into()))?;

    let one = BigUint::from(10u32).pow(precision);
    let sqrt_c = (BigUint::from(SQRT_RADICAND) * &one * &one).sqrt();
    let scaled = q * PI_SCALE * sqrt_c / t;
    let truncated = scaled / BigUint::from(10u32).pow(GUARD_DIGITS);

    let mut text = truncated.to_string();
    if text.len() != expected_len || !text.starts_with('3') {
        return Err(PiError::Calculation(format!(
            "assembled {} digits, expected {expected_len}",
            text.len()
        )));
    }
    text.insert(1, '.');
    Ok(text)
}
