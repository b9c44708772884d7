//! # picalc-core
//!
//! Core library for the picalc pi-digit calculator.
//! Evaluates the Chudnovsky series by binary splitting on big integers,
//! fanning large term ranges out over a bounded worker pool.

pub mod calculator;
pub mod config;
pub mod constants;
pub mod observer;
pub mod observers;
pub mod progress;
pub mod splitter;
pub mod worker_pool;

// Re-exports
pub use calculator::{Calculator, ChudnovskyCalculator, PiError};
pub use config::PiConfig;
pub use constants::{exit_codes, DEFAULT_MAX_DIGITS, DEFAULT_MIN_POOL_RANGE, DIGITS_PER_TERM};
pub use observer::{ProgressObserver, ProgressSubject};
pub use progress::{CancellationToken, ProgressUpdate};
pub use splitter::Triple;
pub use worker_pool::{RangeHandle, WorkerPool};

/// Compute pi to `digits` decimal places with the default configuration.
///
/// For progress reporting, cancellation, or pool tuning, use
/// [`ChudnovskyCalculator`] through the [`Calculator`] trait.
///
/// # Example
/// ```
/// assert_eq!(picalc_core::pi_digits(10).unwrap(), "3.1415926535");
/// ```
pub fn pi_digits(digits: u64) -> Result<String, PiError> {
    use observers::NoOpObserver;

    let calc = ChudnovskyCalculator::new(PiConfig {
        progress: false,
        ..PiConfig::default()
    });
    calc.compute_pi(
        &CancellationToken::new(),
        std::sync::Arc::new(NoOpObserver::new()),
        digits,
    )
}
