//! Calculator configuration.

use serde::{Deserialize, Serialize};

use crate::calculator::PiError;
use crate::constants::{DEFAULT_MAX_DIGITS, DEFAULT_MIN_POOL_RANGE, DIGITS_PER_TERM};

/// Immutable parameters consumed by the Chudnovsky calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PiConfig {
    /// Decimal digits credited to each series term.
    pub digits_per_term: u64,
    /// Largest digit count accepted.
    pub max_digits: u64,
    /// Term ranges wider than this are split and submitted to the worker pool.
    pub min_pool_range: u64,
    /// Worker threads (`<= 0` selects the host's available parallelism).
    pub workers: isize,
    /// Whether observers receive per-leaf progress updates.
    pub progress: bool,
}

impl Default for PiConfig {
    fn default() -> Self {
        Self {
            digits_per_term: DIGITS_PER_TERM,
            max_digits: DEFAULT_MAX_DIGITS,
            min_pool_range: DEFAULT_MIN_POOL_RANGE,
            workers: 0,
            progress: true,
        }
    }
}

impl PiConfig {
    /// Normalize the configuration, applying defaults where values are zero.
    #[must_use]
    pub fn normalize(mut self) -> Self {
        if self.digits_per_term == 0 {
            self.digits_per_term = DIGITS_PER_TERM;
        }
        if self.max_digits == 0 {
            self.max_digits = DEFAULT_MAX_DIGITS;
        }
        if self.min_pool_range == 0 {
            self.min_pool_range = DEFAULT_MIN_POOL_RANGE;
        }
        self
    }

    /// Check that `digits` lies in `1..=max_digits`.
    pub fn validate_digits(&self, digits: u64) -> Result<(), PiError> {
        if digits == 0 {
            return Err(PiError::InvalidInput(
                "digit count must be at least 1".into(),
            ));
        }
        if digits > self.max_digits {
            return Err(PiError::InvalidInput(format!(
                "digit count {digits} exceeds the maximum of {}",
                self.max_digits
            )));
        }
        Ok(())
    }

    /// Number of series terms needed for `digits` decimal places.
    ///
    /// Always includes one term beyond `digits / digits_per_term` to absorb
    /// rounding at the precision boundary.
    pub fn terms_for(&self, digits: u64) -> Result<u64, PiError> {
        if self.digits_per_term == 0 {
            return Err(PiError::Config("digits per term must be positive".into()));
        }
        (digits / self.digits_per_term)
            .checked_add(1)
            .ok_or_else(|| PiError::Overflow(format!("term count for {digits} digits")))
    }
}
