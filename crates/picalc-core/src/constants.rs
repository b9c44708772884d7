//! Constants for the Chudnovsky series, pool partitioning, and exit codes.

/// Decimal digits assumed per series term when sizing the term count.
///
/// Each term actually contributes about 14.18 digits; rounding down means
/// the derived term count always over-covers the requested precision.
pub const DIGITS_PER_TERM: u64 = 14;

/// Default ceiling on the number of requested digits.
pub const DEFAULT_MAX_DIGITS: u64 = 10_000_000;

/// Default minimum term-range width that is still submitted to the pool.
/// Narrower ranges are split sequentially on the current thread.
pub const DEFAULT_MIN_POOL_RANGE: u64 = 64;

/// Extra decimal places carried through the fixed-point assembly.
pub const GUARD_DIGITS: u32 = 10;

/// Constant term of the series numerator: 13591409.
pub const CHUDNOVSKY_A: u64 = 13_591_409;

/// Linear coefficient of the series numerator: 545140134.
pub const CHUDNOVSKY_B: u64 = 545_140_134;

/// 640320^3 / 24.
pub const C3_OVER_24: u64 = 10_939_058_860_032_000;

/// Multiplier in pi = 426880 * sqrt(10005) * Q / T.
pub const PI_SCALE: u32 = 426_880;

/// Radicand in pi = 426880 * sqrt(10005) * Q / T.
pub const SQRT_RADICAND: u32 = 10_005;

/// Minimum progress change (1%) before a throttled observer reports.
pub const PROGRESS_REPORT_THRESHOLD: f64 = 0.01;

/// Process exit codes.
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;
    /// Generic error.
    pub const ERROR_GENERIC: i32 = 1;
    /// Computation deadline elapsed.
    pub const ERROR_TIMEOUT: i32 = 2;
    /// Invalid digit count or configuration.
    pub const ERROR_CONFIG: i32 = 4;
    /// Computation cancelled by user (Ctrl+C).
    pub const ERROR_CANCELED: i32 = 130;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn c3_over_24_matches_definition() {
        let c = 640_320u128;
        assert_eq!(u128::from(C3_OVER_24), c * c * c / 24);
        assert_eq!((c * c * c) % 24, 0);
    }

    #[test]
    fn digits_per_term_does_not_overstate_convergence() {
        // Consecutive terms shrink by about 640320^3 / 12^3, i.e. 10^14.18.
        assert!(DIGITS_PER_TERM <= 14);
        assert!(DIGITS_PER_TERM > 0);
    }
}
