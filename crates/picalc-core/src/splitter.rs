//! Binary splitting of the Chudnovsky series.
//!
//! For a half-open term range `[a, b)` the splitter produces the triple
//! `(P, Q, T)`:
//!
//!   leaf `a = 0`:  P = Q = 1
//!   leaf `a > 0`:  P = (6a-5)(2a-1)(6a-1),  Q = a^3 * 640320^3 / 24
//!   every leaf:    T = (-1)^a * P * (13591409 + 545140134 a)
//!
//! and adjacent ranges `[a, m)`, `[m, b)` combine as
//!
//!   P = P_l P_r,  Q = Q_l Q_r,  T = T_l Q_r + P_l T_r
//!
//! The merge is associative, so every partitioning of a range yields the
//! same triple bit for bit. Pure integer arithmetic throughout.

use std::convert::Infallible;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::One;

use crate::constants::{C3_OVER_24, CHUDNOVSKY_A, CHUDNOVSKY_B};

/// Binary splitting state for one term range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triple {
    /// Partial numerator product.
    pub p: BigInt,
    /// Partial denominator product.
    pub q: BigInt,
    /// Partial weighted numerator sum.
    pub t: BigInt,
}

impl Triple {
    /// Evaluate the single term at index `a`.
    #[must_use]
    pub fn leaf(a: u64) -> Self {
        let (p, q) = if a == 0 {
            (BigInt::one(), BigInt::one())
        } else {
            let k = BigInt::from(a);
            let p = (BigInt::from(6u32) * &k - 5u32)
                * (BigInt::from(2u32) * &k - 1u32)
                * (BigInt::from(6u32) * &k - 1u32);
            let q = k.pow(3) * C3_OVER_24;
            (p, q)
        };
        let mut t = &p * (BigInt::from(CHUDNOVSKY_B) * a + CHUDNOVSKY_A);
        if a.is_odd() {
            t = -t;
        }
        Self { p, q, t }
    }

    /// Combine the triple for `[a, m)` (`self`) with the one for `[m, b)`.
    ///
    /// Operand order is significant for `T`.
    #[must_use]
    pub fn merge(self, right: Triple) -> Triple {
        let t = self.t * &right.q + &self.p * right.t;
        Triple {
            p: self.p * right.p,
            q: self.q * right.q,
            t,
        }
    }
}

/// Midpoint used to split `[a, b)`. For `b - a >= 2`, `a < m < b`.
#[inline]
#[must_use]
pub fn midpoint(a: u64, b: u64) -> u64 {
    a + (b - a) / 2
}

/// Compute the triple for `[a, b)`.
///
/// # Panics
///
/// Panics if `b <= a`.
#[must_use]
pub fn split(a: u64, b: u64) -> Triple {
    match split_with(a, b, &|| {}, &|| Ok::<(), Infallible>(())) {
        Ok(triple) => triple,
        Err(never) => match never {},
    }
}

/// Compute the triple for `[a, b)` with hooks into the recursion.
///
/// `on_leaf` runs once per evaluated term. `before_merge` runs before every
/// merge; an error from it abandons the range and is returned unchanged.
///
/// # Panics
///
/// Panics if `b <= a`.
pub fn split_with<L, M, E>(a: u64, b: u64, on_leaf: &L, before_merge: &M) -> Result<Triple, E>
where
    L: Fn() + ?Sized,
    M: Fn() -> Result<(), E> + ?Sized,
{
    assert!(b > a, "empty term range [{a}, {b})");
    if b - a == 1 {
        let leaf = Triple::leaf(a);
        on_leaf();
        return Ok(leaf);
    }
    let m = midpoint(a, b);
    let left = split_with(a, m, on_leaf, before_merge)?;
    let right = split_with(m, b, on_leaf, before_merge)?;
    before_merge()?;
    Ok(left.merge(right))
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn fold_leaves(a: u64, b: u64) -> Triple {
        (a + 1..b).fold(Triple::leaf(a), |acc, k| acc.merge(Triple::leaf(k)))
    }

    #[test]
    fn leaf_zero() {
        let leaf = Triple::leaf(0);
        assert_eq!(leaf.p, BigInt::from(1));
        assert_eq!(leaf.q, BigInt::from(1));
        assert_eq!(leaf.t, BigInt::from(13_591_409));
    }

    #[test]
    fn leaf_one() {
        let leaf = Triple::leaf(1);
        // (6-5)(2-1)(6-1) = 5
        assert_eq!(leaf.p, BigInt::from(5));
        assert_eq!(leaf.q, BigInt::from(C3_OVER_24));
        assert_eq!(leaf.t, BigInt::from(-5i64 * (13_591_409 + 545_140_134)));
    }

    #[test]
    fn leaf_two_is_positive() {
        let leaf = Triple::leaf(2);
        // (12-5)(4-1)(12-1) = 231
        assert_eq!(leaf.p, BigInt::from(231));
        assert_eq!(leaf.q, BigInt::from(8u64) * BigInt::from(C3_OVER_24));
        assert_eq!(
            leaf.t,
            BigInt::from(231i64 * (13_591_409 + 2 * 545_140_134))
        );
    }

    #[test]
    fn single_term_range_is_leaf() {
        assert_eq!(split(5, 6), Triple::leaf(5));
    }

    #[test]
    fn midpoint_stays_inside_range() {
        for (a, b) in [(0, 2), (0, 3), (7, 9), (10, 1000), (u64::MAX - 3, u64::MAX)] {
            let m = midpoint(a, b);
            assert!(a < m && m < b, "midpoint {m} outside ({a}, {b})");
        }
    }

    #[test]
    fn split_at_four_matches_unsplit() {
        let whole = split(0, 8);
        let halves = split(0, 4).merge(split(4, 8));
        assert_eq!(whole, halves);
    }

    #[test]
    fn split_at_any_point_matches() {
        let whole = split(0, 8);
        for m in 1..8 {
            assert_eq!(split(0, m).merge(split(m, 8)), whole, "split at {m}");
        }
        assert_eq!(fold_leaves(0, 8), whole);
    }

    #[test]
    fn offset_ranges_associate() {
        let whole = split(13, 40);
        assert_eq!(split(13, 20).merge(split(20, 40)), whole);
        assert_eq!(
            split(13, 17).merge(split(17, 31)).merge(split(31, 40)),
            whole
        );
        assert_eq!(
            split(13, 17).merge(split(17, 31).merge(split(31, 40))),
            whole
        );
    }

    #[test]
    fn merge_is_not_commutative() {
        let left = split(0, 2);
        let right = split(2, 4);
        assert_ne!(left.clone().merge(right.clone()), right.merge(left));
    }

    #[test]
    fn on_leaf_called_once_per_term() {
        let count = Cell::new(0u64);
        let merges = Cell::new(0u64);
        let triple = split_with(3, 50, &|| count.set(count.get() + 1), &|| {
            merges.set(merges.get() + 1);
            Ok::<(), ()>(())
        });
        assert_eq!(triple, Ok(split(3, 50)));
        assert_eq!(count.get(), 47);
        assert_eq!(merges.get(), 46);
    }

    #[test]
    fn before_merge_error_stops_recursion() {
        let leaves = Cell::new(0u64);
        let result = split_with(0, 64, &|| leaves.set(leaves.get() + 1), &|| Err("stop"));
        assert_eq!(result, Err("stop"));
        // Only the first pair of leaves runs before the first merge fails.
        assert_eq!(leaves.get(), 2);
    }

    #[test]
    fn root_sum_is_positive() {
        let root = split(0, 10);
        assert!(root.t > BigInt::from(0));
        assert!(root.q > BigInt::from(0));
    }

    #[test]
    #[should_panic(expected = "empty term range")]
    fn empty_range_panics() {
        let _ = split(4, 4);
    }
}
