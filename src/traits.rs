//! Probability domains for the forward-Viterbi recurrence.
//!
//! The engine is generic over how probabilities are represented. A domain
//! supplies the three operations the recurrence needs:
//! - `extend`: chain two independent events (product of probabilities),
//! - `combine`: merge two disjoint events (sum of probabilities),
//! - `zero`: the neutral element of `combine` (probability zero).
//!
//! [`Linear`] works in plain probabilities and underflows on long sequences;
//! [`Log2`] works in base-2 logarithms and stays finite.

use crate::utils::log2_add;

/// Arithmetic of one probability representation.
pub trait ProbDomain {
    /// Human-readable name, used in logging and scratch-storage labels.
    const NAME: &'static str;

    /// Neutral element of [`combine`](Self::combine).
    fn zero() -> f64;

    /// Probability of two independent events both happening.
    fn extend(a: f64, b: f64) -> f64;

    /// Probability of either of two disjoint events happening.
    fn combine(a: f64, b: f64) -> f64;

    /// Convert a plain probability into this domain.
    fn from_prob(p: f64) -> f64;

    /// Convert a value in this domain back into a plain probability.
    fn to_prob(x: f64) -> f64;
}

/// Plain probabilities in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Linear;

/// Base-2 log probabilities in `[-inf, 0]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Log2;

impl ProbDomain for Linear {
    const NAME: &'static str = "linear";

    #[inline]
    fn zero() -> f64 {
        0.0
    }

    #[inline]
    fn extend(a: f64, b: f64) -> f64 {
        a * b
    }

    #[inline]
    fn combine(a: f64, b: f64) -> f64 {
        a + b
    }

    #[inline]
    fn from_prob(p: f64) -> f64 {
        p
    }

    #[inline]
    fn to_prob(x: f64) -> f64 {
        x
    }
}

impl ProbDomain for Log2 {
    const NAME: &'static str = "log2";

    #[inline]
    fn zero() -> f64 {
        f64::NEG_INFINITY
    }

    #[inline]
    fn extend(a: f64, b: f64) -> f64 {
        a + b
    }

    #[inline]
    fn combine(a: f64, b: f64) -> f64 {
        log2_add(a, b)
    }

    #[inline]
    fn from_prob(p: f64) -> f64 {
        p.log2()
    }

    #[inline]
    fn to_prob(x: f64) -> f64 {
        x.exp2()
    }
}
