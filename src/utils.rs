//! Numeric helpers shared by the probability domains.

use std::f64::consts::LN_2;

/// Add two probabilities represented as base-2 logarithms.
///
/// Computes `log2(2^a + 2^b)` as `hi + log2(1 + 2^(lo - hi))` where `hi` is
/// the larger operand, so the exponent is never positive and nothing
/// overflows. `-inf` (probability zero) is the neutral element.
#[inline]
pub fn log2_add(a: f64, b: f64) -> f64 {
    let (hi, lo) = if a >= b { (a, b) } else { (b, a) };
    if lo == f64::NEG_INFINITY {
        return hi;
    }
    hi + (lo - hi).exp2().ln_1p() / LN_2
}
