//! Digamma and trigamma via recurrence and asymptotic expansion.

use crate::traits::cst;
use crate::FloatScalar;

/// B_{2k}/(2k) for k = 1..7, used in the digamma expansion
/// ψ(x) ≈ ln(x) − 1/(2x) − Σ B_{2k}/(2k · x^{2k}).
const DIGAMMA_ASYMP: [f64; 7] = [
    1.0 / 12.0,
    -1.0 / 120.0,
    1.0 / 252.0,
    -1.0 / 240.0,
    1.0 / 132.0,
    -691.0 / 32760.0,
    1.0 / 12.0,
];

/// B_{2k} for k = 1..7, used in the trigamma expansion
/// ψ₁(x) ≈ 1/x + 1/(2x²) + Σ B_{2k}/x^{2k+1}.
const TRIGAMMA_ASYMP: [f64; 7] = [
    1.0 / 6.0,
    -1.0 / 30.0,
    1.0 / 42.0,
    -1.0 / 30.0,
    5.0 / 66.0,
    -691.0 / 2730.0,
    7.0 / 6.0,
];

/// Shift point above which the asymptotic series is accurate to f64 precision.
const ASYMP_THRESHOLD: f64 = 6.0;

/// Digamma function ψ(x) = d/dx ln Γ(x).
///
/// Shifts x above 6 with ψ(x+1) = ψ(x) + 1/x, then sums the asymptotic
/// series. Negative arguments use ψ(x) = ψ(1−x) − π/tan(πx). Poles
/// (0, −1, −2, …) return NaN.
///
/// # Example
///
/// ```
/// use gammafid::special::digamma;
///
/// // ψ(1) = −γ
/// assert!((digamma(1.0_f64) + 0.5772156649015329).abs() < 1e-12);
/// ```
pub fn digamma<T: FloatScalar>(x: T) -> T {
    let zero = T::zero();
    let one = T::one();

    if x.is_nan() {
        return x;
    }
    if x <= zero && x == x.floor() {
        return T::nan();
    }
    if x < zero {
        let pi = cst::<T>(core::f64::consts::PI);
        return digamma(one - x) - pi / (pi * x).tan();
    }

    let mut result = zero;
    let mut xx = x;
    let threshold = cst::<T>(ASYMP_THRESHOLD);
    while xx < threshold {
        result = result - one / xx;
        xx = xx + one;
    }

    result = result + xx.ln() - cst::<T>(0.5) / xx;

    let inv_x2 = one / (xx * xx);
    let mut term = inv_x2;
    for &c in &DIGAMMA_ASYMP {
        result = result - cst::<T>(c) * term;
        term = term * inv_x2;
    }
    result
}

/// Trigamma function ψ₁(x) = d²/dx² ln Γ(x).
///
/// Uses ψ₁(x) = ψ₁(x+1) + 1/x² to reach x ≥ 6, then the asymptotic
/// series. Negative non-integers go through the reflection
/// ψ₁(1−x) + ψ₁(x) = π²/sin²(πx). Poles return NaN.
///
/// # Example
///
/// ```
/// use gammafid::special::trigamma;
///
/// // ψ₁(1) = π²/6
/// let expected = core::f64::consts::PI.powi(2) / 6.0;
/// assert!((trigamma(1.0_f64) - expected).abs() < 1e-12);
/// ```
pub fn trigamma<T: FloatScalar>(x: T) -> T {
    let zero = T::zero();
    let one = T::one();

    if x.is_nan() {
        return x;
    }
    if x <= zero && x == x.floor() {
        return T::nan();
    }
    if x < zero {
        let pi = cst::<T>(core::f64::consts::PI);
        let s = (pi * x).sin();
        return pi * pi / (s * s) - trigamma(one - x);
    }

    let mut result = zero;
    let mut xx = x;
    let threshold = cst::<T>(ASYMP_THRESHOLD);
    while xx < threshold {
        result = result + one / (xx * xx);
        xx = xx + one;
    }

    let inv_x = one / xx;
    let inv_x2 = inv_x * inv_x;
    result = result + inv_x + cst::<T>(0.5) * inv_x2;

    // Σ B_{2k} / x^{2k+1}
    let mut term = inv_x2 * inv_x;
    for &b in &TRIGAMMA_ASYMP {
        result = result + cst::<T>(b) * term;
        term = term * inv_x2;
    }
    result
}
