//! Special functions needed by the Gamma machinery.
//!
//! All functions are generic over [`FloatScalar`] (f32/f64) and allocation
//! free.
//!
//! | Function | Description |
//! |----------|-------------|
//! | [`lgamma`] | Log-gamma ln Γ(x) |
//! | [`digamma`] | Digamma ψ(x) = d/dx ln Γ(x) |
//! | [`trigamma`] | Trigamma ψ₁(x) = d²/dx² ln Γ(x) |
//! | [`gamma_inc`] | Regularized lower incomplete gamma P(a,x) |
//! | [`gamma_inc_upper`] | Regularized upper incomplete gamma Q(a,x) = 1−P(a,x) |
//!
//! # Example
//!
//! ```
//! use gammafid::special::{lgamma, gamma_inc};
//!
//! // ln Γ(1) = 0
//! assert!(lgamma(1.0_f64).abs() < 1e-14);
//!
//! // P(1, x) = 1 − e^{−x}
//! let p = gamma_inc(1.0_f64, 2.0).unwrap();
//! assert!((p - (1.0 - (-2.0_f64).exp())).abs() < 1e-14);
//! ```

use core::fmt;

use crate::traits::cst;
use crate::FloatScalar;

mod digamma_fn;
mod gamma_fn;
mod incgamma;


pub use digamma_fn::{digamma, trigamma};
pub use gamma_fn::lgamma;
pub use incgamma::{gamma_inc, gamma_inc_upper};

/// Errors from special function evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpecialError {
    /// Series or continued fraction did not converge within the iteration limit.
    ConvergenceFailure,
    /// Input outside the function's domain (a ≤ 0 or x < 0 for incomplete gamma).
    DomainError,
}

impl fmt::Display for SpecialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConvergenceFailure => write!(f, "series/continued fraction did not converge"),
            Self::DomainError => write!(f, "input outside function domain"),
        }
    }
}

impl std::error::Error for SpecialError {}

// Lanczos approximation, g = 7, n = 9 (Godfrey coefficients).

pub(crate) const LANCZOS_G: f64 = 7.0;

pub(crate) const LANCZOS_COEFFS: [f64; 9] = [
    0.99999999999980993,
    676.5203681218851,
    -1259.1392167224028,
    771.32342877765313,
    -176.61502916214059,
    12.507343278686905,
    -0.13857109526572012,
    9.9843695780195716e-6,
    1.5056327351493116e-7,
];

/// Ag(z) = c0 + c1/(z+1) + c2/(z+2) + ...
#[inline]
pub(crate) fn lanczos_sum<T: FloatScalar>(z: T) -> T {
    LANCZOS_COEFFS[1..]
        .iter()
        .enumerate()
        .fold(cst::<T>(LANCZOS_COEFFS[0]), |acc, (i, &c)| {
            acc + cst::<T>(c) / (z + cst::<T>((i + 1) as f64))
        })
}
