//! Optimization: directional root search and derivative-free minimization.
//!
//! All routines are generic over [`FloatScalar`] and allocation free.
//!
//! # Root finding
//!
//! - [`step_search`] — adaptive directional step search for monotone
//!   functions, with a floor or a hard interval and an iteration cap
//!
//! # Minimization
//!
//! - [`minimize_bounded`] — Brent's bounded scalar minimizer (golden section
//!   + parabolic interpolation)
//! - [`nelder_mead`] — Nelder–Mead simplex over `[T; N]`

mod bounded;
mod nelder_mead;
mod step_search;

#[cfg(test)]
mod tests;

pub use bounded::{minimize_bounded, BoundedSettings};
pub use nelder_mead::{nelder_mead, NelderMeadSettings};
pub use step_search::{step_search, Monotonicity, SearchBounds, StepSearchSettings};

use crate::traits::FloatScalar;

/// Errors from optimization algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OptimError {
    /// Maximum number of iterations exceeded.
    MaxIterations {
        /// Iterations performed.
        iterations: usize,
    },
    /// The search sits on an interval bound and still has to move outward.
    OutOfBounds,
    /// Interval endpoints do not bracket the target.
    BracketInvalid,
    /// A computed value was NaN or infinity.
    NotFinite,
}

impl core::fmt::Display for OptimError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            OptimError::MaxIterations { iterations } => {
                write!(f, "maximum iterations exceeded ({iterations})")
            }
            OptimError::OutOfBounds => write!(f, "solution lies outside the search interval"),
            OptimError::BracketInvalid => write!(f, "interval endpoints do not bracket the target"),
            OptimError::NotFinite => write!(f, "computed value is NaN or infinity"),
        }
    }
}

impl std::error::Error for OptimError {}

/// Result of a scalar root search.
#[derive(Debug, Clone, Copy)]
pub struct RootResult<T> {
    /// Approximate root.
    pub x: T,
    /// Function value at the root: `f(x)`.
    pub fx: T,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Number of function evaluations.
    pub evals: usize,
}

/// Result of a scalar bounded minimization.
#[derive(Debug, Clone, Copy)]
pub struct ScalarMinimum<T> {
    /// Approximate minimizer.
    pub x: T,
    /// Function value at the minimizer.
    pub fx: T,
    /// Number of function evaluations.
    pub evals: usize,
}

/// Result of a multivariate minimization.
#[derive(Debug, Clone, Copy)]
pub struct MinimizeResult<T: FloatScalar, const N: usize> {
    /// Approximate minimizer.
    pub x: [T; N],
    /// Function value at the minimizer: `f(x)`.
    pub fx: T,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Number of function evaluations.
    pub f_evals: usize,
}
