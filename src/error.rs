//! Error types shared by the inference layer.
//!
//! [`InferenceError`] covers the recoverable outcomes of the numeric core:
//! samplers catch them and turn them into rejections. [`SetupError`] covers
//! caller contract violations and is raised before any numeric work starts.

use core::fmt;

use crate::optim::OptimError;

/// Recoverable failures of the numeric core.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InferenceError {
    /// No shape parameter within the configured bounds reproduces the target
    /// tau2 for this uniform sample.
    EstimationFailure,
    /// The importance weight has a zero or non-finite denominator, or is
    /// itself non-finite.
    IllDefinedWeight,
    /// A Gibbs proposal failed the cubic condition or produced non-real or
    /// non-positive coordinates.
    InvalidGibbsProposal,
    /// A root search hit its iteration cap without meeting the tolerance.
    NonconvergentRootFind {
        /// Iterations performed.
        iterations: usize,
    },
    /// An argument was outside the domain of the operation (u ∉ [0, 1),
    /// α ≤ 0, or a non-finite function value).
    Domain,
}

impl fmt::Display for InferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EstimationFailure => write!(f, "no shape parameter within bounds matches the target statistic"),
            Self::IllDefinedWeight => write!(f, "importance weight is ill-defined"),
            Self::InvalidGibbsProposal => write!(f, "gibbs proposal violates the discriminant condition"),
            Self::NonconvergentRootFind { iterations } => {
                write!(f, "root search did not converge after {iterations} iterations")
            }
            Self::Domain => write!(f, "argument outside the domain of the operation"),
        }
    }
}

impl std::error::Error for InferenceError {}

impl From<OptimError> for InferenceError {
    fn from(e: OptimError) -> Self {
        match e {
            OptimError::OutOfBounds | OptimError::BracketInvalid => Self::EstimationFailure,
            OptimError::MaxIterations { iterations } => Self::NonconvergentRootFind { iterations },
            OptimError::NotFinite => Self::Domain,
        }
    }
}

/// Caller contract violations, reported at the boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SetupError {
    /// The data vector is empty.
    EmptyData,
    /// A data value is zero, negative or non-finite.
    NonPositiveData {
        /// Position of the first offending value.
        index: usize,
    },
    /// The operation needs more points than were supplied.
    TooFewPoints {
        /// Minimum number of points.
        needed: usize,
        /// Points supplied.
        got: usize,
    },
    /// A settings field is out of range.
    InvalidSetting(&'static str),
    /// No valid starting state was found for a chain.
    Initialization(InferenceError),
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyData => write!(f, "data vector is empty"),
            Self::NonPositiveData { index } => {
                write!(f, "data value at index {index} is not strictly positive and finite")
            }
            Self::TooFewPoints { needed, got } => {
                write!(f, "need at least {needed} data points, got {got}")
            }
            Self::InvalidSetting(field) => write!(f, "invalid setting: {field}"),
            Self::Initialization(e) => write!(f, "could not initialise chain: {e}"),
        }
    }
}

impl std::error::Error for SetupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Initialization(e) => Some(e),
            _ => None,
        }
    }
}
