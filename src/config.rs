//! Crate-wide inference settings and policy switches.
//!
//! One [`InferenceSettings`] value is built up front, checked with
//! [`InferenceSettings::validate`], and passed by reference into every
//! component. Nothing in the crate reads configuration from anywhere else.
//!
//! # Example
//!
//! ```
//! use gammafid::config::{CdfEvaluation, InferenceSettings, PhiPolicy};
//!
//! let settings = InferenceSettings {
//!     evaluation: CdfEvaluation::NumericIntegration,
//!     phi: PhiPolicy::RatioProduct,
//!     seed: 7,
//!     ..Default::default()
//! };
//! settings.validate().unwrap();
//! ```

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::error::SetupError;
use crate::optim::{BoundedSettings, StepSearchSettings};
use crate::quadrature::QuadratureSettings;

/// How the Gamma CDF is evaluated inside the inverse-CDF search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CdfEvaluation {
    /// Regularized lower incomplete gamma function.
    #[default]
    ClosedForm,
    /// Simpson quadrature of the density.
    NumericIntegration,
}

/// Prior multiplier applied to the importance weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PriorPolicy {
    /// π = 1.
    #[default]
    Constant,
    /// π = β, the current scale estimate.
    Beta,
    /// π = α, the current shape estimate.
    Alpha,
    /// π = √(α·ψ₁(α) − 1), the Jeffreys prior for the shape.
    Jeffreys,
}

/// Statistic of a reconstructed sample whose expectation the samplers
/// estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PhiPolicy {
    /// Fraction of coordinates above `threshold`.
    Indicator {
        /// Exceedance level.
        threshold: f64,
    },
    /// x₁·x₂ / x₃.
    RatioProduct,
    /// (x₁ / x₂)^x₃.
    PowerRatio,
}

impl Default for PhiPolicy {
    fn default() -> Self {
        PhiPolicy::Indicator { threshold: 1.0 }
    }
}

/// Settings shared by the inversion engine, the shape estimator, the
/// weighting and the samplers.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InferenceSettings {
    /// Smallest accepted shape parameter.
    pub alpha_lower: f64,
    /// Largest accepted shape parameter.
    pub alpha_upper: f64,
    /// Tolerance on |F(x) − u| for the inverse CDF.
    pub tolerance: f64,
    /// Tolerance on |tau2(u, α) − s2| for the shape search.
    pub shape_tolerance: f64,
    /// Finite-difference step in u.
    pub h_step: f64,
    /// Finite-difference step in α.
    pub alpha_h_step: f64,
    /// Iteration cap for every step search.
    pub max_iter: usize,
    /// CDF evaluation strategy.
    pub evaluation: CdfEvaluation,
    /// Quadrature settings for the numeric CDF and the analytic derivative.
    pub quadrature: QuadratureSettings<f64>,
    /// Minimizer settings for the bounded shape search.
    pub minimizer: BoundedSettings<f64>,
    /// Prior multiplier on the importance weight.
    pub prior: PriorPolicy,
    /// Statistic tallied by the samplers.
    pub phi: PhiPolicy,
    /// Use 1/|J| instead of |J| as the importance weight.
    pub invert_weight: bool,
    /// Seed for [`InferenceSettings::rng`].
    pub seed: u64,
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            alpha_lower: 0.05,
            alpha_upper: 200.0,
            tolerance: 1e-5,
            shape_tolerance: 1e-4,
            h_step: 0.01,
            alpha_h_step: 0.01,
            max_iter: 1000,
            evaluation: CdfEvaluation::ClosedForm,
            quadrature: QuadratureSettings::default(),
            minimizer: BoundedSettings::default(),
            prior: PriorPolicy::Constant,
            phi: PhiPolicy::default(),
            invert_weight: false,
            seed: 0x5eed,
        }
    }
}

impl InferenceSettings {
    /// Check every field before any numeric work starts.
    pub fn validate(&self) -> Result<(), SetupError> {
        if !(self.alpha_lower > 0.0 && self.alpha_lower.is_finite()) {
            return Err(SetupError::InvalidSetting("alpha_lower must be positive and finite"));
        }
        if !(self.alpha_upper > self.alpha_lower && self.alpha_upper.is_finite()) {
            return Err(SetupError::InvalidSetting("alpha_upper must be finite and above alpha_lower"));
        }
        if !(self.tolerance > 0.0) || !(self.shape_tolerance > 0.0) {
            return Err(SetupError::InvalidSetting("tolerances must be positive"));
        }
        if !(self.h_step > 0.0 && self.h_step < 1.0) {
            return Err(SetupError::InvalidSetting("h_step must lie in (0, 1)"));
        }
        if !(self.alpha_h_step > 0.0 && self.alpha_h_step.is_finite()) {
            return Err(SetupError::InvalidSetting("alpha_h_step must be positive and finite"));
        }
        if self.max_iter == 0 {
            return Err(SetupError::InvalidSetting("max_iter must be at least 1"));
        }
        if !(self.quadrature.abs_tol > 0.0) || self.quadrature.initial_panels == 0 {
            return Err(SetupError::InvalidSetting("quadrature settings out of range"));
        }
        if !(self.minimizer.x_tol > 0.0) || self.minimizer.max_evals == 0 {
            return Err(SetupError::InvalidSetting("minimizer settings out of range"));
        }
        if let PhiPolicy::Indicator { threshold } = self.phi {
            if !threshold.is_finite() {
                return Err(SetupError::InvalidSetting("indicator threshold must be finite"));
            }
        }
        Ok(())
    }

    /// Seeded generator for reproducible chains.
    pub fn rng(&self) -> Xoshiro256PlusPlus {
        Xoshiro256PlusPlus::seed_from_u64(self.seed)
    }

    /// Step-search settings for the inverse CDF.
    pub fn inversion_search(&self) -> StepSearchSettings<f64> {
        StepSearchSettings {
            tolerance: self.tolerance,
            initial_step: 1.0,
            max_iter: self.max_iter,
        }
    }

    /// Step-search settings for the shape parameter.
    pub fn shape_search(&self) -> StepSearchSettings<f64> {
        StepSearchSettings {
            tolerance: self.shape_tolerance,
            initial_step: 1.0,
            max_iter: self.max_iter,
        }
    }
}
