//! Importance weights, prior multipliers and the tallied statistic.
//!
//! For a uniform sample `u` mapped to quantiles `xᵢ = F⁻¹(uᵢ; α)` with
//! shape derivatives `dᵢ = ∂xᵢ/∂α`, the weight is built from
//!
//! ```text
//! J = (1/n)·Σ dᵢ/xᵢ − Σdᵢ / Σxᵢ
//! ```
//!
//! as `|J|·π(α, β)`, or `π(α, β)/|J|` when `invert_weight` is set.

use crate::config::{InferenceSettings, PhiPolicy, PriorPolicy};
use crate::error::InferenceError;
use crate::inversion::GammaInversion;
use crate::special::trigamma;

impl PriorPolicy {
    /// Prior multiplier π at shape `alpha` and scale `beta`.
    pub fn evaluate(&self, alpha: f64, beta: f64) -> f64 {
        match self {
            PriorPolicy::Constant => 1.0,
            PriorPolicy::Beta => beta,
            PriorPolicy::Alpha => alpha,
            PriorPolicy::Jeffreys => (alpha * trigamma(alpha) - 1.0).max(0.0).sqrt(),
        }
    }
}

impl PhiPolicy {
    /// Evaluate the statistic on a reconstructed sample.
    ///
    /// The ratio statistics read the first three coordinates and give NaN
    /// for shorter samples; the indicator averages over every coordinate.
    pub fn evaluate(&self, x: &[f64]) -> f64 {
        match *self {
            PhiPolicy::Indicator { threshold } => {
                if x.is_empty() {
                    return f64::NAN;
                }
                x.iter().filter(|&&v| v > threshold).count() as f64 / x.len() as f64
            }
            PhiPolicy::RatioProduct => match x {
                [x1, x2, x3, ..] => x1 * x2 / x3,
                _ => f64::NAN,
            },
            PhiPolicy::PowerRatio => match x {
                [x1, x2, x3, ..] => (x1 / x2).powf(*x3),
                _ => f64::NAN,
            },
        }
    }
}

/// Importance weighting over uniform samples.
///
/// # Example
///
/// ```
/// use gammafid::config::InferenceSettings;
/// use gammafid::weight::ImportanceWeighting;
///
/// let settings = InferenceSettings::default();
/// let w = ImportanceWeighting::new(&settings);
/// let value = w.weight(&[0.2, 0.5, 0.8], 2.0, 1.0);
/// assert!(value.is_finite() && value >= 0.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ImportanceWeighting<'a> {
    inversion: GammaInversion<'a>,
}

impl<'a> ImportanceWeighting<'a> {
    /// Bind the weighting to a settings value.
    pub fn new(settings: &'a InferenceSettings) -> Self {
        Self { inversion: GammaInversion::new(settings) }
    }

    /// Weight of `u` at shape `alpha` and scale `beta`.
    ///
    /// # Errors
    ///
    /// [`InferenceError::IllDefinedWeight`] when `Σxᵢ` or some `xᵢ` is zero,
    /// or when any intermediate or the result is not finite. Failures of the
    /// inversion itself pass through unchanged.
    pub fn try_weight(&self, u: &[f64], alpha: f64, beta: f64) -> Result<f64, InferenceError> {
        let x = self.inversion.inverse_cdf_all(u, alpha)?;
        self.try_weight_at(u, &x, alpha, beta)
    }

    /// [`try_weight`](Self::try_weight) with the unit-scale quantiles of `u`
    /// already computed.
    pub fn try_weight_at(&self, u: &[f64], x: &[f64], alpha: f64, beta: f64) -> Result<f64, InferenceError> {
        if u.is_empty() || u.len() != x.len() {
            return Err(InferenceError::Domain);
        }
        let sum_x: f64 = x.iter().sum();
        if !(sum_x > 0.0 && sum_x.is_finite()) {
            return Err(InferenceError::IllDefinedWeight);
        }

        let mut sum_d = 0.0;
        let mut sum_ratio = 0.0;
        for (&ui, &xi) in u.iter().zip(x) {
            let d = self.inversion.derivative_wrt_alpha_at(ui, alpha, xi)?;
            if !(xi > 0.0) || !d.is_finite() {
                return Err(InferenceError::IllDefinedWeight);
            }
            sum_d += d;
            sum_ratio += d / xi;
        }
        let j = sum_ratio / u.len() as f64 - sum_d / sum_x;

        let settings = self.inversion.settings();
        let magnitude = if settings.invert_weight { 1.0 / j.abs() } else { j.abs() };
        let w = magnitude * settings.prior.evaluate(alpha, beta);
        if w.is_finite() {
            Ok(w)
        } else {
            Err(InferenceError::IllDefinedWeight)
        }
    }

    /// [`try_weight`](Self::try_weight) with every failure mapped to 0.
    pub fn weight(&self, u: &[f64], alpha: f64, beta: f64) -> f64 {
        self.try_weight(u, alpha, beta).unwrap_or_else(|e| {
            tracing::trace!("weight mapped to zero: {}", e);
            0.0
        })
    }

    /// Prior multiplier under the configured policy.
    pub fn prior(&self, alpha: f64, beta: f64) -> f64 {
        self.inversion.settings().prior.evaluate(alpha, beta)
    }

    /// Statistic under the configured policy.
    pub fn phi(&self, x: &[f64]) -> f64 {
        self.inversion.settings().phi.evaluate(x)
    }
}
