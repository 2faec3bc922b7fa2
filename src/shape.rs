//! Shape-parameter estimation from a uniform-space sample.
//!
//! For a fixed uniform sample `u`, the map `α ↦ tau2(u, α)` is increasing:
//! small shapes spread the quantiles out (low geometric over arithmetic
//! mean) and large shapes concentrate them (ratio toward 1). The estimator
//! inverts that map against an observed `s2`, then recovers the scale from
//! the observed mean.

use core::cell::Cell;

use crate::error::InferenceError;
use crate::inversion::GammaInversion;
use crate::optim::{minimize_bounded, step_search, Monotonicity, SearchBounds};
use crate::stats::{tau2_of, SufficientStatistics};

/// Shape and scale matched to a uniform sample.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShapeEstimate {
    /// Shape α.
    pub alpha: f64,
    /// Scale β.
    pub beta: f64,
}

/// Matches the tau2 statistic of a uniform sample to an observed value.
///
/// # Example
///
/// ```
/// use gammafid::config::InferenceSettings;
/// use gammafid::shape::ShapeEstimator;
///
/// let settings = InferenceSettings::default();
/// let est = ShapeEstimator::new(&settings);
/// let u = [0.2, 0.5, 0.8];
/// let s2 = est.tau2(&u, 2.0).unwrap();
/// let alpha = est.find_alpha(s2, &u).unwrap();
/// assert!((est.tau2(&u, alpha).unwrap() - s2).abs() <= 1e-4);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ShapeEstimator<'a> {
    inversion: GammaInversion<'a>,
}

impl<'a> ShapeEstimator<'a> {
    /// Bind the estimator to a settings value.
    pub fn new(settings: &'a crate::config::InferenceSettings) -> Self {
        Self { inversion: GammaInversion::new(settings) }
    }

    /// The inversion engine underneath.
    pub fn inversion(&self) -> &GammaInversion<'a> {
        &self.inversion
    }

    /// `n·(∏xᵢ)^{1/n} / Σxᵢ` with `xᵢ = F⁻¹(uᵢ; α)`.
    pub fn tau2(&self, u: &[f64], alpha: f64) -> Result<f64, InferenceError> {
        let x = self.inversion.inverse_cdf_all(u, alpha)?;
        let t = tau2_of(&x);
        if t.is_finite() {
            Ok(t)
        } else {
            Err(InferenceError::Domain)
        }
    }

    /// Runs `search` over `α ↦ tau2(u, α)`, surfacing the first error the
    /// inner inversion raised in place of the search's own `NotFinite`.
    fn with_tau2<T>(
        &self,
        u: &[f64],
        search: impl FnOnce(&mut dyn FnMut(f64) -> f64) -> Result<T, crate::optim::OptimError>,
    ) -> Result<T, InferenceError> {
        let inner = Cell::new(None);
        let mut f = |alpha: f64| match self.tau2(u, alpha) {
            Ok(t) => t,
            Err(e) => {
                if inner.get().is_none() {
                    inner.set(Some(e));
                }
                f64::NAN
            }
        };
        search(&mut f).map_err(|e| inner.get().unwrap_or_else(|| e.into()))
    }

    /// Shape whose tau2 matches `s2`, by bounded step search.
    ///
    /// Starts at α = 1 with unit steps inside
    /// `[alpha_lower, alpha_upper]`.
    ///
    /// # Errors
    ///
    /// [`InferenceError::EstimationFailure`] when the search is pinned on a
    /// bound (no admissible shape reaches `s2`) and
    /// [`InferenceError::NonconvergentRootFind`] at the iteration cap.
    pub fn find_alpha(&self, s2: f64, u: &[f64]) -> Result<f64, InferenceError> {
        let settings = self.inversion.settings();
        let bounds = SearchBounds::Interval { lower: settings.alpha_lower, upper: settings.alpha_upper };
        let search = settings.shape_search();
        self.with_tau2(u, |f| step_search(f, s2, 1.0, Monotonicity::Increasing, bounds, &search))
            .map(|r| r.x)
    }

    /// Shape whose tau2 matches `s2`, by bounded minimization of
    /// `|s2 − tau2(u, α)|`.
    ///
    /// `s2` must lie between the tau2 values at the two bounds (in either
    /// order). tau2 is only piecewise smooth in α, since each quantile is
    /// solved to an absolute CDF tolerance, so Brent can stop on a small jump
    /// with a residual above `shape_tolerance`. The step-search estimate
    /// replaces it then, and Brent's point stands if that search fails.
    ///
    /// # Errors
    ///
    /// [`InferenceError::EstimationFailure`] when `s2` is outside the range
    /// spanned by the bounds; the minimizer's own error only if the step
    /// search fails as well.
    pub fn find_alpha_bounded(&self, s2: f64, u: &[f64]) -> Result<f64, InferenceError> {
        let settings = self.inversion.settings();
        let (lower, upper) = (settings.alpha_lower, settings.alpha_upper);
        let at_lower = self.tau2(u, lower)?;
        let at_upper = self.tau2(u, upper)?;
        if !(s2 >= at_lower.min(at_upper) && s2 <= at_lower.max(at_upper)) {
            return Err(InferenceError::EstimationFailure);
        }
        let minimizer = settings.minimizer;
        let brent = self.with_tau2(u, |f| minimize_bounded(|a| (s2 - f(a)).abs(), lower, upper, &minimizer));
        if let Ok(r) = brent {
            if r.fx <= settings.shape_tolerance {
                return Ok(r.x);
            }
        }
        match (self.find_alpha(s2, u), brent) {
            (Ok(alpha), _) => Ok(alpha),
            (Err(e), Ok(r)) => {
                tracing::trace!("step search fallback failed ({}), keeping residual {:e}", e, r.fx);
                Ok(r.x)
            }
            (Err(_), Err(e)) => Err(e),
        }
    }

    /// Scale `s1·n / Σxᵢ` that reproduces the observed mean.
    pub fn find_beta(&self, s1: f64, u: &[f64], alpha: f64) -> Result<f64, InferenceError> {
        let sum: f64 = self.inversion.inverse_cdf_all(u, alpha)?.iter().sum();
        let beta = s1 * u.len() as f64 / sum;
        if beta.is_finite() && beta > 0.0 {
            Ok(beta)
        } else {
            Err(InferenceError::Domain)
        }
    }

    /// [`find_alpha`](Self::find_alpha) then [`find_beta`](Self::find_beta)
    /// against observed statistics.
    pub fn fit(&self, stats: &SufficientStatistics, u: &[f64]) -> Result<ShapeEstimate, InferenceError> {
        let alpha = self.find_alpha(stats.s2(), u)?;
        let beta = self.find_beta(stats.s1(), u, alpha)?;
        Ok(ShapeEstimate { alpha, beta })
    }

    /// Like [`fit`](Self::fit) with the bounded-minimization shape search.
    pub fn fit_bounded(&self, stats: &SufficientStatistics, u: &[f64]) -> Result<ShapeEstimate, InferenceError> {
        let alpha = self.find_alpha_bounded(stats.s2(), u)?;
        let beta = self.find_beta(stats.s1(), u, alpha)?;
        Ok(ShapeEstimate { alpha, beta })
    }
}
