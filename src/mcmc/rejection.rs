use rand::Rng;
use rand_distr::{Distribution, Gamma as GammaDistr};

use super::{observe_sample, uniform_sample, MarkovKernel, Observation, Step, TallyPolicy};
use crate::config::{InferenceSettings, PhiPolicy};
use crate::error::SetupError;
use crate::inversion::GammaInversion;
use crate::stats::SufficientStatistics;

/// Where the independent draws of the rejection sampler come from.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TripleSource {
    /// Gamma(shape, scale) variates from `rand_distr`.
    Direct {
        /// Shape.
        shape: f64,
        /// Scale.
        scale: f64,
    },
    /// Uniforms mapped through `β·F⁻¹(u; α)`.
    Inversion {
        /// Shape α.
        alpha: f64,
        /// Scale β.
        beta: f64,
    },
}

#[derive(Debug, Clone)]
enum Sampler {
    Direct(GammaDistr<f64>),
    Inversion { alpha: f64, beta: f64 },
}

/// Rejection sampler conditioning on the observed sum and product.
///
/// Each step draws an independent sample of the data's size and keeps it
/// only when both `|Σx − Σdata|` and `|∏x − ∏data|` are within
/// `tolerance`. Only kept draws are tallied, so the chain estimate is the
/// average of φ over accepted draws.
#[derive(Debug, Clone)]
pub struct RejectionSampler<'a> {
    inversion: GammaInversion<'a>,
    sampler: Sampler,
    stats: SufficientStatistics,
    tolerance: f64,
    phi: PhiPolicy,
}

impl<'a> RejectionSampler<'a> {
    /// Default match tolerance on the sum and the product.
    pub const DEFAULT_TOLERANCE: f64 = 0.02;

    /// Build a sampler with the default tolerance.
    pub fn new(
        settings: &'a InferenceSettings,
        stats: SufficientStatistics,
        source: TripleSource,
    ) -> Result<Self, SetupError> {
        Self::with_tolerance(settings, stats, source, Self::DEFAULT_TOLERANCE)
    }

    /// Build a sampler with a custom positive match tolerance.
    pub fn with_tolerance(
        settings: &'a InferenceSettings,
        stats: SufficientStatistics,
        source: TripleSource,
        tolerance: f64,
    ) -> Result<Self, SetupError> {
        settings.validate()?;
        if !(tolerance > 0.0) {
            return Err(SetupError::InvalidSetting("rejection tolerance must be positive"));
        }
        let sampler = match source {
            TripleSource::Direct { shape, scale } => Sampler::Direct(
                GammaDistr::new(shape, scale)
                    .map_err(|_| SetupError::InvalidSetting("gamma source parameters out of range"))?,
            ),
            TripleSource::Inversion { alpha, beta } => {
                if !(alpha > 0.0 && beta > 0.0 && alpha.is_finite() && beta.is_finite()) {
                    return Err(SetupError::InvalidSetting("gamma source parameters out of range"));
                }
                Sampler::Inversion { alpha, beta }
            }
        };
        Ok(Self {
            inversion: GammaInversion::new(settings),
            sampler,
            stats,
            tolerance,
            phi: settings.phi,
        })
    }

    /// Whether `x` matches the observed sum and product.
    pub fn matches(&self, x: &[f64]) -> bool {
        let sum: f64 = x.iter().sum();
        let product: f64 = x.iter().product();
        (sum - self.stats.sum).abs() < self.tolerance && (product - self.stats.product).abs() < self.tolerance
    }
}

impl MarkovKernel for RejectionSampler<'_> {
    type State = Vec<f64>;

    fn step<R: Rng + ?Sized>(&mut self, state: &mut Vec<f64>, rng: &mut R) -> Step {
        let n = self.stats.n;
        let draw = match &self.sampler {
            Sampler::Direct(g) => (0..n).map(|_| g.sample(rng)).collect::<Vec<f64>>(),
            Sampler::Inversion { alpha, beta } => {
                let u = uniform_sample(n, rng);
                match self.inversion.inverse_cdf_all(&u, *alpha) {
                    Ok(x) => x.into_iter().map(|v| v * beta).collect(),
                    Err(e) => return Step::Invalid(e),
                }
            }
        };
        if self.matches(&draw) {
            *state = draw;
            Step::Accepted
        } else {
            Step::Rejected
        }
    }

    fn observe(&self, state: &Vec<f64>) -> Observation {
        observe_sample(self.phi.evaluate(state), state)
    }

    fn tally(&self) -> TallyPolicy {
        TallyPolicy::AcceptedOnly
    }
}
