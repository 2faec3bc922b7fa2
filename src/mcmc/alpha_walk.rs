use rand::Rng;

use super::{
    accept_weight_ratio, observe_sample, MarkovKernel, Observation, ShapeSearch, Step, WeightedState,
    WeightedTarget,
};
use crate::config::InferenceSettings;
use crate::error::SetupError;
use crate::stats::SufficientStatistics;

/// Random-walk Metropolis over the uniform-space representation of the
/// shape parameter.
///
/// Each coordinate of `u` moves by a uniform offset in `[−step, step]`,
/// reflected back into [0, 1), so the proposal is symmetric and the
/// acceptance ratio is `w'/w`. The shape is fitted with the bounded
/// minimizer; a proposal that cannot be fitted has weight 0 and still
/// consumes its acceptance draw.
#[derive(Debug, Clone, Copy)]
pub struct AlphaWalkSampler<'a> {
    target: WeightedTarget<'a>,
    step: f64,
}

impl<'a> AlphaWalkSampler<'a> {
    /// Default half-width of the random-walk offset.
    pub const DEFAULT_STEP: f64 = 0.1;

    /// Build a sampler for data summarized by `stats`.
    pub fn new(settings: &'a InferenceSettings, stats: SufficientStatistics) -> Result<Self, SetupError> {
        Self::with_step(settings, stats, Self::DEFAULT_STEP)
    }

    /// Build a sampler with a custom random-walk half-width in (0, 1).
    pub fn with_step(
        settings: &'a InferenceSettings,
        stats: SufficientStatistics,
        step: f64,
    ) -> Result<Self, SetupError> {
        settings.validate()?;
        if !(step > 0.0 && step < 1.0) {
            return Err(SetupError::InvalidSetting("random-walk step must lie in (0, 1)"));
        }
        Ok(Self { target: WeightedTarget::new(settings, stats, ShapeSearch::Bounded), step })
    }

    /// Draw a valid starting state.
    pub fn initial_state<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<WeightedState, SetupError> {
        self.target.initial_state(rng)
    }

    fn propose<R: Rng + ?Sized>(&self, u: &[f64], rng: &mut R) -> Vec<f64> {
        u.iter()
            .map(|&ui| reflect(ui + self.step * (2.0 * rng.random::<f64>() - 1.0)))
            .collect()
    }
}

/// Fold `v ∈ (−1, 2)` back into [0, 1).
fn reflect(v: f64) -> f64 {
    let w = if v < 0.0 {
        -v
    } else if v >= 1.0 {
        2.0 - v
    } else {
        v
    };
    if w >= 1.0 {
        1.0 - f64::EPSILON
    } else {
        w
    }
}

impl MarkovKernel for AlphaWalkSampler<'_> {
    type State = WeightedState;

    fn step<R: Rng + ?Sized>(&mut self, state: &mut WeightedState, rng: &mut R) -> Step {
        let u = self.propose(&state.u, rng);
        match self.target.state(u) {
            Ok(p) => {
                if accept_weight_ratio(p.weight, state.weight, rng) {
                    *state = p;
                    Step::Accepted
                } else {
                    Step::Rejected
                }
            }
            Err(e) => {
                // Weight zero: the draw is still consumed but cannot win.
                tracing::trace!("alpha-walk proposal not fitted: {}", e);
                let _: f64 = rng.random();
                Step::Rejected
            }
        }
    }

    fn observe(&self, state: &WeightedState) -> Observation {
        observe_sample(self.target.phi(&state.x), &state.x)
    }
}
