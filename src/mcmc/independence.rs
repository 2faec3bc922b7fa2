use rand::Rng;

use super::{
    accept_weight_ratio, observe_sample, uniform_sample, MarkovKernel, Observation, ShapeSearch, Step,
    WeightedState, WeightedTarget,
};
use crate::config::InferenceSettings;
use crate::error::{InferenceError, SetupError};
use crate::stats::SufficientStatistics;

/// Independence Metropolis–Hastings over uniform samples.
///
/// Each step draws a fresh uniform sample, fits (α, β) to the observed
/// statistics with the step-search shape estimator and accepts with
/// probability `min(1, w'/w)`. A proposal whose shape cannot be fitted is
/// discarded without an acceptance draw.
///
/// # Example
///
/// ```
/// use gammafid::config::InferenceSettings;
/// use gammafid::mcmc::{run_chain, IndependenceSampler};
/// use gammafid::stats::SufficientStatistics;
///
/// let settings = InferenceSettings::default();
/// let stats = SufficientStatistics::from_data(&[2.0, 3.0, 5.0]).unwrap();
/// let mut rng = settings.rng();
/// let mut kernel = IndependenceSampler::new(&settings, stats).unwrap();
/// let mut state = kernel.initial_state(&mut rng).unwrap();
/// let summary = run_chain(&mut kernel, &mut state, 20, &mut rng);
/// assert_eq!(summary.iterations, 20);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct IndependenceSampler<'a> {
    target: WeightedTarget<'a>,
}

impl<'a> IndependenceSampler<'a> {
    /// Build a sampler for data summarized by `stats`.
    pub fn new(settings: &'a InferenceSettings, stats: SufficientStatistics) -> Result<Self, SetupError> {
        settings.validate()?;
        Ok(Self { target: WeightedTarget::new(settings, stats, ShapeSearch::Step) })
    }

    /// Chain state for a given uniform sample.
    pub fn state_from(&self, u: Vec<f64>) -> Result<WeightedState, InferenceError> {
        if u.len() != self.target.n() {
            return Err(InferenceError::Domain);
        }
        self.target.state(u)
    }

    /// Draw a valid starting state.
    pub fn initial_state<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<WeightedState, SetupError> {
        self.target.initial_state(rng)
    }
}

impl MarkovKernel for IndependenceSampler<'_> {
    type State = WeightedState;

    fn step<R: Rng + ?Sized>(&mut self, state: &mut WeightedState, rng: &mut R) -> Step {
        let u = uniform_sample(self.target.n(), rng);
        let proposal = match self.target.state(u) {
            Ok(p) => p,
            Err(e) => return Step::Invalid(e),
        };
        if accept_weight_ratio(proposal.weight, state.weight, rng) {
            *state = proposal;
            Step::Accepted
        } else {
            Step::Rejected
        }
    }

    fn observe(&self, state: &WeightedState) -> Observation {
        observe_sample(self.target.phi(&state.x), &state.x)
    }
}
