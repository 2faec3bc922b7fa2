//! Monte Carlo samplers behind one Markov-kernel abstraction.
//!
//! Every sampler implements [`MarkovKernel`]: a single `step` that proposes,
//! decides and, on acceptance, replaces the chain state in one assignment.
//! [`run_chain`] drives any kernel, tallies the statistic under the kernel's
//! [`TallyPolicy`] and records a [`ChainTrace`] for external plotting.
//!
//! | Sampler | State | Tally |
//! |---------|-------|-------|
//! | [`IndependenceSampler`] | uniform sample + fit + weight | every iteration |
//! | [`AlphaWalkSampler`] | uniform sample + fit + weight | every iteration |
//! | [`GibbsSampler`] | data vector, sum and product fixed | every iteration |
//! | [`RejectionSampler`] | last accepted draw | accepted only |
//!
//! # Example
//!
//! ```
//! use gammafid::config::{InferenceSettings, PhiPolicy};
//! use gammafid::mcmc::{run_chain, GibbsSampler};
//!
//! let settings = InferenceSettings { phi: PhiPolicy::RatioProduct, ..Default::default() };
//! let mut rng = settings.rng();
//! let mut kernel = GibbsSampler::new(settings.phi);
//! let mut state = vec![4.399, 1.307, 0.085];
//! let summary = run_chain(&mut kernel, &mut state, 500, &mut rng);
//! assert_eq!(summary.trace.phi.len(), 500);
//! ```

mod alpha_walk;
mod gibbs;
mod independence;
mod rejection;

#[cfg(test)]
mod tests;

pub use alpha_walk::AlphaWalkSampler;
pub use gibbs::GibbsSampler;
pub use independence::IndependenceSampler;
pub use rejection::{RejectionSampler, TripleSource};

use rand::Rng;

use crate::config::InferenceSettings;
use crate::error::{InferenceError, SetupError};
use crate::shape::{ShapeEstimate, ShapeEstimator};
use crate::stats::SufficientStatistics;
use crate::weight::ImportanceWeighting;

/// Tries before initialization of a weighted chain gives up.
pub(crate) const MAX_INIT_ATTEMPTS: usize = 1000;

/// Outcome of one kernel step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Proposal accepted; the state was replaced.
    Accepted,
    /// Proposal rejected by the acceptance draw; the state is unchanged.
    Rejected,
    /// Proposal discarded before any acceptance draw; the state is
    /// unchanged.
    Invalid(InferenceError),
}

/// Which iterations contribute to the estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TallyPolicy {
    /// Every iteration tallies the current state.
    EveryIteration,
    /// Only accepted draws are tallied.
    AcceptedOnly,
}

/// What the driver records about a state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// The statistic φ of the reconstructed sample.
    pub phi: f64,
    /// First coordinate of the reconstructed sample.
    pub first: f64,
}

/// A Markov transition on some state type.
pub trait MarkovKernel {
    /// Chain state, owned by the caller and replaced on acceptance.
    type State;

    /// Propose, decide and update `state` in place.
    fn step<R: Rng + ?Sized>(&mut self, state: &mut Self::State, rng: &mut R) -> Step;

    /// Statistic and first coordinate of `state`.
    fn observe(&self, state: &Self::State) -> Observation;

    /// Tally policy of this sampler.
    fn tally(&self) -> TallyPolicy {
        TallyPolicy::EveryIteration
    }
}

/// Per-tally traces, suitable for plotting convergence.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChainTrace {
    /// φ at each tally.
    pub phi: Vec<f64>,
    /// First coordinate at each tally.
    pub first: Vec<f64>,
    /// Running mean of φ.
    pub running_mean: Vec<f64>,
    /// Running (population) variance of φ.
    pub running_variance: Vec<f64>,
    /// Whether the step that produced each tally was an acceptance.
    pub accepted: Vec<bool>,
}

/// Result of [`run_chain`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChainSummary {
    /// Steps run.
    pub iterations: usize,
    /// Steps accepted.
    pub accepted: usize,
    /// Steps rejected by the acceptance draw.
    pub rejected: usize,
    /// Steps whose proposal was discarded before any draw.
    pub invalid: usize,
    /// Mean of the tallied φ values, `None` when nothing was tallied.
    pub estimate: Option<f64>,
    /// Traces over the tallies.
    pub trace: ChainTrace,
}

impl ChainSummary {
    /// Accepted over total steps.
    pub fn acceptance_rate(&self) -> f64 {
        if self.iterations == 0 {
            0.0
        } else {
            self.accepted as f64 / self.iterations as f64
        }
    }
}

/// Run `iterations` steps of `kernel` from `state`.
///
/// Running moments use Welford's update, so the trace stays stable over
/// long chains. Non-finite φ values are traced but skipped by the moments.
pub fn run_chain<K, R>(kernel: &mut K, state: &mut K::State, iterations: usize, rng: &mut R) -> ChainSummary
where
    K: MarkovKernel,
    R: Rng + ?Sized,
{
    let policy = kernel.tally();
    let mut summary = ChainSummary {
        iterations,
        accepted: 0,
        rejected: 0,
        invalid: 0,
        estimate: None,
        trace: ChainTrace::default(),
    };
    let mut count = 0usize;
    let mut mean = 0.0;
    let mut m2 = 0.0;

    for _ in 0..iterations {
        let step = kernel.step(state, rng);
        match step {
            Step::Accepted => summary.accepted += 1,
            Step::Rejected => summary.rejected += 1,
            Step::Invalid(e) => {
                summary.invalid += 1;
                tracing::trace!("proposal discarded: {}", e);
            }
        }
        let accepted = step == Step::Accepted;
        if policy == TallyPolicy::AcceptedOnly && !accepted {
            continue;
        }

        let obs = kernel.observe(state);
        if obs.phi.is_finite() {
            count += 1;
            let delta = obs.phi - mean;
            mean += delta / count as f64;
            m2 += delta * (obs.phi - mean);
        }
        let trace = &mut summary.trace;
        trace.phi.push(obs.phi);
        trace.first.push(obs.first);
        trace.running_mean.push(if count > 0 { mean } else { f64::NAN });
        trace.running_variance.push(if count > 0 { m2 / count as f64 } else { f64::NAN });
        trace.accepted.push(accepted);
    }

    if count > 0 {
        summary.estimate = Some(mean);
    }
    tracing::debug!(
        "chain finished: {} iterations, acceptance rate {:.4}, {} invalid proposals",
        iterations,
        summary.acceptance_rate(),
        summary.invalid
    );
    summary
}

/// State of the weighted uniform-space chains.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeightedState {
    /// Uniform-space sample.
    pub u: Vec<f64>,
    /// Shape and scale matched to `u`.
    pub fit: ShapeEstimate,
    /// Importance weight of `u`.
    pub weight: f64,
    /// Reconstructed sample `β·F⁻¹(uᵢ; α)`.
    pub x: Vec<f64>,
}

/// Metropolis–Hastings acceptance for weight ratio `proposed / current`.
///
/// Consumes exactly one uniform draw. A zero current weight accepts any
/// proposal.
pub(crate) fn accept_weight_ratio<R: Rng + ?Sized>(proposed: f64, current: f64, rng: &mut R) -> bool {
    let draw: f64 = rng.random();
    if !(current > 0.0) {
        return true;
    }
    let ratio = proposed / current;
    draw < ratio.min(1.0)
}

/// Shape search used to fit a proposed uniform sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ShapeSearch {
    Step,
    Bounded,
}

/// Fits and weights uniform samples against observed statistics.
#[derive(Debug, Clone, Copy)]
pub(crate) struct WeightedTarget<'a> {
    estimator: ShapeEstimator<'a>,
    weighting: ImportanceWeighting<'a>,
    stats: SufficientStatistics,
    search: ShapeSearch,
}

impl<'a> WeightedTarget<'a> {
    pub(crate) fn new(settings: &'a InferenceSettings, stats: SufficientStatistics, search: ShapeSearch) -> Self {
        Self {
            estimator: ShapeEstimator::new(settings),
            weighting: ImportanceWeighting::new(settings),
            stats,
            search,
        }
    }

    pub(crate) fn n(&self) -> usize {
        self.stats.n
    }

    /// Fit `u`, reconstruct the sample and weight it. A weight that cannot
    /// be formed is 0; a failed fit is an error.
    pub(crate) fn state(&self, u: Vec<f64>) -> Result<WeightedState, InferenceError> {
        let fit = match self.search {
            ShapeSearch::Step => self.estimator.fit(&self.stats, &u)?,
            ShapeSearch::Bounded => self.estimator.fit_bounded(&self.stats, &u)?,
        };
        let unit = self.estimator.inversion().inverse_cdf_all(&u, fit.alpha)?;
        let weight = self
            .weighting
            .try_weight_at(&u, &unit, fit.alpha, fit.beta)
            .unwrap_or_else(|e| {
                tracing::trace!("weight mapped to zero: {}", e);
                0.0
            });
        let x = unit.iter().map(|v| v * fit.beta).collect();
        Ok(WeightedState { u, fit, weight, x })
    }

    /// Draw uniform samples until one fits with a positive weight.
    pub(crate) fn initial_state<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<WeightedState, SetupError> {
        let mut last = InferenceError::EstimationFailure;
        for attempt in 1..=MAX_INIT_ATTEMPTS {
            let u = uniform_sample(self.n(), rng);
            match self.state(u) {
                Ok(s) if s.weight > 0.0 => return Ok(s),
                Ok(_) => last = InferenceError::IllDefinedWeight,
                Err(e) => last = e,
            }
            if attempt == MAX_INIT_ATTEMPTS / 10 {
                tracing::warn!(
                    "no valid starting sample after {} attempts, last failure: {}",
                    attempt,
                    last
                );
            }
        }
        Err(SetupError::Initialization(last))
    }

    pub(crate) fn phi(&self, x: &[f64]) -> f64 {
        self.weighting.phi(x)
    }
}

/// `n` independent uniforms on [0, 1).
pub(crate) fn uniform_sample<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<f64> {
    (0..n).map(|_| rng.random::<f64>()).collect()
}

pub(crate) fn observe_sample(phi: f64, x: &[f64]) -> Observation {
    Observation { phi, first: x.first().copied().unwrap_or(f64::NAN) }
}
