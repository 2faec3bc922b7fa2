use rand::Rng;

use super::{observe_sample, MarkovKernel, Observation, Step};
use crate::config::PhiPolicy;
use crate::error::InferenceError;

/// Gibbs sampler on a positive vector with the sum and product of every
/// updated triple held fixed.
///
/// A step picks three distinct coordinates with sum `S` and product `P`,
/// proposes `x₁' = U·S` and solves
///
/// ```text
/// t² − (S − x₁')·t + P/x₁' = 0
/// ```
///
/// for the other two. Real positive roots exist iff the cubic
/// `x₁'³ − 2S·x₁'² + S²·x₁' − 4P` is positive. The triple is then accepted
/// with probability `min(1, g(x₁')/g(x₁))` where
/// `g(x) = 1/(x·√((S − x)² − 4P/x))`.
#[derive(Debug, Clone, Copy)]
pub struct GibbsSampler {
    phi: PhiPolicy,
}

/// A proposed triple update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TripleProposal {
    pub(crate) x1: f64,
    pub(crate) x2: f64,
    pub(crate) x3: f64,
}

/// `(S − x)² − 4P/x`, the discriminant of the remaining pair.
fn discriminant(x: f64, sum: f64, product: f64) -> f64 {
    (sum - x).powi(2) - 4.0 * product / x
}

/// Jacobian-adjusted conditional density of the first coordinate.
fn density(x: f64, sum: f64, product: f64) -> f64 {
    1.0 / (x * discriminant(x, sum, product).sqrt())
}

/// Complete `x1` to a triple with the given sum and product.
pub(crate) fn complete_triple(x1: f64, sum: f64, product: f64) -> Result<TripleProposal, InferenceError> {
    let cubic = x1.powi(3) - 2.0 * sum * x1.powi(2) + sum * sum * x1 - 4.0 * product;
    if !(x1 > 0.0 && cubic > 0.0) {
        return Err(InferenceError::InvalidGibbsProposal);
    }
    let rest = sum - x1;
    let root = discriminant(x1, sum, product).sqrt();
    let x2 = 0.5 * (rest + root);
    // Vieta for the smaller root avoids cancellation in rest − root.
    let x3 = product / (x1 * x2);
    if !(x2.is_finite() && x3.is_finite() && x2 > 0.0 && x3 > 0.0) {
        return Err(InferenceError::InvalidGibbsProposal);
    }
    Ok(TripleProposal { x1, x2, x3 })
}

/// Three distinct indices below `n`, in random order.
fn distinct_triple<R: Rng + ?Sized>(n: usize, rng: &mut R) -> [usize; 3] {
    let i = rng.random_range(0..n);
    let mut j = rng.random_range(0..n - 1);
    if j >= i {
        j += 1;
    }
    let (lo, hi) = if i < j { (i, j) } else { (j, i) };
    let mut k = rng.random_range(0..n - 2);
    if k >= lo {
        k += 1;
    }
    if k >= hi {
        k += 1;
    }
    [i, j, k]
}

impl GibbsSampler {
    /// Sampler tallying `phi`.
    pub fn new(phi: PhiPolicy) -> Self {
        Self { phi }
    }
}

impl MarkovKernel for GibbsSampler {
    type State = Vec<f64>;

    /// States with fewer than three coordinates never move.
    fn step<R: Rng + ?Sized>(&mut self, state: &mut Vec<f64>, rng: &mut R) -> Step {
        if state.len() < 3 {
            return Step::Invalid(InferenceError::Domain);
        }
        let [i, j, k] = distinct_triple(state.len(), rng);
        let (a, b, c) = (state[i], state[j], state[k]);
        let sum = a + b + c;
        let product = a * b * c;

        let x1 = rng.random::<f64>() * sum;
        let proposal = match complete_triple(x1, sum, product) {
            Ok(p) => p,
            Err(e) => return Step::Invalid(e),
        };

        let current = density(a, sum, product);
        let proposed = density(proposal.x1, sum, product);
        let draw: f64 = rng.random();
        let accept = !current.is_finite() || draw < (proposed / current).min(1.0);
        if accept {
            state[i] = proposal.x1;
            state[j] = proposal.x2;
            state[k] = proposal.x3;
            Step::Accepted
        } else {
            Step::Rejected
        }
    }

    fn observe(&self, state: &Vec<f64>) -> Observation {
        observe_sample(self.phi.evaluate(state), state)
    }
}
