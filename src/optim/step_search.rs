use crate::traits::FloatScalar;

use super::{OptimError, RootResult};

/// Whether the searched function increases or decreases with `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Monotonicity {
    /// f grows with x.
    Increasing,
    /// f shrinks with x.
    Decreasing,
}

/// Domain handling for [`step_search`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchBounds<T> {
    /// Steps below the floor are clamped to it and the direction is forced
    /// upward. There is no upper limit and no bounds failure.
    Floor(T),
    /// Steps past either end are clamped to it once; if the search then
    /// still has to move outward, it fails with [`OptimError::OutOfBounds`].
    Interval {
        /// Lower end.
        lower: T,
        /// Upper end.
        upper: T,
    },
}

/// Settings for [`step_search`].
#[derive(Debug, Clone, Copy)]
pub struct StepSearchSettings<T> {
    /// Convergence tolerance on `|f(x) − target|`.
    pub tolerance: T,
    /// Initial step length.
    pub initial_step: T,
    /// Maximum number of steps.
    pub max_iter: usize,
}

impl Default for StepSearchSettings<f64> {
    fn default() -> Self {
        Self {
            tolerance: 1e-5,
            initial_step: 1.0,
            max_iter: 1000,
        }
    }
}

impl Default for StepSearchSettings<f32> {
    fn default() -> Self {
        Self {
            tolerance: 1e-4,
            initial_step: 1.0,
            max_iter: 1000,
        }
    }
}

/// Adaptive directional step search for `f(x) = target`.
///
/// Walks from `x0` toward the target in steps of `initial_step`. Whenever
/// `f(x) − target` changes sign the walk has overshot: the step is halved
/// and the direction reversed. Stops once `|f(x) − target| ≤ tolerance`.
///
/// # Arguments
///
/// * `f` — monotone function, evaluated once per step
/// * `target` — value sought
/// * `x0` — starting point (clamped into the bounds)
/// * `monotonicity` — fixes the initial direction
/// * `bounds` — floor or hard interval, see [`SearchBounds`]
/// * `settings` — tolerance, initial step, iteration cap
///
/// # Errors
///
/// Returns [`OptimError::OutOfBounds`] when an interval search is pinned on a
/// bound that the target lies beyond, [`OptimError::NotFinite`] when `f`
/// returns NaN or infinity, and [`OptimError::MaxIterations`] when the cap is
/// reached.
///
/// # Example
///
/// ```
/// use gammafid::optim::{step_search, Monotonicity, SearchBounds, StepSearchSettings};
///
/// // x² = 2 on x ≥ 0
/// let r = step_search(
///     |x: f64| x * x,
///     2.0,
///     1.0,
///     Monotonicity::Increasing,
///     SearchBounds::Floor(0.0),
///     &StepSearchSettings::default(),
/// )
/// .unwrap();
/// assert!((r.fx - 2.0).abs() <= 1e-5);
/// ```
pub fn step_search<T: FloatScalar>(
    mut f: impl FnMut(T) -> T,
    target: T,
    x0: T,
    monotonicity: Monotonicity,
    bounds: SearchBounds<T>,
    settings: &StepSearchSettings<T>,
) -> Result<RootResult<T>, OptimError> {
    let one = T::one();
    let half = one / (one + one);

    let mut x = match bounds {
        SearchBounds::Floor(lower) => x0.max(lower),
        SearchBounds::Interval { lower, upper } => x0.max(lower).min(upper),
    };
    let mut fx = f(x);
    let mut evals = 1usize;
    if !fx.is_finite() {
        return Err(OptimError::NotFinite);
    }
    if (fx - target).abs() <= settings.tolerance {
        return Ok(RootResult { x, fx, iterations: 0, evals });
    }

    let mut below = fx < target;
    let mut direction = match (monotonicity, below) {
        (Monotonicity::Increasing, true) | (Monotonicity::Decreasing, false) => one,
        _ => -one,
    };
    let mut step = settings.initial_step;

    for iter in 1..=settings.max_iter {
        let mut next = x + direction * step;
        let mut floored = false;
        match bounds {
            SearchBounds::Floor(lower) => {
                if next < lower {
                    next = lower;
                    direction = one;
                    floored = true;
                }
            }
            SearchBounds::Interval { lower, upper } => {
                if next < lower {
                    if x == lower {
                        return Err(OptimError::OutOfBounds);
                    }
                    next = lower;
                } else if next > upper {
                    if x == upper {
                        return Err(OptimError::OutOfBounds);
                    }
                    next = upper;
                }
            }
        }

        x = next;
        fx = f(x);
        evals += 1;
        if !fx.is_finite() {
            return Err(OptimError::NotFinite);
        }
        if (fx - target).abs() <= settings.tolerance {
            return Ok(RootResult { x, fx, iterations: iter, evals });
        }

        // Overshoot: the target now lies behind us. On the floor the only
        // way out is up.
        let now_below = fx < target;
        if now_below != below {
            step = step * half;
            if !floored {
                direction = -direction;
            }
        }
        below = now_below;
    }

    Err(OptimError::MaxIterations { iterations: settings.max_iter })
}
