use crate::traits::{cst, FloatScalar};

use super::{MinimizeResult, OptimError};

/// Settings for Nelder–Mead simplex minimization.
#[derive(Debug, Clone, Copy)]
pub struct NelderMeadSettings<T> {
    /// Convergence tolerance on the simplex diameter (max-norm), relative
    /// to `1 + max|xᵢ|` at the best vertex.
    pub x_tol: T,
    /// Convergence tolerance on the spread of function values, relative to
    /// `1 + |f|` at the best vertex.
    pub f_tol: T,
    /// Maximum number of iterations.
    pub max_iter: usize,
    /// Relative perturbation used to build the initial simplex.
    pub initial_scale: T,
}

impl Default for NelderMeadSettings<f64> {
    fn default() -> Self {
        Self {
            x_tol: 1e-10,
            f_tol: 1e-12,
            max_iter: 2000,
            initial_scale: 0.05,
        }
    }
}

impl Default for NelderMeadSettings<f32> {
    fn default() -> Self {
        Self {
            x_tol: 1e-5,
            f_tol: 1e-6,
            max_iter: 2000,
            initial_scale: 0.05,
        }
    }
}

/// Minimize `f: R^N → R` with the Nelder–Mead downhill simplex.
///
/// Uses the standard coefficients (reflection 1, expansion 2, contraction ½,
/// shrink ½). The initial simplex perturbs each coordinate of `x0` by
/// `initial_scale` relative (or 0.00025 absolute for zero coordinates).
/// `f` may return `+∞` to mark infeasible points; such vertices are simply
/// never preferred.
///
/// # Errors
///
/// Returns [`OptimError::NotFinite`] if `f(x0)` is not finite and
/// [`OptimError::MaxIterations`] if the simplex does not contract in time.
///
/// # Example
///
/// ```
/// use gammafid::optim::{nelder_mead, NelderMeadSettings};
///
/// let r = nelder_mead(
///     |x: &[f64; 2]| (x[0] - 1.0).powi(2) + 10.0 * (x[1] + 2.0).powi(2),
///     &[0.0, 0.0],
///     &NelderMeadSettings::default(),
/// )
/// .unwrap();
/// assert!((r.x[0] - 1.0).abs() < 1e-5);
/// assert!((r.x[1] + 2.0).abs() < 1e-5);
/// ```
pub fn nelder_mead<T: FloatScalar, const N: usize>(
    mut f: impl FnMut(&[T; N]) -> T,
    x0: &[T; N],
    settings: &NelderMeadSettings<T>,
) -> Result<MinimizeResult<T, N>, OptimError> {
    let zero = T::zero();
    let one = T::one();
    let two = cst::<T>(2.0);
    let half = cst::<T>(0.5);
    let zero_delta = cst::<T>(0.00025);

    // NaN would break the vertex ordering; treat it as infeasible.
    let mut f = |x: &[T; N]| {
        let v = f(x);
        if v.is_nan() { T::infinity() } else { v }
    };

    let f0 = f(x0);
    if !f0.is_finite() {
        return Err(OptimError::NotFinite);
    }

    // N + 1 vertices; N is small (the Gamma MLE uses 2) so a Vec is fine.
    let mut simplex: Vec<([T; N], T)> = Vec::with_capacity(N + 1);
    simplex.push((*x0, f0));
    for i in 0..N {
        let mut v = *x0;
        v[i] = if v[i] != zero { v[i] * (one + settings.initial_scale) } else { zero_delta };
        let fv = f(&v);
        simplex.push((v, fv));
    }
    let mut f_evals = N + 1;

    let order = |s: &mut Vec<([T; N], T)>| {
        s.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(core::cmp::Ordering::Equal));
    };

    for iter in 0..settings.max_iter {
        order(&mut simplex);

        let best = simplex[0];
        let worst = simplex[N];
        let diameter = simplex[1..]
            .iter()
            .flat_map(|(v, _)| v.iter().zip(best.0.iter()).map(|(a, b)| (*a - *b).abs()))
            .fold(zero, |m, d| m.max(d));
        let spread = simplex[1..].iter().fold(zero, |m, (_, fv)| m.max((*fv - best.1).abs()));
        let x_scale = best.0.iter().fold(one, |m, v| m.max(one + v.abs()));
        if diameter <= settings.x_tol * x_scale && spread <= settings.f_tol * (one + best.1.abs()) {
            return Ok(MinimizeResult { x: best.0, fx: best.1, iterations: iter, f_evals });
        }

        // Centroid of all but the worst vertex.
        let mut centroid = [zero; N];
        for (v, _) in &simplex[..N] {
            for j in 0..N {
                centroid[j] = centroid[j] + v[j];
            }
        }
        let n = cst::<T>(N as f64);
        for c in centroid.iter_mut() {
            *c = *c / n;
        }

        let along = |t: T| {
            let mut p = centroid;
            for j in 0..N {
                p[j] = centroid[j] + t * (worst.0[j] - centroid[j]);
            }
            p
        };

        let reflected = along(-one);
        let fr = f(&reflected);
        f_evals += 1;

        if fr < best.1 {
            let expanded = along(-two);
            let fe = f(&expanded);
            f_evals += 1;
            simplex[N] = if fe < fr { (expanded, fe) } else { (reflected, fr) };
            continue;
        }
        if fr < simplex[N - 1].1 {
            simplex[N] = (reflected, fr);
            continue;
        }

        // Contract outside when the reflection improved on the worst point,
        // inside otherwise.
        let (contracted, fc) = if fr < worst.1 {
            let c = along(-half);
            let fc = f(&c);
            (c, fc)
        } else {
            let c = along(half);
            let fc = f(&c);
            (c, fc)
        };
        f_evals += 1;
        if fc < worst.1.min(fr) {
            simplex[N] = (contracted, fc);
            continue;
        }

        // Shrink toward the best vertex.
        for k in 1..=N {
            let mut v = simplex[k].0;
            for j in 0..N {
                v[j] = best.0[j] + half * (v[j] - best.0[j]);
            }
            let fv = f(&v);
            simplex[k] = (v, fv);
        }
        f_evals += N;
    }

    Err(OptimError::MaxIterations { iterations: settings.max_iter })
}
