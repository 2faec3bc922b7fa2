use crate::traits::{cst, FloatScalar};

use super::{OptimError, ScalarMinimum};

/// Settings for [`minimize_bounded`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundedSettings<T> {
    /// Absolute tolerance on the minimizer.
    pub x_tol: T,
    /// Maximum number of function evaluations.
    pub max_evals: usize,
}

impl Default for BoundedSettings<f64> {
    fn default() -> Self {
        Self {
            x_tol: 1e-10,
            max_evals: 500,
        }
    }
}

impl Default for BoundedSettings<f32> {
    fn default() -> Self {
        Self {
            x_tol: 1e-5,
            max_evals: 500,
        }
    }
}

/// Brent's bounded scalar minimizer.
///
/// Minimizes `f` on `[a, b]` without derivatives, alternating parabolic
/// interpolation through the three best points with golden-section steps
/// whenever the parabola is unacceptable. `f` is never evaluated outside
/// the interval.
///
/// # Errors
///
/// Returns [`OptimError::BracketInvalid`] if `a ≥ b`,
/// [`OptimError::NotFinite`] if `f` returns NaN, and
/// [`OptimError::MaxIterations`] if `max_evals` runs out.
///
/// # Example
///
/// ```
/// use gammafid::optim::{minimize_bounded, BoundedSettings};
///
/// let r = minimize_bounded(|x: f64| (x - 2.0).abs(), 0.0, 10.0, &BoundedSettings::default()).unwrap();
/// assert!((r.x - 2.0).abs() < 1e-6);
/// ```
pub fn minimize_bounded<T: FloatScalar>(
    mut f: impl FnMut(T) -> T,
    a: T,
    b: T,
    settings: &BoundedSettings<T>,
) -> Result<ScalarMinimum<T>, OptimError> {
    if !(a < b) {
        return Err(OptimError::BracketInvalid);
    }
    let zero = T::zero();
    let one = T::one();
    let two = cst::<T>(2.0);
    let half = cst::<T>(0.5);
    let three = cst::<T>(3.0);
    let golden_ratio = half * (three - cst::<T>(5.0).sqrt());
    let sqrt_eps = T::epsilon().sqrt();
    let sign = |v: T| if v < zero { -one } else { one };

    let (mut a, mut b) = (a, b);

    // xf: best point, nfc: second best, fulc: previous second best.
    let mut fulc = a + golden_ratio * (b - a);
    let mut nfc = fulc;
    let mut xf = fulc;
    let mut rat = zero;
    let mut e = zero;

    let mut fx = f(xf);
    if fx.is_nan() {
        return Err(OptimError::NotFinite);
    }
    let mut evals = 1usize;
    let mut ffulc = fx;
    let mut fnfc = fx;

    let mut xm = half * (a + b);
    let mut tol1 = sqrt_eps * xf.abs() + settings.x_tol / three;
    let mut tol2 = two * tol1;

    while (xf - xm).abs() > tol2 - half * (b - a) {
        let mut golden = true;

        if e.abs() > tol1 {
            golden = false;
            let mut r = (xf - nfc) * (fx - ffulc);
            let mut q = (xf - fulc) * (fx - fnfc);
            let mut p = (xf - fulc) * q - (xf - nfc) * r;
            q = two * (q - r);
            if q > zero {
                p = -p;
            }
            q = q.abs();
            r = e;
            e = rat;

            if p.abs() < (half * q * r).abs() && p > q * (a - xf) && p < q * (b - xf) {
                rat = p / q;
                let u = xf + rat;
                // Never evaluate closer than tol2 to an end.
                if (u - a) < tol2 || (b - u) < tol2 {
                    rat = tol1 * sign(xm - xf);
                }
            } else {
                golden = true;
            }
        }

        if golden {
            e = if xf >= xm { a - xf } else { b - xf };
            rat = golden_ratio * e;
        }

        let u = xf + sign(rat) * rat.abs().max(tol1);
        let fu = f(u);
        evals += 1;
        if fu.is_nan() {
            return Err(OptimError::NotFinite);
        }

        if fu <= fx {
            if u >= xf {
                a = xf;
            } else {
                b = xf;
            }
            fulc = nfc;
            ffulc = fnfc;
            nfc = xf;
            fnfc = fx;
            xf = u;
            fx = fu;
        } else {
            if u < xf {
                a = u;
            } else {
                b = u;
            }
            if fu <= fnfc || nfc == xf {
                fulc = nfc;
                ffulc = fnfc;
                nfc = u;
                fnfc = fu;
            } else if fu <= ffulc || fulc == xf || fulc == nfc {
                fulc = u;
                ffulc = fu;
            }
        }

        xm = half * (a + b);
        tol1 = sqrt_eps * xf.abs() + settings.x_tol / three;
        tol2 = two * tol1;

        if evals >= settings.max_evals {
            return Err(OptimError::MaxIterations { iterations: evals });
        }
    }

    Ok(ScalarMinimum { x: xf, fx, evals })
}
