use super::*;

fn assert_near(a: f64, b: f64, tol: f64, msg: &str) {
    assert!(
        (a - b).abs() < tol,
        "{}: {} vs {} (diff {})",
        msg,
        a,
        b,
        (a - b).abs()
    );
}

// ═══════════════════════════════════════════════════════════════════
// Step search
// ═══════════════════════════════════════════════════════════════════

#[test]
fn step_search_sqrt2() {
    let s = StepSearchSettings { tolerance: 1e-10, ..Default::default() };
    let r = step_search(|x| x * x, 2.0, 0.0, Monotonicity::Increasing, SearchBounds::Floor(0.0), &s)
        .unwrap();
    assert_near(r.x, core::f64::consts::SQRT_2, 1e-9, "step search √2");
    assert!(r.iterations > 0);
    assert_eq!(r.evals, r.iterations + 1);
}

#[test]
fn step_search_decreasing() {
    // e^{−x} = 0.25 → x = ln 4
    let s = StepSearchSettings { tolerance: 1e-10, ..Default::default() };
    let r = step_search(
        |x: f64| (-x).exp(),
        0.25,
        0.0,
        Monotonicity::Decreasing,
        SearchBounds::Floor(0.0),
        &s,
    )
    .unwrap();
    assert_near(r.x, 4.0_f64.ln(), 1e-9, "decreasing target");
}

#[test]
fn step_search_start_is_root() {
    let r = step_search(
        |x: f64| 3.0 * x,
        3.0,
        1.0,
        Monotonicity::Increasing,
        SearchBounds::Floor(0.0),
        &StepSearchSettings::default(),
    )
    .unwrap();
    assert_eq!(r.iterations, 0);
    assert_eq!(r.x, 1.0);
}

#[test]
fn step_search_floor_clamps() {
    // Root very close to the floor: the first step would leave the domain.
    let mut min_seen = f64::INFINITY;
    let s = StepSearchSettings { tolerance: 1e-12, ..Default::default() };
    let r = step_search(
        |x: f64| {
            min_seen = min_seen.min(x);
            x
        },
        1e-6,
        0.5,
        Monotonicity::Increasing,
        SearchBounds::Floor(0.0),
        &s,
    )
    .unwrap();
    assert!(min_seen >= 0.0, "evaluated below the floor: {min_seen}");
    assert_near(r.x, 1e-6, 1e-11, "near-floor root");
}

#[test]
fn step_search_interval_out_of_bounds_above() {
    let r = step_search(
        |x: f64| x,
        50.0,
        1.0,
        Monotonicity::Increasing,
        SearchBounds::Interval { lower: 0.5, upper: 10.0 },
        &StepSearchSettings::default(),
    );
    assert_eq!(r.unwrap_err(), OptimError::OutOfBounds);
}

#[test]
fn step_search_interval_out_of_bounds_below() {
    let r = step_search(
        |x: f64| x,
        0.1,
        3.0,
        Monotonicity::Increasing,
        SearchBounds::Interval { lower: 0.5, upper: 10.0 },
        &StepSearchSettings::default(),
    );
    assert_eq!(r.unwrap_err(), OptimError::OutOfBounds);
}

#[test]
fn step_search_interval_root_at_bound() {
    let r = step_search(
        |x: f64| x,
        10.0,
        1.0,
        Monotonicity::Increasing,
        SearchBounds::Interval { lower: 0.5, upper: 10.0 },
        &StepSearchSettings::default(),
    )
    .unwrap();
    assert_eq!(r.x, 10.0);
}

#[test]
fn step_search_iteration_cap() {
    let s = StepSearchSettings { tolerance: 1e-12, initial_step: 1.0, max_iter: 5 };
    let r = step_search(|x: f64| x, 1000.0, 0.0, Monotonicity::Increasing, SearchBounds::Floor(0.0), &s);
    assert_eq!(r.unwrap_err(), OptimError::MaxIterations { iterations: 5 });
}

#[test]
fn step_search_wrong_monotonicity_hits_cap() {
    // Declared increasing but actually decreasing: the walk runs away and the
    // cap, not an infinite loop, ends it.
    let s = StepSearchSettings { tolerance: 1e-8, initial_step: 1.0, max_iter: 200 };
    let r = step_search(|x: f64| -x, -5.0, 10.0, Monotonicity::Increasing, SearchBounds::Floor(0.0), &s);
    assert!(matches!(r, Err(OptimError::MaxIterations { .. })));
}

#[test]
fn step_search_not_finite() {
    let r = step_search(
        |x: f64| if x > 2.5 { f64::NAN } else { x },
        10.0,
        0.0,
        Monotonicity::Increasing,
        SearchBounds::Floor(0.0),
        &StepSearchSettings::default(),
    );
    assert_eq!(r.unwrap_err(), OptimError::NotFinite);
}

#[test]
fn step_search_f32() {
    let s = StepSearchSettings::<f32>::default();
    let r = step_search(|x: f32| x * x, 2.0f32, 1.0, Monotonicity::Increasing, SearchBounds::Floor(0.0), &s)
        .unwrap();
    assert!((r.fx - 2.0).abs() <= 1e-4);
}

// ═══════════════════════════════════════════════════════════════════
// Bounded minimization
// ═══════════════════════════════════════════════════════════════════

#[test]
fn bounded_parabola() {
    let r = minimize_bounded(|x: f64| (x - 1.5).powi(2) + 0.25, 0.0, 4.0, &BoundedSettings::default())
        .unwrap();
    assert_near(r.x, 1.5, 1e-6, "bounded parabola");
    assert_near(r.fx, 0.25, 1e-12, "bounded parabola value");
}

#[test]
fn bounded_minimum_at_edge() {
    // Monotone on the interval: minimizer sits at the lower end.
    let r = minimize_bounded(|x: f64| x, 2.0, 5.0, &BoundedSettings::default()).unwrap();
    assert!(r.x >= 2.0 && r.x < 2.0 + 1e-5, "edge minimizer {}", r.x);
}

#[test]
fn bounded_kink() {
    let r = minimize_bounded(|x: f64| (x.ln() - 0.7).abs(), 0.05, 200.0, &BoundedSettings::default())
        .unwrap();
    assert_near(r.x, 0.7_f64.exp(), 1e-5, "abs-value kink");
}

#[test]
fn bounded_invalid_interval() {
    let r = minimize_bounded(|x: f64| x, 3.0, 1.0, &BoundedSettings::default());
    assert_eq!(r.unwrap_err(), OptimError::BracketInvalid);
}

#[test]
fn bounded_eval_cap() {
    let s = BoundedSettings { x_tol: 1e-14, max_evals: 4 };
    let r = minimize_bounded(|x: f64| (x - 1.0).powi(2), 0.0, 100.0, &s);
    assert!(matches!(r, Err(OptimError::MaxIterations { .. })));
}

// ═══════════════════════════════════════════════════════════════════
// Nelder–Mead
// ═══════════════════════════════════════════════════════════════════

#[test]
fn nelder_mead_rosenbrock() {
    let r = nelder_mead(
        |x: &[f64; 2]| (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0] * x[0]).powi(2),
        &[-1.2, 1.0],
        &NelderMeadSettings::default(),
    )
    .unwrap();
    assert_near(r.x[0], 1.0, 1e-4, "rosenbrock x0");
    assert_near(r.x[1], 1.0, 1e-4, "rosenbrock x1");
}

#[test]
fn nelder_mead_infeasible_region() {
    // Minimum at (2, 3) with x ≤ 0 infeasible.
    let r = nelder_mead(
        |x: &[f64; 2]| {
            if x[0] <= 0.0 || x[1] <= 0.0 {
                f64::INFINITY
            } else {
                (x[0] - 2.0).powi(2) + (x[1] - 3.0).powi(2)
            }
        },
        &[1.0, 1.0],
        &NelderMeadSettings::default(),
    )
    .unwrap();
    assert_near(r.x[0], 2.0, 1e-5, "x0");
    assert_near(r.x[1], 3.0, 1e-5, "x1");
}

#[test]
fn nelder_mead_rejects_bad_start() {
    let r = nelder_mead(|_: &[f64; 2]| f64::NAN, &[1.0, 1.0], &NelderMeadSettings::default());
    assert_eq!(r.unwrap_err(), OptimError::NotFinite);
}

#[test]
fn nelder_mead_zero_start_coordinate() {
    let r = nelder_mead(|x: &[f64; 1]| (x[0] - 0.5).powi(2), &[0.0], &NelderMeadSettings::default()).unwrap();
    assert_near(r.x[0], 0.5, 1e-5, "1-d from zero");
}
