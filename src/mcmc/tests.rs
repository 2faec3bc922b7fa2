use super::*;
use crate::config::PhiPolicy;
use crate::shape::{ShapeEstimate, ShapeEstimator};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

const DATA: [f64; 3] = [4.399, 1.307, 0.085];

fn rel_close(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol * a.abs().max(b.abs())
}

// ═══════════════════════════════════════════════════════════════════
// Gibbs
// ═══════════════════════════════════════════════════════════════════

#[test]
fn gibbs_non_accepted_steps_leave_state_untouched() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(17);
    let mut kernel = GibbsSampler::new(PhiPolicy::RatioProduct);
    let mut state = DATA.to_vec();
    let (mut rejected, mut invalid) = (0, 0);
    for _ in 0..2000 {
        let before = state.clone();
        match kernel.step(&mut state, &mut rng) {
            Step::Accepted => {}
            Step::Rejected => {
                rejected += 1;
                assert_eq!(state, before);
            }
            Step::Invalid(e) => {
                invalid += 1;
                assert_eq!(e, InferenceError::InvalidGibbsProposal);
                assert_eq!(state, before);
            }
        }
    }
    assert!(rejected + invalid > 0);
}

#[test]
fn gibbs_preserves_sum_and_product() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(5);
    let mut kernel = GibbsSampler::new(PhiPolicy::RatioProduct);
    let data = [2.0, 0.7, 3.1, 1.4, 0.9];
    let mut state = data.to_vec();
    let summary = run_chain(&mut kernel, &mut state, 3000, &mut rng);
    assert!(summary.accepted > 0);
    let sum: f64 = state.iter().sum();
    let product: f64 = state.iter().product();
    assert!(rel_close(sum, data.iter().sum(), 1e-9), "sum drifted to {sum}");
    assert!(rel_close(product, data.iter().product(), 1e-8), "product drifted to {product}");
    assert!(state.iter().all(|&v| v > 0.0));
}

#[test]
fn gibbs_needs_three_coordinates() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
    let mut kernel = GibbsSampler::new(PhiPolicy::RatioProduct);
    let mut state = vec![1.0, 2.0];
    assert_eq!(kernel.step(&mut state, &mut rng), Step::Invalid(InferenceError::Domain));
    assert_eq!(state, vec![1.0, 2.0]);
}

#[test]
fn gibbs_chain_is_reproducible() {
    let run = |seed| {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let mut kernel = GibbsSampler::new(PhiPolicy::PowerRatio);
        let mut state = DATA.to_vec();
        run_chain(&mut kernel, &mut state, 300, &mut rng)
    };
    assert_eq!(run(9), run(9));
}

// ═══════════════════════════════════════════════════════════════════
// Driver
// ═══════════════════════════════════════════════════════════════════

#[test]
fn trace_is_consistent() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(23);
    let mut kernel = GibbsSampler::new(PhiPolicy::Indicator { threshold: 1.0 });
    let mut state = DATA.to_vec();
    let summary = run_chain(&mut kernel, &mut state, 400, &mut rng);

    let t = &summary.trace;
    assert_eq!(summary.accepted + summary.rejected + summary.invalid, 400);
    assert_eq!(t.phi.len(), 400);
    assert_eq!(t.first.len(), 400);
    assert_eq!(t.running_mean.len(), 400);
    assert_eq!(t.running_variance.len(), 400);
    assert_eq!(t.accepted.iter().filter(|&&a| a).count(), summary.accepted);

    let mean = t.phi.iter().sum::<f64>() / 400.0;
    let var = t.phi.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / 400.0;
    assert!((summary.estimate.unwrap() - mean).abs() < 1e-12);
    assert!((t.running_mean[399] - mean).abs() < 1e-12);
    assert!((t.running_variance[399] - var).abs() < 1e-12);
    assert!(t.running_variance.iter().all(|&v| v >= 0.0));
    assert!(t.phi.iter().all(|&p| (0.0..=1.0).contains(&p)));
}

#[test]
fn empty_chain() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
    let mut kernel = GibbsSampler::new(PhiPolicy::RatioProduct);
    let mut state = DATA.to_vec();
    let summary = run_chain(&mut kernel, &mut state, 0, &mut rng);
    assert_eq!(summary.estimate, None);
    assert_eq!(summary.acceptance_rate(), 0.0);
    assert!(summary.trace.phi.is_empty());
}

// ═══════════════════════════════════════════════════════════════════
// Rejection
// ═══════════════════════════════════════════════════════════════════

#[test]
fn rejection_tallies_accepted_draws_only() {
    let settings = InferenceSettings { phi: PhiPolicy::RatioProduct, ..Default::default() };
    let stats = SufficientStatistics::from_data(&DATA).unwrap();
    let mut kernel = RejectionSampler::with_tolerance(
        &settings,
        stats,
        TripleSource::Direct { shape: 1.0, scale: 2.0 },
        0.5,
    )
    .unwrap();
    let mut rng = settings.rng();
    let mut state = DATA.to_vec();
    let summary = run_chain(&mut kernel, &mut state, 2000, &mut rng);

    assert!(summary.accepted > 0);
    assert_eq!(summary.trace.phi.len(), summary.accepted);
    assert!(summary.trace.accepted.iter().all(|&a| a));
    assert!(kernel.matches(&state));
    assert_eq!(summary.invalid, 0);
}

#[test]
fn rejection_from_inversion_source() {
    let settings = InferenceSettings::default();
    let stats = SufficientStatistics::from_data(&DATA).unwrap();
    let mut kernel = RejectionSampler::with_tolerance(
        &settings,
        stats,
        TripleSource::Inversion { alpha: 1.0, beta: 2.0 },
        1.0,
    )
    .unwrap();
    let mut rng = settings.rng();
    let mut state = DATA.to_vec();
    let summary = run_chain(&mut kernel, &mut state, 300, &mut rng);
    assert!(summary.accepted > 0);
    assert!(kernel.matches(&state));
    let est = summary.estimate.unwrap();
    assert!((0.0..=1.0).contains(&est));
}

#[test]
fn rejection_rejects_bad_source() {
    let settings = InferenceSettings::default();
    let stats = SufficientStatistics::from_data(&DATA).unwrap();
    let r = RejectionSampler::new(&settings, stats, TripleSource::Direct { shape: -1.0, scale: 1.0 });
    assert!(matches!(r, Err(SetupError::InvalidSetting(_))));
    let r = RejectionSampler::new(&settings, stats, TripleSource::Inversion { alpha: 1.0, beta: 0.0 });
    assert!(matches!(r, Err(SetupError::InvalidSetting(_))));
    let r = RejectionSampler::with_tolerance(&settings, stats, TripleSource::Direct { shape: 1.0, scale: 1.0 }, 0.0);
    assert!(r.is_err());
}

// ═══════════════════════════════════════════════════════════════════
// Weighted chains
// ═══════════════════════════════════════════════════════════════════

#[test]
fn independence_chain_states_are_valid() {
    let settings = InferenceSettings::default();
    let stats = SufficientStatistics::from_data(&[2.0, 3.0, 5.0]).unwrap();
    let mut rng = settings.rng();
    let mut kernel = IndependenceSampler::new(&settings, stats).unwrap();
    let mut state = kernel.initial_state(&mut rng).unwrap();
    assert!(state.weight > 0.0);

    let summary = run_chain(&mut kernel, &mut state, 30, &mut rng);
    assert_eq!(summary.accepted + summary.rejected + summary.invalid, 30);
    assert!(state.weight.is_finite() && state.weight > 0.0);

    let est = ShapeEstimator::new(&settings);
    let t = est.tau2(&state.u, state.fit.alpha).unwrap();
    assert!((t - stats.tau2).abs() <= settings.shape_tolerance);
    let mean = state.x.iter().sum::<f64>() / 3.0;
    assert!(rel_close(mean, stats.mean, 1e-9));
    let phi = summary.estimate.unwrap();
    assert!((0.0..=1.0).contains(&phi));
}

#[test]
fn independence_state_from_checks_length() {
    let settings = InferenceSettings::default();
    let stats = SufficientStatistics::from_data(&[2.0, 3.0, 5.0]).unwrap();
    let kernel = IndependenceSampler::new(&settings, stats).unwrap();
    assert_eq!(kernel.state_from(vec![0.5; 2]), Err(InferenceError::Domain));
    let s = kernel.state_from(vec![0.2, 0.5, 0.8]).unwrap();
    assert_eq!(s.x.len(), 3);
}

#[test]
fn initialization_fails_for_unreachable_statistics() {
    // Equal data give tau2 = 1, which no finite shape reaches.
    let settings = InferenceSettings { alpha_lower: 0.5, alpha_upper: 2.0, ..Default::default() };
    let stats = SufficientStatistics::from_data(&[1.0, 1.0, 1.0]).unwrap();
    let kernel = IndependenceSampler::new(&settings, stats).unwrap();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(4);
    assert_eq!(
        kernel.initial_state(&mut rng),
        Err(SetupError::Initialization(InferenceError::EstimationFailure))
    );
}

#[test]
fn alpha_walk_stays_in_unit_cube() {
    let settings = InferenceSettings::default();
    let stats = SufficientStatistics::from_data(&[2.0, 3.0, 5.0]).unwrap();
    let mut rng = settings.rng();
    let mut kernel = AlphaWalkSampler::new(&settings, stats).unwrap();
    let mut state = kernel.initial_state(&mut rng).unwrap();
    let summary = run_chain(&mut kernel, &mut state, 15, &mut rng);

    // Fit failures become zero weights, never discarded proposals.
    assert_eq!(summary.invalid, 0);
    assert_eq!(summary.accepted + summary.rejected, 15);
    assert!(state.u.iter().all(|&u| (0.0..1.0).contains(&u)));
    assert!(state.fit.alpha >= settings.alpha_lower && state.fit.alpha <= settings.alpha_upper);
    assert!(state.weight > 0.0);
}

fn unfittable_state() -> WeightedState {
    WeightedState {
        u: vec![0.2, 0.5, 0.8],
        fit: ShapeEstimate { alpha: 1.0, beta: 1.0 },
        weight: 1.0,
        x: vec![0.22, 0.69, 1.61],
    }
}

#[test]
fn failed_fit_skips_draw_in_independence_but_not_in_alpha_walk() {
    // tau2 = 1 is out of reach, so every proposal fails to fit.
    let settings = InferenceSettings::default();
    let stats = SufficientStatistics::from_data(&[1.0, 1.0, 1.0]).unwrap();

    let mut rng = Xoshiro256PlusPlus::seed_from_u64(21);
    let mut reference = rng.clone();
    let mut kernel = IndependenceSampler::new(&settings, stats).unwrap();
    let mut state = unfittable_state();
    assert_eq!(kernel.step(&mut state, &mut rng), Step::Invalid(InferenceError::EstimationFailure));
    assert_eq!(state, unfittable_state());
    // Only the three proposal uniforms were drawn.
    for _ in 0..3 {
        let _: f64 = reference.random();
    }
    assert_eq!(rng.random::<u64>(), reference.random::<u64>());

    let mut rng = Xoshiro256PlusPlus::seed_from_u64(21);
    let mut reference = rng.clone();
    let mut kernel = AlphaWalkSampler::new(&settings, stats).unwrap();
    let mut state = unfittable_state();
    assert_eq!(kernel.step(&mut state, &mut rng), Step::Rejected);
    assert_eq!(state, unfittable_state());
    // Three proposal uniforms plus the acceptance draw.
    for _ in 0..4 {
        let _: f64 = reference.random();
    }
    assert_eq!(rng.random::<u64>(), reference.random::<u64>());
}

#[test]
fn alpha_walk_rejects_bad_step() {
    let settings = InferenceSettings::default();
    let stats = SufficientStatistics::from_data(&[2.0, 3.0, 5.0]).unwrap();
    assert!(AlphaWalkSampler::with_step(&settings, stats, 0.0).is_err());
    assert!(AlphaWalkSampler::with_step(&settings, stats, 1.5).is_err());
}

#[test]
fn samplers_validate_settings() {
    let settings = InferenceSettings { alpha_lower: -1.0, ..Default::default() };
    let stats = SufficientStatistics::from_data(&[2.0, 3.0, 5.0]).unwrap();
    assert!(IndependenceSampler::new(&settings, stats).is_err());
    assert!(AlphaWalkSampler::new(&settings, stats).is_err());
}
