use gammafid::{
    gibbs_p_value, run_chain, CdfEvaluation, DataGenPolicy, GammaInversion, GibbsSampler, IndependenceSampler,
    InferenceError, InferenceSettings, PhiPolicy, RejectionSampler, ShapeEstimator, SufficientStatistics,
    TripleSource,
};

const U: [f64; 3] = [0.2, 0.5, 0.8];
const SMALL_SHAPE_DATA: [f64; 3] = [4.399, 1.307, 0.085];

// ── Inversion ────────────────────────────────────────────────────────

#[test]
fn median_of_gamma_two_closed_form() {
    let settings = InferenceSettings { tolerance: 1e-8, ..Default::default() };
    let x = GammaInversion::new(&settings).inverse_cdf(0.5, 2.0).unwrap();
    assert!((x - 1.678346990016661).abs() < 1e-5, "x = {x}");
}

#[test]
fn median_of_gamma_two_numeric_integration() {
    let settings = InferenceSettings {
        tolerance: 1e-8,
        evaluation: CdfEvaluation::NumericIntegration,
        ..Default::default()
    };
    let x = GammaInversion::new(&settings).inverse_cdf(0.5, 2.0).unwrap();
    assert!((x - 1.678346990016661).abs() < 1e-5, "x = {x}");
}

#[test]
fn default_tolerance_bounds_cdf_residual() {
    let settings = InferenceSettings::default();
    let inv = GammaInversion::new(&settings);
    let x = inv.inverse_cdf(0.5, 2.0).unwrap();
    assert!((inv.cdf(x, 2.0).unwrap() - 0.5).abs() <= 1e-5);
}

// ── Shape search ─────────────────────────────────────────────────────

#[test]
fn shape_two_from_exact_quantiles() {
    let settings = InferenceSettings::default();
    let est = ShapeEstimator::new(&settings);
    let data = est.inversion().inverse_cdf_all(&U, 2.0).unwrap();
    let stats = SufficientStatistics::from_data(&data).unwrap();
    let alpha = est.find_alpha(stats.s2(), &U).unwrap();
    assert!((est.tau2(&U, alpha).unwrap() - stats.s2()).abs() <= 1e-4);
    assert!((alpha - 2.0).abs() < 0.05, "alpha = {alpha}");
}

#[test]
fn shape_two_from_synthetic_points() {
    let settings = InferenceSettings::default();
    let est = ShapeEstimator::new(&settings);
    let policy = DataGenPolicy::Gamma { shape: 2.0, scale: 1.0, n: 3 };
    for seed in [1, 2, 3] {
        let s = InferenceSettings { seed, ..settings };
        let (_, stats) = policy.statistics(&mut s.rng()).unwrap();
        match est.find_alpha(stats.s2(), &U) {
            Ok(alpha) => {
                assert!(alpha >= settings.alpha_lower && alpha <= settings.alpha_upper);
                assert!((est.tau2(&U, alpha).unwrap() - stats.s2()).abs() <= 1e-4);
            }
            Err(e) => assert_eq!(e, InferenceError::EstimationFailure),
        }
    }
}

#[test]
fn small_shape_data_terminates() {
    let settings = InferenceSettings { alpha_lower: 0.05, alpha_upper: 200.0, ..Default::default() };
    let est = ShapeEstimator::new(&settings);
    let stats = SufficientStatistics::from_data(&SMALL_SHAPE_DATA).unwrap();
    assert!((stats.s2() - 0.408).abs() < 1e-3);

    match est.find_alpha(stats.s2(), &U) {
        Ok(alpha) => {
            assert!(alpha >= 0.05 && alpha <= 200.0);
            assert!((est.tau2(&U, alpha).unwrap() - stats.s2()).abs() <= 1e-4);
        }
        Err(e) => assert_eq!(e, InferenceError::EstimationFailure),
    }
    match est.find_alpha_bounded(stats.s2(), &U) {
        Ok(alpha) => assert!((est.tau2(&U, alpha).unwrap() - stats.s2()).abs() <= 1e-4),
        Err(e) => assert_eq!(e, InferenceError::EstimationFailure),
    }
}

#[test]
fn tau2_is_increasing_in_shape_for_several_samples() {
    let settings = InferenceSettings::default();
    let est = ShapeEstimator::new(&settings);
    let samples: [[f64; 3]; 4] = [[0.2, 0.5, 0.8], [0.05, 0.1, 0.9], [0.33, 0.34, 0.35], [0.01, 0.6, 0.99]];
    let grid = [0.05, 0.1, 0.3, 1.0, 3.0, 10.0, 40.0, 200.0];
    for u in &samples {
        let t: Vec<f64> = grid.iter().map(|&a| est.tau2(u, a).unwrap()).collect();
        assert!(t.windows(2).all(|w| w[1] > w[0]), "u = {u:?}: {t:?}");
    }
}

// ── Samplers end to end ──────────────────────────────────────────────

#[test]
fn independence_chain_on_small_shape_data() {
    let settings = InferenceSettings { phi: PhiPolicy::Indicator { threshold: 2.0 }, seed: 99, ..Default::default() };
    let stats = SufficientStatistics::from_data(&SMALL_SHAPE_DATA).unwrap();
    let mut rng = settings.rng();
    let mut kernel = IndependenceSampler::new(&settings, stats).unwrap();
    let mut state = kernel.initial_state(&mut rng).unwrap();
    let summary = run_chain(&mut kernel, &mut state, 25, &mut rng);
    assert_eq!(summary.trace.phi.len(), 25);
    assert!(summary.trace.phi.iter().all(|p| [0.0, 1.0 / 3.0, 2.0 / 3.0, 1.0].contains(p)));
    assert!(state.weight.is_finite() && state.weight > 0.0);
}

#[test]
fn gibbs_and_rejection_estimates_are_probabilities() {
    // Both condition on the observed sum and product; with an indicator φ
    // each estimate is a frequency.
    let settings = InferenceSettings { phi: PhiPolicy::Indicator { threshold: 1.0 }, seed: 3, ..Default::default() };
    let stats = SufficientStatistics::from_data(&SMALL_SHAPE_DATA).unwrap();
    let mut rng = settings.rng();

    let mut gibbs = GibbsSampler::new(settings.phi);
    let mut state = SMALL_SHAPE_DATA.to_vec();
    let g = run_chain(&mut gibbs, &mut state, 4000, &mut rng).estimate.unwrap();

    let mut rejection =
        RejectionSampler::with_tolerance(&settings, stats, TripleSource::Direct { shape: 0.7, scale: 2.8 }, 0.3).unwrap();
    let mut state = SMALL_SHAPE_DATA.to_vec();
    let r = run_chain(&mut rejection, &mut state, 20000, &mut rng).estimate.unwrap();

    assert!((0.0..=1.0).contains(&g) && (0.0..=1.0).contains(&r));
}

#[test]
fn p_value_for_small_shape_data() {
    let settings = InferenceSettings::default();
    let mut rng = settings.rng();
    let report = gibbs_p_value(&SMALL_SHAPE_DATA, &settings, 1000, &mut rng).unwrap();
    assert!((0.0..=1.0).contains(&report.p_value));
    assert!(report.fit.alpha > 0.0 && report.fit.beta > 0.0);
    // The fit reproduces the mean.
    let mean = SMALL_SHAPE_DATA.iter().sum::<f64>() / 3.0;
    assert!((report.fit.alpha * report.fit.beta - mean).abs() < 1e-4 * mean);
}
