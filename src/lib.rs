//! # gammafid
//!
//! Monte Carlo inference on the shape parameter of a Gamma distribution.
//!
//! A small positive sample is reduced to its mean `s1` and the ratio of
//! geometric to arithmetic mean `s2` (tau2). Latent uniform samples are
//! mapped through the inverse Gamma CDF, the shape whose tau2 matches `s2`
//! is found by a bounded directional search, and four Monte Carlo schemes
//! estimate the expectation of a statistic φ of the reconstructed sample.
//! A Cramér–von Mises p-value conditional on the sufficient statistics
//! comes from the Gibbs chain.
//!
//! ## Quick start
//!
//! ```
//! use gammafid::{GammaInversion, InferenceSettings, ShapeEstimator};
//!
//! let settings = InferenceSettings::default();
//!
//! // Median of Gamma(2, 1)
//! let x = GammaInversion::new(&settings).inverse_cdf(0.5, 2.0).unwrap();
//! assert!((x - 1.678346990016661).abs() < 1e-4);
//!
//! // Shape matching a target tau2 for a fixed uniform sample
//! let est = ShapeEstimator::new(&settings);
//! let u = [0.2, 0.5, 0.8];
//! let s2 = est.tau2(&u, 2.0).unwrap();
//! let alpha = est.find_alpha(s2, &u).unwrap();
//! assert!((est.tau2(&u, alpha).unwrap() - s2).abs() <= 1e-4);
//! ```
//!
//! ## Modules
//!
//! - [`config`] — [`InferenceSettings`] and the CDF, prior and φ policies.
//!   One immutable value, validated up front, passed by reference.
//!
//! - [`inversion`] — [`GammaInversion`]: inverse CDF by step search under
//!   the closed-form or quadrature CDF, finite-difference derivatives in
//!   `u` and α, and the analytic α-derivative.
//!
//! - [`shape`] — [`ShapeEstimator`]: tau2, shape search (step search or
//!   bounded minimization) and scale recovery.
//!
//! - [`weight`] — [`ImportanceWeighting`]: importance weights with prior
//!   multipliers, and the tallied statistic φ.
//!
//! - [`mcmc`] — [`MarkovKernel`] and [`run_chain`], with the independence,
//!   Gibbs, rejection and alpha-walk samplers.
//!
//! - [`gof`] — Gamma likelihood, MLE, Cramér–von Mises and the Gibbs
//!   p-value.
//!
//! - [`data`] — synthetic or fixed input data.
//!
//! - [`optim`] — directional step search, Brent's bounded minimizer and
//!   Nelder–Mead.
//!
//! - [`special`], [`stats`], [`quadrature`] — log-gamma, digamma,
//!   trigamma, incomplete gamma, the Gamma distribution and Simpson's rule.
//!
//! - [`traits`] — [`FloatScalar`], the float bound of the numeric layer.
//!
//! ## Errors
//!
//! Numeric failures are [`InferenceError`] values that samplers recover
//! from locally. Contract violations at the boundary (empty or
//! non-positive data, bad settings) are [`SetupError`] values raised before
//! any numeric work.
//!
//! ## Logging
//!
//! Chains report through [`tracing`]: `debug` on completion, `trace` for
//! discarded proposals and zeroed weights, `warn` when a starting state is
//! hard to find. No subscriber is installed by the library.
//!
//! ## Cargo features
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `serde` | no      | `Serialize`/`Deserialize` on settings, policies and results |

pub mod config;
pub mod data;
pub mod error;
pub mod gof;
pub mod inversion;
pub mod mcmc;
pub mod optim;
pub mod quadrature;
pub mod shape;
pub mod special;
pub mod stats;
pub mod traits;
pub mod weight;

pub use config::{CdfEvaluation, InferenceSettings, PhiPolicy, PriorPolicy};
pub use data::DataGenPolicy;
pub use error::{InferenceError, SetupError};
pub use gof::{
    cramer_von_mises, cramer_von_mises_with, gibbs_p_value, mle, neg_log_likelihood, CvmConstant, GammaFit, GofReport,
};
pub use inversion::GammaInversion;
pub use mcmc::{
    run_chain, AlphaWalkSampler, ChainSummary, ChainTrace, GibbsSampler, IndependenceSampler, MarkovKernel,
    RejectionSampler, TripleSource,
};
pub use shape::{ShapeEstimate, ShapeEstimator};
pub use stats::SufficientStatistics;
pub use traits::FloatScalar;
pub use weight::ImportanceWeighting;
