//! Observed or synthetic input data.

use rand::Rng;
use rand_distr::{Distribution, Gamma as GammaDistr};

use crate::error::SetupError;
use crate::stats::SufficientStatistics;

/// Where the data vector comes from.
///
/// # Example
///
/// ```
/// use gammafid::data::DataGenPolicy;
/// use gammafid::config::InferenceSettings;
///
/// let mut rng = InferenceSettings::default().rng();
/// let data = DataGenPolicy::Gamma { shape: 2.0, scale: 1.0, n: 3 }.generate(&mut rng).unwrap();
/// assert_eq!(data.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataGenPolicy {
    /// `n` Gamma(shape, scale) variates.
    Gamma {
        /// Shape.
        shape: f64,
        /// Scale.
        scale: f64,
        /// Sample size.
        n: usize,
    },
    /// A fixed, already observed sample.
    Fixed(Vec<f64>),
}

impl DataGenPolicy {
    /// Produce the data vector, validated for positivity.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<f64>, SetupError> {
        let data = match self {
            DataGenPolicy::Gamma { shape, scale, n } => {
                let g = GammaDistr::new(*shape, *scale)
                    .map_err(|_| SetupError::InvalidSetting("gamma data parameters out of range"))?;
                (0..*n).map(|_| g.sample(rng)).collect()
            }
            DataGenPolicy::Fixed(values) => values.clone(),
        };
        SufficientStatistics::from_data(&data)?;
        Ok(data)
    }

    /// Produce the data and reduce it to its statistics.
    pub fn statistics<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<(Vec<f64>, SufficientStatistics), SetupError> {
        let data = self.generate(rng)?;
        let stats = SufficientStatistics::from_data(&data)?;
        Ok((data, stats))
    }
}
