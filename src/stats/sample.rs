use crate::error::SetupError;

/// Ratio of geometric to arithmetic mean, `n·(∏x)^{1/n} / Σx`.
///
/// The product is formed in log space. Any zero entry gives 0; an empty
/// slice or a non-positive sum gives NaN.
pub fn tau2_of(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let sum: f64 = values.iter().sum();
    if values.is_empty() || !(sum > 0.0) {
        return f64::NAN;
    }
    let mean_ln = values.iter().map(|v| v.ln()).sum::<f64>() / n;
    n * mean_ln.exp() / sum
}

/// Summary of an observed sample: the pair (s1, s2) matched by the shape
/// estimator plus the raw sum and product conditioned on by the Gibbs and
/// rejection samplers.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SufficientStatistics {
    /// Sample size.
    pub n: usize,
    /// Arithmetic mean (s1).
    pub mean: f64,
    /// Geometric over arithmetic mean (s2).
    pub tau2: f64,
    /// Σx.
    pub sum: f64,
    /// ∏x.
    pub product: f64,
}

impl SufficientStatistics {
    /// Reduce `data` to its statistics.
    ///
    /// Fails on an empty sample or on any value that is not strictly
    /// positive and finite, since tau2 is undefined there.
    ///
    /// # Example
    ///
    /// ```
    /// use gammafid::stats::SufficientStatistics;
    ///
    /// let s = SufficientStatistics::from_data(&[1.0, 2.0, 4.0]).unwrap();
    /// assert!((s.mean - 7.0 / 3.0).abs() < 1e-14);
    /// assert!((s.tau2 - 2.0 / s.mean).abs() < 1e-14);
    /// ```
    pub fn from_data(data: &[f64]) -> Result<Self, SetupError> {
        if data.is_empty() {
            return Err(SetupError::EmptyData);
        }
        if let Some(index) = data.iter().position(|v| !(v.is_finite() && *v > 0.0)) {
            return Err(SetupError::NonPositiveData { index });
        }
        let n = data.len();
        let sum: f64 = data.iter().sum();
        Ok(Self {
            n,
            mean: sum / n as f64,
            tau2: tau2_of(data),
            sum,
            product: data.iter().product(),
        })
    }

    /// s1, the arithmetic mean.
    pub fn s1(&self) -> f64 {
        self.mean
    }

    /// s2, the tau2 statistic.
    pub fn s2(&self) -> f64 {
        self.tau2
    }
}
