//! Seeded resampling bootstrap
//!
//! Each resample draws its own RNG from `seed + i`, so a given seed produces
//! the same estimates whether the resamples run sequentially or on rayon.

use crate::{BootstrapMethod, ConfidenceInterval, PercentileBootstrap};
use hydrofreq_core::{Error, Result};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Default number of resamples
pub const DEFAULT_RESAMPLES: usize = 1000;

/// Result of bootstrap confidence interval estimation
#[derive(Debug, Clone, Serialize)]
pub struct BootstrapResult {
    /// The confidence interval
    pub interval: ConfidenceInterval,
    /// Number of bootstrap resamples requested
    pub n_resamples: usize,
    /// Resamples whose statistic was finite
    pub n_valid: usize,
}

/// Bootstrap engine
///
/// ```rust
/// use hydrofreq_confidence::Bootstrap;
///
/// let sample: Vec<f64> = (1..=40).map(f64::from).collect();
/// let result = Bootstrap::default()
///     .with_resamples(200)
///     .with_seed(7)
///     .confidence_interval(&sample, |s| Some(s.iter().sum::<f64>() / s.len() as f64))
///     .unwrap();
/// assert!(result.interval.contains(20.5));
/// ```
#[derive(Debug, Clone)]
pub struct Bootstrap<M = PercentileBootstrap> {
    method: M,
    n_resamples: usize,
    confidence_level: f64,
    seed: Option<u64>,
    parallel: bool,
}

impl Default for Bootstrap<PercentileBootstrap> {
    fn default() -> Self {
        Self::new(PercentileBootstrap)
    }
}

impl<M: BootstrapMethod> Bootstrap<M> {
    /// Create a new bootstrap engine
    pub fn new(method: M) -> Self {
        Self {
            method,
            n_resamples: DEFAULT_RESAMPLES,
            confidence_level: 0.95,
            seed: None,
            parallel: true,
        }
    }

    /// Set the number of bootstrap resamples
    ///
    /// # Panics
    /// Panics if `n_resamples` is zero
    pub fn with_resamples(mut self, n_resamples: usize) -> Self {
        assert!(n_resamples > 0, "Number of resamples must be positive");
        self.n_resamples = n_resamples;
        self
    }

    /// Set the confidence level
    ///
    /// # Panics
    /// Panics if the level is not in (0, 1)
    pub fn with_confidence_level(mut self, confidence_level: f64) -> Self {
        assert!(
            confidence_level > 0.0 && confidence_level < 1.0,
            "Confidence level must be in (0, 1)"
        );
        self.confidence_level = confidence_level;
        self
    }

    /// Set random seed for reproducibility
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Run resamples on the rayon pool (only with the `parallel` feature)
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn n_resamples(&self) -> usize {
        self.n_resamples
    }

    pub fn confidence_level(&self) -> f64 {
        self.confidence_level
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    pub fn method(&self) -> &M {
        &self.method
    }

    /// Draw one resample with replacement
    fn resample(sample: &[f64], seed: u64, i: usize) -> Vec<f64> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(i as u64));
        let n = sample.len();
        (0..n).map(|_| sample[rng.gen_range(0..n)]).collect()
    }

    /// Evaluate `statistic` on every resample, keeping the `Some` results
    fn run<T, F>(&self, sample: &[f64], statistic: F) -> Vec<T>
    where
        T: Send,
        F: Fn(&[f64]) -> Option<T> + Sync + Send,
    {
        if sample.is_empty() {
            return Vec::new();
        }
        let seed = self.seed.unwrap_or_else(|| thread_rng().gen());
        debug!(seed, "Generating bootstrap resamples");

        let eval = |i: usize| statistic(&Self::resample(sample, seed, i));

        #[cfg(feature = "parallel")]
        {
            if self.parallel {
                return (0..self.n_resamples)
                    .into_par_iter()
                    .filter_map(eval)
                    .collect();
            }
        }

        (0..self.n_resamples).filter_map(eval).collect()
    }

    /// Statistic evaluated on every resample
    ///
    /// Resamples where the statistic is `None` or non-finite are dropped.
    #[instrument(skip(self, sample, statistic), fields(n = sample.len(), resamples = self.n_resamples))]
    pub fn replicate<F>(&self, sample: &[f64], statistic: F) -> Vec<f64>
    where
        F: Fn(&[f64]) -> Option<f64> + Sync + Send,
    {
        self.run(sample, |resample| statistic(resample).filter(|v| v.is_finite()))
    }

    /// Confidence interval for an arbitrary statistic of a sample
    pub fn confidence_interval<F>(&self, sample: &[f64], statistic: F) -> Result<BootstrapResult>
    where
        F: Fn(&[f64]) -> Option<f64> + Sync + Send,
    {
        if sample.is_empty() {
            return Err(Error::empty_input("bootstrap"));
        }
        let original = statistic(sample)
            .filter(|v| v.is_finite())
            .ok_or_else(|| {
                Error::Computation("statistic is undefined on the original sample".to_string())
            })?;

        let estimates = self.replicate(sample, statistic);
        if estimates.len() < self.n_resamples {
            warn!(
                valid = estimates.len(),
                requested = self.n_resamples,
                "Some bootstrap resamples produced no estimate"
            );
        }
        let interval =
            self.method
                .calculate_interval(&estimates, original, self.confidence_level)?;
        debug!(%interval, method = self.method.name(), "Bootstrap interval");

        Ok(BootstrapResult {
            interval,
            n_resamples: self.n_resamples,
            n_valid: estimates.len(),
        })
    }

    /// Confidence intervals for a vector-valued statistic
    ///
    /// The statistic must return the same number of components on every
    /// resample; a resample returning `None` is skipped as a whole. Each
    /// component's interval uses only its finite estimates.
    #[instrument(skip(self, sample, statistic), fields(n = sample.len(), resamples = self.n_resamples))]
    pub fn vector_confidence_intervals<F>(
        &self,
        sample: &[f64],
        statistic: F,
    ) -> Result<Vec<ConfidenceInterval>>
    where
        F: Fn(&[f64]) -> Option<Vec<f64>> + Sync + Send,
    {
        if sample.is_empty() {
            return Err(Error::empty_input("bootstrap"));
        }
        let original = statistic(sample).ok_or_else(|| {
            Error::Computation("statistic is undefined on the original sample".to_string())
        })?;
        let k = original.len();

        let replicates = self.run(sample, |resample| statistic(resample).filter(|v| v.len() == k));
        debug!(valid = replicates.len(), components = k, "Vector bootstrap finished");

        (0..k)
            .map(|j| {
                let column: Vec<f64> = replicates
                    .iter()
                    .map(|r| r[j])
                    .filter(|v| v.is_finite())
                    .collect();
                self.method
                    .calculate_interval(&column, original[j], self.confidence_level)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mean(s: &[f64]) -> Option<f64> {
        Some(s.iter().sum::<f64>() / s.len() as f64)
    }

    #[test]
    fn test_bootstrap_construction() {
        let bootstrap = Bootstrap::default()
            .with_resamples(1000)
            .with_confidence_level(0.9)
            .with_seed(42);

        assert_eq!(bootstrap.n_resamples(), 1000);
        assert_eq!(bootstrap.confidence_level(), 0.9);
        assert_eq!(bootstrap.seed(), Some(42));
        assert_eq!(bootstrap.method().name(), "Percentile Bootstrap");
    }

    #[test]
    fn test_seeded_replicates_are_reproducible() {
        let sample: Vec<f64> = (0..25).map(|i| (i * 7 % 11) as f64).collect();
        let bootstrap = Bootstrap::default().with_resamples(50).with_seed(3);
        let a = bootstrap.replicate(&sample, mean);
        let b = bootstrap.clone().with_parallel(false).replicate(&sample, mean);
        assert_eq!(a.len(), 50);
        assert_eq!(a, b);
    }

    #[test]
    fn test_undefined_statistic_is_dropped() {
        let sample = [1.0, 2.0, 3.0];
        let bootstrap = Bootstrap::default().with_resamples(20).with_seed(1);
        assert!(bootstrap.replicate(&sample, |_| None).is_empty());
        assert!(bootstrap.confidence_interval(&sample, |_| None).is_err());
        assert!(bootstrap.confidence_interval(&[], mean).is_err());
    }

    #[test]
    fn test_vector_intervals_per_component() {
        let sample: Vec<f64> = (1..=30).map(f64::from).collect();
        let bootstrap = Bootstrap::default().with_resamples(200).with_seed(9);
        let cis = bootstrap
            .vector_confidence_intervals(&sample, |s| {
                let m = mean(s)?;
                Some(vec![m, 2.0 * m])
            })
            .unwrap();
        assert_eq!(cis.len(), 2);
        assert!(cis[0].contains(15.5));
        assert!((cis[1].lower - 2.0 * cis[0].lower).abs() < 1e-9);
        assert!((cis[1].upper - 2.0 * cis[0].upper).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_inputs() {
        let result = std::panic::catch_unwind(|| Bootstrap::default().with_confidence_level(1.5));
        assert!(result.is_err());

        let result = std::panic::catch_unwind(|| Bootstrap::default().with_resamples(0));
        assert!(result.is_err());
    }
}
