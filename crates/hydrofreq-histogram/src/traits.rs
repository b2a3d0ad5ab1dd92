//! Core traits for histogram building

use crate::types::Histogram;
use hydrofreq_core::Result;

/// Trait for building histograms from sample data
pub trait HistogramBuilder {
    /// Build a histogram from the given sample
    fn build(&self, sample: &[f64]) -> Result<Histogram> {
        self.build_sorted(&hydrofreq_core::utils::sorted(sample))
    }

    /// Build a histogram from ascending data
    fn build_sorted(&self, sorted_sample: &[f64]) -> Result<Histogram>;

    /// Number of bins this builder always produces, if fixed
    fn target_bins(&self) -> Option<usize> {
        None
    }
}
