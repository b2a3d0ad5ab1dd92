//! Histogram building strategies

use crate::traits::HistogramBuilder;
use crate::types::{Histogram, HistogramBin};
use hydrofreq_core::utils::quantile_sorted;
use hydrofreq_core::{Error, Result};

/// Fixed-width histogram builder
///
/// Creates `num_bins` equal-width bins spanning `[min, max]`. Every bin is
/// half-open except the last, which also includes the maximum. A sample with
/// zero range is widened to `[min - 0.5, max + 0.5]`.
#[derive(Debug, Clone, Copy)]
pub struct FixedWidthBuilder {
    num_bins: usize,
}

impl FixedWidthBuilder {
    /// Create a new fixed-width histogram builder
    pub fn new(num_bins: usize) -> Self {
        Self {
            num_bins: num_bins.max(1),
        }
    }
}

impl HistogramBuilder for FixedWidthBuilder {
    fn build_sorted(&self, sorted_sample: &[f64]) -> Result<Histogram> {
        if sorted_sample.is_empty() {
            return Ok(Histogram::new(vec![], 0));
        }
        if sorted_sample.iter().any(|v| !v.is_finite()) {
            return Err(Error::non_finite("histogram sample"));
        }

        let n = sorted_sample.len();
        let mut min = sorted_sample[0];
        let mut max = sorted_sample[n - 1];
        if max - min == 0.0 {
            min -= 0.5;
            max += 0.5;
        }

        let width = (max - min) / self.num_bins as f64;
        let mut counts = vec![0usize; self.num_bins];
        let last = self.num_bins - 1;

        // single pass through sorted data
        let mut current = 0;
        for &value in sorted_sample {
            while current < last && value >= min + (current + 1) as f64 * width {
                current += 1;
            }
            counts[current] += 1;
        }

        let bins = counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| {
                let left = min + i as f64 * width;
                let right = if i == last {
                    max
                } else {
                    min + (i + 1) as f64 * width
                };
                HistogramBin::new(left, right, count, n)
            })
            .collect();

        Ok(Histogram::new(bins, n))
    }

    fn target_bins(&self) -> Option<usize> {
        Some(self.num_bins)
    }
}

/// Sturges-style bin count used for chi-square testing
///
/// `max(5, ceil(1 + log2(n + 1)))`, so even small records get five bins.
#[derive(Debug, Clone, Copy, Default)]
pub struct SturgesRule;

impl SturgesRule {
    /// Bin count for a sample of size `n`
    pub fn bin_count(n: usize) -> usize {
        let sturges = (1.0 + ((n + 1) as f64).log2()).ceil() as usize;
        sturges.max(5)
    }
}

impl HistogramBuilder for SturgesRule {
    fn build_sorted(&self, sorted_sample: &[f64]) -> Result<Histogram> {
        FixedWidthBuilder::new(Self::bin_count(sorted_sample.len())).build_sorted(sorted_sample)
    }
}

/// Automatic bin width for display histograms
///
/// Takes the smaller of the Freedman-Diaconis width `2 * IQR * n^(-1/3)`
/// and the Sturges width `range / (log2(n) + 1)`. When the IQR is zero only
/// the Sturges width is used.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoRule;

impl AutoRule {
    /// Bin count for an ascending sample
    pub fn bin_count(sorted_sample: &[f64]) -> usize {
        let n = sorted_sample.len();
        if n < 2 {
            return 1;
        }
        let range = sorted_sample[n - 1] - sorted_sample[0];
        if range <= 0.0 || !range.is_finite() {
            return 1;
        }
        let nf = n as f64;
        let sturges = range / (nf.log2() + 1.0);
        let iqr = quantile_sorted(sorted_sample, 0.75) - quantile_sorted(sorted_sample, 0.25);
        let fd = 2.0 * iqr * nf.powf(-1.0 / 3.0);
        let width = if fd > 0.0 { fd.min(sturges) } else { sturges };
        ((range / width).ceil() as usize).max(1)
    }
}

impl HistogramBuilder for AutoRule {
    fn build_sorted(&self, sorted_sample: &[f64]) -> Result<Histogram> {
        FixedWidthBuilder::new(Self::bin_count(sorted_sample)).build_sorted(sorted_sample)
    }
}
