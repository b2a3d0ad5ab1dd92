//! Empirical plotting positions
//!
//! Ranked observations are assigned an exceedance probability so they can be
//! drawn against a fitted curve. Only the Weibull formula `m / (n + 1)` is
//! offered; [`PlottingPosition`] is where alternatives would be added.

use serde::{Deserialize, Serialize};

/// Plotting position formula
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlottingPosition {
    /// `m / (n + 1)`
    #[default]
    Weibull,
}

impl PlottingPosition {
    /// Probability for 1-based rank `m` out of `n`
    pub fn probability(&self, rank: usize, n: usize) -> f64 {
        match self {
            Self::Weibull => rank as f64 / (n as f64 + 1.0),
        }
    }

    /// Probabilities for ranks `1..=n`
    pub fn positions(&self, n: usize) -> Vec<f64> {
        (1..=n).map(|m| self.probability(m, n)).collect()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Weibull => "weibull",
        }
    }
}

/// Weibull positions `m / (n + 1)` for ranks `1..=n`
pub fn weibull_positions(n: usize) -> Vec<f64> {
    PlottingPosition::Weibull.positions(n)
}

/// Empirical non-exceedance quantile at probability `p`
///
/// Linearly interpolates the ascending sample against Weibull positions,
/// clamping to the smallest and largest observation outside their range.
pub fn empirical_quantile(sorted_ascending: &[f64], p: f64) -> f64 {
    let n = sorted_ascending.len();
    if n == 0 {
        return f64::NAN;
    }
    let positions = weibull_positions(n);
    if p <= positions[0] {
        return sorted_ascending[0];
    }
    if p >= positions[n - 1] {
        return sorted_ascending[n - 1];
    }
    // positions are uniform: p_i = (i + 1) / (n + 1)
    let pos = p * (n as f64 + 1.0) - 1.0;
    let lo = pos.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    let frac = pos - lo as f64;
    sorted_ascending[lo] + frac * (sorted_ascending[hi] - sorted_ascending[lo])
}
