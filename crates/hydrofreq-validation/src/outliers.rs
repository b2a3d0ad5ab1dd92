//! Outlier screening of the annual series
//!
//! Four detectors run side by side: z-score, modified z-score (MAD based),
//! Tukey's IQR fences and iterative Grubbs. The report carries each
//! detector's indices plus their union.

use crate::outcome::TestOutcome;
use hydrofreq_core::math::distributions::student_t;
use hydrofreq_core::utils::{mad, mean, median, population_std_dev, quartiles, std_dev};
use hydrofreq_core::{NumericDegeneracy, Result};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::warn;

/// Fewest values for outlier screening and the Grubbs test
pub const MIN_VALUES_FOR_OUTLIERS: usize = 3;

/// |z| above this is a z-score outlier (population standard deviation)
pub const Z_SCORE_THRESHOLD: f64 = 3.0;
/// |0.6745 (x - median) / MAD| above this is a modified z-score outlier
pub const MODIFIED_Z_THRESHOLD: f64 = 3.5;
/// Tukey fence multiplier
pub const IQR_MULTIPLIER: f64 = 1.5;

const MODIFIED_Z_SCALE: f64 = 0.6745;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrubbsOutlier {
    /// Position in the input slice
    pub index: usize,
    pub value: f64,
    /// `max |x - mean| / s` at the iteration that removed the value
    pub statistic: f64,
    pub critical_value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GrubbsResult {
    /// Outliers in removal order
    pub outliers: Vec<GrubbsOutlier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degeneracy: Option<NumericDegeneracy>,
}

impl GrubbsResult {
    pub fn count(&self) -> usize {
        self.outliers.len()
    }

    pub fn indices(&self) -> Vec<usize> {
        self.outliers.iter().map(|o| o.index).collect()
    }
}

/// Two-sided Grubbs critical value for a sample of `n`
///
/// `G = ((n - 1) / sqrt(n)) sqrt(t^2 / (n - 2 + t^2))` with
/// `t = t_{1 - alpha / (2n), n - 2}`.
pub fn grubbs_critical_value(n: usize, alpha: f64) -> Result<f64> {
    let nf = n as f64;
    let t = student_t::ppf(1.0 - alpha / (2.0 * nf), nf - 2.0)?;
    let t2 = t * t;
    Ok((nf - 1.0) / nf.sqrt() * (t2 / (nf - 2.0 + t2)).sqrt())
}

/// Iterative Grubbs test
///
/// Removes the most extreme value while its statistic exceeds the critical
/// value, recomputing both on the reduced sample. Stops below three values
/// or once the spread vanishes.
pub fn grubbs(values: &[f64], alpha: f64) -> Result<GrubbsResult> {
    let mut result = GrubbsResult::default();
    if values.len() < MIN_VALUES_FOR_OUTLIERS {
        return Ok(result);
    }

    let mut remaining: Vec<(usize, f64)> = values.iter().copied().enumerate().collect();
    while remaining.len() >= MIN_VALUES_FOR_OUTLIERS {
        let data: Vec<f64> = remaining.iter().map(|&(_, v)| v).collect();
        let sd = std_dev(&data);
        if sd == 0.0 {
            if result.outliers.is_empty() {
                warn!(n = data.len(), "zero spread, Grubbs test skipped");
                result.degeneracy = Some(NumericDegeneracy::ZeroSpread);
            }
            break;
        }
        let m = mean(&data);
        let (pos, statistic) = data
            .iter()
            .map(|v| (v - m).abs() / sd)
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (i, g)| {
                if g > best.1 {
                    (i, g)
                } else {
                    best
                }
            });
        let critical_value = grubbs_critical_value(data.len(), alpha)?;
        if statistic <= critical_value {
            break;
        }
        let (index, value) = remaining.remove(pos);
        result.outliers.push(GrubbsOutlier {
            index,
            value,
            statistic,
            critical_value,
        });
    }
    Ok(result)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlierReport {
    pub z_score: Vec<usize>,
    pub modified_z: Vec<usize>,
    pub iqr: Vec<usize>,
    pub grubbs: GrubbsResult,
    /// Sorted union of all detectors
    pub combined: Vec<usize>,
    pub outlier_values: Vec<f64>,
    pub outlier_percentage: f64,
    pub degeneracies: Vec<NumericDegeneracy>,
    pub recommendation: String,
}

pub fn z_score_outliers(values: &[f64], threshold: f64) -> Vec<usize> {
    let sd = population_std_dev(values);
    if sd == 0.0 {
        return Vec::new();
    }
    let m = mean(values);
    indices_where(values, |v| ((v - m) / sd).abs() > threshold)
}

/// Empty when the MAD is zero
pub fn modified_z_outliers(values: &[f64], threshold: f64) -> Vec<usize> {
    let mad = mad(values);
    if mad == 0.0 {
        return Vec::new();
    }
    let med = median(values);
    indices_where(values, |v| (MODIFIED_Z_SCALE * (v - med) / mad).abs() > threshold)
}

pub fn iqr_outliers(values: &[f64], multiplier: f64) -> Vec<usize> {
    let (q1, q3) = quartiles(values);
    let iqr = q3 - q1;
    let (lower, upper) = (q1 - multiplier * iqr, q3 + multiplier * iqr);
    indices_where(values, |v| v < lower || v > upper)
}

fn indices_where(values: &[f64], pred: impl Fn(f64) -> bool) -> Vec<usize> {
    values
        .iter()
        .enumerate()
        .filter(|&(_, &v)| pred(v))
        .map(|(i, _)| i)
        .collect()
}

/// Runs every detector and reports their union
pub fn detect_outliers(values: &[f64], alpha: f64) -> Result<TestOutcome<OutlierReport>> {
    if values.len() < MIN_VALUES_FOR_OUTLIERS {
        return Ok(TestOutcome::insufficient(
            "outlier detection",
            MIN_VALUES_FOR_OUTLIERS,
            values.len(),
        ));
    }

    let z_score = z_score_outliers(values, Z_SCORE_THRESHOLD);
    let modified_z = modified_z_outliers(values, MODIFIED_Z_THRESHOLD);
    let iqr = iqr_outliers(values, IQR_MULTIPLIER);
    let grubbs = grubbs(values, alpha)?;

    let mut degeneracies = Vec::new();
    if let Some(d) = grubbs.degeneracy {
        degeneracies.push(d);
    }
    if mad(values) == 0.0 {
        warn!("zero MAD, modified z-score screening skipped");
        degeneracies.push(NumericDegeneracy::ZeroMad);
    }

    let combined: BTreeSet<usize> = z_score
        .iter()
        .chain(&modified_z)
        .chain(&iqr)
        .copied()
        .chain(grubbs.indices())
        .collect();
    let combined: Vec<usize> = combined.into_iter().collect();
    let outlier_values = combined.iter().map(|&i| values[i]).collect();
    let outlier_percentage = combined.len() as f64 / values.len() as f64 * 100.0;
    let recommendation = if combined.is_empty() {
        "No significant outliers detected"
    } else {
        "Review outliers for data quality"
    };

    Ok(TestOutcome::Performed(OutlierReport {
        z_score,
        modified_z,
        iqr,
        grubbs,
        combined,
        outlier_values,
        outlier_percentage,
        degeneracies,
        recommendation: recommendation.to_string(),
    }))
}
