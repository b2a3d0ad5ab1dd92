//! Return-period curves, tables and design values
//!
//! Exceedance probability `P` and return period `T` are related by
//! `T = 1 / P`; a theoretical value is always `ppf(1 - P)`. Empirical
//! probabilities use Weibull plotting positions `m / (n + 1)` with `m` the
//! descending rank.

use crate::engine::FittedModel;
use hydrofreq_confidence::{Bootstrap, BootstrapMethod, ConfidenceInterval};
use hydrofreq_core::math::{linspace, logspace, round_to};
use hydrofreq_core::numeric::{finite_or_null, vec_finite_or_null};
use hydrofreq_core::utils::{sorted, sorted_descending};
use hydrofreq_core::{empirical_quantile, AnnualSeries, Error, PlottingPosition, Result, MIN_YEARS_FOR_TABLE};
use hydrofreq_histogram::{AutoRule, HistogramBuilder};
use serde::Serialize;
use tracing::{debug, instrument, warn};

/// Engineering design grid, exceedance probability in percent
pub const DESIGN_GRID_PERCENT: [f64; 27] = [
    0.01, 0.10, 0.20, 0.33, 0.50, 1.00, 1.50, 2.00, 3.00, 5.00, 10.00, 20.00, 25.00, 30.00, 40.00,
    50.00, 60.00, 70.00, 75.00, 80.00, 85.00, 90.00, 95.00, 97.00, 99.00, 99.90, 99.99,
];

/// Return periods reported by [`design_values`] by default, in years
pub const STANDARD_RETURN_PERIODS: [f64; 9] = [2.0, 5.0, 10.0, 20.0, 50.0, 100.0, 200.0, 500.0, 1000.0];

/// Points on the frequency-curve grid
pub const CURVE_POINTS: usize = 200;

/// Points on the quantile-data grid
pub const QUANTILE_POINTS: usize = 100;

/// Exceedance percentages log-spaced from 0.01 % to 99.9 %
pub fn curve_grid_percent() -> Vec<f64> {
    logspace(0.01f64.log10(), 99.9f64.log10(), CURVE_POINTS)
}

/// Exceedance probabilities evenly spaced from 0.01 to 0.99
pub fn quantile_grid() -> Vec<f64> {
    linspace(0.01, 0.99, QUANTILE_POINTS)
}

/// `ppf(1 - p)` for each exceedance probability `p`
pub fn theoretical_curve(fitted: &FittedModel, exceedance_probabilities: &[f64]) -> Vec<f64> {
    exceedance_probabilities
        .iter()
        .map(|&p| fitted.ppf(1.0 - p))
        .collect()
}

/// One observation with its plotting position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmpiricalPoint {
    /// Descending rank, 1 for the largest value
    pub rank: usize,
    pub value: f64,
    pub exceedance_probability: f64,
    pub return_period: f64,
}

/// Observations sorted descending with Weibull exceedance probabilities
pub fn empirical_points(values: &[f64]) -> Vec<EmpiricalPoint> {
    let n = values.len();
    let position = PlottingPosition::Weibull;
    sorted_descending(values)
        .into_iter()
        .enumerate()
        .map(|(i, value)| {
            let p = position.probability(i + 1, n);
            EmpiricalPoint {
                rank: i + 1,
                value,
                exceedance_probability: p,
                return_period: 1.0 / p,
            }
        })
        .collect()
}

/// A point on a frequency curve, probability in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurvePoint {
    pub p_percent: f64,
    #[serde(with = "finite_or_null")]
    pub q: f64,
}

/// Theoretical frequency curve with the observed points overlaid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyCurve {
    pub theoretical_curve: Vec<CurvePoint>,
    pub empirical_points: Vec<CurvePoint>,
}

/// Frequency curve on the 200-point log grid, both series ascending in `p_percent`
pub fn frequency_curve(fitted: &FittedModel, values: &[f64]) -> FrequencyCurve {
    let grid = curve_grid_percent();
    let probabilities: Vec<f64> = grid.iter().map(|p| p / 100.0).collect();
    let theoretical_curve = grid
        .iter()
        .zip(theoretical_curve(fitted, &probabilities))
        .map(|(&p_percent, q)| CurvePoint { p_percent, q })
        .collect();
    let empirical_points = empirical_points(values)
        .into_iter()
        .map(|pt| CurvePoint {
            p_percent: pt.exceedance_probability * 100.0,
            q: pt.value,
        })
        .collect();
    FrequencyCurve {
        theoretical_curve,
        empirical_points,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QqPoint {
    pub p_empirical: f64,
    pub sample: f64,
    #[serde(with = "finite_or_null")]
    pub theoretical: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PpPoint {
    pub empirical: f64,
    #[serde(with = "finite_or_null")]
    pub theoretical: f64,
}

/// Quantile-quantile and probability-probability plot data
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QqPp {
    pub qq: Vec<QqPoint>,
    pub pp: Vec<PpPoint>,
}

/// QQ/PP data over the ascending sample with non-exceedance `(i + 1) / (n + 1)`
pub fn qq_pp(fitted: &FittedModel, values: &[f64]) -> QqPp {
    let ascending = sorted(values);
    let n = ascending.len();
    let (qq, pp) = ascending
        .iter()
        .enumerate()
        .map(|(i, &sample)| {
            let p = (i + 1) as f64 / (n + 1) as f64;
            (
                QqPoint {
                    p_empirical: p,
                    sample,
                    theoretical: fitted.ppf(p),
                },
                PpPoint {
                    empirical: p,
                    theoretical: fitted.cdf(sample),
                },
            )
        })
        .unzip();
    QqPp { qq, pp }
}

/// One row of the empirical frequency table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyTableRow {
    /// Position in year order, starting at 1
    pub order: usize,
    /// Hydrological year label, e.g. `"1990-1991"`
    pub period: String,
    pub value: f64,
    pub exceedance_percent: f64,
    /// Descending rank; ties share the smallest rank
    pub rank: usize,
}

/// Ranked Weibull frequency table in year order
///
/// Needs at least two years. Values and percentages are rounded to two
/// decimals.
#[instrument(skip(series), fields(n = series.len()))]
pub fn frequency_table(series: &AnnualSeries) -> Result<Vec<FrequencyTableRow>> {
    series.require_years(MIN_YEARS_FOR_TABLE, "frequency table")?;
    let n = series.len();
    if n < 10 {
        warn!(n, "Short record: empirical frequencies are highly uncertain");
    }
    let values = series.values();
    Ok(series
        .iter()
        .enumerate()
        .map(|(i, (year, value))| {
            let rank = 1 + values.iter().filter(|&&v| v > value).count();
            FrequencyTableRow {
                order: i + 1,
                period: format!("{}-{}", year, year + 1),
                value: round_to(value, 2),
                exceedance_percent: round_to(rank as f64 / (n + 1) as f64 * 100.0, 2),
                rank,
            }
        })
        .collect())
}

/// One row of a design table: probability, value and return period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DesignRow {
    pub order: usize,
    pub p_percent: f64,
    #[serde(with = "finite_or_null")]
    pub value: f64,
    pub return_period: f64,
}

/// Design-grid values from a fitted model next to the observed ranking
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyByModel {
    pub theoretical_curve: Vec<DesignRow>,
    pub empirical_points: Vec<DesignRow>,
}

/// Fitted values on the 27-point design grid plus the empirical equivalent
///
/// Percentages and values are rounded to two decimals, return periods to
/// three.
pub fn frequency_table_by_model(fitted: &FittedModel, values: &[f64]) -> FrequencyByModel {
    let theoretical_curve = DESIGN_GRID_PERCENT
        .iter()
        .enumerate()
        .map(|(i, &p_percent)| DesignRow {
            order: i + 1,
            p_percent: round_to(p_percent, 2),
            value: round_to(fitted.ppf(1.0 - p_percent / 100.0), 2),
            return_period: round_to(100.0 / p_percent, 3),
        })
        .collect();
    let empirical_points = empirical_points(values)
        .into_iter()
        .map(|pt| DesignRow {
            order: pt.rank,
            p_percent: round_to(pt.exceedance_probability * 100.0, 2),
            value: round_to(pt.value, 2),
            return_period: round_to(pt.return_period, 3),
        })
        .collect();
    FrequencyByModel {
        theoretical_curve,
        empirical_points,
    }
}

/// Display histogram with expected counts under the fitted model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramData {
    pub counts: Vec<usize>,
    pub bin_edges: Vec<f64>,
    pub bin_midpoints: Vec<f64>,
    #[serde(with = "vec_finite_or_null")]
    pub expected_counts: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurveData {
    pub probabilities: Vec<f64>,
    #[serde(with = "vec_finite_or_null")]
    pub values: Vec<f64>,
}

/// Series, histogram and theoretical curve for a quantile plot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuantileData {
    pub years: Vec<i32>,
    pub values: Vec<f64>,
    pub histogram: HistogramData,
    pub theoretical_curve: CurveData,
}

/// Automatic-width histogram of the series with the fitted curve on a
/// 100-point exceedance grid
pub fn quantile_data(fitted: &FittedModel, series: &AnnualSeries) -> Result<QuantileData> {
    let values = series.values();
    let histogram = AutoRule.build(values)?;
    // raw differences, no floor: these are only plotted
    let n = values.len() as f64;
    let expected_counts = histogram
        .bins()
        .iter()
        .map(|b| n * (fitted.cdf(b.right) - fitted.cdf(b.left)))
        .collect();
    let probabilities = quantile_grid();
    let curve = theoretical_curve(fitted, &probabilities);
    Ok(QuantileData {
        years: series.years().to_vec(),
        values: values.to_vec(),
        histogram: HistogramData {
            counts: histogram.counts(),
            bin_edges: histogram.edges(),
            bin_midpoints: histogram.centers(),
            expected_counts,
        },
        theoretical_curve: CurveData {
            probabilities,
            values: curve,
        },
    })
}

/// Design value for one return period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnPeriodEstimate {
    pub return_period: f64,
    pub exceedance_probability: f64,
    pub non_exceedance_probability: f64,
    #[serde(with = "finite_or_null")]
    pub theoretical_value: f64,
    pub confidence_interval: Option<ConfidenceInterval>,
    /// Empirical quantile from Weibull plotting positions at the same probability
    #[serde(with = "finite_or_null")]
    pub empirical_plotting_position: f64,
}

/// Design values with model-refit bootstrap intervals
///
/// Every resample is refitted with the same family and the interval is
/// taken over the refitted quantiles. Resamples that fail to fit are
/// skipped; if the bootstrap fails altogether the intervals are `None`.
#[instrument(skip(fitted, values, bootstrap), fields(family = fitted.key(), n = values.len()))]
pub fn design_values<M: BootstrapMethod>(
    fitted: &FittedModel,
    values: &[f64],
    return_periods: &[f64],
    bootstrap: &Bootstrap<M>,
) -> Result<Vec<ReturnPeriodEstimate>> {
    if let Some(&bad) = return_periods.iter().find(|&&t| !(t > 1.0 && t.is_finite())) {
        return Err(Error::InvalidParameter(format!(
            "Return period {bad} must be greater than one year"
        )));
    }
    let probabilities: Vec<f64> = return_periods.iter().map(|t| 1.0 - 1.0 / t).collect();
    let ascending = sorted(values);

    let model = fitted.model();
    let refit = |resample: &[f64]| {
        let params = model.fit(resample).ok()?;
        Some(probabilities.iter().map(|&p| model.ppf(p, &params)).collect::<Vec<f64>>())
    };
    let intervals = match bootstrap.vector_confidence_intervals(values, refit) {
        Ok(cis) => Some(cis),
        Err(err) => {
            warn!(error = %err, "Bootstrap for design values failed");
            None
        }
    };

    let estimates = return_periods
        .iter()
        .zip(&probabilities)
        .enumerate()
        .map(|(i, (&t, &p))| {
            let theoretical_value = fitted.ppf(p);
            let confidence_interval = intervals.as_ref().map(|cis| {
                let ci = cis[i];
                ConfidenceInterval::new(ci.lower, ci.upper, theoretical_value, ci.confidence_level)
            });
            ReturnPeriodEstimate {
                return_period: t,
                exceedance_probability: 1.0 - p,
                non_exceedance_probability: p,
                theoretical_value,
                confidence_interval,
                empirical_plotting_position: empirical_quantile(&ascending, p),
            }
        })
        .collect::<Vec<_>>();
    debug!(count = estimates.len(), "Design values computed");
    Ok(estimates)
}
