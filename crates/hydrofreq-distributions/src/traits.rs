//! The distribution capability trait and its parameter tuple

use crate::error::Result;
use serde::Serialize;
use std::fmt;

/// Fitted parameters in positional order `(shape..., loc, scale)`
///
/// Two-parameter families carry no shape; three-parameter families carry one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterSet {
    shape: Vec<f64>,
    loc: f64,
    scale: f64,
}

impl ParameterSet {
    /// Location/scale family parameters
    pub fn loc_scale(loc: f64, scale: f64) -> Self {
        Self {
            shape: Vec::new(),
            loc,
            scale,
        }
    }

    /// One shape parameter plus location/scale
    pub fn with_shape(shape: f64, loc: f64, scale: f64) -> Self {
        Self {
            shape: vec![shape],
            loc,
            scale,
        }
    }

    /// From a positional tuple: the last two values are loc and scale
    ///
    /// Returns `None` for fewer than two values.
    pub fn from_positional(values: &[f64]) -> Option<Self> {
        let n = values.len();
        if n < 2 {
            return None;
        }
        Some(Self {
            shape: values[..n - 2].to_vec(),
            loc: values[n - 2],
            scale: values[n - 1],
        })
    }

    /// All shape parameters
    pub fn shapes(&self) -> &[f64] {
        &self.shape
    }

    /// First shape parameter, if any
    pub fn shape(&self) -> Option<f64> {
        self.shape.first().copied()
    }

    pub fn loc(&self) -> f64 {
        self.loc
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Parameter count `k` used by information criteria
    pub fn len(&self) -> usize {
        self.shape.len() + 2
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Positional tuple `(shape..., loc, scale)`
    pub fn to_vec(&self) -> Vec<f64> {
        let mut v = self.shape.clone();
        v.push(self.loc);
        v.push(self.scale);
        v
    }

    /// True when every value is finite
    pub fn is_finite(&self) -> bool {
        self.shape.iter().all(|s| s.is_finite()) && self.loc.is_finite() && self.scale.is_finite()
    }
}

impl fmt::Display for ParameterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for s in &self.shape {
            write!(f, "shape={s:.4}, ")?;
        }
        write!(f, "loc={:.4}, scale={:.4}", self.loc, self.scale)
    }
}

/// A distribution family that can be fitted to a sample and evaluated
///
/// Implementers are stateless; the fitted state lives in [`ParameterSet`].
/// Evaluation outside the support returns the natural limit (density 0,
/// CDF 0 or 1) rather than an error. Invalid parameters yield NaN.
pub trait DistributionModel: Send + Sync {
    /// Registry key, e.g. `"gumbel"`
    fn key(&self) -> &'static str;

    /// Display name, e.g. `"Gumbel (EV1)"`
    fn name(&self) -> &'static str;

    /// Parameter names in positional order
    fn parameter_names(&self) -> &'static [&'static str];

    /// Number of fitted parameters
    fn parameter_count(&self) -> usize {
        self.parameter_names().len()
    }

    /// Maximum-likelihood (or closed-form) fit
    fn fit(&self, data: &[f64]) -> Result<ParameterSet>;

    /// Log density
    fn logpdf(&self, x: f64, params: &ParameterSet) -> f64;

    /// Density
    fn pdf(&self, x: f64, params: &ParameterSet) -> f64 {
        self.logpdf(x, params).exp()
    }

    /// Cumulative distribution function
    fn cdf(&self, x: f64, params: &ParameterSet) -> f64;

    /// Inverse CDF (percent point function)
    fn ppf(&self, p: f64, params: &ParameterSet) -> f64;

    /// Sum of log densities
    fn log_likelihood(&self, data: &[f64], params: &ParameterSet) -> f64 {
        data.iter().map(|&x| self.logpdf(x, params)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_normalisation() {
        let two = ParameterSet::from_positional(&[10.0, 2.0]).unwrap();
        assert_eq!(two.shape(), None);
        assert_eq!(two.loc(), 10.0);
        assert_eq!(two.scale(), 2.0);
        assert_eq!(two.len(), 2);

        let three = ParameterSet::from_positional(&[0.1, 10.0, 2.0]).unwrap();
        assert_eq!(three.shape(), Some(0.1));
        assert_eq!(three.len(), 3);
        assert_eq!(three.to_vec(), vec![0.1, 10.0, 2.0]);

        let four = ParameterSet::from_positional(&[0.1, 0.2, 10.0, 2.0]).unwrap();
        assert_eq!(four.shapes(), &[0.1, 0.2]);

        assert!(ParameterSet::from_positional(&[1.0]).is_none());
    }

    #[test]
    fn test_display_and_serialize() {
        let p = ParameterSet::with_shape(0.25, 100.0, 20.0);
        assert_eq!(p.to_string(), "shape=0.2500, loc=100.0000, scale=20.0000");
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, r#"{"shape":[0.25],"loc":100.0,"scale":20.0}"#);
    }
}
