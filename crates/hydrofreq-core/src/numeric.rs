//! Finite-or-null helpers for serialized outputs
//!
//! Analysis results keep `f64::INFINITY` internally (a failed fit has an
//! infinite AIC so it sorts last) but every number that leaves the library
//! must be finite or `null`.

use serde::Serializer;

/// `Some(x)` when finite
#[inline]
pub fn finite_or_none(x: f64) -> Option<f64> {
    x.is_finite().then_some(x)
}

/// Serde adapter: serialize a bare `f64` as `null` when non-finite
pub mod finite_or_null {
    use super::*;

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        match finite_or_none(*value) {
            Some(v) => serializer.serialize_f64(v),
            None => serializer.serialize_none(),
        }
    }
}

/// Serde adapter: serialize an `Option<f64>` as `null` when absent or non-finite
pub mod option_finite_or_null {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
        match value.and_then(finite_or_none) {
            Some(v) => serializer.serialize_f64(v),
            None => serializer.serialize_none(),
        }
    }
}

/// Serde adapter: serialize a `Vec<f64>` with non-finite entries as `null`
pub mod vec_finite_or_null {
    use super::*;
    use serde::ser::SerializeSeq;

    pub fn serialize<S: Serializer>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(values.len()))?;
        for v in values {
            seq.serialize_element(&finite_or_none(*v))?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Sample {
        #[serde(with = "finite_or_null")]
        aic: f64,
        #[serde(with = "option_finite_or_null")]
        p: Option<f64>,
        #[serde(with = "vec_finite_or_null")]
        curve: Vec<f64>,
    }

    #[test]
    fn test_non_finite_serializes_as_null() {
        let s = Sample {
            aic: f64::INFINITY,
            p: Some(f64::NAN),
            curve: vec![1.0, f64::NEG_INFINITY],
        };
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, r#"{"aic":null,"p":null,"curve":[1.0,null]}"#);
    }

    #[test]
    fn test_finite_passes_through() {
        let s = Sample {
            aic: 12.5,
            p: Some(0.25),
            curve: vec![],
        };
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, r#"{"aic":12.5,"p":0.25,"curve":[]}"#);
        assert_eq!(finite_or_none(f64::NAN), None);
    }
}
