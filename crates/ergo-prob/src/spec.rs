//! Serde configuration specs for building distributions from JSON.
//!
//! ```json
//! { "type": "logistic", "loc": 40.0, "s": 3.0, "scale": { "low": 0.0, "high": 100.0 } }
//! ```

use serde::{Deserialize, Serialize};

use ergo_core::{Distribution, Result};

use crate::logistic::Logistic;
use crate::scale::Scale;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleSpec {
    pub low: f64,
    pub high: f64,
}

impl ScaleSpec {
    pub fn build(&self) -> Result<Scale> {
        Scale::new(self.low, self.high)
    }
}

impl From<&Scale> for ScaleSpec {
    fn from(scale: &Scale) -> Self {
        Self { low: scale.low(), high: scale.high() }
    }
}

/// Logistic parameters as found in configuration.
///
/// `loc`/`s` are in true units unless `normalized` is set, mirroring
/// [`Logistic::from_parts`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticSpec {
    pub loc: f64,
    pub s: f64,
    #[serde(default)]
    pub scale: Option<ScaleSpec>,
    #[serde(default)]
    pub normalized: bool,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

impl LogisticSpec {
    pub fn build(&self) -> Result<Logistic> {
        let scale = self.scale.as_ref().map(ScaleSpec::build).transpose()?;
        let d = Logistic::from_parts(self.loc, self.s, scale.as_ref(), self.normalized)?;
        Ok(match &self.metadata {
            Some(m) => d.with_metadata(m.clone()),
            None => d,
        })
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

impl From<&Logistic> for LogisticSpec {
    /// Normalized form; rebuilding yields the same `loc`, `s` and scale.
    fn from(d: &Logistic) -> Self {
        Self {
            loc: d.loc(),
            s: d.s(),
            scale: Some(ScaleSpec::from(d.scale())),
            normalized: true,
            metadata: d.metadata().cloned(),
        }
    }
}

/// Any distribution family, tagged by `"type"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DistributionSpec {
    Logistic(LogisticSpec),
}

impl DistributionSpec {
    pub fn build(&self) -> Result<Box<dyn Distribution>> {
        match self {
            DistributionSpec::Logistic(spec) => Ok(Box::new(spec.build()?)),
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ergo_core::Error;

    #[test]
    fn test_true_unit_spec() {
        let spec = LogisticSpec::from_json_str(
            r#"{"loc": 40.0, "s": 3.0, "scale": {"low": 0.0, "high": 100.0}}"#,
        )
        .unwrap();
        assert!(!spec.normalized);
        let d = spec.build().unwrap();
        assert_eq!(d.true_loc(), 40.0);
        assert_eq!(d.true_s(), 3.0);
        assert_relative_eq!(d.loc(), 0.4);
    }

    #[test]
    fn test_missing_scale_without_normalized_fails() {
        let spec = LogisticSpec::from_json_str(r#"{"loc": 0.5, "s": 0.1}"#).unwrap();
        match spec.build() {
            Err(Error::Validation(msg)) => assert!(msg.contains("Either a Scale")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_normalized_spec_defaults_to_unit_scale() {
        let spec = LogisticSpec::from_json_str(
            r#"{"loc": 0.5, "s": 0.1, "normalized": true, "metadata": {"id": "q1"}}"#,
        )
        .unwrap();
        let d = spec.build().unwrap();
        assert!(d.scale().same_affine(&Scale::unit()));
        assert_eq!(d.metadata().unwrap()["id"], "q1");
    }

    #[test]
    fn test_invalid_json_maps_to_json_error() {
        assert!(matches!(LogisticSpec::from_json_str("{"), Err(Error::Json(_))));
        assert!(matches!(
            DistributionSpec::from_json_str(r#"{"type": "beta", "a": 1}"#),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn test_invalid_scale_bounds() {
        let spec = LogisticSpec::from_json_str(
            r#"{"loc": 1.0, "s": 1.0, "scale": {"low": 5.0, "high": 5.0}}"#,
        )
        .unwrap();
        assert!(matches!(spec.build(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_tagged_distribution_spec() {
        let spec = DistributionSpec::from_json_str(
            r#"{"type": "logistic", "loc": 40.0, "s": 3.0, "scale": {"low": 0.0, "high": 100.0}}"#,
        )
        .unwrap();
        let d = spec.build().unwrap();
        assert_eq!(d.name(), "logistic");
        assert_relative_eq!(d.ppf(0.5), 40.0, epsilon = 1e-9);
    }

    #[test]
    fn test_spec_from_logistic_rebuilds_equivalent() {
        let d = Logistic::new(7.0, 2.0, &Scale::new(-10.0, 10.0).unwrap());
        let spec = LogisticSpec::from(&d);
        let json = serde_json::to_string(&spec).unwrap();
        let back = LogisticSpec::from_json_str(&json).unwrap().build().unwrap();
        assert_eq!(back.loc(), d.loc());
        assert_eq!(back.s(), d.s());
        assert!(back.scale().same_affine(d.scale()));
    }
}
