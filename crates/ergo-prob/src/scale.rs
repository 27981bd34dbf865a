//! Affine scale between true units and the normalized `[0, 1]` domain.

use std::fmt;

use ergo_core::{Destructured, Error, Result, Structured};

use crate::math::{linspace, trapezoid};

/// Registry tag of [`Scale`].
pub const SCALE_TAG: &str = "scale";

/// Density grid cached on a [`Scale`] by the distribution that owns it.
#[derive(Debug, Clone, PartialEq)]
pub struct NormTerm {
    /// Grid points in true units.
    pub true_xs: Vec<f64>,
    /// Density at each grid point.
    pub densities: Vec<f64>,
    /// `true` when `densities` are expressed in normalized space.
    pub normalized: bool,
}

/// Linear map `x -> (x - low) / (high - low)`.
///
/// Carries an optional [`NormTerm`] cache. A scale copied into a
/// distribution is owned by that distribution alone, so the cache never leaks
/// between instances.
#[derive(Debug, Clone, PartialEq)]
pub struct Scale {
    low: f64,
    high: f64,
    width: f64,
    norm_term: Option<NormTerm>,
}

impl Scale {
    /// Create a scale over `[low, high]`.
    pub fn new(low: f64, high: f64) -> Result<Self> {
        if !low.is_finite() || !high.is_finite() {
            return Err(Error::Validation(format!(
                "scale bounds must be finite, got low={low}, high={high}"
            )));
        }
        if high <= low {
            return Err(Error::Validation(format!(
                "scale requires low < high, got low={low}, high={high}"
            )));
        }
        Ok(Self { low, high, width: high - low, norm_term: None })
    }

    /// Identity scale `[0, 1]`.
    pub fn unit() -> Self {
        Self { low: 0.0, high: 1.0, width: 1.0, norm_term: None }
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    /// Span of the true domain, `high - low`.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// True -> normalized.
    #[inline]
    pub fn normalize_point(&self, x: f64) -> f64 {
        (x - self.low) / self.width
    }

    /// Normalized -> true.
    #[inline]
    pub fn denormalize_point(&self, y: f64) -> f64 {
        y * self.width + self.low
    }

    pub fn normalize_points(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.normalize_point(x)).collect()
    }

    pub fn denormalize_points(&self, ys: &[f64]) -> Vec<f64> {
        ys.iter().map(|&y| self.denormalize_point(y)).collect()
    }

    /// Independent deep copy, cache included.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// `true` when both scales describe the same affine map (caches ignored).
    pub fn same_affine(&self, other: &Scale) -> bool {
        self.low == other.low && self.high == other.high
    }

    pub fn set_norm_term(&mut self, term: NormTerm) {
        self.norm_term = Some(term);
    }

    pub fn norm_term_cache(&self) -> Option<&NormTerm> {
        self.norm_term.as_ref()
    }

    /// Scalar density correction derived from the cached grid.
    ///
    /// Trapezoidal integral of the cached densities over the normalized grid
    /// points, i.e. the mass the owning distribution places on `[0, 1]`.
    /// Without a cache (or with a degenerate grid) the correction is `1.0`.
    pub fn density_norm_term(&self) -> f64 {
        let Some(term) = &self.norm_term else {
            return 1.0;
        };
        let xs = if term.normalized {
            self.normalize_points(&term.true_xs)
        } else {
            term.true_xs.clone()
        };
        let mass = trapezoid(&xs, &term.densities);
        if !mass.is_finite() || mass <= 0.0 {
            tracing::warn!(mass, n_points = xs.len(), "degenerate normalization grid; using 1.0");
            return 1.0;
        }
        mass
    }

    /// Evenly spaced grid of `n` normalized points, returned in true units.
    pub fn true_grid(&self, n: usize) -> Vec<f64> {
        self.denormalize_points(&linspace(0.0, 1.0, n))
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::unit()
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scale(low={}, high={})", self.low, self.high)
    }
}

impl Structured for Scale {
    fn destructure(&self) -> Destructured {
        Destructured::node(SCALE_TAG, vec![self.low, self.high], vec![])
    }

    fn structure(params: &Destructured) -> Result<Self> {
        params.expect_tag(SCALE_TAG)?;
        params.expect_arity(2, 0)?;
        let v = params.values();
        Scale::new(v[0], v[1])
    }
}
