//! Logistic distribution on a scaled domain.
//!
//! Parameters are stored in normalized `[0, 1]` units together with an owned
//! [`Scale`]; the true-unit parameters are derived once at construction.
//!
//! Densities are divided by the mass the distribution places on the
//! normalized domain. That mass is integrated numerically over a
//! [`NORM_GRID_POINTS`]-point grid cached on the owned scale, not computed in
//! closed form.

use std::f64::consts::PI;
use std::fmt;

use ergo_core::{Destructured, Distribution, Error, Result, Structured};
use rand::RngCore;
use rand::distr::{Distribution as RandDistribution, Open01};

use crate::math::{logit, sigmoid, std_logistic_logpdf};
use crate::scale::{NormTerm, Scale};

/// Registry tag of [`Logistic`].
pub const LOGISTIC_TAG: &str = "logistic";

/// Lower bound on the normalized dispersion `s`.
pub const MIN_S: f64 = 1e-7;

/// Number of grid points used for the normalization term.
pub const NORM_GRID_POINTS: usize = 100;

/// Logistic distribution with location `loc` and dispersion `s`.
///
/// Immutable once built; [`Logistic::normalize`] and
/// [`Logistic::denormalize`] return new instances.
#[derive(Debug, Clone, PartialEq)]
pub struct Logistic {
    loc: f64,
    s: f64,
    scale: Scale,
    true_loc: f64,
    true_s: f64,
    norm_mass: f64,
    metadata: Option<serde_json::Value>,
}

impl Logistic {
    /// Build from parameters in true units.
    ///
    /// `true_loc()` and `true_s()` return `loc` and `s` exactly as given.
    pub fn new(loc: f64, s: f64, scale: &Scale) -> Self {
        let scale = scale.copy();
        let s_norm = floor_s(s) / scale.width();
        let loc_norm = scale.normalize_point(loc);
        Self::assemble(loc_norm, s_norm, scale, loc, s, "true_units")
    }

    /// Build from parameters already normalized to `[0, 1]`.
    ///
    /// Without a scale the identity `Scale(0, 1)` is used.
    pub fn normalized(loc: f64, s: f64, scale: Option<&Scale>) -> Self {
        let scale = scale.map(Scale::copy).unwrap_or_else(Scale::unit);
        let s_norm = floor_s(s);
        let true_s = s_norm * scale.width();
        let true_loc = scale.denormalize_point(loc);
        Self::assemble(loc, s_norm, scale, true_loc, true_s, "normalized")
    }

    /// Flag-driven constructor.
    ///
    /// With `normalized = false` a scale is required.
    pub fn from_parts(loc: f64, s: f64, scale: Option<&Scale>, normalized: bool) -> Result<Self> {
        match (normalized, scale) {
            (true, scale) => Ok(Self::normalized(loc, s, scale)),
            (false, Some(scale)) => Ok(Self::new(loc, s, scale)),
            (false, None) => Err(Error::Validation(
                "Either a Scale or normalized parameters are required".to_string(),
            )),
        }
    }

    /// Attach an opaque annotation.
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    fn assemble(
        loc: f64,
        s: f64,
        mut scale: Scale,
        true_loc: f64,
        true_s: f64,
        mode: &'static str,
    ) -> Self {
        scale.set_norm_term(norm_grid(loc, s, &scale));
        let norm_mass = scale.density_norm_term();
        tracing::debug!(mode, loc, s, true_loc, true_s, norm_mass, "logistic constructed");
        Self { loc, s, scale, true_loc, true_s, norm_mass, metadata: None }
    }

    /// Location in normalized units.
    pub fn loc(&self) -> f64 {
        self.loc
    }

    /// Dispersion in normalized units, always `>= MIN_S`.
    pub fn s(&self) -> f64 {
        self.s
    }

    pub fn true_loc(&self) -> f64 {
        self.true_loc
    }

    pub fn true_s(&self) -> f64 {
        self.true_s
    }

    /// The scale owned by this distribution, with its normalization grid attached.
    pub fn scale(&self) -> &Scale {
        &self.scale
    }

    pub fn metadata(&self) -> Option<&serde_json::Value> {
        self.metadata.as_ref()
    }

    /// Same distribution on the identity scale.
    pub fn normalize(&self) -> Self {
        self.rescaled(&Scale::unit())
    }

    /// Treat `loc`/`s` as normalized coordinates and place them on `scale`.
    pub fn denormalize(&self, scale: &Scale) -> Self {
        self.rescaled(scale)
    }

    fn rescaled(&self, scale: &Scale) -> Self {
        let out = Self::normalized(self.loc, self.s, Some(scale));
        match &self.metadata {
            Some(m) => out.with_metadata(m.clone()),
            None => out,
        }
    }

    /// Mean in true units.
    pub fn mean(&self) -> f64 {
        self.scale.denormalize_point(self.loc)
    }

    /// Median in true units (equals the mean).
    pub fn median(&self) -> f64 {
        self.mean()
    }

    /// Variance in true units, `(π s)^2 / 3`.
    pub fn variance(&self) -> f64 {
        let s = self.s * self.scale.width();
        (PI * s).powi(2) / 3.0
    }

    #[inline]
    fn standardize(&self, x: f64) -> f64 {
        (self.scale.normalize_point(x) - self.loc) / self.s
    }

    #[inline]
    fn quantile_normalized(&self, q: f64) -> f64 {
        self.loc + self.s * logit(q)
    }
}

fn floor_s(s: f64) -> f64 {
    let floored = s.max(MIN_S);
    if floored != s {
        tracing::trace!(s, min_s = MIN_S, "logistic dispersion floored");
    }
    floored
}

/// Normalized-space densities on an evenly spaced grid over `[0, 1]`.
fn norm_grid(loc: f64, s: f64, scale: &Scale) -> NormTerm {
    let true_xs = scale.true_grid(NORM_GRID_POINTS);
    let ln_s = s.ln();
    let densities = true_xs
        .iter()
        .map(|&x| (std_logistic_logpdf((scale.normalize_point(x) - loc) / s) - ln_s).exp())
        .collect();
    NormTerm { true_xs, densities, normalized: true }
}

impl Distribution for Logistic {
    fn name(&self) -> &str {
        LOGISTIC_TAG
    }

    fn pdf(&self, x: f64) -> f64 {
        let z = self.standardize(x);
        (std_logistic_logpdf(z) - self.s.ln()).exp() / self.norm_mass
    }

    fn logpdf(&self, x: f64) -> f64 {
        let z = self.standardize(x);
        std_logistic_logpdf(z) - self.s.ln() - self.norm_mass.ln()
    }

    fn cdf(&self, x: f64) -> f64 {
        sigmoid(self.standardize(x))
    }

    fn ppf(&self, q: f64) -> f64 {
        self.scale.denormalize_point(self.quantile_normalized(q))
    }

    fn sample(&self, rng: &mut dyn RngCore) -> f64 {
        let u: f64 = Open01.sample(rng);
        self.scale.denormalize_point(self.quantile_normalized(u))
    }
}

impl Structured for Logistic {
    fn destructure(&self) -> Destructured {
        Destructured::node(LOGISTIC_TAG, vec![self.loc, self.s], vec![self.scale.destructure()])
    }

    fn structure(params: &Destructured) -> Result<Self> {
        params.expect_tag(LOGISTIC_TAG)?;
        params.expect_arity(2, 1)?;
        let scale = Scale::structure(&params.child(0)?)?;
        let v = params.values();
        Ok(Self::normalized(v[0], v[1], Some(&scale)))
    }
}

impl fmt::Display for Logistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Logistic(scale={}, true_loc={}, true_s={}, normed_loc={}, normed_s={}, metadata=",
            self.scale, self.true_loc, self.true_s, self.loc, self.s
        )?;
        match &self.metadata {
            Some(m) => write!(f, "{m})"),
            None => write!(f, "None)"),
        }
    }
}
