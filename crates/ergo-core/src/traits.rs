//! Core traits for ergo
//!
//! Concrete distribution families live in `ergo-prob`; code that consumes
//! distributions polymorphically (registries, batch evaluation, samplers)
//! depends only on the [`Distribution`] capability defined here.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;

use crate::structure::Structured;
use crate::{Error, Result};

/// Univariate continuous distribution over a scaled domain.
///
/// Inputs of `pdf`/`logpdf`/`cdf` and outputs of `ppf`/`sample` are in true
/// units; implementations handle normalization internally.
pub trait Distribution: Structured + Send + Sync {
    /// Short family name (e.g. `"logistic"`).
    fn name(&self) -> &str;

    /// Density at `x`.
    fn pdf(&self, x: f64) -> f64;

    /// Log-density at `x`.
    fn logpdf(&self, x: f64) -> f64;

    /// Cumulative probability at `x`, in `[0, 1]`.
    fn cdf(&self, x: f64) -> f64;

    /// Quantile function (inverse of [`Self::cdf`]).
    fn ppf(&self, q: f64) -> f64;

    /// Draw a single variate.
    fn sample(&self, rng: &mut dyn RngCore) -> f64;

    /// Evaluate [`Self::pdf`] for every `xs[i]` into `out[i]`.
    fn pdf_batch(&self, xs: &[f64], out: &mut [f64]) -> Result<()> {
        check_batch_len(self.name(), xs.len(), out.len())?;
        out.par_iter_mut().zip(xs.par_iter()).for_each(|(o, &x)| *o = self.pdf(x));
        Ok(())
    }

    /// Evaluate [`Self::logpdf`] for every `xs[i]` into `out[i]`.
    fn logpdf_batch(&self, xs: &[f64], out: &mut [f64]) -> Result<()> {
        check_batch_len(self.name(), xs.len(), out.len())?;
        out.par_iter_mut().zip(xs.par_iter()).for_each(|(o, &x)| *o = self.logpdf(x));
        Ok(())
    }

    /// Draw `n` variates from a `StdRng` seeded with `seed`.
    fn sample_n(&self, n: usize, seed: u64) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n).map(|_| self.sample(&mut rng)).collect()
    }
}

fn check_batch_len(name: &str, n_in: usize, n_out: usize) -> Result<()> {
    if n_in != n_out {
        return Err(Error::Validation(format!(
            "{name} batch output length mismatch: expected {n_in}, got {n_out}"
        )));
    }
    Ok(())
}
