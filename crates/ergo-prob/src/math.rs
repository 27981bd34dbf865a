//! Small numerically-stable math utilities used across probability code.

/// Stable `log(1 + exp(x))`.
///
/// Branchless: `log(1+exp(x)) = max(x,0) + log(1+exp(-|x|))`.
#[inline]
pub fn log1pexp(x: f64) -> f64 {
    let abs_x = x.abs();
    let e = (-abs_x).exp(); // always in (0, 1], no overflow
    x.max(0.0) + e.ln_1p()
}

/// Stable sigmoid: `1 / (1 + exp(-x))`. This is the standard logistic CDF.
///
/// Branchless core: single `exp(-|x|)`, then `cmov` for the sign flip.
#[inline]
pub fn sigmoid(x: f64) -> f64 {
    let abs_x = x.abs();
    let e = (-abs_x).exp();
    let recip = 1.0 / (1.0 + e);
    // x >= 0: sigmoid = 1/(1+exp(-x)) = recip
    // x <  0: sigmoid = exp(x)/(1+exp(x)) = e/(1+e) = e*recip
    if x >= 0.0 { recip } else { e * recip }
}

/// Stable `log(sigmoid(x))`.
#[inline]
pub fn log_sigmoid(x: f64) -> f64 {
    // log(sigmoid(x)) = -log(1 + exp(-x))
    -log1pexp(-x)
}

/// Inverse sigmoid, `ln(q / (1 - q))`. This is the standard logistic quantile.
///
/// `q = 0` gives `-inf`, `q = 1` gives `+inf`, `q` outside `[0, 1]` gives `NaN`.
#[inline]
pub fn logit(q: f64) -> f64 {
    q.ln() - (-q).ln_1p()
}

/// Log-PDF of the standard logistic distribution at `z`.
///
/// `p(z) = sigmoid(z) * sigmoid(-z)`, so the log-density is a sum of two
/// stable log-sigmoids and large `|z|` neither overflows nor cancels.
#[inline]
pub fn std_logistic_logpdf(z: f64) -> f64 {
    log_sigmoid(z) + log_sigmoid(-z)
}

/// `n` evenly spaced points on `[start, stop]`, both endpoints included.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            // Pin the last point so rounding never leaves it short of `stop`.
            (0..n).map(|i| if i == n - 1 { stop } else { start + step * i as f64 }).collect()
        }
    }
}

/// Trapezoidal integral of `ys` sampled at `xs`.
///
/// Lengths must match; fewer than two points integrate to `0.0`.
pub fn trapezoid(xs: &[f64], ys: &[f64]) -> f64 {
    debug_assert_eq!(xs.len(), ys.len());
    xs.windows(2).zip(ys.windows(2)).map(|(x, y)| 0.5 * (x[1] - x[0]) * (y[0] + y[1])).sum()
}
