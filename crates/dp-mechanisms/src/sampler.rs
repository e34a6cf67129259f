//! Noise Samplers for Differential Privacy
//!
//! Stateless draws from the distributions the release mechanisms need.
//! Every function validates its parameters before touching the generator,
//! so a rejected call never consumes randomness.
//!
//! # Continuous Laplace via Inverse CDF
//!
//! For U ~ Uniform(-0.5, 0.5) with both endpoints excluded:
//!
//! ```text
//! X = shift - scale * sign(U) * ln(1 - 2|U|)  ~  Laplace(shift, scale)
//! ```
//!
//! The Laplace distribution with scale b has PDF `p(x) = (1/2b) e^(-|x|/b)`
//! and variance `2b²`.
//!
//! # Discrete Laplace (Two-Sided Geometric)
//!
//! With `α = e^(-1/scale)`:
//!
//! ```text
//! P(noise = k) = (1 - α)/(1 + α) · α^|k|
//! ```
//!
//! Sampled as: magnitude 0 with probability (1-α)/(1+α), otherwise a
//! Geometric(1-α) magnitude on {1, 2, ...}; then a fair sign flip. The sign
//! flip is drawn even when the magnitude is 0, so the zero outcome has two
//! randomness traces. The output distribution is unaffected.

use crate::rng::{uniform_centered_open, uniform_unit};
use crate::validation::{validate_probability, validate_scale};
use crate::{DpError, Result};
use rand::Rng;
use rand_distr::{Distribution, Geometric, Normal};

/// Sample from Laplace(shift, scale) by inverse CDF
///
/// `scale == 0` returns `shift` exactly without drawing.
pub fn continuous_laplace<R: Rng + ?Sized>(rng: &mut R, shift: f64, scale: f64) -> Result<f64> {
    validate_scale(scale)?;
    if scale == 0.0 {
        return Ok(shift);
    }

    let u = uniform_centered_open(rng);
    Ok(shift - scale * u.signum() * (1.0 - 2.0 * u.abs()).ln())
}

/// `size` independent draws from Laplace(shift, scale)
pub fn laplace_vec<R: Rng + ?Sized>(
    rng: &mut R,
    shift: f64,
    scale: f64,
    size: usize,
) -> Result<Vec<f64>> {
    validate_scale(scale)?;
    (0..size)
        .map(|_| continuous_laplace(rng, shift, scale))
        .collect()
}

/// Sample from N(shift, scale²)
///
/// `scale == 0` returns `shift` exactly without drawing.
pub fn gaussian<R: Rng + ?Sized>(rng: &mut R, shift: f64, scale: f64) -> Result<f64> {
    validate_scale(scale)?;
    if scale == 0.0 {
        return Ok(shift);
    }

    let normal = Normal::new(shift, scale)
        .map_err(|e| DpError::InvalidParameter(format!("normal distribution: {}", e)))?;
    Ok(normal.sample(rng))
}

/// `size` independent draws from N(shift, scale²)
pub fn gaussian_vec<R: Rng + ?Sized>(
    rng: &mut R,
    shift: f64,
    scale: f64,
    size: usize,
) -> Result<Vec<f64>> {
    validate_scale(scale)?;
    (0..size).map(|_| gaussian(rng, shift, scale)).collect()
}

/// True with probability `p`
///
/// Computed as `U < p` for U uniform on [0, 1), so `p = 0` is never true and
/// `p = 1` is always true. One draw is consumed for every valid `p`.
pub fn bernoulli<R: Rng + ?Sized>(rng: &mut R, p: f64) -> Result<bool> {
    validate_probability(p)?;
    Ok(uniform_unit(rng) < p)
}

/// `size` independent Bernoulli(p) draws
pub fn bernoulli_vec<R: Rng + ?Sized>(rng: &mut R, p: f64, size: usize) -> Result<Vec<bool>> {
    validate_probability(p)?;
    (0..size).map(|_| bernoulli(rng, p)).collect()
}

/// Number of trials up to and including the first success, support {1, 2, ...}
pub fn geometric<R: Rng + ?Sized>(rng: &mut R, p: f64) -> Result<u64> {
    if !(p > 0.0 && p <= 1.0) {
        return Err(DpError::InvalidParameter(format!(
            "geometric success probability must be in (0, 1], got {}",
            p
        )));
    }

    let failures = Geometric::new(p)
        .map_err(|e| DpError::InvalidParameter(format!("geometric distribution: {}", e)))?
        .sample(rng);
    failures
        .checked_add(1)
        .ok_or_else(|| DpError::InvalidParameter("geometric sample overflows u64".to_string()))
}

/// Sample from the discrete Laplace distribution centred on `loc`
///
/// `scale == 0` returns `loc` before α is computed, with no draw.
pub fn discrete_laplace<R: Rng + ?Sized>(rng: &mut R, loc: i64, scale: f64) -> Result<i64> {
    validate_scale(scale)?;
    if scale == 0.0 {
        return Ok(loc);
    }

    // 1 - α computed with expm1 so huge scales do not round α to exactly 1
    let one_minus_alpha = -(-1.0 / scale).exp_m1();
    let alpha = 1.0 - one_minus_alpha;
    let p_zero = one_minus_alpha / (1.0 + alpha);

    let magnitude = if bernoulli(rng, p_zero)? {
        0
    } else {
        geometric(rng, one_minus_alpha)?
    };
    let magnitude = i64::try_from(magnitude).map_err(|_| {
        DpError::InvalidParameter(format!("discrete Laplace magnitude {} overflows i64", magnitude))
    })?;

    let noise = if bernoulli(rng, 0.5)? { -magnitude } else { magnitude };

    loc.checked_add(noise).ok_or_else(|| {
        DpError::InvalidParameter(format!("discrete Laplace sample {} + {} overflows i64", loc, noise))
    })
}
