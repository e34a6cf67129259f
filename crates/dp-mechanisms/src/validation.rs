//! Input Validation for Differential Privacy Parameters
//!
//! Every check here runs before any randomness is consumed or any statistic
//! is computed. A failed check is permanent: callers should fix the input
//! rather than retry.
//!
//! # Parameter Constraints
//!
//! ## Epsilon (ε)
//! - Must be positive and finite
//! - Smaller = more private, but more noise
//! - Values > [`MAX_RECOMMENDED_EPSILON`] are accepted; each release logs
//!   a warning for them via [`warn_if_weak_epsilon`]
//!
//! ## Delta (δ)
//! - Must be in [0, 1) when supplied
//! - Must be in (0, 1) for the Gaussian mechanism
//!
//! ## Scale
//! - Must be non-negative and finite; zero is the degenerate no-noise case
//!
//! ## Probability
//! - Must lie in [0, 1]

use crate::{DpError, Result};
use tracing::warn;

/// Beyond this epsilon the guarantee is mostly nominal
pub const MAX_RECOMMENDED_EPSILON: f64 = 10.0;

/// Validate epsilon parameter
pub fn validate_epsilon(epsilon: f64) -> Result<()> {
    if !epsilon.is_finite() {
        return Err(DpError::InvalidParameter(format!(
            "epsilon must be a finite number, got {}",
            epsilon
        )));
    }

    if epsilon <= 0.0 {
        return Err(DpError::InvalidParameter(format!(
            "epsilon must be positive, got {}",
            epsilon
        )));
    }

    Ok(())
}

/// Log a warning for an epsilon above [`MAX_RECOMMENDED_EPSILON`]
///
/// Called once per release by the release entry points.
pub fn warn_if_weak_epsilon(epsilon: f64) {
    if epsilon > MAX_RECOMMENDED_EPSILON {
        warn!(
            epsilon,
            max = MAX_RECOMMENDED_EPSILON,
            "epsilon above recommended maximum; privacy protection is weak"
        );
    }
}

/// Validate an optional delta: [0, 1)
pub fn validate_delta(delta: f64) -> Result<()> {
    if !delta.is_finite() || !(0.0..1.0).contains(&delta) {
        return Err(DpError::InvalidParameter(format!(
            "delta must be in [0, 1), got {}",
            delta
        )));
    }
    Ok(())
}

/// Validate a delta the Gaussian mechanism depends on: (0, 1)
///
/// `ln(2/δ)` diverges at δ = 0, so pure DP cannot be calibrated here.
pub fn validate_gaussian_delta(delta: Option<f64>) -> Result<f64> {
    match delta {
        Some(d) if d.is_finite() && d > 0.0 && d < 1.0 => Ok(d),
        Some(d) => Err(DpError::InvalidParameter(format!(
            "gaussian mechanism requires delta in (0, 1), got {}",
            d
        ))),
        None => Err(DpError::InvalidParameter(
            "gaussian mechanism requires delta".to_string(),
        )),
    }
}

/// Validate a noise scale: finite and >= 0
pub fn validate_scale(scale: f64) -> Result<()> {
    if !scale.is_finite() || scale < 0.0 {
        return Err(DpError::InvalidParameter(format!(
            "scale must be finite and non-negative, got {}",
            scale
        )));
    }
    Ok(())
}

/// Validate a probability: [0, 1]
pub fn validate_probability(p: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&p) {
        return Err(DpError::InvalidParameter(format!(
            "probability must be in [0, 1], got {}",
            p
        )));
    }
    Ok(())
}

/// Validate a bound pair: both finite, lower <= upper
pub fn validate_bounds(lower: f64, upper: f64) -> Result<()> {
    if !lower.is_finite() || !upper.is_finite() {
        return Err(DpError::InvalidParameter(format!(
            "bounds must be finite, got ({}, {})",
            lower, upper
        )));
    }
    if lower > upper {
        return Err(DpError::InvalidParameter(format!(
            "lower bound {} exceeds upper bound {}",
            lower, upper
        )));
    }
    Ok(())
}
