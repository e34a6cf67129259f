//! Sensitivity Calibration
//!
//! Translates a query's sensitivity and a privacy budget into the scale of
//! the noise distribution.
//!
//! # Formulas
//!
//! ```text
//! bounded mean:  Δ = (upper - lower) / n          (n treated as public)
//! histogram:     Δ = 2                            (bounded neighbours)
//!
//! Laplace:       b = Δ / ε
//! Gaussian:      σ = (Δ / ε) · √(2 ln(2/δ))
//! ```
//!
//! Under the bounded-neighbouring definition one record changes value but n
//! stays fixed. Moving a record between histogram categories lowers one
//! count by one and raises another by one, hence the fixed sensitivity of 2.

use crate::aggregate::Bounds;
use crate::params::PrivacyParameters;
use crate::validation::{validate_epsilon, validate_gaussian_delta, validate_scale};
use crate::{DpError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sensitivity of a histogram over a fixed category set
pub const HISTOGRAM_SENSITIVITY: f64 = 2.0;

/// Noise distribution and calibration rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MechanismKind {
    /// (ε, 0)-DP, scale b = Δ/ε
    Laplace,
    /// (ε, δ)-DP, scale σ = (Δ/ε)·√(2 ln(2/δ))
    Gaussian,
}

impl MechanismKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MechanismKind::Laplace => "laplace",
            MechanismKind::Gaussian => "gaussian",
        }
    }

    /// Whether this mechanism needs a delta
    pub fn requires_delta(self) -> bool {
        matches!(self, MechanismKind::Gaussian)
    }
}

impl fmt::Display for MechanismKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MechanismKind {
    type Err = DpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "laplace" => Ok(MechanismKind::Laplace),
            "gaussian" => Ok(MechanismKind::Gaussian),
            other => Err(DpError::InvalidMechanism(format!(
                "unrecognized mechanism: {}",
                other
            ))),
        }
    }
}

/// Sensitivity of the bounded mean over `n` records
///
/// `n` is assumed public. If the record count is itself sensitive this
/// formula leaks it through the scale.
pub fn mean_sensitivity(bounds: &Bounds, n: usize) -> Result<f64> {
    if n == 0 {
        return Err(DpError::EmptyInput);
    }
    Ok(bounds.width() / n as f64)
}

/// Scale required for `params` at the given sensitivity
pub fn calibrate_scale(
    sensitivity: f64,
    params: &PrivacyParameters,
    mechanism: MechanismKind,
) -> Result<f64> {
    validate_epsilon(params.epsilon)?;
    if !sensitivity.is_finite() || sensitivity < 0.0 {
        return Err(DpError::InvalidParameter(format!(
            "sensitivity must be finite and non-negative, got {}",
            sensitivity
        )));
    }

    match mechanism {
        MechanismKind::Laplace => Ok(sensitivity / params.epsilon),
        MechanismKind::Gaussian => {
            let delta = validate_gaussian_delta(params.delta)?;
            Ok((sensitivity / params.epsilon) * (2.0 * (2.0 / delta).ln()).sqrt())
        }
    }
}

/// Laplace scale for a histogram release: 2/ε
pub fn histogram_scale(epsilon: f64) -> Result<f64> {
    validate_epsilon(epsilon)?;
    Ok(HISTOGRAM_SENSITIVITY / epsilon)
}

/// Variance of the noise at `scale`
///
/// Var(Lap(0, b)) = 2b², Var(N(0, σ²)) = σ²
pub fn noise_variance(mechanism: MechanismKind, scale: f64) -> Result<f64> {
    validate_scale(scale)?;
    Ok(match mechanism {
        MechanismKind::Laplace => 2.0 * scale * scale,
        MechanismKind::Gaussian => scale * scale,
    })
}

/// Standard deviation of the noise at `scale`
pub fn noise_std_dev(mechanism: MechanismKind, scale: f64) -> Result<f64> {
    Ok(noise_variance(mechanism, scale)?.sqrt())
}

/// Half-width of the interval containing 95% of the noise
///
/// Laplace: P(|X| < x) = 1 - e^(-x/b), so x = -b·ln(0.05) ≈ 3b.
/// Gaussian: 1.96σ.
pub fn confidence_interval_95(mechanism: MechanismKind, scale: f64) -> Result<f64> {
    validate_scale(scale)?;
    Ok(match mechanism {
        MechanismKind::Laplace => -scale * 0.05_f64.ln(),
        MechanismKind::Gaussian => 1.96 * scale,
    })
}
