//! DP mean release
//!
//! Ties clamping, sensitivity calibration and noise sampling into a single
//! release. All parameters are validated before the data is read or any
//! randomness is drawn.

use crate::aggregate::{bounded_mean, Bounds};
use crate::params::PrivacyParameters;
use crate::sampler::{continuous_laplace, gaussian};
use crate::sensitivity::{calibrate_scale, mean_sensitivity, MechanismKind};
use crate::validation::{validate_epsilon, validate_gaussian_delta, warn_if_weak_epsilon};
use crate::{DpError, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A released statistic with the mechanism metadata needed to audit it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DpRelease<T> {
    /// The noisy statistic
    pub value: T,
    /// Privacy parameter epsilon spent on this release
    pub epsilon: f64,
    /// Delta, present only for approximate-DP mechanisms
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<f64>,
    /// Mechanism used to perturb the statistic
    pub mechanism: MechanismKind,
    /// Sensitivity the scale was calibrated against
    pub sensitivity: f64,
    /// Scale of the noise distribution
    pub scale: f64,
}

/// Release an (ε, δ)-DP estimate of the mean of `data` clamped to `bounds`
///
/// # Public dataset size
///
/// The sensitivity `(upper - lower) / n` uses `n = data.len()`, so the record
/// count is treated as public. If n is itself sensitive, the scale of the
/// release discloses it; callers in that situation must agree on n out of band.
///
/// # Errors
///
/// - `InvalidParameter` for a bad epsilon, or a missing/out-of-range delta
///   with the Gaussian mechanism
/// - `EmptyInput` for an empty `data`
/// - `InvalidParameter` for a NaN or infinite record
pub fn release_dp_mean<R: Rng + ?Sized>(
    rng: &mut R,
    data: &[f64],
    bounds: &Bounds,
    params: &PrivacyParameters,
    mechanism: MechanismKind,
) -> Result<DpRelease<f64>> {
    validate_epsilon(params.epsilon)?;
    warn_if_weak_epsilon(params.epsilon);
    let delta = if mechanism.requires_delta() {
        Some(validate_gaussian_delta(params.delta)?)
    } else {
        None
    };
    if data.is_empty() {
        return Err(DpError::EmptyInput);
    }

    let sensitive_mean = bounded_mean(data, bounds)?;
    let sensitivity = mean_sensitivity(bounds, data.len())?;
    let scale = calibrate_scale(sensitivity, params, mechanism)?;

    let noise = match mechanism {
        MechanismKind::Laplace => continuous_laplace(rng, 0.0, scale)?,
        MechanismKind::Gaussian => gaussian(rng, 0.0, scale)?,
    };

    debug!(
        %mechanism,
        epsilon = params.epsilon,
        ?delta,
        sensitivity,
        scale,
        "released DP mean"
    );

    Ok(DpRelease {
        value: sensitive_mean + noise,
        epsilon: params.epsilon,
        delta,
        mechanism,
        sensitivity,
        scale,
    })
}
