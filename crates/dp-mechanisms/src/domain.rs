//! Domain-directed dispatch between discrete and continuous samplers
//!
//! The caller declares whether a location lives on the integers or the reals.
//! Nothing is inferred from the value itself: `4.0` in the `Continuous`
//! domain is a real number, and `4.5` in the `Integer` domain is an error.

use crate::sampler::discrete_laplace;
use crate::validation::validate_scale;
use crate::{DpError, Result};
use rand::Rng;
use rand_distr::{Distribution, Exp};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which sampler family is legal for a location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericDomain {
    /// Discrete, geometric-based samplers
    Integer,
    /// Continuous, inverse-CDF/exponential-based samplers
    Continuous,
}

impl fmt::Display for NumericDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericDomain::Integer => f.write_str("integer"),
            NumericDomain::Continuous => f.write_str("continuous"),
        }
    }
}

impl FromStr for NumericDomain {
    type Err = DpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "integer" | "int" | "discrete" => Ok(NumericDomain::Integer),
            "continuous" | "float" | "real" => Ok(NumericDomain::Continuous),
            other => Err(DpError::InvalidDomain(format!(
                "unrecognized domain: {}",
                other
            ))),
        }
    }
}

/// Largest magnitude an Integer-domain value may have: 2^53
///
/// Beyond it neighbouring integers are no longer distinct as `f64`.
pub const MAX_EXACT_INTEGER: i64 = 1 << 53;

/// Convert a value declared as `Integer` to i64, rejecting fractions
fn as_integer(value: f64) -> Result<i64> {
    if value.fract() != 0.0 || value.abs() > MAX_EXACT_INTEGER as f64 {
        return Err(DpError::InvalidDomain(format!(
            "{} is not an integer within ±2^53",
            value
        )));
    }
    Ok(value as i64)
}

/// Convert an Integer-domain result back to f64 without rounding
fn exact_f64(value: i64) -> Result<f64> {
    if value.unsigned_abs() > MAX_EXACT_INTEGER as u64 {
        return Err(DpError::InvalidDomain(format!(
            "{} is outside ±2^53 and cannot be represented exactly",
            value
        )));
    }
    Ok(value as f64)
}

/// Laplace(location, scale) as a difference of two Exp(1/scale) draws
fn laplace_from_exponentials<R: Rng + ?Sized>(rng: &mut R, location: f64, scale: f64) -> Result<f64> {
    validate_scale(scale)?;
    if scale == 0.0 {
        return Ok(location);
    }

    let exp = Exp::new(1.0 / scale)
        .map_err(|e| DpError::InvalidParameter(format!("exponential distribution: {}", e)))?;
    Ok(location + exp.sample(rng) - exp.sample(rng))
}

/// Laplace noise around `location`, discrete or continuous per `domain`
pub fn sample_conditional<R: Rng + ?Sized>(
    rng: &mut R,
    location: f64,
    scale: f64,
    domain: NumericDomain,
) -> Result<f64> {
    match domain {
        NumericDomain::Integer => {
            let loc = as_integer(location)?;
            exact_f64(discrete_laplace(rng, loc, scale)?)
        }
        NumericDomain::Continuous => laplace_from_exponentials(rng, location, scale),
    }
}

/// Uniform draw from [low, high), discrete or continuous per `domain`
///
/// `low == high` returns `low` without drawing in either domain.
pub fn sample_uniform_conditional<R: Rng + ?Sized>(
    rng: &mut R,
    low: f64,
    high: f64,
    domain: NumericDomain,
) -> Result<f64> {
    match domain {
        NumericDomain::Integer => {
            let lo = as_integer(low)?;
            let hi = as_integer(high)?;
            if lo > hi {
                return Err(DpError::InvalidParameter(format!(
                    "uniform range is empty: [{}, {})",
                    lo, hi
                )));
            }
            if lo == hi {
                return Ok(low);
            }
            Ok(rng.gen_range(lo..hi) as f64)
        }
        NumericDomain::Continuous => {
            // An infinite width (e.g. -1e308..1e308) cannot be sampled
            if !low.is_finite()
                || !high.is_finite()
                || low > high
                || !(high - low).is_finite()
            {
                return Err(DpError::InvalidParameter(format!(
                    "uniform range is invalid: [{}, {})",
                    low, high
                )));
            }
            if low == high {
                return Ok(low);
            }
            Ok(rng.gen_range(low..high))
        }
    }
}
