//! Bounded aggregation: clamping and the bounded mean
//!
//! Clamping caps how far a single record can move a statistic, which is
//! what makes the sensitivity of the mean finite.

use crate::validation::validate_bounds;
use crate::{DpError, Result};
use serde::{Deserialize, Serialize};

/// Publicly declared range any single record may occupy
///
/// Invariant: both ends finite and `lower <= upper`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "(f64, f64)", into = "(f64, f64)")]
pub struct Bounds {
    lower: f64,
    upper: f64,
}

impl Bounds {
    pub fn new(lower: f64, upper: f64) -> Result<Self> {
        validate_bounds(lower, upper)?;
        Ok(Bounds { lower, upper })
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// `upper - lower`
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Clip one value into the bounds
    pub fn clamp_value(&self, value: f64) -> f64 {
        if value < self.lower {
            self.lower
        } else if value > self.upper {
            self.upper
        } else {
            value
        }
    }
}

impl TryFrom<(f64, f64)> for Bounds {
    type Error = DpError;

    fn try_from((lower, upper): (f64, f64)) -> Result<Self> {
        Bounds::new(lower, upper)
    }
}

impl From<Bounds> for (f64, f64) {
    fn from(bounds: Bounds) -> Self {
        (bounds.lower, bounds.upper)
    }
}

/// Replace values below `lower` with `lower` and above `upper` with `upper`
///
/// NaN is passed through unchanged.
pub fn clamp(values: &[f64], bounds: &Bounds) -> Vec<f64> {
    values.iter().map(|&v| bounds.clamp_value(v)).collect()
}

/// Arithmetic mean of the clamped values
///
/// # Errors
///
/// - `EmptyInput` for an empty `values`
/// - `InvalidParameter` if any value is NaN or infinite; clamping cannot
///   bound a NaN, which would otherwise decide the result on its own
pub fn bounded_mean(values: &[f64], bounds: &Bounds) -> Result<f64> {
    if values.is_empty() {
        return Err(DpError::EmptyInput);
    }
    if let Some(i) = values.iter().position(|v| !v.is_finite()) {
        return Err(DpError::InvalidParameter(format!(
            "record {} is not a finite number: {}",
            i, values[i]
        )));
    }
    let sum: f64 = values.iter().map(|&v| bounds.clamp_value(v)).sum();
    Ok(sum / values.len() as f64)
}
