//! Privacy parameters and recommended presets

use crate::validation::{validate_delta, validate_epsilon};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Default delta for Gaussian releases when the caller supplies none
pub const DEFAULT_DELTA: f64 = 1e-6;

/// Differential privacy parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrivacyParameters {
    /// Privacy parameter epsilon (lower = more private)
    /// Typical values: 0.1 (high privacy), 1.0 (moderate), 10.0 (low privacy)
    pub epsilon: f64,
    /// Optional delta for approximate DP, required by the Gaussian mechanism
    pub delta: Option<f64>,
}

impl PrivacyParameters {
    /// Pure ε-differential privacy parameters
    pub fn pure(epsilon: f64) -> Result<Self> {
        validate_epsilon(epsilon)?;
        Ok(PrivacyParameters { epsilon, delta: None })
    }

    /// (ε, δ)-differential privacy parameters
    pub fn approximate(epsilon: f64, delta: f64) -> Result<Self> {
        validate_epsilon(epsilon)?;
        validate_delta(delta)?;
        Ok(PrivacyParameters {
            epsilon,
            delta: Some(delta),
        })
    }

    /// Parameters for a preset privacy level
    pub fn recommended(level: PrivacyLevel) -> Self {
        let (epsilon, delta) = level.values();
        PrivacyParameters {
            epsilon,
            delta: Some(delta),
        }
    }

    /// Re-check the invariants, for values built field-by-field or deserialized
    pub fn validate(&self) -> Result<()> {
        validate_epsilon(self.epsilon)?;
        if let Some(delta) = self.delta {
            validate_delta(delta)?;
        }
        Ok(())
    }
}

/// Privacy levels for parameter recommendations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrivacyLevel {
    VeryHigh,
    High,
    Medium,
    Low,
}

impl PrivacyLevel {
    /// (epsilon, delta) for this level
    pub fn values(self) -> (f64, f64) {
        match self {
            PrivacyLevel::VeryHigh => (0.1, 1e-9),
            PrivacyLevel::High => (0.5, 1e-7),
            PrivacyLevel::Medium => (1.0, DEFAULT_DELTA),
            PrivacyLevel::Low => (3.0, 1e-5),
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PrivacyLevel::VeryHigh => "Very high privacy: suitable for sensitive records",
            PrivacyLevel::High => "High privacy: suitable for most analytics",
            PrivacyLevel::Medium => "Medium privacy: balance of utility and privacy",
            PrivacyLevel::Low => "Lower privacy: higher utility, less noise",
        }
    }
}
