//! Release configuration
//!
//! A JSON document describing the parameters of a release. Every field is
//! optional so a file can hold shared defaults and command-line flags can
//! fill in or override the rest via [`ReleaseConfig::merge`].
//!
//! ```json
//! {
//!   "privacy_level": "high",
//!   "mechanism": "gaussian",
//!   "bounds": [0.0, 120.0],
//!   "categories": ["A", "B", "O", "AB"]
//! }
//! ```

use crate::aggregate::Bounds;
use crate::params::{PrivacyLevel, PrivacyParameters, DEFAULT_DELTA};
use crate::sensitivity::MechanismKind;
use crate::{DpError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReleaseConfig {
    /// Explicit epsilon; wins over `privacy_level`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epsilon: Option<f64>,
    /// Explicit delta; wins over `privacy_level`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<f64>,
    /// Preset (epsilon, delta) pair
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy_level: Option<PrivacyLevel>,
    /// Mechanism tag, parsed on use so an unknown tag is an `InvalidMechanism`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mechanism: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    /// Label for a deterministic generator; never set for real releases
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<String>,
}

impl ReleaseConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| DpError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| DpError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&text)
    }

    /// Overlay `overrides` on `self`; set fields in `overrides` win
    pub fn merge(self, overrides: ReleaseConfig) -> ReleaseConfig {
        ReleaseConfig {
            epsilon: overrides.epsilon.or(self.epsilon),
            delta: overrides.delta.or(self.delta),
            privacy_level: overrides.privacy_level.or(self.privacy_level),
            mechanism: overrides.mechanism.or(self.mechanism),
            bounds: overrides.bounds.or(self.bounds),
            categories: overrides.categories.or(self.categories),
            seed: overrides.seed.or(self.seed),
        }
    }

    /// Configured mechanism, Laplace when unset
    pub fn mechanism(&self) -> Result<MechanismKind> {
        match &self.mechanism {
            Some(tag) => tag.parse(),
            None => Ok(MechanismKind::Laplace),
        }
    }

    /// Resolve epsilon and delta for `mechanism`
    ///
    /// Explicit values win over the preset. A Gaussian release with no delta
    /// from either source uses [`DEFAULT_DELTA`].
    pub fn privacy_parameters(&self, mechanism: MechanismKind) -> Result<PrivacyParameters> {
        let preset = self.privacy_level.map(PrivacyLevel::values);

        let epsilon = self
            .epsilon
            .or(preset.map(|(e, _)| e))
            .ok_or_else(|| DpError::Config("epsilon or privacy_level is required".to_string()))?;

        let delta = self.delta.or(preset.map(|(_, d)| d));
        match delta {
            Some(d) => PrivacyParameters::approximate(epsilon, d),
            None if mechanism.requires_delta() => {
                PrivacyParameters::approximate(epsilon, DEFAULT_DELTA)
            }
            None => PrivacyParameters::pure(epsilon),
        }
    }

    pub fn bounds(&self) -> Result<Bounds> {
        self.bounds
            .ok_or_else(|| DpError::Config("bounds are required for a mean release".to_string()))
    }

    pub fn categories(&self) -> Result<&[String]> {
        self.categories
            .as_deref()
            .ok_or_else(|| DpError::Config("categories are required for a histogram release".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = ReleaseConfig::from_json_str(
            r#"{
                "epsilon": 0.5,
                "mechanism": "gaussian",
                "bounds": [0.0, 120.0],
                "categories": ["A", "B"]
            }"#,
        )
        .unwrap();

        assert_eq!(config.mechanism().unwrap(), MechanismKind::Gaussian);
        assert_eq!(config.bounds().unwrap(), Bounds::new(0.0, 120.0).unwrap());
        assert_eq!(config.categories().unwrap(), ["A".to_string(), "B".to_string()]);

        let params = config.privacy_parameters(MechanismKind::Gaussian).unwrap();
        assert_eq!(params.epsilon, 0.5);
        assert_eq!(params.delta, Some(DEFAULT_DELTA));
    }

    #[test]
    fn test_unknown_fields_and_bad_bounds_rejected() {
        assert!(matches!(
            ReleaseConfig::from_json_str(r#"{"epsilonn": 1.0}"#),
            Err(DpError::Config(_))
        ));
        assert!(ReleaseConfig::from_json_str(r#"{"bounds": [5.0, 1.0]}"#).is_err());
    }

    #[test]
    fn test_unknown_mechanism_is_invalid_mechanism() {
        let config = ReleaseConfig::from_json_str(r#"{"mechanism": "bogus"}"#).unwrap();
        assert!(matches!(config.mechanism(), Err(DpError::InvalidMechanism(_))));
    }

    #[test]
    fn test_preset_and_explicit_precedence() {
        let config = ReleaseConfig {
            privacy_level: Some(PrivacyLevel::High),
            ..Default::default()
        };
        let params = config.privacy_parameters(MechanismKind::Laplace).unwrap();
        assert_eq!(params.epsilon, 0.5);
        assert_eq!(params.delta, Some(1e-7));

        let config = ReleaseConfig {
            epsilon: Some(2.0),
            ..config
        };
        assert_eq!(
            config.privacy_parameters(MechanismKind::Laplace).unwrap().epsilon,
            2.0
        );
    }

    #[test]
    fn test_missing_epsilon() {
        let config = ReleaseConfig::default();
        assert!(matches!(
            config.privacy_parameters(MechanismKind::Laplace),
            Err(DpError::Config(_))
        ));
        assert_eq!(config.mechanism().unwrap(), MechanismKind::Laplace);
    }

    #[test]
    fn test_merge_overrides_win() {
        let file = ReleaseConfig {
            epsilon: Some(1.0),
            mechanism: Some("gaussian".to_string()),
            bounds: Some(Bounds::new(0.0, 10.0).unwrap()),
            ..Default::default()
        };
        let flags = ReleaseConfig {
            epsilon: Some(0.25),
            ..Default::default()
        };

        let merged = file.merge(flags);
        assert_eq!(merged.epsilon, Some(0.25));
        assert_eq!(merged.mechanism.as_deref(), Some("gaussian"));
        assert!(merged.bounds.is_some());
    }
}
