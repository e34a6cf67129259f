//! DP Mechanisms - Differentially Private Aggregate Releases
//!
//! Pure Rust implementation of the noise mechanisms needed to publish a
//! bounded mean or a categorical histogram with a formal privacy guarantee.
//!
//! # Features
//!
//! - Continuous and discrete Laplace, Gaussian, Bernoulli and geometric samplers
//! - Explicit integer/continuous domain dispatch ([`NumericDomain`])
//! - Clamping and bounded means over declared [`Bounds`]
//! - Sensitivity and scale calibration for Laplace and Gaussian mechanisms
//! - Self-describing [`DpRelease`] values carrying their mechanism metadata
//!
//! # Randomness
//!
//! Every sampler takes the generator as an argument. Use
//! [`rng::secure_rng`] for real releases; [`rng::seeded_rng`] exists for
//! tests and reproducible demos only, since a known seed lets anyone
//! subtract the noise back out.
//!
//! # Example
//!
//! ```rust
//! use dp_mechanisms::{release_dp_mean, rng, Bounds, MechanismKind, PrivacyParameters};
//!
//! let mut rng = rng::secure_rng();
//! let bounds = Bounds::new(0.0, 10.0).unwrap();
//! let params = PrivacyParameters::pure(1.0).unwrap();
//!
//! let release = release_dp_mean(
//!     &mut rng,
//!     &[1.0, 2.0, 3.0, 4.0, 5.0],
//!     &bounds,
//!     &params,
//!     MechanismKind::Laplace,
//! )
//! .unwrap();
//!
//! assert_eq!(release.scale, 2.0);
//! println!("DP mean: {:.3}", release.value);
//! ```

pub mod aggregate;
pub mod config;
pub mod domain;
pub mod histogram;
pub mod params;
pub mod release;
pub mod rng;
pub mod sampler;
pub mod sensitivity;
pub mod validation;

// Re-export commonly used types for convenience
pub use aggregate::{bounded_mean, clamp, Bounds};
pub use config::ReleaseConfig;
pub use domain::{sample_conditional, sample_uniform_conditional, NumericDomain};
pub use histogram::release_dp_histogram;
pub use params::{PrivacyLevel, PrivacyParameters};
pub use release::{release_dp_mean, DpRelease};
pub use rng::Seed;
pub use sampler::{
    bernoulli, bernoulli_vec, continuous_laplace, discrete_laplace, gaussian, gaussian_vec,
    geometric, laplace_vec,
};
pub use sensitivity::MechanismKind;

/// Errors that can occur while calibrating or releasing a statistic
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DpError {
    /// A numeric parameter is outside its legal range
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// Mechanism tag is not one of the supported set
    #[error("invalid mechanism: {0}")]
    InvalidMechanism(String),
    /// Domain tag is unknown, or a value does not belong to its declared domain
    #[error("invalid domain: {0}")]
    InvalidDomain(String),
    /// Statistic requested over an empty sequence
    #[error("empty input")]
    EmptyInput,
    /// Release configuration could not be read or parsed
    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, DpError>;
