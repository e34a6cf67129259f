//! Randomness Sources for DP Mechanisms
//!
//! The generator is always passed explicitly into a sampler; there is no
//! process-wide generator.
//!
//! # Security Properties
//!
//! - [`secure_rng`] seeds ChaCha20 from the OS entropy source
//! - [`seeded_rng`] is deterministic and must never back a real release:
//!   anyone who knows the seed can reconstruct the noise and subtract it

use rand::distributions::{Distribution, Open01};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Generator used for releases
pub type NoiseRng = ChaCha20Rng;

/// A 32-byte seed for reproducible noise generation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seed(pub [u8; 32]);

impl Seed {
    /// Derive a seed from a human-readable label (SHA-256 of the label)
    pub fn from_label(label: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(label.as_bytes());
        let mut seed = [0u8; 32];
        seed.copy_from_slice(&hasher.finalize());
        Seed(seed)
    }

    /// Create a seed from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Seed(bytes)
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// ChaCha20 generator seeded from OS entropy
pub fn secure_rng() -> NoiseRng {
    ChaCha20Rng::from_entropy()
}

/// Deterministic ChaCha20 generator for tests and demos
pub fn seeded_rng(seed: &Seed) -> NoiseRng {
    ChaCha20Rng::from_seed(seed.0)
}

/// Uniform f64 in [0, 1)
///
/// 53 random bits divided by 2^53, so `0.0` is reachable and `1.0` is not.
pub fn uniform_unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen::<f64>()
}

/// Uniform f64 in the open interval (-0.5, 0.5)
///
/// Both endpoints are excluded: the Laplace inverse CDF evaluates
/// `ln(1 - 2|u|)`, which is `-inf` at `|u| = 0.5`.
pub fn uniform_centered_open<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u: f64 = Open01.sample(rng);
    u - 0.5
}
