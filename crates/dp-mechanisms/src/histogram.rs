//! DP histogram release over a closed category set

use crate::release::DpRelease;
use crate::sampler::laplace_vec;
use crate::sensitivity::{histogram_scale, MechanismKind, HISTOGRAM_SENSITIVITY};
use crate::validation::warn_if_weak_epsilon;
use crate::{DpError, Result};
use rand::Rng;
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;
use tracing::debug;

/// Release an ε-DP estimate of the count of each of `categories`
///
/// Output is aligned with `categories`. Every category receives independent
/// Laplace(2/ε) noise, including those absent from `data`; values in `data`
/// outside the category set are not reported.
///
/// # Errors
///
/// - `InvalidParameter` for a bad epsilon or a repeated category
pub fn release_dp_histogram<R, T>(
    rng: &mut R,
    data: &[T],
    epsilon: f64,
    categories: &[T],
) -> Result<DpRelease<Vec<f64>>>
where
    R: Rng + ?Sized,
    T: Eq + Hash + Debug,
{
    let scale = histogram_scale(epsilon)?;
    warn_if_weak_epsilon(epsilon);

    let mut seen = HashSet::with_capacity(categories.len());
    for category in categories {
        if !seen.insert(category) {
            return Err(DpError::InvalidParameter(format!(
                "duplicate category: {:?}",
                category
            )));
        }
    }

    let mut counts: HashMap<&T, u64> = HashMap::new();
    for value in data {
        *counts.entry(value).or_insert(0) += 1;
    }

    let noise = laplace_vec(rng, 0.0, scale, categories.len())?;
    let value: Vec<f64> = categories
        .iter()
        .zip(noise)
        .map(|(category, n)| counts.get(category).copied().unwrap_or(0) as f64 + n)
        .collect();

    debug!(
        epsilon,
        scale,
        categories = categories.len(),
        "released DP histogram"
    );

    Ok(DpRelease {
        value,
        epsilon,
        delta: None,
        mechanism: MechanismKind::Laplace,
        sensitivity: HISTOGRAM_SENSITIVITY,
        scale,
    })
}
