//! Integration tests for DP Mechanisms
//!
//! End-to-end releases through the public API: config -> parameters ->
//! release, with a fixed documented seed per test.

use dp_mechanisms::rng::{seeded_rng, Seed};
use dp_mechanisms::sensitivity::{confidence_interval_95, noise_std_dev};
use dp_mechanisms::{
    bernoulli, clamp, continuous_laplace, discrete_laplace, release_dp_histogram,
    release_dp_mean, sample_conditional, sample_uniform_conditional, Bounds, DpError,
    MechanismKind, NumericDomain, PrivacyLevel, PrivacyParameters, ReleaseConfig,
};

// =============================================================================
// Mean releases
// =============================================================================

mod mean_release {
    use super::*;

    /// The canonical example: [1..5] in (0, 10), ε = 1
    #[test]
    fn test_mean_release_converges_to_bounded_mean() {
        let mut rng = seeded_rng(&Seed::from_label("integration-mean-v1"));
        let data = [1.0, 2.0, 3.0, 4.0, 5.0];
        let bounds = Bounds::new(0.0, 10.0).unwrap();
        let params = PrivacyParameters::pure(1.0).unwrap();

        let n = 20_000;
        let mut total = 0.0;
        for _ in 0..n {
            let release =
                release_dp_mean(&mut rng, &data, &bounds, &params, MechanismKind::Laplace)
                    .unwrap();
            assert_eq!(release.scale, 2.0);
            total += release.value;
        }

        let average = total / n as f64;
        assert!((average - 3.0).abs() < 0.1, "Average {} too far from 3.0", average);
    }

    /// Outliers are clamped before the mean, so one record cannot drag it
    #[test]
    fn test_outlier_is_bounded() {
        let mut rng = seeded_rng(&Seed::from_label("integration-outlier"));
        let bounds = Bounds::new(0.0, 10.0).unwrap();
        let params = PrivacyParameters::pure(1.0).unwrap();
        let data = [1.0, 2.0, 3.0, 4.0, 1e9];

        let n = 5_000;
        let mut total = 0.0;
        for _ in 0..n {
            total += release_dp_mean(&mut rng, &data, &bounds, &params, MechanismKind::Laplace)
                .unwrap()
                .value;
        }

        // 1e9 clamps to 10: true bounded mean = 20 / 5 = 4
        let average = total / n as f64;
        assert!((average - 4.0).abs() < 0.2, "Average {} too far from 4.0", average);
    }

    /// The unknown tag is rejected at parse time; no data is ever read
    #[test]
    fn test_bogus_mechanism_fails_before_data() {
        let config = ReleaseConfig::from_json_str(
            r#"{"epsilon": 1.0, "mechanism": "bogus", "bounds": [0.0, 10.0]}"#,
        )
        .unwrap();

        let data_reads = std::cell::Cell::new(0);
        let load_data = || {
            data_reads.set(data_reads.get() + 1);
            vec![1.0, 2.0, 3.0]
        };

        let result = config.mechanism().map(|mechanism| (mechanism, load_data()));
        assert!(matches!(result, Err(DpError::InvalidMechanism(_))));
        assert_eq!(data_reads.get(), 0);
    }

    #[test]
    fn test_gaussian_release_from_preset() {
        let mut rng = seeded_rng(&Seed::from_label("integration-gaussian"));
        let config = ReleaseConfig {
            privacy_level: Some(PrivacyLevel::Medium),
            mechanism: Some("gaussian".to_string()),
            bounds: Some(Bounds::new(0.0, 100.0).unwrap()),
            ..Default::default()
        };

        let mechanism = config.mechanism().unwrap();
        let params = config.privacy_parameters(mechanism).unwrap();
        let data: Vec<f64> = (0..1000).map(|i| (i % 100) as f64).collect();

        let release =
            release_dp_mean(&mut rng, &data, &config.bounds().unwrap(), &params, mechanism)
                .unwrap();

        // Δ = 100/1000 = 0.1, σ = 0.1 · √(2 ln(2e6))
        let expected_scale = 0.1 * (2.0 * (2.0e6_f64).ln()).sqrt();
        assert!((release.scale - expected_scale).abs() < 1e-12);
        assert_eq!(release.delta, Some(1e-6));

        // 49.5 true mean; a single release lands well inside 6σ
        let bound = 6.0 * noise_std_dev(MechanismKind::Gaussian, release.scale).unwrap();
        assert!((release.value - 49.5).abs() < bound);
    }

    #[test]
    fn test_same_seed_same_release() {
        let bounds = Bounds::new(0.0, 10.0).unwrap();
        let params = PrivacyParameters::pure(1.0).unwrap();
        let data = [1.0, 2.0, 3.0];

        let mut a = seeded_rng(&Seed::from_label("replay"));
        let mut b = seeded_rng(&Seed::from_label("replay"));
        let ra = release_dp_mean(&mut a, &data, &bounds, &params, MechanismKind::Laplace).unwrap();
        let rb = release_dp_mean(&mut b, &data, &bounds, &params, MechanismKind::Laplace).unwrap();

        assert_eq!(ra, rb);
    }
}

// =============================================================================
// Histogram releases
// =============================================================================

mod histogram_release {
    use super::*;

    #[test]
    fn test_histogram_expectation_matches_counts() {
        let mut rng = seeded_rng(&Seed::from_label("integration-hist-v1"));
        let data = ["a", "a", "b"];
        let categories = ["a", "b", "c"];

        let n = 20_000;
        let mut sums = [0.0; 3];
        for _ in 0..n {
            let release = release_dp_histogram(&mut rng, &data, 1.0, &categories).unwrap();
            assert_eq!(release.scale, 2.0);
            assert_eq!(release.value.len(), 3);
            for (sum, v) in sums.iter_mut().zip(&release.value) {
                *sum += v;
            }
        }

        let expected = [2.0, 1.0, 0.0];
        for (i, sum) in sums.iter().enumerate() {
            let avg = sum / n as f64;
            assert!((avg - expected[i]).abs() < 0.1, "{}: {}", categories[i], avg);
        }
    }

    #[test]
    fn test_histogram_noise_width() {
        // Most single-cell noise lies within the 95% interval of Laplace(2)
        let mut rng = seeded_rng(&Seed::from_label("integration-hist-width"));
        let half_width = confidence_interval_95(MechanismKind::Laplace, 2.0).unwrap();

        let n = 10_000;
        let mut inside = 0;
        for _ in 0..n {
            let release = release_dp_histogram(&mut rng, &[0u8], 1.0, &[0u8]).unwrap();
            if (release.value[0] - 1.0).abs() < half_width {
                inside += 1;
            }
        }

        let coverage = inside as f64 / n as f64;
        assert!((coverage - 0.95).abs() < 0.01, "Coverage {}", coverage);
    }
}

// =============================================================================
// Sampler contracts through the public surface
// =============================================================================

mod sampler_contracts {
    use super::*;

    #[test]
    fn test_degenerate_scales_are_exact() {
        let mut rng = seeded_rng(&Seed::from_label("integration-degenerate"));
        let before = rng.get_word_pos();

        assert_eq!(continuous_laplace(&mut rng, -2.5, 0.0).unwrap(), -2.5);
        assert_eq!(discrete_laplace(&mut rng, 17, 0.0).unwrap(), 17);
        assert_eq!(
            sample_uniform_conditional(&mut rng, 5.0, 5.0, NumericDomain::Integer).unwrap(),
            5.0
        );
        assert_eq!(rng.get_word_pos(), before);
    }

    #[test]
    fn test_bernoulli_extremes() {
        let mut rng = seeded_rng(&Seed::from_label("integration-bernoulli"));
        assert!((0..1000).all(|_| !bernoulli(&mut rng, 0.0).unwrap()));
        assert!((0..1000).all(|_| bernoulli(&mut rng, 1.0).unwrap()));
    }

    #[test]
    fn test_domain_parsed_from_text() {
        let mut rng = seeded_rng(&Seed::from_label("integration-domain"));
        let domain: NumericDomain = "integer".parse().unwrap();
        let v = sample_conditional(&mut rng, 10.0, 1.0, domain).unwrap();
        assert_eq!(v.fract(), 0.0);

        assert!(matches!(
            "quaternion".parse::<NumericDomain>(),
            Err(DpError::InvalidDomain(_))
        ));
    }

    #[test]
    fn test_clamp_public_surface() {
        let bounds = Bounds::new(-1.0, 1.0).unwrap();
        assert_eq!(clamp(&[-3.0, 0.5, 3.0], &bounds), vec![-1.0, 0.5, 1.0]);
    }
}
