//! Integration tests for profile interpolation onto pressure grids.

use grid_processor::{interpolate_profile, AkimaSpline, GridProcessorError, InterpolationConfig};
use test_utils::{assert_all_approx_eq, assert_approx_eq, linear_profile, Sample};

fn columns(samples: &[Sample]) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let pressure = samples.iter().map(|s| s.0).collect();
    let salinity = samples.iter().map(|s| s.1).collect();
    let temperature = samples.iter().map(|s| s.2).collect();
    (pressure, salinity, temperature)
}

fn standard() -> InterpolationConfig {
    InterpolationConfig::default()
}

// ============================================================================
// Grid coverage
// ============================================================================

#[test]
fn test_standard_grid_full_coverage() {
    let (p, s, t) = columns(&linear_profile(21, 1000.0));
    let profile = interpolate_profile(&p, &s, &t, &standard()).unwrap();

    assert_eq!(profile.salinity.len(), 100);
    assert_eq!(profile.temperature.len(), 100);
    assert!(profile.is_complete());
}

#[test]
fn test_linear_data_reproduced() {
    // Akima reproduces straight lines exactly
    let (p, s, t) = columns(&linear_profile(11, 1000.0));
    let profile = interpolate_profile(&p, &s, &t, &standard()).unwrap();

    let expected_s: Vec<f64> = (1..=100).map(|i| 35.0 - i as f64 * 10.0 * 0.001).collect();
    let expected_t: Vec<f64> = (1..=100).map(|i| 20.0 - i as f64 * 10.0 * 0.016).collect();
    assert_all_approx_eq!(profile.salinity, expected_s, 1e-9);
    assert_all_approx_eq!(profile.temperature, expected_t, 1e-9);
}

#[test]
fn test_shallow_profile_leaves_deep_levels_nan() {
    let (p, s, t) = columns(&linear_profile(6, 500.0));
    let profile = interpolate_profile(&p, &s, &t, &standard()).unwrap();

    // Levels 10..=500 are covered, 510..=1000 are not
    assert!(profile.salinity[..50].iter().all(|v| v.is_finite()));
    assert!(profile.salinity[50..].iter().all(|v| v.is_nan()));
    assert_eq!(profile.nan_count(), 100);
}

// ============================================================================
// Spline shape
// ============================================================================

#[test]
fn test_no_overshoot_at_step() {
    // A step in the data must not ring beyond the sampled range
    let x = [0.0, 100.0, 200.0, 300.0, 400.0, 500.0];
    let y = [10.0, 10.0, 10.0, 20.0, 20.0, 20.0];
    let spline = AkimaSpline::new(&x, &y).unwrap();

    for i in 0..=500 {
        let v = spline.evaluate(i as f64);
        assert!((10.0..=20.0).contains(&v), "overshoot at {}: {}", i, v);
    }
    assert_approx_eq!(spline.evaluate(50.0), 10.0, 1e-12);
    assert_approx_eq!(spline.evaluate(450.0), 20.0, 1e-12);
}

#[test]
fn test_knots_reproduced_exactly() {
    let x = [5.0, 12.0, 40.0, 95.0, 300.0, 810.0];
    let y = [18.2, 18.1, 16.4, 12.9, 9.0, 5.1];
    let spline = AkimaSpline::new(&x, &y).unwrap();
    for (xi, yi) in x.iter().zip(&y) {
        assert_eq!(spline.evaluate(*xi), *yi);
    }
    assert_eq!(spline.domain(), (5.0, 810.0));
}

// ============================================================================
// Rejections
// ============================================================================

#[test]
fn test_too_few_samples() {
    let (p, s, t) = columns(&linear_profile(2, 1000.0));
    let err = interpolate_profile(&p, &s, &t, &standard()).unwrap_err();
    assert!(matches!(err, GridProcessorError::InsufficientSamples { found: 2, .. }));
}

#[test]
fn test_duplicate_pressure_rejected() {
    let err = interpolate_profile(
        &[0.0, 100.0, 100.0, 200.0],
        &[35.0; 4],
        &[20.0; 4],
        &standard(),
    )
    .unwrap_err();
    assert!(matches!(err, GridProcessorError::NonMonotonicPressure { index: 2 }));
}

#[test]
fn test_mismatched_columns_rejected() {
    let err = interpolate_profile(&[0.0, 100.0, 200.0], &[35.0, 34.9], &[20.0, 19.0, 18.0], &standard())
        .unwrap_err();
    assert!(matches!(err, GridProcessorError::InvalidSamples(_)));
}
