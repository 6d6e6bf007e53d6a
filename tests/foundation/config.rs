//! Integration tests for detector configuration

use edmview_foundation::{DetectorConfig, Vector3};

#[test]
fn defaults() {
    let config = DetectorConfig::default();
    assert!((config.tracking_radius - 2150.0).abs() < f64::EPSILON);
    assert!((config.tracking_z_max - 2210.0).abs() < f64::EPSILON);
    assert!(config.energy_threshold.abs() < f64::EPSILON);
}

#[test]
fn from_options_overrides_defaults() {
    let config =
        DetectorConfig::from_options([("tracking_radius", 1000.0), ("energy_threshold", 0.5)])
            .unwrap();
    assert!((config.tracking_radius - 1000.0).abs() < f64::EPSILON);
    assert!((config.tracking_z_max - 2210.0).abs() < f64::EPSILON);
    assert!((config.energy_threshold - 0.5).abs() < f64::EPSILON);
}

#[test]
fn from_options_rejects_unknown_and_bad_values() {
    assert!(DetectorConfig::from_options([("magnetic_field", 2.0)]).is_err());
    assert!(DetectorConfig::from_options([("tracking_radius", -1.0)]).is_err());
    assert!(DetectorConfig::from_options([("tracking_z_max", f64::NAN)]).is_err());
}

#[test]
fn tracking_volume_is_inclusive() {
    let config = DetectorConfig::default()
        .with_tracking_radius(10.0)
        .with_tracking_z_max(20.0);
    assert!(config.within_tracking_volume(Vector3::new(0.0, 10.0, -20.0)));
    assert!(!config.within_tracking_volume(Vector3::new(6.0, 8.1, 0.0)));
    assert!(!config.within_tracking_volume(Vector3::new(0.0, 0.0, 20.5)));
}

#[test]
fn energy_threshold() {
    let config = DetectorConfig::default().with_energy_threshold(1.0);
    assert!(config.passes_energy_threshold(1.0));
    assert!(!config.passes_energy_threshold(0.99));
}
