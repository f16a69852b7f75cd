use super::*;

#[test]
fn defaults_survive_validation_unchanged() {
    let config = SeekGestureConfig::default();
    assert_eq!(config.validated(), config);
}

#[test]
fn out_of_range_fields_clamp_to_nearest_bound() {
    let config = SeekGestureConfig {
        trigger_duration_ms: 10,
        acceleration_interval_ms: 60_000,
        direction_change_threshold_px: -5.0,
        direction_change_cooldown_ms: 0,
        continuous_seek_interval_ms: 1,
        speed_change_threshold: 100.0,
        swipe_speed_boost: -1.0,
        max_speed: 1_000.0,
        speed_steps: 99,
        ..SeekGestureConfig::default()
    }
    .validated();

    assert_eq!(config.trigger_duration_ms, TRIGGER_DURATION_MS_MIN);
    assert_eq!(config.acceleration_interval_ms, ACCELERATION_INTERVAL_MS_MAX);
    assert_eq!(config.direction_change_threshold_px, DIRECTION_THRESHOLD_PX_MIN);
    assert_eq!(config.direction_change_cooldown_ms, DIRECTION_COOLDOWN_MS_MIN);
    assert_eq!(config.continuous_seek_interval_ms, SEEK_INTERVAL_MS_MIN);
    assert_eq!(config.speed_change_threshold, SPEED_CHANGE_THRESHOLD_MAX);
    assert_eq!(config.swipe_speed_boost, 0.0);
    assert_eq!(config.max_speed, MAX_SPEED_CEIL);
    assert_eq!(config.speed_steps, SPEED_TABLE_MAX_LEVELS);
}

#[test]
fn non_finite_floats_fall_back_to_defaults() {
    let config = SeekGestureConfig {
        min_speed: f32::NAN,
        max_speed: f32::INFINITY,
        speed_change_threshold: f32::NAN,
        ..SeekGestureConfig::default()
    }
    .validated();

    assert_eq!(config.min_speed, 1.0);
    assert_eq!(config.max_speed, 32.0);
    assert_eq!(config.speed_change_threshold, 0.25);
}

#[test]
fn max_speed_never_drops_below_min_speed() {
    let config = SeekGestureConfig {
        min_speed: 3.0,
        max_speed: 0.5,
        ..SeekGestureConfig::default()
    }
    .validated();

    assert_eq!(config.min_speed, 3.0);
    assert_eq!(config.max_speed, 3.0);
}

#[test]
fn haptic_periods_keep_their_order() {
    let haptics = HapticConfig {
        pulse_train_min_period_ms: 400,
        pulse_train_max_period_ms: 100,
        max_amplitude: 0,
        throttle_interval_ms: 0,
        ..HapticConfig::default()
    }
    .validated();

    assert_eq!(haptics.pulse_train_min_period_ms, 400);
    assert_eq!(haptics.pulse_train_max_period_ms, 400);
    assert_eq!(haptics.max_amplitude, 1);
    assert_eq!(haptics.throttle_interval_ms, HAPTIC_THROTTLE_MS_MIN);
}

#[test]
fn partial_toml_keeps_defaults_and_clamps() {
    let config = SeekGestureConfig::from_toml_str(
        r#"
        trigger_duration_ms = 5000
        speed_curve = "custom"
        speed_progression = [1.0, 1.5, 3.0]

        [haptics]
        pulse_train_enabled = true
        "#,
    )
    .expect("config should parse");

    assert_eq!(config.trigger_duration_ms, TRIGGER_DURATION_MS_MAX);
    assert_eq!(config.speed_curve, SpeedCurve::Custom);
    assert_eq!(config.acceleration_interval_ms, 1_000);
    assert!(config.haptics.pulse_train_enabled);
    assert!(config.haptics.enabled);
    assert_eq!(config.build_table().levels(), &[1.0, 1.5, 3.0]);
}

#[test]
fn malformed_toml_reports_parse_error() {
    let err = SeekGestureConfig::from_toml_str("trigger_duration_ms = \"soon\"")
        .expect_err("string is not a duration");
    assert!(matches!(err, ConfigError::Parse(_)));
    assert!(err.to_string().starts_with("invalid seek config"));
}

#[test]
fn toml_round_trip_preserves_validated_config() {
    let config = SeekGestureConfig {
        speed_curve: SpeedCurve::SmoothStep,
        trigger_duration_ms: 450,
        ..SeekGestureConfig::default()
    };
    let text = config.to_toml_string().expect("config should serialize");
    let parsed = SeekGestureConfig::from_toml_str(&text).expect("config should parse");
    assert_eq!(parsed, config);
}

#[test]
fn snapshot_builds_table_from_validated_config() {
    let snapshot = ConfigSnapshot::new(&SeekGestureConfig {
        speed_curve: SpeedCurve::Linear,
        min_speed: 1.0,
        max_speed: 5.0,
        speed_steps: 5,
        ..SeekGestureConfig::default()
    });

    assert_eq!(snapshot.table().levels(), &[1.0, 2.0, 3.0, 4.0, 5.0]);
    assert_eq!(snapshot.clamp_speed(9.0), 5.0);
    assert_eq!(snapshot.clamp_speed(0.1), 1.0);
    assert_eq!(snapshot.clamp_speed(f32::NAN), 1.0);
}
