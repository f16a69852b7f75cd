use super::*;

const CURVES: [SpeedCurve; 4] = [
    SpeedCurve::Linear,
    SpeedCurve::Exponential,
    SpeedCurve::Logarithmic,
    SpeedCurve::SmoothStep,
];

fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1.0e-3,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn every_curve_spans_start_to_max_and_never_decreases() {
    for curve in CURVES {
        for steps in [2usize, 3, 6, 9, 16] {
            let table = SpeedProgressionTable::from_curve(curve, 1.0, 32.0, steps);
            assert_eq!(table.len(), steps);
            assert_close(table.speed_at(0), 1.0);
            assert_close(table.speed_at(steps - 1), 32.0);
            for pair in table.levels().windows(2) {
                assert!(pair[0] <= pair[1], "{curve:?} decreased: {:?}", table.levels());
            }
        }
    }
}

#[test]
fn exponential_curve_doubles_between_one_and_thirty_two() {
    let table = SpeedProgressionTable::from_curve(SpeedCurve::Exponential, 1.0, 32.0, 6);
    let expected = [1.0, 2.0, 4.0, 8.0, 16.0, 32.0];
    for (actual, expected) in table.levels().iter().zip(expected) {
        assert_close(*actual, expected);
    }
}

#[test]
fn smooth_step_is_symmetric_around_midpoint() {
    let table = SpeedProgressionTable::from_curve(SpeedCurve::SmoothStep, 0.0, 10.0, 5);
    assert_close(table.speed_at(2), 5.0);
    assert_close(table.speed_at(1) + table.speed_at(3), 10.0);
}

#[test]
fn logarithmic_curve_front_loads_growth() {
    let log = SpeedProgressionTable::from_curve(SpeedCurve::Logarithmic, 1.0, 9.0, 5);
    let linear = SpeedProgressionTable::from_curve(SpeedCurve::Linear, 1.0, 9.0, 5);
    assert!(log.speed_at(1) > linear.speed_at(1));
}

#[test]
fn next_level_saturates_at_last_entry() {
    let table = SpeedProgressionTable::from_levels(&[1.0, 2.0, 4.0], 1.0, 32.0);
    assert_eq!(table.next_level(0), 1);
    assert_eq!(table.next_level(1), 2);
    assert_eq!(table.next_level(2), 2);
    assert_eq!(table.next_level(usize::MAX), 2);
    assert_close(table.speed_at(99), 4.0);
}

#[test]
fn custom_levels_are_clamped_and_made_monotonic() {
    let table =
        SpeedProgressionTable::from_levels(&[3.0, 0.5, 8.0, 6.0, 100.0, f32::NAN], 1.0, 32.0);
    assert_eq!(table.levels(), &[1.0, 1.0, 8.0, 8.0, 32.0, 32.0]);
}

#[test]
fn empty_custom_levels_fall_back_to_min_speed() {
    let table = SpeedProgressionTable::from_levels(&[], 1.5, 32.0);
    assert_eq!(table.levels(), &[1.5]);
    assert_eq!(table.next_level(0), 0);
}

#[test]
fn base_seek_rate_follows_speed_bands() {
    assert_eq!(base_seek_ms_per_second(1.0), 1_000);
    assert_eq!(base_seek_ms_per_second(1.9), 1_000);
    assert_eq!(base_seek_ms_per_second(2.0), 2_000);
    assert_eq!(base_seek_ms_per_second(4.0), 4_000);
    assert_eq!(base_seek_ms_per_second(8.0), 8_000);
    assert_eq!(base_seek_ms_per_second(16.0), 16_000);
    assert_eq!(base_seek_ms_per_second(32.0), 32_000);
    assert_eq!(base_seek_ms_per_second(f32::NAN), 1_000);
}

#[test]
fn seek_amount_scales_with_band_speed_and_interval() {
    assert_eq!(seek_amount_ms(1.0, 50), 50);
    assert_eq!(seek_amount_ms(2.0, 50), 200);
    assert_eq!(seek_amount_ms(4.0, 100), 1_600);
    assert_eq!(seek_amount_ms(0.0, 50), 0);
    assert_eq!(seek_amount_ms(f32::INFINITY, 50), 0);
}
