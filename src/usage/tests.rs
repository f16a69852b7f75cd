use super::*;

fn seek_summary(duration_ms: u64, direction_changes: u16, net: u64, total: u64) -> SessionSummary {
    SessionSummary {
        started_ms: 0,
        duration_ms,
        start_position_ms: 0,
        final_position_ms: net,
        net_seek_ms: net,
        total_seek_ms: total,
        touch_path_px: 200.0,
        peak_touch_velocity_px_s: 900.0,
        direction_changes,
        max_speed: 8.0,
        average_speed: 3.0,
        max_level: 3,
    }
}

#[test]
fn session_sample_carries_derived_stats() {
    let sample = GestureSample::from_session(&seek_summary(2_000, 1, 3_000, 4_000), 2_300, true);
    assert_eq!(sample.kind, GestureKind::LongPressSeek);
    assert_eq!(sample.duration_ms, 2_000);
    assert!((sample.velocity_px_s - 100.0).abs() < 1.0e-3);
    assert!((sample.accuracy - 0.75).abs() < 1.0e-6);
    assert_eq!(sample.direction_changes, 1);
}

#[test]
fn record_keeps_running_means_per_kind() {
    let mut recorder = GestureUsageRecorder::new();
    recorder.record_session(&seek_summary(1_000, 0, 10, 10), 1_000, true);
    let record = recorder.record_session(&seek_summary(3_000, 4, 10, 10), 5_000, true);

    assert_eq!(record.frequency, 2);
    assert!((record.mean_duration_ms - 2_000.0).abs() < 1.0e-3);
    assert!((record.mean_direction_changes - 2.0).abs() < 1.0e-6);
    assert_eq!(record.last_used_ms, Some(5_000));
    assert_eq!(recorder.record_for(GestureKind::SingleTap).frequency, 0);
}

#[test]
fn success_rate_is_seeded_then_smoothed() {
    let mut recorder = GestureUsageRecorder::new();
    let first = recorder.record(GestureSample::gesture(
        GestureKind::DoubleTap,
        10,
        120,
        3.0,
        false,
    ));
    assert_eq!(first.success_rate, 0.0);
    let second = recorder.record(GestureSample::gesture(
        GestureKind::DoubleTap,
        20,
        120,
        3.0,
        true,
    ));
    assert!((second.success_rate - 0.1).abs() < 1.0e-6);
    let third = recorder.record(GestureSample::gesture(
        GestureKind::DoubleTap,
        30,
        120,
        3.0,
        true,
    ));
    assert!((third.success_rate - 0.19).abs() < 1.0e-6);
}

#[test]
fn history_is_bounded() {
    let mut recorder = GestureUsageRecorder::new();
    for index in 0..(USAGE_HISTORY_LEN as u64 + 40) {
        recorder.record(GestureSample::gesture(GestureKind::Swipe, index, 80, 120.0, true));
    }
    assert_eq!(recorder.history_len(GestureKind::Swipe), USAGE_HISTORY_LEN);
    assert_eq!(
        recorder.record_for(GestureKind::Swipe).frequency,
        USAGE_HISTORY_LEN as u32 + 40
    );
    let oldest = recorder.recent(GestureKind::Swipe).next().map(|sample| sample.ended_ms);
    assert_eq!(oldest, Some(40));
}

#[test]
fn summary_covers_most_recent_window() {
    let mut recorder = GestureUsageRecorder::new();
    for _ in 0..5 {
        recorder.record_session(&seek_summary(1_000, 0, 10, 10), 0, true);
    }
    for _ in 0..5 {
        recorder.record_session(&seek_summary(1_000, 3, 10, 10), 0, false);
    }

    let recent = recorder.summary(GestureKind::LongPressSeek, 5);
    assert_eq!(recent.samples, 5);
    assert_eq!(recent.success_rate, 0.0);
    assert!((recent.mean_direction_changes - 3.0).abs() < 1.0e-6);

    let all = recorder.summary(GestureKind::LongPressSeek, 100);
    assert_eq!(all.samples, 10);
    assert!((all.success_rate - 0.5).abs() < 1.0e-6);
}

#[test]
fn empty_summary_is_neutral() {
    let recorder = GestureUsageRecorder::new();
    assert_eq!(
        recorder.summary(GestureKind::PinchZoom, 10),
        UsageSummary::default()
    );
}

#[test]
fn non_seek_gesture_sample_guards_inputs() {
    let sample = GestureSample::gesture(GestureKind::PinchZoom, 0, 0, f32::NAN, true);
    assert_eq!(sample.distance_px, 0.0);
    assert_eq!(sample.velocity_px_s, 0.0);
}
