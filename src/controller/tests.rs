use super::*;
use crate::types::MediaSnapshot;

#[derive(Clone, Debug, PartialEq)]
enum Callback {
    Start(u64, SeekDirection),
    Update(u64, usize),
    Speed(usize),
    Direction(SeekDirection),
    End(u64, bool),
    Pulse(u8),
    Usage(GestureKind, u32),
}

#[derive(Default)]
struct RecordingSink {
    calls: std::vec::Vec<Callback>,
}

impl SeekSink for RecordingSink {
    fn on_seek_start(&mut self, position_ms: u64, direction: SeekDirection) {
        self.calls.push(Callback::Start(position_ms, direction));
    }

    fn on_seek_update(
        &mut self,
        position_ms: u64,
        _speed: f32,
        _direction: SeekDirection,
        level: usize,
    ) {
        self.calls.push(Callback::Update(position_ms, level));
    }

    fn on_speed_change(&mut self, _speed: f32, level: usize) {
        self.calls.push(Callback::Speed(level));
    }

    fn on_direction_change(&mut self, direction: SeekDirection) {
        self.calls.push(Callback::Direction(direction));
    }

    fn on_seek_end(&mut self, position_ms: u64, success: bool) {
        self.calls.push(Callback::End(position_ms, success));
    }

    fn on_haptic_pulse(&mut self, pattern: &HapticPattern) {
        self.calls.push(Callback::Pulse(pattern.peak_amplitude()));
    }

    fn on_usage_recorded(&mut self, record: &GestureUsageRecord) {
        self.calls.push(Callback::Usage(record.kind, record.frequency));
    }
}

fn controller(config: &SeekGestureConfig) -> SeekController<MediaSnapshot, RecordingSink> {
    let mut controller = SeekController::new(
        MediaSnapshot::new(5_000, 120_000),
        RecordingSink::default(),
        config,
    );
    controller.set_surface_size(SurfaceSize::new(1_000.0, 500.0));
    controller
}

#[test]
fn activation_routes_start_and_pulse() {
    let mut controller = controller(&SeekGestureConfig::default());
    controller.pointer_down(0, TouchPoint::new(900.0, 100.0));
    controller.advance(300);
    assert_eq!(
        controller.sink().calls,
        std::vec![
            Callback::Start(5_000, SeekDirection::Forward),
            Callback::Pulse(200),
        ]
    );
}

#[test]
fn activation_reads_player_position_at_trigger_time() {
    let mut controller = controller(&SeekGestureConfig::default());
    controller.pointer_down(0, TouchPoint::new(900.0, 100.0));
    controller.media_mut().position_ms = 42_000;
    controller.advance(300);
    assert_eq!(
        controller.sink().calls[0],
        Callback::Start(42_000, SeekDirection::Forward)
    );
    assert_eq!(controller.engine().session().start_position_ms, 42_000);
}

#[test]
fn acceleration_pulses_but_swipe_does_not() {
    let mut controller = controller(&SeekGestureConfig::default());
    controller.pointer_down(0, TouchPoint::new(800.0, 100.0));
    controller.advance(300);
    controller.sink_mut().calls.clear();

    controller.pointer_move(310, TouchPoint::new(1_000.0, 100.0));
    assert_eq!(controller.sink().calls, std::vec![Callback::Speed(0)]);

    controller.sink_mut().calls.clear();
    controller.advance(1_300);
    let calls = &controller.sink().calls;
    let speed_at = calls
        .iter()
        .position(|call| *call == Callback::Speed(1))
        .expect("speed level change");
    assert_eq!(calls[speed_at + 1], Callback::Pulse(120));
}

#[test]
fn release_records_usage_and_ends_session() {
    let mut controller = controller(&SeekGestureConfig::default());
    controller.pointer_down(0, TouchPoint::new(800.0, 100.0));
    controller.advance(300);
    controller.sink_mut().calls.clear();
    controller.pointer_up(400);

    let calls = &controller.sink().calls;
    assert_eq!(calls[calls.len() - 1], Callback::Usage(GestureKind::LongPressSeek, 1));
    assert!(calls.contains(&Callback::End(5_100, false)));
    assert_eq!(
        controller
            .recorder()
            .record_for(GestureKind::LongPressSeek)
            .frequency,
        1
    );
}

#[test]
fn tuner_feedback_reaches_next_session() {
    let tuner = TunerConfig {
        min_samples: 2,
        ..TunerConfig::default()
    };
    let mut controller = SeekController::with_tuner(
        MediaSnapshot::new(5_000, 120_000),
        RecordingSink::default(),
        &SeekGestureConfig::default(),
        tuner,
    );

    for round in 0..2u64 {
        let start = round * 10_000;
        controller.pointer_down(start, TouchPoint::new(800.0, 100.0));
        controller.advance(start + 300);
        controller.pointer_up(start + 350);
    }
    assert_eq!(controller.settings().config().trigger_duration_ms, 350);
    assert_eq!(controller.bridge().generation(), 1);

    controller.pointer_down(50_000, TouchPoint::new(800.0, 100.0));
    assert_eq!(controller.next_deadline_ms(), Some(50_350));
}

#[test]
fn user_config_update_reaches_haptics_and_engine() {
    let mut controller = controller(&SeekGestureConfig::default());
    let config = SeekGestureConfig {
        trigger_duration_ms: 500,
        haptics: crate::config::HapticConfig {
            enabled: false,
            ..crate::config::HapticConfig::default()
        },
        ..SeekGestureConfig::default()
    };
    controller.update_config(&config);
    assert!(!controller.haptics().config().enabled);

    controller.pointer_down(0, TouchPoint::new(800.0, 100.0));
    assert_eq!(controller.next_deadline_ms(), Some(500));
    controller.advance(500);
    assert_eq!(
        controller.sink().calls,
        std::vec![Callback::Start(5_000, SeekDirection::Forward)]
    );
}

#[test]
fn host_gestures_are_recorded_separately() {
    let mut controller = controller(&SeekGestureConfig::default());
    let record = controller.record_gesture(GestureSample::gesture(
        GestureKind::DoubleTap,
        10,
        180,
        4.0,
        true,
    ));
    assert_eq!(record.kind, GestureKind::DoubleTap);
    assert_eq!(
        controller.sink().calls,
        std::vec![Callback::Usage(GestureKind::DoubleTap, 1)]
    );
    assert_eq!(
        controller
            .recorder()
            .record_for(GestureKind::LongPressSeek)
            .frequency,
        0
    );
}

#[test]
fn direction_change_routes_callback_and_pulse() {
    let mut controller = controller(&SeekGestureConfig::default());
    controller.pointer_down(0, TouchPoint::new(800.0, 100.0));
    controller.advance(300);
    controller.sink_mut().calls.clear();
    controller.pointer_move(320, TouchPoint::new(700.0, 100.0));
    assert_eq!(
        controller.sink().calls,
        std::vec![Callback::Direction(SeekDirection::Backward), Callback::Pulse(160)]
    );
}
