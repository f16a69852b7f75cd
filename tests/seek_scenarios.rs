use longseek::{
    GestureKind, GestureUsageRecord, HapticPattern, MediaSnapshot, SeekController,
    SeekDirection, SeekGestureConfig, SeekSink, SpeedCurve, SurfaceSize, TouchPoint,
};

#[derive(Clone, Debug, PartialEq)]
enum Call {
    Start { position_ms: u64, direction: SeekDirection },
    Update { position_ms: u64, level: usize },
    Speed { speed: f32, level: usize },
    Direction(SeekDirection),
    End { position_ms: u64, success: bool },
    Haptic,
    Usage(GestureKind),
}

#[derive(Default)]
struct Host {
    calls: Vec<Call>,
}

impl SeekSink for Host {
    fn on_seek_start(&mut self, position_ms: u64, direction: SeekDirection) {
        self.calls.push(Call::Start {
            position_ms,
            direction,
        });
    }

    fn on_seek_update(
        &mut self,
        position_ms: u64,
        _speed: f32,
        _direction: SeekDirection,
        level: usize,
    ) {
        self.calls.push(Call::Update { position_ms, level });
    }

    fn on_speed_change(&mut self, speed: f32, level: usize) {
        self.calls.push(Call::Speed { speed, level });
    }

    fn on_direction_change(&mut self, direction: SeekDirection) {
        self.calls.push(Call::Direction(direction));
    }

    fn on_seek_end(&mut self, position_ms: u64, success: bool) {
        self.calls.push(Call::End {
            position_ms,
            success,
        });
    }

    fn on_haptic_pulse(&mut self, _pattern: &HapticPattern) {
        self.calls.push(Call::Haptic);
    }

    fn on_usage_recorded(&mut self, record: &GestureUsageRecord) {
        self.calls.push(Call::Usage(record.kind));
    }
}

impl Host {
    fn starts(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, Call::Start { .. }))
            .count()
    }

    fn direction_changes(&self) -> Vec<SeekDirection> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Direction(direction) => Some(*direction),
                _ => None,
            })
            .collect()
    }

    fn end(&self) -> Option<(u64, bool)> {
        self.calls.iter().find_map(|call| match call {
            Call::End {
                position_ms,
                success,
            } => Some((*position_ms, *success)),
            _ => None,
        })
    }
}

fn scenario_config() -> SeekGestureConfig {
    SeekGestureConfig {
        trigger_duration_ms: 300,
        speed_curve: SpeedCurve::Custom,
        speed_progression: vec![1.0, 2.0, 4.0, 8.0, 16.0, 32.0],
        acceleration_interval_ms: 1_000,
        ..SeekGestureConfig::default()
    }
}

fn controller(media: MediaSnapshot) -> SeekController<MediaSnapshot, Host> {
    let mut controller = SeekController::new(media, Host::default(), &scenario_config());
    controller.set_surface_size(SurfaceSize::new(1_080.0, 1_920.0));
    controller
}

#[test]
fn scenario_a_hold_accelerates_on_schedule() {
    let mut controller = controller(MediaSnapshot::new(60_000, 3_600_000));
    let touch = TouchPoint::new(900.0, 960.0);

    controller.pointer_down(0, touch);
    let mut speed_changes = Vec::new();
    let mut now_ms = 0;
    while now_ms < 3_500 {
        now_ms += 10;
        let output = controller.advance(now_ms);
        for event in output {
            if let longseek::SeekEvent::SpeedChanged { t_ms, speed, .. } = event {
                speed_changes.push((t_ms, speed));
            }
            if let longseek::SeekEvent::SeekStarted { t_ms, direction, .. } = event {
                assert_eq!(t_ms, 300);
                assert_eq!(direction, SeekDirection::Forward);
                assert_eq!(controller.engine().session().speed_multiplier, 1.0);
            }
        }
    }
    controller.pointer_up(3_500);

    assert_eq!(
        speed_changes,
        vec![(1_300, 2.0), (2_300, 4.0), (3_300, 8.0)]
    );
    let host = controller.sink();
    assert_eq!(host.starts(), 1);
    let (position_ms, success) = host.end().expect("seek ended");
    assert!(success);
    assert!(position_ms > 60_000);
    assert_eq!(host.calls.last(), Some(&Call::Usage(GestureKind::LongPressSeek)));
}

#[test]
fn scenario_b_early_release_never_activates() {
    let mut controller = controller(MediaSnapshot::new(60_000, 3_600_000));
    controller.pointer_down(0, TouchPoint::new(500.0, 500.0));
    controller.pointer_move(120, TouchPoint::new(505.0, 500.0));
    controller.pointer_up(250);
    controller.advance(2_000);

    assert!(controller.sink().calls.is_empty());
    assert!(!controller.engine().is_active());
}

#[test]
fn scenario_c_direction_flip_then_cooldown() {
    let mut controller = controller(MediaSnapshot::new(60_000, 3_600_000));
    let start = TouchPoint::new(800.0, 960.0);
    controller.pointer_down(0, start);
    controller.advance(300);
    assert_eq!(controller.engine().session().direction, SeekDirection::Forward);

    controller.pointer_move(400, TouchPoint::new(700.0, 960.0));
    assert_eq!(controller.sink().direction_changes(), vec![SeekDirection::Backward]);

    controller.pointer_move(450, TouchPoint::new(900.0, 960.0));
    controller.pointer_move(500, TouchPoint::new(690.0, 960.0));
    controller.pointer_move(600, TouchPoint::new(910.0, 960.0));
    assert_eq!(controller.sink().direction_changes(), vec![SeekDirection::Backward]);
    assert_eq!(controller.engine().session().direction, SeekDirection::Backward);
}

#[test]
fn scenario_d_zero_duration_media() {
    let mut controller = controller(MediaSnapshot::new(0, 0));
    controller.pointer_down(0, TouchPoint::new(900.0, 960.0));
    for step in 1..=100u64 {
        controller.advance(step * 50);
        assert_eq!(controller.engine().session().current_position_ms, 0);
    }
    controller.pointer_up(5_050);

    let host = controller.sink();
    assert!(host
        .calls
        .iter()
        .all(|call| !matches!(call, Call::Update { .. })));
    let (position_ms, success) = host.end().expect("seek ended");
    assert_eq!(position_ms, 0);
    assert!(success);
}

#[test]
fn preempting_gesture_ends_without_success() {
    let mut controller = controller(MediaSnapshot::new(60_000, 3_600_000));
    controller.pointer_down(0, TouchPoint::new(900.0, 960.0));
    controller.advance(2_000);
    controller.preempt(2_010, GestureKind::PinchZoom);

    let (_, success) = controller.sink().end().expect("seek ended");
    assert!(!success);
    assert!(!controller.engine().is_active());
}
