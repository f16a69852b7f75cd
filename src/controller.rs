use std::sync::Arc;

use crate::{
    bridge::SettingsBridge,
    config::{ConfigSnapshot, SeekGestureConfig},
    engine::{SeekEngine, SeekEvent, SeekOutput, SpeedChangeCause},
    haptics::{HapticCoordinator, HapticCue, HapticPattern},
    tuner::TunerConfig,
    types::{GestureKind, MediaSource, SeekDirection, SurfaceSize, TouchPoint},
    usage::{GestureSample, GestureUsageRecord, GestureUsageRecorder},
};

/// Host side of the seek engine. Every callback defaults to a no-op.
pub trait SeekSink {
    fn on_seek_start(&mut self, _position_ms: u64, _direction: SeekDirection) {}

    fn on_seek_update(
        &mut self,
        _position_ms: u64,
        _speed: f32,
        _direction: SeekDirection,
        _level: usize,
    ) {
    }

    fn on_speed_change(&mut self, _speed: f32, _level: usize) {}

    fn on_direction_change(&mut self, _direction: SeekDirection) {}

    fn on_seek_end(&mut self, _position_ms: u64, _success: bool) {}

    fn on_haptic_pulse(&mut self, _pattern: &HapticPattern) {}

    fn on_usage_recorded(&mut self, _record: &GestureUsageRecord) {}
}

/// Engine plus the collaborators its output feeds: host callbacks, haptics, the usage
/// recorder and the settings bridge.
pub struct SeekController<M: MediaSource, S: SeekSink> {
    engine: SeekEngine,
    media: M,
    sink: S,
    haptics: HapticCoordinator,
    recorder: GestureUsageRecorder,
    bridge: SettingsBridge,
}

impl<M: MediaSource, S: SeekSink> SeekController<M, S> {
    pub fn new(media: M, sink: S, config: &SeekGestureConfig) -> Self {
        Self::with_tuner(media, sink, config, TunerConfig::default())
    }

    pub fn with_tuner(media: M, sink: S, config: &SeekGestureConfig, tuner: TunerConfig) -> Self {
        let bridge = SettingsBridge::new(config, tuner);
        let settings = bridge.current();
        Self {
            engine: SeekEngine::new(Arc::clone(&settings)),
            media,
            sink,
            haptics: HapticCoordinator::new(settings.config().haptics.clone()),
            recorder: GestureUsageRecorder::new(),
            bridge,
        }
    }

    pub fn engine(&self) -> &SeekEngine {
        &self.engine
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn haptics(&self) -> &HapticCoordinator {
        &self.haptics
    }

    pub fn recorder(&self) -> &GestureUsageRecorder {
        &self.recorder
    }

    pub fn bridge(&self) -> &SettingsBridge {
        &self.bridge
    }

    pub fn settings(&self) -> Arc<ConfigSnapshot> {
        self.bridge.current()
    }

    pub fn next_deadline_ms(&self) -> Option<u64> {
        self.engine.next_deadline_ms()
    }

    pub fn set_surface_size(&mut self, size: SurfaceSize) {
        self.engine.set_surface_size(size);
    }

    /// User settings change; a running session keeps the snapshot it started with.
    pub fn update_config(&mut self, config: &SeekGestureConfig) {
        let snapshot = self.bridge.set_user_config(config);
        self.apply_snapshot(snapshot);
    }

    pub fn pointer_down(&mut self, now_ms: u64, point: TouchPoint) -> SeekOutput {
        let output = self.engine.pointer_down(&self.media, now_ms, point);
        self.route(output)
    }

    pub fn pointer_move(&mut self, now_ms: u64, point: TouchPoint) -> SeekOutput {
        let output = self.engine.pointer_move(&self.media, now_ms, point);
        self.route(output)
    }

    pub fn pointer_up(&mut self, now_ms: u64) -> SeekOutput {
        let output = self.engine.pointer_up(&self.media, now_ms);
        self.route(output)
    }

    pub fn force_end(&mut self, now_ms: u64) -> SeekOutput {
        let output = self.engine.force_end(&self.media, now_ms);
        self.route(output)
    }

    pub fn preempt(&mut self, now_ms: u64, by: GestureKind) -> SeekOutput {
        let output = self.engine.preempt(&self.media, now_ms, by);
        self.route(output)
    }

    pub fn scheduler_fault(&mut self, now_ms: u64) -> SeekOutput {
        let output = self.engine.scheduler_fault(&self.media, now_ms);
        self.route(output)
    }

    pub fn advance(&mut self, now_ms: u64) -> SeekOutput {
        let output = self.engine.advance(&self.media, now_ms);
        self.route(output)
    }

    /// Records a gesture the host recognized itself, such as a tap or a pinch.
    pub fn record_gesture(&mut self, sample: GestureSample) -> GestureUsageRecord {
        let record = self.recorder.record(sample);
        self.sink.on_usage_recorded(&record);
        record
    }

    fn route(&mut self, output: SeekOutput) -> SeekOutput {
        for event in output.iter() {
            match *event {
                SeekEvent::SeekStarted {
                    t_ms,
                    position_ms,
                    direction,
                } => {
                    self.sink.on_seek_start(position_ms, direction);
                    self.pulse(t_ms, HapticCue::Activation);
                }
                SeekEvent::SeekUpdated {
                    t_ms,
                    position_ms,
                    speed,
                    direction,
                    level,
                } => {
                    self.sink.on_seek_update(position_ms, speed, direction, level);
                    if let Some(pattern) = self.haptics.on_seek_update(t_ms, speed) {
                        self.sink.on_haptic_pulse(&pattern);
                    }
                }
                SeekEvent::SpeedChanged {
                    t_ms,
                    speed,
                    level,
                    cause,
                } => {
                    self.sink.on_speed_change(speed, level);
                    if cause == SpeedChangeCause::Acceleration {
                        self.pulse(t_ms, HapticCue::SpeedLevelChange(level));
                    }
                }
                SeekEvent::DirectionChanged { t_ms, direction } => {
                    self.sink.on_direction_change(direction);
                    self.pulse(t_ms, HapticCue::DirectionChange);
                }
                SeekEvent::SeekEnded {
                    t_ms,
                    position_ms,
                    success,
                    summary,
                    ..
                } => {
                    self.sink.on_seek_end(position_ms, success);
                    self.pulse(t_ms, HapticCue::Deactivation);
                    let record = self.recorder.record_session(&summary, t_ms, success);
                    self.sink.on_usage_recorded(&record);
                    if let Some(snapshot) = self.bridge.on_usage(&self.recorder) {
                        self.apply_snapshot(snapshot);
                    }
                }
            }
        }
        output
    }

    fn pulse(&mut self, now_ms: u64, cue: HapticCue) {
        if let Some(pattern) = self.haptics.on_cue(now_ms, cue) {
            self.sink.on_haptic_pulse(&pattern);
        }
    }

    fn apply_snapshot(&mut self, snapshot: Arc<ConfigSnapshot>) {
        self.haptics.set_config(snapshot.config().haptics.clone());
        self.engine.update_config(snapshot);
    }
}

#[cfg(test)]
mod tests;
