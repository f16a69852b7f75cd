use serde::Serialize;

use crate::config::HapticConfig;

pub const HAPTIC_PATTERN_MAX_STEPS: usize = 8;

const SPEED_LEVEL_BASE_AMPLITUDE: u16 = 96;
const SPEED_LEVEL_AMPLITUDE_STEP: u16 = 24;
const PULSE_TRAIN_AMPLITUDE_MAX: u8 = 72;

/// One segment of a vibration pattern. Zero amplitude is a pause.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct HapticStep {
    pub duration_ms: u32,
    pub amplitude: u8,
}

impl HapticStep {
    pub const fn new(duration_ms: u32, amplitude: u8) -> Self {
        Self {
            duration_ms,
            amplitude,
        }
    }

    pub const fn pause(duration_ms: u32) -> Self {
        Self::new(duration_ms, 0)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct HapticPattern {
    steps: heapless::Vec<HapticStep, HAPTIC_PATTERN_MAX_STEPS>,
}

impl HapticPattern {
    /// Builds a pattern, keeping at most `HAPTIC_PATTERN_MAX_STEPS` steps.
    pub fn from_steps(steps: &[HapticStep]) -> Self {
        let mut pattern = Self::default();
        for step in steps.iter().take(HAPTIC_PATTERN_MAX_STEPS) {
            let _ = pattern.steps.push(*step);
        }
        pattern
    }

    pub fn activation() -> Self {
        Self::from_steps(&[HapticStep::new(40, 200)])
    }

    /// Amplitude grows with `level` and never exceeds `max_amplitude`.
    pub fn speed_level(level: usize, max_amplitude: u8) -> Self {
        let scaled = SPEED_LEVEL_BASE_AMPLITUDE
            .saturating_add(SPEED_LEVEL_AMPLITUDE_STEP.saturating_mul(level.min(16) as u16));
        let amplitude = scaled.min(u16::from(max_amplitude)).min(u16::from(u8::MAX)) as u8;
        Self::from_steps(&[HapticStep::new(25, amplitude)])
    }

    pub fn direction_change() -> Self {
        Self::from_steps(&[
            HapticStep::new(15, 160),
            HapticStep::pause(40),
            HapticStep::new(15, 160),
        ])
    }

    pub fn deactivation() -> Self {
        Self::from_steps(&[HapticStep::new(20, 140), HapticStep::new(40, 60)])
    }

    pub fn pulse_train_tick(speed: f32) -> Self {
        let speed = if speed.is_finite() { speed.max(0.0) } else { 0.0 };
        let amplitude = (24.0 + speed * 3.0).min(f32::from(PULSE_TRAIN_AMPLITUDE_MAX)) as u8;
        Self::from_steps(&[HapticStep::new(8, amplitude)])
    }

    pub fn steps(&self) -> &[HapticStep] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn total_duration_ms(&self) -> u32 {
        self.steps
            .iter()
            .fold(0u32, |total, step| total.saturating_add(step.duration_ms))
    }

    pub fn peak_amplitude(&self) -> u8 {
        self.steps
            .iter()
            .map(|step| step.amplitude)
            .max()
            .unwrap_or(0)
    }

    pub fn capped(mut self, max_amplitude: u8) -> Self {
        for step in self.steps.iter_mut() {
            step.amplitude = step.amplitude.min(max_amplitude);
        }
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HapticCue {
    Activation,
    SpeedLevelChange(usize),
    DirectionChange,
    Deactivation,
}

/// Maps seek cues to patterns behind one rate limiter.
///
/// A pulse requested within `throttle_interval_ms` of the previous emitted pulse is
/// dropped, never queued.
#[derive(Clone, Debug)]
pub struct HapticCoordinator {
    config: HapticConfig,
    last_pulse_ms: Option<u64>,
    train_active: bool,
    next_train_ms: Option<u64>,
    dropped: u32,
}

impl Default for HapticCoordinator {
    fn default() -> Self {
        Self::new(HapticConfig::default())
    }
}

impl HapticCoordinator {
    pub fn new(config: HapticConfig) -> Self {
        Self {
            config: config.validated(),
            last_pulse_ms: None,
            train_active: false,
            next_train_ms: None,
            dropped: 0,
        }
    }

    pub fn config(&self) -> &HapticConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: HapticConfig) {
        self.config = config.validated();
        if !self.config.enabled || !self.config.pulse_train_enabled {
            self.stop_train();
        }
    }

    pub fn dropped_pulses(&self) -> u32 {
        self.dropped
    }

    pub fn pulse_train_active(&self) -> bool {
        self.train_active
    }

    pub fn on_cue(&mut self, now_ms: u64, cue: HapticCue) -> Option<HapticPattern> {
        match cue {
            HapticCue::Activation => {
                self.train_active = self.config.enabled && self.config.pulse_train_enabled;
                self.next_train_ms = None;
            }
            HapticCue::Deactivation => self.stop_train(),
            HapticCue::SpeedLevelChange(_) | HapticCue::DirectionChange => {}
        }
        if !self.config.enabled {
            return None;
        }
        let pattern = match cue {
            HapticCue::Activation => HapticPattern::activation(),
            HapticCue::SpeedLevelChange(level) => {
                HapticPattern::speed_level(level, self.config.max_amplitude)
            }
            HapticCue::DirectionChange => HapticPattern::direction_change(),
            HapticCue::Deactivation => HapticPattern::deactivation(),
        };
        self.throttled(now_ms, pattern)
    }

    /// Pulse-train step, evaluated on each continuous-seek update while active.
    pub fn on_seek_update(&mut self, now_ms: u64, speed: f32) -> Option<HapticPattern> {
        if !self.train_active {
            return None;
        }
        let period_ms = self.pulse_train_period_ms(speed);
        match self.next_train_ms {
            Some(due_ms) if now_ms >= due_ms => {
                self.next_train_ms = Some(now_ms.saturating_add(period_ms));
                self.throttled(now_ms, HapticPattern::pulse_train_tick(speed))
            }
            Some(_) => None,
            None => {
                self.next_train_ms = Some(now_ms.saturating_add(period_ms));
                None
            }
        }
    }

    pub fn pulse_train_period_ms(&self, speed: f32) -> u64 {
        let base = self.config.pulse_train_base_interval_ms as f32;
        let min = self.config.pulse_train_min_period_ms;
        let max = self.config.pulse_train_max_period_ms;
        if !speed.is_finite() || speed <= 0.0 {
            return max;
        }
        ((base / speed).round() as u64).clamp(min, max)
    }

    fn stop_train(&mut self) {
        self.train_active = false;
        self.next_train_ms = None;
    }

    fn throttled(&mut self, now_ms: u64, pattern: HapticPattern) -> Option<HapticPattern> {
        if let Some(last_ms) = self.last_pulse_ms {
            if now_ms.saturating_sub(last_ms) < self.config.throttle_interval_ms {
                self.dropped = self.dropped.saturating_add(1);
                log::debug!("seek: haptic pulse dropped t={}ms last={}ms", now_ms, last_ms);
                return None;
            }
        }
        self.last_pulse_ms = Some(now_ms);
        Some(pattern.capped(self.config.max_amplitude))
    }
}
