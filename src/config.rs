use serde::{Deserialize, Serialize};

use crate::{
    error::ConfigError,
    progression::{SpeedCurve, SpeedProgressionTable, SPEED_TABLE_MAX_LEVELS},
};

pub const TRIGGER_DURATION_MS_MIN: u64 = 200;
pub const TRIGGER_DURATION_MS_MAX: u64 = 1_000;
pub const MIN_SPEED_FLOOR: f32 = 0.25;
pub const MIN_SPEED_CEIL: f32 = 4.0;
pub const MAX_SPEED_CEIL: f32 = 64.0;
pub const SPEED_STEPS_MIN: usize = 2;
pub const ACCELERATION_INTERVAL_MS_MIN: u64 = 250;
pub const ACCELERATION_INTERVAL_MS_MAX: u64 = 5_000;
pub const DIRECTION_THRESHOLD_PX_MIN: f32 = 10.0;
pub const DIRECTION_THRESHOLD_PX_MAX: f32 = 300.0;
pub const DIRECTION_COOLDOWN_MS_MIN: u64 = 100;
pub const DIRECTION_COOLDOWN_MS_MAX: u64 = 2_000;
pub const SEEK_INTERVAL_MS_MIN: u64 = 16;
pub const SEEK_INTERVAL_MS_MAX: u64 = 500;
pub const SPEED_CHANGE_THRESHOLD_MIN: f32 = 0.05;
pub const SPEED_CHANGE_THRESHOLD_MAX: f32 = 4.0;
pub const SWIPE_SPEED_BOOST_MAX: f32 = 4.0;
pub const TIMER_LAG_MS_MIN: u64 = 50;
pub const TIMER_LAG_MS_MAX: u64 = 5_000;
pub const HAPTIC_THROTTLE_MS_MIN: u64 = 8;
pub const HAPTIC_THROTTLE_MS_MAX: u64 = 100;
pub const PULSE_TRAIN_BASE_MS_MIN: u64 = 50;
pub const PULSE_TRAIN_BASE_MS_MAX: u64 = 2_000;
pub const PULSE_TRAIN_MIN_PERIOD_MS_MIN: u64 = 20;
pub const PULSE_TRAIN_MIN_PERIOD_MS_MAX: u64 = 500;
pub const PULSE_TRAIN_MAX_PERIOD_MS_MAX: u64 = 2_000;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HapticConfig {
    pub enabled: bool,
    pub throttle_interval_ms: u64,
    pub max_amplitude: u8,
    pub pulse_train_enabled: bool,
    pub pulse_train_base_interval_ms: u64,
    pub pulse_train_min_period_ms: u64,
    pub pulse_train_max_period_ms: u64,
}

impl Default for HapticConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            throttle_interval_ms: 16,
            max_amplitude: 255,
            pulse_train_enabled: false,
            pulse_train_base_interval_ms: 400,
            pulse_train_min_period_ms: 60,
            pulse_train_max_period_ms: 600,
        }
    }
}

impl HapticConfig {
    pub fn validated(&self) -> Self {
        let pulse_train_min_period_ms = clamp_u64(
            "haptics.pulse_train_min_period_ms",
            self.pulse_train_min_period_ms,
            PULSE_TRAIN_MIN_PERIOD_MS_MIN,
            PULSE_TRAIN_MIN_PERIOD_MS_MAX,
        );
        Self {
            enabled: self.enabled,
            throttle_interval_ms: clamp_u64(
                "haptics.throttle_interval_ms",
                self.throttle_interval_ms,
                HAPTIC_THROTTLE_MS_MIN,
                HAPTIC_THROTTLE_MS_MAX,
            ),
            max_amplitude: if self.max_amplitude == 0 {
                log::warn!("seek: config haptics.max_amplitude clamped 0 -> 1");
                1
            } else {
                self.max_amplitude
            },
            pulse_train_enabled: self.pulse_train_enabled,
            pulse_train_base_interval_ms: clamp_u64(
                "haptics.pulse_train_base_interval_ms",
                self.pulse_train_base_interval_ms,
                PULSE_TRAIN_BASE_MS_MIN,
                PULSE_TRAIN_BASE_MS_MAX,
            ),
            pulse_train_min_period_ms,
            pulse_train_max_period_ms: clamp_u64(
                "haptics.pulse_train_max_period_ms",
                self.pulse_train_max_period_ms,
                pulse_train_min_period_ms,
                PULSE_TRAIN_MAX_PERIOD_MS_MAX,
            ),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeekGestureConfig {
    pub trigger_duration_ms: u64,
    pub speed_curve: SpeedCurve,
    /// Explicit multipliers, used when `speed_curve` is `custom`.
    pub speed_progression: Vec<f32>,
    pub min_speed: f32,
    pub max_speed: f32,
    pub speed_steps: usize,
    pub acceleration_interval_ms: u64,
    pub direction_change_enabled: bool,
    pub direction_change_threshold_px: f32,
    pub direction_change_cooldown_ms: u64,
    pub continuous_seek_interval_ms: u64,
    pub speed_change_threshold: f32,
    pub swipe_speed_boost: f32,
    pub max_timer_lag_ms: u64,
    pub auto_tune: bool,
    pub haptics: HapticConfig,
}

impl Default for SeekGestureConfig {
    fn default() -> Self {
        Self {
            trigger_duration_ms: 300,
            speed_curve: SpeedCurve::Exponential,
            speed_progression: vec![1.0, 2.0, 4.0, 8.0, 16.0, 32.0],
            min_speed: 1.0,
            max_speed: 32.0,
            speed_steps: 6,
            acceleration_interval_ms: 1_000,
            direction_change_enabled: true,
            direction_change_threshold_px: 50.0,
            direction_change_cooldown_ms: 300,
            continuous_seek_interval_ms: 50,
            speed_change_threshold: 0.25,
            swipe_speed_boost: 1.0,
            max_timer_lag_ms: 500,
            auto_tune: true,
            haptics: HapticConfig::default(),
        }
    }
}

impl SeekGestureConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let parsed: Self = toml::from_str(source)?;
        Ok(parsed.validated())
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    /// Returns a copy with every field pulled into its safe range.
    pub fn validated(&self) -> Self {
        let defaults = Self::default();
        let min_speed = clamp_f32(
            "min_speed",
            finite_or(self.min_speed, defaults.min_speed),
            MIN_SPEED_FLOOR,
            MIN_SPEED_CEIL,
        );
        let max_speed = clamp_f32(
            "max_speed",
            finite_or(self.max_speed, defaults.max_speed),
            min_speed.max(1.0),
            MAX_SPEED_CEIL,
        );
        let mut speed_progression = self.speed_progression.clone();
        if speed_progression.len() > SPEED_TABLE_MAX_LEVELS {
            log::warn!(
                "seek: config speed_progression truncated {} -> {}",
                speed_progression.len(),
                SPEED_TABLE_MAX_LEVELS
            );
            speed_progression.truncate(SPEED_TABLE_MAX_LEVELS);
        }

        Self {
            trigger_duration_ms: clamp_u64(
                "trigger_duration_ms",
                self.trigger_duration_ms,
                TRIGGER_DURATION_MS_MIN,
                TRIGGER_DURATION_MS_MAX,
            ),
            speed_curve: self.speed_curve,
            speed_progression,
            min_speed,
            max_speed,
            speed_steps: clamp_usize(
                "speed_steps",
                self.speed_steps,
                SPEED_STEPS_MIN,
                SPEED_TABLE_MAX_LEVELS,
            ),
            acceleration_interval_ms: clamp_u64(
                "acceleration_interval_ms",
                self.acceleration_interval_ms,
                ACCELERATION_INTERVAL_MS_MIN,
                ACCELERATION_INTERVAL_MS_MAX,
            ),
            direction_change_enabled: self.direction_change_enabled,
            direction_change_threshold_px: clamp_f32(
                "direction_change_threshold_px",
                finite_or(
                    self.direction_change_threshold_px,
                    defaults.direction_change_threshold_px,
                ),
                DIRECTION_THRESHOLD_PX_MIN,
                DIRECTION_THRESHOLD_PX_MAX,
            ),
            direction_change_cooldown_ms: clamp_u64(
                "direction_change_cooldown_ms",
                self.direction_change_cooldown_ms,
                DIRECTION_COOLDOWN_MS_MIN,
                DIRECTION_COOLDOWN_MS_MAX,
            ),
            continuous_seek_interval_ms: clamp_u64(
                "continuous_seek_interval_ms",
                self.continuous_seek_interval_ms,
                SEEK_INTERVAL_MS_MIN,
                SEEK_INTERVAL_MS_MAX,
            ),
            speed_change_threshold: clamp_f32(
                "speed_change_threshold",
                finite_or(self.speed_change_threshold, defaults.speed_change_threshold),
                SPEED_CHANGE_THRESHOLD_MIN,
                SPEED_CHANGE_THRESHOLD_MAX,
            ),
            swipe_speed_boost: clamp_f32(
                "swipe_speed_boost",
                finite_or(self.swipe_speed_boost, defaults.swipe_speed_boost),
                0.0,
                SWIPE_SPEED_BOOST_MAX,
            ),
            max_timer_lag_ms: clamp_u64(
                "max_timer_lag_ms",
                self.max_timer_lag_ms,
                TIMER_LAG_MS_MIN,
                TIMER_LAG_MS_MAX,
            ),
            auto_tune: self.auto_tune,
            haptics: self.haptics.validated(),
        }
    }

    pub fn build_table(&self) -> SpeedProgressionTable {
        match self.speed_curve {
            SpeedCurve::Custom => SpeedProgressionTable::from_levels(
                &self.speed_progression,
                self.min_speed,
                self.max_speed,
            ),
            curve => SpeedProgressionTable::from_curve(
                curve,
                self.min_speed,
                self.max_speed,
                self.speed_steps,
            ),
        }
    }
}

/// Immutable validated config plus the progression table built from it.
///
/// Shared behind an `Arc`; an update produces a new snapshot and never touches one a
/// session is already using.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfigSnapshot {
    config: SeekGestureConfig,
    table: SpeedProgressionTable,
}

impl ConfigSnapshot {
    pub fn new(config: &SeekGestureConfig) -> Self {
        let config = config.validated();
        let table = config.build_table();
        Self { config, table }
    }

    pub fn config(&self) -> &SeekGestureConfig {
        &self.config
    }

    pub fn table(&self) -> &SpeedProgressionTable {
        &self.table
    }

    pub fn clamp_speed(&self, speed: f32) -> f32 {
        let speed = finite_or(speed, self.config.min_speed);
        speed.clamp(self.config.min_speed, self.config.max_speed)
    }
}

impl Default for ConfigSnapshot {
    fn default() -> Self {
        Self::new(&SeekGestureConfig::default())
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

fn clamp_u64(field: &str, value: u64, min: u64, max: u64) -> u64 {
    let clamped = value.clamp(min, max);
    if clamped != value {
        log::warn!("seek: config {field} clamped {value} -> {clamped}");
    }
    clamped
}

fn clamp_usize(field: &str, value: usize, min: usize, max: usize) -> usize {
    let clamped = value.clamp(min, max);
    if clamped != value {
        log::warn!("seek: config {field} clamped {value} -> {clamped}");
    }
    clamped
}

fn clamp_f32(field: &str, value: f32, min: f32, max: f32) -> f32 {
    let clamped = value.clamp(min, max);
    if clamped != value {
        log::warn!("seek: config {field} clamped {value} -> {clamped}");
    }
    clamped
}

#[cfg(test)]
mod tests;
