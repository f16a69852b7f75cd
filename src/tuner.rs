use serde::{Deserialize, Serialize};

use crate::{
    config::SeekGestureConfig,
    types::GestureKind,
    usage::{GestureUsageRecorder, UsageSummary},
};

pub const MAX_ADJUSTMENTS: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TunerConfig {
    /// Samples required before any rule fires.
    pub min_samples: usize,
    /// Most recent samples the rules look at.
    pub window: usize,
    pub low_success_rate: f32,
    pub frequent_direction_changes: f32,
    pub trigger_step_ms: u64,
    pub acceleration_step_ms: u64,
    pub threshold_step_px: f32,
    pub cooldown_step_ms: u64,
}

impl Default for TunerConfig {
    fn default() -> Self {
        Self {
            min_samples: 10,
            window: 20,
            low_success_rate: 0.6,
            frequent_direction_changes: 2.0,
            trigger_step_ms: 50,
            acceleration_step_ms: 250,
            threshold_step_px: 10.0,
            cooldown_step_ms: 100,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "adjustment", rename_all = "snake_case")]
pub enum Adjustment {
    WidenTrigger { from_ms: u64, to_ms: u64 },
    SlowAcceleration { from_ms: u64, to_ms: u64 },
    RaiseDirectionThreshold { from_px: f32, to_px: f32 },
    LengthenCooldown { from_ms: u64, to_ms: u64 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Suggestion {
    pub config: SeekGestureConfig,
    pub adjustments: heapless::Vec<Adjustment, MAX_ADJUSTMENTS>,
    pub usage: UsageSummary,
}

impl Suggestion {
    pub fn is_unchanged(&self) -> bool {
        self.adjustments.is_empty()
    }
}

/// Derives configuration suggestions from recent seek usage.
///
/// Never reads engine state; the only output is a validated config.
#[derive(Clone, Copy, Debug, Default)]
pub struct AdaptiveTuner {
    config: TunerConfig,
}

impl AdaptiveTuner {
    pub fn new(config: TunerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TunerConfig {
        &self.config
    }

    pub fn evaluate(
        &self,
        current: &SeekGestureConfig,
        recorder: &GestureUsageRecorder,
    ) -> Suggestion {
        let usage = recorder.summary(GestureKind::LongPressSeek, self.config.window);
        self.suggest_config(current, &usage)
    }

    pub fn suggest_config(&self, current: &SeekGestureConfig, usage: &UsageSummary) -> Suggestion {
        let current = current.validated();
        let mut suggestion = Suggestion {
            config: current.clone(),
            adjustments: heapless::Vec::new(),
            usage: *usage,
        };
        if usage.samples < self.config.min_samples.max(1) {
            return suggestion;
        }

        let mut next = current.clone();
        if usage.success_rate < self.config.low_success_rate {
            next.trigger_duration_ms = next
                .trigger_duration_ms
                .saturating_add(self.config.trigger_step_ms);
            next.acceleration_interval_ms = next
                .acceleration_interval_ms
                .saturating_add(self.config.acceleration_step_ms);
        }
        if usage.mean_direction_changes > self.config.frequent_direction_changes {
            next.direction_change_threshold_px += self.config.threshold_step_px;
            next.direction_change_cooldown_ms = next
                .direction_change_cooldown_ms
                .saturating_add(self.config.cooldown_step_ms);
        }
        let next = next.validated();

        let adjustments = &mut suggestion.adjustments;
        if next.trigger_duration_ms != current.trigger_duration_ms {
            let _ = adjustments.push(Adjustment::WidenTrigger {
                from_ms: current.trigger_duration_ms,
                to_ms: next.trigger_duration_ms,
            });
        }
        if next.acceleration_interval_ms != current.acceleration_interval_ms {
            let _ = adjustments.push(Adjustment::SlowAcceleration {
                from_ms: current.acceleration_interval_ms,
                to_ms: next.acceleration_interval_ms,
            });
        }
        if next.direction_change_threshold_px != current.direction_change_threshold_px {
            let _ = adjustments.push(Adjustment::RaiseDirectionThreshold {
                from_px: current.direction_change_threshold_px,
                to_px: next.direction_change_threshold_px,
            });
        }
        if next.direction_change_cooldown_ms != current.direction_change_cooldown_ms {
            let _ = adjustments.push(Adjustment::LengthenCooldown {
                from_ms: current.direction_change_cooldown_ms,
                to_ms: next.direction_change_cooldown_ms,
            });
        }
        suggestion.config = next;
        suggestion
    }
}
