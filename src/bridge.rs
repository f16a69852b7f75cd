use std::sync::Arc;

use crate::{
    config::{ConfigSnapshot, SeekGestureConfig},
    tuner::{AdaptiveTuner, Suggestion, TunerConfig},
    usage::GestureUsageRecorder,
};

/// Owner of the live configuration snapshot.
///
/// Every change publishes a new `Arc<ConfigSnapshot>`; snapshots already handed out are
/// never mutated.
pub struct SettingsBridge {
    current: Arc<ConfigSnapshot>,
    tuner: AdaptiveTuner,
    samples_since_eval: usize,
    generation: u64,
    last_suggestion: Option<Suggestion>,
}

impl Default for SettingsBridge {
    fn default() -> Self {
        Self::new(&SeekGestureConfig::default(), TunerConfig::default())
    }
}

impl SettingsBridge {
    pub fn new(config: &SeekGestureConfig, tuner: TunerConfig) -> Self {
        Self {
            current: Arc::new(ConfigSnapshot::new(config)),
            tuner: AdaptiveTuner::new(tuner),
            samples_since_eval: 0,
            generation: 0,
            last_suggestion: None,
        }
    }

    pub fn current(&self) -> Arc<ConfigSnapshot> {
        Arc::clone(&self.current)
    }

    /// Bumped on every published snapshot.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn last_suggestion(&self) -> Option<&Suggestion> {
        self.last_suggestion.as_ref()
    }

    /// User settings replace the snapshot outright and restart the tuning window.
    pub fn set_user_config(&mut self, config: &SeekGestureConfig) -> Arc<ConfigSnapshot> {
        self.samples_since_eval = 0;
        self.publish(ConfigSnapshot::new(config))
    }

    /// Called after each recorded seek session. Returns the new snapshot when the tuner's
    /// suggestion was applied.
    pub fn on_usage(&mut self, recorder: &GestureUsageRecorder) -> Option<Arc<ConfigSnapshot>> {
        self.samples_since_eval = self.samples_since_eval.saturating_add(1);
        if !self.current.config().auto_tune {
            return None;
        }
        if self.samples_since_eval < self.tuner.config().min_samples.max(1) {
            return None;
        }
        self.samples_since_eval = 0;

        let suggestion = self.tuner.evaluate(self.current.config(), recorder);
        let changed = !suggestion.is_unchanged() && suggestion.config != *self.current.config();
        let next = changed.then(|| suggestion.config.clone());
        if changed {
            log::info!(
                "seek: tuner applied {:?} (samples={} success_rate={:.2} flips={:.2})",
                suggestion.adjustments.as_slice(),
                suggestion.usage.samples,
                suggestion.usage.success_rate,
                suggestion.usage.mean_direction_changes
            );
        }
        self.last_suggestion = Some(suggestion);
        let next = next?;
        Some(self.publish(ConfigSnapshot::new(&next)))
    }

    fn publish(&mut self, snapshot: ConfigSnapshot) -> Arc<ConfigSnapshot> {
        self.current = Arc::new(snapshot);
        self.generation = self.generation.wrapping_add(1);
        Arc::clone(&self.current)
    }
}
