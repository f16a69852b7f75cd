use heapless::HistoryBuffer;
use serde::Serialize;

use crate::{engine::SessionSummary, types::GestureKind};

pub const USAGE_HISTORY_LEN: usize = 512;
pub const SUCCESS_RATE_ALPHA: f32 = 0.1;

/// Derived statistics of one completed gesture.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GestureSample {
    pub kind: GestureKind,
    pub ended_ms: u64,
    pub duration_ms: u64,
    pub distance_px: f32,
    pub velocity_px_s: f32,
    pub success: bool,
    pub direction_changes: u16,
    pub max_speed: f32,
    pub average_speed: f32,
    pub accuracy: f32,
}

impl GestureSample {
    pub fn from_session(summary: &SessionSummary, ended_ms: u64, success: bool) -> Self {
        Self {
            kind: GestureKind::LongPressSeek,
            ended_ms,
            duration_ms: summary.duration_ms,
            distance_px: summary.touch_path_px,
            velocity_px_s: summary.touch_velocity_px_s(),
            success,
            direction_changes: summary.direction_changes,
            max_speed: summary.max_speed,
            average_speed: summary.average_speed,
            accuracy: summary.accuracy(),
        }
    }

    /// Sample for a gesture the seek engine does not own, such as a tap or pinch.
    pub fn gesture(
        kind: GestureKind,
        ended_ms: u64,
        duration_ms: u64,
        distance_px: f32,
        success: bool,
    ) -> Self {
        let distance_px = if distance_px.is_finite() {
            distance_px.max(0.0)
        } else {
            0.0
        };
        let velocity_px_s = if duration_ms == 0 {
            0.0
        } else {
            distance_px / (duration_ms as f32 / 1000.0)
        };
        Self {
            kind,
            ended_ms,
            duration_ms,
            distance_px,
            velocity_px_s,
            success,
            direction_changes: 0,
            max_speed: 0.0,
            average_speed: 0.0,
            accuracy: if success { 1.0 } else { 0.0 },
        }
    }
}

/// Rolling statistics for one gesture kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GestureUsageRecord {
    pub kind: GestureKind,
    pub frequency: u32,
    pub mean_duration_ms: f32,
    pub mean_distance_px: f32,
    pub mean_velocity_px_s: f32,
    pub success_rate: f32,
    pub last_used_ms: Option<u64>,
    pub mean_direction_changes: f32,
    pub mean_max_speed: f32,
}

impl GestureUsageRecord {
    pub const fn new(kind: GestureKind) -> Self {
        Self {
            kind,
            frequency: 0,
            mean_duration_ms: 0.0,
            mean_distance_px: 0.0,
            mean_velocity_px_s: 0.0,
            success_rate: 0.0,
            last_used_ms: None,
            mean_direction_changes: 0.0,
            mean_max_speed: 0.0,
        }
    }

    fn observe(&mut self, sample: &GestureSample) {
        self.frequency = self.frequency.saturating_add(1);
        let n = self.frequency as f32;
        running_mean(&mut self.mean_duration_ms, sample.duration_ms as f32, n);
        running_mean(&mut self.mean_distance_px, sample.distance_px, n);
        running_mean(&mut self.mean_velocity_px_s, sample.velocity_px_s, n);
        running_mean(
            &mut self.mean_direction_changes,
            f32::from(sample.direction_changes),
            n,
        );
        running_mean(&mut self.mean_max_speed, sample.max_speed, n);

        let outcome = if sample.success { 1.0 } else { 0.0 };
        if self.frequency == 1 {
            self.success_rate = outcome;
        } else {
            self.success_rate += SUCCESS_RATE_ALPHA * (outcome - self.success_rate);
        }
        self.last_used_ms = Some(
            self.last_used_ms
                .map_or(sample.ended_ms, |last| last.max(sample.ended_ms)),
        );
    }
}

fn running_mean(mean: &mut f32, value: f32, count: f32) {
    if !value.is_finite() || count <= 0.0 {
        return;
    }
    *mean += (value - *mean) / count;
}

/// Aggregate over the most recent samples of one kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct UsageSummary {
    pub samples: usize,
    pub success_rate: f32,
    pub mean_direction_changes: f32,
    pub mean_duration_ms: f32,
    pub mean_max_speed: f32,
    pub mean_accuracy: f32,
}

pub struct GestureUsageRecorder {
    records: [GestureUsageRecord; GestureKind::COUNT],
    history: Vec<HistoryBuffer<GestureSample, USAGE_HISTORY_LEN>>,
}

impl Default for GestureUsageRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureUsageRecorder {
    pub fn new() -> Self {
        Self {
            records: GestureKind::ALL.map(GestureUsageRecord::new),
            history: GestureKind::ALL
                .iter()
                .map(|_| HistoryBuffer::new())
                .collect(),
        }
    }

    /// Appends a sample and returns the updated record for its kind.
    pub fn record(&mut self, sample: GestureSample) -> GestureUsageRecord {
        let index = sample.kind.index();
        let record = &mut self.records[index];
        record.observe(&sample);
        if let Some(history) = self.history.get_mut(index) {
            history.write(sample);
        }
        log::debug!(
            "seek: usage {} n={} success_rate={:.2}",
            sample.kind.as_str(),
            record.frequency,
            record.success_rate
        );
        *record
    }

    pub fn record_session(
        &mut self,
        summary: &SessionSummary,
        ended_ms: u64,
        success: bool,
    ) -> GestureUsageRecord {
        self.record(GestureSample::from_session(summary, ended_ms, success))
    }

    pub fn record_for(&self, kind: GestureKind) -> &GestureUsageRecord {
        &self.records[kind.index()]
    }

    pub fn history_len(&self, kind: GestureKind) -> usize {
        self.history.get(kind.index()).map_or(0, |history| history.len())
    }

    /// Samples of `kind`, oldest first.
    pub fn recent(&self, kind: GestureKind) -> impl Iterator<Item = &GestureSample> + '_ {
        self.history
            .get(kind.index())
            .into_iter()
            .flat_map(|history| history.oldest_ordered())
    }

    /// Aggregates at most the last `window` samples of `kind`.
    pub fn summary(&self, kind: GestureKind, window: usize) -> UsageSummary {
        let skip = self.history_len(kind).saturating_sub(window);
        let mut summary = UsageSummary::default();
        let mut successes = 0usize;
        let mut direction_changes = 0.0f32;
        let mut duration_ms = 0.0f32;
        let mut max_speed = 0.0f32;
        let mut accuracy = 0.0f32;
        for sample in self.recent(kind).skip(skip) {
            summary.samples += 1;
            if sample.success {
                successes += 1;
            }
            direction_changes += f32::from(sample.direction_changes);
            duration_ms += sample.duration_ms as f32;
            max_speed += sample.max_speed;
            accuracy += sample.accuracy;
        }
        if summary.samples == 0 {
            return summary;
        }
        let n = summary.samples as f32;
        summary.success_rate = successes as f32 / n;
        summary.mean_direction_changes = direction_changes / n;
        summary.mean_duration_ms = duration_ms / n;
        summary.mean_max_speed = max_speed / n;
        summary.mean_accuracy = accuracy / n;
        summary
    }
}

#[cfg(test)]
mod tests;
