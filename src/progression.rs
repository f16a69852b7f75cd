use serde::{Deserialize, Serialize};

pub const SPEED_TABLE_MAX_LEVELS: usize = 16;

const SPEED_EPSILON: f32 = 1.0e-4;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedCurve {
    Linear,
    #[default]
    Exponential,
    Logarithmic,
    SmoothStep,
    /// Use the explicit `speed_progression` list from the config.
    Custom,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpeedProgressionTable {
    levels: heapless::Vec<f32, SPEED_TABLE_MAX_LEVELS>,
}

impl SpeedProgressionTable {
    /// Builds a table from a generated curve.
    pub fn from_curve(curve: SpeedCurve, start_speed: f32, max_speed: f32, steps: usize) -> Self {
        let steps = steps.clamp(1, SPEED_TABLE_MAX_LEVELS);
        let mut levels = heapless::Vec::new();
        for index in 0..steps {
            let speed = match curve {
                SpeedCurve::Linear | SpeedCurve::Custom => {
                    linear_step(start_speed, max_speed, steps, index)
                }
                SpeedCurve::Exponential => exponential_step(start_speed, max_speed, steps, index),
                SpeedCurve::Logarithmic => logarithmic_step(start_speed, max_speed, steps, index),
                SpeedCurve::SmoothStep => smooth_step(start_speed, max_speed, steps, index),
            };
            let _ = levels.push(speed);
        }
        Self::normalized(levels, start_speed, max_speed)
    }

    /// Builds a table from explicit multipliers, clamped into `[min_speed, max_speed]`.
    ///
    /// The first level is pinned to `min_speed` and later levels never drop below their
    /// predecessor. An empty list yields the single level `min_speed`.
    pub fn from_levels(values: &[f32], min_speed: f32, max_speed: f32) -> Self {
        let mut levels = heapless::Vec::new();
        for value in values.iter().take(SPEED_TABLE_MAX_LEVELS) {
            let _ = levels.push(*value);
        }
        if levels.is_empty() {
            let _ = levels.push(min_speed);
        }
        Self::normalized(levels, min_speed, max_speed)
    }

    fn normalized(
        mut levels: heapless::Vec<f32, SPEED_TABLE_MAX_LEVELS>,
        min_speed: f32,
        max_speed: f32,
    ) -> Self {
        let mut floor = min_speed;
        for (index, level) in levels.iter_mut().enumerate() {
            let value = if level.is_finite() { *level } else { floor };
            let value = if index == 0 {
                min_speed
            } else {
                value.clamp(min_speed, max_speed).max(floor)
            };
            *level = value;
            floor = value;
        }
        Self { levels }
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn last_level(&self) -> usize {
        self.levels.len().saturating_sub(1)
    }

    /// Multiplier for `level`, saturating at the last entry.
    pub fn speed_at(&self, level: usize) -> f32 {
        let index = level.min(self.last_level());
        self.levels.get(index).copied().unwrap_or(1.0)
    }

    pub fn next_level(&self, level: usize) -> usize {
        level.saturating_add(1).min(self.last_level())
    }

    pub fn min_speed(&self) -> f32 {
        self.speed_at(0)
    }

    pub fn max_speed(&self) -> f32 {
        self.speed_at(self.last_level())
    }

    pub fn levels(&self) -> &[f32] {
        &self.levels
    }
}

fn curve_position(steps: usize, index: usize) -> f32 {
    if steps <= 1 {
        return 0.0;
    }
    index as f32 / (steps - 1) as f32
}

pub fn linear_step(start_speed: f32, max_speed: f32, steps: usize, index: usize) -> f32 {
    let t = curve_position(steps, index);
    start_speed + (max_speed - start_speed) * t
}

pub fn exponential_step(start_speed: f32, max_speed: f32, steps: usize, index: usize) -> f32 {
    if start_speed <= 0.0 || max_speed <= start_speed || steps <= 1 {
        return linear_step(start_speed, max_speed, steps, index);
    }
    if index + 1 >= steps {
        return max_speed;
    }
    let ratio = (max_speed / start_speed).powf(1.0 / (steps - 1) as f32);
    start_speed * ratio.powi(index as i32)
}

pub fn logarithmic_step(start_speed: f32, max_speed: f32, steps: usize, index: usize) -> f32 {
    let t = curve_position(steps, index);
    // ln(1 + t(e - 1)) maps [0, 1] onto [0, 1] with a concave shape.
    let shaped = (1.0 + t * (core::f32::consts::E - 1.0)).ln();
    start_speed + (max_speed - start_speed) * shaped.clamp(0.0, 1.0)
}

pub fn smooth_step(start_speed: f32, max_speed: f32, steps: usize, index: usize) -> f32 {
    let t = curve_position(steps, index);
    let shaped = t * t * (3.0 - 2.0 * t);
    start_speed + (max_speed - start_speed) * shaped
}

/// Base playback milliseconds advanced per wall-clock second at `speed`.
///
/// Band edges tolerate the rounding error of generated curves, so `1.9999999` counts as 2x.
pub fn base_seek_ms_per_second(speed: f32) -> u64 {
    if !speed.is_finite() {
        return 1_000;
    }
    let speed = speed + SPEED_EPSILON;
    if speed < 2.0 {
        1_000
    } else if speed < 4.0 {
        2_000
    } else if speed < 8.0 {
        4_000
    } else if speed < 16.0 {
        8_000
    } else if speed < 32.0 {
        16_000
    } else {
        32_000
    }
}

/// Unsigned seek distance produced by one continuous-seek tick.
pub fn seek_amount_ms(speed: f32, interval_ms: u64) -> u64 {
    if !speed.is_finite() || speed <= SPEED_EPSILON {
        return 0;
    }
    let amount = base_seek_ms_per_second(speed) as f64 * speed as f64 * interval_ms as f64 / 1000.0;
    if amount.is_finite() && amount > 0.0 {
        amount.round().min(u64::MAX as f64) as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests;
