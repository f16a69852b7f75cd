use super::*;
use crate::progression::seek_amount_ms;

mod release;

#[derive(Clone, Debug)]
pub(super) struct PendingPress {
    pub(super) settings: Arc<ConfigSnapshot>,
    pub(super) down_ms: u64,
    pub(super) down_point: TouchPoint,
    pub(super) last_point: TouchPoint,
    pub(super) trigger_at_ms: u64,
}

#[derive(Clone, Copy, Debug, Default)]
pub(super) struct SessionStats {
    pub(super) touch_path_px: f32,
    pub(super) peak_touch_velocity_px_s: f32,
    pub(super) last_move_ms: u64,
    pub(super) direction_changes: u16,
    pub(super) max_speed: f32,
    pub(super) speed_sum: f64,
    pub(super) speed_samples: u32,
    pub(super) total_seek_ms: u64,
    pub(super) max_level: usize,
}

impl SessionStats {
    fn observe_speed(&mut self, speed: f32, level: usize) {
        if speed > self.max_speed {
            self.max_speed = speed;
        }
        if level > self.max_level {
            self.max_level = level;
        }
    }

    fn sample_speed(&mut self, speed: f32) {
        self.speed_sum += f64::from(speed);
        self.speed_samples = self.speed_samples.saturating_add(1);
    }

    pub(super) fn average_speed(&self, fallback: f32) -> f32 {
        if self.speed_samples == 0 {
            return fallback;
        }
        (self.speed_sum / f64::from(self.speed_samples)) as f32
    }
}

/// Session value plus the deadlines that belong to it.
///
/// Dropping this value is what cancels both schedules.
#[derive(Clone, Debug)]
pub(super) struct ActiveSession {
    pub(super) settings: Arc<ConfigSnapshot>,
    pub(super) session: GestureSession,
    pub(super) stats: SessionStats,
    pub(super) activated_ms: u64,
    pub(super) next_acceleration_ms: Option<u64>,
    pub(super) next_seek_ms: u64,
}

impl SeekHsm {
    pub(in crate::engine) fn new(settings: Arc<ConfigSnapshot>) -> Self {
        Self {
            phase: GesturePhase::Idle,
            settings,
            surface: SurfaceSize::default(),
            press: None,
            active: None,
        }
    }

    pub(in crate::engine) fn session(&self) -> GestureSession {
        self.active
            .as_ref()
            .map(|active| active.session)
            .unwrap_or_default()
    }

    /// Snapshot governing the press or session in flight, else the pending one.
    pub(in crate::engine) fn session_settings(&self) -> &Arc<ConfigSnapshot> {
        if let Some(active) = &self.active {
            return &active.settings;
        }
        self.press
            .as_ref()
            .map_or(&self.settings, |press| &press.settings)
    }

    pub(in crate::engine) fn next_deadline_ms(&self) -> Option<u64> {
        if let Some(press) = &self.press {
            return Some(press.trigger_at_ms);
        }
        let active = self.active.as_ref()?;
        Some(
            active
                .next_acceleration_ms
                .map_or(active.next_seek_ms, |at| at.min(active.next_seek_ms)),
        )
    }

    /// Earliest timer due at `now_ms`. Acceleration wins a tie with the seek tick so the
    /// tick observes the new multiplier.
    pub(in crate::engine) fn due_timer(&self, now_ms: u64) -> Option<SeekHsmEvent> {
        if let Some(press) = &self.press {
            return (press.trigger_at_ms <= now_ms).then_some(SeekHsmEvent::TriggerElapsed {
                now_ms: press.trigger_at_ms,
            });
        }
        let active = self.active.as_ref()?;
        let acceleration = active.next_acceleration_ms.filter(|at| *at <= now_ms);
        let seek = Some(active.next_seek_ms).filter(|at| *at <= now_ms);
        match (acceleration, seek) {
            (Some(accel_ms), Some(seek_ms)) if accel_ms <= seek_ms => {
                Some(SeekHsmEvent::AccelerationTick { now_ms: accel_ms })
            }
            (Some(accel_ms), None) => Some(SeekHsmEvent::AccelerationTick { now_ms: accel_ms }),
            (_, Some(seek_ms)) => Some(SeekHsmEvent::SeekTick { now_ms: seek_ms }),
            (None, None) => None,
        }
    }

    pub(super) fn arm(&mut self, now_ms: u64, point: TouchPoint) {
        let settings = Arc::clone(&self.settings);
        let trigger_at_ms = now_ms.saturating_add(settings.config().trigger_duration_ms);
        log::debug!(
            "seek: armed x={:.0} y={:.0} t={}ms trigger_at={}ms",
            point.x,
            point.y,
            now_ms,
            trigger_at_ms
        );
        self.press = Some(PendingPress {
            settings,
            down_ms: now_ms,
            down_point: point,
            last_point: point,
            trigger_at_ms,
        });
    }

    /// Returns `true` when the press moved far enough to belong to another gesture.
    pub(super) fn track_armed_move(&mut self, point: TouchPoint) -> bool {
        let Some(press) = self.press.as_mut() else {
            return false;
        };
        press.last_point = point;
        let threshold = press.settings.config().direction_change_threshold_px;
        point.distance_to(press.down_point) > threshold
    }

    pub(super) fn cancel_press(&mut self) {
        self.press = None;
    }

    pub(super) fn activate(&mut self, context: &mut DispatchContext, now_ms: u64) -> bool {
        let Some(press) = self.press.take() else {
            return false;
        };
        let settings = press.settings;
        let config = settings.config();
        let touch = press.last_point;
        let direction = match self.surface.half_width() {
            Some(half) if touch.x < half => SeekDirection::Backward,
            _ => SeekDirection::Forward,
        };
        let speed = settings.table().speed_at(0);
        let media = context.media;

        let session = GestureSession {
            is_active: true,
            start_touch: press.down_point,
            current_touch: touch,
            start_position_ms: media.position_ms,
            current_position_ms: media.position_ms.min(media.duration_ms),
            media_duration_ms: media.duration_ms,
            direction,
            speed_multiplier: speed,
            speed_level: 0,
            elapsed_ms: 0,
            last_direction_change_ms: None,
        };
        let mut stats = SessionStats {
            last_move_ms: now_ms,
            ..SessionStats::default()
        };
        stats.observe_speed(speed, 0);

        let next_acceleration_ms = (settings.table().last_level() > 0)
            .then(|| now_ms.saturating_add(config.acceleration_interval_ms));
        let next_seek_ms = now_ms.saturating_add(config.continuous_seek_interval_ms);

        log::debug!(
            "seek: activated dir={} pos={}ms held={}ms",
            direction.as_str(),
            session.current_position_ms,
            now_ms.saturating_sub(press.down_ms)
        );
        context.emit(SeekEvent::SeekStarted {
            t_ms: now_ms,
            position_ms: session.current_position_ms,
            direction,
        });

        self.active = Some(ActiveSession {
            settings,
            session,
            stats,
            activated_ms: now_ms,
            next_acceleration_ms,
            next_seek_ms,
        });
        true
    }

    pub(super) fn track_active_move(
        &mut self,
        context: &mut DispatchContext,
        now_ms: u64,
        point: TouchPoint,
    ) {
        let surface = self.surface;
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let session = &mut active.session;
        let stats = &mut active.stats;
        let config = active.settings.config();

        let step_px = point.distance_to(session.current_touch);
        if step_px > 0.0 {
            stats.touch_path_px += step_px;
            let dt_ms = now_ms.saturating_sub(stats.last_move_ms).max(1);
            let velocity = step_px / (dt_ms as f32 / 1000.0);
            if velocity > stats.peak_touch_velocity_px_s {
                stats.peak_touch_velocity_px_s = velocity;
            }
        }
        stats.last_move_ms = now_ms;
        session.current_touch = point;
        session.elapsed_ms = now_ms.saturating_sub(active.activated_ms);

        let delta = point.x - session.start_touch.x;
        if !delta.is_finite() {
            return;
        }

        if config.direction_change_enabled && delta.abs() > config.direction_change_threshold_px {
            let wanted = if delta > 0.0 {
                SeekDirection::Forward
            } else {
                SeekDirection::Backward
            };
            let cooled_down = session.last_direction_change_ms.map_or(true, |last| {
                now_ms.saturating_sub(last) > config.direction_change_cooldown_ms
            });
            if wanted != session.direction && cooled_down {
                session.direction = wanted;
                session.last_direction_change_ms = Some(now_ms);
                stats.direction_changes = stats.direction_changes.saturating_add(1);
                log::debug!("seek: direction -> {} t={}ms", wanted.as_str(), now_ms);
                context.emit(SeekEvent::DirectionChanged {
                    t_ms: now_ms,
                    direction: wanted,
                });
            }
        }

        let Some(half_width) = surface.half_width() else {
            return;
        };
        let intensity = (delta.abs() / half_width).min(1.0);
        let base = active.settings.table().speed_at(session.speed_level);
        let target = active
            .settings
            .clamp_speed(base * (1.0 + intensity * config.swipe_speed_boost));
        if (target - session.speed_multiplier).abs() > config.speed_change_threshold {
            session.speed_multiplier = target;
            stats.observe_speed(target, session.speed_level);
            context.emit(SeekEvent::SpeedChanged {
                t_ms: now_ms,
                speed: target,
                level: session.speed_level,
                cause: SpeedChangeCause::Swipe,
            });
        }
    }

    pub(super) fn accelerate(&mut self, context: &mut DispatchContext, now_ms: u64) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let table = active.settings.table();
        let session = &mut active.session;
        let level = table.next_level(session.speed_level);
        let speed = table.speed_at(level);

        session.speed_level = level;
        session.speed_multiplier = speed;
        session.elapsed_ms = now_ms.saturating_sub(active.activated_ms);
        active.stats.observe_speed(speed, level);
        active.next_acceleration_ms = (level < table.last_level()).then(|| {
            now_ms.saturating_add(active.settings.config().acceleration_interval_ms)
        });

        log::debug!("seek: speed level {} -> {:.2}x t={}ms", level, speed, now_ms);
        context.emit(SeekEvent::SpeedChanged {
            t_ms: now_ms,
            speed,
            level,
            cause: SpeedChangeCause::Acceleration,
        });
    }

    pub(super) fn advance_position(&mut self, context: &mut DispatchContext, now_ms: u64) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let interval_ms = active.settings.config().continuous_seek_interval_ms;
        active.next_seek_ms = now_ms.saturating_add(interval_ms);

        let session = &mut active.session;
        session.elapsed_ms = now_ms.saturating_sub(active.activated_ms);
        active.stats.sample_speed(session.speed_multiplier);

        let duration_ms = session.media_duration_ms;
        if duration_ms == 0 {
            session.current_position_ms = 0;
            return;
        }

        let amount = seek_amount_ms(session.speed_multiplier, interval_ms);
        let current = session.current_position_ms.min(duration_ms);
        let target = match session.direction {
            SeekDirection::Forward => current.saturating_add(amount).min(duration_ms),
            SeekDirection::Backward => current.saturating_sub(amount),
            SeekDirection::None => current,
        };
        session.current_position_ms = target;
        if target == current {
            return;
        }

        active.stats.total_seek_ms = active
            .stats
            .total_seek_ms
            .saturating_add(target.abs_diff(current));
        context.emit(SeekEvent::SeekUpdated {
            t_ms: now_ms,
            position_ms: target,
            speed: session.speed_multiplier,
            direction: session.direction,
            level: session.speed_level,
        });
    }
}
