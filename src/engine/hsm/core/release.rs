use super::*;

impl SeekHsm {
    pub(in crate::engine::hsm) fn end_session(
        &mut self,
        context: &mut DispatchContext,
        now_ms: u64,
        reason: EndReason,
    ) {
        self.press = None;
        let Some(active) = self.active.take() else {
            return;
        };
        let session = active.session;
        let stats = active.stats;
        let duration_ms = now_ms.saturating_sub(active.activated_ms);
        let trigger_ms = active.settings.config().trigger_duration_ms;
        let success = reason.can_succeed() && duration_ms > trigger_ms;
        let final_position_ms = session.current_position_ms.min(session.media_duration_ms);

        let summary = SessionSummary {
            started_ms: active.activated_ms,
            duration_ms,
            start_position_ms: session.start_position_ms,
            final_position_ms,
            net_seek_ms: final_position_ms.abs_diff(session.start_position_ms),
            total_seek_ms: stats.total_seek_ms,
            touch_path_px: stats.touch_path_px,
            peak_touch_velocity_px_s: stats.peak_touch_velocity_px_s,
            direction_changes: stats.direction_changes,
            max_speed: stats.max_speed,
            average_speed: stats.average_speed(session.speed_multiplier),
            max_level: stats.max_level,
        };

        match reason {
            EndReason::SchedulerFault => log::warn!(
                "seek: session ended by scheduler fault t={}ms pos={}ms",
                now_ms,
                final_position_ms
            ),
            _ => log::debug!(
                "seek: ended reason={:?} success={} held={}ms pos={}ms level={}",
                reason,
                success,
                duration_ms,
                final_position_ms,
                summary.max_level
            ),
        }

        context.emit(SeekEvent::SeekEnded {
            t_ms: now_ms,
            position_ms: final_position_ms,
            success,
            reason,
            summary,
        });
    }
}
