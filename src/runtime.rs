use embassy_futures::select::{select, Either};
use embassy_sync::{blocking_mutex::raw::RawMutex, channel::Channel};
use embassy_time::{Duration, Instant, Timer};

use crate::{
    config::SeekGestureConfig,
    controller::{SeekController, SeekSink},
    types::{GestureKind, MediaSource, SurfaceSize, TouchPoint},
    usage::GestureSample,
};

/// Input for the seek task. Timestamps are taken on receipt.
#[derive(Clone, Debug)]
pub enum SeekInput {
    PointerDown(TouchPoint),
    PointerMove(TouchPoint),
    PointerUp,
    ForceEnd,
    Preempt(GestureKind),
    Resize(SurfaceSize),
    UpdateConfig(SeekGestureConfig),
    RecordGesture(GestureSample),
    Shutdown,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RuntimeStats {
    pub inputs: u32,
    pub timer_wakes: u32,
    pub scheduler_faults: u32,
}

/// Drives `controller` from `inputs` until `SeekInput::Shutdown`.
///
/// Engine deadlines are awaited with `Timer::at`. A wake later than the session snapshot's
/// `max_timer_lag_ms` past its deadline ends the session as a scheduling failure.
pub async fn run_seek_controller<RM, M, S, const N: usize>(
    controller: &mut SeekController<M, S>,
    inputs: &Channel<RM, SeekInput, N>,
    epoch: Instant,
) -> RuntimeStats
where
    RM: RawMutex,
    M: MediaSource,
    S: SeekSink,
{
    let mut stats = RuntimeStats::default();
    loop {
        let (input, deadline_ms) = match controller.next_deadline_ms() {
            Some(deadline_ms) => {
                let at = epoch
                    .checked_add(Duration::from_millis(deadline_ms))
                    .unwrap_or(Instant::MAX);
                match select(inputs.receive(), Timer::at(at)).await {
                    Either::First(input) => (Some(input), Some(deadline_ms)),
                    Either::Second(()) => (None, Some(deadline_ms)),
                }
            }
            None => (Some(inputs.receive().await), None),
        };
        let now_ms = elapsed_ms(epoch);

        let Some(input) = input else {
            stats.timer_wakes = stats.timer_wakes.saturating_add(1);
            let lag_ms = deadline_ms.map_or(0, |deadline_ms| now_ms.saturating_sub(deadline_ms));
            let max_lag_ms = controller
                .engine()
                .session_settings()
                .config()
                .max_timer_lag_ms;
            if lag_ms > max_lag_ms {
                log::warn!(
                    "seek: timer woke {}ms late at t={}ms, ending session",
                    lag_ms,
                    now_ms
                );
                stats.scheduler_faults = stats.scheduler_faults.saturating_add(1);
                controller.scheduler_fault(now_ms);
            } else {
                controller.advance(now_ms);
            }
            continue;
        };

        stats.inputs = stats.inputs.saturating_add(1);
        match input {
            SeekInput::PointerDown(point) => {
                controller.pointer_down(now_ms, point);
            }
            SeekInput::PointerMove(point) => {
                controller.pointer_move(now_ms, point);
            }
            SeekInput::PointerUp => {
                controller.pointer_up(now_ms);
            }
            SeekInput::ForceEnd => {
                controller.force_end(now_ms);
            }
            SeekInput::Preempt(by) => {
                controller.preempt(now_ms, by);
            }
            SeekInput::Resize(size) => controller.set_surface_size(size),
            SeekInput::UpdateConfig(config) => controller.update_config(&config),
            SeekInput::RecordGesture(sample) => {
                controller.record_gesture(sample);
            }
            SeekInput::Shutdown => {
                controller.force_end(now_ms);
                log::debug!("seek: runtime shutdown t={}ms", now_ms);
                return stats;
            }
        }
    }
}

fn elapsed_ms(epoch: Instant) -> u64 {
    Instant::now().saturating_duration_since(epoch).as_millis()
}
