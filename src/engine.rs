use std::sync::Arc;

use serde::Serialize;
use statig::blocking::IntoStateMachineExt as _;

use crate::{
    config::{ConfigSnapshot, SeekGestureConfig},
    types::{
        EndReason, GestureKind, GesturePhase, MediaSnapshot, MediaSource, SeekDirection,
        SurfaceSize, TouchPoint,
    },
};

mod hsm;

use hsm::SeekHsm;

/// Timer events one call may apply before the backlog counts as a scheduling failure.
pub const MAX_CATCHUP_TICKS: usize = 4_096;

/// Live state of one activation-to-release lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GestureSession {
    pub is_active: bool,
    pub start_touch: TouchPoint,
    pub current_touch: TouchPoint,
    pub start_position_ms: u64,
    pub current_position_ms: u64,
    pub media_duration_ms: u64,
    pub direction: SeekDirection,
    pub speed_multiplier: f32,
    pub speed_level: usize,
    pub elapsed_ms: u64,
    pub last_direction_change_ms: Option<u64>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct SessionSummary {
    pub started_ms: u64,
    pub duration_ms: u64,
    pub start_position_ms: u64,
    pub final_position_ms: u64,
    pub net_seek_ms: u64,
    pub total_seek_ms: u64,
    pub touch_path_px: f32,
    pub peak_touch_velocity_px_s: f32,
    pub direction_changes: u16,
    pub max_speed: f32,
    pub average_speed: f32,
    pub max_level: usize,
}

impl SessionSummary {
    /// Net seek distance over the distance actually traversed; 1.0 for a straight seek.
    pub fn accuracy(&self) -> f32 {
        if self.total_seek_ms == 0 {
            return 0.0;
        }
        (self.net_seek_ms as f64 / self.total_seek_ms as f64).clamp(0.0, 1.0) as f32
    }

    /// Mean touch velocity over the whole session.
    pub fn touch_velocity_px_s(&self) -> f32 {
        if self.duration_ms == 0 {
            return 0.0;
        }
        self.touch_path_px / (self.duration_ms as f32 / 1000.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedChangeCause {
    Acceleration,
    Swipe,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SeekEvent {
    SeekStarted {
        t_ms: u64,
        position_ms: u64,
        direction: SeekDirection,
    },
    SeekUpdated {
        t_ms: u64,
        position_ms: u64,
        speed: f32,
        direction: SeekDirection,
        level: usize,
    },
    SpeedChanged {
        t_ms: u64,
        speed: f32,
        level: usize,
        cause: SpeedChangeCause,
    },
    DirectionChanged {
        t_ms: u64,
        direction: SeekDirection,
    },
    SeekEnded {
        t_ms: u64,
        position_ms: u64,
        success: bool,
        reason: EndReason,
        summary: SessionSummary,
    },
}

impl SeekEvent {
    pub const fn t_ms(&self) -> u64 {
        match self {
            Self::SeekStarted { t_ms, .. }
            | Self::SeekUpdated { t_ms, .. }
            | Self::SpeedChanged { t_ms, .. }
            | Self::DirectionChanged { t_ms, .. }
            | Self::SeekEnded { t_ms, .. } => *t_ms,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SeekOutput {
    pub events: Vec<SeekEvent>,
}

impl SeekOutput {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SeekEvent> {
        self.events.iter()
    }
}

impl IntoIterator for SeekOutput {
    type Item = SeekEvent;
    type IntoIter = std::vec::IntoIter<SeekEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

#[derive(Clone, Debug)]
enum SeekHsmEvent {
    PointerDown { now_ms: u64, point: TouchPoint },
    PointerMove { now_ms: u64, point: TouchPoint },
    PointerUp { now_ms: u64 },
    TriggerElapsed { now_ms: u64 },
    AccelerationTick { now_ms: u64 },
    SeekTick { now_ms: u64 },
    End { now_ms: u64, reason: EndReason },
    Resize(SurfaceSize),
    UpdateConfig(Arc<ConfigSnapshot>),
}

#[derive(Debug, Default)]
struct DispatchContext {
    media: MediaSnapshot,
    events: Vec<SeekEvent>,
}

impl DispatchContext {
    fn new(media: MediaSnapshot) -> Self {
        Self {
            media,
            events: Vec::new(),
        }
    }

    fn emit(&mut self, event: SeekEvent) {
        self.events.push(event);
    }

    fn finish(self) -> SeekOutput {
        SeekOutput {
            events: self.events,
        }
    }
}

/// Long-press seek gesture recognizer.
///
/// All inputs carry a timestamp from one monotonic clock. Each call first applies every
/// timer that fell due up to that timestamp, so pointer input and timer ticks are
/// observed in time order.
pub struct SeekEngine {
    machine: statig::blocking::StateMachine<SeekHsm>,
}

impl Default for SeekEngine {
    fn default() -> Self {
        Self::new(Arc::new(ConfigSnapshot::default()))
    }
}

impl SeekEngine {
    pub fn new(settings: Arc<ConfigSnapshot>) -> Self {
        Self {
            machine: SeekHsm::new(settings).state_machine(),
        }
    }

    pub fn with_config(config: &SeekGestureConfig) -> Self {
        Self::new(Arc::new(ConfigSnapshot::new(config)))
    }

    pub fn phase(&self) -> GesturePhase {
        self.machine.inner().phase
    }

    pub fn is_active(&self) -> bool {
        self.phase() == GesturePhase::Active
    }

    /// Copy of the live session, or an inactive default.
    pub fn session(&self) -> GestureSession {
        self.machine.inner().session()
    }

    /// Snapshot the next session will start with.
    pub fn settings(&self) -> &Arc<ConfigSnapshot> {
        &self.machine.inner().settings
    }

    /// Snapshot the current press or session runs under; the pending one when idle.
    pub fn session_settings(&self) -> &Arc<ConfigSnapshot> {
        self.machine.inner().session_settings()
    }

    pub fn surface(&self) -> SurfaceSize {
        self.machine.inner().surface
    }

    pub fn next_deadline_ms(&self) -> Option<u64> {
        self.machine.inner().next_deadline_ms()
    }

    pub fn set_surface_size(&mut self, size: SurfaceSize) {
        let mut context = DispatchContext::default();
        self.machine
            .handle_with_context(&SeekHsmEvent::Resize(size), &mut context);
    }

    /// Replaces the pending snapshot; a session already in flight keeps its own.
    pub fn update_config(&mut self, settings: Arc<ConfigSnapshot>) {
        let mut context = DispatchContext::default();
        self.machine
            .handle_with_context(&SeekHsmEvent::UpdateConfig(settings), &mut context);
    }

    pub fn pointer_down(
        &mut self,
        media: &impl MediaSource,
        now_ms: u64,
        point: TouchPoint,
    ) -> SeekOutput {
        self.dispatch(media, now_ms, SeekHsmEvent::PointerDown { now_ms, point })
    }

    pub fn pointer_move(
        &mut self,
        media: &impl MediaSource,
        now_ms: u64,
        point: TouchPoint,
    ) -> SeekOutput {
        self.dispatch(media, now_ms, SeekHsmEvent::PointerMove { now_ms, point })
    }

    pub fn pointer_up(&mut self, media: &impl MediaSource, now_ms: u64) -> SeekOutput {
        self.dispatch(media, now_ms, SeekHsmEvent::PointerUp { now_ms })
    }

    /// Ends the current session, if any. A second call is a no-op.
    pub fn force_end(&mut self, media: &impl MediaSource, now_ms: u64) -> SeekOutput {
        self.dispatch(
            media,
            now_ms,
            SeekHsmEvent::End {
                now_ms,
                reason: EndReason::Forced,
            },
        )
    }

    /// A higher-priority gesture claimed the pointer.
    pub fn preempt(
        &mut self,
        media: &impl MediaSource,
        now_ms: u64,
        by: GestureKind,
    ) -> SeekOutput {
        self.dispatch(
            media,
            now_ms,
            SeekHsmEvent::End {
                now_ms,
                reason: EndReason::Preempted(by),
            },
        )
    }

    /// The host scheduler could not honor a timer; ends the session as unsuccessful.
    pub fn scheduler_fault(&mut self, media: &impl MediaSource, now_ms: u64) -> SeekOutput {
        let mut context = DispatchContext::new(MediaSnapshot::capture(media));
        self.machine.handle_with_context(
            &SeekHsmEvent::End {
                now_ms,
                reason: EndReason::SchedulerFault,
            },
            &mut context,
        );
        context.finish()
    }

    /// Applies every timer due at or before `now_ms`.
    pub fn advance(&mut self, media: &impl MediaSource, now_ms: u64) -> SeekOutput {
        let mut context = DispatchContext::new(MediaSnapshot::capture(media));
        self.drain_timers(now_ms, &mut context);
        context.finish()
    }

    fn dispatch(
        &mut self,
        media: &impl MediaSource,
        now_ms: u64,
        event: SeekHsmEvent,
    ) -> SeekOutput {
        let mut context = DispatchContext::new(MediaSnapshot::capture(media));
        self.drain_timers(now_ms, &mut context);
        self.machine.handle_with_context(&event, &mut context);
        context.finish()
    }

    fn drain_timers(&mut self, now_ms: u64, context: &mut DispatchContext) {
        let mut applied = 0usize;
        while let Some(timer) = self.machine.inner().due_timer(now_ms) {
            if applied >= MAX_CATCHUP_TICKS {
                log::warn!(
                    "seek: timer backlog exceeded {} ticks at t={}ms",
                    MAX_CATCHUP_TICKS,
                    now_ms
                );
                self.machine.handle_with_context(
                    &SeekHsmEvent::End {
                        now_ms,
                        reason: EndReason::SchedulerFault,
                    },
                    context,
                );
                return;
            }
            self.machine.handle_with_context(&timer, context);
            applied += 1;
        }
    }
}
