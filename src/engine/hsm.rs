use super::*;
use statig::prelude::*;

mod core;

use self::core::{ActiveSession, PendingPress};

pub(super) struct SeekHsm {
    pub(super) phase: GesturePhase,
    pub(super) settings: Arc<ConfigSnapshot>,
    pub(super) surface: SurfaceSize,
    press: Option<PendingPress>,
    active: Option<ActiveSession>,
}

#[state_machine(initial = "State::idle()")]
impl SeekHsm {
    #[state(superstate = "tracking", entry_action = "enter_idle")]
    fn idle(&mut self, context: &mut DispatchContext, event: &SeekHsmEvent) -> Outcome<State> {
        let _ = context;
        match event {
            SeekHsmEvent::PointerDown { now_ms, point } => {
                self.arm(*now_ms, *point);
                Transition(State::armed())
            }
            SeekHsmEvent::PointerMove { now_ms, .. } | SeekHsmEvent::PointerUp { now_ms } => {
                log::debug!("seek: pointer event without press ignored t={}ms", now_ms);
                Handled
            }
            SeekHsmEvent::TriggerElapsed { .. }
            | SeekHsmEvent::AccelerationTick { .. }
            | SeekHsmEvent::SeekTick { .. }
            | SeekHsmEvent::End { .. } => Handled,
            _ => Super,
        }
    }

    #[state(superstate = "tracking", entry_action = "enter_armed")]
    fn armed(&mut self, context: &mut DispatchContext, event: &SeekHsmEvent) -> Outcome<State> {
        match event {
            SeekHsmEvent::PointerDown { now_ms, .. } => {
                log::debug!("seek: extra pointer down while armed ignored t={}ms", now_ms);
                Handled
            }
            SeekHsmEvent::PointerMove { now_ms, point } => {
                if self.track_armed_move(*point) {
                    log::debug!("seek: armed press moved away t={}ms", now_ms);
                    self.cancel_press();
                    Transition(State::idle())
                } else {
                    Handled
                }
            }
            SeekHsmEvent::PointerUp { .. } => {
                self.cancel_press();
                Transition(State::idle())
            }
            SeekHsmEvent::TriggerElapsed { now_ms } => {
                if self.activate(context, *now_ms) {
                    Transition(State::active())
                } else {
                    Transition(State::idle())
                }
            }
            SeekHsmEvent::End { now_ms, reason } => {
                log::debug!("seek: armed press cancelled reason={:?} t={}ms", reason, now_ms);
                self.cancel_press();
                Transition(State::idle())
            }
            SeekHsmEvent::AccelerationTick { .. } | SeekHsmEvent::SeekTick { .. } => Handled,
            _ => Super,
        }
    }

    #[state(superstate = "tracking", entry_action = "enter_active")]
    fn active(&mut self, context: &mut DispatchContext, event: &SeekHsmEvent) -> Outcome<State> {
        match event {
            SeekHsmEvent::PointerDown { now_ms, .. } => {
                log::debug!("seek: pointer down during active session ignored t={}ms", now_ms);
                Handled
            }
            SeekHsmEvent::PointerMove { now_ms, point } => {
                self.track_active_move(context, *now_ms, *point);
                Handled
            }
            SeekHsmEvent::AccelerationTick { now_ms } => {
                self.accelerate(context, *now_ms);
                Handled
            }
            SeekHsmEvent::SeekTick { now_ms } => {
                self.advance_position(context, *now_ms);
                Handled
            }
            SeekHsmEvent::PointerUp { now_ms } => {
                self.end_session(context, *now_ms, EndReason::Released);
                Transition(State::idle())
            }
            SeekHsmEvent::End { now_ms, reason } => {
                self.end_session(context, *now_ms, *reason);
                Transition(State::idle())
            }
            SeekHsmEvent::TriggerElapsed { .. } => Handled,
            _ => Super,
        }
    }

    #[superstate]
    fn tracking(&mut self, context: &mut DispatchContext, event: &SeekHsmEvent) -> Outcome<State> {
        let _ = context;
        match event {
            SeekHsmEvent::Resize(size) => {
                self.surface = *size;
                Handled
            }
            SeekHsmEvent::UpdateConfig(settings) => {
                self.settings = Arc::clone(settings);
                Handled
            }
            _ => Handled,
        }
    }

    #[action]
    fn enter_idle(&mut self) {
        self.phase = GesturePhase::Idle;
    }

    #[action]
    fn enter_armed(&mut self) {
        self.phase = GesturePhase::Armed;
    }

    #[action]
    fn enter_active(&mut self) {
        self.phase = GesturePhase::Active;
    }
}
