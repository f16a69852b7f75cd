//! Variable-speed long-press seek gesture engine.
//!
//! [`SeekEngine`] recognizes the gesture and owns its timers. [`SeekController`] wires
//! the engine to host callbacks, haptic feedback, usage recording and adaptive tuning.
//! [`runtime::run_seek_controller`] drives a controller from an embassy channel.

pub mod bridge;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod haptics;
pub mod progression;
pub mod runtime;
pub mod tuner;
pub mod types;
pub mod usage;

pub use bridge::SettingsBridge;
pub use config::{ConfigSnapshot, HapticConfig, SeekGestureConfig};
pub use controller::{SeekController, SeekSink};
pub use engine::{
    GestureSession, SeekEngine, SeekEvent, SeekOutput, SessionSummary, SpeedChangeCause,
    MAX_CATCHUP_TICKS,
};
pub use error::ConfigError;
pub use haptics::{HapticCoordinator, HapticCue, HapticPattern, HapticStep};
pub use progression::{SpeedCurve, SpeedProgressionTable};
pub use runtime::{run_seek_controller, RuntimeStats, SeekInput};
pub use tuner::{AdaptiveTuner, Adjustment, Suggestion, TunerConfig};
pub use types::{
    EndReason, GestureKind, GesturePhase, MediaSnapshot, MediaSource, SeekDirection,
    SurfaceSize, TouchPoint,
};
pub use usage::{GestureSample, GestureUsageRecord, GestureUsageRecorder, UsageSummary};
