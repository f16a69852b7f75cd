use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub x: f32,
    pub y: f32,
}

impl TouchPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: TouchPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let distance = (dx * dx + dy * dy).sqrt();
        if distance.is_finite() {
            distance
        } else {
            0.0
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: f32,
    pub height: f32,
}

impl SurfaceSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Half the usable width, or `None` for a degenerate surface.
    pub fn half_width(self) -> Option<f32> {
        if self.width.is_finite() && self.width > 0.0 {
            Some(self.width / 2.0)
        } else {
            None
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeekDirection {
    Forward,
    Backward,
    #[default]
    None,
}

impl SeekDirection {
    pub const fn sign(self) -> i64 {
        match self {
            Self::Forward => 1,
            Self::Backward => -1,
            Self::None => 0,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Backward => "backward",
            Self::None => "none",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum GestureKind {
    LongPressSeek = 0,
    SingleTap = 1,
    DoubleTap = 2,
    PinchZoom = 3,
    Swipe = 4,
}

impl GestureKind {
    pub const COUNT: usize = 5;
    pub const ALL: [GestureKind; Self::COUNT] = [
        Self::LongPressSeek,
        Self::SingleTap,
        Self::DoubleTap,
        Self::PinchZoom,
        Self::Swipe,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LongPressSeek => "long_press_seek",
            Self::SingleTap => "single_tap",
            Self::DoubleTap => "double_tap",
            Self::PinchZoom => "pinch_zoom",
            Self::Swipe => "swipe",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum GesturePhase {
    #[default]
    Idle = 0,
    Armed = 1,
    Active = 2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    Released,
    Forced,
    Preempted(GestureKind),
    SchedulerFault,
}

impl EndReason {
    /// Whether the end path is allowed to report a successful gesture at all.
    pub const fn can_succeed(self) -> bool {
        matches!(self, Self::Released | Self::Forced)
    }
}

/// Read side of the player the engine seeks in.
pub trait MediaSource {
    fn position_ms(&self) -> u64;
    fn duration_ms(&self) -> u64;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaSnapshot {
    pub position_ms: u64,
    pub duration_ms: u64,
}

impl MediaSnapshot {
    pub const fn new(position_ms: u64, duration_ms: u64) -> Self {
        Self {
            position_ms,
            duration_ms,
        }
    }

    pub fn capture(media: &impl MediaSource) -> Self {
        let duration_ms = media.duration_ms();
        Self {
            position_ms: media.position_ms().min(duration_ms),
            duration_ms,
        }
    }
}

impl MediaSource for MediaSnapshot {
    fn position_ms(&self) -> u64 {
        self.position_ms
    }

    fn duration_ms(&self) -> u64 {
        self.duration_ms
    }
}
