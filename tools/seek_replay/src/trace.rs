use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use longseek::{GestureKind, MediaSnapshot, SeekGestureConfig, SurfaceSize, TouchPoint};
use serde::Deserialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceKind {
    Down,
    Move,
    Up,
    ForceEnd,
    Preempt,
    Advance,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TraceEvent {
    pub t_ms: u64,
    pub kind: TraceKind,
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub by: Option<GestureKind>,
}

impl TraceEvent {
    pub fn point(&self) -> Option<TouchPoint> {
        Some(TouchPoint::new(self.x?, self.y.unwrap_or(0.0)))
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Trace {
    pub config: Option<SeekGestureConfig>,
    #[serde(default = "default_media")]
    pub media: MediaSnapshot,
    pub surface: Option<SurfaceSize>,
    #[serde(default)]
    pub events: Vec<TraceEvent>,
}

fn default_media() -> MediaSnapshot {
    MediaSnapshot::new(0, 600_000)
}

pub fn parse_trace(source: &str) -> Result<Trace> {
    let trace: Trace = toml::from_str(source).context("parsing trace TOML")?;
    let mut last_ms = 0u64;
    for (index, event) in trace.events.iter().enumerate() {
        if event.t_ms < last_ms {
            bail!(
                "event {index} goes back in time: t_ms={} after {last_ms}",
                event.t_ms
            );
        }
        last_ms = event.t_ms;
        match event.kind {
            TraceKind::Down | TraceKind::Move if event.point().is_none() => {
                bail!("event {index} ({:?}) needs an x coordinate", event.kind);
            }
            TraceKind::Preempt if event.by.is_none() => {
                bail!("event {index} (preempt) needs `by`");
            }
            _ => {}
        }
    }
    Ok(trace)
}

pub fn load_trace(path: &Path) -> Result<Trace> {
    let source =
        fs::read_to_string(path).with_context(|| format!("reading trace {}", path.display()))?;
    parse_trace(&source).with_context(|| format!("loading trace {}", path.display()))
}
