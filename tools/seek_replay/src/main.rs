use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use longseek::{
    GestureUsageRecord, HapticPattern, MediaSnapshot, SeekController, SeekDirection, SeekEvent,
    SeekGestureConfig, SeekOutput, SeekSink,
};
use serde_json::{json, Value};

mod logging;
mod trace;

use trace::{load_trace, TraceKind};

#[derive(Debug, Parser)]
#[command(name = "seek_replay")]
#[command(about = "Replay a touch trace through the long-press seek controller")]
struct Cli {
    /// TOML trace with optional [config], [media], [surface] and [[events]].
    trace: PathBuf,
    /// Seek config TOML overriding the trace's [config] table.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value = "warn")]
    log_level: LevelFilter,
    /// Mirror log records to this JSON-lines file.
    #[arg(long)]
    log_json: Option<PathBuf>,
    /// Also print raw engine events and session summaries.
    #[arg(long)]
    events: bool,
}

/// Collects callbacks as JSON values stamped with the replay clock.
#[derive(Default)]
struct JsonSink {
    now_ms: u64,
    lines: Vec<Value>,
}

impl JsonSink {
    fn push(&mut self, callback: &str, mut body: Value) {
        if let Value::Object(map) = &mut body {
            map.insert("t_ms".into(), json!(self.now_ms));
            map.insert("callback".into(), json!(callback));
        }
        self.lines.push(body);
    }
}

impl SeekSink for JsonSink {
    fn on_seek_start(&mut self, position_ms: u64, direction: SeekDirection) {
        self.push(
            "seek_start",
            json!({ "position_ms": position_ms, "direction": direction }),
        );
    }

    fn on_seek_update(
        &mut self,
        position_ms: u64,
        speed: f32,
        direction: SeekDirection,
        level: usize,
    ) {
        self.push(
            "seek_update",
            json!({
                "position_ms": position_ms,
                "speed": speed,
                "direction": direction,
                "level": level,
            }),
        );
    }

    fn on_speed_change(&mut self, speed: f32, level: usize) {
        self.push("speed_change", json!({ "speed": speed, "level": level }));
    }

    fn on_direction_change(&mut self, direction: SeekDirection) {
        self.push("direction_change", json!({ "direction": direction }));
    }

    fn on_seek_end(&mut self, position_ms: u64, success: bool) {
        self.push(
            "seek_end",
            json!({ "position_ms": position_ms, "success": success }),
        );
    }

    fn on_haptic_pulse(&mut self, pattern: &HapticPattern) {
        self.push("haptic_pulse", json!({ "steps": pattern.steps() }));
    }

    fn on_usage_recorded(&mut self, record: &GestureUsageRecord) {
        self.push("usage_recorded", json!({ "record": record }));
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err:?}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    logging::Logger::new(cli.log_level, cli.log_json.clone())?.install()?;

    let trace = load_trace(&cli.trace)?;
    let config = match &cli.config {
        Some(path) => {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            SeekGestureConfig::from_toml_str(&source)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => trace.config.clone().unwrap_or_default(),
    };

    let mut controller: SeekController<MediaSnapshot, JsonSink> =
        SeekController::new(trace.media, JsonSink::default(), &config);
    if let Some(surface) = trace.surface {
        controller.set_surface_size(surface);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut last_ms = 0;
    for event in &trace.events {
        last_ms = event.t_ms;
        controller.sink_mut().now_ms = event.t_ms;
        let output = match event.kind {
            TraceKind::Down => match event.point() {
                Some(point) => controller.pointer_down(event.t_ms, point),
                None => SeekOutput::default(),
            },
            TraceKind::Move => match event.point() {
                Some(point) => controller.pointer_move(event.t_ms, point),
                None => SeekOutput::default(),
            },
            TraceKind::Up => controller.pointer_up(event.t_ms),
            TraceKind::ForceEnd => controller.force_end(event.t_ms),
            TraceKind::Preempt => match event.by {
                Some(by) => controller.preempt(event.t_ms, by),
                None => SeekOutput::default(),
            },
            TraceKind::Advance => controller.advance(event.t_ms),
        };
        flush(&mut out, &mut controller, &output, cli.events)?;
    }

    if controller.engine().is_active() {
        log::warn!("seek: trace ended with an active session, forcing end at t={last_ms}ms");
        controller.sink_mut().now_ms = last_ms;
        let output = controller.force_end(last_ms);
        flush(&mut out, &mut controller, &output, cli.events)?;
    }

    let usage = controller
        .recorder()
        .summary(longseek::GestureKind::LongPressSeek, usize::MAX);
    let line = json!({
        "callback": "replay_done",
        "t_ms": last_ms,
        "usage": usage,
        "config_generation": controller.bridge().generation(),
        "trigger_duration_ms": controller.settings().config().trigger_duration_ms,
    });
    writeln!(out, "{line}").context("writing stdout")?;
    Ok(())
}

fn flush(
    out: &mut impl Write,
    controller: &mut SeekController<MediaSnapshot, JsonSink>,
    output: &SeekOutput,
    with_events: bool,
) -> Result<()> {
    if with_events {
        for event in output.iter() {
            writeln!(out, "{}", serde_json::to_string(event)?).context("writing stdout")?;
            if let SeekEvent::SeekEnded { summary, .. } = event {
                let line = json!({
                    "callback": "session_summary",
                    "summary": summary,
                    "accuracy": summary.accuracy(),
                });
                writeln!(out, "{line}").context("writing stdout")?;
            }
        }
    }
    for line in controller.sink_mut().lines.drain(..) {
        writeln!(out, "{line}").context("writing stdout")?;
    }
    Ok(())
}
