//! Platformer entry point
//!
//! Runs the scene headless with a scripted input sequence and prints a JSON
//! summary of the run. A windowed host feeds `SceneDriver::frame` the same way,
//! once per display tick.
//!
//! Usage: `platformer [settings.json] [frames]`

use glam::Vec2;
use serde::Serialize;

use platformer::renderer::VertexCanvas;
use platformer::sim::StepEvent;
use platformer::{FrameOutcome, HostInput, Level, SceneDriver, Settings};

/// Seconds of play when no frame count is given
const DEFAULT_SECONDS: u64 = 10;

#[derive(Debug, Default, Serialize)]
struct RunSummary {
    frames: u64,
    level: Option<Level>,
    level_changes: Vec<(u64, Level)>,
    score: u32,
    bodies: usize,
    contacts: usize,
    destroyed: usize,
    player: Option<Vec2>,
    triangles: usize,
}

/// Input for frame `n`: pace back and forth, hop, build a pillar, shoot
fn scripted_input(n: u64, settings: &Settings) -> HostInput {
    let heading_right = (n / 120) % 2 == 0;
    let floor = settings.height - settings.grid_size;

    let mut input = HostInput {
        right_held: heading_right,
        left_held: !heading_right,
        jump_pressed: n % 90 == 45,
        ..Default::default()
    };
    match n {
        30 => input.left_clicks.push(Vec2::new(100.0, floor - settings.grid_size)),
        31 => input
            .left_clicks
            .push(Vec2::new(100.0, floor - 2.0 * settings.grid_size)),
        60 => input.right_clicks.push(Vec2::new(settings.width, 50.0)),
        _ => {}
    }
    input
}

fn run(settings: Settings, frames: u64) -> RunSummary {
    let script_settings = settings.clone();
    let mut driver = SceneDriver::new(settings);
    let mut canvas = VertexCanvas::new();
    let mut summary = RunSummary::default();

    for n in 0..frames {
        let input = scripted_input(n, &script_settings);
        let outcome = driver.frame(&input, &mut canvas);

        for event in driver.last_events() {
            match event {
                StepEvent::Contact { .. } => summary.contacts += 1,
                StepEvent::Destroyed(_) => summary.destroyed += 1,
            }
        }

        match outcome {
            FrameOutcome::Running => {}
            FrameOutcome::LevelChanged(level) => summary.level_changes.push((n, level)),
            FrameOutcome::Stopped => break,
        }
        summary.frames += 1;
    }

    summary.level = Some(driver.level());
    summary.score = driver.score();
    summary.bodies = driver.world().len();
    summary.player = driver.world().get(driver.player()).map(|p| p.pos);
    summary.triangles = canvas.triangle_count();
    summary
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Platformer (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    let frames = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(frames)) => frames,
        Some(Err(e)) => {
            log::warn!("Invalid frame count ({}), using default", e);
            settings.fps as u64 * DEFAULT_SECONDS
        }
        None => settings.fps as u64 * DEFAULT_SECONDS,
    };

    let summary = run(settings, frames);
    log::info!(
        "Finished {} frames on level {:?}",
        summary.frames,
        summary.level
    );

    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            log::error!("Failed to serialize run summary: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser host drives `SceneDriver` directly; nothing to do here
}
