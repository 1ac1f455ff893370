//! Replay a scripted pointer session against a headless surface.
//!
//! ```sh
//! RUST_LOG=debug cargo run -p clouds-drag --example replay
//! RUST_LOG=trace cargo run -p clouds-drag --example replay -- surface.json
//! ```
//!
//! Without an argument the built-in four-cloud surface is used.

use clouds_core::{Point, SurfaceConfig};
use clouds_drag::{LocalChannel, PointerMessage, Surface};
use std::env;
use std::fs;
use std::process::ExitCode;

/// One step of the scripted session.
enum Step {
    Down(i32, i32),
    Move(i32, i32),
    Up,
    Tick,
}

const SCRIPT: &[Step] = &[
    Step::Down(120, 80),
    Step::Move(200, 150),
    Step::Move(205, 140),
    Step::Tick,
    Step::Up,
    Step::Tick,
    Step::Down(260, 90),
    Step::Move(300, 300),
    Step::Move(310, 320),
    Step::Move(320, 340),
    Step::Tick,
    Step::Up,
];

fn main() -> ExitCode {
    env_logger::init();

    let config = match env::args().nth(1) {
        Some(path) => {
            let loaded = fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|json| SurfaceConfig::from_json(&json).map_err(|e| e.to_string()));
            match loaded {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("cannot load {path}: {e}");
                    return ExitCode::FAILURE;
                }
            }
        }
        None => SurfaceConfig::default(),
    };

    let mut surface = match Surface::from_config(&config, LocalChannel::new()) {
        Ok(surface) => surface,
        Err(e) => {
            eprintln!("cannot build surface: {e}");
            return ExitCode::FAILURE;
        }
    };

    for step in SCRIPT {
        match step {
            Step::Down(x, y) => match surface.pointer_down_at(Point::new(*x, *y)) {
                Ok(Some(id)) => println!("down  ({x}, {y}) grabbed {id}"),
                Ok(None) => println!("down  ({x}, {y}) on background"),
                Err(e) => println!("down  ({x}, {y}) rejected: {e}"),
            },
            Step::Move(x, y) => {
                surface.broadcast(PointerMessage::sample(*x, *y));
            }
            Step::Up => {
                surface.broadcast(PointerMessage::Released);
            }
            Step::Tick => {
                for paint in surface.flush_paints() {
                    let (left, top) = paint.css_offset();
                    println!("paint {} left={left} top={top}", paint.id);
                }
            }
        }
    }

    println!(
        "done: {} ticks, {} live subscription(s)",
        surface.scheduler().ticks(),
        surface.channel().live_count()
    );
    ExitCode::SUCCESS
}
