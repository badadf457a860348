//! # Tessera Headless
//!
//! Runs the click-to-move demo without a window. Clicks are scripted and
//! every view request is only recorded.
//!
//! ```bash
//! # Defaults
//! tessera-headless
//!
//! # Custom config, verbose
//! RUST_LOG=debug tessera-headless tessera.toml
//! ```

use std::process::ExitCode;

use tessera::adapters::{RecordingViewFactory, ScriptedInput};
use tessera::components::{Move, Mover, Position};
use tessera::{GameConfig, GameController, GameResult};
use tessera_core::{Component, Matcher};
use tessera_shared::Vec2;
use tracing_subscriber::EnvFilter;

/// Fixed step, 60 Hz.
const FRAME_SECONDS: f32 = 1.0 / 60.0;

/// Frames to simulate.
const FRAMES: u64 = 240;

/// Log mover positions every this many frames.
const REPORT_EVERY: u64 = 30;

/// `(frame, target)` pairs for scripted left clicks.
const CLICKS: [(u64, Vec2); 4] = [
    (1, Vec2::new(3.0, 4.0)),
    (20, Vec2::new(-4.0, 2.0)),
    (40, Vec2::new(0.0, -5.0)),
    (120, Vec2::new(6.0, 6.0)),
];

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "headless run failed");
            ExitCode::FAILURE
        }
    }
}

fn run() -> GameResult<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            tracing::info!(%path, "loading config");
            GameConfig::load(path)?
        }
        None => GameConfig::default(),
    };

    let (input, script) = ScriptedInput::new();
    let views = RecordingViewFactory::new();
    let mut game = GameController::new(config, Box::new(input), Box::new(views.clone()))?;
    game.start()?;

    for frame in 1..=FRAMES {
        for &(_, target) in CLICKS.iter().filter(|(at, _)| *at == frame) {
            script.click_left(target);
        }
        game.update(FRAME_SECONDS)?;

        if frame % REPORT_EVERY == 0 {
            report(&mut game, frame);
        }
    }

    tracing::info!(views = views.created().len(), "views created");
    game.shutdown()
}

fn report(game: &mut GameController, frame: u64) {
    let game_context = &mut game.contexts_mut().game;
    let movers = game_context.get_group(Matcher::of(Mover::KIND));
    for entity in game_context.group(movers).entities() {
        let Ok(position) = game_context.get::<Position>(entity) else {
            continue;
        };
        tracing::info!(
            frame,
            %entity,
            x = position.value.x,
            y = position.value.y,
            moving = game_context.has::<Move>(entity),
            "mover"
        );
    }
}
