//! # Features
//!
//! ```text
//! Systems
//! ├── Input Systems     EmitInput → CommandMove
//! ├── Movement Systems  SpawnMovers → Move → CleanupMoveComplete
//! └── View Systems      AddView
//! ```
//!
//! Input runs first so a click is turned into a `Move` before the movement
//! systems step positions in the same frame.

use tessera_core::Feature;

use crate::adapters::{InputSource, ViewFactory};
use crate::config::GameConfig;
use crate::contexts::Contexts;
use crate::systems::{
    add_view_system, command_move_system, CleanupMoveCompleteSystem, EmitInputSystem, MoveSystem,
    SpawnMoversSystem,
};

/// Input capture and move commands.
#[must_use]
pub fn input_systems(
    contexts: &mut Contexts,
    source: Box<dyn InputSource>,
    seed: u64,
) -> Feature<Contexts> {
    Feature::new("Input Systems")
        .add(EmitInputSystem::new(source))
        .add(command_move_system(contexts, seed))
}

/// Spawning, stepping and per-frame arrival flags.
#[must_use]
pub fn movement_systems(contexts: &mut Contexts, config: &GameConfig) -> Feature<Contexts> {
    Feature::new("Movement Systems")
        .add(SpawnMoversSystem::new(config.movers.clone()))
        .add(MoveSystem::new(
            contexts,
            config.mover_speed,
            config.arrival_distance,
        ))
        .add(CleanupMoveCompleteSystem::new(contexts))
}

/// Display objects.
#[must_use]
pub fn view_systems(contexts: &mut Contexts, factory: Box<dyn ViewFactory>) -> Feature<Contexts> {
    Feature::new("View Systems").add(add_view_system(contexts, factory))
}

/// The full pipeline in frame order.
#[must_use]
pub fn root_systems(
    contexts: &mut Contexts,
    config: &GameConfig,
    source: Box<dyn InputSource>,
    factory: Box<dyn ViewFactory>,
) -> Feature<Contexts> {
    Feature::new("Systems")
        .add(input_systems(contexts, source, config.seed))
        .add(movement_systems(contexts, config))
        .add(view_systems(contexts, factory))
}
