//! # Game Controller
//!
//! The frame driver the host calls:
//!
//! ```text
//! new() ─▶ start() ─▶ update(dt) ─▶ update(dt) ─▶ ... ─▶ shutdown()
//!          initialize   execute        execute             tear_down
//!                       cleanup        cleanup
//! ```
//!
//! `update` before `start` (or after `shutdown`) is rejected with
//! `NotInitialized` and leaves the clock untouched.

use tessera_core::{EcsError, EntityId, Feature, System};
use tessera_shared::Vec2;
use tracing::info;

use crate::adapters::{InputSource, ViewFactory};
use crate::config::GameConfig;
use crate::contexts::Contexts;
use crate::error::GameResult;
use crate::features::root_systems;
use crate::systems::spawn_mover;

/// Owns the contexts and the root feature.
pub struct GameController {
    contexts: Contexts,
    systems: Feature<Contexts>,
    config: GameConfig,
}

impl GameController {
    /// Validates `config` and wires the full pipeline.
    ///
    /// # Errors
    ///
    /// Returns a config error if `config` does not validate.
    pub fn new(
        config: GameConfig,
        input: Box<dyn InputSource>,
        views: Box<dyn ViewFactory>,
    ) -> GameResult<Self> {
        config.validate()?;
        let mut contexts = Contexts::new(&config.context_config());
        let systems = root_systems(&mut contexts, &config, input, views);
        Ok(Self {
            contexts,
            systems,
            config,
        })
    }

    /// Runs initialize on every system.
    ///
    /// A stopped game can be started again; the configured movers are
    /// spawned afresh.
    ///
    /// # Errors
    ///
    /// `AlreadyInitialized` if the game is running, otherwise propagates
    /// ECS failures from any system.
    pub fn start(&mut self) -> GameResult<()> {
        self.systems.initialize(&mut self.contexts)?;
        info!(
            movers = self.config.movers.len(),
            seed = self.config.seed,
            "game started"
        );
        Ok(())
    }

    /// Runs one frame: execute, then cleanup.
    ///
    /// # Errors
    ///
    /// Returns `NotInitialized` before [`start`](Self::start), otherwise
    /// propagates ECS failures.
    pub fn update(&mut self, delta_seconds: f32) -> GameResult<()> {
        if !self.systems.is_initialized() {
            return Err(EcsError::NotInitialized {
                system: self.systems.name().to_owned(),
            }
            .into());
        }
        self.contexts.clock.advance(delta_seconds);
        self.systems.execute(&mut self.contexts)?;
        self.systems.cleanup(&mut self.contexts)?;
        Ok(())
    }

    /// Runs tear-down on every system.
    ///
    /// # Errors
    ///
    /// Propagates ECS failures from any system.
    pub fn shutdown(&mut self) -> GameResult<()> {
        self.systems.tear_down(&mut self.contexts)?;
        info!(frames = self.contexts.clock.frame, "game stopped");
        Ok(())
    }

    /// Checks if [`start`](Self::start) has run.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.systems.is_initialized()
    }

    /// Read access to every context.
    #[must_use]
    pub const fn contexts(&self) -> &Contexts {
        &self.contexts
    }

    /// Write access to every context.
    pub fn contexts_mut(&mut self) -> &mut Contexts {
        &mut self.contexts
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Spawns one more mover outside the configured set.
    ///
    /// # Errors
    ///
    /// Propagates ECS failures.
    pub fn spawn_mover(&mut self, position: Vec2, sprite: &str) -> GameResult<EntityId> {
        Ok(spawn_mover(&mut self.contexts.game, position, sprite)?)
    }
}
