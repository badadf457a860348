//! Input capture and click-to-move commands.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tessera_core::{
    Collector, Component, Context, EcsError, EcsResult, EntityId, Matcher, ReactiveBehaviour,
    ReactiveSystem, System, Trigger,
};
use tessera_shared::Vec2;
use tracing::{debug, trace};

use crate::adapters::{ButtonState, InputSource};
use crate::components::{Input, LeftMouse, MouseDown, MousePosition, MouseUp, Move, Mover, RightMouse};
use crate::contexts::Contexts;

/// Movers that can take a new order: `all_of(Mover) none_of(Move)`.
#[must_use]
pub fn idle_movers() -> Matcher {
    Matcher::new().all_of(&[Mover::KIND]).none_of(&[Move::KIND])
}

/// Mirrors the polled button state onto the input singletons.
///
/// Creates the `LeftMouse` and `RightMouse` entities on initialize. Each
/// execute writes `MouseDown`, `MousePosition` and `MouseUp` independently,
/// adding on first use and replacing afterwards.
pub struct EmitInputSystem {
    source: Box<dyn InputSource>,
    buttons: Option<(EntityId, EntityId)>,
}

impl EmitInputSystem {
    /// Wraps an input source.
    #[must_use]
    pub fn new(source: Box<dyn InputSource>) -> Self {
        Self {
            source,
            buttons: None,
        }
    }

    /// The `(left, right)` singletons, once initialized.
    #[must_use]
    pub const fn buttons(&self) -> Option<(EntityId, EntityId)> {
        self.buttons
    }
}

fn emit_button(
    input: &mut Context<Input>,
    entity: EntityId,
    state: ButtonState,
    cursor: Vec2,
) -> EcsResult<()> {
    if state.just_pressed {
        trace!(%entity, x = cursor.x, y = cursor.y, "mouse down");
        input.replace(entity, MouseDown { position: cursor })?;
    }
    if state.held {
        input.replace(entity, MousePosition { position: cursor })?;
    }
    if state.just_released {
        trace!(%entity, x = cursor.x, y = cursor.y, "mouse up");
        input.replace(entity, MouseUp { position: cursor })?;
    }
    Ok(())
}

impl System<Contexts> for EmitInputSystem {
    fn name(&self) -> &str {
        "EmitInputSystem"
    }

    fn initialize(&mut self, world: &mut Contexts) -> EcsResult<()> {
        let left = world.input.set_unique(LeftMouse)?;
        let right = world.input.set_unique(RightMouse)?;
        debug!(%left, %right, "button singletons ready");
        self.buttons = Some((left, right));
        Ok(())
    }

    fn execute(&mut self, world: &mut Contexts) -> EcsResult<()> {
        let (left, right) = self.buttons.ok_or_else(|| EcsError::NotInitialized {
            system: self.name().to_owned(),
        })?;

        let frame = self.source.poll();
        emit_button(&mut world.input, left, frame.left, frame.cursor)?;
        emit_button(&mut world.input, right, frame.right, frame.cursor)
    }

    fn tear_down(&mut self, _world: &mut Contexts) -> EcsResult<()> {
        self.buttons = None;
        Ok(())
    }
}

/// Orders a random idle mover to the clicked position.
///
/// Triggered by `MouseDown` landing on the left-button entity. The idle
/// group is re-read for every trigger, so a mover ordered earlier in the
/// same batch is no longer a candidate. No idle mover means nothing to do.
pub struct CommandMove {
    rng: ChaCha8Rng,
}

impl CommandMove {
    /// Creates the behaviour with a deterministic RNG.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl ReactiveBehaviour<Contexts> for CommandMove {
    type Namespace = Input;

    fn context(world: &mut Contexts) -> &mut Context<Input> {
        &mut world.input
    }

    fn trigger(&self, context: &mut Context<Input>) -> Collector<Input> {
        context.create_collector(
            Matcher::new().all_of(&[LeftMouse::KIND, MouseDown::KIND]),
            Trigger::OnAdded,
        )
    }

    fn filter(&self, context: &Context<Input>, entity: EntityId) -> bool {
        context.has::<MouseDown>(entity)
    }

    fn react(&mut self, world: &mut Contexts, entities: &[EntityId]) -> EcsResult<()> {
        let idle = world.game.get_group(idle_movers());

        for &entity in entities {
            let target = world.input.get::<MouseDown>(entity)?.position;
            let movers = world.game.group(idle).entities();
            if movers.is_empty() {
                debug!(x = target.x, y = target.y, "no idle mover, click ignored");
                continue;
            }

            let mover = movers[self.rng.gen_range(0..movers.len())];
            world.game.add(mover, Move { target })?;
            debug!(%mover, x = target.x, y = target.y, "move ordered");
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "CommandMoveSystem"
    }
}

/// [`CommandMove`] wired into the reactive pipeline.
pub type CommandMoveSystem = ReactiveSystem<Contexts, CommandMove>;

/// Builds a [`CommandMoveSystem`] observing `contexts.input`.
#[must_use]
pub fn command_move_system(contexts: &mut Contexts, seed: u64) -> CommandMoveSystem {
    ReactiveSystem::new(contexts, CommandMove::new(seed))
}
