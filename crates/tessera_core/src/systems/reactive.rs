//! # Reactive Systems
//!
//! A reactive system only processes entities delivered by its collector.
//! One execute step walks the state machine:
//!
//! ```text
//! Idle ──(collector non-empty)──▶ Triggered ──▶ Filtered ──▶ Processing ──▶ Idle
//!   ▲                                 │ take buffer   │ drop failing      │ release
//!   └──────────(empty)────────────────┘               │ entities          │ survivors
//! ```
//!
//! The buffer is swapped out when the step starts. Triggers raised later
//! in the frame, including by this system's own processing, are handled on
//! the next step. The filter runs at drain time, so an entity that lost the
//! triggering component (or was destroyed) in between is never processed.

use std::marker::PhantomData;

use super::system::System;
use crate::ecs::{Collector, Context, EntityId, Namespace};
use crate::error::EcsResult;

/// Where a reactive system is in its execute step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReactiveState {
    /// Nothing pending.
    #[default]
    Idle,
    /// The collector had entities; the buffer has been taken.
    Triggered,
    /// Entities failing the filter have been dropped.
    Filtered,
    /// The behaviour is reacting to the survivors.
    Processing,
}

/// Domain half of a reactive system.
pub trait ReactiveBehaviour<W> {
    /// Namespace of the context the collector observes.
    type Namespace: Namespace;

    /// Selects the observed context out of the world.
    fn context(world: &mut W) -> &mut Context<Self::Namespace>;

    /// Builds the collector. Called once, at construction.
    fn trigger(&self, context: &mut Context<Self::Namespace>) -> Collector<Self::Namespace>;

    /// Re-checks a collected entity at drain time.
    fn filter(&self, context: &Context<Self::Namespace>, entity: EntityId) -> bool;

    /// Processes the entities that passed the filter.
    ///
    /// # Errors
    ///
    /// Propagates ECS failures.
    fn react(&mut self, world: &mut W, entities: &[EntityId]) -> EcsResult<()>;

    /// Name used in logs and errors.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Drives a [`ReactiveBehaviour`] through the collector state machine.
pub struct ReactiveSystem<W, B: ReactiveBehaviour<W>> {
    behaviour: B,
    collector: Collector<B::Namespace>,
    state: ReactiveState,
    _world: PhantomData<fn(&mut W)>,
}

impl<W, B: ReactiveBehaviour<W>> ReactiveSystem<W, B> {
    /// Wraps a behaviour and builds its collector.
    pub fn new(world: &mut W, behaviour: B) -> Self {
        let collector = behaviour.trigger(B::context(world));
        Self {
            behaviour,
            collector,
            state: ReactiveState::Idle,
            _world: PhantomData,
        }
    }

    /// The wrapped behaviour.
    #[inline]
    #[must_use]
    pub const fn behaviour(&self) -> &B {
        &self.behaviour
    }

    /// The wrapped behaviour, mutably.
    #[inline]
    pub fn behaviour_mut(&mut self) -> &mut B {
        &mut self.behaviour
    }

    /// Current state. `Idle` between steps unless the last step failed.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> ReactiveState {
        self.state
    }

    /// The collector feeding this system.
    #[inline]
    #[must_use]
    pub const fn collector(&self) -> &Collector<B::Namespace> {
        &self.collector
    }

    /// Resumes collecting.
    pub fn activate(&mut self, world: &mut W) {
        self.collector.activate(B::context(world));
    }

    /// Stops collecting and drops anything pending.
    ///
    /// # Errors
    ///
    /// Propagates release failures.
    pub fn deactivate(&mut self, world: &mut W) -> EcsResult<()> {
        self.collector.deactivate(B::context(world))
    }

    /// Drops anything pending without processing it.
    ///
    /// # Errors
    ///
    /// Propagates release failures.
    pub fn clear(&mut self, world: &mut W) -> EcsResult<()> {
        self.collector.clear_collected_entities(B::context(world))
    }

    fn transition(&mut self, state: ReactiveState) {
        tracing::trace!(system = self.behaviour.name(), from = ?self.state, to = ?state, "reactive state");
        self.state = state;
    }
}

impl<W, B: ReactiveBehaviour<W>> System<W> for ReactiveSystem<W, B> {
    fn name(&self) -> &str {
        self.behaviour.name()
    }

    fn execute(&mut self, world: &mut W) -> EcsResult<()> {
        if self.collector.is_empty() {
            self.state = ReactiveState::Idle;
            return Ok(());
        }

        self.transition(ReactiveState::Triggered);
        let collected = self.collector.take_collected();

        let context = B::context(world);
        let view = &*context;
        let behaviour = &self.behaviour;
        let (entities, dropped): (Vec<_>, Vec<_>) = collected
            .into_iter()
            .partition(|&entity| view.is_alive(entity) && behaviour.filter(view, entity));
        if let Err(err) = release_all(context, dropped) {
            // Nothing gets processed, so the survivors are handed back too.
            release_all(context, entities)?;
            return Err(err);
        }
        self.transition(ReactiveState::Filtered);

        if !entities.is_empty() {
            self.transition(ReactiveState::Processing);
            let result = self.behaviour.react(world, &entities);
            let released = release_all(B::context(world), entities);
            result.and(released)?;
        }

        self.transition(ReactiveState::Idle);
        Ok(())
    }

    fn initialize(&mut self, world: &mut W) -> EcsResult<()> {
        self.activate(world);
        self.state = ReactiveState::Idle;
        Ok(())
    }

    fn tear_down(&mut self, world: &mut W) -> EcsResult<()> {
        self.deactivate(world)
    }
}

/// Releases every entity, then reports the first failure.
fn release_all<N: Namespace>(
    context: &mut Context<N>,
    entities: impl IntoIterator<Item = EntityId>,
) -> EcsResult<()> {
    let mut first_error = None;
    for entity in entities {
        if let Err(err) = context.release(entity) {
            first_error.get_or_insert(err);
        }
    }
    first_error.map_or(Ok(()), Err)
}
