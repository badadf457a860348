//! View creation for entities that gain a sprite.

use tessera_core::{
    Collector, Component, Context, EcsResult, EntityId, Matcher, ReactiveBehaviour, ReactiveSystem,
    Trigger,
};
use tracing::debug;

use crate::adapters::ViewFactory;
use crate::components::{Game, Sprite, View};
use crate::contexts::Contexts;

/// Asks the host for a display object once per sprite entity.
pub struct AddView {
    factory: Box<dyn ViewFactory>,
}

impl AddView {
    /// Wraps the host's view factory.
    #[must_use]
    pub fn new(factory: Box<dyn ViewFactory>) -> Self {
        Self { factory }
    }
}

impl ReactiveBehaviour<Contexts> for AddView {
    type Namespace = Game;

    fn context(world: &mut Contexts) -> &mut Context<Game> {
        &mut world.game
    }

    fn trigger(&self, context: &mut Context<Game>) -> Collector<Game> {
        context.create_collector(Matcher::of(Sprite::KIND), Trigger::OnAdded)
    }

    fn filter(&self, context: &Context<Game>, entity: EntityId) -> bool {
        context.has::<Sprite>(entity) && !context.has::<View>(entity)
    }

    fn react(&mut self, world: &mut Contexts, entities: &[EntityId]) -> EcsResult<()> {
        for &entity in entities {
            let handle = {
                let sprite = world.game.get::<Sprite>(entity)?;
                self.factory.create_view(entity, &sprite.name)
            };
            world.game.add(entity, View { handle })?;
            debug!(%entity, %handle, "view created");
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "AddViewSystem"
    }
}

/// [`AddView`] wired into the reactive pipeline.
pub type AddViewSystem = ReactiveSystem<Contexts, AddView>;

/// Builds an [`AddViewSystem`] observing `contexts.game`.
#[must_use]
pub fn add_view_system(contexts: &mut Contexts, factory: Box<dyn ViewFactory>) -> AddViewSystem {
    ReactiveSystem::new(contexts, AddView::new(factory))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::RecordingViewFactory;
    use tessera_core::System;

    #[test]
    fn test_add_view_once_per_sprite() {
        let mut contexts = Contexts::default();
        let views = RecordingViewFactory::new();
        let mut system = add_view_system(&mut contexts, Box::new(views.clone()));

        let e = contexts.game.create_entity();
        contexts.game.add(e, Sprite { name: "Mover".into() }).unwrap();

        system.execute(&mut contexts).unwrap();
        let handle = contexts.game.get::<View>(e).unwrap().handle;
        assert_eq!(views.created()[0].handle, handle);

        // A new sprite name re-triggers, but the filter sees the view.
        contexts.game.replace(e, Sprite { name: "Other".into() }).unwrap();
        system.execute(&mut contexts).unwrap();
        system.execute(&mut contexts).unwrap();
        assert_eq!(views.count_for(e), 1);
    }

    #[test]
    fn test_add_view_skips_sprite_removed_before_drain() {
        let mut contexts = Contexts::default();
        let views = RecordingViewFactory::new();
        let mut system = add_view_system(&mut contexts, Box::new(views.clone()));

        let e = contexts.game.create_entity();
        contexts.game.add(e, Sprite { name: "Mover".into() }).unwrap();
        contexts.game.remove::<Sprite>(e).unwrap();

        system.execute(&mut contexts).unwrap();
        assert!(views.created().is_empty());
        assert!(!contexts.game.has::<View>(e));
    }
}
