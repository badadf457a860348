//! Mover spawning, stepping and arrival.

use tessera_core::{Component, Context, EcsResult, EntityId, GroupHandle, Matcher, System};
use tessera_shared::Vec2;
use tracing::debug;

use crate::components::{Direction, Game, Move, MoveComplete, Mover, Position, Sprite};
use crate::config::MoverSpawn;
use crate::contexts::Contexts;

/// Creates a mover at `position` facing +X.
///
/// # Errors
///
/// Propagates ECS failures.
pub fn spawn_mover(game: &mut Context<Game>, position: Vec2, sprite: &str) -> EcsResult<EntityId> {
    let entity = game.create_entity();
    game.add(entity, Mover)?;
    game.add(entity, Position { value: position })?;
    game.add(entity, Direction { degrees: 0.0 })?;
    game.add(
        entity,
        Sprite {
            name: sprite.to_owned(),
        },
    )?;
    Ok(entity)
}

/// Creates the configured movers on initialize and destroys them on tear down.
pub struct SpawnMoversSystem {
    spawns: Vec<MoverSpawn>,
    spawned: Vec<EntityId>,
}

impl SpawnMoversSystem {
    /// Spawns `spawns` in order.
    #[must_use]
    pub fn new(spawns: Vec<MoverSpawn>) -> Self {
        Self {
            spawns,
            spawned: Vec::new(),
        }
    }
}

impl System<Contexts> for SpawnMoversSystem {
    fn name(&self) -> &str {
        "SpawnMoversSystem"
    }

    fn initialize(&mut self, world: &mut Contexts) -> EcsResult<()> {
        for spawn in &self.spawns {
            let entity = spawn_mover(&mut world.game, spawn.position(), &spawn.sprite)?;
            debug!(%entity, x = spawn.x, y = spawn.y, sprite = %spawn.sprite, "mover spawned");
            self.spawned.push(entity);
        }
        Ok(())
    }

    fn tear_down(&mut self, world: &mut Contexts) -> EcsResult<()> {
        for entity in self.spawned.drain(..) {
            if world.game.is_alive(entity) {
                world.game.destroy_entity(entity)?;
            }
        }
        Ok(())
    }
}

/// Steps every ordered mover toward its target.
///
/// On arrival the mover snaps onto the target, loses `Move` and is flagged
/// `MoveComplete` for the rest of the frame.
pub struct MoveSystem {
    moving: GroupHandle,
    speed: f32,
    arrival_distance: f32,
}

impl MoveSystem {
    /// Creates the system and its `all_of(Move, Position)` group.
    #[must_use]
    pub fn new(contexts: &mut Contexts, speed: f32, arrival_distance: f32) -> Self {
        let moving = contexts
            .game
            .get_group(Matcher::new().all_of(&[Move::KIND, Position::KIND]));
        Self {
            moving,
            speed,
            arrival_distance,
        }
    }
}

impl System<Contexts> for MoveSystem {
    fn name(&self) -> &str {
        "MoveSystem"
    }

    fn execute(&mut self, world: &mut Contexts) -> EcsResult<()> {
        let step = self.speed * world.clock.delta_seconds;
        let game = &mut world.game;

        for entity in game.group(self.moving).entities() {
            let position = game.get::<Position>(entity)?.value;
            let target = game.get::<Move>(entity)?.target;
            let remaining = position.distance(target);

            if remaining > f32::EPSILON {
                let degrees = (target - position).angle_degrees();
                game.replace(entity, Direction { degrees })?;
            }

            if remaining <= step.max(self.arrival_distance) {
                game.replace(entity, Position { value: target })?;
                game.remove::<Move>(entity)?;
                game.replace(entity, MoveComplete)?;
                debug!(%entity, x = target.x, y = target.y, "move complete");
            } else {
                let value = position.move_towards(target, step);
                game.replace(entity, Position { value })?;
            }
        }
        Ok(())
    }
}

/// Clears every `MoveComplete` flag at the end of the frame.
pub struct CleanupMoveCompleteSystem {
    completed: GroupHandle,
}

impl CleanupMoveCompleteSystem {
    /// Creates the system and its `MoveComplete` group.
    #[must_use]
    pub fn new(contexts: &mut Contexts) -> Self {
        Self {
            completed: contexts.game.get_group(Matcher::of(MoveComplete::KIND)),
        }
    }
}

impl System<Contexts> for CleanupMoveCompleteSystem {
    fn name(&self) -> &str {
        "CleanupMoveCompleteSystem"
    }

    fn cleanup(&mut self, world: &mut Contexts) -> EcsResult<()> {
        for entity in world.game.group(self.completed).entities() {
            world.game.remove::<MoveComplete>(entity)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moving_world(speed: f32) -> (Contexts, MoveSystem, EntityId) {
        let mut contexts = Contexts::default();
        let system = MoveSystem::new(&mut contexts, speed, 0.05);
        let mover = spawn_mover(&mut contexts.game, Vec2::ZERO, "Mover").unwrap();
        contexts
            .game
            .add(mover, Move { target: Vec2::new(3.0, 4.0) })
            .unwrap();
        contexts.clock.advance(1.0);
        (contexts, system, mover)
    }

    #[test]
    fn test_spawn_movers_on_initialize() {
        let mut contexts = Contexts::default();
        let mut system = SpawnMoversSystem::new(vec![
            MoverSpawn::new(Vec2::new(1.0, 0.0), "A"),
            MoverSpawn::new(Vec2::new(2.0, 0.0), "B"),
        ]);
        system.initialize(&mut contexts).unwrap();

        let movers = contexts.game.entities();
        assert_eq!(movers.len(), 2);
        assert_eq!(contexts.game.get::<Sprite>(movers[1]).unwrap().name, "B");
        assert_eq!(
            contexts.game.get::<Position>(movers[0]).unwrap().value,
            Vec2::new(1.0, 0.0)
        );
        assert!(contexts.game.has::<Mover>(movers[0]));
    }

    #[test]
    fn test_spawn_movers_tear_down_destroys_them() {
        let mut contexts = Contexts::default();
        let mut system = SpawnMoversSystem::new(vec![
            MoverSpawn::new(Vec2::new(1.0, 0.0), "A"),
            MoverSpawn::new(Vec2::new(2.0, 0.0), "B"),
        ]);
        system.initialize(&mut contexts).unwrap();
        let first = contexts.game.entities()[0];
        contexts.game.destroy_entity(first).unwrap();

        system.tear_down(&mut contexts).unwrap();
        assert_eq!(contexts.game.count(), 0);

        system.initialize(&mut contexts).unwrap();
        assert_eq!(contexts.game.count(), 2);
    }

    #[test]
    fn test_move_steps_toward_target() {
        let (mut contexts, mut system, mover) = moving_world(2.5);
        system.execute(&mut contexts).unwrap();

        let position = contexts.game.get::<Position>(mover).unwrap().value;
        assert!((position.x - 1.5).abs() < 1e-5);
        assert!((position.y - 2.0).abs() < 1e-5);
        assert!(contexts.game.has::<Move>(mover));
        assert!(!contexts.game.has::<MoveComplete>(mover));

        let degrees = contexts.game.get::<Direction>(mover).unwrap().degrees;
        assert!((degrees - 53.130_1).abs() < 1e-3);
    }

    #[test]
    fn test_move_arrives_and_flags_completion() {
        let (mut contexts, mut system, mover) = moving_world(2.5);
        system.execute(&mut contexts).unwrap();
        system.execute(&mut contexts).unwrap();

        assert_eq!(
            contexts.game.get::<Position>(mover).unwrap().value,
            Vec2::new(3.0, 4.0)
        );
        assert!(!contexts.game.has::<Move>(mover));
        assert!(contexts.game.has::<MoveComplete>(mover));

        // No Move, so nothing left to do.
        system.execute(&mut contexts).unwrap();
        assert!(contexts.game.has::<MoveComplete>(mover));
    }

    #[test]
    fn test_cleanup_move_complete_is_idempotent() {
        let (mut contexts, mut system, mover) = moving_world(10.0);
        let mut cleanup = CleanupMoveCompleteSystem::new(&mut contexts);
        system.execute(&mut contexts).unwrap();
        assert!(contexts.game.has::<MoveComplete>(mover));

        cleanup.cleanup(&mut contexts).unwrap();
        assert!(!contexts.game.has::<MoveComplete>(mover));

        cleanup.cleanup(&mut contexts).unwrap();
        assert!(!contexts.game.has::<MoveComplete>(mover));
        assert!(contexts.game.is_alive(mover));
    }
}
