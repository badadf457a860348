//! End-to-end frame scenarios driven through the controller.

use tessera::adapters::{InputScript, RecordingViewFactory, ScriptedInput};
use tessera::components::{LeftMouse, Move, MoveComplete, MouseDown, Position, Sprite, View};
use tessera::features::movement_systems;
use tessera::{Contexts, GameConfig, GameController, GameError, MoverSpawn};
use tessera_core::{Component, EcsError, Matcher, System};
use tessera_shared::Vec2;

const DT: f32 = 1.0 / 60.0;

struct Harness {
    game: GameController,
    script: InputScript,
    views: RecordingViewFactory,
}

fn harness(config: GameConfig) -> Harness {
    let (input, script) = ScriptedInput::new();
    let views = RecordingViewFactory::new();
    let mut game = GameController::new(config, Box::new(input), Box::new(views.clone())).unwrap();
    game.start().unwrap();
    Harness {
        game,
        script,
        views,
    }
}

fn empty_config() -> GameConfig {
    GameConfig {
        movers: Vec::new(),
        ..GameConfig::default()
    }
}

fn move_target(game: &GameController, entity: tessera_core::EntityId) -> Option<Vec2> {
    game.contexts()
        .game
        .get::<Move>(entity)
        .ok()
        .map(|order| order.target)
}

#[test]
fn test_scenario_a_click_orders_only_mover() {
    let mut h = harness(empty_config());
    let e1 = h.game.spawn_mover(Vec2::ZERO, "Mover").unwrap();
    assert_eq!(move_target(&h.game, e1), None);

    h.script.press_left(Vec2::new(3.0, 4.0));
    h.game.update(DT).unwrap();

    assert_eq!(move_target(&h.game, e1), Some(Vec2::new(3.0, 4.0)));
}

#[test]
fn test_scenario_b_busy_mover_untouched() {
    let mut h = harness(empty_config());
    let m1 = h.game.spawn_mover(Vec2::ZERO, "Mover").unwrap();
    let m2 = h.game.spawn_mover(Vec2::ZERO, "Mover").unwrap();
    h.game
        .contexts_mut()
        .game
        .add(m1, Move { target: Vec2::new(9.0, 9.0) })
        .unwrap();

    h.script.press_left(Vec2::new(3.0, 4.0));
    h.game.update(DT).unwrap();

    assert_eq!(move_target(&h.game, m1), Some(Vec2::new(9.0, 9.0)));
    assert_eq!(move_target(&h.game, m2), Some(Vec2::new(3.0, 4.0)));
}

#[test]
fn test_scenario_c_no_movers_is_not_an_error() {
    let mut h = harness(empty_config());

    h.script.click_left(Vec2::new(3.0, 4.0));
    h.game.update(DT).unwrap();
    h.game.update(DT).unwrap();

    assert_eq!(h.game.contexts().game.count(), 0);
    assert!(h.views.created().is_empty());
}

#[test]
fn test_scenario_c_all_movers_busy() {
    let mut h = harness(empty_config());
    let busy = h.game.spawn_mover(Vec2::ZERO, "Mover").unwrap();
    h.game
        .contexts_mut()
        .game
        .add(busy, Move { target: Vec2::new(50.0, 0.0) })
        .unwrap();

    h.script.press_left(Vec2::new(3.0, 4.0));
    h.game.update(DT).unwrap();

    assert_eq!(move_target(&h.game, busy), Some(Vec2::new(50.0, 0.0)));
}

#[test]
fn test_scenario_d_view_created_once() {
    let mut h = harness(empty_config());
    let e = h.game.spawn_mover(Vec2::ZERO, "Scout").unwrap();
    assert!(h.views.created().is_empty());

    h.game.update(DT).unwrap();
    assert_eq!(h.views.count_for(e), 1);
    assert_eq!(h.views.created()[0].sprite, "Scout");
    let handle = h.game.contexts().game.get::<View>(e).unwrap().handle;

    for _ in 0..5 {
        h.game.update(DT).unwrap();
    }
    assert_eq!(h.views.count_for(e), 1);
    assert_eq!(h.game.contexts().game.get::<View>(e).unwrap().handle, handle);
}

#[test]
fn test_scenario_d_plain_sprite_entity_gets_view() {
    let mut h = harness(empty_config());
    let contexts = h.game.contexts_mut();
    let e = contexts.game.create_entity();
    contexts.game.add(e, Sprite { name: "Rock".into() }).unwrap();

    h.game.update(DT).unwrap();
    h.game.update(DT).unwrap();

    assert_eq!(h.views.count_for(e), 1);
}

#[test]
fn test_scenario_e_mouse_down_seen_same_frame() {
    let mut h = harness(empty_config());
    let mover = h.game.spawn_mover(Vec2::ZERO, "Mover").unwrap();

    h.script.press_left(Vec2::new(1.0, 1.0));
    h.game.update(DT).unwrap();

    let input = &h.game.contexts().input;
    let left = input.unique::<LeftMouse>().unwrap();
    assert!(input.has::<MouseDown>(left));
    assert_eq!(move_target(&h.game, mover), Some(Vec2::new(1.0, 1.0)));
    assert_eq!(h.game.contexts().clock.frame, 1);
}

#[test]
fn test_configured_movers_spawn_and_arrive() {
    let config = GameConfig {
        mover_speed: 4.0,
        movers: vec![MoverSpawn::new(Vec2::ZERO, "Mover")],
        ..GameConfig::default()
    };
    let mut h = harness(config);
    let mover = h.game.contexts().game.entities()[0];

    h.script.click_left(Vec2::new(1.0, 0.0));
    for _ in 0..60 {
        h.game.update(DT).unwrap();
    }

    let game = &h.game.contexts().game;
    assert_eq!(game.get::<Position>(mover).unwrap().value, Vec2::new(1.0, 0.0));
    assert!(!game.has::<Move>(mover));
    assert!(!game.has::<MoveComplete>(mover));
}

#[test]
fn test_same_seed_same_assignment() {
    let config = GameConfig {
        seed: 99,
        movers: (0u8..8)
            .map(|i| MoverSpawn::new(Vec2::new(f32::from(i), 0.0), "Mover"))
            .collect(),
        ..GameConfig::default()
    };

    let ordered = |config: GameConfig| {
        let mut h = harness(config);
        h.script.click_left(Vec2::new(0.0, 10.0));
        h.script.click_left(Vec2::new(0.0, -10.0));
        for _ in 0..4 {
            h.game.update(DT).unwrap();
        }
        let game = &h.game.contexts().game;
        game.entities()
            .into_iter()
            .filter(|&e| game.has::<Move>(e))
            .collect::<Vec<_>>()
    };

    let first = ordered(config.clone());
    assert_eq!(first.len(), 2);
    assert_eq!(first, ordered(config));
}

#[test]
fn test_second_unique_holder_rejected() {
    let mut h = harness(empty_config());
    let input = &mut h.game.contexts_mut().input;
    let holder = input.unique::<LeftMouse>().unwrap();

    let other = input.create_entity();
    let err = input.add(other, LeftMouse).unwrap_err();

    assert_eq!(
        err,
        EcsError::UniqueComponentAlreadySet {
            kind: "LeftMouse",
            holder,
        }
    );
    assert!(!input.has::<LeftMouse>(other));
}

#[test]
fn test_cleanup_twice_is_noop() {
    let mut contexts = Contexts::default();
    let config = GameConfig {
        movers: vec![MoverSpawn::new(Vec2::ZERO, "Mover")],
        ..GameConfig::default()
    };
    let mut movement = movement_systems(&mut contexts, &config);
    movement.initialize(&mut contexts).unwrap();

    let mover = contexts.game.entities()[0];
    contexts
        .game
        .add(mover, Move { target: Vec2::new(0.01, 0.0) })
        .unwrap();
    contexts.clock.advance(DT);
    movement.execute(&mut contexts).unwrap();
    assert!(contexts.game.has::<MoveComplete>(mover));

    movement.cleanup(&mut contexts).unwrap();
    let completed = contexts.game.get_group(Matcher::of(MoveComplete::KIND));
    assert!(contexts.game.group(completed).is_empty());
    let position = contexts.game.get::<Position>(mover).unwrap().value;

    movement.cleanup(&mut contexts).unwrap();
    assert!(contexts.game.group(completed).is_empty());
    assert_eq!(contexts.game.get::<Position>(mover).unwrap().value, position);
    assert_eq!(contexts.game.count(), 1);
}

#[test]
fn test_update_before_start_fails() {
    let (input, _script) = ScriptedInput::new();
    let mut game = GameController::new(
        empty_config(),
        Box::new(input),
        Box::new(RecordingViewFactory::new()),
    )
    .unwrap();

    let err = game.update(DT).unwrap_err();
    assert!(matches!(err, GameError::Ecs(EcsError::NotInitialized { .. })));
}

#[test]
fn test_restart_after_shutdown_reacts_again() {
    let mut h = harness(empty_config());
    h.game.shutdown().unwrap();
    h.game.start().unwrap();

    let mover = h.game.spawn_mover(Vec2::ZERO, "Mover").unwrap();
    h.script.press_left(Vec2::new(3.0, 4.0));
    h.game.update(DT).unwrap();

    assert_eq!(move_target(&h.game, mover), Some(Vec2::new(3.0, 4.0)));
    assert_eq!(h.views.count_for(mover), 1);
}

#[test]
fn test_restart_respawns_configured_movers() {
    let mut h = harness(GameConfig::default());
    assert_eq!(h.game.contexts().game.count(), 3);

    h.game.shutdown().unwrap();
    assert_eq!(h.game.contexts().game.count(), 0);

    h.game.start().unwrap();
    assert_eq!(h.game.contexts().game.count(), 3);
}

#[test]
fn test_second_start_is_rejected() {
    let mut h = harness(GameConfig::default());

    let err = h.game.start().unwrap_err();
    assert!(matches!(
        err,
        GameError::Ecs(EcsError::AlreadyInitialized { ref system }) if system == "Systems"
    ));
    assert_eq!(h.game.contexts().game.count(), 3);
    assert!(h.game.is_running());
}
