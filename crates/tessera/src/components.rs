//! # Component Namespaces
//!
//! Two namespaces, each compiled in:
//!
//! | Namespace | Kinds |
//! |-----------|-------|
//! | [`Game`]  | `Position`, `Move`, `Mover`, `MoveComplete`, `Direction`, `Sprite`, `View` |
//! | [`Input`] | `LeftMouse`*, `RightMouse`*, `MouseDown`, `MousePosition`, `MouseUp` |
//!
//! `*` unique: at most one entity holds it.

use tessera_core::{Component, ComponentKind, KindInfo, Namespace};
use tessera_shared::Vec2;

use crate::adapters::ViewHandle;

/// Binds a record type to its namespace payload variant.
macro_rules! component {
    ($ns:ty, $data:ident, $ty:ident, $kind:expr) => {
        impl Component for $ty {
            type Namespace = $ns;
            const KIND: ComponentKind = $kind;

            #[inline]
            fn into_data(self) -> $data {
                $data::$ty(self)
            }

            #[inline]
            fn from_data(data: &$data) -> Option<&Self> {
                match data {
                    $data::$ty(value) => Some(value),
                    _ => None,
                }
            }
        }
    };
}

// =============================================================================
// GAME
// =============================================================================

/// Kind indices of the game namespace.
pub mod game_kinds {
    use tessera_core::ComponentKind;

    /// [`Position`](super::Position)
    pub const POSITION: ComponentKind = ComponentKind::new(0);
    /// [`Move`](super::Move)
    pub const MOVE: ComponentKind = ComponentKind::new(1);
    /// [`Mover`](super::Mover)
    pub const MOVER: ComponentKind = ComponentKind::new(2);
    /// [`MoveComplete`](super::MoveComplete)
    pub const MOVE_COMPLETE: ComponentKind = ComponentKind::new(3);
    /// [`Direction`](super::Direction)
    pub const DIRECTION: ComponentKind = ComponentKind::new(4);
    /// [`Sprite`](super::Sprite)
    pub const SPRITE: ComponentKind = ComponentKind::new(5);
    /// [`View`](super::View)
    pub const VIEW: ComponentKind = ComponentKind::new(6);
}

/// The game namespace: movers and their visuals.
#[derive(Clone, Copy, Debug)]
pub struct Game;

/// Payload of any game component.
#[derive(Clone, Debug, PartialEq)]
pub enum GameData {
    /// World position
    Position(Position),
    /// Pending move order
    Move(Move),
    /// Can receive move orders
    Mover(Mover),
    /// Arrived this frame
    MoveComplete(MoveComplete),
    /// Facing
    Direction(Direction),
    /// Visual asset name
    Sprite(Sprite),
    /// Handle of the created display object
    View(View),
}

/// World-space position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    /// Position in world units
    pub value: Vec2,
}

/// Move order. Removed on arrival.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Move {
    /// Where to go
    pub target: Vec2,
}

/// Marks an entity that accepts move orders.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mover;

/// Set on the frame a mover arrives; cleared in cleanup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveComplete;

/// Facing in degrees, counter-clockwise from +X.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Direction {
    /// Angle in degrees
    pub degrees: f32,
}

/// Requests a visual representation.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    /// Asset name
    pub name: String,
}

/// Display object created for this entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct View {
    /// Opaque handle from the view factory
    pub handle: ViewHandle,
}

impl Namespace for Game {
    type Data = GameData;
    const NAME: &'static str = "game";
    const KINDS: &'static [KindInfo] = &[
        KindInfo::new("Position"),
        KindInfo::new("Move"),
        KindInfo::new("Mover"),
        KindInfo::new("MoveComplete"),
        KindInfo::new("Direction"),
        KindInfo::new("Sprite"),
        KindInfo::new("View"),
    ];

    fn kind_of(data: &GameData) -> ComponentKind {
        match data {
            GameData::Position(_) => game_kinds::POSITION,
            GameData::Move(_) => game_kinds::MOVE,
            GameData::Mover(_) => game_kinds::MOVER,
            GameData::MoveComplete(_) => game_kinds::MOVE_COMPLETE,
            GameData::Direction(_) => game_kinds::DIRECTION,
            GameData::Sprite(_) => game_kinds::SPRITE,
            GameData::View(_) => game_kinds::VIEW,
        }
    }
}

component!(Game, GameData, Position, game_kinds::POSITION);
component!(Game, GameData, Move, game_kinds::MOVE);
component!(Game, GameData, Mover, game_kinds::MOVER);
component!(Game, GameData, MoveComplete, game_kinds::MOVE_COMPLETE);
component!(Game, GameData, Direction, game_kinds::DIRECTION);
component!(Game, GameData, Sprite, game_kinds::SPRITE);
component!(Game, GameData, View, game_kinds::VIEW);

// =============================================================================
// INPUT
// =============================================================================

/// Kind indices of the input namespace.
pub mod input_kinds {
    use tessera_core::ComponentKind;

    /// [`LeftMouse`](super::LeftMouse)
    pub const LEFT_MOUSE: ComponentKind = ComponentKind::new(0);
    /// [`RightMouse`](super::RightMouse)
    pub const RIGHT_MOUSE: ComponentKind = ComponentKind::new(1);
    /// [`MouseDown`](super::MouseDown)
    pub const MOUSE_DOWN: ComponentKind = ComponentKind::new(2);
    /// [`MousePosition`](super::MousePosition)
    pub const MOUSE_POSITION: ComponentKind = ComponentKind::new(3);
    /// [`MouseUp`](super::MouseUp)
    pub const MOUSE_UP: ComponentKind = ComponentKind::new(4);
}

/// The input namespace: one singleton entity per tracked button.
#[derive(Clone, Copy, Debug)]
pub struct Input;

/// Payload of any input component.
#[derive(Clone, Debug, PartialEq)]
pub enum InputData {
    /// Left button singleton marker
    LeftMouse(LeftMouse),
    /// Right button singleton marker
    RightMouse(RightMouse),
    /// Press edge
    MouseDown(MouseDown),
    /// Cursor while held
    MousePosition(MousePosition),
    /// Release edge
    MouseUp(MouseUp),
}

/// Marks the left-button entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LeftMouse;

/// Marks the right-button entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RightMouse;

/// Cursor position of the last press.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MouseDown {
    /// World-space cursor
    pub position: Vec2,
}

/// Cursor position while the button is held.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MousePosition {
    /// World-space cursor
    pub position: Vec2,
}

/// Cursor position of the last release.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MouseUp {
    /// World-space cursor
    pub position: Vec2,
}

impl Namespace for Input {
    type Data = InputData;
    const NAME: &'static str = "input";
    const KINDS: &'static [KindInfo] = &[
        KindInfo::unique("LeftMouse"),
        KindInfo::unique("RightMouse"),
        KindInfo::new("MouseDown"),
        KindInfo::new("MousePosition"),
        KindInfo::new("MouseUp"),
    ];

    fn kind_of(data: &InputData) -> ComponentKind {
        match data {
            InputData::LeftMouse(_) => input_kinds::LEFT_MOUSE,
            InputData::RightMouse(_) => input_kinds::RIGHT_MOUSE,
            InputData::MouseDown(_) => input_kinds::MOUSE_DOWN,
            InputData::MousePosition(_) => input_kinds::MOUSE_POSITION,
            InputData::MouseUp(_) => input_kinds::MOUSE_UP,
        }
    }
}

component!(Input, InputData, LeftMouse, input_kinds::LEFT_MOUSE);
component!(Input, InputData, RightMouse, input_kinds::RIGHT_MOUSE);
component!(Input, InputData, MouseDown, input_kinds::MOUSE_DOWN);
component!(Input, InputData, MousePosition, input_kinds::MOUSE_POSITION);
component!(Input, InputData, MouseUp, input_kinds::MOUSE_UP);
