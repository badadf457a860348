//! # Domain Systems
//!
//! | System | Phase | Reads | Writes |
//! |--------|-------|-------|--------|
//! | [`EmitInputSystem`] | initialize, execute | [`InputSource`](crate::adapters::InputSource) | button singletons |
//! | [`CommandMoveSystem`] | execute (reactive) | `MouseDown` | `Move` |
//! | [`SpawnMoversSystem`] | initialize | config | movers |
//! | [`MoveSystem`] | execute | `Move`, `Position` | `Position`, `Direction`, `MoveComplete` |
//! | [`CleanupMoveCompleteSystem`] | cleanup | `MoveComplete` | `MoveComplete` |
//! | [`AddViewSystem`] | execute (reactive) | `Sprite` | `View` |

mod input;
mod movement;
mod view;

pub use input::{command_move_system, idle_movers, CommandMove, CommandMoveSystem, EmitInputSystem};
pub use movement::{spawn_mover, CleanupMoveCompleteSystem, MoveSystem, SpawnMoversSystem};
pub use view::{add_view_system, AddView, AddViewSystem};
