//! # Tessera Core
//!
//! Reactive Entity Component System runtime:
//! - Entities live in an arena of reference-counted slots
//! - Groups track matcher results incrementally
//! - Collectors buffer group changes for reactive systems
//! - Features compose systems into a deterministic frame pipeline
//!
//! ## Architecture Rules
//!
//! 1. **Single-threaded** - All mutation happens on the frame thread, no locks
//! 2. **Synchronous notification** - When a mutation returns, every group and
//!    collector already reflects it
//! 3. **Fail fast** - Invariant violations are returned as [`EcsError`] at the
//!    offending call
//! 4. **No globals** - Contexts are constructed by the host and passed to systems
//!
//! ## Example
//!
//! ```rust,ignore
//! use tessera_core::{Context, Matcher, Trigger};
//!
//! let mut game: Context<Game> = Context::default();
//! let idle = game.get_group(Matcher::new().all_of(&[Mover::KIND]).none_of(&[Move::KIND]));
//!
//! let e = game.create_entity();
//! game.add(e, Mover)?;
//! assert!(game.group(idle).contains(e));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod ecs;
pub mod error;
pub(crate) mod memory;
pub mod systems;

#[cfg(test)]
mod testing;

pub use ecs::{
    Collector, Component, ComponentEvent, ComponentKind, ComponentListener, ComponentMask,
    ComponentOp, Context, ContextConfig, EntityId, Group, GroupEvent, GroupEventKind, GroupHandle,
    KindInfo, ListenerId, Matcher, Namespace, Trigger, DEFAULT_INITIAL_CAPACITY,
    DEFAULT_MAX_EVENT_DEPTH, MAX_COMPONENT_KINDS,
};
pub use error::{EcsError, EcsResult};
pub use systems::{Feature, ReactiveBehaviour, ReactiveState, ReactiveSystem, System};
