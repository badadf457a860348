//! # Entity Component System
//!
//! A reactive ECS in which systems observe component changes.
//!
//! ## Design Philosophy
//!
//! - Component kinds are fixed per namespace at compile time
//! - Entity slots live in an arena with explicit reference counts
//! - Groups are maintained incrementally, never re-scanned per frame
//! - Change notification is synchronous and depth-first, never queued

mod collector;
mod component;
mod context;
mod entity;
mod group;
mod matcher;

pub use collector::{Collector, Trigger};
pub use component::{Component, ComponentKind, ComponentMask, KindInfo, Namespace, MAX_COMPONENT_KINDS};
pub use context::{
    ComponentEvent, ComponentListener, ComponentOp, Context, ContextConfig, ListenerId,
    DEFAULT_INITIAL_CAPACITY, DEFAULT_MAX_EVENT_DEPTH,
};
pub use entity::EntityId;
pub use group::{Group, GroupEvent, GroupEventKind, GroupHandle};
pub use matcher::Matcher;
