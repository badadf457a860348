//! # System Pipeline
//!
//! Lifecycle: `initialize` once, then `execute` and `cleanup` every frame,
//! then `tear_down` once.
//!
//! ## Components
//!
//! - [`System`]: Capability trait, every phase optional
//! - [`Feature`]: Ordered, named composite of systems
//! - [`ReactiveSystem`]: Collector-driven system with a drain-time filter

mod feature;
mod reactive;
mod system;

pub use feature::Feature;
pub use reactive::{ReactiveBehaviour, ReactiveState, ReactiveSystem};
pub use system::System;
