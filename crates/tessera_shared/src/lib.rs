//! # Tessera Shared
//!
//! Value types used by both the ECS runtime and the game crate.
//!
//! Everything here is `Copy`, `Pod` and serializable so it can sit inside
//! component payloads and configuration files alike.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod math;

pub use math::Vec2;
