//! # Tessera
//!
//! Click-to-move demo built on [`tessera_core`]:
//!
//! - A left click orders a random idle mover to the cursor
//! - Movers walk toward their target and stop on arrival
//! - Every entity with a sprite gets exactly one view from the host
//!
//! ## Architecture
//!
//! ```text
//! host ──poll──▶ InputSource ──▶ input context ──▶ CommandMove ──▶ game context
//!                                                                     │
//! host ◀──create_view── ViewFactory ◀── AddView ◀─────────────────────┘
//! ```
//!
//! The host owns one [`GameController`] and calls `start`, then `update`
//! once per frame.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod adapters;
pub mod components;
pub mod config;
pub mod contexts;
pub mod controller;
pub mod error;
pub mod features;
pub mod systems;

pub use config::{GameConfig, MoverSpawn};
pub use contexts::{Contexts, FrameClock};
pub use controller::GameController;
pub use error::{ConfigError, GameError, GameResult};
