//! # Game Error Types
//!
//! Everything the host can get back from the controller.

use std::path::PathBuf;

use tessera_core::EcsError;
use thiserror::Error;

/// Errors raised while loading or validating a [`GameConfig`](crate::GameConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML or has the wrong shape.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Errors surfaced by the game host.
#[derive(Error, Debug)]
pub enum GameError {
    /// A system violated an ECS invariant.
    #[error(transparent)]
    Ecs(#[from] EcsError),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result alias for host operations.
pub type GameResult<T> = Result<T, GameError>;
