//! # Game Configuration
//!
//! Loaded once at startup from TOML. Every field has a default, so an empty
//! file (or no file) is a valid configuration.
//!
//! ```toml
//! seed = 7
//! mover_speed = 4.0
//! arrival_distance = 0.05
//! max_event_depth = 32
//!
//! [[movers]]
//! x = -2.0
//! y = 0.0
//! sprite = "Mover"
//! ```

use std::path::Path;

use serde::Deserialize;
use tessera_core::{ContextConfig, DEFAULT_INITIAL_CAPACITY, DEFAULT_MAX_EVENT_DEPTH};
use tessera_shared::Vec2;

use crate::error::ConfigError;

/// Default RNG seed for mover selection.
pub const DEFAULT_SEED: u64 = 0x5EED;

/// Default mover speed in world units per second.
pub const DEFAULT_MOVER_SPEED: f32 = 4.0;

/// Default arrival threshold in world units.
pub const DEFAULT_ARRIVAL_DISTANCE: f32 = 0.05;

/// Sprite used when a spawn entry names none.
pub const DEFAULT_MOVER_SPRITE: &str = "Mover";

/// One mover created at startup.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct MoverSpawn {
    /// Start X
    pub x: f32,
    /// Start Y
    pub y: f32,
    /// Sprite name handed to the view factory
    #[serde(default = "default_sprite")]
    pub sprite: String,
}

impl MoverSpawn {
    /// Creates a spawn entry.
    #[must_use]
    pub fn new(position: Vec2, sprite: impl Into<String>) -> Self {
        Self {
            x: position.x,
            y: position.y,
            sprite: sprite.into(),
        }
    }

    /// Start position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

fn default_sprite() -> String {
    DEFAULT_MOVER_SPRITE.to_owned()
}

/// Top-level game configuration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed for the mover-selection RNG.
    pub seed: u64,
    /// Mover speed in world units per second.
    pub mover_speed: f32,
    /// A mover closer than this to its target snaps onto it.
    pub arrival_distance: f32,
    /// Listener nesting limit for both contexts.
    pub max_event_depth: usize,
    /// Movers spawned on initialize.
    pub movers: Vec<MoverSpawn>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            mover_speed: DEFAULT_MOVER_SPEED,
            arrival_distance: DEFAULT_ARRIVAL_DISTANCE,
            max_event_depth: DEFAULT_MAX_EVENT_DEPTH,
            movers: vec![
                MoverSpawn::new(Vec2::new(-2.0, 0.0), DEFAULT_MOVER_SPRITE),
                MoverSpawn::new(Vec2::new(0.0, 0.0), DEFAULT_MOVER_SPRITE),
                MoverSpawn::new(Vec2::new(2.0, 0.0), DEFAULT_MOVER_SPRITE),
            ],
        }
    }
}

impl GameConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] or [`ConfigError::Invalid`].
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`GameConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Rejects values the movement systems cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.mover_speed.is_finite() || self.mover_speed <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "mover_speed must be positive, got {}",
                self.mover_speed
            )));
        }
        if !self.arrival_distance.is_finite() || self.arrival_distance < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "arrival_distance must not be negative, got {}",
                self.arrival_distance
            )));
        }
        if self.max_event_depth == 0 {
            return Err(ConfigError::Invalid("max_event_depth must be at least 1".into()));
        }
        Ok(())
    }

    /// Context settings derived from this config.
    #[must_use]
    pub fn context_config(&self) -> ContextConfig {
        ContextConfig {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            max_event_depth: self.max_event_depth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_empty_document_is_default() {
        let config = GameConfig::from_toml_str("").unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_config_parses_movers() {
        let config = GameConfig::from_toml_str(
            r#"
            seed = 7
            mover_speed = 2.5

            [[movers]]
            x = 1.0
            y = -1.0

            [[movers]]
            x = 3.0
            y = 4.0
            sprite = "Scout"
            "#,
        )
        .unwrap();

        assert_eq!(config.seed, 7);
        assert!((config.mover_speed - 2.5).abs() < f32::EPSILON);
        assert_eq!(config.arrival_distance, DEFAULT_ARRIVAL_DISTANCE);
        assert_eq!(config.movers.len(), 2);
        assert_eq!(config.movers[0].sprite, DEFAULT_MOVER_SPRITE);
        assert_eq!(config.movers[1].position(), Vec2::new(3.0, 4.0));
        assert_eq!(config.movers[1].sprite, "Scout");
    }

    #[test]
    fn test_config_rejects_bad_values() {
        assert!(matches!(
            GameConfig::from_toml_str("mover_speed = 0.0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            GameConfig::from_toml_str("arrival_distance = -1.0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            GameConfig::from_toml_str("max_event_depth = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            GameConfig::from_toml_str("seed = \"seven\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_config_load_missing_file() {
        let err = GameConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
