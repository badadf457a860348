//! # Contexts
//!
//! The aggregate every system receives. The host owns exactly one.

use tessera_core::{Context, ContextConfig};

use crate::components::{Game, Input};

/// Frame counter and step length.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameClock {
    /// Frames started so far
    pub frame: u64,
    /// Seconds covered by the current frame
    pub delta_seconds: f32,
}

impl FrameClock {
    /// Starts the next frame.
    pub fn advance(&mut self, delta_seconds: f32) {
        self.frame += 1;
        self.delta_seconds = delta_seconds;
    }
}

/// Every context the game uses, plus the frame clock.
pub struct Contexts {
    /// Movers, positions, views
    pub game: Context<Game>,
    /// Button singletons
    pub input: Context<Input>,
    /// Current frame
    pub clock: FrameClock,
}

impl Contexts {
    /// Creates empty contexts sharing one configuration.
    #[must_use]
    pub fn new(config: &ContextConfig) -> Self {
        Self {
            game: Context::new(config.clone()),
            input: Context::new(config.clone()),
            clock: FrameClock::default(),
        }
    }
}

impl Default for Contexts {
    fn default() -> Self {
        Self::new(&ContextConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_clock_advance() {
        let mut clock = FrameClock::default();
        clock.advance(0.5);
        clock.advance(0.25);
        assert_eq!(clock.frame, 2);
        assert!((clock.delta_seconds - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn test_contexts_share_config() {
        let config = ContextConfig {
            initial_capacity: 8,
            max_event_depth: 3,
        };
        let contexts = Contexts::new(&config);
        assert_eq!(contexts.game.config(), &config);
        assert_eq!(contexts.input.config(), &config);
        assert_eq!(contexts.game.count(), 0);
    }
}
