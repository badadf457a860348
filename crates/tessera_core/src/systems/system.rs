//! # System Trait
//!
//! A system opts into any subset of the four lifecycle capabilities by
//! overriding the matching method; the defaults do nothing.
//!
//! `W` is whatever the host passes to every phase, usually an aggregate of
//! contexts. Systems receive it explicitly instead of reaching for globals.

use crate::error::EcsResult;

/// A unit of behaviour driven by the host's frame loop.
pub trait System<W> {
    /// Name used in logs and errors.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Runs once, before the first frame.
    ///
    /// # Errors
    ///
    /// Propagates ECS failures.
    fn initialize(&mut self, _world: &mut W) -> EcsResult<()> {
        Ok(())
    }

    /// Runs once per frame.
    ///
    /// # Errors
    ///
    /// Propagates ECS failures.
    fn execute(&mut self, _world: &mut W) -> EcsResult<()> {
        Ok(())
    }

    /// Runs once per frame, after every `execute`.
    ///
    /// # Errors
    ///
    /// Propagates ECS failures.
    fn cleanup(&mut self, _world: &mut W) -> EcsResult<()> {
        Ok(())
    }

    /// Runs once at shutdown.
    ///
    /// # Errors
    ///
    /// Propagates ECS failures.
    fn tear_down(&mut self, _world: &mut W) -> EcsResult<()> {
        Ok(())
    }
}
