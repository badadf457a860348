//! # Features
//!
//! A feature is a named, ordered composite of systems. Registration order is
//! the only ordering mechanism: it decides which singletons exist first and
//! which same-frame mutations downstream systems can see.

use super::system::System;
use crate::error::{EcsError, EcsResult};

/// Ordered composite of systems sharing one lifecycle.
///
/// # Example
///
/// ```rust,ignore
/// let mut systems = Feature::new("Systems")
///     .add(input_systems)
///     .add(movement_systems);
///
/// systems.initialize(&mut world)?;
/// loop {
///     systems.execute(&mut world)?;
///     systems.cleanup(&mut world)?;
/// }
/// ```
pub struct Feature<W> {
    name: String,
    systems: Vec<Box<dyn System<W>>>,
    initialized: bool,
}

impl<W> Feature<W> {
    /// Creates an empty feature.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            systems: Vec::new(),
            initialized: false,
        }
    }

    /// Appends a system (fluent form).
    #[must_use]
    pub fn add<S: System<W> + 'static>(mut self, system: S) -> Self {
        self.push(system);
        self
    }

    /// Appends a system.
    pub fn push<S: System<W> + 'static>(&mut self, system: S) {
        self.systems.push(Box::new(system));
    }

    /// Number of direct children.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Checks if the feature has no children.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Checks if `initialize` has run (and `tear_down` has not).
    #[inline]
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Names of the direct children, in order.
    #[must_use]
    pub fn system_names(&self) -> Vec<&str> {
        self.systems.iter().map(|system| system.name()).collect()
    }

    fn ensure_initialized(&self) -> EcsResult<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(EcsError::NotInitialized {
                system: self.name.clone(),
            })
        }
    }
}

impl<W> System<W> for Feature<W> {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self, world: &mut W) -> EcsResult<()> {
        if self.initialized {
            return Err(EcsError::AlreadyInitialized {
                system: self.name.clone(),
            });
        }
        let _span = tracing::debug_span!("initialize", feature = %self.name).entered();
        for system in &mut self.systems {
            system.initialize(world)?;
        }
        self.initialized = true;
        tracing::debug!(feature = %self.name, systems = self.systems.len(), "feature initialized");
        Ok(())
    }

    fn execute(&mut self, world: &mut W) -> EcsResult<()> {
        self.ensure_initialized()?;
        let _span = tracing::trace_span!("execute", feature = %self.name).entered();
        for system in &mut self.systems {
            system.execute(world)?;
        }
        Ok(())
    }

    fn cleanup(&mut self, world: &mut W) -> EcsResult<()> {
        self.ensure_initialized()?;
        let _span = tracing::trace_span!("cleanup", feature = %self.name).entered();
        for system in &mut self.systems {
            system.cleanup(world)?;
        }
        Ok(())
    }

    fn tear_down(&mut self, world: &mut W) -> EcsResult<()> {
        let _span = tracing::debug_span!("tear_down", feature = %self.name).entered();
        for system in &mut self.systems {
            system.tear_down(world)?;
        }
        self.initialized = false;
        tracing::debug!(feature = %self.name, "feature torn down");
        Ok(())
    }
}
