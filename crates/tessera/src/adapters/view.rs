//! View creation.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tessera_core::EntityId;

/// Opaque reference to a display object owned by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewHandle(u64);

impl ViewHandle {
    /// Wraps a host-side id.
    #[inline]
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Host-side id.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ViewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view:{}", self.0)
    }
}

/// Builds display objects for entities.
pub trait ViewFactory {
    /// Creates the display object for `entity` showing `sprite`.
    fn create_view(&mut self, entity: EntityId, sprite: &str) -> ViewHandle;
}

/// One call to [`RecordingViewFactory::create_view`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewRecord {
    /// Entity the view was created for
    pub entity: EntityId,
    /// Sprite name passed in
    pub sprite: String,
    /// Handle returned
    pub handle: ViewHandle,
}

/// Headless [`ViewFactory`] that only records what it was asked for.
///
/// Clones share one log, so a test can keep a clone after handing the
/// factory to a system.
#[derive(Clone, Debug, Default)]
pub struct RecordingViewFactory {
    log: Rc<RefCell<Vec<ViewRecord>>>,
}

impl RecordingViewFactory {
    /// Creates a factory with an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every view created so far.
    #[must_use]
    pub fn created(&self) -> Vec<ViewRecord> {
        self.log.borrow().clone()
    }

    /// Number of views created for `entity`.
    #[must_use]
    pub fn count_for(&self, entity: EntityId) -> usize {
        self.log
            .borrow()
            .iter()
            .filter(|record| record.entity == entity)
            .count()
    }
}

impl ViewFactory for RecordingViewFactory {
    fn create_view(&mut self, entity: EntityId, sprite: &str) -> ViewHandle {
        let mut log = self.log.borrow_mut();
        let handle = ViewHandle::new(log.len() as u64 + 1);
        log.push(ViewRecord {
            entity,
            sprite: sprite.to_owned(),
            handle,
        });
        handle
    }
}
