//! # Entity Identity
//!
//! Entities are lightweight identifiers consisting of:
//! - A slot index into the context's entity pool
//! - A generation counter that changes every time the slot is recycled
//!
//! A stale identity therefore never aliases the slot's next occupant.

use std::cmp::Ordering;
use std::fmt;

/// Unique identifier for an entity within one context.
///
/// The ID is split into two parts:
/// - Lower 32 bits: Slot index
/// - Upper 32 bits: Generation counter for detecting stale references
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates a new entity ID from index and generation.
    ///
    /// # Arguments
    ///
    /// * `index` - The slot index (0 to 2^32-1)
    /// * `generation` - The generation counter (0 to 2^32-1)
    #[inline]
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self(((generation as u64) << 32) | (index as u64))
    }

    /// Returns the slot index portion of the entity ID.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn index(self) -> u32 {
        self.0 as u32
    }

    /// Returns the generation portion of the entity ID.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Null/invalid entity ID.
    pub const NULL: Self = Self(u64::MAX);

    /// Checks if this entity ID is null/invalid.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == u64::MAX
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::NULL
    }
}

// Snapshots are ordered by slot first so iteration follows pool layout.
impl Ord for EntityId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.index()
            .cmp(&other.index())
            .then(self.generation().cmp(&other.generation()))
    }
}

impl PartialOrd for EntityId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            f.write_str("#null")
        } else {
            write!(f, "#{}v{}", self.index(), self.generation())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_roundtrip() {
        let id = EntityId::new(12345, 67890);
        assert_eq!(id.index(), 12345);
        assert_eq!(id.generation(), 67890);
        assert!(!id.is_null());
        assert!(EntityId::default().is_null());
    }

    #[test]
    fn test_entity_id_orders_by_slot() {
        let low_slot_new_gen = EntityId::new(1, 9);
        let high_slot_old_gen = EntityId::new(2, 0);
        assert!(low_slot_new_gen < high_slot_old_gen);
        assert!(EntityId::new(1, 0) < EntityId::new(1, 1));
    }

    #[test]
    fn test_entity_id_display() {
        assert_eq!(EntityId::new(3, 1).to_string(), "#3v1");
        assert_eq!(EntityId::NULL.to_string(), "#null");
    }
}
