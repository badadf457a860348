//! # Component Registry
//!
//! Components are plain data records. Each one belongs to exactly one
//! [`Namespace`], which fixes the set of kinds at compile time:
//!
//! - A [`ComponentKind`] is a small index into the namespace's kind table
//! - A [`ComponentMask`] is the set of kinds an entity currently holds
//! - The namespace's `Data` enum is the type-erased payload stored per slot
//!
//! Typed access goes through the [`Component`] trait, so use sites never
//! deal with kind indices or payload enums directly.
//!
//! # Example
//!
//! ```rust,ignore
//! #[derive(Clone, Debug, PartialEq)]
//! pub struct Health { pub value: u32 }
//!
//! impl Component for Health {
//!     type Namespace = Game;
//!     const KIND: ComponentKind = ComponentKind::new(0);
//!     fn into_data(self) -> GameComponent { GameComponent::Health(self) }
//!     fn from_data(data: &GameComponent) -> Option<&Self> { ... }
//! }
//! ```

use std::fmt;

/// Maximum number of component kinds per namespace (one mask bit each).
pub const MAX_COMPONENT_KINDS: usize = 64;

/// Identifier of a component kind within its namespace (0-63).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentKind(u8);

impl ComponentKind {
    /// Creates a kind identifier.
    ///
    /// # Panics
    ///
    /// Panics (at compile time when used in a `const`) if `index` is 64 or more.
    #[inline]
    #[must_use]
    pub const fn new(index: u8) -> Self {
        assert!((index as usize) < MAX_COMPONENT_KINDS, "component kind index out of range");
        Self(index)
    }

    /// Index into the namespace's kind table.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The mask bit for this kind.
    #[inline]
    #[must_use]
    pub const fn bit(self) -> u64 {
        1 << self.0
    }
}

/// Set of component kinds, one bit per kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ComponentMask(u64);

impl ComponentMask {
    /// The empty set.
    pub const EMPTY: Self = Self(0);

    /// Builds a mask from a list of kinds.
    #[must_use]
    pub fn from_kinds(kinds: &[ComponentKind]) -> Self {
        Self(kinds.iter().fold(0, |mask, kind| mask | kind.bit()))
    }

    /// Checks if `kind` is in the set.
    #[inline]
    #[must_use]
    pub const fn contains(self, kind: ComponentKind) -> bool {
        self.0 & kind.bit() != 0
    }

    /// Checks if every kind of `other` is in the set.
    #[inline]
    #[must_use]
    pub const fn contains_all(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Checks if the two sets share at least one kind.
    #[inline]
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Checks if the set is empty.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of kinds in the set.
    #[inline]
    #[must_use]
    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// Adds a kind.
    #[inline]
    pub fn insert(&mut self, kind: ComponentKind) {
        self.0 |= kind.bit();
    }

    /// Removes a kind.
    #[inline]
    pub fn remove(&mut self, kind: ComponentKind) {
        self.0 &= !kind.bit();
    }

    /// Union of two sets.
    #[inline]
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Lowest kind in the set, if any.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn first(self) -> Option<ComponentKind> {
        if self.0 == 0 {
            None
        } else {
            Some(ComponentKind(self.0.trailing_zeros() as u8))
        }
    }

    /// Iterates the kinds in ascending order.
    pub fn iter(self) -> impl Iterator<Item = ComponentKind> {
        let mut remaining = self;
        std::iter::from_fn(move || {
            let kind = remaining.first()?;
            remaining.remove(kind);
            Some(kind)
        })
    }
}

/// Static description of one component kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KindInfo {
    /// Human readable name, used in errors and logs.
    pub name: &'static str,
    /// Whether at most one entity in the context may hold this kind.
    pub unique: bool,
}

impl KindInfo {
    /// Describes an ordinary component kind.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            unique: false,
        }
    }

    /// Describes a unique (singleton) component kind.
    #[must_use]
    pub const fn unique(name: &'static str) -> Self {
        Self { name, unique: true }
    }
}

/// A component namespace: the fixed schema of one context.
///
/// `KINDS[k.index()]` describes kind `k`; `kind_of` must agree with it for
/// every payload variant.
pub trait Namespace: Sized + 'static {
    /// Type-erased component payload, usually an enum with one variant per kind.
    type Data: Clone + fmt::Debug;

    /// Namespace name, used in logs.
    const NAME: &'static str;

    /// Kind table, indexed by [`ComponentKind::index`].
    const KINDS: &'static [KindInfo];

    /// Returns the kind of a payload.
    fn kind_of(data: &Self::Data) -> ComponentKind;

    /// Returns the name of a kind, or `"?"` for an index outside the table.
    #[must_use]
    fn kind_name(kind: ComponentKind) -> &'static str {
        Self::KINDS.get(kind.index()).map_or("?", |info| info.name)
    }

    /// Checks if a kind is marked unique.
    #[must_use]
    fn is_unique(kind: ComponentKind) -> bool {
        Self::KINDS.get(kind.index()).is_some_and(|info| info.unique)
    }
}

/// A concrete component record bound to its namespace and kind.
pub trait Component: Clone + Sized + 'static {
    /// The namespace this component belongs to.
    type Namespace: Namespace;

    /// The kind identifier of this component.
    const KIND: ComponentKind;

    /// Wraps the record into the namespace payload.
    fn into_data(self) -> <Self::Namespace as Namespace>::Data;

    /// Borrows the record out of a payload of the same kind.
    fn from_data(data: &<Self::Namespace as Namespace>::Data) -> Option<&Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: ComponentKind = ComponentKind::new(0);
    const B: ComponentKind = ComponentKind::new(5);
    const C: ComponentKind = ComponentKind::new(63);

    #[test]
    fn test_component_mask_insert_remove() {
        let mut mask = ComponentMask::EMPTY;
        assert!(!mask.contains(B));

        mask.insert(B);
        assert!(mask.contains(B));
        assert_eq!(mask.len(), 1);

        mask.remove(B);
        assert!(mask.is_empty());
    }

    #[test]
    fn test_component_mask_set_ops() {
        let ab = ComponentMask::from_kinds(&[A, B]);
        let bc = ComponentMask::from_kinds(&[B, C]);

        assert!(ab.intersects(bc));
        assert!(!ab.contains_all(bc));
        assert!(ab.union(bc).contains_all(bc));
        assert_eq!(ab.first(), Some(A));
        assert_eq!(ab.union(bc).iter().collect::<Vec<_>>(), vec![A, B, C]);
    }
}
