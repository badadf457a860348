//! # Matchers
//!
//! A matcher is an immutable predicate over an entity's component mask:
//!
//! ```text
//! matches(e) = e ⊇ all_of  ∧  (any_of = ∅ ∨ e ∩ any_of ≠ ∅)  ∧  e ∩ none_of = ∅
//! ```
//!
//! Matchers with equal kind sets are equal, which is what lets a context
//! hand out the same live group for repeated requests.

use super::component::{ComponentKind, ComponentMask};

/// Predicate over component kinds (all-of / any-of / none-of).
///
/// # Example
///
/// ```rust,ignore
/// let idle_movers = Matcher::new()
///     .all_of(&[Mover::KIND])
///     .none_of(&[Move::KIND]);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Matcher {
    all_of: ComponentMask,
    any_of: ComponentMask,
    none_of: ComponentMask,
}

impl Matcher {
    /// Creates an empty matcher. It matches nothing until `all_of` or
    /// `any_of` is given at least one kind.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            all_of: ComponentMask::EMPTY,
            any_of: ComponentMask::EMPTY,
            none_of: ComponentMask::EMPTY,
        }
    }

    /// Shorthand for a matcher requiring a single kind.
    #[must_use]
    pub fn of(kind: ComponentKind) -> Self {
        Self::new().all_of(&[kind])
    }

    /// Requires every kind in `kinds`.
    #[must_use]
    pub fn all_of(mut self, kinds: &[ComponentKind]) -> Self {
        self.all_of = self.all_of.union(ComponentMask::from_kinds(kinds));
        self
    }

    /// Requires at least one kind in `kinds`.
    #[must_use]
    pub fn any_of(mut self, kinds: &[ComponentKind]) -> Self {
        self.any_of = self.any_of.union(ComponentMask::from_kinds(kinds));
        self
    }

    /// Rejects entities holding any kind in `kinds`.
    #[must_use]
    pub fn none_of(mut self, kinds: &[ComponentKind]) -> Self {
        self.none_of = self.none_of.union(ComponentMask::from_kinds(kinds));
        self
    }

    /// Tests a component mask against the predicate.
    ///
    /// An entity without components never matches, so a group never has to
    /// track entities that produce no component events.
    #[inline]
    #[must_use]
    pub const fn matches(&self, mask: ComponentMask) -> bool {
        if self.all_of.is_empty() && self.any_of.is_empty() {
            return false;
        }
        mask.contains_all(self.all_of)
            && (self.any_of.is_empty() || mask.intersects(self.any_of))
            && !mask.intersects(self.none_of)
    }

    /// Checks whether a change to `kind` can affect the outcome. O(1).
    #[inline]
    #[must_use]
    pub const fn is_relevant(&self, kind: ComponentKind) -> bool {
        self.kinds().contains(kind)
    }

    /// Union of every kind mentioned by the matcher.
    #[inline]
    #[must_use]
    pub const fn kinds(&self) -> ComponentMask {
        self.all_of.union(self.any_of).union(self.none_of)
    }
}
