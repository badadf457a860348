//! # Collectors
//!
//! A collector watches one or more groups and buffers every entity that
//! triggered since the last drain. The buffer is a set and holds one
//! reference per buffered entity, so a triggered entity stays resolvable
//! (possibly as destroyed) until the owner drains it.
//!
//! ```text
//! group event ──▶ trigger accepts? ──▶ buffer.insert (retain once)
//!                                            │
//!                   take_collected / clear_collected_entities (release)
//! ```
//!
//! A collector dropped while holding entities hands its references back to
//! the context, which releases them on its next mutating call.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::marker::PhantomData;
use std::rc::{Rc, Weak};

use super::component::Namespace;
use super::context::Context;
use super::entity::EntityId;
use super::group::{GroupEvent, GroupEventKind, GroupHandle, GroupObserver, ObserverId};
use crate::error::EcsResult;
use crate::memory::EntityPool;

/// Which group events a collector reacts to.
///
/// A replaced component on a member (`Updated`) counts as leaving and
/// re-entering, so every trigger accepts it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// Entities entering the group.
    OnAdded,
    /// Entities leaving the group.
    OnRemoved,
    /// Both.
    OnAddedOrRemoved,
}

impl Trigger {
    /// Checks if this trigger fires for a group event kind.
    #[inline]
    #[must_use]
    pub const fn accepts(self, kind: GroupEventKind) -> bool {
        matches!(
            (self, kind),
            (_, GroupEventKind::Updated)
                | (Self::OnAdded | Self::OnAddedOrRemoved, GroupEventKind::Added)
                | (Self::OnRemoved | Self::OnAddedOrRemoved, GroupEventKind::Removed)
        )
    }
}

/// Shared state registered on the observed groups.
struct CollectorBuffer {
    triggers: Vec<(GroupHandle, Trigger)>,
    entities: BTreeSet<EntityId>,
}

impl<N: Namespace> GroupObserver<N> for CollectorBuffer {
    fn on_group_event(&mut self, event: GroupEvent, pool: &mut EntityPool<N>) -> EcsResult<()> {
        let accepted = self
            .triggers
            .iter()
            .any(|&(group, trigger)| group == event.group && trigger.accepts(event.kind));

        if accepted && self.entities.insert(event.entity) {
            pool.retain(event.entity)?;
            tracing::trace!(entity = %event.entity, "collected");
        }
        Ok(())
    }
}

/// Buffer of entities that satisfied a trigger since the last drain.
pub struct Collector<N: Namespace> {
    buffer: Rc<RefCell<CollectorBuffer>>,
    /// Registrations while active, one per distinct group.
    registrations: Vec<(GroupHandle, ObserverId)>,
    /// Where the buffer goes on drop.
    orphans: Weak<RefCell<Vec<EntityId>>>,
    _namespace: PhantomData<fn() -> N>,
}

impl<N: Namespace> Collector<N> {
    /// Creates an active collector over `(group, trigger)` pairs.
    pub fn new(context: &mut Context<N>, triggers: &[(GroupHandle, Trigger)]) -> Self {
        let mut collector = Self {
            buffer: Rc::new(RefCell::new(CollectorBuffer {
                triggers: triggers.to_vec(),
                entities: BTreeSet::new(),
            })),
            registrations: Vec::new(),
            orphans: context.orphan_queue(),
            _namespace: PhantomData,
        };
        collector.activate(context);
        collector
    }

    /// Subscribes to the observed groups. No-op while active.
    pub fn activate(&mut self, context: &mut Context<N>) {
        if self.is_active() {
            return;
        }

        let groups: BTreeSet<GroupHandle> = self
            .buffer
            .borrow()
            .triggers
            .iter()
            .map(|&(group, _)| group)
            .collect();

        let observer: Rc<RefCell<dyn GroupObserver<N>>> = self.buffer.clone();
        for group in groups {
            let id = context.subscribe_observer(group, Rc::downgrade(&observer));
            self.registrations.push((group, id));
        }
    }

    /// Unsubscribes and releases everything buffered.
    ///
    /// # Errors
    ///
    /// Propagates release failures.
    pub fn deactivate(&mut self, context: &mut Context<N>) -> EcsResult<()> {
        for (group, id) in self.registrations.drain(..) {
            context.unsubscribe_observer(group, id);
        }
        self.clear_collected_entities(context)
    }

    /// Checks if the collector is subscribed.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.registrations.is_empty()
    }

    /// Snapshot of the buffered entities, without draining.
    #[must_use]
    pub fn collected_entities(&self) -> Vec<EntityId> {
        self.buffer.borrow().entities.iter().copied().collect()
    }

    /// Number of buffered entities.
    #[must_use]
    pub fn count(&self) -> usize {
        self.buffer.borrow().entities.len()
    }

    /// Checks if nothing is buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.borrow().entities.is_empty()
    }

    /// Swaps the buffer out. The references held for the returned entities
    /// move to the caller, who must release each one.
    #[must_use = "every taken entity must be released"]
    pub fn take_collected(&mut self) -> Vec<EntityId> {
        let taken = std::mem::take(&mut self.buffer.borrow_mut().entities);
        taken.into_iter().collect()
    }

    /// Empties the buffer and releases every held reference.
    ///
    /// # Errors
    ///
    /// Propagates release failures.
    pub fn clear_collected_entities(&mut self, context: &mut Context<N>) -> EcsResult<()> {
        for entity in self.take_collected() {
            context.release(entity)?;
        }
        Ok(())
    }
}

impl<N: Namespace> Drop for Collector<N> {
    fn drop(&mut self) {
        let Some(orphans) = self.orphans.upgrade() else {
            return;
        };
        let Ok(mut buffer) = self.buffer.try_borrow_mut() else {
            return;
        };
        if buffer.entities.is_empty() {
            return;
        }
        if let Ok(mut orphans) = orphans.try_borrow_mut() {
            orphans.extend(std::mem::take(&mut buffer.entities));
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{Component, Matcher};
    use crate::testing::{Label, Shapes, Size, Solid};

    #[test]
    fn test_trigger_accepts() {
        assert!(Trigger::OnAdded.accepts(GroupEventKind::Added));
        assert!(!Trigger::OnAdded.accepts(GroupEventKind::Removed));
        assert!(Trigger::OnRemoved.accepts(GroupEventKind::Removed));
        assert!(!Trigger::OnRemoved.accepts(GroupEventKind::Added));
        assert!(Trigger::OnAddedOrRemoved.accepts(GroupEventKind::Added));
        assert!(Trigger::OnAddedOrRemoved.accepts(GroupEventKind::Removed));
        assert!(Trigger::OnAdded.accepts(GroupEventKind::Updated));
    }

    #[test]
    fn test_collector_set_semantics_and_refcount() {
        let mut ctx: Context<Shapes> = Context::default();
        let mut collector = ctx.create_collector(Matcher::of(Size::KIND), Trigger::OnAdded);
        let e = ctx.create_entity();

        ctx.add(e, Size(1)).unwrap();
        ctx.replace(e, Size(2)).unwrap();
        ctx.replace(e, Size(3)).unwrap();

        // context + group + collector, buffered once despite three triggers
        assert_eq!(collector.collected_entities(), vec![e]);
        assert_eq!(ctx.ref_count(e).unwrap(), 3);

        collector.clear_collected_entities(&mut ctx).unwrap();
        assert!(collector.is_empty());
        assert_eq!(ctx.ref_count(e).unwrap(), 2);
    }

    #[test]
    fn test_collector_ignores_irrelevant_kinds() {
        let mut ctx: Context<Shapes> = Context::default();
        let collector = ctx.create_collector(Matcher::of(Size::KIND), Trigger::OnAdded);
        let e = ctx.create_entity();

        ctx.add(e, Label("plain".into())).unwrap();
        ctx.add(e, Solid).unwrap();
        assert!(collector.is_empty());
    }

    #[test]
    fn test_collector_on_removed_pins_destroyed_entity() {
        let mut ctx: Context<Shapes> = Context::default();
        let mut collector = ctx.create_collector(Matcher::of(Size::KIND), Trigger::OnRemoved);
        let e = ctx.create_entity();
        ctx.add(e, Size(5)).unwrap();
        assert!(collector.is_empty());

        ctx.destroy_entity(e).unwrap();
        assert_eq!(collector.collected_entities(), vec![e]);
        assert_eq!(ctx.retained_count(), 1);
        assert_eq!(ctx.ref_count(e).unwrap(), 1);

        collector.clear_collected_entities(&mut ctx).unwrap();
        assert_eq!(ctx.retained_count(), 0);
    }

    #[test]
    fn test_collector_multiple_groups() {
        let mut ctx: Context<Shapes> = Context::default();
        let sized = ctx.get_group(Matcher::of(Size::KIND));
        let labelled = ctx.get_group(Matcher::of(Label::KIND));
        let collector = Collector::new(
            &mut ctx,
            &[(sized, Trigger::OnAdded), (labelled, Trigger::OnRemoved)],
        );

        let a = ctx.create_entity();
        let b = ctx.create_entity();
        ctx.add(a, Size(1)).unwrap();
        ctx.add(b, Label("b".into())).unwrap();
        assert_eq!(collector.collected_entities(), vec![a]);

        ctx.remove::<Label>(b).unwrap();
        assert_eq!(collector.collected_entities(), vec![a, b]);
    }

    #[test]
    fn test_collector_deactivate_stops_collecting() {
        let mut ctx: Context<Shapes> = Context::default();
        let mut collector = ctx.create_collector(Matcher::of(Size::KIND), Trigger::OnAdded);
        let a = ctx.create_entity();
        ctx.add(a, Size(1)).unwrap();

        collector.deactivate(&mut ctx).unwrap();
        assert!(!collector.is_active());
        assert!(collector.is_empty());
        assert_eq!(ctx.ref_count(a).unwrap(), 2);

        let b = ctx.create_entity();
        ctx.add(b, Size(2)).unwrap();
        assert!(collector.is_empty());

        collector.activate(&mut ctx);
        ctx.replace(b, Size(3)).unwrap();
        assert_eq!(collector.collected_entities(), vec![b]);
    }

    #[test]
    fn test_dropped_collector_unsubscribes() {
        let mut ctx: Context<Shapes> = Context::default();
        let collector = ctx.create_collector(Matcher::of(Size::KIND), Trigger::OnAdded);
        drop(collector);

        let e = ctx.create_entity();
        ctx.add(e, Size(1)).unwrap();
        // context + group only
        assert_eq!(ctx.ref_count(e).unwrap(), 2);
    }

    #[test]
    fn test_dropped_collector_releases_buffer() {
        let mut ctx: Context<Shapes> = Context::default();
        let collector = ctx.create_collector(Matcher::of(Size::KIND), Trigger::OnAdded);
        let e = ctx.create_entity();
        ctx.add(e, Size(1)).unwrap();
        assert_eq!(ctx.ref_count(e).unwrap(), 3);

        drop(collector);
        assert_eq!(ctx.ref_count(e).unwrap(), 2);

        ctx.destroy_entity(e).unwrap();
        assert_eq!(ctx.retained_count(), 0);
        assert_eq!(ctx.create_entity().index(), e.index());
    }

    #[test]
    fn test_dropped_collector_unpins_destroyed_entity() {
        let mut ctx: Context<Shapes> = Context::default();
        let collector = ctx.create_collector(Matcher::of(Size::KIND), Trigger::OnRemoved);
        let e = ctx.create_entity();
        ctx.add(e, Size(1)).unwrap();
        ctx.destroy_entity(e).unwrap();
        assert_eq!(ctx.retained_count(), 1);

        drop(collector);
        assert_eq!(ctx.retained_count(), 0);

        let next = ctx.create_entity();
        assert_eq!(next.index(), e.index());
        assert_eq!(next.generation(), e.generation() + 1);
        assert_eq!(ctx.slot_count(), 1);
    }
}
