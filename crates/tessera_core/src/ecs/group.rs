//! # Groups
//!
//! A group is the live set of entities matching one [`Matcher`]. It is
//! seeded once by a scan and then maintained incrementally: every component
//! event is routed only to the groups whose matcher mentions the changed
//! kind, and only the touched entity is re-tested.
//!
//! Membership changes are pushed synchronously to the group's observers
//! (collectors) before the mutating call returns.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::rc::Weak;

use super::component::{ComponentKind, Namespace, MAX_COMPONENT_KINDS};
use super::entity::EntityId;
use super::matcher::Matcher;
use crate::error::{EcsError, EcsResult};
use crate::memory::EntityPool;

/// Handle to a group owned by a context.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupHandle(u32);

impl GroupHandle {
    /// Index of the group within its context.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// What happened to a group's membership.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GroupEventKind {
    /// The entity started matching.
    Added,
    /// The entity stopped matching.
    Removed,
    /// A member had a relevant component replaced and still matches.
    Updated,
}

/// Group-level notification delivered to observers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GroupEvent {
    /// The group that changed.
    pub group: GroupHandle,
    /// The entity concerned.
    pub entity: EntityId,
    /// The kind of change.
    pub kind: GroupEventKind,
}

/// Receiver of group events. Observers may adjust reference counts but must
/// not mutate components.
pub(crate) trait GroupObserver<N: Namespace> {
    /// Called once per membership change, in emission order.
    fn on_group_event(&mut self, event: GroupEvent, pool: &mut EntityPool<N>) -> EcsResult<()>;
}

/// Identifier of an observer registration.
pub(crate) type ObserverId = u64;

type ObserverRef<N> = Weak<RefCell<dyn GroupObserver<N>>>;

/// Live, incrementally maintained set of entities for one matcher.
///
/// Every member is retained by the group for as long as it matches.
pub struct Group<N: Namespace> {
    handle: GroupHandle,
    matcher: Matcher,
    members: BTreeSet<EntityId>,
    observers: Vec<(ObserverId, ObserverRef<N>)>,
}

impl<N: Namespace> Group<N> {
    fn new(handle: GroupHandle, matcher: Matcher) -> Self {
        Self {
            handle,
            matcher,
            members: BTreeSet::new(),
            observers: Vec::new(),
        }
    }

    /// The group's handle.
    #[inline]
    #[must_use]
    pub const fn handle(&self) -> GroupHandle {
        self.handle
    }

    /// The matcher this group was built from.
    #[inline]
    #[must_use]
    pub const fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Number of members.
    #[inline]
    #[must_use]
    pub fn count(&self) -> usize {
        self.members.len()
    }

    /// Checks if the group has no members.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Checks if `entity` is a member.
    #[inline]
    #[must_use]
    pub fn contains(&self, entity: EntityId) -> bool {
        self.members.contains(&entity)
    }

    /// Ordered snapshot of the members.
    ///
    /// The returned vector is a copy; mutating the context while walking it
    /// is safe.
    #[must_use]
    pub fn entities(&self) -> Vec<EntityId> {
        self.members.iter().copied().collect()
    }

    /// Iterates members in order without copying.
    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.members.iter().copied()
    }

    /// The only member, if any.
    ///
    /// # Errors
    ///
    /// [`EcsError::GroupNotSingle`] if the group has more than one member.
    pub fn single_entity(&self) -> EcsResult<Option<EntityId>> {
        match self.members.len() {
            0 => Ok(None),
            1 => Ok(self.members.first().copied()),
            count => Err(EcsError::GroupNotSingle { count }),
        }
    }

    /// Re-tests one entity after a change to a relevant kind.
    fn handle_entity(
        &mut self,
        pool: &mut EntityPool<N>,
        entity: EntityId,
        replaced: bool,
    ) -> EcsResult<()> {
        let matches = self.matcher.matches(pool.mask(entity)?);
        let member = self.members.contains(&entity);

        let kind = match (matches, member) {
            (true, false) => {
                self.members.insert(entity);
                pool.retain(entity)?;
                GroupEventKind::Added
            }
            (false, true) => GroupEventKind::Removed,
            (true, true) if replaced => GroupEventKind::Updated,
            _ => return Ok(()),
        };

        tracing::trace!(group = self.handle.0, entity = %entity, ?kind, "group membership");
        self.notify(pool, GroupEvent {
            group: self.handle,
            entity,
            kind,
        })?;

        // Observers get to retain a leaving entity before the group lets go.
        if kind == GroupEventKind::Removed {
            self.members.remove(&entity);
            pool.release(entity)?;
        }
        Ok(())
    }

    fn notify(&mut self, pool: &mut EntityPool<N>, event: GroupEvent) -> EcsResult<()> {
        self.observers.retain(|(_, observer)| observer.strong_count() > 0);
        for (_, observer) in &self.observers {
            if let Some(observer) = observer.upgrade() {
                observer.borrow_mut().on_group_event(event, pool)?;
            }
        }
        Ok(())
    }
}

/// All groups of one context, indexed by matcher and by relevant kind.
pub(crate) struct GroupRegistry<N: Namespace> {
    groups: Vec<Group<N>>,
    by_matcher: HashMap<Matcher, GroupHandle>,
    /// Groups to notify per component kind.
    by_kind: Vec<Vec<GroupHandle>>,
    next_observer: ObserverId,
}

impl<N: Namespace> GroupRegistry<N> {
    pub(crate) fn new() -> Self {
        Self {
            groups: Vec::new(),
            by_matcher: HashMap::new(),
            by_kind: vec![Vec::new(); MAX_COMPONENT_KINDS],
            next_observer: 0,
        }
    }

    /// Returns the group for `matcher`, creating and seeding it on first use.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn get_or_create(&mut self, matcher: Matcher, pool: &mut EntityPool<N>) -> GroupHandle {
        if let Some(&handle) = self.by_matcher.get(&matcher) {
            return handle;
        }

        let handle = GroupHandle(self.groups.len() as u32);
        let mut group = Group::new(handle, matcher);
        for entity in pool.live_ids() {
            let matches = pool.mask(entity).is_ok_and(|mask| matcher.matches(mask));
            if matches && pool.retain(entity).is_ok() {
                group.members.insert(entity);
            }
        }

        for kind in matcher.kinds().iter() {
            self.by_kind[kind.index()].push(handle);
        }
        tracing::debug!(
            namespace = N::NAME,
            group = handle.0,
            members = group.count(),
            "group created"
        );

        self.groups.push(group);
        self.by_matcher.insert(matcher, handle);
        handle
    }

    /// Borrows a group.
    ///
    /// # Panics
    ///
    /// Panics if the handle belongs to another context.
    pub(crate) fn group(&self, handle: GroupHandle) -> &Group<N> {
        &self.groups[handle.index()]
    }

    /// Routes a component change to the groups that care about `kind`.
    pub(crate) fn on_component_changed(
        &mut self,
        pool: &mut EntityPool<N>,
        entity: EntityId,
        kind: ComponentKind,
        replaced: bool,
    ) -> EcsResult<()> {
        let Self { groups, by_kind, .. } = self;
        for handle in &by_kind[kind.index()] {
            groups[handle.index()].handle_entity(pool, entity, replaced)?;
        }
        Ok(())
    }

    /// Registers an observer on a group.
    pub(crate) fn subscribe(&mut self, handle: GroupHandle, observer: ObserverRef<N>) -> ObserverId {
        let id = self.next_observer;
        self.next_observer += 1;
        self.groups[handle.index()].observers.push((id, observer));
        id
    }

    /// Removes an observer registration. Unknown ids are ignored.
    pub(crate) fn unsubscribe(&mut self, handle: GroupHandle, id: ObserverId) {
        if let Some(group) = self.groups.get_mut(handle.index()) {
            group.observers.retain(|(observer, _)| *observer != id);
        }
    }

    /// Number of groups.
    pub(crate) fn len(&self) -> usize {
        self.groups.len()
    }
}
