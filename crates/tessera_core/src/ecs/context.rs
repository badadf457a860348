//! # Context
//!
//! A context owns every entity of one [`Namespace`]:
//!
//! - The entity pool (identities, components, reference counts)
//! - The group cache, keyed by matcher
//! - The unique-holder table for singleton component kinds
//! - Component listeners
//!
//! ## Event delivery
//!
//! Every successful add, replace and remove is delivered synchronously
//! before the call returns: first to every group whose matcher mentions the
//! kind (and through them to collectors), then to the listeners in
//! registration order. A listener may mutate the context; the nested events
//! are delivered depth-first, bounded by [`ContextConfig::max_event_depth`].

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::collector::{Collector, Trigger};
use super::component::{Component, ComponentKind, Namespace, MAX_COMPONENT_KINDS};
use super::entity::EntityId;
use super::group::{Group, GroupHandle, GroupObserver, GroupRegistry, ObserverId};
use super::matcher::Matcher;
use crate::error::{EcsError, EcsResult};
use crate::memory::EntityPool;

/// Default number of pre-allocated entity slots.
pub const DEFAULT_INITIAL_CAPACITY: usize = 256;

/// Default bound on nested listener delivery.
pub const DEFAULT_MAX_EVENT_DEPTH: usize = 32;

/// Configuration for a context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContextConfig {
    /// Entity slots reserved up front.
    pub initial_capacity: usize,
    /// Maximum nesting of listener-triggered mutations.
    pub max_event_depth: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            max_event_depth: DEFAULT_MAX_EVENT_DEPTH,
        }
    }
}

/// Which mutation produced a component event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComponentOp {
    /// The kind was absent and is now present.
    Added,
    /// The kind was present and its value was overwritten.
    Replaced,
    /// The kind was present and is now absent.
    Removed,
}

/// A single component mutation.
#[derive(Clone, Debug, PartialEq)]
pub struct ComponentEvent<D> {
    /// The mutated entity.
    pub entity: EntityId,
    /// The mutated kind.
    pub kind: ComponentKind,
    /// The mutation.
    pub op: ComponentOp,
    /// The value before a replace or remove.
    pub previous: Option<D>,
}

/// Callback invoked for every component event of a context.
pub type ComponentListener<N> =
    dyn Fn(&mut Context<N>, &ComponentEvent<<N as Namespace>::Data>) -> EcsResult<()>;

/// Handle returned by [`Context::add_listener`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// References left behind by dropped collectors.
pub(crate) type OrphanQueue = Rc<RefCell<Vec<EntityId>>>;

/// Owner of all entities, groups and unique holders of one namespace.
pub struct Context<N: Namespace> {
    pool: EntityPool<N>,
    groups: GroupRegistry<N>,
    /// Released on the next mutating call.
    orphans: OrphanQueue,
    /// Holder per unique kind.
    uniques: Vec<Option<EntityId>>,
    listeners: Vec<(ListenerId, Rc<ComponentListener<N>>)>,
    next_listener: u64,
    /// Current listener nesting.
    event_depth: usize,
    config: ContextConfig,
}

impl<N: Namespace> Context<N> {
    /// Creates an empty context.
    ///
    /// # Panics
    ///
    /// Panics if the namespace declares more than 64 component kinds.
    #[must_use]
    pub fn new(config: ContextConfig) -> Self {
        assert!(
            N::KINDS.len() <= MAX_COMPONENT_KINDS,
            "Namespace {} declares more than {MAX_COMPONENT_KINDS} component kinds",
            N::NAME
        );

        Self {
            pool: EntityPool::with_capacity(config.initial_capacity),
            groups: GroupRegistry::new(),
            orphans: Rc::default(),
            uniques: vec![None; N::KINDS.len()],
            listeners: Vec::new(),
            next_listener: 0,
            event_depth: 0,
            config,
        }
    }

    /// The configuration this context was built with.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &ContextConfig {
        &self.config
    }

    // =========================================================================
    // Entity lifecycle
    // =========================================================================

    /// Creates an entity in the lowest free slot. The context holds one
    /// reference to it until it is destroyed.
    pub fn create_entity(&mut self) -> EntityId {
        self.reclaim_orphans();
        let entity = self.pool.allocate();
        tracing::debug!(namespace = N::NAME, entity = %entity, "entity created");
        entity
    }

    /// Destroys an entity: removes every component (emitting remove events),
    /// then drops the context's reference.
    ///
    /// Other holders keep the slot pinned; until they release it every
    /// access fails with [`EcsError::UseOfDestroyedEntity`].
    ///
    /// # Errors
    ///
    /// - [`EcsError::UnknownEntity`] if the identity was never issued
    /// - [`EcsError::UseOfDestroyedEntity`] if it is already destroyed
    pub fn destroy_entity(&mut self, entity: EntityId) -> EcsResult<()> {
        self.reclaim_orphans();
        self.pool.begin_destroy(entity)?;
        while let Some(kind) = self.pool.mask(entity)?.first() {
            self.remove_kind(entity, kind)?;
        }

        let recycled = self.pool.finish_destroy(entity)?;
        tracing::debug!(namespace = N::NAME, entity = %entity, recycled, "entity destroyed");
        Ok(())
    }

    /// Destroys every live entity.
    ///
    /// # Errors
    ///
    /// Propagates listener failures.
    pub fn destroy_all_entities(&mut self) -> EcsResult<()> {
        self.reclaim_orphans();
        for entity in self.pool.live_ids() {
            if self.pool.is_alive(entity) {
                self.destroy_entity(entity)?;
            }
        }
        Ok(())
    }

    /// Checks if `entity` is live.
    #[inline]
    #[must_use]
    pub fn is_alive(&self, entity: EntityId) -> bool {
        self.pool.is_alive(entity)
    }

    /// Number of live entities.
    #[inline]
    #[must_use]
    pub const fn count(&self) -> usize {
        self.pool.alive_count()
    }

    /// Snapshot of every live entity, in slot order.
    #[must_use]
    pub fn entities(&self) -> Vec<EntityId> {
        self.pool.live_ids()
    }

    /// Number of slots ever allocated, live or not.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.pool.slot_count()
    }

    /// Number of destroyed entities still pinned by a holder.
    #[must_use]
    pub fn retained_count(&self) -> usize {
        if self.orphans.borrow().is_empty() {
            return self.pool.retained_count();
        }
        self.pool
            .retained_ids()
            .into_iter()
            .filter(|&entity| {
                let held = self.pool.ref_count(entity).unwrap_or(0);
                held > self.pending_orphans(entity)
            })
            .count()
    }

    /// Current number of holders of `entity`.
    ///
    /// # Errors
    ///
    /// Fails if the identity is unknown or its slot was recycled.
    pub fn ref_count(&self, entity: EntityId) -> EcsResult<u32> {
        let held = self.pool.ref_count(entity)?;
        Ok(held.saturating_sub(self.pending_orphans(entity)))
    }

    /// Adds an external holder.
    ///
    /// # Errors
    ///
    /// Fails if the entity is unknown or destroyed.
    pub fn retain(&mut self, entity: EntityId) -> EcsResult<u32> {
        self.reclaim_orphans();
        self.pool.retain(entity)
    }

    /// Drops a holder. A destroyed entity is recycled when its last holder
    /// releases it.
    ///
    /// # Errors
    ///
    /// [`EcsError::ReleaseWithoutRetain`] if the release is unbalanced.
    pub fn release(&mut self, entity: EntityId) -> EcsResult<()> {
        self.reclaim_orphans();
        if self.pool.release(entity)? {
            tracing::debug!(namespace = N::NAME, entity = %entity, "entity recycled");
        }
        Ok(())
    }

    // =========================================================================
    // Typed component access
    // =========================================================================

    /// Adds a component.
    ///
    /// # Errors
    ///
    /// - [`EcsError::DuplicateComponent`] if the kind is already present
    /// - [`EcsError::UniqueComponentAlreadySet`] for a second unique holder
    /// - Entity validity errors
    /// - Listener failures, including [`EcsError::EventDepthExceeded`]. These are
    ///   returned after the change was stored and groups and collectors saw it;
    ///   the change is not rolled back.
    pub fn add<C: Component<Namespace = N>>(&mut self, entity: EntityId, component: C) -> EcsResult<()> {
        self.add_data(entity, component.into_data())
    }

    /// Adds or overwrites a component.
    ///
    /// # Errors
    ///
    /// - Entity validity errors and unique violations
    /// - Listener failures, including [`EcsError::EventDepthExceeded`]. These are
    ///   returned after the change was stored and groups and collectors saw it;
    ///   the change is not rolled back.
    pub fn replace<C: Component<Namespace = N>>(&mut self, entity: EntityId, component: C) -> EcsResult<()> {
        self.replace_data(entity, component.into_data())
    }

    /// Removes a component.
    ///
    /// # Errors
    ///
    /// - [`EcsError::MissingComponent`] if the kind is absent
    /// - Listener failures, including [`EcsError::EventDepthExceeded`]. These are
    ///   returned after the change was stored and groups and collectors saw it;
    ///   the change is not rolled back.
    pub fn remove<C: Component<Namespace = N>>(&mut self, entity: EntityId) -> EcsResult<()> {
        self.remove_kind(entity, C::KIND).map(|_| ())
    }

    /// Checks if `entity` holds `C`. False for entities that are not usable.
    #[inline]
    #[must_use]
    pub fn has<C: Component<Namespace = N>>(&self, entity: EntityId) -> bool {
        self.has_kind(entity, C::KIND)
    }

    /// Borrows a component.
    ///
    /// # Errors
    ///
    /// [`EcsError::MissingComponent`] if the kind is absent.
    pub fn get<C: Component<Namespace = N>>(&self, entity: EntityId) -> EcsResult<&C> {
        let data = self.get_data(entity, C::KIND)?;
        C::from_data(data).ok_or(EcsError::MissingComponent {
            entity,
            kind: N::kind_name(C::KIND),
        })
    }

    // =========================================================================
    // Kind-indexed component access
    // =========================================================================

    /// Adds a payload; the kind is taken from the payload itself.
    ///
    /// # Errors
    ///
    /// See [`Context::add`].
    pub fn add_data(&mut self, entity: EntityId, data: N::Data) -> EcsResult<()> {
        self.reclaim_orphans();
        let kind = N::kind_of(&data);
        self.pool.validate_live(entity)?;
        if self.pool.mask(entity)?.contains(kind) {
            return Err(EcsError::DuplicateComponent {
                entity,
                kind: N::kind_name(kind),
            });
        }

        self.claim_unique(entity, kind)?;
        self.pool.insert(entity, kind, data)?;
        self.emit(ComponentEvent {
            entity,
            kind,
            op: ComponentOp::Added,
            previous: None,
        })
    }

    /// Adds or overwrites a payload. Emits `Added` when the kind was absent.
    ///
    /// # Errors
    ///
    /// See [`Context::replace`].
    pub fn replace_data(&mut self, entity: EntityId, data: N::Data) -> EcsResult<()> {
        self.reclaim_orphans();
        let kind = N::kind_of(&data);
        self.pool.validate_live(entity)?;
        self.claim_unique(entity, kind)?;

        let previous = self.pool.insert(entity, kind, data)?;
        let op = if previous.is_some() {
            ComponentOp::Replaced
        } else {
            ComponentOp::Added
        };
        self.emit(ComponentEvent {
            entity,
            kind,
            op,
            previous,
        })
    }

    /// Removes a kind and returns its last value.
    ///
    /// # Errors
    ///
    /// See [`Context::remove`].
    pub fn remove_kind(&mut self, entity: EntityId, kind: ComponentKind) -> EcsResult<N::Data> {
        self.reclaim_orphans();
        let Some(previous) = self.pool.take(entity, kind)? else {
            return Err(EcsError::MissingComponent {
                entity,
                kind: N::kind_name(kind),
            });
        };

        if let Some(holder) = self.uniques.get_mut(kind.index()) {
            if *holder == Some(entity) {
                *holder = None;
            }
        }

        self.emit(ComponentEvent {
            entity,
            kind,
            op: ComponentOp::Removed,
            previous: Some(previous.clone()),
        })?;
        Ok(previous)
    }

    /// Checks if `entity` holds `kind`.
    #[inline]
    #[must_use]
    pub fn has_kind(&self, entity: EntityId, kind: ComponentKind) -> bool {
        self.pool.mask(entity).is_ok_and(|mask| mask.contains(kind))
    }

    /// Borrows the payload of `kind`.
    ///
    /// # Errors
    ///
    /// [`EcsError::MissingComponent`] if the kind is absent.
    pub fn get_data(&self, entity: EntityId, kind: ComponentKind) -> EcsResult<&N::Data> {
        self.pool.get(entity, kind)?.ok_or(EcsError::MissingComponent {
            entity,
            kind: N::kind_name(kind),
        })
    }

    // =========================================================================
    // Groups and collectors
    // =========================================================================

    /// Returns the live group for `matcher`. Equal matchers share one group.
    pub fn get_group(&mut self, matcher: Matcher) -> GroupHandle {
        self.reclaim_orphans();
        self.groups.get_or_create(matcher, &mut self.pool)
    }

    /// Borrows a group.
    ///
    /// # Panics
    ///
    /// Panics if the handle was issued by another context.
    #[inline]
    #[must_use]
    pub fn group(&self, handle: GroupHandle) -> &Group<N> {
        self.groups.group(handle)
    }

    /// Number of distinct groups.
    #[inline]
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Creates an active collector over the group for `matcher`.
    pub fn create_collector(&mut self, matcher: Matcher, trigger: Trigger) -> Collector<N> {
        let group = self.get_group(matcher);
        Collector::new(self, &[(group, trigger)])
    }

    pub(crate) fn subscribe_observer(
        &mut self,
        group: GroupHandle,
        observer: Weak<RefCell<dyn GroupObserver<N>>>,
    ) -> ObserverId {
        self.groups.subscribe(group, observer)
    }

    pub(crate) fn unsubscribe_observer(&mut self, group: GroupHandle, id: ObserverId) {
        self.groups.unsubscribe(group, id);
    }

    /// Queue a dropped collector hands its buffered references to.
    pub(crate) fn orphan_queue(&self) -> Weak<RefCell<Vec<EntityId>>> {
        Rc::downgrade(&self.orphans)
    }

    /// Releases the references of dropped collectors.
    fn reclaim_orphans(&mut self) {
        if self.orphans.borrow().is_empty() {
            return;
        }
        let orphans = std::mem::take(&mut *self.orphans.borrow_mut());
        for entity in orphans {
            match self.pool.release(entity) {
                Ok(true) => tracing::debug!(namespace = N::NAME, entity = %entity, "entity recycled"),
                Ok(false) => {}
                Err(err) => tracing::warn!(namespace = N::NAME, entity = %entity, %err, "orphaned reference not released"),
            }
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn pending_orphans(&self, entity: EntityId) -> u32 {
        self.orphans.borrow().iter().filter(|&&orphan| orphan == entity).count() as u32
    }

    // =========================================================================
    // Unique entities
    // =========================================================================

    /// The entity holding unique kind `kind`, if any.
    #[inline]
    #[must_use]
    pub fn get_unique(&self, kind: ComponentKind) -> Option<EntityId> {
        self.uniques.get(kind.index()).copied().flatten()
    }

    /// The entity holding unique component `C`, if any.
    #[inline]
    #[must_use]
    pub fn unique<C: Component<Namespace = N>>(&self) -> Option<EntityId> {
        self.get_unique(C::KIND)
    }

    /// The value of unique component `C`, if held.
    #[must_use]
    pub fn unique_component<C: Component<Namespace = N>>(&self) -> Option<&C> {
        self.unique::<C>().and_then(|holder| self.get::<C>(holder).ok())
    }

    /// Sets unique component `C`: replaces it on the current holder, or
    /// creates a new holder entity.
    ///
    /// # Errors
    ///
    /// Propagates listener failures.
    pub fn set_unique<C: Component<Namespace = N>>(&mut self, component: C) -> EcsResult<EntityId> {
        debug_assert!(N::is_unique(C::KIND), "{} is not a unique kind", N::kind_name(C::KIND));

        if let Some(holder) = self.unique::<C>() {
            self.replace(holder, component)?;
            return Ok(holder);
        }
        let holder = self.create_entity();
        self.add(holder, component)?;
        Ok(holder)
    }

    /// Destroys the holder of unique component `C`.
    ///
    /// # Returns
    ///
    /// `true` if a holder existed.
    ///
    /// # Errors
    ///
    /// Propagates listener failures.
    pub fn clear_unique<C: Component<Namespace = N>>(&mut self) -> EcsResult<bool> {
        match self.unique::<C>() {
            Some(holder) => self.destroy_entity(holder).map(|()| true),
            None => Ok(false),
        }
    }

    fn claim_unique(&mut self, entity: EntityId, kind: ComponentKind) -> EcsResult<()> {
        if !N::is_unique(kind) {
            return Ok(());
        }
        match self.uniques[kind.index()] {
            Some(holder) if holder != entity => Err(EcsError::UniqueComponentAlreadySet {
                kind: N::kind_name(kind),
                holder,
            }),
            _ => {
                self.uniques[kind.index()] = Some(entity);
                Ok(())
            }
        }
    }

    // =========================================================================
    // Listeners
    // =========================================================================

    /// Registers a listener for every component event of this context.
    pub fn add_listener<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&mut Context<N>, &ComponentEvent<N::Data>) -> EcsResult<()> + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        let listener: Rc<ComponentListener<N>> = Rc::new(listener);
        self.listeners.push((id, listener));
        id
    }

    /// Unregisters a listener.
    ///
    /// # Returns
    ///
    /// `true` if the listener was registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener, _)| *listener != id);
        self.listeners.len() != before
    }

    fn emit(&mut self, event: ComponentEvent<N::Data>) -> EcsResult<()> {
        tracing::trace!(
            namespace = N::NAME,
            entity = %event.entity,
            kind = N::kind_name(event.kind),
            op = ?event.op,
            "component event"
        );

        let replaced = event.op == ComponentOp::Replaced;
        self.groups
            .on_component_changed(&mut self.pool, event.entity, event.kind, replaced)?;

        if self.listeners.is_empty() {
            return Ok(());
        }
        if self.event_depth >= self.config.max_event_depth {
            return Err(EcsError::EventDepthExceeded {
                limit: self.config.max_event_depth,
            });
        }

        let listeners: Vec<Rc<ComponentListener<N>>> =
            self.listeners.iter().map(|(_, listener)| Rc::clone(listener)).collect();
        self.event_depth += 1;
        let result = listeners
            .iter()
            .try_for_each(|listener| (listener.as_ref())(self, &event));
        self.event_depth -= 1;
        result
    }
}

impl<N: Namespace> Default for Context<N> {
    fn default() -> Self {
        Self::new(ContextConfig::default())
    }
}
