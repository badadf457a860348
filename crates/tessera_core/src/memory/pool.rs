//! # Entity Pool
//!
//! Arena of entity slots indexed by identity.
//!
//! ```text
//!            allocate                 destroy              last release
//!   Free ─────────────▶ Live ─────▶ Destroying ─────▶ Destroyed ─────────▶ Free
//!    ▲                                                                  (generation + 1)
//!    └──────────────── lowest index first ◀──────────────────────────────┘
//! ```
//!
//! Every holder of an entity (the context itself, each group it belongs to,
//! each collector buffering it, external code) owns one reference. The slot
//! is recycled only when the count reaches zero after destruction.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::ecs::{ComponentKind, ComponentMask, EntityId, Namespace};
use crate::error::{EcsError, EcsResult};

/// Lifecycle of one slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SlotState {
    /// Unoccupied, waiting on the free list.
    Free,
    /// Normal entity.
    Live,
    /// Components are being torn down; removals allowed, additions rejected.
    Destroying,
    /// Destroyed but still retained by at least one holder.
    Destroyed,
}

/// One entity slot.
struct EntitySlot<N: Namespace> {
    /// Bumped on every recycle.
    generation: u32,
    state: SlotState,
    /// Kinds currently held.
    mask: ComponentMask,
    /// Payload per kind, indexed by `ComponentKind::index`.
    components: Box<[Option<N::Data>]>,
    /// Number of holders.
    ref_count: u32,
}

impl<N: Namespace> EntitySlot<N> {
    fn vacant() -> Self {
        Self {
            generation: 0,
            state: SlotState::Free,
            mask: ComponentMask::EMPTY,
            components: (0..N::KINDS.len()).map(|_| None).collect(),
            ref_count: 0,
        }
    }
}

/// Slot arena for one context.
pub(crate) struct EntityPool<N: Namespace> {
    slots: Vec<EntitySlot<N>>,
    /// Free slot indices, smallest first.
    free_indices: BinaryHeap<Reverse<u32>>,
    /// Entities in the `Live` state.
    alive_count: usize,
}

impl<N: Namespace> EntityPool<N> {
    /// Creates an empty pool with room for `capacity` slots.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_indices: BinaryHeap::with_capacity(capacity),
            alive_count: 0,
        }
    }

    /// Allocates the lowest free slot. The new entity holds one reference
    /// (the context's) and no components.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` slots are in use at once.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn allocate(&mut self) -> EntityId {
        let index = if let Some(Reverse(index)) = self.free_indices.pop() {
            index
        } else {
            assert!(
                self.slots.len() < u32::MAX as usize,
                "Entity slot space exhausted"
            );
            self.slots.push(EntitySlot::vacant());
            (self.slots.len() - 1) as u32
        };

        let slot = &mut self.slots[index as usize];
        slot.state = SlotState::Live;
        slot.ref_count = 1;
        self.alive_count += 1;

        EntityId::new(index, slot.generation)
    }

    /// Validates `id` against its slot, ignoring the slot state.
    fn checked_index(&self, id: EntityId) -> EcsResult<usize> {
        let index = id.index() as usize;
        let Some(slot) = self.slots.get(index) else {
            return Err(EcsError::UnknownEntity { entity: id });
        };

        match id.generation().cmp(&slot.generation) {
            Ordering::Greater => Err(EcsError::UnknownEntity { entity: id }),
            Ordering::Less => Err(EcsError::UseOfDestroyedEntity { entity: id }),
            Ordering::Equal if slot.state == SlotState::Free => {
                Err(EcsError::UnknownEntity { entity: id })
            }
            Ordering::Equal => Ok(index),
        }
    }

    /// Index of a slot that is still usable (live or being destroyed).
    fn usable_index(&self, id: EntityId) -> EcsResult<usize> {
        let index = self.checked_index(id)?;
        if self.slots[index].state == SlotState::Destroyed {
            return Err(EcsError::UseOfDestroyedEntity { entity: id });
        }
        Ok(index)
    }

    /// Index of a slot that accepts new components.
    fn live_index(&self, id: EntityId) -> EcsResult<usize> {
        let index = self.checked_index(id)?;
        if self.slots[index].state == SlotState::Live {
            Ok(index)
        } else {
            Err(EcsError::UseOfDestroyedEntity { entity: id })
        }
    }

    /// Fails unless `id` is live.
    pub(crate) fn validate_live(&self, id: EntityId) -> EcsResult<()> {
        self.live_index(id).map(|_| ())
    }

    /// Checks if `id` is live (created and not destroyed).
    pub(crate) fn is_alive(&self, id: EntityId) -> bool {
        self.live_index(id).is_ok()
    }

    /// Component mask of a usable entity.
    pub(crate) fn mask(&self, id: EntityId) -> EcsResult<ComponentMask> {
        let index = self.usable_index(id)?;
        Ok(self.slots[index].mask)
    }

    /// Borrows the payload of `kind`, if present.
    pub(crate) fn get(&self, id: EntityId, kind: ComponentKind) -> EcsResult<Option<&N::Data>> {
        let index = self.usable_index(id)?;
        Ok(self.slots[index]
            .components
            .get(kind.index())
            .and_then(Option::as_ref))
    }

    /// Stores a payload on a live entity, returning the previous one.
    pub(crate) fn insert(
        &mut self,
        id: EntityId,
        kind: ComponentKind,
        data: N::Data,
    ) -> EcsResult<Option<N::Data>> {
        let index = self.live_index(id)?;
        let slot = &mut self.slots[index];
        slot.mask.insert(kind);
        Ok(slot.components[kind.index()].replace(data))
    }

    /// Takes the payload of `kind` out of a usable entity.
    pub(crate) fn take(&mut self, id: EntityId, kind: ComponentKind) -> EcsResult<Option<N::Data>> {
        let index = self.usable_index(id)?;
        let slot = &mut self.slots[index];
        slot.mask.remove(kind);
        Ok(slot
            .components
            .get_mut(kind.index())
            .and_then(Option::take))
    }

    /// Adds a holder.
    pub(crate) fn retain(&mut self, id: EntityId) -> EcsResult<u32> {
        let index = self.usable_index(id)?;
        let slot = &mut self.slots[index];
        slot.ref_count += 1;
        Ok(slot.ref_count)
    }

    /// Drops a holder. A destroyed entity whose last holder leaves is
    /// recycled immediately.
    ///
    /// # Returns
    ///
    /// `true` if the slot was returned to the free list.
    pub(crate) fn release(&mut self, id: EntityId) -> EcsResult<bool> {
        let index = self.checked_index(id)?;
        let slot = &mut self.slots[index];

        // A live entity always keeps the context's own reference.
        let floor = if slot.state == SlotState::Destroyed { 0 } else { 1 };
        if slot.ref_count <= floor {
            return Err(EcsError::ReleaseWithoutRetain { entity: id });
        }

        slot.ref_count -= 1;
        if slot.ref_count == 0 {
            self.recycle(index);
            return Ok(true);
        }
        Ok(false)
    }

    /// Current number of holders.
    pub(crate) fn ref_count(&self, id: EntityId) -> EcsResult<u32> {
        let index = self.checked_index(id)?;
        Ok(self.slots[index].ref_count)
    }

    /// Moves a live entity into the `Destroying` state.
    pub(crate) fn begin_destroy(&mut self, id: EntityId) -> EcsResult<()> {
        let index = self.live_index(id)?;
        self.slots[index].state = SlotState::Destroying;
        self.alive_count -= 1;
        Ok(())
    }

    /// Finishes destruction and drops the context's reference.
    ///
    /// # Returns
    ///
    /// `true` if no other holder remained and the slot was recycled.
    pub(crate) fn finish_destroy(&mut self, id: EntityId) -> EcsResult<bool> {
        let index = self.usable_index(id)?;
        self.slots[index].state = SlotState::Destroyed;
        self.release(id)
    }

    // Slot indices always fit in u32, see `allocate`.
    #[allow(clippy::cast_possible_truncation)]
    fn recycle(&mut self, index: usize) {
        let slot = &mut self.slots[index];
        slot.generation = slot.generation.wrapping_add(1);
        slot.state = SlotState::Free;
        slot.mask = ComponentMask::EMPTY;
        for component in slot.components.iter_mut() {
            *component = None;
        }
        self.free_indices.push(Reverse(index as u32));
    }

    /// Identities of all live entities, in slot order.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn live_ids(&self) -> Vec<EntityId> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.state == SlotState::Live)
            .map(|(index, slot)| EntityId::new(index as u32, slot.generation))
            .collect()
    }

    /// Number of live entities.
    pub(crate) const fn alive_count(&self) -> usize {
        self.alive_count
    }

    /// Identities of destroyed entities still pinned by a holder.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn retained_ids(&self) -> Vec<EntityId> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.state == SlotState::Destroyed)
            .map(|(index, slot)| EntityId::new(index as u32, slot.generation))
            .collect()
    }

    /// Number of destroyed entities still pinned by a holder.
    pub(crate) fn retained_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.state == SlotState::Destroyed)
            .count()
    }

    /// Number of slots ever allocated.
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }
}
