//! # ECS Error Types
//!
//! Every error here is a programmer fault: the call that breaks an invariant
//! reports it immediately and nothing is retried.

use thiserror::Error;

use crate::ecs::EntityId;

/// Errors raised by contexts, groups, collectors and systems.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// `add` on a kind the entity already holds.
    #[error("entity {entity} already has component {kind}")]
    DuplicateComponent {
        /// The entity that was mutated.
        entity: EntityId,
        /// Name of the component kind.
        kind: &'static str,
    },

    /// `remove` or a read on a kind the entity does not hold.
    #[error("entity {entity} has no component {kind}")]
    MissingComponent {
        /// The entity that was accessed.
        entity: EntityId,
        /// Name of the component kind.
        kind: &'static str,
    },

    /// The identity was never issued by this context.
    #[error("unknown entity {entity}")]
    UnknownEntity {
        /// The offending identity.
        entity: EntityId,
    },

    /// The entity was destroyed; it may still be retained but is no longer usable.
    #[error("entity {entity} was destroyed")]
    UseOfDestroyedEntity {
        /// The offending identity.
        entity: EntityId,
    },

    /// A unique component kind already has a holder.
    #[error("unique component {kind} is already held by entity {holder}")]
    UniqueComponentAlreadySet {
        /// Name of the unique component kind.
        kind: &'static str,
        /// The current holder.
        holder: EntityId,
    },

    /// A lifecycle phase ran before `initialize`.
    #[error("system '{system}' was executed before it was initialized")]
    NotInitialized {
        /// Name of the system or feature.
        system: String,
    },

    /// `initialize` ran on a feature that is already initialized.
    #[error("system '{system}' was initialized twice")]
    AlreadyInitialized {
        /// Name of the feature.
        system: String,
    },

    /// Component listeners nested deeper than the configured limit.
    #[error("component event recursion exceeded depth {limit}")]
    EventDepthExceeded {
        /// The configured maximum depth.
        limit: usize,
    },

    /// An external `release` without a matching `retain`.
    #[error("entity {entity} released more often than it was retained")]
    ReleaseWithoutRetain {
        /// The offending identity.
        entity: EntityId,
    },

    /// `single_entity` on a group with more than one member.
    #[error("expected at most one entity in group, found {count}")]
    GroupNotSingle {
        /// Number of members found.
        count: usize,
    },
}

/// Result type for ECS operations.
pub type EcsResult<T> = Result<T, EcsError>;
