//! Shard-level error type.
//!
//! Propagation policy: component-level errors (no thunk, invalid wait,
//! obsolete handle inside a task step) are caught at the mind-step
//! boundary and converted into remnants with `ok = false`; store-level
//! errors (`ShardFull`, `NameInUse`) propagate to whoever called
//! `create`.  The shard itself never aborts on a misbehaving mind.

use thiserror::Error;

use boop_core::EntityId;
use boop_entity::EntityError;
use boop_mind::MindError;

#[derive(Debug, Error)]
pub enum ShardError {
    #[error(transparent)]
    Entity(#[from] EntityError),

    #[error(transparent)]
    Mind(#[from] MindError),

    /// A guarded handle was used past its validity — the entity was
    /// destroyed or its slot reused since the handle was derived.
    #[error("handle to {ent} used after turn/generation")]
    ObsoleteHandle { ent: EntityId },

    /// A datum was pushed into an input queue whose component was
    /// destroyed.
    #[error("input binding has been revoked")]
    RevokedInput,

    /// A pending move belonged to an entity that lost its mind before
    /// move application.
    #[error("move submitted by {ent}, which has no mind")]
    InvalidMove { ent: EntityId },

    #[error("shard configuration error: {0}")]
    Config(String),
}

pub type ShardResult<T> = Result<T, ShardError>;
