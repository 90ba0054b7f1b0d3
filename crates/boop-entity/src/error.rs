//! Store-level error type.
//!
//! Higher crates define their own error enums and absorb `EntityError`
//! via `From` impls; store errors always propagate to the caller that
//! attempted the mutation rather than being converted into remnants.

use thiserror::Error;

use boop_core::EntityId;

#[derive(Debug, Error)]
pub enum EntityError {
    #[error("entity capacity exhausted ({capacity} slots)")]
    ShardFull { capacity: usize },

    #[error("name {name:?} already belongs to {holder}")]
    NameInUse { name: String, holder: EntityId },
}

/// Shorthand result type for store operations.
pub type EntityResult<T> = Result<T, EntityError>;
