//! `boop-entity` — entity storage for the `boopworld` shard.
//!
//! # What lives here
//!
//! | Module     | Contents                                               |
//! |------------|--------------------------------------------------------|
//! | [`store`]  | `EntityStore`: generational slots, dense columns, growth |
//! | [`index`]  | `TypeIndex`: entity-id sets per component filter       |
//! | [`names`]  | `NameRegistry`: unique names ↔ ids, naming policy hook |
//! | [`scope`]  | `RefScope` / `EntityRef`: opaque revocable references  |
//! | [`error`]  | `EntityError`                                          |
//!
//! The store owns the type index and the name registry so that every type
//! or name transition is indexed at the mutation site; the shard layers
//! sparse components (minds, input bindings, interaction handlers) on top
//! by entity id.

pub mod error;
pub mod index;
pub mod names;
pub mod scope;
pub mod store;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{EntityError, EntityResult};
pub use index::TypeIndex;
pub use names::{ChooseName, NameRegistry};
pub use scope::{EntityRef, RefScope};
pub use store::{EntityStore, HARD_CAPACITY};
