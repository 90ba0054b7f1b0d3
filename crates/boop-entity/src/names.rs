//! `NameRegistry` — globally unique entity names.
//!
//! A name maps to at most one entity and an entity has at most one name;
//! both directions are kept in lockstep so `by_name` and `name_of` are
//! each O(1).

use rustc_hash::FxHashMap;

use boop_core::EntityId;

use crate::error::{EntityError, EntityResult};

/// Naming policy callback: given the registry, the new entity's id and
/// glyph, produce a name (or `None` to leave the entity anonymous).
/// Invoked by the shard when an entity is created without an explicit name.
pub type ChooseName = Box<dyn FnMut(&NameRegistry, EntityId, char) -> Option<String>>;

/// Bidirectional unique-name table.
#[derive(Default)]
pub struct NameRegistry {
    forward: FxHashMap<String, EntityId>,
    back: FxHashMap<EntityId, String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `id`, replacing any name `id` previously held.
    ///
    /// Fails with [`EntityError::NameInUse`] if another live entity holds
    /// `name`; re-binding an entity's own name is a no-op.
    pub fn bind(&mut self, id: EntityId, name: &str) -> EntityResult<()> {
        if let Some(&holder) = self.forward.get(name) {
            if holder == id {
                return Ok(());
            }
            return Err(EntityError::NameInUse { name: name.to_owned(), holder });
        }
        if let Some(old) = self.back.remove(&id) {
            self.forward.remove(&old);
        }
        self.forward.insert(name.to_owned(), id);
        self.back.insert(id, name.to_owned());
        Ok(())
    }

    /// Remove `id`'s name, if any.  Called from entity teardown.
    pub fn unbind(&mut self, id: EntityId) {
        if let Some(name) = self.back.remove(&id) {
            self.forward.remove(&name);
        }
    }

    pub fn by_name(&self, name: &str) -> Option<EntityId> {
        self.forward.get(name).copied()
    }

    pub fn name_of(&self, id: EntityId) -> Option<&str> {
        self.back.get(&id).map(String::as_str)
    }

    pub fn is_free(&self, name: &str) -> bool {
        !self.forward.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}
