//! Strongly typed entity identifier.
//!
//! `EntityId` is `Copy + Ord + Hash` so it can be used as a map key and a
//! sorted-collection element without ceremony.  The inner integer is `pub`
//! to allow direct indexing into the store's column `Vec`s via
//! `id.0 as usize`, but callers should prefer the `.index()` helper for
//! clarity.
//!
//! An `EntityId` alone says nothing about liveness: slot indices are reused
//! after `destroy`, and only the store's generation counter distinguishes
//! the old occupant from the new one.  Anything that crosses a turn
//! boundary must carry an `EntityRef` instead.

use std::fmt;

/// Index of an entity slot in the store's column arrays.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl EntityId {
    /// Sentinel meaning "no valid id" — equivalent to `u32::MAX`.
    pub const INVALID: EntityId = EntityId(u32::MAX);

    /// The indestructible root entity, used as the default prototype.
    pub const ROOT: EntityId = EntityId(0);

    /// Cast to `usize` for direct use as a column index.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Default for EntityId {
    /// Returns the `INVALID` sentinel so uninitialized ids are visibly invalid.
    #[inline(always)]
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl From<EntityId> for usize {
    #[inline(always)]
    fn from(id: EntityId) -> usize {
        id.0 as usize
    }
}

impl TryFrom<usize> for EntityId {
    type Error = std::num::TryFromIntError;
    fn try_from(n: usize) -> Result<EntityId, Self::Error> {
        u32::try_from(n).map(EntityId)
    }
}
