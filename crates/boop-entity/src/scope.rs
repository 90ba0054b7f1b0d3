//! `RefScope` — minting domains for opaque, revocable entity references.
//!
//! # Why opaque random refs
//!
//! A plain entity id silently re-targets after slot reuse.  An `EntityRef`
//! is a random non-zero 32-bit token mapped, inside its scope, to the
//! `(id, generation)` pair captured at mint time.  Dereference checks the
//! stored generation against the live one, so stale refs resolve to `None`
//! instead of aliasing the slot's next occupant; clearing the scope
//! revokes every token it minted at once.
//!
//! The shard keeps one root scope plus one sub-scope per mind.  A
//! sub-scope consults its parent when choosing salts so a token is unique
//! across the pair, but keeps its own mint table — clearing a mind's scope
//! never disturbs the root's tokens.

use rustc_hash::FxHashMap;

use boop_core::{EntityId, ShardRng};

use crate::store::EntityStore;

// ── EntityRef ─────────────────────────────────────────────────────────────────

/// An opaque revocable reference to an entity.
///
/// The zero value is reserved: it means "seen but not identified" in view
/// cells and never dereferences.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityRef(pub u32);

impl EntityRef {
    pub const NONE: EntityRef = EntityRef(0);

    #[inline]
    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn is_some(self) -> bool {
        self.0 != 0
    }
}

impl std::fmt::Display for EntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:08x}", self.0)
    }
}

// ── RefScope ──────────────────────────────────────────────────────────────────

/// A minting domain for `EntityRef`s with a bounded lifetime.
pub struct RefScope {
    /// salt → packed `(id << 8) | generation`.
    table: FxHashMap<u32, u32>,
    /// Deterministic salt stream, derived from the shard seed.
    salts: ShardRng,
}

impl RefScope {
    pub fn new(salts: ShardRng) -> Self {
        Self { table: FxHashMap::default(), salts }
    }

    /// Mint a ref for `id` at its current generation.
    ///
    /// `parent` is consulted for salt collisions only; the token is
    /// recorded in `self`'s table.
    pub fn mint(&mut self, id: EntityId, r#gen: u8, parent: Option<&RefScope>) -> EntityRef {
        let salt = loop {
            let candidate: u32 = self.salts.random();
            if candidate == 0 || self.table.contains_key(&candidate) {
                continue;
            }
            if let Some(p) = parent {
                if p.table.contains_key(&candidate) {
                    continue;
                }
            }
            break candidate;
        };
        self.table.insert(salt, (id.0 << 8) | r#gen as u32);
        EntityRef(salt)
    }

    /// Resolve a ref to its entity id, or `None` if the ref was never
    /// minted here, was revoked, or points at a destroyed/reused slot.
    pub fn deref(&self, r: EntityRef, store: &EntityStore) -> Option<EntityId> {
        if r.is_none() {
            return None;
        }
        let packed = *self.table.get(&r.0)?;
        let id = EntityId(packed >> 8);
        let minted_gen = (packed & 0xff) as u8;
        if store.generation(id)? != minted_gen {
            return None;
        }
        Some(id)
    }

    /// Revoke every ref minted into this scope.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Number of live (unrevoked) tokens.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
