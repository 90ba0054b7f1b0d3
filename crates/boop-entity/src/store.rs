//! `EntityStore` — generational slot allocation and dense column storage.
//!
//! # Layout
//!
//! Components that every entity carries live in parallel column `Vec`s
//! indexed by entity id:
//!
//! ```text
//! generation[id]  u8        low bit = allocated flag
//! position[id]    Point
//! z_index[id]     i16
//! glyph[id]       char
//! types[id]       TypeMask
//! ```
//!
//! All columns always have identical length (the current capacity).  The
//! generation's low bit distinguishes live slots from free ones; alloc and
//! destroy both increment it, so any cached `(id, generation)` pair can be
//! re-validated with a single equality check.
//!
//! # Growth policy
//!
//! Allocation scans for the lowest free slot.  On exhaustion the store
//! grows by doubling below 4096 slots and by 25 % above, capped at
//! [`HARD_CAPACITY`]; all columns are resized together so they never
//! disagree about capacity.

use boop_core::{EntityId, Point, TypeMask};

use crate::error::{EntityError, EntityResult};
use crate::index::TypeIndex;
use crate::names::NameRegistry;

/// Absolute slot ceiling; `alloc` fails with `ShardFull` beyond it.
pub const HARD_CAPACITY: usize = 64 * 1024;

/// Growth switches from doubling to +25 % at this capacity.
const DOUBLING_LIMIT: usize = 4096;

/// Dense entity storage plus the type index and name registry that must
/// observe every mutation.
pub struct EntityStore {
    generation: Vec<u8>,
    position: Vec<Point>,
    z_index: Vec<i16>,
    glyph: Vec<char>,
    types: Vec<TypeMask>,

    index: TypeIndex,
    names: NameRegistry,

    /// Lower bound on the lowest free slot; keeps the lowest-free scan
    /// amortized O(1) across alloc/free churn.
    first_free: usize,
}

impl EntityStore {
    /// Create a store with `initial` slots (at least one) and allocate the
    /// indestructible root entity at id 0.
    pub fn new(initial: usize) -> Self {
        let cap = initial.clamp(1, HARD_CAPACITY);
        let mut store = Self {
            generation: vec![0; cap],
            position: vec![Point::default(); cap],
            z_index: vec![0; cap],
            glyph: vec![' '; cap],
            types: vec![TypeMask::EMPTY; cap],
            index: TypeIndex::new(),
            names: NameRegistry::new(),
            first_free: 1,
        };
        // Root occupies slot 0 from birth; destroy() refuses to touch it.
        store.generation[0] = 1;
        store
    }

    // ── Allocation ────────────────────────────────────────────────────────

    /// Claim the lowest-indexed free slot, growing if necessary.
    pub fn alloc(&mut self) -> EntityResult<EntityId> {
        let scan = self.first_free.min(self.generation.len());
        let slot = match self.generation[scan..].iter().position(|g| g & 1 == 0) {
            Some(i) => scan + i,
            None => self.grow()?,
        };
        self.first_free = slot + 1;
        self.generation[slot] = self.generation[slot].wrapping_add(1);
        self.position[slot] = Point::default();
        self.z_index[slot] = 0;
        self.glyph[slot] = ' ';
        debug_assert!(self.types[slot].is_empty());
        EntityId::try_from(slot).map_err(|_| EntityError::ShardFull { capacity: HARD_CAPACITY })
    }

    /// Release `id`'s slot: clear its type (updating the index), drop its
    /// name, and bump the generation.  Freeing the root or an already-free
    /// slot is a silent no-op.  Sparse-component teardown (input, mind,
    /// interact) is the shard's responsibility and must run first.
    pub fn free(&mut self, id: EntityId) {
        if id == EntityId::ROOT || !self.is_allocated(id) {
            return;
        }
        self.set_type(id, TypeMask::EMPTY);
        self.names.unbind(id);
        self.generation[id.index()] = self.generation[id.index()].wrapping_add(1);
        self.first_free = self.first_free.min(id.index());
    }

    fn grow(&mut self) -> EntityResult<usize> {
        let old = self.generation.len();
        if old >= HARD_CAPACITY {
            return Err(EntityError::ShardFull { capacity: HARD_CAPACITY });
        }
        let grown = if old < DOUBLING_LIMIT { old * 2 } else { old + old / 4 };
        let new = grown.min(HARD_CAPACITY);
        // One transaction: every column reaches `new` or none does.
        self.generation.resize(new, 0);
        self.position.resize(new, Point::default());
        self.z_index.resize(new, 0);
        self.glyph.resize(new, ' ');
        self.types.resize(new, TypeMask::EMPTY);
        Ok(old)
    }

    // ── Liveness ──────────────────────────────────────────────────────────

    /// Current capacity (slot count, free or live).
    pub fn capacity(&self) -> usize {
        self.generation.len()
    }

    #[inline]
    pub fn is_allocated(&self, id: EntityId) -> bool {
        self.generation
            .get(id.index())
            .is_some_and(|g| g & 1 == 1)
    }

    /// The slot's generation counter, or `None` for an out-of-range id.
    #[inline]
    pub fn generation(&self, id: EntityId) -> Option<u8> {
        self.generation.get(id.index()).copied()
    }

    /// Ascending iterator over all live entity ids.
    pub fn live_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.generation
            .iter()
            .enumerate()
            .filter(|(_, g)| *g & 1 == 1)
            .map(|(i, _)| EntityId(i as u32))
    }

    // ── Dense columns ─────────────────────────────────────────────────────

    #[inline]
    pub fn location(&self, id: EntityId) -> Point {
        self.position[id.index()]
    }

    #[inline]
    pub fn set_location(&mut self, id: EntityId, p: Point) {
        self.position[id.index()] = p;
    }

    #[inline]
    pub fn z(&self, id: EntityId) -> i16 {
        self.z_index[id.index()]
    }

    #[inline]
    pub fn set_z(&mut self, id: EntityId, z: i16) {
        self.z_index[id.index()] = z;
    }

    #[inline]
    pub fn glyph(&self, id: EntityId) -> char {
        self.glyph[id.index()]
    }

    #[inline]
    pub fn set_glyph(&mut self, id: EntityId, g: char) {
        self.glyph[id.index()] = g;
    }

    // ── Types ─────────────────────────────────────────────────────────────

    #[inline]
    pub fn types(&self, id: EntityId) -> TypeMask {
        self.types[id.index()]
    }

    /// `true` if `id`'s type intersects `filter`.
    #[inline]
    pub fn has_type(&self, id: EntityId, filter: TypeMask) -> bool {
        self.types[id.index()].intersects(filter)
    }

    /// Replace `id`'s type bitset, updating every registered filter set.
    pub fn set_type(&mut self, id: EntityId, new: TypeMask) {
        let old = self.types[id.index()];
        if old == new {
            return;
        }
        self.types[id.index()] = new;
        self.index.on_change(id, old, new);
    }

    /// Transform `id`'s type bitset through `f`.
    pub fn update_type(&mut self, id: EntityId, f: impl FnOnce(TypeMask) -> TypeMask) {
        let old = self.types[id.index()];
        self.set_type(id, f(old));
    }

    /// Register `filter` for index maintenance, seeding it from the
    /// current population.
    pub fn index_filter(&mut self, filter: TypeMask) {
        let seed: Vec<_> = self
            .generation
            .iter()
            .enumerate()
            .filter(|(_, g)| *g & 1 == 1)
            .map(|(i, _)| (EntityId(i as u32), self.types[i]))
            .collect();
        self.index.register(filter, seed);
    }

    /// Ascending ids whose type intersects `filter`.  The filter is
    /// registered on first use.
    pub fn ids_matching(&mut self, filter: TypeMask) -> Vec<EntityId> {
        if !self.index.is_registered(filter) {
            self.index_filter(filter);
        }
        self.index
            .ids(filter)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    // ── Names ─────────────────────────────────────────────────────────────

    pub fn set_name(&mut self, id: EntityId, name: &str) -> EntityResult<()> {
        self.names.bind(id, name)
    }

    pub fn clear_name(&mut self, id: EntityId) {
        self.names.unbind(id);
    }

    pub fn name(&self, id: EntityId) -> Option<&str> {
        self.names.name_of(id)
    }

    pub fn by_name(&self, name: &str) -> Option<EntityId> {
        self.names.by_name(name)
    }

    pub fn names(&self) -> &NameRegistry {
        &self.names
    }
}
