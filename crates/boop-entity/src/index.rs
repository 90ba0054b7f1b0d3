//! `TypeIndex` — materialized entity-id sets per component filter.
//!
//! # Why this exists
//!
//! The scheduler repeatedly asks "which entities have a mind?" and "which
//! entities gate turn completion?".  Scanning every slot's bitset per query
//! would cost O(capacity) each time; the index keeps one sorted id set per
//! registered filter and pays O(log n) at the type-transition site instead.
//!
//! Membership is *intersection*: an id belongs to a filter set iff
//! `type & filter != 0`.  Sets are `BTreeSet`s, so iteration order is the
//! id order — insertion-order independent and stable within a turn.

use std::collections::BTreeSet;

use boop_core::{EntityId, TypeMask};

/// Entity-id sets maintained for each registered filter bitset.
#[derive(Default)]
pub struct TypeIndex {
    filters: Vec<(TypeMask, BTreeSet<EntityId>)>,
}

impl TypeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `filter` for maintenance.  `seed` supplies the ids and
    /// current types of already-allocated entities; registering the same
    /// filter twice is a no-op.
    pub fn register<I>(&mut self, filter: TypeMask, seed: I)
    where
        I: IntoIterator<Item = (EntityId, TypeMask)>,
    {
        if self.filters.iter().any(|(f, _)| *f == filter) {
            return;
        }
        let set = seed
            .into_iter()
            .filter(|(_, t)| t.intersects(filter))
            .map(|(id, _)| id)
            .collect();
        self.filters.push((filter, set));
    }

    /// Record a type transition for `id`.  Called by the store from every
    /// `set_type`/`update_type`, including alloc (EMPTY → initial) and
    /// destroy (current → EMPTY).
    pub fn on_change(&mut self, id: EntityId, old: TypeMask, new: TypeMask) {
        for (filter, set) in &mut self.filters {
            let was = old.intersects(*filter);
            let is = new.intersects(*filter);
            if was && !is {
                set.remove(&id);
            } else if !was && is {
                set.insert(id);
            }
        }
    }

    /// The id set for `filter`, if registered.
    pub fn ids(&self, filter: TypeMask) -> Option<&BTreeSet<EntityId>> {
        self.filters
            .iter()
            .find(|(f, _)| *f == filter)
            .map(|(_, set)| set)
    }

    /// `true` if `filter` has been registered.
    pub fn is_registered(&self, filter: TypeMask) -> bool {
        self.filters.iter().any(|(f, _)| *f == filter)
    }
}
