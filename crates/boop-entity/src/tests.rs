//! Unit tests for the entity store, type index, names, and ref scopes.

#[cfg(test)]
mod store_tests {
    use boop_core::{EntityId, Point, TypeMask};

    use crate::store::{EntityStore, HARD_CAPACITY};

    #[test]
    fn root_is_preallocated() {
        let store = EntityStore::new(8);
        assert!(store.is_allocated(EntityId::ROOT));
        assert_eq!(store.generation(EntityId::ROOT), Some(1));
    }

    #[test]
    fn alloc_returns_lowest_free_slot() {
        let mut store = EntityStore::new(8);
        let a = store.alloc().unwrap();
        let b = store.alloc().unwrap();
        assert_eq!(a, EntityId(1));
        assert_eq!(b, EntityId(2));
        store.free(a);
        // Slot 1 is the lowest free slot again.
        assert_eq!(store.alloc().unwrap(), EntityId(1));
    }

    #[test]
    fn generation_low_bit_tracks_allocation() {
        let mut store = EntityStore::new(4);
        let e = store.alloc().unwrap();
        let g0 = store.generation(e).unwrap();
        assert_eq!(g0 & 1, 1);
        store.free(e);
        let g1 = store.generation(e).unwrap();
        assert_eq!(g1 & 1, 0);
        assert_eq!(g1, g0.wrapping_add(1));
        let e2 = store.alloc().unwrap();
        assert_eq!(e2, e);
        assert_eq!(store.generation(e2).unwrap(), g0.wrapping_add(2));
    }

    #[test]
    fn free_root_is_noop() {
        let mut store = EntityStore::new(4);
        store.free(EntityId::ROOT);
        assert!(store.is_allocated(EntityId::ROOT));
    }

    #[test]
    fn free_unallocated_is_noop() {
        let mut store = EntityStore::new(4);
        store.free(EntityId(3));
        assert!(!store.is_allocated(EntityId(3)));
    }

    #[test]
    fn growth_doubles_then_quarter() {
        let mut store = EntityStore::new(2);
        // Fill the two initial slots (root + one).
        store.alloc().unwrap();
        assert_eq!(store.capacity(), 2);
        store.alloc().unwrap();
        assert_eq!(store.capacity(), 4, "growth below 4096 doubles");
        for _ in 0..2 {
            store.alloc().unwrap();
        }
        assert_eq!(store.capacity(), 8);
    }

    #[test]
    fn hard_cap_is_respected() {
        let mut store = EntityStore::new(HARD_CAPACITY);
        for _ in 1..HARD_CAPACITY {
            store.alloc().unwrap();
        }
        assert!(store.alloc().is_err(), "allocation past the hard cap must fail");
    }

    #[test]
    fn columns_roundtrip() {
        let mut store = EntityStore::new(4);
        let e = store.alloc().unwrap();
        store.set_location(e, Point::new(3, -2));
        store.set_z(e, 5);
        store.set_glyph(e, '@');
        assert_eq!(store.location(e), Point::new(3, -2));
        assert_eq!(store.z(e), 5);
        assert_eq!(store.glyph(e), '@');
    }

    #[test]
    fn freed_slot_resets_columns_on_realloc() {
        let mut store = EntityStore::new(4);
        let e = store.alloc().unwrap();
        store.set_glyph(e, 'D');
        store.set_location(e, Point::new(9, 9));
        store.free(e);
        let e2 = store.alloc().unwrap();
        assert_eq!(e2, e);
        assert_eq!(store.glyph(e2), ' ');
        assert_eq!(store.location(e2), Point::default());
        assert!(store.types(e2).is_empty());
    }

    #[test]
    fn live_ids_ascending() {
        let mut store = EntityStore::new(8);
        let a = store.alloc().unwrap();
        let b = store.alloc().unwrap();
        store.free(a);
        let ids: Vec<_> = store.live_ids().collect();
        assert_eq!(ids, vec![EntityId::ROOT, b]);
    }

    #[test]
    fn type_queries_follow_mutation() {
        let mut store = EntityStore::new(4);
        let e = store.alloc().unwrap();
        store.set_type(e, TypeMask::SOLID | TypeMask::VISIBLE);
        assert!(store.has_type(e, TypeMask::SOLID));
        assert!(!store.has_type(e, TypeMask::MIND));
        store.update_type(e, |t| t - TypeMask::SOLID);
        assert!(!store.has_type(e, TypeMask::SOLID));
        assert!(store.has_type(e, TypeMask::VISIBLE));
    }

    #[test]
    fn index_tracks_transitions() {
        let mut store = EntityStore::new(8);
        let a = store.alloc().unwrap();
        let b = store.alloc().unwrap();
        store.set_type(a, TypeMask::MIND);
        store.index_filter(TypeMask::MIND);
        assert_eq!(store.ids_matching(TypeMask::MIND), vec![a]);
        store.set_type(b, TypeMask::MIND | TypeMask::SOLID);
        assert_eq!(store.ids_matching(TypeMask::MIND), vec![a, b]);
        store.set_type(a, TypeMask::EMPTY);
        assert_eq!(store.ids_matching(TypeMask::MIND), vec![b]);
        // Destroy removes from the index too.
        store.free(b);
        assert!(store.ids_matching(TypeMask::MIND).is_empty());
    }

    #[test]
    fn index_registered_lazily_sees_existing_population() {
        let mut store = EntityStore::new(8);
        let a = store.alloc().unwrap();
        store.set_type(a, TypeMask::INPUT);
        // First query registers the filter and seeds it.
        assert_eq!(store.ids_matching(TypeMask::INPUT), vec![a]);
    }
}

#[cfg(test)]
mod name_tests {
    use crate::error::EntityError;
    use crate::store::EntityStore;

    #[test]
    fn bind_and_lookup() {
        let mut store = EntityStore::new(4);
        let e = store.alloc().unwrap();
        store.set_name(e, "door").unwrap();
        assert_eq!(store.by_name("door"), Some(e));
        assert_eq!(store.name(e), Some("door"));
    }

    #[test]
    fn names_are_unique() {
        let mut store = EntityStore::new(4);
        let a = store.alloc().unwrap();
        let b = store.alloc().unwrap();
        store.set_name(a, "door").unwrap();
        match store.set_name(b, "door") {
            Err(EntityError::NameInUse { holder, .. }) => assert_eq!(holder, a),
            other => panic!("expected NameInUse, got {other:?}"),
        }
    }

    #[test]
    fn rebinding_replaces_old_name() {
        let mut store = EntityStore::new(4);
        let e = store.alloc().unwrap();
        store.set_name(e, "door").unwrap();
        store.set_name(e, "gate").unwrap();
        assert_eq!(store.by_name("door"), None);
        assert_eq!(store.by_name("gate"), Some(e));
        // Re-binding the same name is fine.
        store.set_name(e, "gate").unwrap();
    }

    #[test]
    fn destroy_releases_name() {
        let mut store = EntityStore::new(4);
        let e = store.alloc().unwrap();
        store.set_name(e, "door").unwrap();
        store.free(e);
        assert_eq!(store.by_name("door"), None);
        let f = store.alloc().unwrap();
        store.set_name(f, "door").unwrap();
        assert_eq!(store.by_name("door"), Some(f));
    }
}

#[cfg(test)]
mod scope_tests {
    use boop_core::ShardRng;

    use crate::scope::{EntityRef, RefScope};
    use crate::store::EntityStore;

    fn scope(seed: u64) -> RefScope {
        RefScope::new(ShardRng::new(seed))
    }

    #[test]
    fn minted_ref_derefs_to_entity() {
        let mut store = EntityStore::new(4);
        let e = store.alloc().unwrap();
        let mut sc = scope(1);
        let r = sc.mint(e, store.generation(e).unwrap(), None);
        assert!(r.is_some());
        assert_eq!(sc.deref(r, &store), Some(e));
    }

    #[test]
    fn none_ref_never_derefs() {
        let store = EntityStore::new(4);
        let sc = scope(1);
        assert_eq!(sc.deref(EntityRef::NONE, &store), None);
    }

    #[test]
    fn destroy_invalidates_ref() {
        let mut store = EntityStore::new(4);
        let e = store.alloc().unwrap();
        let mut sc = scope(1);
        let r = sc.mint(e, store.generation(e).unwrap(), None);
        store.free(e);
        assert_eq!(sc.deref(r, &store), None, "freed slot must not resolve");
        // Reallocation of the same slot must not resurrect the old ref.
        let e2 = store.alloc().unwrap();
        assert_eq!(e2, e);
        assert_eq!(sc.deref(r, &store), None, "reused slot must not resolve");
    }

    #[test]
    fn clear_revokes_everything() {
        let mut store = EntityStore::new(4);
        let e = store.alloc().unwrap();
        let mut sc = scope(1);
        let r = sc.mint(e, store.generation(e).unwrap(), None);
        sc.clear();
        assert!(sc.is_empty());
        assert_eq!(sc.deref(r, &store), None);
    }

    #[test]
    fn sub_scope_keeps_own_table() {
        let mut store = EntityStore::new(4);
        let e = store.alloc().unwrap();
        let g = store.generation(e).unwrap();
        let mut root = scope(1);
        let mut sub = scope(2);
        let root_ref = root.mint(e, g, None);
        let sub_ref = sub.mint(e, g, Some(&root));
        assert_ne!(root_ref, sub_ref);
        // Clearing the sub-scope leaves the root's token live.
        sub.clear();
        assert_eq!(sub.deref(sub_ref, &store), None);
        assert_eq!(root.deref(root_ref, &store), Some(e));
    }

    #[test]
    fn salt_streams_are_deterministic() {
        let mut store = EntityStore::new(4);
        let e = store.alloc().unwrap();
        let g = store.generation(e).unwrap();
        let mut s1 = scope(9);
        let mut s2 = scope(9);
        assert_eq!(s1.mint(e, g, None), s2.mint(e, g, None));
    }
}
