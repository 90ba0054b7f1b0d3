//! Unit tests for the spatial index.

#[cfg(test)]
mod index_tests {
    use rustc_hash::FxHashMap;

    use boop_core::{EntityId, Point, Rect};

    use crate::SpatialIndex;

    /// Tiny stand-in for the entity store: id → live position.
    struct World(FxHashMap<EntityId, Point>);

    impl World {
        fn new() -> Self {
            World(FxHashMap::default())
        }

        fn place(&mut self, idx: &mut SpatialIndex, id: EntityId, p: Point) {
            self.0.insert(id, p);
            idx.mark_dirty(id);
        }

        fn remove(&mut self, idx: &mut SpatialIndex, id: EntityId) {
            self.0.remove(&id);
            idx.mark_dirty(id);
        }

        fn sync(&self, idx: &mut SpatialIndex) {
            idx.reconcile(|id| self.0.get(&id).copied());
        }
    }

    #[test]
    fn at_reports_exact_cell_only() {
        let mut idx = SpatialIndex::new();
        let mut world = World::new();
        world.place(&mut idx, EntityId(1), Point::new(2, 3));
        world.place(&mut idx, EntityId(2), Point::new(2, 3));
        world.place(&mut idx, EntityId(3), Point::new(2, 4));
        world.sync(&mut idx);

        assert_eq!(idx.at(Point::new(2, 3)), vec![EntityId(1), EntityId(2)]);
        assert_eq!(idx.at(Point::new(2, 4)), vec![EntityId(3)]);
        assert!(idx.at(Point::new(0, 0)).is_empty());
    }

    #[test]
    fn move_updates_index_lazily() {
        let mut idx = SpatialIndex::new();
        let mut world = World::new();
        world.place(&mut idx, EntityId(1), Point::new(0, 0));
        world.sync(&mut idx);
        assert_eq!(idx.at(Point::new(0, 0)), vec![EntityId(1)]);

        world.place(&mut idx, EntityId(1), Point::new(5, 5));
        assert!(idx.needs_reconcile());
        world.sync(&mut idx);
        assert!(idx.at(Point::new(0, 0)).is_empty());
        assert_eq!(idx.at(Point::new(5, 5)), vec![EntityId(1)]);
    }

    #[test]
    fn destroyed_entity_drops_out() {
        let mut idx = SpatialIndex::new();
        let mut world = World::new();
        world.place(&mut idx, EntityId(1), Point::new(1, 1));
        world.sync(&mut idx);
        world.remove(&mut idx, EntityId(1));
        world.sync(&mut idx);
        assert!(idx.at(Point::new(1, 1)).is_empty());
        assert!(idx.is_empty());
    }

    #[test]
    fn redundant_dirty_marks_are_cheap_noops() {
        let mut idx = SpatialIndex::new();
        let mut world = World::new();
        world.place(&mut idx, EntityId(1), Point::new(1, 1));
        idx.mark_dirty(EntityId(1));
        idx.mark_dirty(EntityId(1));
        world.sync(&mut idx);
        assert_eq!(idx.len(), 1);
        // Dirty without an actual change keeps the entry.
        idx.mark_dirty(EntityId(1));
        world.sync(&mut idx);
        assert_eq!(idx.at(Point::new(1, 1)), vec![EntityId(1)]);
    }

    #[test]
    fn within_is_row_major_sorted() {
        let mut idx = SpatialIndex::new();
        let mut world = World::new();
        world.place(&mut idx, EntityId(5), Point::new(2, 2));
        world.place(&mut idx, EntityId(1), Point::new(1, 2));
        world.place(&mut idx, EntityId(4), Point::new(1, 1));
        world.place(&mut idx, EntityId(9), Point::new(8, 8)); // outside
        world.sync(&mut idx);

        let hits = idx.within(Rect::new(0, 0, 4, 4));
        assert_eq!(
            hits,
            vec![
                (Point::new(1, 1), EntityId(4)),
                (Point::new(1, 2), EntityId(1)),
                (Point::new(2, 2), EntityId(5)),
            ]
        );
    }

    #[test]
    fn within_empty_rect_is_empty() {
        let mut idx = SpatialIndex::new();
        let mut world = World::new();
        world.place(&mut idx, EntityId(1), Point::new(0, 0));
        world.sync(&mut idx);
        assert!(idx.within(Rect::new(0, 0, 0, 5)).is_empty());
    }

    #[test]
    fn negative_coordinates_work() {
        let mut idx = SpatialIndex::new();
        let mut world = World::new();
        world.place(&mut idx, EntityId(1), Point::new(-10, -20));
        world.sync(&mut idx);
        assert_eq!(idx.at(Point::new(-10, -20)), vec![EntityId(1)]);
        let hits = idx.within(Rect::new(-15, -25, 10, 10));
        assert_eq!(hits, vec![(Point::new(-10, -20), EntityId(1))]);
    }
}
