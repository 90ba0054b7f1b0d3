//! Unit tests for boop-core primitives.

#[cfg(test)]
mod ids {
    use crate::EntityId;

    #[test]
    fn index_roundtrip() {
        let id = EntityId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(EntityId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(EntityId(0) < EntityId(1));
        assert!(EntityId::ROOT < EntityId(100));
    }

    #[test]
    fn invalid_sentinel_is_max() {
        assert_eq!(EntityId::INVALID.0, u32::MAX);
        assert_eq!(EntityId::default(), EntityId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(EntityId(7).to_string(), "EntityId(7)");
    }
}

#[cfg(test)]
mod geom {
    use crate::{Move, Point, Rect, WORLD_MAX, WORLD_MIN};

    #[test]
    fn move_deltas() {
        let p = Point::new(5, 5);
        assert_eq!(Move::Up.apply(p), Point::new(5, 4));
        assert_eq!(Move::Right.apply(p), Point::new(6, 5));
        assert_eq!(Move::Down.apply(p), Point::new(5, 6));
        assert_eq!(Move::Left.apply(p), Point::new(4, 5));
        assert_eq!(Move::Stay.apply(p), p);
    }

    #[test]
    fn moves_clamp_at_world_rim() {
        let nw = Point::new(WORLD_MIN, WORLD_MIN);
        assert_eq!(Move::Left.apply(nw), nw);
        assert_eq!(Move::Up.apply(nw), nw);
        let se = Point::new(WORLD_MAX, WORLD_MAX);
        assert_eq!(Move::Right.apply(se), se);
        assert_eq!(Move::Down.apply(se), se);
    }

    #[test]
    fn rect_contains_half_open() {
        let r = Rect::new(1, 1, 3, 2); // covers x 1..4, y 1..3
        assert!(r.contains(Point::new(1, 1)));
        assert!(r.contains(Point::new(3, 2)));
        assert!(!r.contains(Point::new(4, 1)));
        assert!(!r.contains(Point::new(1, 3)));
    }

    #[test]
    fn rect_union_covers_both() {
        let a = Rect::new(0, 0, 2, 2);
        let b = Rect::new(3, 3, 2, 2);
        let u = a.union(b);
        assert_eq!(u, Rect::new(0, 0, 5, 5));
        assert_eq!(Rect::default().union(b), b);
        assert_eq!(b.union(Rect::default()), b);
    }

    #[test]
    fn rect_cells_row_major() {
        let r = Rect::new(2, 3, 2, 2);
        let cells: Vec<_> = r.cells().collect();
        assert_eq!(
            cells,
            vec![
                Point::new(2, 3),
                Point::new(3, 3),
                Point::new(2, 4),
                Point::new(3, 4),
            ]
        );
        assert_eq!(r.area(), 4);
    }

    #[test]
    fn rect_around_is_centered() {
        let r = Rect::around(Point::new(0, 0), 2);
        assert_eq!(r, Rect::new(-2, -2, 5, 5));
        assert!(r.contains(Point::new(0, 0)));
        assert!(r.contains(Point::new(2, 2)));
        assert!(!r.contains(Point::new(3, 0)));
    }
}

#[cfg(test)]
mod types {
    use crate::TypeMask;

    #[test]
    fn flag_algebra() {
        let t = TypeMask::SOLID | TypeMask::VISIBLE;
        assert!(t.contains(TypeMask::SOLID));
        assert!(!t.contains(TypeMask::MIND));
        assert!(t.intersects(TypeMask::VISIBLE | TypeMask::MIND));
        assert!(!t.intersects(TypeMask::MIND | TypeMask::INPUT));
        assert_eq!(t - TypeMask::SOLID, TypeMask::VISIBLE);
    }

    #[test]
    fn with_sets_and_clears() {
        let t = TypeMask::EMPTY.with(TypeMask::MIND, true);
        assert!(t.contains(TypeMask::MIND));
        assert!(t.with(TypeMask::MIND, false).is_empty());
    }

    #[test]
    fn display() {
        let t = TypeMask::SOLID | TypeMask::VISIBLE | TypeMask::MIND;
        assert_eq!(t.to_string(), "SV-M-");
        assert_eq!(TypeMask::EMPTY.to_string(), "-----");
    }
}

#[cfg(test)]
mod time {
    use crate::Time;

    #[test]
    fn arithmetic() {
        let t = Time(10);
        assert_eq!(t + 5, Time(15));
        assert_eq!(t.offset(3), Time(13));
        assert_eq!(Time(15) - Time(10), 5u64);
        assert_eq!(Time(15).since(Time(10)), 5u64);
    }

    #[test]
    fn display() {
        assert_eq!(Time(7).to_string(), "T7");
    }
}

#[cfg(test)]
mod rng {
    use crate::{EntityId, MindRng, Seed, ShardRng};

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = MindRng::new(0xdead_beef, EntityId(3));
        let mut r2 = MindRng::new(0xdead_beef, EntityId(3));
        for _ in 0..100 {
            let a: u64 = r1.random();
            let b: u64 = r2.random();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn different_minds_differ() {
        let mut r0 = MindRng::new(1, EntityId(0));
        let mut r1 = MindRng::new(1, EntityId(1));
        let a: u64 = r0.random();
        let b: u64 = r1.random();
        assert_ne!(a, b, "seeds for adjacent minds should diverge");
    }

    #[test]
    fn gen_range_in_bounds() {
        let mut rng = MindRng::new(0, EntityId(0));
        for _ in 0..1000 {
            let v: u32 = rng.gen_range(0..5);
            assert!(v < 5);
        }
    }

    #[test]
    fn choose_empty_is_none() {
        let mut rng = MindRng::new(0, EntityId(0));
        let empty: [u8; 0] = [];
        assert!(rng.choose(&empty).is_none());
    }

    #[test]
    fn seed_conversions() {
        assert_eq!(Seed::from(7u64).0, 7);
        // String seeds are stable.
        assert_eq!(Seed::from("boop"), Seed::from("boop"));
        assert_ne!(Seed::from("boop"), Seed::from("world"));
        // Wide seeds fold the high bits in.
        assert_ne!(Seed::from(1u128 << 64), Seed::from(0u128));
    }

    #[test]
    fn shard_rng_children_diverge() {
        let mut root = ShardRng::new(42);
        let mut a = root.child(0);
        let mut b = root.child(1);
        let x: u64 = a.random();
        let y: u64 = b.random();
        assert_ne!(x, y);
    }
}
