//! The R-tree index and its dirty-set reconciliation.

use rstar::{AABB, PointDistance, RTree, RTreeObject};
use rustc_hash::{FxHashMap, FxHashSet};

use boop_core::{EntityId, Point, Rect};

// ── R-tree entry ──────────────────────────────────────────────────────────────

/// Entry stored in the R-tree: a widened `[x, y]` cell with the occupying
/// entity.  Coordinates are widened to `i32` because the tree computes
/// squared distances, which overflow `i16` even at modest ranges.
#[derive(Clone, PartialEq, Debug)]
struct CellEntry {
    point: [i32; 2],
    id: EntityId,
}

impl RTreeObject for CellEntry {
    type Envelope = AABB<[i32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for CellEntry {
    fn distance_2(&self, point: &[i32; 2]) -> i32 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }

    fn contains_point(&self, point: &[i32; 2]) -> bool {
        self.point == *point
    }
}

#[inline]
fn widen(p: Point) -> [i32; 2] {
    [p.x as i32, p.y as i32]
}

// ── SpatialIndex ──────────────────────────────────────────────────────────────

/// Point and rectangle queries over entity positions.
///
/// Mutations (`mark_dirty`) are O(1); the first query after a batch of
/// mutations pays the reconciliation cost.  The `mirror` map records what
/// the tree currently believes so stale entries can be removed without a
/// tree scan.
#[derive(Default)]
pub struct SpatialIndex {
    tree: RTree<CellEntry>,
    mirror: FxHashMap<EntityId, [i32; 2]>,
    dirty: FxHashSet<EntityId>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `id` was allocated, destroyed, or moved since the last
    /// reconciliation.
    pub fn mark_dirty(&mut self, id: EntityId) {
        self.dirty.insert(id);
    }

    /// `true` if a query would be answered from stale data.
    pub fn needs_reconcile(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Fold the dirty set into the tree.  `live_pos` reports the current
    /// position of a live entity, or `None` for a destroyed one.
    pub fn reconcile(&mut self, live_pos: impl Fn(EntityId) -> Option<Point>) {
        for id in std::mem::take(&mut self.dirty) {
            let old = self.mirror.get(&id).copied();
            let new = live_pos(id).map(widen);
            if old == new {
                continue;
            }
            if let Some(point) = old {
                self.tree.remove(&CellEntry { point, id });
                self.mirror.remove(&id);
            }
            if let Some(point) = new {
                self.tree.insert(CellEntry { point, id });
                self.mirror.insert(id, point);
            }
        }
    }

    /// Entities at exactly `p`, in ascending id order.
    ///
    /// The index must be reconciled first; the shard reconciles on the
    /// first query of each turn.
    pub fn at(&self, p: Point) -> Vec<EntityId> {
        debug_assert!(self.dirty.is_empty(), "query against stale spatial index");
        let mut ids: Vec<EntityId> = self
            .tree
            .locate_all_at_point(&widen(p))
            .map(|e| e.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Entities whose position falls inside `r`, sorted row-major by cell
    /// and by id within a cell.
    pub fn within(&self, r: Rect) -> Vec<(Point, EntityId)> {
        debug_assert!(self.dirty.is_empty(), "query against stale spatial index");
        if r.is_empty() {
            return Vec::new();
        }
        let envelope = AABB::from_corners(
            [r.x as i32, r.y as i32],
            [r.right() - 1, r.bottom() - 1],
        );
        let mut hits: Vec<(Point, EntityId)> = self
            .tree
            .locate_in_envelope(&envelope)
            .map(|e| (Point::new(e.point[0] as i16, e.point[1] as i16), e.id))
            .collect();
        hits.sort_unstable_by_key(|(p, id)| (p.y, p.x, *id));
        hits
    }

    /// Number of indexed entities.
    pub fn len(&self) -> usize {
        self.mirror.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mirror.is_empty()
    }
}
