//! `Viewport` — a rectangular window of cells indexed by world position.

use boop_core::{Point, Rect};
use boop_entity::EntityRef;

// ── ViewCell ──────────────────────────────────────────────────────────────────

/// One seen cell of a computed view.
///
/// `glyph` is the drawn glyph of the top-most visible entity, or space for
/// a seen-but-empty cell.  `ent` is a ref minted into the perceiver's
/// scope, or [`EntityRef::NONE`] when the cell lies beyond the identity
/// radius ("seen but not identified") or holds no visible entity.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewCell {
    pub glyph: char,
    pub ent: EntityRef,
}

impl ViewCell {
    pub const EMPTY: ViewCell = ViewCell { glyph: ' ', ent: EntityRef::NONE };
}

// ── Viewport ──────────────────────────────────────────────────────────────────

/// A 2-D window of cells addressed by world coordinates.
///
/// Storage is a dense row-major `Vec` over `bounds`; out-of-bounds reads
/// return `None` and out-of-bounds writes are ignored, so callers can
/// iterate world positions without pre-clipping.
#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport<C> {
    bounds: Rect,
    cells: Vec<C>,
}

impl<C: Clone + Default> Viewport<C> {
    /// An empty viewport covering no cells.
    pub fn empty() -> Self {
        Self { bounds: Rect::default(), cells: Vec::new() }
    }

    /// A viewport covering `bounds`, every cell defaulted.
    pub fn new(bounds: Rect) -> Self {
        Self { bounds, cells: vec![C::default(); bounds.area()] }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    #[inline]
    fn offset(&self, p: Point) -> Option<usize> {
        if !self.bounds.contains(p) {
            return None;
        }
        let dx = (p.x as i32 - self.bounds.x as i32) as usize;
        let dy = (p.y as i32 - self.bounds.y as i32) as usize;
        Some(dy * self.bounds.w as usize + dx)
    }

    pub fn get(&self, p: Point) -> Option<&C> {
        self.offset(p).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, p: Point) -> Option<&mut C> {
        self.offset(p).map(|i| &mut self.cells[i])
    }

    /// Write `cell` at `p`.  Returns `false` (and drops the value) if `p`
    /// is outside the viewport.
    pub fn set(&mut self, p: Point, cell: C) -> bool {
        match self.offset(p) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    /// Row-major iterator over `(position, cell)`.
    pub fn iter(&self) -> impl Iterator<Item = (Point, &C)> {
        self.bounds.cells().zip(self.cells.iter())
    }

    /// Grow (or move) the window to `new_bounds`, explicitly copying every
    /// cell the old and new windows share.  Cells outside the overlap are
    /// defaulted.
    pub fn resize(&mut self, new_bounds: Rect) {
        if new_bounds == self.bounds {
            return;
        }
        let mut next = Viewport::new(new_bounds);
        for (p, cell) in self.iter() {
            if new_bounds.contains(p) {
                next.set(p, cell.clone());
            }
        }
        *self = next;
    }

    /// Grow so the window also covers `extra`, preserving existing cells.
    pub fn grow_to_cover(&mut self, extra: Rect) {
        let union = self.bounds.union(extra);
        self.resize(union);
    }
}
