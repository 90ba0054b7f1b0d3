//! Shadow-cast field of view.
//!
//! # Algorithm
//!
//! Recursive shadowcasting over eight octants.  Each octant is scanned
//! row by row; opaque cells split the scan into narrower slope bands and
//! everything behind them stays dark.  The scan is exact integer/f64
//! arithmetic with no randomness, so a given world always produces the
//! same view.
//!
//! # Radii
//!
//! Sight intensity falls off as `1/d²`.  Two fixed thresholds derive the
//! two radii:
//!
//! - identified below intensity 0.1 → `floor(sqrt(1/0.1))` = [`IDENTITY_RADIUS`];
//! - visible below intensity 0.001 → `floor(sqrt(1/0.001))` = [`VIEW_RADIUS`].
//!
//! Cells between the two radii are reported with a zero ref ("seen but
//! not identified"); cells beyond `VIEW_RADIUS` are not reported at all.

use rustc_hash::FxHashMap;

use boop_core::{EntityId, Point, Rect};
use boop_entity::EntityRef;

use crate::viewport::{ViewCell, Viewport};

/// Max distance at which a seen entity's ref is minted: `floor(sqrt(1/0.1))`.
pub const IDENTITY_RADIUS: i32 = 3;

/// Max distance at which cells are reported at all: `floor(sqrt(1/0.001))`.
pub const VIEW_RADIUS: i32 = 31;

// ── Raw shadowcast ────────────────────────────────────────────────────────────

/// Octant transforms `(xx, xy, yx, yy)` mapping scan-space to world-space.
const OCTANTS: [(i32, i32, i32, i32); 8] = [
    (1, 0, 0, 1),
    (0, 1, 1, 0),
    (0, -1, 1, 0),
    (-1, 0, 0, 1),
    (-1, 0, 0, -1),
    (0, -1, -1, 0),
    (0, 1, -1, 0),
    (1, 0, 0, -1),
];

/// Visit every cell visible from `origin` within `radius`.
///
/// `is_opaque` reports whether a cell blocks sight; `on_visible` receives
/// each visible cell, possibly more than once where octants overlap.
/// The origin itself is always visited first.
pub fn shadowcast(
    origin: Point,
    radius: i32,
    is_opaque: &impl Fn(Point) -> bool,
    on_visible: &mut impl FnMut(Point),
) {
    on_visible(origin);
    for &(xx, xy, yx, yy) in &OCTANTS {
        cast_octant(origin, radius, 1, 1.0, 0.0, (xx, xy, yx, yy), is_opaque, on_visible);
    }
}

#[allow(clippy::too_many_arguments)]
fn cast_octant(
    origin: Point,
    radius: i32,
    row: i32,
    mut start_slope: f64,
    end_slope: f64,
    mult: (i32, i32, i32, i32),
    is_opaque: &impl Fn(Point) -> bool,
    on_visible: &mut impl FnMut(Point),
) {
    if start_slope < end_slope {
        return;
    }
    let (xx, xy, yx, yy) = mult;
    let radius_sq = radius * radius;
    let mut new_start = start_slope;

    for j in row..=radius {
        let dy = -j;
        let mut blocked = false;
        for dx in -j..=0 {
            let cell = Point::new(
                (origin.x as i32 + dx * xx + dy * xy).clamp(i16::MIN as i32, i16::MAX as i32) as i16,
                (origin.y as i32 + dx * yx + dy * yy).clamp(i16::MIN as i32, i16::MAX as i32) as i16,
            );
            let l_slope = (dx as f64 - 0.5) / (dy as f64 + 0.5);
            let r_slope = (dx as f64 + 0.5) / (dy as f64 - 0.5);
            if start_slope < r_slope {
                continue;
            }
            if end_slope > l_slope {
                break;
            }

            if dx * dx + dy * dy <= radius_sq {
                on_visible(cell);
            }

            if blocked {
                if is_opaque(cell) {
                    new_start = r_slope;
                } else {
                    blocked = false;
                    start_slope = new_start;
                }
            } else if is_opaque(cell) && j < radius {
                blocked = true;
                cast_octant(
                    origin, radius, j + 1, start_slope, l_slope, mult, is_opaque, on_visible,
                );
                new_start = r_slope;
            }
        }
        if blocked {
            break;
        }
    }
}

// ── View assembly ─────────────────────────────────────────────────────────────

/// What the view computer needs to know about one entity at a cell.
#[derive(Copy, Clone, Debug)]
pub struct CellOccupant {
    pub id: EntityId,
    pub z: i16,
    pub glyph: char,
    pub solid: bool,
    pub visible: bool,
}

/// Compute `perceiver`'s viewport.
///
/// `occupancy` maps each populated cell to its occupants.  A cell is
/// opaque if any occupant other than the perceiver is solid.  Among
/// visible occupants the greatest z-index wins, ties broken by greater
/// id, so rendering is deterministic.  `mint` is called once per
/// identified entity to produce the ref stored in the cell — the shard
/// passes a closure minting into the perceiver's scope.
pub fn compute_view(
    perceiver: EntityId,
    origin: Point,
    occupancy: &FxHashMap<Point, Vec<CellOccupant>>,
    mut mint: impl FnMut(EntityId) -> EntityRef,
) -> Viewport<Option<ViewCell>> {
    let mut view = Viewport::new(Rect::around(origin, VIEW_RADIUS as u16));

    let is_opaque = |p: Point| {
        occupancy
            .get(&p)
            .is_some_and(|occ| occ.iter().any(|o| o.solid && o.id != perceiver))
    };

    let identity_sq = IDENTITY_RADIUS * IDENTITY_RADIUS;
    // Octants overlap on their shared edges; memoize so a twice-visited
    // entity still gets exactly one ref.
    let mut minted: FxHashMap<EntityId, EntityRef> = FxHashMap::default();
    let mut on_visible = |p: Point| {
        let top = occupancy.get(&p).and_then(|occ| {
            occ.iter()
                .filter(|o| o.visible)
                .max_by_key(|o| (o.z, o.id))
        });
        let cell = match top {
            None => ViewCell::EMPTY,
            Some(o) => {
                let ent = if p.distance_sq(origin) <= identity_sq {
                    *minted.entry(o.id).or_insert_with(|| mint(o.id))
                } else {
                    EntityRef::NONE
                };
                ViewCell { glyph: o.glyph, ent }
            }
        };
        view.set(p, Some(cell));
    };

    shadowcast(origin, VIEW_RADIUS, &is_opaque, &mut on_visible);
    view
}
