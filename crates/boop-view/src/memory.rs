//! `ViewMemory` — a mind's persistent, merged viewport across turns.
//!
//! Each integration grows the remembered window to cover the incoming
//! view and overwrites the cells the view actually saw.  Identified cells
//! carry full attribution (name, solidity, interactability); unidentified
//! glyphs only keep their previous attribution while the glyph still
//! matches what was remembered.

use boop_core::{Point, Rect, Time};
use boop_entity::EntityRef;

use crate::viewport::{ViewCell, Viewport};

// ── MemoryCell ────────────────────────────────────────────────────────────────

/// One remembered cell.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemoryCell {
    pub glyph: char,
    pub last_seen: Time,
    pub ent: EntityRef,
    pub name: Option<String>,
    pub blocked: bool,
    pub can_interact: bool,
    /// `true` while the attribution fields above are trusted.
    pub known: bool,
}

/// Attribution of an identified entity, resolved by the shard at
/// integration time.
#[derive(Clone, Debug)]
pub struct SeenInfo {
    pub name: Option<String>,
    pub blocked: bool,
    pub can_interact: bool,
}

// ── ViewMemory ────────────────────────────────────────────────────────────────

/// The growable remembered map owned by each mind.
#[derive(Default)]
pub struct ViewMemory {
    cells: Viewport<Option<MemoryCell>>,
}

impl ViewMemory {
    pub fn new() -> Self {
        Self { cells: Viewport::empty() }
    }

    pub fn bounds(&self) -> Rect {
        self.cells.bounds()
    }

    pub fn get(&self, p: Point) -> Option<&MemoryCell> {
        self.cells.get(p).and_then(|c| c.as_ref())
    }

    /// The remembered glyph at `p`, or space if nothing is remembered.
    pub fn glyph_at(&self, p: Point) -> char {
        self.get(p).map_or(' ', |c| c.glyph)
    }

    /// Fold one seen viewport into the remembered map.
    ///
    /// `resolve` maps an identified ref to its attribution; it returns
    /// `None` for [`EntityRef::NONE`] and for refs that no longer resolve.
    pub fn integrate(
        &mut self,
        view: &Viewport<Option<ViewCell>>,
        time: Time,
        resolve: impl Fn(EntityRef) -> Option<SeenInfo>,
    ) {
        self.cells.grow_to_cover(view.bounds());
        for (p, seen) in view.iter() {
            let Some(seen) = seen else { continue };
            let next = match resolve(seen.ent) {
                Some(info) => MemoryCell {
                    glyph: seen.glyph,
                    last_seen: time,
                    ent: seen.ent,
                    name: info.name,
                    blocked: info.blocked,
                    can_interact: info.can_interact,
                    known: true,
                },
                None if seen.glyph != ' ' => {
                    // Unidentified glyph: keep the old attribution only
                    // while it still looks the same.
                    match self.get(p).filter(|prior| prior.known && prior.glyph == seen.glyph) {
                        Some(prior) => MemoryCell {
                            glyph: seen.glyph,
                            last_seen: time,
                            ..prior.clone()
                        },
                        None => MemoryCell {
                            glyph: seen.glyph,
                            last_seen: time,
                            ent: EntityRef::NONE,
                            name: None,
                            blocked: false,
                            can_interact: false,
                            known: false,
                        },
                    }
                }
                None => MemoryCell {
                    glyph: ' ',
                    last_seen: time,
                    ent: EntityRef::NONE,
                    name: None,
                    blocked: false,
                    can_interact: false,
                    known: false,
                },
            };
            self.cells.set(p, Some(next));
        }
    }

    /// Render `rect` as one string of glyph rows — a debugging and test
    /// convenience; cells never remembered come out as spaces.
    pub fn render(&self, rect: Rect) -> String {
        let mut out = String::with_capacity(rect.area() + rect.h as usize);
        for y in rect.y as i32..rect.bottom() {
            for x in rect.x as i32..rect.right() {
                out.push(self.glyph_at(Point::new(x as i16, y as i16)));
            }
            out.push('\n');
        }
        out
    }
}
