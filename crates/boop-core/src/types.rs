//! The compact component bitset stored per entity.
//!
//! Five flags cover every dense behaviour the shard dispatches on; sparse
//! components (name, mind state, input binding, interaction handler) are
//! keyed separately and mirrored here so type queries stay O(1).

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign, Not, Sub};

/// A set of per-entity component flags.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeMask(pub u8);

impl TypeMask {
    pub const EMPTY: TypeMask = TypeMask(0);

    /// Blocks movement; participates in collision.
    pub const SOLID: TypeMask = TypeMask(1 << 0);
    /// Renders a glyph; eligible for field-of-view reporting.
    pub const VISIBLE: TypeMask = TypeMask(1 << 1);
    /// Carries an interaction handler; listed in `here[]` event payloads.
    pub const INTERACT: TypeMask = TypeMask(1 << 2);
    /// Driven by a task; stepped by the scheduler each turn.
    pub const MIND: TypeMask = TypeMask(1 << 3);
    /// Owns an input queue fed through an `InputBinder`.
    pub const INPUT: TypeMask = TypeMask(1 << 4);

    /// `true` if every flag in `flags` is set.
    #[inline]
    pub fn contains(self, flags: TypeMask) -> bool {
        self.0 & flags.0 == flags.0
    }

    /// `true` if at least one flag in `filter` is set — the test used by
    /// type-index membership.
    #[inline]
    pub fn intersects(self, filter: TypeMask) -> bool {
        self.0 & filter.0 != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Copy with `flags` set or cleared according to `on`.
    #[inline]
    pub fn with(self, flags: TypeMask, on: bool) -> TypeMask {
        if on { self | flags } else { self - flags }
    }
}

impl BitOr for TypeMask {
    type Output = TypeMask;
    #[inline]
    fn bitor(self, rhs: TypeMask) -> TypeMask {
        TypeMask(self.0 | rhs.0)
    }
}

impl BitOrAssign for TypeMask {
    #[inline]
    fn bitor_assign(&mut self, rhs: TypeMask) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for TypeMask {
    type Output = TypeMask;
    #[inline]
    fn bitand(self, rhs: TypeMask) -> TypeMask {
        TypeMask(self.0 & rhs.0)
    }
}

impl Sub for TypeMask {
    type Output = TypeMask;
    /// Set difference: flags in `self` but not in `rhs`.
    #[inline]
    fn sub(self, rhs: TypeMask) -> TypeMask {
        TypeMask(self.0 & !rhs.0)
    }
}

impl Not for TypeMask {
    type Output = TypeMask;
    #[inline]
    fn not(self) -> TypeMask {
        TypeMask(!self.0)
    }
}

impl fmt::Display for TypeMask {
    /// One letter per set flag, e.g. `SV-M-` for a solid visible mind.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const LETTERS: [(TypeMask, char); 5] = [
            (TypeMask::SOLID, 'S'),
            (TypeMask::VISIBLE, 'V'),
            (TypeMask::INTERACT, 'I'),
            (TypeMask::MIND, 'M'),
            (TypeMask::INPUT, 'N'),
        ];
        for (flag, letter) in LETTERS {
            let c = if self.contains(flag) { letter } else { '-' };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}
