//! Simulation time model.
//!
//! # Design
//!
//! Simulated time is a monotonically increasing turn counter.  Within a
//! turn, the scheduler sweeps cooperating minds in numbered *ticks*; the
//! tick counter is plain `u32` state owned by the shard and resets to 0
//! whenever `Time` advances, so it does not get a wrapper type here.
//!
//! Using an integer turn as the canonical time unit means all wait-until
//! arithmetic is exact and comparisons are O(1).

use std::fmt;

/// An absolute simulation turn counter.
///
/// Stored as `u64` to avoid overflow: at one turn per millisecond of wall
/// time, a u64 lasts ~585 million years.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Time(pub u64);

impl Time {
    /// The build epoch: the world is populated while `time == ZERO`.
    pub const ZERO: Time = Time(0);

    /// Return the turn `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Time {
        Time(self.0 + n)
    }

    /// Turns elapsed from `earlier` to `self`.
    ///
    /// # Panics
    /// Panics in debug mode if `earlier > self`.
    #[inline]
    pub fn since(self, earlier: Time) -> u64 {
        self.0 - earlier.0
    }
}

impl std::ops::Add<u64> for Time {
    type Output = Time;
    #[inline]
    fn add(self, rhs: u64) -> Time {
        Time(self.0 + rhs)
    }
}

impl std::ops::Sub for Time {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Time) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}
