//! Deterministic per-mind and shard-level RNG wrappers.
//!
//! # Determinism strategy
//!
//! Each mind gets its own independent `SmallRng` seeded by:
//!
//!   seed = shard_seed XOR (entity_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive entity ids uniformly across the seed space.
//! This means:
//!
//! - Minds never share RNG state, so step order cannot leak into their
//!   random sequences.
//! - Creating or destroying other entities does not disturb an existing
//!   mind's stream — runs are reproducible as populations change.
//!
//! The shard itself holds a [`ShardRng`] for everything that is not owned
//! by a single mind (reference salts, naming fallbacks).

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHasher;
use std::hash::{Hash, Hasher};

use crate::EntityId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── Seed ──────────────────────────────────────────────────────────────────────

/// A shard seed, constructible from integers of any width or from a string.
///
/// String seeds are hashed with `FxHasher`, so `Seed::from("boop")` is
/// stable across runs and platforms.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Seed(pub u64);

impl From<u64> for Seed {
    fn from(v: u64) -> Seed {
        Seed(v)
    }
}

impl From<u128> for Seed {
    /// Fold the high half into the low half so every bit participates.
    fn from(v: u128) -> Seed {
        Seed((v as u64) ^ ((v >> 64) as u64).wrapping_mul(MIXING_CONSTANT))
    }
}

impl From<&str> for Seed {
    fn from(s: &str) -> Seed {
        let mut h = FxHasher::default();
        s.hash(&mut h);
        Seed(h.finish())
    }
}

// ── MindRng ───────────────────────────────────────────────────────────────────

/// Per-mind deterministic RNG.
///
/// Created when a mind is armed and stored in its mind state; tasks reach
/// it through their step context.
pub struct MindRng(SmallRng);

impl MindRng {
    /// Seed deterministically from the shard seed and the owning entity.
    pub fn new(shard_seed: u64, ent: EntityId) -> Self {
        let seed = shard_seed ^ (ent.0 as u64).wrapping_mul(MIXING_CONSTANT);
        MindRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Sample a uniformly distributed value of any `Standard`-distributed type.
    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Choose a random element from a slice.  Returns `None` if empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.0)
    }
}

// ── ShardRng ──────────────────────────────────────────────────────────────────

/// Shard-level RNG for state that is not owned by a single mind: reference
/// salts and the auto-naming fallback.
pub struct ShardRng(SmallRng);

impl ShardRng {
    pub fn new(seed: u64) -> Self {
        ShardRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `ShardRng` with a different seed offset — used to give
    /// each ref scope its own salt stream deterministically.
    pub fn child(&mut self, offset: u64) -> ShardRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        ShardRng(SmallRng::seed_from_u64(child_seed))
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }
}
