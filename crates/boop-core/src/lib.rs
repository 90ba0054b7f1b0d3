//! `boop-core` — foundational types for the `boopworld` shard.
//!
//! This crate is a dependency of every other `boop-*` crate.  It
//! intentionally has no `boop-*` dependencies and minimal external ones
//! (only `rand` and `rustc-hash`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                            |
//! |-------------|-----------------------------------------------------|
//! | [`ids`]     | `EntityId`                                          |
//! | [`geom`]    | `Point`, `Rect`, `Move`                             |
//! | [`types`]   | `TypeMask` component bitset                         |
//! | [`time`]    | `Time` turn counter                                 |
//! | [`rng`]     | `MindRng` (per-mind), `ShardRng` (global), `Seed`   |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                  |
//! |---------|---------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public wire types.|

pub mod geom;
pub mod ids;
pub mod rng;
pub mod time;
pub mod types;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use geom::{Move, Point, Rect, WORLD_MAX, WORLD_MIN};
pub use ids::EntityId;
pub use rng::{MindRng, Seed, ShardRng};
pub use time::Time;
pub use types::TypeMask;
