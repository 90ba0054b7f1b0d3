//! `boop-view` — perception for the `boopworld` shard.
//!
//! # What lives here
//!
//! | Module       | Contents                                              |
//! |--------------|-------------------------------------------------------|
//! | [`viewport`] | `Viewport<C>` cell grid, `ViewCell`                   |
//! | [`fov`]      | shadow-cast field of view, `compute_view`             |
//! | [`memory`]   | `ViewMemory`: the persistent remembered map per mind  |
//!
//! The senses phase computes a [`Viewport`] of [`ViewCell`]s per perceiver
//! (`fov::compute_view`), hands it to the mind inside a `view` event, and
//! folds it into the mind's [`ViewMemory`].

pub mod fov;
pub mod memory;
pub mod viewport;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use fov::{CellOccupant, IDENTITY_RADIUS, VIEW_RADIUS, compute_view, shadowcast};
pub use memory::{MemoryCell, SeenInfo, ViewMemory};
pub use viewport::{ViewCell, Viewport};
