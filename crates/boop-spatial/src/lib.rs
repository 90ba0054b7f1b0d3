//! `boop-spatial` — point and rectangle queries over entity positions.
//!
//! The shard mutates positions freely during a turn; queries are rare by
//! comparison (moves and senses).  The index therefore reconciles lazily:
//! mutations only record the affected id in a dirty set, and the first
//! query after a mutation batch folds the dirty ids into the R-tree.

pub mod index;

#[cfg(test)]
mod tests;

pub use index::SpatialIndex;
