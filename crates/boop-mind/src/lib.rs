//! `boop-mind` — the task model for `boopworld` minds.
//!
//! A mind is a per-entity task ("thunk") stepped cooperatively by the
//! scheduler.  Each step receives a fresh [`MindCtx`] — observations,
//! memory, RNG, and a move slot — and returns a [`ThunkResult`] saying
//! whether to finish, fail, keep thinking, or suspend on a [`WaitFor`].
//!
//! # What lives here
//!
//! | Module      | Contents                                            |
//! |-------------|-----------------------------------------------------|
//! | [`event`]   | `Event`, `EventKind`, `InputDatum` wire format      |
//! | [`memory`]  | `Memory`: per-mind key → scalar [`Datum`] map       |
//! | [`thunk`]   | `Thunk`, `ThunkResult`                              |
//! | [`waitfor`] | `WaitFor` grammar and its evaluation                |
//! | [`ctx`]     | `MindCtx`, `EntityView` — the borrowed step context |
//! | [`error`]   | `MindError`                                         |

pub mod ctx;
pub mod error;
pub mod event;
pub mod memory;
pub mod thunk;
pub mod waitfor;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use ctx::{EntityView, MindCtx};
pub use error::{MindError, MindResult};
pub use event::{Event, EventKind, InputDatum};
pub use memory::{Datum, Memory};
pub use thunk::{Thunk, ThunkResult};
pub use waitfor::{WaitFor, WaitProbe};
