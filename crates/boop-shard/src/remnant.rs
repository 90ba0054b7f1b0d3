//! `Remnant` — the preserved final state of a reaped mind.
//!
//! Reaping happens when a task finishes (`done`/`fail`), when the step
//! boundary catches a component-level error, or when a minded entity is
//! destroyed.  The control hook drains remnants via `ctl.reap()`; until
//! drained they accumulate across turns.

use boop_core::{Move, Time};
use boop_mind::{Event, Memory, Thunk, WaitFor};

/// Everything worth keeping from a mind that no longer exists.
pub struct Remnant {
    /// `true` if the task itself returned (done or fail); `false` when
    /// the entity was destroyed out from under a live task.
    pub done: bool,
    /// `false` for failures and step-boundary errors.
    pub ok: bool,
    /// The reason attached to the final result or error, if any.
    pub reason: Option<String>,
    /// The last task closure, for callers that want to re-arm it
    /// elsewhere.  `None` only when the mind had no task to begin with.
    pub thunk: Option<Thunk>,
    /// The wait condition the mind was parked on, if it was parked.
    pub wait_for: Option<WaitFor>,
    /// Simulation time at the moment of reaping.
    pub time: Time,
    /// The move the mind had chosen for the unfinished turn, if any.
    pub move_choice: Option<Move>,
    /// The mind's turn-local event buffer at reap time.
    pub events: Vec<Event>,
    /// The mind's persistent memory map, cloned intact.
    pub memory: Memory,
}

impl std::fmt::Debug for Remnant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Remnant")
            .field("done", &self.done)
            .field("ok", &self.ok)
            .field("reason", &self.reason)
            .field("thunk", &self.thunk.is_some())
            .field("wait_for", &self.wait_for)
            .field("time", &self.time)
            .field("move_choice", &self.move_choice)
            .field("events", &self.events.len())
            .field("memory", &self.memory)
            .finish()
    }
}
