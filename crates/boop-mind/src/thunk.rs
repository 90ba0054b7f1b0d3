//! Tasks ("thunks") and their step results.

use std::fmt;

use crate::ctx::MindCtx;
use crate::waitfor::WaitFor;

/// A mind's task: called once per step with a freshly derived context.
///
/// Continuation-passing is the replacement mechanism — a step that wants
/// different behaviour next time returns the new closure in its result
/// rather than mutating anything behind the runtime's back.
pub type Thunk = Box<dyn FnMut(&mut MindCtx<'_>) -> ThunkResult>;

/// What a task step decided.
///
/// The step contract, applied by the runtime:
/// - a result carrying `next` replaces the task;
/// - a result carrying `wait_for` parks the mind unless the condition
///   already holds;
/// - a result carrying neither (`Done`, or `Fail` without a fallback)
///   reaps the mind, `ok` mirroring the variant.
pub enum ThunkResult {
    /// Finished successfully; the mind is reaped with `ok = true`.
    Done { reason: Option<String> },
    /// Failed.  With `next`, the replacement task runs on instead of
    /// reaping — a retry or fallback.
    Fail { reason: String, next: Option<Thunk> },
    /// Still thinking: replace the task and step again this turn.
    Continue { next: Thunk, reason: Option<String> },
    /// Suspend until `wait_for` holds (or keep running if it already
    /// does), optionally replacing the task first.
    Wait {
        wait_for: WaitFor,
        next: Option<Thunk>,
        reason: Option<String>,
    },
}

impl ThunkResult {
    pub fn done() -> Self {
        ThunkResult::Done { reason: None }
    }

    pub fn done_because(reason: impl Into<String>) -> Self {
        ThunkResult::Done { reason: Some(reason.into()) }
    }

    pub fn fail(reason: impl Into<String>) -> Self {
        ThunkResult::Fail { reason: reason.into(), next: None }
    }

    pub fn fail_with(reason: impl Into<String>, next: Thunk) -> Self {
        ThunkResult::Fail { reason: reason.into(), next: Some(next) }
    }

    pub fn cont(next: Thunk) -> Self {
        ThunkResult::Continue { next, reason: None }
    }

    pub fn wait(wait_for: WaitFor) -> Self {
        ThunkResult::Wait { wait_for, next: None, reason: None }
    }

    pub fn wait_with(wait_for: WaitFor, next: Thunk) -> Self {
        ThunkResult::Wait { wait_for, next: Some(next), reason: None }
    }

    /// The human-readable reason attached to the result, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            ThunkResult::Done { reason } => reason.as_deref(),
            ThunkResult::Fail { reason, .. } => Some(reason),
            ThunkResult::Continue { reason, .. } => reason.as_deref(),
            ThunkResult::Wait { reason, .. } => reason.as_deref(),
        }
    }
}

impl fmt::Debug for ThunkResult {
    /// Closures are opaque; show the variant, the reason, and whether a
    /// replacement task is attached.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThunkResult::Done { reason } => f.debug_struct("Done").field("reason", reason).finish(),
            ThunkResult::Fail { reason, next } => f
                .debug_struct("Fail")
                .field("reason", reason)
                .field("next", &next.is_some())
                .finish(),
            ThunkResult::Continue { reason, .. } => {
                f.debug_struct("Continue").field("reason", reason).finish()
            }
            ThunkResult::Wait { wait_for, next, reason } => f
                .debug_struct("Wait")
                .field("wait_for", wait_for)
                .field("next", &next.is_some())
                .field("reason", reason)
                .finish(),
        }
    }
}
