//! The `WaitFor` grammar — predicates over turn-local conditions.
//!
//! A task suspends by *returning* a `WaitFor`; there is no implicit
//! suspension inside the runtime.  The scheduler re-evaluates registered
//! waits at the head of every sweep and wakes satisfied minds in id
//! order.

use boop_core::Time;

use crate::error::{MindError, MindResult};
use crate::event::{Event, EventKind};

/// A wait condition: the task resumes once the condition holds.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WaitFor {
    /// Any event of this kind arrived in the entity's buffer.
    Event(EventKind),
    /// The entity's input queue is non-empty.
    Input,
    /// `time ≥ T`.
    Time(Time),
    /// Disjunction; must be non-empty.
    Any(Vec<WaitFor>),
    /// Conjunction; must be non-empty.
    All(Vec<WaitFor>),
}

/// The turn-local facts a wait condition is evaluated against.
#[derive(Copy, Clone)]
pub struct WaitProbe<'a> {
    pub time: Time,
    pub events: &'a [Event],
    pub input_ready: bool,
}

impl WaitFor {
    /// Reject trees outside the grammar.  Empty `Any`/`All` lists are the
    /// one ill-formed shape the type system cannot rule out; a mind that
    /// returns one is reaped with `ok = false`.
    pub fn validate(&self) -> MindResult<()> {
        match self {
            WaitFor::Event(_) | WaitFor::Input | WaitFor::Time(_) => Ok(()),
            WaitFor::Any(subs) | WaitFor::All(subs) => {
                if subs.is_empty() {
                    return Err(MindError::InvalidWaitFor);
                }
                subs.iter().try_for_each(WaitFor::validate)
            }
        }
    }

    /// `true` if the condition currently holds.
    pub fn is_runnable(&self, probe: &WaitProbe<'_>) -> bool {
        match self {
            WaitFor::Event(kind) => probe.events.iter().any(|e| e.kind() == *kind),
            WaitFor::Input => probe.input_ready,
            WaitFor::Time(t) => probe.time >= *t,
            WaitFor::Any(subs) => subs.iter().any(|w| w.is_runnable(probe)),
            WaitFor::All(subs) => subs.iter().all(|w| w.is_runnable(probe)),
        }
    }
}
