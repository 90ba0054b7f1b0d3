//! The event wire format delivered to minds and to the control surface.
//!
//! Events are turn-local: a buffer is filled during move application and
//! sense distribution, read by its mind on the following turn's steps,
//! and cleared at rollover.  Timestamps are external metadata — the
//! control layer knows the turn it drained a log from.

use boop_core::Point;
use boop_entity::EntityRef;
use boop_view::{ViewCell, Viewport};

/// One datum pushed through an input binder; drained into `Input` events.
pub type InputDatum = char;

/// An observation delivered to an entity's turn-local event buffer.
///
/// `here` lists refs of `INTERACT`-flagged entities at the relevant cell,
/// excluding the observer itself.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Event {
    /// The observer bumped into `target`.
    Hit { target: EntityRef },
    /// `entity` bumped into the observer.
    HitBy { entity: EntityRef },
    /// The observer moved `from` → `to`.
    Move { from: Point, to: Point, here: Vec<EntityRef> },
    /// The observer stayed put and looked around.
    Inspect { here: Vec<EntityRef> },
    /// The observer's computed viewport for this turn.
    View { view: Viewport<Option<ViewCell>> },
    /// One datum drained from the observer's input queue.
    Input { input: InputDatum },
}

impl Event {
    #[inline]
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Hit { .. } => EventKind::Hit,
            Event::HitBy { .. } => EventKind::HitBy,
            Event::Move { .. } => EventKind::Move,
            Event::Inspect { .. } => EventKind::Inspect,
            Event::View { .. } => EventKind::View,
            Event::Input { .. } => EventKind::Input,
        }
    }
}

/// Discriminant-only event type, used by wait conditions.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    Hit,
    HitBy,
    Move,
    Inspect,
    View,
    Input,
}
