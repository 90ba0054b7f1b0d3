//! The interaction protocol run when a solid mover bumps a solid cell.
//!
//! Candidates at the destination are ranked by descending z-index (ties
//! by descending id); the top-most is the *subject*.  If the subject has
//! a handler it runs with an ephemeral [`InteractCtx`]; otherwise the
//! default protocol emits a `hit`/`hitBy` pair.  Either way the mover
//! stays put.
//!
//! The `queue_events` capability dies with the context: the borrow ends
//! when the handler returns, so a handler cannot smuggle the ability to
//! inject events into later turns.

use std::cell::RefCell;
use std::rc::Rc;

use boop_core::{EntityId, Time, TypeMask};
use boop_entity::EntityStore;
use boop_mind::Event;

/// A subject's interaction handler.
///
/// Shared via `Rc` so prototype children can inherit their prototype's
/// handler without cloning the closure.
pub type InteractFn = Rc<RefCell<dyn FnMut(&mut InteractCtx<'_>)>>;

/// Wrap a closure as an [`InteractFn`].
pub fn interact_fn(f: impl FnMut(&mut InteractCtx<'_>) + 'static) -> InteractFn {
    Rc::new(RefCell::new(f))
}

/// The ephemeral context a collision handler runs against.
pub struct InteractCtx<'a> {
    mover: EntityId,
    subject: EntityId,
    time: Time,
    store: &'a mut EntityStore,
    queued: &'a mut Option<(Event, Event)>,
}

impl<'a> InteractCtx<'a> {
    pub(crate) fn new(
        mover: EntityId,
        subject: EntityId,
        time: Time,
        store: &'a mut EntityStore,
        queued: &'a mut Option<(Event, Event)>,
    ) -> Self {
        Self { mover, subject, time, store, queued }
    }

    pub fn time(&self) -> Time {
        self.time
    }

    pub fn mover(&self) -> EntityId {
        self.mover
    }

    pub fn subject(&self) -> EntityId {
        self.subject
    }

    // ── Subject state ─────────────────────────────────────────────────────

    pub fn subject_is_solid(&self) -> bool {
        self.store.has_type(self.subject, TypeMask::SOLID)
    }

    pub fn subject_glyph(&self) -> char {
        self.store.glyph(self.subject)
    }

    pub fn subject_name(&self) -> Option<&str> {
        self.store.name(self.subject)
    }

    /// Toggle the subject's solidity — how a door opens.
    pub fn set_subject_solid(&mut self, solid: bool) {
        self.store
            .update_type(self.subject, |t| t.with(TypeMask::SOLID, solid));
    }

    pub fn set_subject_glyph(&mut self, glyph: char) {
        self.store.set_glyph(self.subject, glyph);
    }

    // ── Mover state (read-only) ───────────────────────────────────────────

    pub fn mover_glyph(&self) -> char {
        self.store.glyph(self.mover)
    }

    pub fn mover_name(&self) -> Option<&str> {
        self.store.name(self.mover)
    }

    // ── Event capability ──────────────────────────────────────────────────

    /// Replace the default `hit`/`hitBy` pair: `to_mover` lands in the
    /// mover's buffer, `to_subject` in the subject's.  Calling this twice
    /// keeps the last pair.
    pub fn queue_events(&mut self, to_mover: Event, to_subject: Event) {
        *self.queued = Some((to_mover, to_subject));
    }
}
