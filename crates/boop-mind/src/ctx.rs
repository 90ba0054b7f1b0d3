//! `MindCtx` — the borrowed-for-step context handed to every task step.
//!
//! A context is re-derived on every `step_mind` call and lasts exactly
//! one step; tasks cannot cache it (the borrow ends when the step
//! returns).  Everything durable a task wants must go through `memory`
//! or an `EntityRef`.

use boop_core::{EntityId, MindRng, Move, Point, Time, TypeMask};
use boop_entity::{EntityRef, EntityStore, RefScope};
use boop_view::ViewMemory;

use crate::event::{Event, EventKind, InputDatum};
use crate::memory::Memory;
use crate::waitfor::{WaitFor, WaitProbe};

// ── EntityView ────────────────────────────────────────────────────────────────

/// A read-only view of one live entity, produced by [`MindCtx::deref`].
///
/// Liveness was checked at derivation; the view cannot outlive the step.
#[derive(Copy, Clone)]
pub struct EntityView<'a> {
    id: EntityId,
    store: &'a EntityStore,
}

impl<'a> EntityView<'a> {
    pub(crate) fn new(id: EntityId, store: &'a EntityStore) -> Self {
        Self { id, store }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn location(&self) -> Point {
        self.store.location(self.id)
    }

    pub fn z_index(&self) -> i16 {
        self.store.z(self.id)
    }

    pub fn glyph(&self) -> char {
        self.store.glyph(self.id)
    }

    pub fn is_solid(&self) -> bool {
        self.store.has_type(self.id, TypeMask::SOLID)
    }

    pub fn is_visible(&self) -> bool {
        self.store.has_type(self.id, TypeMask::VISIBLE)
    }

    pub fn can_interact(&self) -> bool {
        self.store.has_type(self.id, TypeMask::INTERACT)
    }

    pub fn name(&self) -> Option<&'a str> {
        self.store.name(self.id)
    }
}

// ── MindCtx ───────────────────────────────────────────────────────────────────

/// Everything one task step may observe and decide.
pub struct MindCtx<'a> {
    /// Current simulation time.
    pub time: Time,
    /// This mind's tick counter within the current turn.
    pub tick: u32,

    self_id: EntityId,
    store: &'a EntityStore,
    scope: &'a RefScope,
    events: &'a [Event],
    input_ready: bool,
    view_memory: &'a ViewMemory,
    memory: &'a mut Memory,
    rng: &'a mut MindRng,
    choice: &'a mut Option<Move>,
}

impl<'a> MindCtx<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        time: Time,
        tick: u32,
        self_id: EntityId,
        store: &'a EntityStore,
        scope: &'a RefScope,
        events: &'a [Event],
        input_ready: bool,
        view_memory: &'a ViewMemory,
        memory: &'a mut Memory,
        rng: &'a mut MindRng,
        choice: &'a mut Option<Move>,
    ) -> Self {
        Self {
            time,
            tick,
            self_id,
            store,
            scope,
            events,
            input_ready,
            view_memory,
            memory,
            rng,
            choice,
        }
    }

    // ── Observation ───────────────────────────────────────────────────────

    /// This turn's events, oldest first.
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    /// The payloads of this turn's `input` events, oldest first.
    pub fn inputs(&self) -> impl Iterator<Item = InputDatum> + '_ {
        self.events.iter().filter_map(|e| match e {
            Event::Input { input } => Some(*input),
            _ => None,
        })
    }

    /// Resolve a captured ref to a live entity, or `None` if it was
    /// revoked or its entity destroyed.
    pub fn deref(&self, r: EntityRef) -> Option<EntityView<'a>> {
        let id = self.scope.deref(r, self.store)?;
        Some(EntityView::new(id, self.store))
    }

    /// A read-only view of the entity this mind drives.
    pub fn self_view(&self) -> EntityView<'a> {
        EntityView::new(self.self_id, self.store)
    }

    /// The mind's persistent remembered map.
    pub fn view_memory(&self) -> &ViewMemory {
        self.view_memory
    }

    /// Would `wait_for` let the task keep running right now?
    pub fn is_ready(&self, wait_for: &WaitFor) -> bool {
        wait_for.is_runnable(&WaitProbe {
            time: self.time,
            events: self.events,
            input_ready: self.input_ready,
        })
    }

    /// Shorthand: did an event of `kind` arrive this turn?
    pub fn saw(&self, kind: EventKind) -> bool {
        self.events.iter().any(|e| e.kind() == kind)
    }

    // ── State ─────────────────────────────────────────────────────────────

    pub fn memory(&mut self) -> &mut Memory {
        self.memory
    }

    pub fn rng(&mut self) -> &mut MindRng {
        self.rng
    }

    // ── Decision ──────────────────────────────────────────────────────────

    /// Choose this turn's move, replacing any earlier choice this turn.
    pub fn set_move(&mut self, m: Move) {
        *self.choice = Some(m);
    }

    /// The move currently chosen for this turn, if any.
    pub fn chosen_move(&self) -> Option<Move> {
        *self.choice
    }
}
