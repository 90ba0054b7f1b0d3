//! The `Shard` and its turn loop.
//!
//! # Turn pipeline
//!
//! One `update()` call processes at most one turn:
//!
//! ```text
//! ① Minds    — wake satisfied waits; sweep runnable minds in id order,
//!              one step per mind per tick, until the turn is ready.
//! ② Rollover — clear event buffers, the control log, and every ref
//!              scope (revoking last turn's refs).
//! ③ Moves    — apply pending moves in id order: translate, or run the
//!              interaction protocol on solid collisions.
//! ④ Senses   — compute each mind's viewport, integrate its view
//!              memory, deliver a `view` event.
//! ⑤ Advance  — `time += 1`, tick counters reset.
//! ⑥ Control  — the caller's hook observes the completed turn.
//! ```
//!
//! Events and refs emitted in ③–④ of turn T are read by minds in ① of
//! turn T+1 and revoked at that turn's rollover.
//!
//! Phases ①–④ honor the wall-clock deadline; progress is checkpointed in
//! `phase` / `next_move` / `next_sense`, and the next `update()` resumes
//! the same turn.  The control hook always runs, deadline or not.

use std::collections::BTreeMap;
use std::time::Instant;

use rustc_hash::FxHashMap;

use boop_core::{EntityId, Move, Point, Rect, Time, TypeMask};
use boop_entity::{ChooseName, EntityRef, EntityStore, RefScope};
use boop_mind::{Event, Thunk};
use boop_spatial::SpatialIndex;
use boop_view::{CellOccupant, SeenInfo, VIEW_RADIUS, compute_view};

use crate::builder::ShardConfig;
use crate::ctl::{EntitySpec, ShardCtl};
use crate::error::{ShardError, ShardResult};
use crate::input::{InputBinder, InputChannel};
use crate::interact::{InteractCtx, InteractFn};
use crate::remnant::Remnant;
use crate::runtime::MindState;

// ── Phases and outcomes ───────────────────────────────────────────────────────

/// Where a turn's processing currently stands.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Phase {
    Minds,
    Moves,
    Senses,
}

/// What one `update()` call accomplished.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum UpdateOutcome {
    /// A turn completed; `time` is the new simulation time.
    Turn { time: Time },
    /// The deadline expired mid-turn; call `update()` again to resume
    /// from the recorded phase.
    Suspended { phase: Phase },
}

// ── Shard ─────────────────────────────────────────────────────────────────────

/// An isolated simulation instance.  Construct via
/// [`ShardBuilder`][crate::ShardBuilder].
pub struct Shard {
    pub(crate) config: ShardConfig,
    pub(crate) store: EntityStore,
    pub(crate) spatial: SpatialIndex,
    pub(crate) minds: BTreeMap<EntityId, MindState>,
    pub(crate) inputs: FxHashMap<EntityId, InputChannel>,
    pub(crate) interactions: FxHashMap<EntityId, InteractFn>,
    pub(crate) root_scope: RefScope,
    pub(crate) rng: boop_core::ShardRng,
    pub(crate) choose_name: Option<ChooseName>,
    pub(crate) clock: Box<dyn FnMut() -> Instant>,

    pub(crate) time: Time,
    pub(crate) tick: u32,

    // Turn-progress checkpoint.
    pub(crate) phase: Phase,
    pub(crate) move_queue: Vec<(EntityId, Move)>,
    pub(crate) next_move: usize,
    pub(crate) sense_queue: Vec<EntityId>,
    pub(crate) next_sense: usize,

    // Turn-local output, cleared at rollover.
    pub(crate) turn_log: Vec<(EntityId, Event)>,
    pub(crate) applied_moves: Vec<(EntityId, Move)>,

    // Accumulates until drained via `ctl.reap()`.
    pub(crate) remnants: Vec<(EntityId, Remnant)>,
}

impl Shard {
    // ── Public surface ────────────────────────────────────────────────────

    pub fn time(&self) -> Time {
        self.time
    }

    pub fn tick(&self) -> u32 {
        self.tick
    }

    /// Advance the simulation, bounded by the configured default timeout,
    /// then invoke `control` exactly once.
    pub fn update<C>(&mut self, control: &mut C) -> ShardResult<UpdateOutcome>
    where
        C: FnMut(&mut ShardCtl<'_>),
    {
        let deadline = self
            .config
            .default_timeout
            .map(|t| (self.clock)() + t);
        self.update_until(deadline, control)
    }

    /// Advance the simulation until one turn completes or `deadline`
    /// passes.  The control hook runs either way — it is the one phase
    /// that is never cancelled.
    pub fn update_until<C>(
        &mut self,
        deadline: Option<Instant>,
        control: &mut C,
    ) -> ShardResult<UpdateOutcome>
    where
        C: FnMut(&mut ShardCtl<'_>),
    {
        let outcome = self.advance(deadline);
        let mut ctl = ShardCtl::new(self);
        control(&mut ctl);
        Ok(outcome)
    }

    /// Run `f` against the control surface without advancing the
    /// simulation — the read-only entry point for renderers and tests.
    pub fn inspect<R>(&mut self, f: impl FnOnce(&mut ShardCtl<'_>) -> R) -> R {
        let mut ctl = ShardCtl::new(self);
        f(&mut ctl)
    }

    /// Run until `n` turns have completed — a convenience for tests and
    /// demos.  Suspended slices simply continue the count-in-progress.
    pub fn run_turns<C>(&mut self, n: u64, control: &mut C) -> ShardResult<()>
    where
        C: FnMut(&mut ShardCtl<'_>),
    {
        let mut completed = 0;
        while completed < n {
            if let UpdateOutcome::Turn { .. } = self.update(control)? {
                completed += 1;
            }
        }
        Ok(())
    }

    // ── Turn loop ─────────────────────────────────────────────────────────

    fn past_deadline(&mut self, deadline: Option<Instant>) -> bool {
        deadline.is_some_and(|d| (self.clock)() > d)
    }

    fn advance(&mut self, deadline: Option<Instant>) -> UpdateOutcome {
        loop {
            match self.phase {
                Phase::Minds => {
                    if let Some(outcome) = self.run_minds(deadline) {
                        return outcome;
                    }
                    self.rollover();
                    if self.time.0 % self.config.move_rate == 0 {
                        // Drain choices in ascending id order.
                        self.move_queue = self
                            .minds
                            .iter_mut()
                            .filter_map(|(id, s)| s.choice.take().map(|m| (*id, m)))
                            .collect();
                        self.next_move = 0;
                        self.phase = Phase::Moves;
                    } else {
                        // Off-cycle turn: choices are held for the next
                        // move cycle; perception still runs.
                        self.begin_senses();
                    }
                }
                Phase::Moves => {
                    while self.next_move < self.move_queue.len() {
                        if self.past_deadline(deadline) {
                            return UpdateOutcome::Suspended { phase: Phase::Moves };
                        }
                        let (ent, mv) = self.move_queue[self.next_move];
                        self.next_move += 1;
                        self.apply_move(ent, mv);
                    }
                    self.move_queue.clear();
                    self.begin_senses();
                }
                Phase::Senses => {
                    while self.next_sense < self.sense_queue.len() {
                        if self.past_deadline(deadline) {
                            return UpdateOutcome::Suspended { phase: Phase::Senses };
                        }
                        let id = self.sense_queue[self.next_sense];
                        self.next_sense += 1;
                        self.compute_sense(id);
                    }
                    self.sense_queue.clear();
                    return self.finish_turn();
                }
            }
        }
    }

    /// Sweep minds until the turn is ready.  Returns `Some(outcome)` to
    /// suspend, `None` when the turn is ready.
    fn run_minds(&mut self, deadline: Option<Instant>) -> Option<UpdateOutcome> {
        loop {
            if self.past_deadline(deadline) {
                return Some(UpdateOutcome::Suspended { phase: Phase::Minds });
            }
            self.wake_minds();
            let runnable = self.runnable_minds();
            if runnable.is_empty() {
                if self.turn_ready() {
                    return None;
                }
                // Everyone ran this tick; open the next one.  If nothing
                // will ever run again the turn completes trivially.
                self.tick += 1;
                if self.minds.values().all(|s| s.wait_for.is_some()) {
                    return None;
                }
                continue;
            }
            for id in runnable {
                if self.past_deadline(deadline) {
                    return Some(UpdateOutcome::Suspended { phase: Phase::Minds });
                }
                self.step_mind(id);
            }
            if self.turn_ready() {
                return None;
            }
        }
    }

    /// A turn is ready when every runnable mind has been stepped at least
    /// once this turn and every gate entity (the `update_waits_for`
    /// filter) has either chosen a move or parked on a wait.  A player
    /// whose input queue is empty is parked, so autonomous minds keep
    /// the world moving without them.
    fn turn_ready(&mut self) -> bool {
        if self
            .minds
            .values()
            .any(|s| s.wait_for.is_none() && !s.stepped_this_turn)
        {
            return false;
        }
        let gated = self.store.ids_matching(self.config.update_waits_for);
        gated.into_iter().all(|id| match self.minds.get(&id) {
            Some(s) => s.choice.is_some() || s.wait_for.is_some(),
            None => true,
        })
    }

    /// The turn boundary for turn-local data: last turn's events have
    /// been read by every mind that will read them, so buffers, logs,
    /// and every ref scope are cleared before new ones are minted.
    fn rollover(&mut self) {
        self.turn_log.clear();
        self.applied_moves.clear();
        self.root_scope.clear();
        for state in self.minds.values_mut() {
            state.events.clear();
            state.scope.clear();
        }
    }

    fn begin_senses(&mut self) {
        self.sense_queue = self.minds.keys().copied().collect();
        self.next_sense = 0;
        self.phase = Phase::Senses;
    }

    fn finish_turn(&mut self) -> UpdateOutcome {
        self.time = self.time + 1;
        self.tick = 0;
        for state in self.minds.values_mut() {
            state.exec_tick = 0;
            state.stepped_this_turn = false;
        }
        self.phase = Phase::Minds;
        UpdateOutcome::Turn { time: self.time }
    }

    // ── Move application ──────────────────────────────────────────────────

    fn apply_move(&mut self, ent: EntityId, mv: Move) {
        if !self.store.is_allocated(ent) {
            return; // destroyed after choosing
        }
        if !self.store.has_type(ent, TypeMask::MIND) {
            let err = ShardError::InvalidMove { ent };
            self.reap(ent, true, false, Some(err.to_string()), None);
            return;
        }
        let from = self.store.location(ent);
        self.reconcile_spatial();

        if mv == Move::Stay {
            let at_here = self.spatial.at(from);
            let here = self.interact_refs(ent, &at_here);
            self.deliver(ent, Event::Inspect { here });
            self.applied_moves.push((ent, mv));
            return;
        }

        let to = mv.apply(from);
        let occupants = self.spatial.at(to);
        let mover_solid = self.store.has_type(ent, TypeMask::SOLID);
        let blockers: Vec<EntityId> = occupants
            .iter()
            .copied()
            .filter(|&o| o != ent && self.store.has_type(o, TypeMask::SOLID))
            .collect();

        if mover_solid && !blockers.is_empty() {
            self.run_interaction(ent, blockers);
            return;
        }

        self.store.set_location(ent, to);
        self.spatial.mark_dirty(ent);
        let here = self.interact_refs(ent, &occupants);
        self.deliver(ent, Event::Move { from, to, here });
        self.applied_moves.push((ent, mv));
    }

    /// Refs (minted for `perceiver`) of the INTERACT entities among
    /// `ids`, excluding the perceiver itself.
    fn interact_refs(&mut self, perceiver: EntityId, ids: &[EntityId]) -> Vec<EntityRef> {
        let targets: Vec<EntityId> = ids
            .iter()
            .copied()
            .filter(|&id| id != perceiver && self.store.has_type(id, TypeMask::INTERACT))
            .collect();
        self.mint_for(perceiver, &targets)
    }

    /// Mint refs for `ids` into `perceiver`'s scope (falling back to the
    /// root scope for mindless perceivers).
    fn mint_for(&mut self, perceiver: EntityId, ids: &[EntityId]) -> Vec<EntityRef> {
        let Shard { minds, store, root_scope, .. } = self;
        match minds.get_mut(&perceiver) {
            Some(state) => ids
                .iter()
                .filter_map(|&id| {
                    store
                        .generation(id)
                        .map(|g| state.scope.mint(id, g, Some(&*root_scope)))
                })
                .collect(),
            None => ids
                .iter()
                .filter_map(|&id| store.generation(id).map(|g| root_scope.mint(id, g, None)))
                .collect(),
        }
    }

    /// Push an event to `ent`'s buffer and, unless it is sensory-private
    /// (`view`), to the control log.
    pub(crate) fn deliver(&mut self, ent: EntityId, event: Event) {
        let log_it = !matches!(event, Event::View { .. });
        match self.minds.get_mut(&ent) {
            Some(state) => {
                if log_it {
                    self.turn_log.push((ent, event.clone()));
                }
                state.events.push(event);
            }
            None => {
                if log_it {
                    self.turn_log.push((ent, event));
                }
            }
        }
    }

    /// Solid collision: rank candidates, pick the subject, and run its
    /// handler — or the default `hit`/`hitBy` protocol.
    fn run_interaction(&mut self, mover: EntityId, mut blockers: Vec<EntityId>) {
        blockers.sort_unstable_by_key(|&id| {
            (std::cmp::Reverse(self.store.z(id)), std::cmp::Reverse(id))
        });
        let subject = blockers[0];

        match self.interactions.get(&subject).cloned() {
            Some(handler) => {
                let mut queued = None;
                {
                    let mut ictx = InteractCtx::new(
                        mover,
                        subject,
                        self.time,
                        &mut self.store,
                        &mut queued,
                    );
                    (&mut *handler.borrow_mut())(&mut ictx);
                }
                if let Some((to_mover, to_subject)) = queued {
                    self.deliver(mover, to_mover);
                    self.deliver(subject, to_subject);
                }
            }
            None => {
                let target = self
                    .mint_for(mover, &[subject])
                    .pop()
                    .unwrap_or(EntityRef::NONE);
                self.deliver(mover, Event::Hit { target });
                if self.store.has_type(subject, TypeMask::MIND) {
                    let entity = self
                        .mint_for(subject, &[mover])
                        .pop()
                        .unwrap_or(EntityRef::NONE);
                    self.deliver(subject, Event::HitBy { entity });
                }
            }
        }
    }

    // ── Senses ────────────────────────────────────────────────────────────

    fn compute_sense(&mut self, id: EntityId) {
        if !self.store.is_allocated(id) || !self.minds.contains_key(&id) {
            return;
        }
        let origin = self.store.location(id);
        self.reconcile_spatial();

        let mut occupancy: FxHashMap<Point, Vec<CellOccupant>> = FxHashMap::default();
        for (p, eid) in self.spatial.within(Rect::around(origin, VIEW_RADIUS as u16)) {
            let t = self.store.types(eid);
            occupancy.entry(p).or_default().push(CellOccupant {
                id: eid,
                z: self.store.z(eid),
                glyph: self.store.glyph(eid),
                solid: t.contains(TypeMask::SOLID),
                visible: t.contains(TypeMask::VISIBLE),
            });
        }

        let time = self.time;
        let Shard { minds, store, root_scope, .. } = self;
        let state = minds.get_mut(&id).expect("checked above");
        let MindState { scope, view_memory, events, .. } = state;

        let view = compute_view(id, origin, &occupancy, |eid| match store.generation(eid) {
            Some(g) => scope.mint(eid, g, Some(&*root_scope)),
            None => EntityRef::NONE,
        });

        view_memory.integrate(&view, time, |r| {
            let eid = scope.deref(r, store)?;
            Some(SeenInfo {
                name: store.name(eid).map(str::to_owned),
                blocked: store.has_type(eid, TypeMask::SOLID),
                can_interact: store.has_type(eid, TypeMask::INTERACT),
            })
        });

        events.push(Event::View { view });
    }

    pub(crate) fn reconcile_spatial(&mut self) {
        if self.spatial.needs_reconcile() {
            let Shard { spatial, store, .. } = self;
            spatial.reconcile(|id| store.is_allocated(id).then(|| store.location(id)));
        }
    }

    // ── Entity lifecycle (used by the control surface) ────────────────────

    /// Create an entity as a child of `proto`, inheriting unset fields.
    pub(crate) fn create_entity(
        &mut self,
        proto: EntityId,
        spec: EntitySpec,
    ) -> ShardResult<EntityId> {
        // Read the prototype while it is live; children own copies.
        let proto_glyph = self.store.glyph(proto);
        let proto_z = self.store.z(proto);
        let proto_solid = self.store.has_type(proto, TypeMask::SOLID);
        let proto_visible = self.store.has_type(proto, TypeMask::VISIBLE);
        let proto_interact = self.interactions.get(&proto).cloned();

        let id = self.store.alloc()?;
        self.store
            .set_location(id, spec.location.unwrap_or_default());
        self.store.set_z(id, spec.z_index.unwrap_or(proto_z));
        self.store.set_glyph(id, spec.glyph.unwrap_or(proto_glyph));

        let mut types = TypeMask::EMPTY
            .with(TypeMask::SOLID, spec.is_solid.unwrap_or(proto_solid))
            .with(TypeMask::VISIBLE, spec.is_visible.unwrap_or(proto_visible));
        let interact = spec.interact.or(proto_interact);
        types = types.with(TypeMask::INTERACT, interact.is_some());
        self.store.set_type(id, types);
        if let Some(handler) = interact {
            self.interactions.insert(id, handler);
        }

        match spec.name {
            Some(name) => {
                if let Err(e) = self.store.set_name(id, &name) {
                    // Roll the slot back so a naming conflict leaks nothing.
                    self.interactions.remove(&id);
                    self.store.free(id);
                    return Err(e.into());
                }
            }
            None => {
                let glyph = self.store.glyph(id);
                let chosen = self
                    .choose_name
                    .as_mut()
                    .and_then(|f| f(self.store.names(), id, glyph));
                if let Some(name) = chosen {
                    if let Err(e) = self.store.set_name(id, &name) {
                        self.interactions.remove(&id);
                        self.store.free(id);
                        return Err(e.into());
                    }
                }
            }
        }

        if let Some(thunk) = spec.mind {
            self.arm_mind(id, thunk);
        }

        self.spatial.mark_dirty(id);
        Ok(id)
    }

    /// Destroy `id`, running component teardown in the fixed order
    /// INPUT, MIND, INTERACT.  The root and already-dead ids are no-ops.
    pub(crate) fn destroy_entity(&mut self, id: EntityId) {
        if id == EntityId::ROOT || !self.store.is_allocated(id) {
            return;
        }
        // INPUT: dropping the receiver revokes every binder.
        self.inputs.remove(&id);
        // MIND: a live task becomes a remnant.
        if self.minds.contains_key(&id) {
            self.reap(id, false, true, None, None);
        }
        // INTERACT.
        self.interactions.remove(&id);

        self.spatial.mark_dirty(id);
        self.store.free(id);
    }

    /// (Re-)arm the task runtime for `id`.
    pub(crate) fn arm_mind(&mut self, id: EntityId, thunk: Thunk) {
        let rng = boop_core::MindRng::new(self.config.seed.0, id);
        let scope = RefScope::new(self.rng.child(id.0 as u64));
        self.minds.insert(id, MindState::new(thunk, rng, scope));
        self.store.update_type(id, |t| t | TypeMask::MIND);
    }

    /// Establish a fresh input binding for `id`, revoking any prior one.
    pub(crate) fn bind_input(&mut self, id: EntityId) -> InputBinder {
        let (channel, binder) = InputChannel::open();
        self.inputs.insert(id, channel);
        self.store.update_type(id, |t| t | TypeMask::INPUT);
        binder
    }
}
