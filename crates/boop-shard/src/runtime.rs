//! The task runtime: mind state, wakeups, cooperative stepping, reaping.
//!
//! # Step contract
//!
//! `step_mind` invokes the task with a freshly derived [`MindCtx`] and
//! applies the result:
//!
//! - `next` in the result replaces the task;
//! - `wait_for` parks the mind unless the condition already holds;
//! - neither → the mind is reaped (`done`, `ok` from the variant).
//!
//! Component-level errors (`NoThunk`, `InvalidWaitFor`) never escape this
//! module: they become remnants with `ok = false` and the shard keeps
//! running.

use boop_core::{EntityId, MindRng, Move, TypeMask};
use boop_entity::RefScope;
use boop_mind::{
    Event, Memory, MindCtx, MindError, Thunk, ThunkResult, WaitFor, WaitProbe,
};
use boop_view::ViewMemory;

use crate::remnant::Remnant;
use crate::shard::Shard;

// ── MindState ─────────────────────────────────────────────────────────────────

/// Everything the runtime keeps per minded entity.
pub(crate) struct MindState {
    /// The current task.  `None` only transiently (while a step runs) or
    /// when the mind was armed without one.
    pub(crate) thunk: Option<Thunk>,
    /// First tick this mind may (re-)run; stepping sets it one past the
    /// current tick so each mind runs at most once per tick.
    pub(crate) exec_tick: u32,
    /// Whether this mind has been stepped at least once this turn.
    pub(crate) stepped_this_turn: bool,
    /// The registered wait condition, if the mind is parked.
    pub(crate) wait_for: Option<WaitFor>,
    /// Persistent key → scalar memory.
    pub(crate) memory: Memory,
    /// Per-mind deterministic RNG.
    pub(crate) rng: MindRng,
    /// Per-mind ref scope, cleared at every turn rollover.
    pub(crate) scope: RefScope,
    /// The remembered map, fed by the senses phase.
    pub(crate) view_memory: ViewMemory,
    /// Turn-local event buffer.
    pub(crate) events: Vec<Event>,
    /// The move chosen for the current turn, if any.
    pub(crate) choice: Option<Move>,
}

impl MindState {
    pub(crate) fn new(thunk: Thunk, rng: MindRng, scope: RefScope) -> Self {
        Self {
            thunk: Some(thunk),
            exec_tick: 0,
            stepped_this_turn: false,
            wait_for: None,
            memory: Memory::new(),
            rng,
            scope,
            view_memory: ViewMemory::new(),
            events: Vec::new(),
            choice: None,
        }
    }
}

// ── Runtime ───────────────────────────────────────────────────────────────────

impl Shard {
    /// Clear the wait of every parked mind whose condition now holds,
    /// restoring it to the runnable set at the current tick.  Minds are
    /// visited in ascending id order so wake ties break deterministically.
    pub(crate) fn wake_minds(&mut self) {
        let parked: Vec<EntityId> = self
            .minds
            .iter()
            .filter(|(_, s)| s.wait_for.is_some())
            .map(|(id, _)| *id)
            .collect();
        for id in parked {
            let input_ready = self.input_ready(id);
            let (time, tick) = (self.time, self.tick);
            let state = self.minds.get_mut(&id).expect("parked mind exists");
            let Some(wait) = &state.wait_for else { continue };
            let probe = WaitProbe { time, events: &state.events, input_ready };
            if wait.is_runnable(&probe) {
                state.wait_for = None;
                state.exec_tick = tick;
            }
        }
    }

    /// Minds allowed to run this tick, in ascending id order.
    pub(crate) fn runnable_minds(&self) -> Vec<EntityId> {
        self.minds
            .iter()
            .filter(|(_, s)| s.wait_for.is_none() && s.exec_tick <= self.tick)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Whether `id`'s input queue holds undrained data.
    pub(crate) fn input_ready(&mut self, id: EntityId) -> bool {
        self.inputs.get_mut(&id).is_some_and(|ch| ch.ready())
    }

    /// Run one step of `id`'s task.
    pub(crate) fn step_mind(&mut self, id: EntityId) {
        // Draining the input queue emits `input` events into the buffer
        // before the task observes anything.
        let drained = self
            .inputs
            .get_mut(&id)
            .map(|ch| ch.drain())
            .unwrap_or_default();
        let input_ready = self.input_ready(id);
        let (time, tick) = (self.time, self.tick);

        {
            let Some(state) = self.minds.get_mut(&id) else { return };
            state
                .events
                .extend(drained.into_iter().map(|input| Event::Input { input }));
            state.exec_tick = tick + 1;
            state.stepped_this_turn = true;
        }

        let Some(mut thunk) = self
            .minds
            .get_mut(&id)
            .and_then(|s| s.thunk.take())
        else {
            self.reap(id, true, false, Some(MindError::NoThunk.to_string()), None);
            return;
        };

        let result = {
            let state = self.minds.get_mut(&id).expect("stepping mind exists");
            let MindState { scope, events, memory, rng, view_memory, choice, .. } = state;
            let mut ctx = MindCtx::new(
                time,
                tick,
                id,
                &self.store,
                scope,
                events,
                input_ready,
                view_memory,
                memory,
                rng,
                choice,
            );
            thunk(&mut ctx)
        };

        match result {
            ThunkResult::Done { reason } => {
                self.reap(id, true, true, reason, Some(thunk));
            }
            ThunkResult::Fail { reason, next: None } => {
                self.reap(id, true, false, Some(reason), Some(thunk));
            }
            ThunkResult::Fail { next: Some(next), .. }
            | ThunkResult::Continue { next, .. } => {
                if let Some(state) = self.minds.get_mut(&id) {
                    state.thunk = Some(next);
                }
            }
            ThunkResult::Wait { wait_for, next, .. } => {
                if let Err(e) = wait_for.validate() {
                    let last = next.unwrap_or(thunk);
                    self.reap(id, true, false, Some(e.to_string()), Some(last));
                    return;
                }
                let runnable = {
                    let state = self.minds.get_mut(&id).expect("stepping mind exists");
                    let probe =
                        WaitProbe { time, events: &state.events, input_ready };
                    wait_for.is_runnable(&probe)
                };
                if let Some(state) = self.minds.get_mut(&id) {
                    state.thunk = Some(next.unwrap_or(thunk));
                    if !runnable {
                        state.wait_for = Some(wait_for);
                    }
                }
            }
        }
    }

    /// Convert a mind into a remnant.  `thunk` is the task taken out for
    /// the step, when the caller has it; otherwise whatever is still in
    /// the state is preserved.
    pub(crate) fn reap(
        &mut self,
        id: EntityId,
        done: bool,
        ok: bool,
        reason: Option<String>,
        thunk: Option<Thunk>,
    ) {
        let Some(state) = self.minds.remove(&id) else { return };
        if self.store.is_allocated(id) {
            self.store.update_type(id, |t| t - TypeMask::MIND);
        }
        self.remnants.push((
            id,
            Remnant {
                done,
                ok,
                reason,
                thunk: thunk.or(state.thunk),
                wait_for: state.wait_for,
                time: self.time,
                move_choice: state.choice,
                events: state.events,
                memory: state.memory,
            },
        ));
    }
}
