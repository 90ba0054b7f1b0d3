//! Unit tests for the task model.

#[cfg(test)]
mod waitfor_tests {
    use boop_core::Time;
    use boop_entity::EntityRef;

    use crate::error::MindError;
    use crate::event::{Event, EventKind};
    use crate::waitfor::{WaitFor, WaitProbe};

    fn probe(events: &[Event], time: u64, input_ready: bool) -> WaitProbe<'_> {
        WaitProbe { time: Time(time), events, input_ready }
    }

    #[test]
    fn event_kind_matches_buffer() {
        let events = vec![Event::Hit { target: EntityRef(1) }];
        assert!(WaitFor::Event(EventKind::Hit).is_runnable(&probe(&events, 0, false)));
        assert!(!WaitFor::Event(EventKind::Move).is_runnable(&probe(&events, 0, false)));
        assert!(!WaitFor::Event(EventKind::Hit).is_runnable(&probe(&[], 0, false)));
    }

    #[test]
    fn input_checks_queue_not_buffer() {
        assert!(WaitFor::Input.is_runnable(&probe(&[], 0, true)));
        assert!(!WaitFor::Input.is_runnable(&probe(&[], 0, false)));
    }

    #[test]
    fn time_threshold() {
        let w = WaitFor::Time(Time(5));
        assert!(!w.is_runnable(&probe(&[], 4, false)));
        assert!(w.is_runnable(&probe(&[], 5, false)));
        assert!(w.is_runnable(&probe(&[], 9, false)));
    }

    #[test]
    fn any_and_all_combine() {
        let either = WaitFor::Any(vec![WaitFor::Input, WaitFor::Time(Time(10))]);
        assert!(either.is_runnable(&probe(&[], 0, true)));
        assert!(either.is_runnable(&probe(&[], 10, false)));
        assert!(!either.is_runnable(&probe(&[], 0, false)));

        let both = WaitFor::All(vec![WaitFor::Input, WaitFor::Time(Time(10))]);
        assert!(!both.is_runnable(&probe(&[], 0, true)));
        assert!(!both.is_runnable(&probe(&[], 10, false)));
        assert!(both.is_runnable(&probe(&[], 10, true)));
    }

    #[test]
    fn empty_combinators_rejected() {
        assert_eq!(WaitFor::Any(vec![]).validate(), Err(MindError::InvalidWaitFor));
        assert_eq!(WaitFor::All(vec![]).validate(), Err(MindError::InvalidWaitFor));
        // Nesting is checked too.
        let nested = WaitFor::Any(vec![WaitFor::All(vec![])]);
        assert_eq!(nested.validate(), Err(MindError::InvalidWaitFor));
        assert!(WaitFor::Input.validate().is_ok());
        assert!(WaitFor::Any(vec![WaitFor::Input]).validate().is_ok());
    }
}

#[cfg(test)]
mod memory_tests {
    use crate::memory::{Datum, Memory};

    #[test]
    fn set_get_roundtrip() {
        let mut m = Memory::new();
        m.set("count", 3i64);
        m.set("label", "door");
        m.set("open", true);
        assert_eq!(m.get("count").and_then(Datum::as_int), Some(3));
        assert_eq!(m.get("label").and_then(Datum::as_str), Some("door"));
        assert_eq!(m.get("open").and_then(Datum::as_bool), Some(true));
        assert_eq!(m.get("missing"), None);
    }

    #[test]
    fn keys_are_sorted() {
        let mut m = Memory::new();
        m.set("zeta", 1i64);
        m.set("alpha", 2i64);
        let keys: Vec<_> = m.keys().collect();
        assert_eq!(keys, vec!["alpha", "zeta"]);
    }

    #[test]
    fn clone_is_deep() {
        let mut m = Memory::new();
        m.set("k", 1i64);
        let snapshot = m.clone();
        m.set("k", 2i64);
        assert_eq!(snapshot.get("k").and_then(Datum::as_int), Some(1));
    }

    #[test]
    fn wrong_type_accessor_is_none() {
        let mut m = Memory::new();
        m.set("k", 1i64);
        assert_eq!(m.get("k").and_then(Datum::as_str), None);
    }
}

#[cfg(test)]
mod thunk_tests {
    use crate::thunk::ThunkResult;
    use crate::waitfor::WaitFor;

    #[test]
    fn constructors_carry_reasons() {
        assert_eq!(ThunkResult::done().reason(), None);
        assert_eq!(ThunkResult::done_because("arrived").reason(), Some("arrived"));
        assert_eq!(ThunkResult::fail("lost").reason(), Some("lost"));
        assert_eq!(ThunkResult::wait(WaitFor::Input).reason(), None);
    }

    #[test]
    fn debug_hides_closures() {
        let r = ThunkResult::fail_with("retry", Box::new(|_| ThunkResult::done()));
        let s = format!("{r:?}");
        assert!(s.contains("Fail"));
        assert!(s.contains("retry"));
    }
}

#[cfg(test)]
mod ctx_tests {
    use boop_core::{MindRng, Move, Point, ShardRng, Time, TypeMask};
    use boop_entity::{EntityStore, RefScope};
    use boop_view::ViewMemory;

    use crate::ctx::MindCtx;
    use crate::event::{Event, EventKind};
    use crate::memory::Memory;
    use crate::waitfor::WaitFor;

    /// Run `f` with a minimally populated context for entity `me`.
    fn with_ctx<R>(events: Vec<Event>, f: impl FnOnce(&mut MindCtx<'_>) -> R) -> R {
        let mut store = EntityStore::new(8);
        let me = store.alloc().unwrap();
        store.set_location(me, Point::new(2, 2));
        store.set_glyph(me, '@');
        store.set_type(me, TypeMask::MIND | TypeMask::SOLID);

        let scope = RefScope::new(ShardRng::new(1));
        let view_memory = ViewMemory::new();
        let mut memory = Memory::new();
        let mut rng = MindRng::new(0, me);
        let mut choice = None;

        let mut ctx = MindCtx::new(
            Time(3),
            0,
            me,
            &store,
            &scope,
            &events,
            false,
            &view_memory,
            &mut memory,
            &mut rng,
            &mut choice,
        );
        f(&mut ctx)
    }

    #[test]
    fn self_view_reads_store() {
        with_ctx(vec![], |ctx| {
            let me = ctx.self_view();
            assert_eq!(me.location(), Point::new(2, 2));
            assert_eq!(me.glyph(), '@');
            assert!(me.is_solid());
            assert!(!me.can_interact());
            assert_eq!(me.name(), None);
        });
    }

    #[test]
    fn inputs_filter_input_events() {
        let events = vec![
            Event::Input { input: 'w' },
            Event::Inspect { here: vec![] },
            Event::Input { input: 'd' },
        ];
        with_ctx(events, |ctx| {
            let inputs: Vec<char> = ctx.inputs().collect();
            assert_eq!(inputs, vec!['w', 'd']);
            assert!(ctx.saw(EventKind::Input));
            assert!(ctx.saw(EventKind::Inspect));
            assert!(!ctx.saw(EventKind::Move));
        });
    }

    #[test]
    fn is_ready_uses_buffer_and_time() {
        with_ctx(vec![Event::Inspect { here: vec![] }], |ctx| {
            assert!(ctx.is_ready(&WaitFor::Event(EventKind::Inspect)));
            assert!(ctx.is_ready(&WaitFor::Time(Time(3))));
            assert!(!ctx.is_ready(&WaitFor::Time(Time(4))));
            assert!(!ctx.is_ready(&WaitFor::Input));
        });
    }

    #[test]
    fn move_slot_roundtrip() {
        with_ctx(vec![], |ctx| {
            assert_eq!(ctx.chosen_move(), None);
            ctx.set_move(Move::Down);
            assert_eq!(ctx.chosen_move(), Some(Move::Down));
            ctx.set_move(Move::Stay);
            assert_eq!(ctx.chosen_move(), Some(Move::Stay));
        });
    }

    #[test]
    fn memory_writes_persist_through_ctx() {
        let mut store = EntityStore::new(8);
        let me = store.alloc().unwrap();
        let scope = RefScope::new(ShardRng::new(1));
        let view_memory = ViewMemory::new();
        let mut memory = Memory::new();
        let mut rng = MindRng::new(0, me);
        let mut choice = None;
        {
            let mut ctx = MindCtx::new(
                Time(0), 0, me, &store, &scope, &[], false, &view_memory,
                &mut memory, &mut rng, &mut choice,
            );
            ctx.memory().set("steps", 7i64);
        }
        assert_eq!(memory.get("steps").and_then(crate::Datum::as_int), Some(7));
    }
}
