//! Configuration and the fluent builder for a [`Shard`].

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;

use boop_core::{EntityId, Seed, ShardRng, Time, TypeMask};
use boop_entity::{EntityStore, HARD_CAPACITY, NameRegistry, RefScope};
use boop_spatial::SpatialIndex;

use crate::ctl::ShardCtl;
use crate::error::{ShardError, ShardResult};
use crate::shard::{Phase, Shard};

// ── ShardConfig ───────────────────────────────────────────────────────────────

/// Top-level shard configuration.  Every field has a default; most runs
/// only set `seed` and `size`.
pub struct ShardConfig {
    /// Master RNG seed.  The same seed, build function, and input
    /// sequence always reproduce the same run.
    pub seed: Seed,

    /// Initial entity capacity.  The store grows on demand up to
    /// [`HARD_CAPACITY`].
    pub size: usize,

    /// Turns between move-processing cycles.  1 (the default) applies
    /// moves every turn; off-cycle turns hold chosen moves and still
    /// distribute senses.
    pub move_rate: u64,

    /// Default relative deadline for `update()`.  `None` (the default)
    /// runs each turn to completion.
    pub default_timeout: Option<Duration>,

    /// Type filter selecting which entities' moves gate turn completion.
    /// Defaults to input-bound entities: the world pauses for the player
    /// while they have input pending, and only then.
    pub update_waits_for: TypeMask,
}

impl Default for ShardConfig {
    fn default() -> Self {
        Self {
            seed: Seed(0),
            size: 64,
            move_rate: 1,
            default_timeout: None,
            update_waits_for: TypeMask::INPUT,
        }
    }
}

// ── ShardBuilder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Shard`].
///
/// # Example
///
/// ```rust,ignore
/// let mut shard = ShardBuilder::new(ShardConfig {
///         seed: Seed::from(0xdead_beefu64),
///         ..ShardConfig::default()
///     })
///     .build(|ctl| {
///         let mut root = ctl.root();
///         root.create(EntitySpec::new().at(Point::new(1, 1)).glyph('@')).unwrap();
///     })?;
/// shard.update(&mut |_ctl| {})?;
/// ```
pub struct ShardBuilder {
    config: ShardConfig,
    choose_name: Option<boop_entity::ChooseName>,
    clock: Option<Box<dyn FnMut() -> Instant>>,
}

impl ShardBuilder {
    pub fn new(config: ShardConfig) -> Self {
        Self { config, choose_name: None, clock: None }
    }

    /// Install a naming policy, consulted for entities created without
    /// an explicit name.
    pub fn choose_name(
        mut self,
        f: impl FnMut(&NameRegistry, EntityId, char) -> Option<String> + 'static,
    ) -> Self {
        self.choose_name = Some(Box::new(f));
        self
    }

    /// Replace the monotonic wall-clock source used for deadlines —
    /// primarily for tests that need deterministic suspension.
    pub fn clock(mut self, f: impl FnMut() -> Instant + 'static) -> Self {
        self.clock = Some(Box::new(f));
        self
    }

    /// Validate the configuration, construct the shard at the build
    /// epoch (`time == 0`), and invoke `build` exactly once to populate
    /// the world.
    pub fn build<F>(self, build: F) -> ShardResult<Shard>
    where
        F: FnOnce(&mut ShardCtl<'_>),
    {
        let config = self.config;
        if config.size == 0 || config.size > HARD_CAPACITY {
            return Err(ShardError::Config(format!(
                "size must be in 1..={HARD_CAPACITY}, got {}",
                config.size
            )));
        }
        if config.move_rate == 0 {
            return Err(ShardError::Config("move_rate must be at least 1".into()));
        }

        let mut rng = ShardRng::new(config.seed.0);
        let root_scope = RefScope::new(rng.child(u64::MAX));
        let mut store = EntityStore::new(config.size);
        store.index_filter(config.update_waits_for);

        let mut shard = Shard {
            config,
            store,
            spatial: SpatialIndex::new(),
            minds: BTreeMap::new(),
            inputs: FxHashMap::default(),
            interactions: FxHashMap::default(),
            root_scope,
            rng,
            choose_name: self.choose_name,
            clock: self.clock.unwrap_or_else(|| Box::new(Instant::now)),
            time: Time::ZERO,
            tick: 0,
            phase: Phase::Minds,
            move_queue: Vec::new(),
            next_move: 0,
            sense_queue: Vec::new(),
            next_sense: 0,
            turn_log: Vec::new(),
            applied_moves: Vec::new(),
            remnants: Vec::new(),
        };

        {
            let mut ctl = ShardCtl::new(&mut shard);
            build(&mut ctl);
        }
        Ok(shard)
    }
}
