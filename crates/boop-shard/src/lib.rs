//! `boop-shard` — the simulation core of `boopworld`.
//!
//! A shard is a single-threaded, deterministic, turn-taking simulator
//! over a 2-D grid: minded entities choose moves from observations,
//! moves apply with solid-body collision semantics, and perception is
//! distributed before the next turn begins.  Everything handed outward
//! is either lifetime-bounded (handles) or revocable (`EntityRef`s,
//! input binders).
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use boop_core::{Point, Seed};
//! use boop_shard::{EntitySpec, ShardBuilder, ShardConfig};
//!
//! let mut shard = ShardBuilder::new(ShardConfig {
//!         seed: Seed::from("hello"),
//!         ..ShardConfig::default()
//!     })
//!     .build(|ctl| {
//!         let mut root = ctl.root();
//!         root.create(
//!             EntitySpec::new().at(Point::new(0, 0)).glyph('@').solid(true),
//!         )
//!         .unwrap();
//!     })?;
//!
//! shard.update(&mut |ctl| {
//!     for (ent, event) in ctl.events() {
//!         println!("{:?}: {event:?}", ent.id());
//!     }
//! })?;
//! ```
//!
//! # What lives here
//!
//! | Module      | Contents                                              |
//! |-------------|-------------------------------------------------------|
//! | [`shard`]   | `Shard`, the turn loop, moves, senses                 |
//! | [`runtime`] | mind state, wakeups, stepping, reaping                |
//! | [`builder`] | `ShardConfig`, `ShardBuilder`                         |
//! | [`ctl`]     | `ShardCtl`, `Entity`, `EntityMut`, `EntitySpec`       |
//! | [`interact`]| collision protocol, `InteractCtx`                     |
//! | [`input`]   | `InputBinder`                                         |
//! | [`remnant`] | `Remnant`                                             |
//! | [`error`]   | `ShardError`                                          |

pub mod builder;
pub mod ctl;
pub mod error;
pub mod input;
pub mod interact;
pub mod remnant;
mod runtime;
pub mod shard;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use builder::{ShardBuilder, ShardConfig};
pub use ctl::{Entity, EntityMut, EntitySpec, ShardCtl};
pub use error::{ShardError, ShardResult};
pub use input::InputBinder;
pub use interact::{InteractCtx, InteractFn, interact_fn};
pub use remnant::Remnant;
pub use shard::{Phase, Shard, UpdateOutcome};
