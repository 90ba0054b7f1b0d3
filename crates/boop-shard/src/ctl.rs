//! The control surface: `ShardCtl` plus guarded entity handles.
//!
//! Handles borrow the shard, so Rust's lifetimes already stop them from
//! crossing a control call; the guard that remains explicit is the
//! generation check every operation performs, which catches handles (and
//! copied [`Entity`] tokens) that outlive their entity within a call.
//! Anything that must cross turns travels as an [`EntityRef`] and is
//! re-derived through `deref`.

use boop_core::{EntityId, Move, Point, Rect, Time, TypeMask};
use boop_entity::EntityRef;
use boop_mind::{Event, Memory, Thunk, WaitFor};
use boop_view::ViewMemory;

use crate::error::{ShardError, ShardResult};
use crate::input::InputBinder;
use crate::interact::{InteractCtx, InteractFn, interact_fn};
use crate::remnant::Remnant;
use crate::shard::Shard;

// ── Entity token ──────────────────────────────────────────────────────────────

/// A copyable entity token: id plus the generation at which it was
/// derived.  Redeem with [`ShardCtl::entity`]; redemption fails with
/// [`ShardError::ObsoleteHandle`] once the entity is destroyed.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Entity {
    pub(crate) id: EntityId,
    pub(crate) r#gen: u8,
}

impl Entity {
    pub fn id(&self) -> EntityId {
        self.id
    }
}

// ── EntitySpec ────────────────────────────────────────────────────────────────

/// Partial entity description for [`EntityMut::create`].  Unset fields
/// inherit from the prototype (the entity `create` was called on).
#[derive(Default)]
pub struct EntitySpec {
    pub location: Option<Point>,
    pub z_index: Option<i16>,
    pub glyph: Option<char>,
    pub is_solid: Option<bool>,
    pub is_visible: Option<bool>,
    pub name: Option<String>,
    pub interact: Option<InteractFn>,
    pub mind: Option<Thunk>,
}

impl EntitySpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(mut self, p: Point) -> Self {
        self.location = Some(p);
        self
    }

    pub fn glyph(mut self, g: char) -> Self {
        self.glyph = Some(g);
        self
    }

    pub fn z_index(mut self, z: i16) -> Self {
        self.z_index = Some(z);
        self
    }

    pub fn solid(mut self, solid: bool) -> Self {
        self.is_solid = Some(solid);
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.is_visible = Some(visible);
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn interact(mut self, f: impl FnMut(&mut InteractCtx<'_>) + 'static) -> Self {
        self.interact = Some(interact_fn(f));
        self
    }

    pub fn mind(mut self, thunk: Thunk) -> Self {
        self.mind = Some(thunk);
        self
    }
}

// ── ShardCtl ──────────────────────────────────────────────────────────────────

/// The build-time and per-turn control surface.  Valid only within the
/// build or control callback it was handed to.
pub struct ShardCtl<'a> {
    shard: &'a mut Shard,
}

impl<'a> ShardCtl<'a> {
    pub(crate) fn new(shard: &'a mut Shard) -> Self {
        Self { shard }
    }

    pub fn time(&self) -> Time {
        self.shard.time
    }

    pub fn tick(&self) -> u32 {
        self.shard.tick
    }

    fn token(&self, id: EntityId) -> Entity {
        Entity { id, r#gen: self.shard.store.generation(id).unwrap_or(0) }
    }

    /// The indestructible root entity — the default prototype.
    pub fn root(&mut self) -> EntityMut<'_> {
        let token = self.token(EntityId::ROOT);
        EntityMut { shard: &mut *self.shard, id: token.id, r#gen: token.r#gen }
    }

    /// Redeem a token for a guarded mutable handle.
    pub fn entity(&mut self, ent: Entity) -> ShardResult<EntityMut<'_>> {
        if self.shard.store.generation(ent.id) != Some(ent.r#gen) {
            return Err(ShardError::ObsoleteHandle { ent: ent.id });
        }
        Ok(EntityMut { shard: &mut *self.shard, id: ent.id, r#gen: ent.r#gen })
    }

    /// Look an entity up by its unique name.
    pub fn by_name(&mut self, name: &str) -> Option<EntityMut<'_>> {
        let id = self.shard.store.by_name(name)?;
        let token = self.token(id);
        Some(EntityMut { shard: &mut *self.shard, id: token.id, r#gen: token.r#gen })
    }

    /// Resolve a ref minted into any of the shard's scopes.
    pub fn deref(&self, r: EntityRef) -> Option<Entity> {
        let store = &self.shard.store;
        if let Some(id) = self.shard.root_scope.deref(r, store) {
            return Some(self.token(id));
        }
        self.shard
            .minds
            .values()
            .find_map(|s| s.scope.deref(r, store))
            .map(|id| self.token(id))
    }

    /// Tokens for live entities, ascending by id; `filter` restricts to
    /// entities whose type intersects the mask.
    pub fn entities(&mut self, filter: Option<TypeMask>) -> Vec<Entity> {
        let ids: Vec<EntityId> = match filter {
            Some(mask) => self.shard.store.ids_matching(mask),
            None => self.shard.store.live_ids().collect(),
        };
        ids.into_iter().map(|id| self.token(id)).collect()
    }

    /// Entities at exactly `p`, ascending by id.
    pub fn at(&mut self, p: Point) -> Vec<Entity> {
        self.shard.reconcile_spatial();
        let ids = self.shard.spatial.at(p);
        ids.into_iter().map(|id| self.token(id)).collect()
    }

    /// Populated cells inside `r`, row-major, each with its occupants.
    pub fn within(&mut self, r: Rect) -> Vec<(Point, Vec<Entity>)> {
        self.shard.reconcile_spatial();
        let hits = self.shard.spatial.within(r);
        let mut grouped: Vec<(Point, Vec<Entity>)> = Vec::new();
        for (p, id) in hits {
            let token = self.token(id);
            if grouped.last().is_some_and(|(last, _)| *last == p) {
                grouped.last_mut().unwrap().1.push(token);
            } else {
                grouped.push((p, vec![token]));
            }
        }
        grouped
    }

    /// The world-effect events of the completed turn.
    pub fn events(&self) -> impl Iterator<Item = (Entity, &Event)> {
        self.shard
            .turn_log
            .iter()
            .map(|(id, e)| (self.token(*id), e))
    }

    /// The moves applied during the completed turn, in application order.
    pub fn moves(&self) -> impl Iterator<Item = (Entity, Move)> + '_ {
        self.shard
            .applied_moves
            .iter()
            .map(|(id, m)| (self.token(*id), *m))
    }

    /// Drain the remnants of every mind reaped since the last drain.
    pub fn reap(&mut self) -> Vec<(EntityId, Remnant)> {
        std::mem::take(&mut self.shard.remnants)
    }
}

// ── EntityMut ─────────────────────────────────────────────────────────────────

/// A guarded mutable handle to one entity.  Every operation re-validates
/// the generation captured at derivation.
pub struct EntityMut<'c> {
    shard: &'c mut Shard,
    id: EntityId,
    r#gen: u8,
}

impl EntityMut<'_> {
    fn guard(&self) -> ShardResult<()> {
        if self.shard.store.generation(self.id) == Some(self.r#gen) {
            Ok(())
        } else {
            Err(ShardError::ObsoleteHandle { ent: self.id })
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// The copyable token for this handle.
    pub fn entity(&self) -> Entity {
        Entity { id: self.id, r#gen: self.r#gen }
    }

    // ── Reads ─────────────────────────────────────────────────────────────

    pub fn location(&self) -> ShardResult<Point> {
        self.guard()?;
        Ok(self.shard.store.location(self.id))
    }

    pub fn z_index(&self) -> ShardResult<i16> {
        self.guard()?;
        Ok(self.shard.store.z(self.id))
    }

    pub fn glyph(&self) -> ShardResult<char> {
        self.guard()?;
        Ok(self.shard.store.glyph(self.id))
    }

    pub fn is_solid(&self) -> ShardResult<bool> {
        self.guard()?;
        Ok(self.shard.store.has_type(self.id, TypeMask::SOLID))
    }

    pub fn is_visible(&self) -> ShardResult<bool> {
        self.guard()?;
        Ok(self.shard.store.has_type(self.id, TypeMask::VISIBLE))
    }

    pub fn types(&self) -> ShardResult<TypeMask> {
        self.guard()?;
        Ok(self.shard.store.types(self.id))
    }

    pub fn name(&self) -> ShardResult<Option<String>> {
        self.guard()?;
        Ok(self.shard.store.name(self.id).map(str::to_owned))
    }

    pub fn has_mind(&self) -> ShardResult<bool> {
        self.guard()?;
        Ok(self.shard.minds.contains_key(&self.id))
    }

    pub fn has_input(&self) -> ShardResult<bool> {
        self.guard()?;
        Ok(self.shard.inputs.contains_key(&self.id))
    }

    /// The mind's persistent memory, for rendering and inspection.
    pub fn memory(&self) -> ShardResult<Option<&Memory>> {
        self.guard()?;
        Ok(self.shard.minds.get(&self.id).map(|s| &s.memory))
    }

    /// The mind's remembered map, for rendering and inspection.
    pub fn view_memory(&self) -> ShardResult<Option<&ViewMemory>> {
        self.guard()?;
        Ok(self.shard.minds.get(&self.id).map(|s| &s.view_memory))
    }

    /// The wait condition the mind is parked on, if any.
    pub fn wait_for(&self) -> ShardResult<Option<WaitFor>> {
        self.guard()?;
        Ok(self
            .shard
            .minds
            .get(&self.id)
            .and_then(|s| s.wait_for.clone()))
    }

    /// Re-derive a turn-scoped ref to this entity (root scope; revoked
    /// at the next turn boundary).
    pub fn mint_ref(&mut self) -> ShardResult<EntityRef> {
        self.guard()?;
        Ok(self
            .shard
            .root_scope
            .mint(self.id, self.r#gen, None))
    }

    // ── Writes ────────────────────────────────────────────────────────────

    pub fn set_location(&mut self, p: Point) -> ShardResult<()> {
        self.guard()?;
        self.shard.store.set_location(self.id, p);
        self.shard.spatial.mark_dirty(self.id);
        Ok(())
    }

    pub fn set_z_index(&mut self, z: i16) -> ShardResult<()> {
        self.guard()?;
        self.shard.store.set_z(self.id, z);
        Ok(())
    }

    pub fn set_glyph(&mut self, g: char) -> ShardResult<()> {
        self.guard()?;
        self.shard.store.set_glyph(self.id, g);
        Ok(())
    }

    pub fn set_solid(&mut self, solid: bool) -> ShardResult<()> {
        self.guard()?;
        self.shard
            .store
            .update_type(self.id, |t| t.with(TypeMask::SOLID, solid));
        Ok(())
    }

    pub fn set_visible(&mut self, visible: bool) -> ShardResult<()> {
        self.guard()?;
        self.shard
            .store
            .update_type(self.id, |t| t.with(TypeMask::VISIBLE, visible));
        Ok(())
    }

    pub fn set_name(&mut self, name: &str) -> ShardResult<()> {
        self.guard()?;
        self.shard.store.set_name(self.id, name)?;
        Ok(())
    }

    /// Install (or replace) this entity's interaction handler.
    pub fn set_interact(
        &mut self,
        f: impl FnMut(&mut InteractCtx<'_>) + 'static,
    ) -> ShardResult<()> {
        self.guard()?;
        self.shard.interactions.insert(self.id, interact_fn(f));
        self.shard
            .store
            .update_type(self.id, |t| t | TypeMask::INTERACT);
        Ok(())
    }

    pub fn clear_interact(&mut self) -> ShardResult<()> {
        self.guard()?;
        self.shard.interactions.remove(&self.id);
        self.shard
            .store
            .update_type(self.id, |t| t - TypeMask::INTERACT);
        Ok(())
    }

    /// Arm (or re-arm) the task runtime for this entity.
    pub fn set_mind(&mut self, thunk: Thunk) -> ShardResult<()> {
        self.guard()?;
        self.shard.arm_mind(self.id, thunk);
        Ok(())
    }

    /// Establish an input binding, revoking any prior binder.
    pub fn set_input(&mut self) -> ShardResult<InputBinder> {
        self.guard()?;
        Ok(self.shard.bind_input(self.id))
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Create a new entity with this one as its prototype.
    pub fn create(&mut self, spec: EntitySpec) -> ShardResult<Entity> {
        self.guard()?;
        let id = self.shard.create_entity(self.id, spec)?;
        let r#gen = self.shard.store.generation(id).unwrap_or(0);
        Ok(Entity { id, r#gen })
    }

    /// Destroy this entity, consuming the handle.  Destroying the root
    /// is a no-op.
    pub fn destroy(self) -> ShardResult<()> {
        self.guard()?;
        self.shard.destroy_entity(self.id);
        Ok(())
    }
}
