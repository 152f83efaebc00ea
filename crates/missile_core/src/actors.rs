//! Actor registry and the aim/fire command path.
//!
//! The entry points here run on the network-message thread while the
//! animation/update thread reads the same aim-target fields, so the actor
//! list sits behind one coarse mutex and every read-modify-write happens
//! inside a scoped guard (released on every exit path, early returns
//! included). The missile store itself is only ever driven from the update
//! thread and is passed in explicitly where a shot is actually spawned.

use std::sync::{Mutex, MutexGuard, PoisonError};

use glam::{Vec2, Vec3};

use data_runtime::specs::missiles::MAX_MISSILE_DEFS;

use crate::aim::AimBlend;
use crate::store::{MissileWorld, ShotKind};
use crate::vfx::MissileVfx;

/// Bounded per-actor queue of pending fire targets.
pub const MAX_SHOTS_QUEUE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActorId(pub u32);

/// Aim-related bones resolved through the [`Skeleton`] collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AimBone {
    /// Anchor the arrow leaves from.
    ArrowAnchor,
    /// Upper-torso bone shots are aimed at.
    BodyTop,
}

/// Skeleton collaborator: resolves bone positions in world space.
pub trait Skeleton {
    /// World position of `bone` for `actor`, with `offset` applied in the
    /// bone's local frame. `None` when the actor has no skeleton loaded.
    fn bone_position(&self, actor: &Actor, bone: AimBone, offset: Vec3) -> Option<Vec3>;
}

/// Commands handed to the animation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorCommand {
    EnterAimMode,
    AimModeFire,
}

#[derive(Debug)]
pub struct Actor {
    pub id: ActorId,
    pub name: String,
    /// Anchor position; the visual center is offset on the ground plane.
    pub pos: Vec3,
    pub yaw_deg: f32,
    /// In-progress body turn, extrapolated by the aiming math.
    pub rotating: bool,
    pub yaw_rate_deg_s: f32,
    pub rotate_time_left_s: f32,
    pub scale: f32,
    /// Definition index of the equipped ammunition.
    pub missile_type: usize,
    /// Point the actor is currently aiming at.
    pub target_aim: Option<Vec3>,
    fire_targets: [Vec3; MAX_SHOTS_QUEUE],
    shots_count: usize,
    pub last_range_attacker: Option<ActorId>,
    pub blend: AimBlend,
    /// Pending commands, drained by the animation layer.
    pub commands: Vec<ActorCommand>,
}

impl Actor {
    pub fn new(id: ActorId, name: &str, pos: Vec3) -> Self {
        Self {
            id,
            name: name.to_string(),
            pos,
            yaw_deg: 0.0,
            rotating: false,
            yaw_rate_deg_s: 0.0,
            rotate_time_left_s: 0.0,
            scale: 1.0,
            missile_type: 0,
            target_aim: None,
            fire_targets: [Vec3::ZERO; MAX_SHOTS_QUEUE],
            shots_count: 0,
            last_range_attacker: None,
            blend: AimBlend::default(),
            commands: Vec::new(),
        }
    }

    pub fn queued_shots(&self) -> usize {
        self.shots_count
    }

    /// Returns false (and leaves the queue untouched) when full.
    fn queue_fire_target(&mut self, target: Vec3) -> bool {
        if self.shots_count >= MAX_SHOTS_QUEUE {
            return false;
        }
        self.fire_targets[self.shots_count] = target;
        self.shots_count += 1;
        true
    }

    /// Dequeue the oldest pending fire target, if any.
    pub fn next_fire_target(&mut self) -> Option<Vec3> {
        if self.shots_count == 0 {
            return None;
        }
        let target = self.fire_targets[0];
        self.fire_targets.copy_within(1..self.shots_count, 0);
        self.shots_count -= 1;
        Some(target)
    }
}

/// The shared actor list. One coarse lock guards the aim/fire fields the
/// network and animation threads both touch.
#[derive(Debug)]
pub struct ActorList {
    actors: Mutex<Vec<Actor>>,
    map_bounds: Vec2,
}

impl ActorList {
    pub fn new(map_bounds: Vec2) -> Self {
        Self {
            actors: Mutex::new(Vec::new()),
            map_bounds,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Actor>> {
        self.actors.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn insert(&self, actor: Actor) {
        self.lock().push(actor);
    }

    /// Run `f` on the actor with `id` under the list lock.
    pub fn with_actor<R>(&self, id: ActorId, f: impl FnOnce(&mut Actor) -> R) -> Option<R> {
        let mut actors = self.lock();
        let idx = actors.iter().position(|a| a.id == id)?;
        Some(f(&mut actors[idx]))
    }

    fn warn_if_off_map(&self, target: Vec3, ctx: &str) {
        if target.x < 0.0
            || target.x > self.map_bounds.x
            || target.y < 0.0
            || target.y > self.map_bounds.y
        {
            log::warn!("ranged: {ctx}: target {target:?} is out of the map");
        }
    }

    /// Point `shooter` at the upper torso of `target`.
    pub fn aim_at_actor(&self, shooter: ActorId, target: ActorId, skel: &dyn Skeleton) -> bool {
        let mut actors = self.lock();
        let Some(ti) = actors.iter().position(|a| a.id == target) else {
            log::error!("ranged: aim_at_actor: the actor {target:?} does not exist");
            return false;
        };
        let Some(si) = actors.iter().position(|a| a.id == shooter) else {
            log::error!("ranged: aim_at_actor: the actor {shooter:?} does not exist");
            return false;
        };
        let Some(point) = skel.bone_position(&actors[ti], AimBone::BodyTop, Vec3::ZERO) else {
            log::error!("ranged: aim_at_actor: no skeleton for actor {target:?}");
            return false;
        };
        log::debug!(
            "ranged: {} ({shooter:?}): will aim at actor {target:?}",
            actors[si].name
        );
        self.warn_if_off_map(point, "aim_at_actor");
        actors[si].target_aim = Some(point);
        actors[si].commands.push(ActorCommand::EnterAimMode);
        true
    }

    /// Point `shooter` at a fixed world position.
    pub fn aim_at_point(&self, shooter: ActorId, target: Vec3) -> bool {
        let mut actors = self.lock();
        let Some(si) = actors.iter().position(|a| a.id == shooter) else {
            log::error!("ranged: aim_at_point: the actor {shooter:?} does not exist");
            return false;
        };
        log::debug!(
            "ranged: {} ({shooter:?}): will aim at target {target:?}",
            actors[si].name
        );
        self.warn_if_off_map(target, "aim_at_point");
        actors[si].target_aim = Some(target);
        actors[si].commands.push(ActorCommand::EnterAimMode);
        true
    }

    /// Queue a shot from `shooter` at the upper torso of `target`. Returns
    /// whether the shot was enqueued; a full queue drops it (logged).
    pub fn fire_to_actor(&self, shooter: ActorId, target: ActorId, skel: &dyn Skeleton) -> bool {
        let mut actors = self.lock();
        let Some(ti) = actors.iter().position(|a| a.id == target) else {
            log::error!("ranged: fire_to_actor: the actor {target:?} does not exist");
            return false;
        };
        let Some(si) = actors.iter().position(|a| a.id == shooter) else {
            log::error!("ranged: fire_to_actor: the actor {shooter:?} does not exist");
            return false;
        };
        let Some(point) = skel.bone_position(&actors[ti], AimBone::BodyTop, Vec3::ZERO) else {
            log::error!("ranged: fire_to_actor: no skeleton for actor {target:?}");
            return false;
        };
        let queued = actors[si].queue_fire_target(point);
        if queued {
            self.warn_if_off_map(point, "fire_to_actor");
        } else {
            log::error!("ranged: fire_to_actor: shots queue is full for actor {shooter:?}");
        }
        actors[ti].last_range_attacker = Some(shooter);
        actors[si].commands.push(ActorCommand::AimModeFire);
        queued
    }

    /// Queue a shot from `shooter` at a fixed world position.
    pub fn fire_to_point(&self, shooter: ActorId, target: Vec3) -> bool {
        let mut actors = self.lock();
        let Some(si) = actors.iter().position(|a| a.id == shooter) else {
            log::error!("ranged: fire_to_point: the actor {shooter:?} does not exist");
            return false;
        };
        let queued = actors[si].queue_fire_target(target);
        if queued {
            self.warn_if_off_map(target, "fire_to_point");
        } else {
            log::error!("ranged: fire_to_point: shots queue is full for actor {shooter:?}");
        }
        actors[si].commands.push(ActorCommand::AimModeFire);
        queued
    }

    /// Spawn a shot from a bare world position at the upper torso of
    /// `target`. The shooter is unknown, so the shot is a plain type-0
    /// Normal missile and the target's attacker link is cleared.
    pub fn fire_from_point_to_actor(
        &self,
        origin: Vec3,
        target: ActorId,
        skel: &dyn Skeleton,
        world: &mut MissileWorld,
        vfx: &mut dyn MissileVfx,
    ) -> Option<usize> {
        log::debug!("ranged: missile fired from {origin:?} to actor {target:?}");
        let point = {
            let mut actors = self.lock();
            let Some(ti) = actors.iter().position(|a| a.id == target) else {
                log::error!("ranged: fire_from_point_to_actor: the actor {target:?} does not exist");
                return None;
            };
            let Some(point) = skel.bone_position(&actors[ti], AimBone::BodyTop, Vec3::ZERO) else {
                log::error!("ranged: fire_from_point_to_actor: no skeleton for actor {target:?}");
                return None;
            };
            self.warn_if_off_map(point, "fire_from_point_to_actor");
            actors[ti].last_range_attacker = None;
            point
        };
        world.add(0, origin, point, 0.0, ShotKind::Normal, vfx)
    }

    /// Fire the oldest queued shot, if any. The animation layer calls this
    /// when the release frame of the fire animation is reached.
    pub fn release_next_shot(
        &self,
        shooter: ActorId,
        shot: ShotKind,
        skel: &dyn Skeleton,
        world: &mut MissileWorld,
        vfx: &mut dyn MissileVfx,
    ) -> Option<usize> {
        let target = {
            let mut actors = self.lock();
            let Some(si) = actors.iter().position(|a| a.id == shooter) else {
                log::error!("ranged: release_next_shot: the actor {shooter:?} does not exist");
                return None;
            };
            actors[si].next_fire_target()?
        };
        self.fire_arrow(shooter, target, shot, skel, world, vfx)
    }

    /// Launch the shooter's equipped missile from its arrow anchor toward
    /// `target`. An invalid equipped type falls back to type 0 (logged).
    pub fn fire_arrow(
        &self,
        shooter: ActorId,
        target: Vec3,
        shot: ShotKind,
        skel: &dyn Skeleton,
        world: &mut MissileWorld,
        vfx: &mut dyn MissileVfx,
    ) -> Option<usize> {
        let (kind, origin) = {
            let actors = self.lock();
            let Some(si) = actors.iter().position(|a| a.id == shooter) else {
                log::error!("ranged: fire_arrow: the actor {shooter:?} does not exist");
                return None;
            };
            let actor = &actors[si];
            let mut kind = actor.missile_type;
            if kind >= MAX_MISSILE_DEFS {
                log::error!(
                    "ranged: fire_arrow: {kind} is not a valid missile kind for actor {shooter:?}"
                );
                kind = 0;
            }
            let mesh_length = world.defs().get(kind).map_or(0.0, |d| d.mesh_length);
            let anchor_shift = Vec3::new(0.0, actor.scale * mesh_length, 0.0);
            let Some(origin) = skel.bone_position(actor, AimBone::ArrowAnchor, anchor_shift)
            else {
                log::error!("ranged: fire_arrow: no skeleton for actor {shooter:?}");
                return None;
            };
            (kind, origin)
        };
        world.add(kind, origin, target, 0.0, shot, vfx)
    }
}
