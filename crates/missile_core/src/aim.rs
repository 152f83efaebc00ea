//! Aiming math: coarse body-yaw snapping and the fine bone rotations layered
//! on top of it, plus the per-frame blend that eases the bones toward them.

use glam::{Vec2, Vec3};

use crate::actors::Actor;
use crate::store::EPSILON;

/// Offset from an actor's anchor to its visual center on the ground plane.
const ACTOR_CENTER_OFFSET: f32 = 0.25;
/// Aim origin height above the actor position, scaled by actor size.
const AIM_HEIGHT: f32 = 1.4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimRotation {
    /// Fine horizontal bone rotation, radians.
    pub horizontal: f32,
    /// Fine vertical bone rotation, radians.
    pub vertical: f32,
    /// Coarse torso yaw delta in degrees, snapped to 45° increments.
    pub body_yaw: f32,
}

/// Snap a raw rotation (degrees, from asin so within (-90, 90)) to the
/// nearest multiple of 45°, ties at 22.5° rounding away from zero. `behind`
/// selects the 180°-wrapped branch for targets behind the actor.
fn snap_body_yaw(raw: f32, behind: bool) -> f32 {
    let snapped = if behind {
        if raw < 0.0 {
            ((-180.0 - raw - 22.5) as i32 / 45) * 45
        } else {
            ((180.0 - raw + 22.5) as i32 / 45) * 45
        }
    } else if raw < 0.0 {
        ((raw - 22.5) as i32 / 45) * 45
    } else {
        ((raw + 22.5) as i32 / 45) * 45
    };
    snapped as f32
}

/// How much the actor's torso must yaw to roughly face `target`, and the
/// fine bone rotations needed on top of that yaw to aim precisely.
///
/// An actor already mid-turn is handled by extrapolating its final heading
/// (current heading + angular rate × remaining rotation time) so the aim
/// does not pop once the turn completes. Pure function of its inputs.
pub fn compute_actor_rotation(actor: &Actor, target: Vec3) -> AimRotation {
    let mut yaw = actor.yaw_deg;
    if actor.rotating {
        log::debug!(
            "ranged: {} ({:?}): already rotating, using the projected final heading",
            actor.name,
            actor.id
        );
        yaw += actor.yaw_rate_deg_s * actor.rotate_time_left_s;
    }

    // Coarse rotation from the ground-plane offset in the heading frame.
    let (sz, cz) = yaw.to_radians().sin_cos();
    let flat = Vec2::new(
        target.x - actor.pos.x - ACTOR_CENTER_OFFSET,
        target.y - actor.pos.y - ACTOR_CENTER_OFFSET,
    )
    .normalize_or_zero();

    let raw = (flat.x * cz - flat.y * sz).clamp(-1.0, 1.0).asin().to_degrees();
    let behind = flat.x * sz + flat.y * cz < 0.0;
    let body_yaw = snap_body_yaw(raw, behind);

    // Fine rotation, in the frame left after the snapped yaw is applied.
    let (sz, cz) = (yaw + body_yaw).to_radians().sin_cos();
    let origin = Vec3::new(
        actor.pos.x + ACTOR_CENTER_OFFSET,
        actor.pos.y + ACTOR_CENTER_OFFSET,
        actor.pos.z + AIM_HEIGHT * actor.scale,
    );
    let off = target - origin;

    // Ground-plane aim direction in heading-local axes (x right, z forward).
    let planar = Vec3::new(off.y * sz - off.x * cz, 0.0, off.y * cz + off.x * sz);
    let from = planar.normalize_or_zero();
    let horizontal = (-from.x).clamp(-1.0, 1.0).asin();

    // Tilt between the horizontal aim direction and the true, elevated one.
    let to = Vec3::new(planar.x, off.z, planar.z).normalize_or_zero();
    let mut vertical = from.cross(to).length().clamp(-1.0, 1.0).asin();
    if to.y < from.y {
        vertical = -vertical;
    }

    AimRotation {
        horizontal,
        vertical,
        body_yaw,
    }
}

/// Blend state easing the aim bones between rotations; idle when `blend < 0`
/// so an actor at rest stops touching its skeleton every frame.
#[derive(Debug, Clone, Copy)]
pub struct AimBlend {
    blend: f32,
    /// Blend progress per second.
    speed: f32,
    h_start: f32,
    h_end: f32,
    v_start: f32,
    v_end: f32,
}

impl Default for AimBlend {
    fn default() -> Self {
        Self {
            blend: -1.0,
            speed: 0.0,
            h_start: 0.0,
            h_end: 0.0,
            v_start: 0.0,
            v_end: 0.0,
        }
    }
}

impl AimBlend {
    pub fn active(&self) -> bool {
        self.blend >= 0.0
    }

    fn current(&self) -> (f32, f32) {
        if !self.active() {
            return (0.0, 0.0);
        }
        let t = self.blend.min(1.0);
        (
            self.h_start * (1.0 - t) + self.h_end * t,
            self.v_start * (1.0 - t) + self.v_end * t,
        )
    }

    /// Begin easing toward new end rotations (radians). The start values
    /// continue from whatever is currently applied so a retarget mid-blend
    /// does not snap.
    pub fn start(&mut self, h_end: f32, v_end: f32, speed: f32) {
        let (h_now, v_now) = self.current();
        self.h_start = h_now;
        self.v_start = v_now;
        self.h_end = h_end;
        self.v_end = v_end;
        self.speed = speed;
        self.blend = 0.0;
    }

    /// Advance the blend and return the rotations to apply this frame, or
    /// `None` once the bones are at rest pointing forward.
    pub fn step(&mut self, dt_s: f32) -> Option<(f32, f32)> {
        if !self.active() {
            return None;
        }
        if self.blend < 1.0 {
            self.blend += self.speed * dt_s;
            return Some(self.current());
        }
        let (h, v) = (self.h_end, self.v_end);
        if h.abs() < EPSILON && v.abs() < EPSILON {
            // Finished returning to rest; stop rotating bones every frame.
            self.blend = -1.0;
            self.h_start = 0.0;
            self.v_start = 0.0;
        } else {
            self.blend = 1.0;
        }
        Some((h, v))
    }
}
