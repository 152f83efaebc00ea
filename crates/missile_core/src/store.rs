//! In-flight missile store and per-frame integration.
//!
//! Slot indices are the missile handles and are NOT stable: removal moves
//! the last live missile into the freed slot and the renderer learns about
//! it through [`MissileVfx::missile_renamed`]. Callers must treat an index
//! as single-use and never retain one across a removal.

use data_runtime::configs::ranged::RangedConfigFile;
use data_runtime::specs::missiles::MissileTypeRegistry;
use glam::Vec3;

use crate::lost::LostMissiles;
use crate::vfx::{MissileVfx, SceneProps};

/// Hard cap on simultaneously tracked missiles.
pub const MAX_MISSILES: usize = 1024;
/// Shots shorter than this are degenerate and refused.
pub const EPSILON: f32 = 1e-4;
/// Server-side shot resolution distance. A missed shot that covered less
/// than this when removed leaves a stuck arrow at its end-of-flight point.
pub const LOST_SHOT_SERVER_CUTOFF: f32 = 19.0;

/// Hit outcome of a shot; drives trail color and the stuck-arrow behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShotKind {
    Normal,
    Critical,
    Missed,
}

#[derive(Debug, Clone, Copy)]
pub struct Missile {
    /// Definition index in the type registry.
    pub kind: usize,
    pub shot: ShotKind,
    pub pos: Vec3,
    /// Unit-length flight direction.
    pub dir: Vec3,
    /// Snapshot of the definition at add time; later registry reloads do not
    /// affect in-flight missiles.
    pub speed: f32,
    pub trace_length: f32,
    pub covered_dist: f32,
    pub remaining_dist: f32,
}

/// All missile simulation state for one loaded scene. Constructed at scene
/// load, dropped at unload; driven only from the update thread.
#[derive(Debug)]
pub struct MissileWorld {
    defs: MissileTypeRegistry,
    missiles: Vec<Missile>,
    lost: LostMissiles,
    now_ms: u64,
    eye_candy: bool,
    effect_level: u8,
}

impl MissileWorld {
    pub fn new(defs: MissileTypeRegistry, cfg: &RangedConfigFile) -> Self {
        Self {
            defs,
            missiles: Vec::with_capacity(MAX_MISSILES),
            lost: LostMissiles::new(),
            now_ms: 0,
            eye_candy: cfg.eye_candy,
            effect_level: cfg.effect_level,
        }
    }

    pub fn defs(&self) -> &MissileTypeRegistry {
        &self.defs
    }

    pub fn count(&self) -> usize {
        self.missiles.len()
    }

    pub fn get(&self, index: usize) -> Option<&Missile> {
        self.missiles.get(index)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Missile> {
        self.missiles.iter()
    }

    pub fn lost_count(&self) -> usize {
        self.lost.len()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Empty the store and the litter ring. The registry and clock are kept;
    /// collaborators are not notified (scene teardown owns their state).
    pub fn clear(&mut self) {
        self.missiles.clear();
        self.lost.clear();
    }

    /// Add a missile flying from `origin` toward `target`. `shift` starts the
    /// trajectory already partway complete (e.g. to absorb network travel
    /// time). Returns the new slot index, or `None` when the store is full,
    /// the kind is unknown, or the shot is degenerate.
    pub fn add(
        &mut self,
        kind: usize,
        origin: Vec3,
        target: Vec3,
        shift: f32,
        shot: ShotKind,
        vfx: &mut dyn MissileVfx,
    ) -> Option<usize> {
        if self.missiles.len() >= MAX_MISSILES {
            log::error!("missiles: too many missiles, can't add the last one");
            return None;
        }
        let Some(def) = self.defs.get(kind) else {
            log::error!("missiles: {kind} is not a valid missile kind");
            return None;
        };

        let offset = target - origin;
        let dist = offset.length();
        if dist < EPSILON {
            log::error!(
                "missiles: null length shot detected between {origin:?} and {target:?}, not adding"
            );
            return None;
        }
        log::debug!("missiles: add origin={origin:?} target={target:?} dist={dist} shot={shot:?}");

        self.missiles.push(Missile {
            kind,
            shot,
            pos: origin,
            dir: offset / dist,
            speed: def.speed,
            trace_length: def.trace_length,
            covered_dist: 0.0,
            remaining_dist: dist + shift,
        });
        let index = self.missiles.len() - 1;
        if self.eye_candy {
            vfx.missile_added(index, self.effect_level, shot);
        }
        Some(index)
    }

    /// Remove the missile at `index`. Out-of-range indices are logged and
    /// ignored. The last live missile is swapped into the freed slot, so any
    /// handle equal to the old last index now refers to a different missile;
    /// the renderer is told through [`MissileVfx::missile_renamed`].
    pub fn remove(
        &mut self,
        index: usize,
        vfx: &mut dyn MissileVfx,
        scene: &mut dyn SceneProps,
    ) -> bool {
        let Some(mis) = self.missiles.get(index).copied() else {
            log::error!("missiles: remove index {index} is out of range");
            return false;
        };

        // A missed shot resolved within the server-side cutoff leaves a stuck
        // arrow at its end-of-flight point.
        if mis.shot == ShotKind::Missed && mis.covered_dist < LOST_SHOT_SERVER_CUTOFF {
            let end = mis.pos + mis.dir * mis.remaining_dist;
            let rot_deg = Vec3::new(
                0.0,
                (-mis.dir.z.asin()).to_degrees(),
                mis.dir.y.atan2(mis.dir.x).to_degrees(),
            );
            if let Some(def) = self.defs.get(mis.kind) {
                log::debug!("missiles: lost missile at {end:?} with rotation {rot_deg:?}");
                if let Some(prop) = scene.spawn_prop(&def.lost_mesh, end, rot_deg) {
                    self.lost.push(prop, self.now_ms, scene);
                }
            }
        }

        vfx.missile_removed(index);

        let last = self.missiles.len() - 1;
        self.missiles.swap_remove(index);
        if index < last {
            vfx.missile_renamed(last, index);
        }
        true
    }

    /// Advance every live missile by `dt_s` seconds, retiring the ones whose
    /// visual tail has fully passed the travel window, then expire the litter
    /// ring.
    pub fn update(&mut self, dt_s: f32, vfx: &mut dyn MissileVfx, scene: &mut dyn SceneProps) {
        self.now_ms += (f64::from(dt_s) * 1000.0) as u64;

        let mut i = 0;
        while i < self.missiles.len() {
            let mis = &mut self.missiles[i];
            let d = mis.speed * dt_s;
            mis.pos += mis.dir * d;
            mis.covered_dist += d;
            mis.remaining_dist -= d;
            // Strictly below: a tail sitting exactly on the window edge stays.
            if mis.remaining_dist < -mis.trace_length {
                // The swapped-in missile is re-examined at this same index.
                self.remove(i, vfx, scene);
            } else {
                i += 1;
            }
        }

        self.lost.expire(self.now_ms, scene);
    }
}
