//! Collaborator seams for the effect renderer and the scene-object layer.
//!
//! The simulation never draws and never owns 3D objects; it reports missile
//! lifecycle events and asks for stuck-arrow props through these traits. A
//! renderer must keep any parallel per-missile state in sync from these
//! events alone: indices are dense and get renamed on removal (see
//! [`crate::store`]).

use glam::Vec3;

use crate::store::ShotKind;

/// Handle to a decorative object owned by the scene layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropId(pub u32);

/// Missile lifecycle events consumed by the effect renderer.
pub trait MissileVfx {
    /// A missile now lives at `index`. `level` is a detail hint (1..=10);
    /// `shot` selects the effect color family.
    fn missile_added(&mut self, index: usize, level: u8, shot: ShotKind);
    /// The missile at `index` is gone.
    fn missile_removed(&mut self, index: usize);
    /// The missile previously at `from` now lives at `to`.
    fn missile_renamed(&mut self, from: usize, to: usize);
}

/// Scene-object layer: spawns and destroys stuck-arrow props.
pub trait SceneProps {
    /// Create a prop at `pos` with Euler rotation `rot_deg` (degrees).
    /// `None` when the object could not be created; the litter entry is
    /// dropped silently in that case.
    fn spawn_prop(&mut self, mesh: &str, pos: Vec3, rot_deg: Vec3) -> Option<PropId>;
    fn destroy_prop(&mut self, prop: PropId);
}

/// No-op collaborator for headless runs and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullFx;

impl MissileVfx for NullFx {
    fn missile_added(&mut self, _index: usize, _level: u8, _shot: ShotKind) {}
    fn missile_removed(&mut self, _index: usize) {}
    fn missile_renamed(&mut self, _from: usize, _to: usize) {}
}

impl SceneProps for NullFx {
    fn spawn_prop(&mut self, _mesh: &str, _pos: Vec3, _rot_deg: Vec3) -> Option<PropId> {
        None
    }
    fn destroy_prop(&mut self, _prop: PropId) {}
}
