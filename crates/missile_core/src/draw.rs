//! CPU trail geometry: one colored line segment per missile, grouped into
//! the draw passes the renderer submits in order (wide under-border, mid
//! borders, cores, stippled misses). The simulation builds plain vertex
//! data; uploading and line rendering stay with the renderer.

use glam::Vec3;

use crate::store::{Missile, MissileWorld, ShotKind};

pub const ARROW_COLOR: [f32; 4] = [0.8, 0.8, 0.8, 1.0];
pub const ARROW_BORDER_COLOR: [f32; 4] = [0.8, 0.8, 0.8, 0.5];
pub const MISS_COLOR: [f32; 4] = [0.9, 0.6, 0.6, 1.0];
pub const CRITICAL_COLOR: [f32; 4] = [0.6, 0.9, 1.0, 1.0];
pub const CRITICAL_BORDER1_COLOR: [f32; 4] = [0.3, 0.7, 1.0, 0.6];
pub const CRITICAL_BORDER2_COLOR: [f32; 4] = [0.0, 0.5, 1.0, 0.4];

/// Dash pattern for missed shots.
pub const MISS_STIPPLE: u16 = 0x003F;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailVertex {
    pub pos: Vec3,
    pub color: [f32; 4],
}

/// One renderer submission: antialiased lines of `width`, optionally
/// stippled. `verts` holds segment endpoints pairwise.
#[derive(Debug, Clone)]
pub struct TrailPass {
    pub width: f32,
    pub stipple: Option<u16>,
    pub verts: Vec<TrailVertex>,
}

fn fade(color: [f32; 4], alpha_scale: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * alpha_scale]
}

/// Segment endpoints for one missile: the tail fades out over the trace
/// window behind the head, and the head clamps to the target point once the
/// shot has passed it.
fn segment(mis: &Missile, color: [f32; 4]) -> [TrailVertex; 2] {
    let tail = if mis.covered_dist < mis.trace_length {
        TrailVertex {
            pos: mis.pos - mis.dir * mis.covered_dist,
            color: fade(color, (mis.trace_length - mis.covered_dist) / mis.trace_length),
        }
    } else {
        TrailVertex {
            pos: mis.pos - mis.dir * mis.trace_length,
            color: fade(color, 0.0),
        }
    };
    let head = if mis.remaining_dist < 0.0 {
        TrailVertex {
            pos: mis.pos + mis.dir * mis.remaining_dist,
            color: fade(color, (mis.trace_length + mis.remaining_dist) / mis.trace_length),
        }
    } else {
        TrailVertex { pos: mis.pos, color }
    };
    [tail, head]
}

/// Build the per-frame draw passes from live missile state.
pub fn trail_passes(world: &MissileWorld) -> Vec<TrailPass> {
    let mut under = TrailPass { width: 7.0, stipple: None, verts: Vec::new() };
    let mut borders = TrailPass { width: 3.0, stipple: None, verts: Vec::new() };
    let mut cores = TrailPass { width: 1.0, stipple: None, verts: Vec::new() };
    let mut missed = TrailPass {
        width: 2.0,
        stipple: Some(MISS_STIPPLE),
        verts: Vec::new(),
    };

    for mis in world.iter().rev() {
        match mis.shot {
            ShotKind::Normal => {
                borders.verts.extend(segment(mis, ARROW_BORDER_COLOR));
                cores.verts.extend(segment(mis, ARROW_COLOR));
            }
            ShotKind::Critical => {
                under.verts.extend(segment(mis, CRITICAL_BORDER2_COLOR));
                borders.verts.extend(segment(mis, CRITICAL_BORDER1_COLOR));
                cores.verts.extend(segment(mis, CRITICAL_COLOR));
            }
            ShotKind::Missed => {
                missed.verts.extend(segment(mis, MISS_COLOR));
            }
        }
    }

    vec![under, borders, cores, missed]
}
