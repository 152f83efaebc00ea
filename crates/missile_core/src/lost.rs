//! Bounded recycler for stuck-arrow props ("lost missiles").
//!
//! An explicit head+len circular buffer: when the ring is full the oldest
//! prop is evicted to make room, and entries expire after a fixed lifetime.
//! Both paths destroy the prop through the scene collaborator, which caps
//! the amount of litter a busy battlefield can leave in the world.

use crate::vfx::{PropId, SceneProps};

/// Ring capacity.
pub const MAX_LOST_MISSILES: usize = 512;
/// Lifetime of one stuck-arrow prop.
pub const LOST_MISSILE_MAX_LIFE_MS: u64 = 120_000;

#[derive(Debug, Clone, Copy)]
struct LostMissile {
    prop: PropId,
    end_time_ms: u64,
}

#[derive(Debug)]
pub struct LostMissiles {
    slots: Box<[Option<LostMissile>]>,
    head: usize,
    len: usize,
}

impl Default for LostMissiles {
    fn default() -> Self {
        Self {
            slots: vec![None; MAX_LOST_MISSILES].into_boxed_slice(),
            head: 0,
            len: 0,
        }
    }
}

impl LostMissiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Forget all entries without destroying props; scene teardown owns them
    /// at that point.
    pub(crate) fn clear(&mut self) {
        self.slots.fill(None);
        self.head = 0;
        self.len = 0;
    }

    /// Append a prop; evicts (and destroys) the oldest entry when full.
    pub fn push(&mut self, prop: PropId, now_ms: u64, scene: &mut dyn SceneProps) {
        if self.len == self.slots.len() {
            if let Some(old) = self.slots[self.head].take() {
                scene.destroy_prop(old.prop);
            }
            self.head = (self.head + 1) % self.slots.len();
            self.len -= 1;
        }
        let tail = (self.head + self.len) % self.slots.len();
        self.slots[tail] = Some(LostMissile {
            prop,
            end_time_ms: now_ms + LOST_MISSILE_MAX_LIFE_MS,
        });
        self.len += 1;
    }

    /// Destroy every entry whose lifetime has passed.
    pub fn expire(&mut self, now_ms: u64, scene: &mut dyn SceneProps) {
        while self.len > 0 {
            let Some(entry) = self.slots[self.head] else {
                break;
            };
            if now_ms <= entry.end_time_ms {
                break;
            }
            self.slots[self.head] = None;
            scene.destroy_prop(entry.prop);
            self.head = (self.head + 1) % self.slots.len();
            self.len -= 1;
        }
        if self.len == 0 {
            self.head = 0;
        }
    }
}
