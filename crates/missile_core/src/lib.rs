//! missile_core: client-side ranged-combat simulation.
//!
//! Owns in-flight missiles and the stuck-arrow litter they leave behind,
//! produces trail geometry for the renderer, and computes the rotations that
//! orient a firing actor's skeleton. The renderer and the scene-object layer
//! are collaborators behind the traits in [`vfx`]; the aim/fire entry points
//! in [`actors`] are safe to call from the network-message thread.

pub mod actors;
pub mod aim;
pub mod draw;
pub mod lost;
pub mod store;
pub mod vfx;
