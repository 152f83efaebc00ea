//! data_runtime: data schemas and loaders for the ranged-combat client.
//!
//! The sim crate depends on this for the missile definition table and the
//! ranged tuning config. Loaders degrade to zeroed/default data instead of
//! failing the caller; see each module for the exact fallback.

pub mod loader;
pub mod specs {
    pub mod missiles;
}
pub mod configs {
    pub mod ranged;
}
