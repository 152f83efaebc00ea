//! Missile type definitions parsed from the XML definition file.
//!
//! The table is fixed-size and zero-initialized: a definition file that
//! cannot be read or parsed leaves every entry a no-op Regular missile with
//! zero speed rather than a partially applied table. Per-entry problems are
//! logged and flagged through [`MissileTypeRegistry::complete`] while the
//! remaining definitions keep loading.

use anyhow::{Context, Result, bail};
use std::path::Path;

/// Number of slots in the definition table.
pub const MAX_MISSILE_DEFS: usize = 16;

/// Elemental effect attached to a missile's flight visuals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissileEffect {
    #[default]
    Regular,
    Magic,
    Fire,
    Ice,
    Explosive,
}

impl MissileEffect {
    fn parse(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("none") {
            Some(Self::Regular)
        } else if name.eq_ignore_ascii_case("magic") {
            Some(Self::Magic)
        } else if name.eq_ignore_ascii_case("fire") {
            Some(Self::Fire)
        } else if name.eq_ignore_ascii_case("ice") {
            Some(Self::Ice)
        } else if name.eq_ignore_ascii_case("explosive") {
            Some(Self::Explosive)
        } else {
            None
        }
    }
}

/// One projectile archetype. Immutable after load; in-flight missiles keep a
/// snapshot of `speed`/`trace_length` so later reloads do not affect them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MissileTypeDef {
    /// Flight speed in world units per second.
    pub speed: f32,
    /// Visual tail length of the rendered streak, world units.
    pub trace_length: f32,
    /// Physical mesh length, used to offset the launch anchor.
    pub mesh_length: f32,
    /// Asset path of the stuck-arrow prop left by close misses.
    pub lost_mesh: String,
    pub effect: MissileEffect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MissileTypeRegistry {
    defs: [MissileTypeDef; MAX_MISSILE_DEFS],
    /// False when any definition failed to parse cleanly.
    pub complete: bool,
}

impl Default for MissileTypeRegistry {
    fn default() -> Self {
        Self {
            defs: std::array::from_fn(|_| MissileTypeDef::default()),
            complete: true,
        }
    }
}

impl MissileTypeRegistry {
    /// Definition for `kind`, or `None` when the index is out of range.
    pub fn get(&self, kind: usize) -> Option<&MissileTypeDef> {
        self.defs.get(kind)
    }

    /// Load from the default location under `data/`.
    pub fn load_default() -> Self {
        Self::load(&crate::loader::data_root().join("actor_defs/missile_defs.xml"))
    }

    /// Load a definition file; any file-level failure is logged and yields
    /// the zeroed table.
    pub fn load(path: &Path) -> Self {
        match Self::parse_file(path) {
            Ok(reg) => reg,
            Err(e) => {
                log::error!("missiles: unable to load definition file {}: {e:#}", path.display());
                Self::default()
            }
        }
    }

    fn parse_file(path: &Path) -> Result<Self> {
        let txt = std::fs::read_to_string(path)
            .with_context(|| format!("read {}", path.display()))?;
        Self::parse_str(&txt)
    }

    /// Parse definition XML. `Err` only for unreadable documents or a wrong
    /// root element; per-definition problems are logged, clear `complete`,
    /// and parsing continues with the remaining siblings.
    pub fn parse_str(xml: &str) -> Result<Self> {
        let doc = roxmltree::Document::parse(xml).context("parse missile defs XML")?;
        let root = doc.root_element();
        if !root.tag_name().name().eq_ignore_ascii_case("missiles") {
            bail!("unknown root element {:?} (\"missiles\" expected)", root.tag_name().name());
        }
        let mut reg = Self::default();
        for node in root.children().filter(roxmltree::Node::is_element) {
            if node.tag_name().name().eq_ignore_ascii_case("missile") {
                if !reg.parse_def(node) {
                    reg.complete = false;
                }
            } else {
                log::error!(
                    "missiles: parse error: missile entry expected, got {:?}",
                    node.tag_name().name()
                );
                reg.complete = false;
            }
        }
        Ok(reg)
    }

    /// Returns false when the definition did not parse cleanly. Known fields
    /// parsed before an unknown element are still applied.
    fn parse_def(&mut self, node: roxmltree::Node) -> bool {
        let id = node.attribute("id").and_then(|v| v.parse::<usize>().ok());
        let Some(idx) = id.filter(|&i| i < MAX_MISSILE_DEFS) else {
            log::error!(
                "missiles: missing or out-of-range definition id: {:?}",
                node.attribute("id")
            );
            return false;
        };
        let def = &mut self.defs[idx];
        let mut ok = true;
        for item in node.children().filter(roxmltree::Node::is_element) {
            let name = item.tag_name().name();
            let text = item.text().unwrap_or("").trim();
            if name.eq_ignore_ascii_case("mesh") {
                def.lost_mesh = text.to_string();
            } else if name.eq_ignore_ascii_case("mesh_length") {
                ok &= parse_float(text, "mesh_length", idx, &mut def.mesh_length);
            } else if name.eq_ignore_ascii_case("trace_length") {
                ok &= parse_float(text, "trace_length", idx, &mut def.trace_length);
            } else if name.eq_ignore_ascii_case("speed") {
                ok &= parse_float(text, "speed", idx, &mut def.speed);
            } else if name.eq_ignore_ascii_case("effect") {
                def.effect = MissileEffect::parse(text).unwrap_or_else(|| {
                    log::warn!("missiles: {text:?} is an unknown effect, using none");
                    MissileEffect::Regular
                });
            } else {
                log::error!("missiles: unknown element {name:?} in definition {idx}");
                ok = false;
            }
        }
        ok
    }
}

fn parse_float(text: &str, field: &str, idx: usize, out: &mut f32) -> bool {
    match text.parse::<f32>() {
        Ok(v) => {
            *out = v;
            true
        }
        Err(_) => {
            log::warn!("missiles: bad value {text:?} for {field} in definition {idx}");
            false
        }
    }
}
