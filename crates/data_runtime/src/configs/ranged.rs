//! Ranged-combat tuning loaded from data/config/ranged.toml with sensible
//! defaults and clamping.

use anyhow::{Context, Result};

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct RangedConfigFile {
    /// Whether missile adds are announced to the effect renderer at all.
    pub eye_candy: bool,
    /// Detail hint forwarded on missile add (1..=10; low-detail clients use 6).
    pub effect_level: u8,
    /// World bounds used to sanity-check aim/fire targets, world units.
    pub map_size: [f32; 2],
}

impl Default for RangedConfigFile {
    fn default() -> Self {
        Self {
            eye_candy: true,
            effect_level: 10,
            map_size: [576.0, 576.0],
        }
    }
}

fn clamp(mut cfg: RangedConfigFile) -> RangedConfigFile {
    cfg.effect_level = cfg.effect_level.clamp(1, 10);
    if cfg.map_size[0] < 3.0 {
        cfg.map_size[0] = 3.0;
    }
    if cfg.map_size[1] < 3.0 {
        cfg.map_size[1] = 3.0;
    }
    cfg
}

/// Load the ranged config from the default location, falling back to defaults.
pub fn load_default() -> Result<RangedConfigFile> {
    let path = crate::loader::data_root().join("config/ranged.toml");
    if !path.is_file() {
        return Ok(RangedConfigFile::default());
    }
    let txt = std::fs::read_to_string(&path)
        .with_context(|| format!("read {}", path.display()))?;
    let parsed: RangedConfigFile = toml::from_str(&txt).context("parse TOML")?;
    Ok(clamp(parsed))
}
