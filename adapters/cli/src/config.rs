//! Engine configuration loaded from an optional TOML file.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use pellet_rush_engine::EngineConfig;

/// Loads the engine tunables, falling back to defaults when no file is given.
pub(crate) fn load(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file {}", path.display()))
}
