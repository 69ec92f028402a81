//! Optional TOML configuration.
//!
//! ```toml
//! [placement]
//! min_distance = 2.5
//! max_attempts = 50
//!
//! [server]
//! addr = "127.0.0.1:7878"
//! ```
//!
//! Every key is optional. Without a file the built-in defaults apply.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use galaxy_core::PlacementConfig;
use serde::Deserialize;

pub const CONFIG_ENV: &str = "GALAXY_CONFIG";
pub const DEFAULT_ADDR: &str = "127.0.0.1:7878";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GalaxyConfig {
    pub placement: PlacementConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
        }
    }
}

/// Priority: explicit `--config` > `GALAXY_CONFIG` env > none.
pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    env::var(CONFIG_ENV)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Parse and validate config text.
pub fn parse(content: &str) -> Result<GalaxyConfig> {
    let config: GalaxyConfig = toml::from_str(content).context("invalid config TOML")?;
    config
        .placement
        .validate()
        .context("invalid [placement] table")?;
    Ok(config)
}

/// Load the config at the resolved path, or defaults if there is none.
pub fn load(explicit: Option<&Path>) -> Result<GalaxyConfig> {
    let Some(path) = resolve_path(explicit) else {
        return Ok(GalaxyConfig::default());
    };
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config = parse(&content).with_context(|| format!("in {}", path.display()))?;
    tracing::debug!(path = %path.display(), ?config, "loaded config");
    Ok(config)
}
