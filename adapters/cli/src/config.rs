use std::{fs, path::Path};

use anyhow::{ensure, Context, Result};
use robodino_system_session::SessionConfig;

/// Loads the session configuration, falling back to defaults when no file is
/// given.
pub(crate) fn load(path: Option<&Path>) -> Result<SessionConfig> {
    let Some(path) = path else {
        return Ok(SessionConfig::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config = parse(&contents)
        .with_context(|| format!("invalid config file at {}", path.display()))?;
    tracing::debug!(path = %path.display(), ?config, "loaded config");
    Ok(config)
}

fn parse(contents: &str) -> Result<SessionConfig> {
    let config: SessionConfig =
        toml::from_str(contents).context("failed to parse config toml contents")?;
    ensure!(
        config.grid_width > 0 && config.grid_height > 0,
        "grid_width and grid_height must both be at least 1"
    );
    ensure!(config.max_health > 0, "max_health must be at least 1");
    ensure!(
        (1..=config.max_health).contains(&config.default_health),
        "default_health {} must be in [1; {}]",
        config.default_health,
        config.max_health
    );
    Ok(config)
}
