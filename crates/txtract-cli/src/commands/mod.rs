//! Subcommand implementations and the helpers they share.

pub mod batch;
pub mod categories;
pub mod config;
pub mod scan;

use std::path::{Path, PathBuf};

use tracing::debug;

use txtract_core::TxtractConfig;

/// `<config_dir>/txtract/config.json`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("txtract")
        .join("config.json")
}

/// The `--config` path if given, otherwise the default location.
pub fn config_path(config_path: Option<&str>) -> PathBuf {
    config_path.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load configuration, falling back to defaults when no file exists.
///
/// An explicit `--config` path must exist.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<TxtractConfig> {
    if let Some(path) = config_path {
        let path = Path::new(path);
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        return Ok(TxtractConfig::from_file(path)?);
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Loading config from {}", path.display());
        Ok(TxtractConfig::from_file(&path)?)
    } else {
        Ok(TxtractConfig::default())
    }
}
