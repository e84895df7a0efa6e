// Author: Dustin Pilgrim
// License: MIT

pub mod bootstrap;
pub mod parser;

use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};
use rune_cfg::RuneConfig;

use crate::core::config::ConfigFile;
use crate::sdebug;

pub const DEFAULT_CONFIG: &str = include_str!("../../assets/vigil.rune");

pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("vigil").join("vigil.rune"))
}

pub fn system_config_path() -> PathBuf {
    PathBuf::from("/etc/vigil/vigil.rune")
}

/// User config, then system config. When neither exists the user path is
/// returned and loading falls back to the embedded default.
pub fn resolve_default_config_path() -> PathBuf {
    let user = user_config_path();

    if let Some(p) = user.as_ref().filter(|p| p.exists()) {
        return p.clone();
    }

    let system = system_config_path();
    if system.exists() {
        return system;
    }

    user.unwrap_or(system)
}

pub fn load_from_path(path: &Path) -> Result<ConfigFile> {
    let config = if path.exists() {
        sdebug!("Config", "loading config from {}", path.display());
        RuneConfig::from_file(path)
            .wrap_err_with(|| format!("failed to load config from {}", path.display()))?
    } else {
        sdebug!("Config", "{} not found, using internal default", path.display());
        RuneConfig::from_str(DEFAULT_CONFIG).wrap_err("failed to parse internal default config")?
    };

    parser::parse_config(&config)
        .wrap_err_with(|| format!("invalid configuration in {}", path.display()))
}
