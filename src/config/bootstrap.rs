// Author: Dustin Pilgrim
// License: MIT

use std::fs;

use eyre::{eyre, Result, WrapErr};

use crate::sinfo;

/// Writes the embedded default to the user config path, only if nothing is there yet.
pub fn ensure_user_config_exists() -> Result<()> {
    let path = super::user_config_path().ok_or_else(|| eyre!("no user config directory"))?;

    if path.exists() {
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .wrap_err_with(|| format!("failed to create {}", parent.display()))?;
    }

    fs::write(&path, super::DEFAULT_CONFIG)
        .wrap_err_with(|| format!("failed to write {}", path.display()))?;

    sinfo!("Config", "wrote default config to {}", path.display());
    Ok(())
}
