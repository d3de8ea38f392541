//! Settings command implementation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::Value;
use tracing::info;
use xmn_core::DirectoryPacks;
use xmn_core::service::settings_path;

/// Run the settings command
pub fn run(root: &Path, pack: &str) -> Result<()> {
    let registry = DirectoryPacks::new(root);
    let path = settings_path(&registry, pack)?;

    if !path.exists() {
        println!("{} has no settings document yet ({})", pack, path.display());
        return Ok(());
    }
    info!("Reading settings from {:?}", path);

    let content =
        fs::read_to_string(&path).with_context(|| format!("Failed to read {:?}", path))?;
    let document: Value = match serde_json::from_str(&content) {
        Ok(v) => v,
        Err(e) => {
            bail!(
                "Settings document {} is malformed ({}); the mod will replace it with defaults on next load",
                path.display(),
                e
            );
        }
    };

    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}
