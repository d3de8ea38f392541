//! Packs command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::json;
use xmn_core::{DirectoryPacks, PackRegistry};

/// Run the packs command
pub fn run(root: &Path, json: bool) -> Result<()> {
    let registry = DirectoryPacks::new(root);
    let packs = registry
        .enabled_packs()
        .with_context(|| format!("Failed to read packs under {:?}", root))?;

    if json {
        let entries: Vec<_> = packs
            .iter()
            .map(|p| {
                json!({
                    "name": p.name,
                    "directory": p.directory,
                    "version": p.version.as_ref().map(|v| v.to_string()),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if packs.is_empty() {
        println!("No enabled packs under {}", root.display());
        return Ok(());
    }

    for pack in &packs {
        let version = pack
            .version
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("{:<24} {:<10} {}", pack.name, version, pack.directory.display());
    }
    Ok(())
}
