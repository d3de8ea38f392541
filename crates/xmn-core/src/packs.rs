//! Enabled mod pack discovery.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::version::Version;

/// File name of a pack manifest inside a pack directory.
pub const MANIFEST_FILE: &str = "pack.json";

/// An enabled mod pack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pack {
    pub name: String,
    pub directory: PathBuf,
    pub version: Option<Version>,
}

impl Pack {
    pub fn new(name: impl Into<String>, directory: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            directory: directory.into(),
            version: None,
        }
    }
}

/// Contents of a `pack.json` manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackManifest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Capability to enumerate the currently enabled packs.
pub trait PackRegistry {
    fn enabled_packs(&self) -> Result<Vec<Pack>>;

    fn find(&self, name: &str) -> Result<Option<Pack>> {
        Ok(self.enabled_packs()?.into_iter().find(|p| p.name == name))
    }

    fn is_installed(&self, name: &str) -> Result<bool> {
        Ok(self.find(name)?.is_some())
    }
}

/// Fixed list of packs.
#[derive(Debug, Clone, Default)]
pub struct StaticPacks {
    packs: Vec<Pack>,
}

impl StaticPacks {
    pub fn new(packs: Vec<Pack>) -> Self {
        Self { packs }
    }

    pub fn push(&mut self, pack: Pack) {
        self.packs.push(pack);
    }
}

impl PackRegistry for StaticPacks {
    fn enabled_packs(&self) -> Result<Vec<Pack>> {
        Ok(self.packs.clone())
    }
}

/// Packs discovered from `<root>/<dir>/pack.json` manifests.
///
/// Directories without a manifest are ignored. Manifests that fail to parse
/// are logged and skipped, as are packs with `"enabled": false`.
#[derive(Debug, Clone)]
pub struct DirectoryPacks {
    root: PathBuf,
}

impl DirectoryPacks {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read_manifest(path: &Path) -> Result<PackManifest> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl PackRegistry for DirectoryPacks {
    fn enabled_packs(&self) -> Result<Vec<Pack>> {
        let mut packs = Vec::new();

        for entry in fs::read_dir(&self.root)? {
            let directory = entry?.path();
            let manifest_path = directory.join(MANIFEST_FILE);
            if !manifest_path.is_file() {
                continue;
            }

            let manifest = match Self::read_manifest(&manifest_path) {
                Ok(m) => m,
                Err(e) => {
                    warn!("Skipping pack manifest {:?}: {}", manifest_path, e);
                    continue;
                }
            };

            if !manifest.enabled {
                debug!("Pack {} is disabled", manifest.name);
                continue;
            }

            let version = match manifest.version.as_deref().map(str::parse::<Version>) {
                Some(Ok(v)) => Some(v),
                Some(Err(e)) => {
                    warn!("Pack {} has an unreadable version: {}", manifest.name, e);
                    None
                }
                None => None,
            };

            packs.push(Pack {
                name: manifest.name,
                directory,
                version,
            });
        }

        packs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(packs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_pack(root: &Path, dir: &str, manifest: &str) {
        let path = root.join(dir);
        fs::create_dir_all(&path).unwrap();
        fs::write(path.join(MANIFEST_FILE), manifest).unwrap();
    }

    #[test]
    fn test_static_packs_lookup() {
        let packs = StaticPacks::new(vec![Pack::new("RailTweaks", "/mods/rail")]);

        assert!(packs.is_installed("RailTweaks").unwrap());
        assert!(!packs.is_installed("Other").unwrap());
        assert_eq!(
            packs.find("RailTweaks").unwrap().unwrap().directory,
            PathBuf::from("/mods/rail")
        );
    }

    #[test]
    fn test_directory_packs_discovery() {
        let temp = TempDir::new().unwrap();
        write_pack(temp.path(), "b", r#"{"name": "Beta", "version": "1.2.0"}"#);
        write_pack(temp.path(), "a", r#"{"name": "Alpha"}"#);
        write_pack(temp.path(), "off", r#"{"name": "Off", "enabled": false}"#);
        write_pack(temp.path(), "broken", "{ not json");
        fs::create_dir_all(temp.path().join("no-manifest")).unwrap();

        let packs = DirectoryPacks::new(temp.path()).enabled_packs().unwrap();
        let names: Vec<&str> = packs.iter().map(|p| p.name.as_str()).collect();

        assert_eq!(names, vec!["Alpha", "Beta"]);
        assert_eq!(packs[0].directory, temp.path().join("a"));
        assert_eq!(packs[0].version, None);
        assert_eq!(packs[1].version, Some("1.2.0".parse().unwrap()));
    }

    #[test]
    fn test_directory_packs_bad_version_is_ignored() {
        let temp = TempDir::new().unwrap();
        write_pack(temp.path(), "a", r#"{"name": "Alpha", "version": "one"}"#);

        let packs = DirectoryPacks::new(temp.path()).enabled_packs().unwrap();
        assert_eq!(packs.len(), 1);
        assert_eq!(packs[0].version, None);
    }

    #[test]
    fn test_directory_packs_missing_root() {
        let temp = TempDir::new().unwrap();
        let registry = DirectoryPacks::new(temp.path().join("missing"));
        assert!(registry.enabled_packs().is_err());
    }
}
