use super::InstalledPackage;
use crate::dependency_resolution::domain::{
    ComponentId, ComponentToResolve, DependenciesOverrides, PackageJson, PackageMap,
    RawDependencyTree,
};
use crate::shared::Result;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// A tracked component as recorded in the bitmap
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BitmapEntry {
    pub id: ComponentId,
    #[serde(default)]
    pub root_dir: String,
    /// Files relative to `root_dir`
    #[serde(default)]
    pub files: Vec<String>,
}

/// A component to resolve plus what the extractor found in its files
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSnapshot {
    #[serde(flatten)]
    pub component: ComponentToResolve,
    pub dependency_tree: RawDependencyTree,
}

/// Everything the resolver needs to know about a workspace, captured once
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceSnapshot {
    #[serde(default)]
    pub components: Vec<ComponentSnapshot>,
    #[serde(default)]
    pub bitmap: Vec<BitmapEntry>,
    /// Installed packages by name
    #[serde(default)]
    pub installed_packages: BTreeMap<String, InstalledPackage>,
    #[serde(default)]
    pub package_json: Option<PackageJson>,
    /// Env component id (without version) -> peers it declares for itself
    #[serde(default)]
    pub env_peers: BTreeMap<String, PackageMap>,
    /// Component id (without version) -> overrides detected from its aspects
    #[serde(default)]
    pub auto_detect_overrides: BTreeMap<String, DependenciesOverrides>,
    /// Component id (without version) -> dependencies from a config merge
    #[serde(default)]
    pub auto_detect_config_merge: BTreeMap<String, DependenciesOverrides>,
}

impl WorkspaceSnapshot {
    /// Bitmap entries, including components to resolve that the bitmap
    /// section does not list
    pub fn bitmap_entries(&self) -> Vec<BitmapEntry> {
        let mut entries = self.bitmap.clone();
        for snapshot in &self.components {
            let component = &snapshot.component;
            let listed = entries
                .iter()
                .any(|e| e.id.is_equal_without_version(&component.id));
            if !listed {
                entries.push(BitmapEntry {
                    id: component.id.clone(),
                    root_dir: component.root_dir.clone(),
                    files: component.files.clone(),
                });
            }
        }
        entries
    }
}

/// WorkspaceSnapshotReader port for loading a workspace snapshot
pub trait WorkspaceSnapshotReader {
    /// Reads and parses a snapshot file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a valid snapshot
    fn read_snapshot(&self, path: &Path) -> Result<WorkspaceSnapshot>;
}
