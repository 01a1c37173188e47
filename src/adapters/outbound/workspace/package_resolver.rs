use crate::ports::outbound::{InstalledPackage, PackageResolver};
use crate::shared::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// SnapshotPackageResolver adapter resolving packages from the installed
/// packages recorded in a workspace snapshot
///
/// The snapshot captures one workspace-level node_modules, so the component
/// root dir does not change the answer.
pub struct SnapshotPackageResolver {
    installed: BTreeMap<String, InstalledPackage>,
}

impl SnapshotPackageResolver {
    pub fn new(installed: BTreeMap<String, InstalledPackage>) -> Self {
        Self { installed }
    }
}

#[async_trait]
impl PackageResolver for SnapshotPackageResolver {
    async fn resolve_package(
        &self,
        package_name: &str,
        _component_root_dir: &str,
    ) -> Result<Option<InstalledPackage>> {
        Ok(self.installed.get(package_name).cloned())
    }
}
