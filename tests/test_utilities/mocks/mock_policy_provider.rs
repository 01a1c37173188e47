use async_trait::async_trait;
use bit_deps::dependency_resolution::domain::{
    DependenciesOverrides, PackageJson, PackageMap, WorkspacePolicy,
};
use bit_deps::prelude::*;
use std::collections::BTreeMap;

/// Mock PolicyProviderSet with builder-style setters
#[derive(Default, Clone)]
pub struct MockPolicyProvider {
    workspace_policy: WorkspacePolicy,
    core_aspects: BTreeMap<String, String>,
    package_json: Option<PackageJson>,
    env_peers: BTreeMap<String, PackageMap>,
    auto_detect_overrides: BTreeMap<String, DependenciesOverrides>,
    config_merge: BTreeMap<String, DependenciesOverrides>,
}

fn package_map(entries: &[(&str, &str)]) -> PackageMap {
    entries
        .iter()
        .map(|(name, version)| (name.to_string(), version.to_string()))
        .collect()
}

impl MockPolicyProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workspace_dependencies(mut self, entries: &[(&str, &str)]) -> Self {
        self.workspace_policy.dependencies.extend(package_map(entries));
        self
    }

    pub fn with_workspace_peers(mut self, entries: &[(&str, &str)]) -> Self {
        self.workspace_policy
            .peer_dependencies
            .extend(package_map(entries));
        self
    }

    pub fn with_core_aspect(mut self, package_name: &str, aspect_id: &str) -> Self {
        self.core_aspects
            .insert(package_name.to_string(), aspect_id.to_string());
        self
    }

    pub fn with_package_json(mut self, package_json: PackageJson) -> Self {
        self.package_json = Some(package_json);
        self
    }

    pub fn with_env_peers(mut self, env_id: &str, entries: &[(&str, &str)]) -> Self {
        self.env_peers.insert(env_id.to_string(), package_map(entries));
        self
    }

    pub fn with_auto_detect_overrides(
        mut self,
        id: &str,
        overrides: DependenciesOverrides,
    ) -> Self {
        self.auto_detect_overrides.insert(id.to_string(), overrides);
        self
    }
}

#[async_trait]
impl PolicyProviderSet for MockPolicyProvider {
    fn workspace_policy(&self) -> &WorkspacePolicy {
        &self.workspace_policy
    }

    fn core_aspects(&self) -> &BTreeMap<String, String> {
        &self.core_aspects
    }

    fn consumer_package_json(&self) -> Option<&PackageJson> {
        self.package_json.as_ref()
    }

    async fn env_peers_for_env_itself(
        &self,
        component: &ComponentToResolve,
    ) -> Result<Option<PackageMap>> {
        Ok(self
            .env_peers
            .get(&component.id.to_string_without_version())
            .cloned())
    }

    async fn auto_detect_overrides(
        &self,
        component: &ComponentToResolve,
    ) -> Result<DependenciesOverrides> {
        Ok(self
            .auto_detect_overrides
            .get(&component.id.to_string_without_version())
            .cloned()
            .unwrap_or_default())
    }

    fn auto_detect_config_merge(&self, id: &ComponentId) -> Option<DependenciesOverrides> {
        self.config_merge.get(&id.to_string_without_version()).cloned()
    }
}
