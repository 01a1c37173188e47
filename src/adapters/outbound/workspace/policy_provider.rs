use crate::dependency_resolution::domain::{
    ComponentId, ComponentToResolve, DependenciesOverrides, PackageJson, PackageMap,
    WorkspacePolicy,
};
use crate::ports::outbound::{PolicyProviderSet, WorkspaceSnapshot};
use crate::shared::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// SnapshotPolicyProvider adapter serving every policy source of a batch
///
/// Workspace policy and core aspects come from the configuration file; the
/// rest was captured with the workspace snapshot. Per-component data is
/// keyed by component id without version.
#[derive(Debug, Clone, Default)]
pub struct SnapshotPolicyProvider {
    workspace_policy: WorkspacePolicy,
    core_aspects: BTreeMap<String, String>,
    package_json: Option<PackageJson>,
    env_peers: BTreeMap<String, PackageMap>,
    auto_detect_overrides: BTreeMap<String, DependenciesOverrides>,
    auto_detect_config_merge: BTreeMap<String, DependenciesOverrides>,
}

impl SnapshotPolicyProvider {
    pub fn new(workspace_policy: WorkspacePolicy, core_aspects: BTreeMap<String, String>) -> Self {
        Self {
            workspace_policy,
            core_aspects,
            ..Default::default()
        }
    }

    /// Takes the policy data captured in a snapshot
    pub fn with_snapshot(mut self, snapshot: &WorkspaceSnapshot) -> Self {
        self.package_json = snapshot.package_json.clone();
        self.env_peers = snapshot.env_peers.clone();
        self.auto_detect_overrides = snapshot.auto_detect_overrides.clone();
        self.auto_detect_config_merge = snapshot.auto_detect_config_merge.clone();
        self
    }
}

#[async_trait]
impl PolicyProviderSet for SnapshotPolicyProvider {
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
        self.auto_detect_config_merge
            .get(&id.to_string_without_version())
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> WorkspaceSnapshot {
        serde_json::from_value(serde_json::json!({
            "packageJson": { "dependencies": { "lodash": "^4.17.21" } },
            "envPeers": { "my.scope/react-env": { "react": "^18.0.0" } },
            "autoDetectOverrides": {
                "my.scope/button": { "peerDependencies": { "react": "^18.0.0" } }
            }
        }))
        .unwrap()
    }

    fn component(id: &str) -> ComponentToResolve {
        ComponentToResolve::new(id.parse().unwrap(), "components/x", vec![])
    }

    #[tokio::test]
    async fn test_per_component_lookups_ignore_version() {
        let provider = SnapshotPolicyProvider::default().with_snapshot(&snapshot());

        let env = provider
            .env_peers_for_env_itself(&component("my.scope/react-env@1.0.0"))
            .await
            .unwrap();
        assert_eq!(env.unwrap().get("react").unwrap(), "^18.0.0");

        let overrides = provider
            .auto_detect_overrides(&component("my.scope/button@0.0.3"))
            .await
            .unwrap();
        assert!(overrides.peer_dependencies.contains_key("react"));

        let none = provider
            .auto_detect_overrides(&component("my.scope/card"))
            .await
            .unwrap();
        assert!(none.is_empty());
        assert!(provider
            .env_peers_for_env_itself(&component("my.scope/card"))
            .await
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_config_and_snapshot_sources() {
        let mut policy = WorkspacePolicy::default();
        policy
            .dependencies
            .insert("chalk".to_string(), "^5.0.0".to_string());
        let provider =
            SnapshotPolicyProvider::new(policy, BTreeMap::new()).with_snapshot(&snapshot());

        assert!(provider.workspace_policy().contains_regular("chalk"));
        assert_eq!(
            provider.consumer_package_json().unwrap().find_version("lodash"),
            Some("^4.17.21")
        );
        assert!(provider.core_aspects().is_empty());
    }
}
