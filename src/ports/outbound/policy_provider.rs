use crate::dependency_resolution::domain::{
    ComponentId, ComponentToResolve, DependenciesOverrides, PackageJson, PackageMap,
    WorkspacePolicy,
};
use crate::shared::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// PolicyProviderSet port bundling every policy source the resolver reads
///
/// Providers are shared read-only by all resolutions of a batch; they must
/// not change while a batch is in flight.
#[async_trait]
pub trait PolicyProviderSet: Send + Sync {
    /// Versions declared at the workspace level
    fn workspace_policy(&self) -> &WorkspacePolicy;

    /// Core aspects: package name -> aspect id
    fn core_aspects(&self) -> &BTreeMap<String, String>;

    /// The workspace (consumer) package.json, if there is one
    fn consumer_package_json(&self) -> Option<&PackageJson>;

    /// Peers an environment declares for itself; `None` when the component
    /// is not an environment
    async fn env_peers_for_env_itself(
        &self,
        component: &ComponentToResolve,
    ) -> Result<Option<PackageMap>>;

    /// Dependency overrides detected from the component's configured aspects
    async fn auto_detect_overrides(
        &self,
        component: &ComponentToResolve,
    ) -> Result<DependenciesOverrides>;

    /// Dependencies recorded by a previous config merge (e.g. lane merge)
    fn auto_detect_config_merge(&self, id: &ComponentId) -> Option<DependenciesOverrides>;
}
