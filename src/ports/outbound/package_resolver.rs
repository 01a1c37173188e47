use crate::dependency_resolution::domain::ComponentId;
use crate::shared::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// An installed package as found in node_modules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledPackage {
    pub name: String,
    /// Set when the package.json marks the package as a component
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_id: Option<ComponentId>,
}

/// PackageResolver port for locating installed packages
///
/// # Async Support
/// Lookups may hit the filesystem, so they are async.
/// Implementations must be `Send + Sync` to support concurrent access.
#[async_trait]
pub trait PackageResolver: Send + Sync {
    /// Resolves an installed package as seen from a component
    ///
    /// # Arguments
    /// * `package_name` - Name of the package
    /// * `component_root_dir` - Root dir of the resolving component, relative to the workspace
    ///
    /// # Returns
    /// The installed package, or `None` when it is not installed
    async fn resolve_package(
        &self,
        package_name: &str,
        component_root_dir: &str,
    ) -> Result<Option<InstalledPackage>>;
}
