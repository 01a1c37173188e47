use crate::application::dto::{ResolveRequest, ResolveResponse};
use crate::shared::Result;
use async_trait::async_trait;

/// DependencyResolutionPort - Inbound port for resolving component dependencies
///
/// This port defines the interface that external adapters (CLI, API, etc.)
/// use to trigger dependency resolution of a workspace.
#[async_trait(?Send)]
pub trait DependencyResolutionPort {
    /// Resolves the dependencies of the requested components
    ///
    /// # Arguments
    /// * `request` - Snapshot location and component selection
    ///
    /// # Returns
    /// Per-component `DependenciesData` in snapshot order
    ///
    /// # Errors
    /// Returns an error if:
    /// - The snapshot cannot be read or parsed
    /// - A component's dependency tree is missing one of its files
    /// - A policy source or package lookup fails
    async fn resolve_dependencies(&self, request: ResolveRequest) -> Result<ResolveResponse>;
}
