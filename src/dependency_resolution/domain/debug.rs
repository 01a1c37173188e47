use super::ComponentId;
use serde::{Deserialize, Serialize};

/// Where the version of a component dependency came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VersionSource {
    /// The dependency's own package.json
    DependencyPkgJson,
    /// The dependent's package.json range
    DependentPkgJson,
    BitMap,
    Model,
    MergeConfig,
    ComponentConfig,
}

/// Where the identity of a component dependency came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdSource {
    DependencyPkgJson,
    DependencyPath,
}

/// Diagnostic trace of how one component dependency was resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugComponentsDependency {
    pub id: ComponentId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency_package_json_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependent_package_json_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_resolved_from: Option<VersionSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_id_resolved_from: Option<IdSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_name: Option<String>,
}

impl DebugComponentsDependency {
    pub fn new(id: ComponentId) -> Self {
        Self {
            id,
            import_source: None,
            dependency_package_json_path: None,
            dependent_package_json_path: None,
            version_resolved_from: None,
            version: None,
            component_id_resolved_from: None,
            package_name: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugDependencies {
    pub components: Vec<DebugComponentsDependency>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unidentified_packages: Vec<String>,
}

impl DebugDependencies {
    pub fn find_mut(&mut self, id: &ComponentId) -> Option<&mut DebugComponentsDependency> {
        self.components
            .iter_mut()
            .find(|dep| dep.id.is_equal_without_version(id))
    }
}
