use super::{AllDependencies, AllPackagesDependencies, DependencyField, IssuesList};
use serde::{Deserialize, Serialize};

/// Per-field lists of dependencies touched by override rules
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualDependencies {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dev_dependencies: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub peer_dependencies: Vec<String>,
}

impl ManualDependencies {
    pub fn get(&self, field: DependencyField) -> &[String] {
        match field {
            DependencyField::Dependencies => &self.dependencies,
            DependencyField::DevDependencies => &self.dev_dependencies,
            DependencyField::PeerDependencies => &self.peer_dependencies,
        }
    }

    /// Records `value` under `field` once
    pub fn add(&mut self, field: DependencyField, value: impl Into<String>) {
        let value = value.into();
        let list = match field {
            DependencyField::Dependencies => &mut self.dependencies,
            DependencyField::DevDependencies => &mut self.dev_dependencies,
            DependencyField::PeerDependencies => &mut self.peer_dependencies,
        };
        if !list.contains(&value) {
            list.push(value);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
            && self.dev_dependencies.is_empty()
            && self.peer_dependencies.is_empty()
    }
}

/// Result of resolving one component's dependencies
///
/// This is persisted into component versions, so the serialized shape is
/// part of the contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependenciesData {
    pub dependencies: AllDependencies,
    pub package_dependencies: AllPackagesDependencies,
    pub issues: IssuesList,
    #[serde(default)]
    pub core_aspects: Vec<String>,
    #[serde(default, skip_serializing_if = "ManualDependencies::is_empty")]
    pub manually_removed_dependencies: ManualDependencies,
    #[serde(default, skip_serializing_if = "ManualDependencies::is_empty")]
    pub manually_added_dependencies: ManualDependencies,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_package_dependencies: Vec<String>,
}

impl DependenciesData {
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }
}
