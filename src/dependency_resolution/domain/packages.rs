use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Package name -> version range. Ordered so serialization is stable.
pub type PackageMap = BTreeMap<String, String>;

/// Value of an override entry that removes a detected dependency
pub const MANUALLY_REMOVE_DEPENDENCY: &str = "-";

/// Value of an override entry that adds a dependency with the version
/// declared in the workspace package.json
pub const MANUALLY_ADD_DEPENDENCY: &str = "+";

/// The three dependency classifications of a package.json
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DependencyField {
    Dependencies,
    DevDependencies,
    PeerDependencies,
}

impl DependencyField {
    pub const ALL: [DependencyField; 3] = [
        DependencyField::Dependencies,
        DependencyField::DevDependencies,
        DependencyField::PeerDependencies,
    ];

    /// The package.json key of this field
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyField::Dependencies => "dependencies",
            DependencyField::DevDependencies => "devDependencies",
            DependencyField::PeerDependencies => "peerDependencies",
        }
    }

    /// The matching key of `AllPackagesDependencies`
    pub fn packages_key(&self) -> &'static str {
        match self {
            DependencyField::Dependencies => "packageDependencies",
            DependencyField::DevDependencies => "devPackageDependencies",
            DependencyField::PeerDependencies => "peerPackageDependencies",
        }
    }

    pub fn for_file(is_test_file: bool) -> Self {
        if is_test_file {
            DependencyField::DevDependencies
        } else {
            DependencyField::Dependencies
        }
    }
}

impl fmt::Display for DependencyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Package dependencies split by classification.
///
/// After post-processing a package name is a key of exactly one map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllPackagesDependencies {
    pub package_dependencies: PackageMap,
    pub dev_package_dependencies: PackageMap,
    pub peer_package_dependencies: PackageMap,
}

impl AllPackagesDependencies {
    pub fn get(&self, field: DependencyField) -> &PackageMap {
        match field {
            DependencyField::Dependencies => &self.package_dependencies,
            DependencyField::DevDependencies => &self.dev_package_dependencies,
            DependencyField::PeerDependencies => &self.peer_package_dependencies,
        }
    }

    pub fn get_mut(&mut self, field: DependencyField) -> &mut PackageMap {
        match field {
            DependencyField::Dependencies => &mut self.package_dependencies,
            DependencyField::DevDependencies => &mut self.dev_package_dependencies,
            DependencyField::PeerDependencies => &mut self.peer_package_dependencies,
        }
    }

    pub fn contains(&self, package_name: &str) -> bool {
        DependencyField::ALL
            .iter()
            .any(|field| self.get(*field).contains_key(package_name))
    }

    /// Moves a package into `field`, removing it from the other two maps
    pub fn set_exclusive(&mut self, field: DependencyField, package_name: &str, version: &str) {
        for other in DependencyField::ALL {
            if other != field {
                self.get_mut(other).remove(package_name);
            }
        }
        self.get_mut(field)
            .insert(package_name.to_string(), version.to_string());
    }

    pub fn remove_everywhere(&mut self, package_name: &str) {
        for field in DependencyField::ALL {
            self.get_mut(field).remove(package_name);
        }
    }
}

/// A package.json dependency section view (workspace or component)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageJson {
    #[serde(default)]
    pub dependencies: PackageMap,
    #[serde(default)]
    pub dev_dependencies: PackageMap,
    #[serde(default)]
    pub peer_dependencies: PackageMap,
}

impl PackageJson {
    pub fn get(&self, field: DependencyField) -> &PackageMap {
        match field {
            DependencyField::Dependencies => &self.dependencies,
            DependencyField::DevDependencies => &self.dev_dependencies,
            DependencyField::PeerDependencies => &self.peer_dependencies,
        }
    }

    /// First version found for `package_name` across all fields
    pub fn find_version(&self, package_name: &str) -> Option<&str> {
        DependencyField::ALL
            .iter()
            .find_map(|field| self.get(*field).get(package_name))
            .map(String::as_str)
    }
}

/// Dependency versions declared once for the whole workspace
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspacePolicy {
    #[serde(default)]
    pub dependencies: PackageMap,
    #[serde(default, alias = "peerDependencies")]
    pub peer_dependencies: PackageMap,
}

impl WorkspacePolicy {
    pub fn get(&self, field: DependencyField) -> Option<&PackageMap> {
        match field {
            DependencyField::Dependencies => Some(&self.dependencies),
            DependencyField::PeerDependencies => Some(&self.peer_dependencies),
            DependencyField::DevDependencies => None,
        }
    }

    pub fn contains_regular(&self, package_name: &str) -> bool {
        self.dependencies.contains_key(package_name)
    }

    /// Version declared for `package_name` in any field, regular first
    pub fn find_version(&self, package_name: &str) -> Option<&str> {
        self.dependencies
            .get(package_name)
            .or_else(|| self.peer_dependencies.get(package_name))
            .map(String::as_str)
    }
}

/// Per-field dependency overrides, the shape returned by auto-detect
/// getters and by override rules
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependenciesOverrides {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dependencies: PackageMap,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dev_dependencies: PackageMap,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub peer_dependencies: PackageMap,
}

impl DependenciesOverrides {
    pub fn get(&self, field: DependencyField) -> &PackageMap {
        match field {
            DependencyField::Dependencies => &self.dependencies,
            DependencyField::DevDependencies => &self.dev_dependencies,
            DependencyField::PeerDependencies => &self.peer_dependencies,
        }
    }

    pub fn get_mut(&mut self, field: DependencyField) -> &mut PackageMap {
        match field {
            DependencyField::Dependencies => &mut self.dependencies,
            DependencyField::DevDependencies => &mut self.dev_dependencies,
            DependencyField::PeerDependencies => &mut self.peer_dependencies,
        }
    }

    pub fn is_empty(&self) -> bool {
        DependencyField::ALL.iter().all(|f| self.get(*f).is_empty())
    }

    pub fn contains(&self, package_name: &str) -> bool {
        DependencyField::ALL
            .iter()
            .any(|f| self.get(*f).contains_key(package_name))
    }
}

/// Converts a package name to its DefinitelyTyped counterpart.
///
/// `foo` -> `@types/foo`, `@scope/foo` -> `@types/scope__foo`
pub fn package_to_definitely_typed(package_name: &str) -> String {
    match package_name.strip_prefix('@') {
        Some(scoped) => match scoped.split_once('/') {
            Some((scope, name)) => format!("@types/{}__{}", scope, name),
            None => format!("@types/{}", scoped),
        },
        None => format!("@types/{}", package_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_exclusive_moves_package() {
        let mut packages = AllPackagesDependencies::default();
        packages
            .dev_package_dependencies
            .insert("react".to_string(), "^17.0.0".to_string());

        packages.set_exclusive(DependencyField::PeerDependencies, "react", "^18.0.0");

        assert!(packages.dev_package_dependencies.is_empty());
        assert_eq!(
            packages.peer_package_dependencies.get("react"),
            Some(&"^18.0.0".to_string())
        );
    }

    #[test]
    fn test_package_json_find_version() {
        let mut pkg = PackageJson::default();
        pkg.peer_dependencies
            .insert("react".to_string(), "^18.2.0".to_string());
        assert_eq!(pkg.find_version("react"), Some("^18.2.0"));
        assert_eq!(pkg.find_version("vue"), None);
    }

    #[test]
    fn test_package_to_definitely_typed() {
        assert_eq!(package_to_definitely_typed("lodash"), "@types/lodash");
        assert_eq!(
            package_to_definitely_typed("@babel/core"),
            "@types/babel__core"
        );
    }

    #[test]
    fn test_field_serde_names() {
        let json = serde_json::to_string(&DependencyField::DevDependencies).unwrap();
        assert_eq!(json, "\"devDependencies\"");
        assert_eq!(
            DependencyField::PeerDependencies.packages_key(),
            "peerPackageDependencies"
        );
    }
}
