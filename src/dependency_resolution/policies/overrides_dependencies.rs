use super::overrides::OverrideRule;
use super::version::get_valid_version;
use crate::dependency_resolution::domain::{
    DependenciesOverrides, DependencyField, ManualDependencies, PackageJson, PackageMap,
    MANUALLY_ADD_DEPENDENCY, MANUALLY_REMOVE_DEPENDENCY,
};

/// Applies the merged override rule of one component and records what the
/// rule removed and added.
#[derive(Debug, Clone, Default)]
pub struct OverridesDependencies {
    rule: Option<OverrideRule>,
    pub manually_removed_dependencies: ManualDependencies,
    pub manually_added_dependencies: ManualDependencies,
    /// Manually added packages that are not installed or have no known version
    pub missing_package_dependencies: Vec<String>,
}

impl OverridesDependencies {
    pub fn new(rule: Option<OverrideRule>) -> Self {
        Self {
            rule,
            ..Default::default()
        }
    }

    pub fn rule(&self) -> Option<&OverrideRule> {
        self.rule.as_ref()
    }

    fn is_ignored(&self, package_name: &str, field: DependencyField) -> bool {
        self.rule
            .as_ref()
            .and_then(|rule| rule.field(field).get(package_name))
            .is_some_and(|value| value == MANUALLY_REMOVE_DEPENDENCY)
    }

    /// Whether a package found in a regular or test file is removed by `-`
    pub fn should_ignore_package(&mut self, package_name: &str, is_test_file: bool) -> bool {
        self.should_ignore_package_by_type(package_name, DependencyField::for_file(is_test_file))
    }

    pub fn should_ignore_package_by_type(
        &mut self,
        package_name: &str,
        field: DependencyField,
    ) -> bool {
        let ignored = self.is_ignored(package_name, field);
        if ignored {
            self.manually_removed_dependencies.add(field, package_name);
        }
        ignored
    }

    pub fn should_ignore_peer_package(&mut self, package_name: &str) -> bool {
        self.should_ignore_package_by_type(package_name, DependencyField::PeerDependencies)
    }

    /// Override entries that add or pin dependencies (everything but `-`)
    pub fn get_dependencies_to_add_manually(&self) -> Option<DependenciesOverrides> {
        let rule = self.rule.as_ref()?;
        let mut to_add = DependenciesOverrides::default();
        for field in DependencyField::ALL {
            let entries: PackageMap = rule
                .field(field)
                .iter()
                .filter(|(_, value)| value.as_str() != MANUALLY_REMOVE_DEPENDENCY)
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect();
            *to_add.get_mut(field) = entries;
        }
        if to_add.is_empty() {
            None
        } else {
            Some(to_add)
        }
    }

    pub fn is_package_added_manually(&self, package_name: &str) -> bool {
        self.get_dependencies_to_add_manually()
            .is_some_and(|to_add| to_add.contains(package_name))
    }

    /// Entries pinning a concrete version, keyed as written in the rule.
    /// Used to pin component dependency versions.
    pub fn dependencies_with_version(&self) -> Vec<(String, String)> {
        let Some(rule) = self.rule.as_ref() else {
            return Vec::new();
        };
        DependencyField::ALL
            .iter()
            .flat_map(|field| rule.field(*field).iter())
            .filter_map(|(name, value)| {
                get_valid_version(Some(value)).map(|_| (name.clone(), value.clone()))
            })
            .collect()
    }

    pub fn add_manually_added_dependency(
        &mut self,
        field: DependencyField,
        value: impl Into<String>,
    ) {
        self.manually_added_dependencies.add(field, value);
    }

    /// Resolves the version of a manually added package.
    ///
    /// `+` takes the version the workspace package.json declares; when there
    /// is none the package is recorded as missing and nothing is added.
    pub fn manually_add_package(
        &mut self,
        field: DependencyField,
        package_name: &str,
        requested: &str,
        package_json: Option<&PackageJson>,
    ) -> Option<String> {
        let version = if requested == MANUALLY_ADD_DEPENDENCY {
            package_json
                .and_then(|pkg| pkg.find_version(package_name))
                .map(String::from)
        } else {
            Some(requested.to_string())
        };
        match version {
            Some(version) => {
                self.manually_added_dependencies
                    .add(field, format!("{}@{}", package_name, version));
                Some(version)
            }
            None => {
                self.add_missing_package(package_name);
                None
            }
        }
    }

    pub fn add_missing_package(&mut self, package_name: &str) {
        if !self.missing_package_dependencies.iter().any(|p| p == package_name) {
            self.missing_package_dependencies.push(package_name.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(deps: &[(&str, &str)], peers: &[(&str, &str)]) -> OverrideRule {
        OverrideRule {
            dependencies: deps.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            peer_dependencies: peers.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_ignore_records_manually_removed() {
        let mut overrides = OverridesDependencies::new(Some(rule(&[("react", "-")], &[])));

        assert!(overrides.should_ignore_package("react", false));
        assert!(!overrides.should_ignore_package("react", true));
        assert!(!overrides.should_ignore_package("lodash", false));
        assert_eq!(
            overrides.manually_removed_dependencies.get(DependencyField::Dependencies),
            ["react"]
        );
        assert!(overrides
            .manually_removed_dependencies
            .get(DependencyField::DevDependencies)
            .is_empty());
    }

    #[test]
    fn test_dependencies_to_add_skip_removals() {
        let overrides = OverridesDependencies::new(Some(rule(
            &[("react", "-"), ("left-pad", "1.3.0")],
            &[("vue", "+")],
        )));

        let to_add = overrides.get_dependencies_to_add_manually().unwrap();
        assert_eq!(to_add.dependencies.len(), 1);
        assert_eq!(to_add.peer_dependencies.get("vue").unwrap(), "+");
        assert!(overrides.is_package_added_manually("left-pad"));
        assert!(!overrides.is_package_added_manually("react"));
    }

    #[test]
    fn test_no_rule_means_nothing_to_add() {
        let overrides = OverridesDependencies::new(None);
        assert!(overrides.get_dependencies_to_add_manually().is_none());
        let only_removals = OverridesDependencies::new(Some(rule(&[("react", "-")], &[])));
        assert!(only_removals.get_dependencies_to_add_manually().is_none());
    }

    #[test]
    fn test_plus_takes_version_from_package_json() {
        let mut package_json = PackageJson::default();
        package_json
            .dependencies
            .insert("chalk".to_string(), "^5.0.0".to_string());
        let mut overrides = OverridesDependencies::new(None);

        let version = overrides.manually_add_package(
            DependencyField::Dependencies,
            "chalk",
            "+",
            Some(&package_json),
        );
        assert_eq!(version.as_deref(), Some("^5.0.0"));
        assert_eq!(
            overrides.manually_added_dependencies.get(DependencyField::Dependencies),
            ["chalk@^5.0.0"]
        );

        let missing = overrides.manually_add_package(
            DependencyField::Dependencies,
            "left-pad",
            "+",
            Some(&package_json),
        );
        assert!(missing.is_none());
        assert_eq!(overrides.missing_package_dependencies, vec!["left-pad"]);
    }

    #[test]
    fn test_dependencies_with_version() {
        let overrides = OverridesDependencies::new(Some(rule(
            &[("my.scope/button", "0.0.5"), ("react", "-"), ("chalk", "+")],
            &[],
        )));
        assert_eq!(
            overrides.dependencies_with_version(),
            vec![("my.scope/button".to_string(), "0.0.5".to_string())]
        );
    }
}
