use super::{ComponentId, RelativePath};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Kinds of component issues. Each kind owns its own data shape in `IssuesList`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IssueKind {
    UntrackedDependencies,
    MissingPackagesDependenciesOnFs,
    MissingDependenciesOnFs,
    RelativeComponentsAuthored,
    ParseErrors,
    ResolveErrors,
    ImportNonMainFiles,
    MultipleEnvs,
    MergeConfigHasConflict,
    LegacyInsideHarmony,
}

impl IssueKind {
    pub const ALL: [IssueKind; 10] = [
        IssueKind::UntrackedDependencies,
        IssueKind::MissingPackagesDependenciesOnFs,
        IssueKind::MissingDependenciesOnFs,
        IssueKind::RelativeComponentsAuthored,
        IssueKind::ParseErrors,
        IssueKind::ResolveErrors,
        IssueKind::ImportNonMainFiles,
        IssueKind::MultipleEnvs,
        IssueKind::MergeConfigHasConflict,
        IssueKind::LegacyInsideHarmony,
    ];

    /// Human readable description used by status reports
    pub fn description(&self) -> &'static str {
        match self {
            IssueKind::UntrackedDependencies => "untracked file dependencies",
            IssueKind::MissingPackagesDependenciesOnFs => "missing packages dependencies",
            IssueKind::MissingDependenciesOnFs => "non-existing dependency files",
            IssueKind::RelativeComponentsAuthored => "components with relative import statements",
            IssueKind::ParseErrors => "error found while parsing the file",
            IssueKind::ResolveErrors => "error found while resolving the file dependencies",
            IssueKind::ImportNonMainFiles => "importing non-main files",
            IssueKind::MultipleEnvs => "multiple envs",
            IssueKind::MergeConfigHasConflict => "config merge has conflicts",
            IssueKind::LegacyInsideHarmony => "legacy component inside a harmony workspace",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UntrackedFile {
    pub relative_path: String,
    /// Also reached from another origin file
    pub existing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UntrackedFileDependencyEntry {
    pub nested: bool,
    pub untracked_files: Vec<UntrackedFile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelativeComponentsAuthoredEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_source: Option<String>,
    pub component_id: ComponentId,
    pub relative_path: RelativePath,
}

/// Issues found while resolving one component, keyed by kind.
///
/// File-keyed data uses ordered maps so a serialized list is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IssuesList {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub untracked_dependencies: BTreeMap<String, UntrackedFileDependencyEntry>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub missing_packages_dependencies_on_fs: BTreeMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub missing_dependencies_on_fs: BTreeMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub relative_components_authored: BTreeMap<String, Vec<RelativeComponentsAuthoredEntry>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parse_errors: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub resolve_errors: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub import_non_main_files: BTreeMap<String, Vec<String>>,
    /// Set by the env layer when several envs apply; never by the resolver
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub multiple_envs: Vec<String>,
    /// Set by the config-merge layer; never by the resolver
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub merge_config_has_conflict: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub legacy_inside_harmony: bool,
}

impl IssuesList {
    pub fn has(&self, kind: IssueKind) -> bool {
        match kind {
            IssueKind::UntrackedDependencies => !self.untracked_dependencies.is_empty(),
            IssueKind::MissingPackagesDependenciesOnFs => {
                !self.missing_packages_dependencies_on_fs.is_empty()
            }
            IssueKind::MissingDependenciesOnFs => !self.missing_dependencies_on_fs.is_empty(),
            IssueKind::RelativeComponentsAuthored => !self.relative_components_authored.is_empty(),
            IssueKind::ParseErrors => !self.parse_errors.is_empty(),
            IssueKind::ResolveErrors => !self.resolve_errors.is_empty(),
            IssueKind::ImportNonMainFiles => !self.import_non_main_files.is_empty(),
            IssueKind::MultipleEnvs => !self.multiple_envs.is_empty(),
            IssueKind::MergeConfigHasConflict => self.merge_config_has_conflict,
            IssueKind::LegacyInsideHarmony => self.legacy_inside_harmony,
        }
    }

    /// Kinds that currently hold data
    pub fn kinds(&self) -> Vec<IssueKind> {
        IssueKind::ALL
            .iter()
            .copied()
            .filter(|kind| self.has(*kind))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds().is_empty()
    }

    pub fn count(&self) -> usize {
        self.kinds().len()
    }

    pub fn add_untracked_dependency(
        &mut self,
        origin_file: &str,
        relative_path: &str,
        nested: bool,
    ) {
        let mut existing = false;
        for entry in self.untracked_dependencies.values_mut() {
            for file in entry
                .untracked_files
                .iter_mut()
                .filter(|f| f.relative_path == relative_path)
            {
                file.existing = true;
                existing = true;
            }
        }
        let untracked = UntrackedFile {
            relative_path: relative_path.to_string(),
            existing,
        };
        self.untracked_dependencies
            .entry(origin_file.to_string())
            .or_insert_with(|| UntrackedFileDependencyEntry {
                nested,
                untracked_files: Vec::new(),
            })
            .untracked_files
            .push(untracked);
    }

    pub fn add_missing_packages(&mut self, origin_file: &str, packages: &[String]) {
        let entry = self
            .missing_packages_dependencies_on_fs
            .entry(origin_file.to_string())
            .or_default();
        for package in packages {
            if !entry.contains(package) {
                entry.push(package.clone());
            }
        }
    }

    pub fn add_missing_files(&mut self, origin_file: &str, files: Vec<String>) {
        self.missing_dependencies_on_fs
            .entry(origin_file.to_string())
            .or_default()
            .extend(files);
    }

    pub fn add_relative_component(
        &mut self,
        origin_file: &str,
        entry: RelativeComponentsAuthoredEntry,
    ) {
        self.relative_components_authored
            .entry(origin_file.to_string())
            .or_default()
            .push(entry);
    }

    pub fn add_import_non_main_file(&mut self, origin_file: &str, non_main_file: String) {
        self.import_non_main_files
            .entry(origin_file.to_string())
            .or_default()
            .push(non_main_file);
    }

    /// All packages reported missing, deduplicated, in file order
    pub fn missing_packages(&self) -> Vec<String> {
        let mut all: Vec<String> = Vec::new();
        for packages in self.missing_packages_dependencies_on_fs.values() {
            for package in packages {
                if !all.contains(package) {
                    all.push(package.clone());
                }
            }
        }
        all
    }

    /// Drops a package from the missing-packages issue, removing emptied entries
    pub fn resolve_missing_package(&mut self, package_name: &str) {
        for packages in self.missing_packages_dependencies_on_fs.values_mut() {
            packages.retain(|p| p != package_name);
        }
        self.missing_packages_dependencies_on_fs
            .retain(|_, packages| !packages.is_empty());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persisted_env_and_merge_issues_are_kept() {
        let issues: IssuesList = serde_json::from_value(serde_json::json!({
            "MultipleEnvs": ["teambit.react/react-env", "teambit.harmony/node"],
            "MergeConfigHasConflict": true
        }))
        .unwrap();

        assert_eq!(
            issues.kinds(),
            vec![IssueKind::MultipleEnvs, IssueKind::MergeConfigHasConflict]
        );
        let round_trip = serde_json::to_value(&issues).unwrap();
        assert_eq!(round_trip["MergeConfigHasConflict"], true);
        assert_eq!(round_trip["MultipleEnvs"][1], "teambit.harmony/node");
    }

    #[test]
    fn test_empty_list_has_no_kinds() {
        let issues = IssuesList::default();
        assert!(issues.is_empty());
        assert_eq!(issues.count(), 0);
    }

    #[test]
    fn test_untracked_marks_both_entries_existing() {
        let mut issues = IssuesList::default();
        issues.add_untracked_dependency("a.ts", "src/helper.ts", false);
        issues.add_untracked_dependency("b.ts", "src/helper.ts", false);

        assert!(issues.untracked_dependencies["a.ts"].untracked_files[0].existing);
        assert!(issues.untracked_dependencies["b.ts"].untracked_files[0].existing);
        assert!(issues.has(IssueKind::UntrackedDependencies));
    }

    #[test]
    fn test_missing_packages_deduplicated() {
        let mut issues = IssuesList::default();
        issues.add_missing_packages("a.ts", &["left-pad".to_string(), "left-pad".to_string()]);
        issues.add_missing_packages("b.ts", &["left-pad".to_string(), "chalk".to_string()]);

        assert_eq!(issues.missing_packages_dependencies_on_fs["a.ts"].len(), 1);
        assert_eq!(issues.missing_packages(), vec!["left-pad", "chalk"]);
    }

    #[test]
    fn test_resolve_missing_package_removes_empty_entries() {
        let mut issues = IssuesList::default();
        issues.add_missing_packages("a.ts", &["left-pad".to_string()]);
        issues.add_missing_packages("b.ts", &["left-pad".to_string(), "chalk".to_string()]);

        issues.resolve_missing_package("left-pad");

        assert!(!issues.missing_packages_dependencies_on_fs.contains_key("a.ts"));
        assert_eq!(issues.missing_packages(), vec!["chalk"]);
    }

    #[test]
    fn test_serialized_keys_are_kind_names() {
        let mut issues = IssuesList::default();
        issues
            .parse_errors
            .insert("index.ts".to_string(), "Unexpected token".to_string());
        issues.legacy_inside_harmony = true;

        let json = serde_json::to_value(&issues).unwrap();
        assert!(json.get("ParseErrors").is_some());
        assert_eq!(json.get("LegacyInsideHarmony"), Some(&serde_json::json!(true)));
        assert!(json.get("ResolveErrors").is_none());
    }
}
