use super::ComponentId;
use serde::{Deserialize, Serialize};

/// A named binding imported from a dependency file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSpecifier {
    pub name: String,
    #[serde(default)]
    pub is_default: bool,
    /// Set by the extractor for re-exports; never persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported: Option<bool>,
}

/// One file-level import link between the dependent and a dependency file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelativePath {
    pub source_relative_path: String,
    pub destination_relative_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_specifiers: Option<Vec<ImportSpecifier>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_source: Option<String>,
}

impl RelativePath {
    pub fn same_link(&self, other: &RelativePath) -> bool {
        self.source_relative_path == other.source_relative_path
            && self.destination_relative_path == other.destination_relative_path
    }

    /// Merges the specifiers and import source of another reference to the same link
    pub fn merge_from(&mut self, other: &RelativePath) {
        if let Some(incoming) = &other.import_specifiers {
            match &mut self.import_specifiers {
                None => self.import_specifiers = Some(incoming.clone()),
                Some(existing) => {
                    let missing: Vec<ImportSpecifier> = incoming
                        .iter()
                        .filter(|spec| !existing.iter().any(|e| e.name == spec.name))
                        .cloned()
                        .collect();
                    existing.extend(missing);
                }
            }
        }
        if self.import_source.is_none() && other.import_source.is_some() {
            self.import_source = other.import_source.clone();
        }
    }
}

/// A resolved dependency on another component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    pub id: ComponentId,
    #[serde(default)]
    pub relative_paths: Vec<RelativePath>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_name: Option<String>,
}

impl Dependency {
    pub fn new(
        id: ComponentId,
        relative_paths: Vec<RelativePath>,
        package_name: Option<String>,
    ) -> Self {
        Self {
            id,
            relative_paths,
            package_name,
        }
    }

    /// Records a file-level link, merging it into an existing entry for the same pair
    pub fn add_relative_path(&mut self, relative_path: RelativePath) {
        match self
            .relative_paths
            .iter_mut()
            .find(|existing| existing.same_link(&relative_path))
        {
            Some(existing) => existing.merge_from(&relative_path),
            None => self.relative_paths.push(relative_path),
        }
    }
}

/// Component dependencies split by runtime and dev usage.
///
/// A target id (ignoring version) appears in at most one of the lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllDependencies {
    pub dependencies: Vec<Dependency>,
    pub dev_dependencies: Vec<Dependency>,
}

impl AllDependencies {
    pub fn find(&self, id: &ComponentId) -> Option<&Dependency> {
        self.dependencies
            .iter()
            .chain(self.dev_dependencies.iter())
            .find(|d| d.id.is_equal_without_version(id))
    }

    pub fn contains_package(&self, package_name: &str) -> bool {
        self.dependencies
            .iter()
            .chain(self.dev_dependencies.iter())
            .any(|d| d.package_name.as_deref() == Some(package_name))
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty() && self.dev_dependencies.is_empty()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Dependency> {
        self.dependencies
            .iter_mut()
            .chain(self.dev_dependencies.iter_mut())
    }
}
