use super::{ComponentId, DependencyField, PackageJson, PackageMap};
use serde::{Deserialize, Serialize};

/// A component as loaded from the workspace, ready for dependency resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentToResolve {
    pub id: ComponentId,
    /// Component root dir, relative to the workspace root (linux separators)
    #[serde(default)]
    pub root_dir: String,
    /// All component files, relative to `root_dir`
    pub files: Vec<String>,
    /// Files classified as dev (test) files; a subset of `files`
    #[serde(default)]
    pub test_files: Vec<String>,
    /// The component as last persisted, if it was ever tagged/snapped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<ComponentModel>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<ExtensionEntry>,
}

impl ComponentToResolve {
    pub fn new(id: ComponentId, root_dir: impl Into<String>, files: Vec<String>) -> Self {
        Self {
            id,
            root_dir: root_dir.into(),
            files,
            test_files: Vec::new(),
            model: None,
            extensions: Vec::new(),
        }
    }

    pub fn with_test_files(mut self, test_files: Vec<String>) -> Self {
        for file in &test_files {
            if !self.files.contains(file) {
                self.files.push(file.clone());
            }
        }
        self.test_files = test_files;
        self
    }

    pub fn with_model(mut self, model: ComponentModel) -> Self {
        self.model = Some(model);
        self
    }

    pub fn is_test_file(&self, file: &str) -> bool {
        self.test_files.iter().any(|f| f == file)
    }

    /// Files in processing order: implementation files first, then test files
    pub fn files_in_processing_order(&self) -> Vec<&str> {
        let (tests, non_tests): (Vec<&String>, Vec<&String>) =
            self.files.iter().partition(|f| self.is_test_file(f));
        non_tests
            .into_iter()
            .chain(tests)
            .map(String::as_str)
            .collect()
    }
}

/// Historical data of a component, read from its last persisted version
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentModel {
    #[serde(default)]
    pub dependencies: Vec<ComponentId>,
    #[serde(default)]
    pub dev_dependencies: Vec<ComponentId>,
    #[serde(default)]
    pub package_dependencies: PackageMap,
    #[serde(default)]
    pub dev_package_dependencies: PackageMap,
    #[serde(default)]
    pub peer_package_dependencies: PackageMap,
    #[serde(default)]
    pub is_legacy: bool,
}

impl ComponentModel {
    pub fn all_dependencies_ids(&self) -> impl Iterator<Item = &ComponentId> {
        self.dependencies.iter().chain(self.dev_dependencies.iter())
    }

    /// The model dependency id matching `id` regardless of version
    pub fn search_without_version(&self, id: &ComponentId) -> Option<&ComponentId> {
        self.all_dependencies_ids()
            .find(|dep| dep.is_equal_without_version(id))
    }

    /// All package dependencies; on name clashes dev wins over regular and
    /// peer wins over both
    pub fn all_package_dependencies(&self) -> PackageMap {
        let mut all = self.package_dependencies.clone();
        all.extend(self.dev_package_dependencies.clone());
        all.extend(self.peer_package_dependencies.clone());
        all
    }

    /// The package.json this model would be written with
    pub fn package_json(&self) -> PackageJson {
        PackageJson {
            dependencies: self.package_dependencies.clone(),
            dev_dependencies: self.dev_package_dependencies.clone(),
            peer_dependencies: self.peer_package_dependencies.clone(),
        }
    }

    pub fn packages(&self, field: DependencyField) -> &PackageMap {
        match field {
            DependencyField::Dependencies => &self.package_dependencies,
            DependencyField::DevDependencies => &self.dev_package_dependencies,
            DependencyField::PeerDependencies => &self.peer_package_dependencies,
        }
    }
}

/// A configured extension (aspect) of a component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionEntry {
    /// Set when the extension is itself a component
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension_id: Option<ComponentId>,
    /// Set for core extensions, which are referenced by name only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub config: serde_json::Value,
}

impl ExtensionEntry {
    pub fn from_id(id: ComponentId) -> Self {
        Self {
            extension_id: Some(id),
            name: None,
            config: serde_json::Value::Null,
        }
    }

    pub fn display_name(&self) -> String {
        match (&self.extension_id, &self.name) {
            (Some(id), _) => id.to_string(),
            (None, Some(name)) => name.clone(),
            (None, None) => String::from("<unnamed>"),
        }
    }
}
