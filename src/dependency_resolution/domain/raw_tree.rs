//! Input contract of the per-file dependency extractor.
//!
//! The extractor reports loosely-shaped records; they are converted once into
//! `FileDependencies` so the resolver always matches on an explicit outcome.

use super::{ComponentId, ImportSpecifier, PackageMap};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Error code the extractor uses for syntax errors
pub const PARSING_ERROR_CODE: &str = "PARSING_ERROR";

/// A file imported by another file, relative to the component root dir
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileObject {
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_specifiers: Option<Vec<ImportSpecifier>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_source: Option<String>,
}

/// An imported package that was found installed, possibly a component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPackageData {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_id: Option<ComponentId>,
    /// Version written in the dependency's own package.json
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concrete_version: Option<String>,
    /// Version range the dependent's package.json asks for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_used_by_dependent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_json_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependent_package_json_path: Option<String>,
    /// Path of the imported file inside node_modules
    #[serde(default)]
    pub full_path: String,
    /// `main` of the dependency package.json
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_root_dir: Option<String>,
    /// Whether the dependency has a compiled dist directory
    #[serde(default = "default_true")]
    pub dist_compiled: bool,
}

fn default_true() -> bool {
    true
}

impl ResolvedPackageData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            component_id: None,
            concrete_version: None,
            version_used_by_dependent: None,
            package_json_path: None,
            dependent_package_json_path: None,
            full_path: String::new(),
            main: None,
            component_root_dir: None,
            dist_compiled: true,
        }
    }

    pub fn with_component_id(mut self, id: ComponentId) -> Self {
        self.component_id = Some(id);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingDependencies {
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub packages: Vec<String>,
}

impl MissingDependencies {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.packages.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileError {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

impl FileError {
    pub fn is_parse_error(&self) -> bool {
        self.code == PARSING_ERROR_CODE
    }

    /// Message plus `(line: x, column: y)` when both are known
    pub fn describe(&self) -> String {
        match (self.line_number, self.column) {
            (Some(line), Some(column)) => {
                format!("{} (line: {}, column: {})", self.message, line, column)
            }
            _ => self.message.clone(),
        }
    }
}

/// What the extractor found in a file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileImports {
    #[serde(default)]
    pub files: Vec<FileObject>,
    #[serde(default)]
    pub packages: PackageMap,
    #[serde(default)]
    pub components: Vec<ResolvedPackageData>,
    #[serde(default)]
    pub unidentified_packages: Vec<String>,
}

/// Classified extractor outcome for one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileDependencies {
    /// The file could not be parsed or resolved; nothing else is known
    Error(FileError),
    /// Some imports could not be found; the found ones are kept
    Missing {
        missing: MissingDependencies,
        imports: FileImports,
    },
    Resolved(FileImports),
}

impl FileDependencies {
    pub fn imports(&self) -> Option<&FileImports> {
        match self {
            FileDependencies::Error(_) => None,
            FileDependencies::Missing { imports, .. } => Some(imports),
            FileDependencies::Resolved(imports) => Some(imports),
        }
    }

    pub fn missing(&self) -> Option<&MissingDependencies> {
        match self {
            FileDependencies::Missing { missing, .. } => Some(missing),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FileError> {
        match self {
            FileDependencies::Error(error) => Some(error),
            _ => None,
        }
    }
}

/// Loose per-file record as produced by the extractor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFileRecord {
    #[serde(default)]
    pub files: Option<Vec<FileObject>>,
    #[serde(default)]
    pub packages: Option<PackageMap>,
    #[serde(default)]
    pub components: Option<Vec<ResolvedPackageData>>,
    #[serde(default)]
    pub missing: Option<MissingDependencies>,
    #[serde(default)]
    pub error: Option<FileError>,
    #[serde(default)]
    pub unidentified_packages: Option<Vec<String>>,
}

impl From<RawFileRecord> for FileDependencies {
    fn from(record: RawFileRecord) -> Self {
        if let Some(error) = record.error {
            return FileDependencies::Error(error);
        }
        let imports = FileImports {
            files: record.files.unwrap_or_default(),
            packages: record.packages.unwrap_or_default(),
            components: record.components.unwrap_or_default(),
            unidentified_packages: record.unidentified_packages.unwrap_or_default(),
        };
        match record.missing {
            Some(missing) if !missing.is_empty() => FileDependencies::Missing { missing, imports },
            _ => FileDependencies::Resolved(imports),
        }
    }
}

/// Extractor result for a component: file path (relative to the component
/// root dir) -> classified outcome
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "BTreeMap<String, RawFileRecord>")]
pub struct RawDependencyTree {
    files: BTreeMap<String, FileDependencies>,
}

impl RawDependencyTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, file: impl Into<String>, dependencies: FileDependencies) {
        self.files.insert(file.into(), dependencies);
    }

    pub fn with_file(mut self, file: impl Into<String>, dependencies: FileDependencies) -> Self {
        self.insert(file, dependencies);
        self
    }

    pub fn get(&self, file: &str) -> Option<&FileDependencies> {
        self.files.get(file)
    }

    pub fn contains(&self, file: &str) -> bool {
        self.files.contains_key(file)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl From<BTreeMap<String, RawFileRecord>> for RawDependencyTree {
    fn from(records: BTreeMap<String, RawFileRecord>) -> Self {
        Self {
            files: records
                .into_iter()
                .map(|(file, record)| (file, FileDependencies::from(record)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_record_becomes_error_variant() {
        let record: RawFileRecord = serde_json::from_value(serde_json::json!({
            "error": { "code": "PARSING_ERROR", "message": "Unexpected token", "lineNumber": 3, "column": 7 },
            "packages": { "lodash": "4.17.21" }
        }))
        .unwrap();

        let deps = FileDependencies::from(record);
        let error = deps.error().unwrap();
        assert!(error.is_parse_error());
        assert_eq!(error.describe(), "Unexpected token (line: 3, column: 7)");
        assert!(deps.imports().is_none());
    }

    #[test]
    fn test_missing_record_keeps_imports() {
        let record: RawFileRecord = serde_json::from_value(serde_json::json!({
            "packages": { "lodash": "4.17.21" },
            "missing": { "packages": ["left-pad"] }
        }))
        .unwrap();

        let deps = FileDependencies::from(record);
        assert_eq!(deps.missing().unwrap().packages, vec!["left-pad"]);
        assert!(deps.imports().unwrap().packages.contains_key("lodash"));
    }

    #[test]
    fn test_empty_missing_is_resolved() {
        let record: RawFileRecord = serde_json::from_value(serde_json::json!({
            "missing": { "files": [], "packages": [] }
        }))
        .unwrap();

        assert!(matches!(
            FileDependencies::from(record),
            FileDependencies::Resolved(_)
        ));
    }

    #[test]
    fn test_tree_deserializes_from_loose_shape() {
        let tree: RawDependencyTree = serde_json::from_value(serde_json::json!({
            "index.ts": { "files": [{ "file": "utils.ts" }] },
            "utils.ts": {}
        }))
        .unwrap();

        assert_eq!(tree.len(), 2);
        assert_eq!(
            tree.get("index.ts").unwrap().imports().unwrap().files[0].file,
            "utils.ts"
        );
    }

    #[test]
    fn test_describe_without_location() {
        let error = FileError {
            code: "RESOLVE_ERROR".to_string(),
            message: "cannot resolve".to_string(),
            line_number: Some(1),
            column: None,
        };
        assert!(!error.is_parse_error());
        assert_eq!(error.describe(), "cannot resolve");
    }
}
