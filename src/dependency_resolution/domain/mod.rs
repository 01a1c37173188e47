pub mod component;
pub mod component_id;
pub mod debug;
pub mod dependencies_data;
pub mod dependency;
pub mod issues;
pub mod packages;
pub mod paths;
pub mod raw_tree;

pub use component::{ComponentModel, ComponentToResolve, ExtensionEntry};
pub use component_id::ComponentId;
pub use debug::{DebugComponentsDependency, DebugDependencies, IdSource, VersionSource};
pub use dependencies_data::{DependenciesData, ManualDependencies};
pub use dependency::{AllDependencies, Dependency, ImportSpecifier, RelativePath};
pub use issues::{
    IssueKind, IssuesList, RelativeComponentsAuthoredEntry, UntrackedFile,
    UntrackedFileDependencyEntry,
};
pub use packages::{
    package_to_definitely_typed, AllPackagesDependencies, DependenciesOverrides, DependencyField,
    PackageJson, PackageMap, WorkspacePolicy, MANUALLY_ADD_DEPENDENCY, MANUALLY_REMOVE_DEPENDENCY,
};
pub use raw_tree::{
    FileDependencies, FileError, FileImports, FileObject, MissingDependencies,
    RawDependencyTree, RawFileRecord, ResolvedPackageData,
};
