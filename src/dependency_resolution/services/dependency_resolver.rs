//! Classification of a component's raw dependency tree.
//!
//! Each file of the component is visited once, implementation files before
//! test files. Every import found in a file becomes a component dependency,
//! a package dependency, or an issue. The classified state then goes through
//! the post-processing stages.

use super::post_processing::{self, ResolutionState, StageContext};
use crate::dependency_resolution::domain::{
    package_to_definitely_typed, paths, ComponentId, ComponentToResolve, DebugComponentsDependency,
    DebugDependencies, DependenciesData, DependenciesOverrides, Dependency, DependencyField,
    FileDependencies, FileError, FileImports, FileObject, IdSource, MissingDependencies,
    PackageMap, RawDependencyTree, RelativeComponentsAuthoredEntry, RelativePath,
    ResolvedPackageData, VersionSource, WorkspacePolicy,
};
use crate::dependency_resolution::policies::{
    get_valid_version, OverridesConfig, OverridesDependencies,
};
use crate::ports::outbound::{
    ComponentIdentityResolver, InstalledPackage, PackageResolver, PolicyProviderSet,
};
use crate::shared::error::ResolverError;
use crate::shared::Result;
use std::collections::{BTreeMap, HashSet, VecDeque};

/// Extensions of files whose package imports may have DefinitelyTyped types
const TYPESCRIPT_EXTENSIONS: [&str; 2] = [".ts", ".tsx"];

/// Extensions of files that count as code when checking non-main imports
const CODE_EXTENSIONS: [&str; 4] = [".ts", ".tsx", ".js", ".jsx"];

/// Result of resolving one component
#[derive(Debug, Clone)]
pub struct ResolutionOutcome {
    pub data: DependenciesData,
    pub debug: DebugDependencies,
    /// Override entries pinning a version, keyed by id without version
    pub pinned_versions: Vec<(String, String)>,
}

/// Policy data read once per component, before any file is classified
#[derive(Debug, Default)]
struct LoadedPolicies {
    auto_detect_overrides: DependenciesOverrides,
    auto_detect_config_merge: DependenciesOverrides,
    env_peers: Option<PackageMap>,
    manual_packages: BTreeMap<String, Option<InstalledPackage>>,
}

/// Resolves the dependencies of components against one workspace state.
///
/// All collaborators are injected; the resolver owns no global state, so
/// one instance can resolve many components concurrently.
pub struct DependencyResolver<'a> {
    bitmap: &'a dyn ComponentIdentityResolver,
    packages: &'a dyn PackageResolver,
    policies: &'a dyn PolicyProviderSet,
    overrides: &'a OverridesConfig,
}

impl<'a> DependencyResolver<'a> {
    pub fn new(
        bitmap: &'a dyn ComponentIdentityResolver,
        packages: &'a dyn PackageResolver,
        policies: &'a dyn PolicyProviderSet,
        overrides: &'a OverridesConfig,
    ) -> Self {
        Self {
            bitmap,
            packages,
            policies,
            overrides,
        }
    }

    /// Resolves one component.
    ///
    /// # Errors
    /// Returns `ResolverError::InternalConsistency` when a file of the
    /// component is absent from `tree`. Failures of the policy sources and
    /// package lookups are propagated.
    pub async fn resolve(
        &self,
        component: &ComponentToResolve,
        tree: &RawDependencyTree,
    ) -> Result<ResolutionOutcome> {
        let overrides =
            OverridesDependencies::new(self.overrides.get_override_component_data(&component.id));
        let loaded = self.load_policies(component, &overrides).await?;

        let mut classifier = FileClassifier {
            component,
            tree,
            bitmap: self.bitmap,
            workspace_policy: self.policies.workspace_policy(),
            core_aspects: self.policies.core_aspects(),
            loaded: &loaded,
            state: ResolutionState::new(overrides),
            processed_files: HashSet::new(),
        };
        if component.model.as_ref().is_some_and(|model| model.is_legacy) {
            classifier.state.issues.legacy_inside_harmony = true;
        }
        for file in component.files_in_processing_order() {
            classifier.process_file(file)?;
        }

        let context = StageContext {
            component,
            workspace_policy: self.policies.workspace_policy(),
            consumer_package_json: self.policies.consumer_package_json(),
            auto_detect_overrides: &loaded.auto_detect_overrides,
            env_peers: loaded.env_peers.as_ref(),
            manual_packages: &loaded.manual_packages,
        };
        let state = post_processing::run(classifier.state, &context);
        let (data, debug, overrides) = state.into_parts();
        Ok(ResolutionOutcome {
            data,
            debug,
            pinned_versions: overrides.dependencies_with_version(),
        })
    }

    async fn load_policies(
        &self,
        component: &ComponentToResolve,
        overrides: &OverridesDependencies,
    ) -> Result<LoadedPolicies> {
        let auto_detect_overrides = self.policies.auto_detect_overrides(component).await?;
        let auto_detect_config_merge = self
            .policies
            .auto_detect_config_merge(&component.id)
            .unwrap_or_default();
        let env_peers = self.policies.env_peers_for_env_itself(component).await?;

        let mut manual_packages = BTreeMap::new();
        if let Some(to_add) = overrides.get_dependencies_to_add_manually() {
            for field in [DependencyField::Dependencies, DependencyField::DevDependencies] {
                for name in to_add.get(field).keys() {
                    if manual_packages.contains_key(name) {
                        continue;
                    }
                    let installed = self
                        .packages
                        .resolve_package(name, &component.root_dir)
                        .await?;
                    manual_packages.insert(name.clone(), installed);
                }
            }
        }

        Ok(LoadedPolicies {
            auto_detect_overrides,
            auto_detect_config_merge,
            env_peers,
            manual_packages,
        })
    }
}

/// Mutable classification state of one component
struct FileClassifier<'a> {
    component: &'a ComponentToResolve,
    tree: &'a RawDependencyTree,
    bitmap: &'a dyn ComponentIdentityResolver,
    workspace_policy: &'a WorkspacePolicy,
    core_aspects: &'a BTreeMap<String, String>,
    loaded: &'a LoadedPolicies,
    state: ResolutionState,
    processed_files: HashSet<String>,
}

impl<'a> FileClassifier<'a> {
    fn process_file(&mut self, file: &str) -> std::result::Result<(), ResolverError> {
        let tree = self.tree;
        let is_test = self.component.is_test_file(file);
        let entry = tree
            .get(file)
            .ok_or_else(|| ResolverError::InternalConsistency {
                component: self.component.id.to_string(),
                file: file.to_string(),
            })?;

        let imports = self.without_core_aspects(entry);
        if let Some(missing) = entry.missing() {
            self.process_missing(file, missing, is_test);
        }
        if let Some(error) = entry.error() {
            self.process_error(file, error);
        }
        if let Some(imports) = imports {
            self.process_packages(file, &imports, entry.missing(), is_test);
            self.process_components(file, &imports.components, is_test);
            self.process_dep_files(file, is_test);
            if !imports.unidentified_packages.is_empty() {
                self.state.debug.unidentified_packages = imports.unidentified_packages;
            }
        }
        Ok(())
    }

    /// Imports of `entry` with core aspect packages taken out. The aspects
    /// are recorded as core aspects instead.
    fn without_core_aspects(&mut self, entry: &FileDependencies) -> Option<FileImports> {
        let mut imports = entry.imports()?.clone();
        let own_id = self.component.id.to_string_without_version();
        if self.core_aspects.is_empty() || self.core_aspects.values().any(|id| *id == own_id) {
            return Some(imports);
        }

        let core_aspects = self.core_aspects;
        let mut used: Vec<String> = Vec::new();
        let mut is_core_aspect = |package_name: &str| match core_aspects.get(package_name) {
            Some(aspect_id) => {
                if !used.contains(aspect_id) {
                    used.push(aspect_id.clone());
                }
                true
            }
            None => false,
        };
        imports
            .unidentified_packages
            .retain(|name| !is_core_aspect(name.as_str()));
        imports
            .components
            .retain(|component| !is_core_aspect(component.name.as_str()));
        self.state.core_aspects.extend(used);
        Some(imports)
    }

    fn process_missing(&mut self, origin: &str, missing: &MissingDependencies, is_test: bool) {
        // an import written without extension may still point to a component file
        let component_files: Vec<&str> = self
            .component
            .files
            .iter()
            .map(|f| paths::remove_extension(f))
            .collect();
        let missing_files: Vec<String> = missing
            .files
            .iter()
            .filter(|file| {
                if paths::extension(file).is_none() {
                    return true;
                }
                let normalized = paths::join_normalize("", file);
                !component_files.contains(&paths::remove_extension(&normalized))
            })
            .cloned()
            .collect();
        if !missing_files.is_empty() {
            self.state.issues.add_missing_files(origin, missing_files);
        }

        let mut missing_packages = Vec::new();
        for package in &missing.packages {
            if !self.state.overrides.should_ignore_package(package, is_test) {
                missing_packages.push(package.clone());
            }
        }
        if !missing_packages.is_empty() {
            self.state
                .issues
                .add_missing_packages(origin, &missing_packages);
        }
    }

    fn process_error(&mut self, origin: &str, error: &FileError) {
        if error.is_parse_error() {
            self.state
                .issues
                .parse_errors
                .insert(origin.to_string(), error.describe());
        } else {
            self.state
                .issues
                .resolve_errors
                .insert(origin.to_string(), error.message.clone());
        }
    }

    fn process_packages(
        &mut self,
        origin: &str,
        imports: &FileImports,
        missing: Option<&MissingDependencies>,
        is_test: bool,
    ) {
        let mut packages = imports.packages.clone();
        if let Some(model) = &self.component.model {
            // keep the version the component was last persisted with
            let model_packages = model.all_package_dependencies();
            for (name, version) in packages.iter_mut() {
                if self.workspace_policy.contains_regular(name) {
                    continue;
                }
                if let Some(model_version) = model_packages.get(name) {
                    *version = model_version.clone();
                }
            }
        }

        let mut names: Vec<String> = packages.keys().cloned().collect();
        if let Some(missing) = missing {
            names.extend(missing.packages.iter().cloned());
        }
        self.add_types_packages(origin, &names);

        if !packages.is_empty() {
            self.state
                .packages
                .get_mut(DependencyField::for_file(is_test))
                .extend(packages);
        }
    }

    /// Adds `@types/*` packages of TypeScript imports when the workspace or
    /// the component model has a version for them
    fn add_types_packages(&mut self, origin: &str, package_names: &[String]) {
        let is_typescript = paths::extension(origin)
            .is_some_and(|ext| TYPESCRIPT_EXTENSIONS.contains(&ext));
        if package_names.is_empty() || !is_typescript {
            return;
        }
        for name in package_names {
            let types_package = package_to_definitely_typed(name);
            let version = self
                .workspace_policy
                .find_version(&types_package)
                .map(String::from)
                .or_else(|| {
                    self.component
                        .model
                        .as_ref()
                        .and_then(|model| model.dev_package_dependencies.get(&types_package))
                        .cloned()
                });
            if let Some(version) = version {
                self.state
                    .packages
                    .dev_package_dependencies
                    .insert(types_package, version);
            }
        }
    }

    fn process_components(
        &mut self,
        origin: &str,
        components: &[ResolvedPackageData],
        is_test: bool,
    ) {
        for data in components {
            let Some(component_id) = data.component_id.clone() else {
                self.state.issues.resolve_errors.insert(
                    origin.to_string(),
                    format!(
                        "the installed package \"{}\" is a component but its package.json has no componentId",
                        data.name
                    ),
                );
                continue;
            };
            if component_id == self.component.id {
                continue;
            }

            let mut debug = DebugComponentsDependency::new(component_id.clone());
            debug.dependency_package_json_path = data.package_json_path.clone();
            debug.dependent_package_json_path = data.dependent_package_json_path.clone();
            debug.component_id_resolved_from = Some(IdSource::DependencyPkgJson);
            debug.package_name = Some(data.name.clone());

            let mut id = component_id;
            if let Some(version) = get_valid_version(data.concrete_version.as_deref()) {
                debug.version_resolved_from = Some(VersionSource::DependencyPkgJson);
                id = id.change_version(version);
            } else if let Some(version) =
                get_valid_version(data.version_used_by_dependent.as_deref())
            {
                debug.version_resolved_from = Some(VersionSource::DependentPkgJson);
                id = id.change_version(version);
            }

            if self.state.overrides.should_ignore_package(&data.name, is_test) {
                continue;
            }
            let existing_id = self.existing_id(&id, &data.name, &mut debug);
            if existing_id.is_equal_without_version(&self.component.id) {
                // a component importing its own package
                continue;
            }
            self.add_import_non_main_issue(origin, data);
            self.push_if_not_exist(
                Dependency::new(existing_id, Vec::new(), Some(data.name.clone())),
                is_test,
                debug,
            );
        }
    }

    /// Picks the version of a component dependency from the workspace state.
    /// The first source that knows the component wins.
    fn existing_id(
        &self,
        id: &ComponentId,
        package_name: &str,
        debug: &mut DebugComponentsDependency,
    ) -> ComponentId {
        if self.state.overrides.is_package_added_manually(package_name) {
            return id.clone();
        }
        let mut from_bitmap = self.bitmap.ids_matching_without_version(id);
        if from_bitmap.len() == 1 {
            if let Some(bitmap_id) = from_bitmap.pop() {
                debug.version_resolved_from = Some(VersionSource::BitMap);
                return bitmap_id;
            }
        }
        if self.workspace_policy.contains_regular(package_name) {
            return id.clone();
        }
        if let Some(version) = self.version_from_config_merge(package_name) {
            debug.version_resolved_from = Some(VersionSource::MergeConfig);
            return id.change_version(version);
        }
        if self.loaded.auto_detect_overrides.contains(package_name) {
            return id.clone();
        }
        if let Some(model_id) = self
            .component
            .model
            .as_ref()
            .and_then(|model| model.search_without_version(id))
        {
            debug.version_resolved_from = Some(VersionSource::Model);
            return model_id.clone();
        }
        id.clone()
    }

    fn version_from_config_merge(&self, package_name: &str) -> Option<String> {
        let merge = &self.loaded.auto_detect_config_merge;
        DependencyField::ALL
            .iter()
            .filter_map(|field| merge.get(*field).get(package_name))
            .last()
            .and_then(|version| get_valid_version(Some(version)))
    }

    /// Reports a component import that bypasses the package entry point
    fn add_import_non_main_issue(&mut self, origin: &str, data: &ResolvedPackageData) {
        let Some(main) = data.main.as_deref() else {
            return;
        };
        let full_path = data.full_path.replace('\\', "/");
        if full_path.is_empty() || full_path.ends_with(main) {
            return;
        }
        let is_code =
            paths::extension(&full_path).is_some_and(|ext| CODE_EXTENSIONS.contains(&ext));
        if !is_code {
            return;
        }
        if data.component_root_dir.is_some() && !data.dist_compiled {
            return;
        }
        let short_path = full_path
            .split_once("node_modules/")
            .map(|(_, rest)| rest)
            .unwrap_or(&full_path);
        if short_path.contains("eslintrc") {
            return;
        }
        self.state
            .issues
            .add_import_non_main_file(origin, short_path.to_string());
    }

    fn push_if_not_exist(
        &mut self,
        dependency: Dependency,
        is_test: bool,
        debug: DebugComponentsDependency,
    ) {
        let dependencies = &self.state.dependencies;
        let same_id = |d: &Dependency| d.id.is_equal_without_version(&dependency.id);
        let in_dependencies = dependencies.dependencies.iter().any(same_id);
        let in_dev_dependencies = dependencies.dev_dependencies.iter().any(same_id);
        if in_dependencies || (in_dev_dependencies && is_test) {
            return;
        }
        self.push_dependency(dependency, is_test, debug);
    }

    fn push_dependency(
        &mut self,
        dependency: Dependency,
        is_test: bool,
        debug: DebugComponentsDependency,
    ) {
        let list = if is_test {
            &mut self.state.dependencies.dev_dependencies
        } else {
            &mut self.state.dependencies.dependencies
        };
        list.push(dependency);
        self.state.debug.components.push(debug);
    }

    /// Walks the relative file imports of `origin`. Untracked files are
    /// walked too, as nested origins, so components they import are found.
    fn process_dep_files(&mut self, origin: &str, is_test: bool) {
        let tree = self.tree;
        let mut worklist: VecDeque<(String, bool, bool)> = VecDeque::new();
        worklist.push_back((origin.to_string(), is_test, false));

        while let Some((file, is_test, nested)) = worklist.pop_front() {
            let first_visit = self.processed_files.insert(file.clone());
            if !first_visit && nested {
                continue;
            }
            // untracked files may be outside of what the extractor reported
            let Some(imports) = tree.get(&file).and_then(FileDependencies::imports) else {
                continue;
            };
            for dep_file in &imports.files {
                if self.process_one_dep_file(&file, dep_file, is_test, nested) {
                    worklist.push_back((dep_file.file.clone(), false, true));
                }
            }
        }
    }

    /// Returns `true` when the imported file is untracked
    fn process_one_dep_file(
        &mut self,
        origin: &str,
        dep_file: &FileObject,
        is_test: bool,
        nested: bool,
    ) -> bool {
        let dep_file_relative = paths::join_normalize(&self.component.root_dir, &dep_file.file);
        let Some(dep_id) = self.bitmap.get_component_id_by_path(&dep_file_relative) else {
            self.state
                .issues
                .add_untracked_dependency(origin, &dep_file_relative, nested);
            return true;
        };
        if dep_id.is_equal_without_version(&self.component.id) {
            return false;
        }

        let dep_root_dir = self.bitmap.get_root_dir(&dep_id);
        let destination = match dep_root_dir.as_deref() {
            Some(root_dir) if paths::is_within(root_dir, &dep_file_relative) => {
                paths::relative(root_dir, &dep_file_relative)
            }
            _ => dep_file_relative.clone(),
        };
        let source = if dep_root_dir.is_some() {
            dep_file_relative.clone()
        } else {
            dep_file.file.clone()
        };
        let import_specifiers = dep_file.import_specifiers.clone().map(|specifiers| {
            specifiers
                .into_iter()
                .map(|mut specifier| {
                    specifier.exported = None;
                    specifier
                })
                .collect()
        });
        let relative_path = RelativePath {
            source_relative_path: source,
            destination_relative_path: destination,
            import_specifiers,
            import_source: dep_file.import_source.clone(),
        };

        self.state.issues.add_relative_component(
            origin,
            RelativeComponentsAuthoredEntry {
                import_source: dep_file.import_source.clone(),
                component_id: dep_id.clone(),
                relative_path: relative_path.clone(),
            },
        );

        if let Some(existing) = self
            .state
            .dependencies
            .iter_mut()
            .find(|d| d.id.is_equal_without_version(&dep_id))
        {
            existing.add_relative_path(relative_path);
            return false;
        }

        let mut debug = DebugComponentsDependency::new(dep_id.clone());
        debug.import_source = dep_file.import_source.clone();
        debug.component_id_resolved_from = Some(IdSource::DependencyPath);
        self.push_dependency(
            Dependency::new(dep_id, vec![relative_path], None),
            is_test,
            debug,
        );
        false
    }
}
