//! Post-processing of a component's classified dependencies.
//!
//! Stages run once per component, in the order of [`STAGES`]. Later stages
//! may undo earlier classifications, so the order is part of the behaviour.

use crate::dependency_resolution::domain::{
    AllDependencies, AllPackagesDependencies, ComponentToResolve, DebugDependencies,
    DependenciesData, DependenciesOverrides, Dependency, DependencyField, IssuesList, PackageJson,
    PackageMap, WorkspacePolicy, MANUALLY_ADD_DEPENDENCY, MANUALLY_REMOVE_DEPENDENCY,
};
use crate::dependency_resolution::policies::version::coerce;
use crate::dependency_resolution::policies::OverridesDependencies;
use crate::ports::outbound::InstalledPackage;
use std::collections::BTreeMap;

/// Platform bootstrapping package always classified as a peer
pub const LEGACY_PACKAGE: &str = "@teambit/legacy";

/// Dependency state of one component while it is being resolved
#[derive(Debug, Clone, Default)]
pub struct ResolutionState {
    pub dependencies: AllDependencies,
    pub packages: AllPackagesDependencies,
    /// Packages as classified from the files, before any override applied
    pub origin_packages: AllPackagesDependencies,
    pub issues: IssuesList,
    pub core_aspects: Vec<String>,
    pub overrides: OverridesDependencies,
    pub debug: DebugDependencies,
}

impl ResolutionState {
    pub fn new(overrides: OverridesDependencies) -> Self {
        Self {
            overrides,
            ..Default::default()
        }
    }

    pub fn into_parts(self) -> (DependenciesData, DebugDependencies, OverridesDependencies) {
        let data = DependenciesData {
            dependencies: self.dependencies,
            package_dependencies: self.packages,
            issues: self.issues,
            core_aspects: self.core_aspects,
            manually_removed_dependencies: self.overrides.manually_removed_dependencies.clone(),
            manually_added_dependencies: self.overrides.manually_added_dependencies.clone(),
            missing_package_dependencies: self.overrides.missing_package_dependencies.clone(),
        };
        (data, self.debug, self.overrides)
    }
}

/// Read-only inputs shared by the stages
pub struct StageContext<'a> {
    pub component: &'a ComponentToResolve,
    pub workspace_policy: &'a WorkspacePolicy,
    pub consumer_package_json: Option<&'a PackageJson>,
    pub auto_detect_overrides: &'a DependenciesOverrides,
    pub env_peers: Option<&'a PackageMap>,
    /// Installed packages for manually added dependencies, looked up ahead
    pub manual_packages: &'a BTreeMap<String, Option<InstalledPackage>>,
}

pub type StageFn = for<'c> fn(ResolutionState, &StageContext<'c>) -> ResolutionState;

pub struct Stage {
    pub name: &'static str,
    pub apply: StageFn,
}

pub const STAGES: [Stage; 11] = [
    Stage {
        name: "snapshot-packages",
        apply: snapshot_packages,
    },
    Stage {
        name: "remove-ignored-packages",
        apply: remove_ignored_packages,
    },
    Stage {
        name: "remove-dev-also-regular",
        apply: remove_dev_if_also_regular,
    },
    Stage {
        name: "apply-peers-from-component-model",
        apply: apply_peers_from_component_model,
    },
    Stage {
        name: "apply-package-json",
        apply: apply_package_json,
    },
    Stage {
        name: "apply-workspace-policy",
        apply: apply_workspace_policy,
    },
    Stage {
        name: "make-legacy-as-peer",
        apply: make_legacy_as_peer,
    },
    Stage {
        name: "apply-auto-detect-overrides",
        apply: apply_auto_detect_overrides,
    },
    Stage {
        name: "manually-add-dependencies",
        apply: manually_add_dependencies,
    },
    Stage {
        name: "apply-env-peers-on-env-itself",
        apply: apply_env_peers_on_env_itself,
    },
    Stage {
        name: "dedupe-core-aspects",
        apply: dedupe_core_aspects,
    },
];

/// Runs every stage in order
pub fn run(state: ResolutionState, context: &StageContext<'_>) -> ResolutionState {
    STAGES
        .iter()
        .fold(state, |state, stage| (stage.apply)(state, context))
}

fn snapshot_packages(mut state: ResolutionState, _: &StageContext<'_>) -> ResolutionState {
    state.origin_packages = state.packages.clone();
    state
}

fn remove_ignored_packages(mut state: ResolutionState, _: &StageContext<'_>) -> ResolutionState {
    for field in [DependencyField::Dependencies, DependencyField::DevDependencies] {
        let names: Vec<String> = state.packages.get(field).keys().cloned().collect();
        for name in names {
            if state.overrides.should_ignore_package_by_type(&name, field) {
                state.packages.get_mut(field).remove(&name);
            }
        }
    }
    state
}

fn remove_dev_if_also_regular(mut state: ResolutionState, _: &StageContext<'_>) -> ResolutionState {
    let AllPackagesDependencies {
        package_dependencies,
        dev_package_dependencies,
        ..
    } = &mut state.packages;
    dev_package_dependencies.retain(|name, _| !package_dependencies.contains_key(name));

    let regular = &state.dependencies.dependencies;
    state
        .dependencies
        .dev_dependencies
        .retain(|dev| !regular.iter().any(|d| d.id.is_equal_without_version(&dev.id)));
    state
}

/// Detected packages the component model declares as peers become peers.
/// Declared peers that are not used never show up.
fn apply_peers_from_component_model(
    mut state: ResolutionState,
    context: &StageContext<'_>,
) -> ResolutionState {
    let Some(model) = context.component.model.as_ref() else {
        return state;
    };
    let declared_peers = model.package_json().peer_dependencies;
    if declared_peers.is_empty() {
        return state;
    }
    let mut peer_packages = PackageMap::new();
    for (name, version) in &declared_peers {
        if state.overrides.should_ignore_peer_package(name) {
            continue;
        }
        for field in [DependencyField::Dependencies, DependencyField::DevDependencies] {
            if state.packages.get_mut(field).remove(name).is_some() {
                peer_packages.insert(name.clone(), version.clone());
            }
        }
    }
    state.packages.peer_package_dependencies = peer_packages;
    state
}

fn apply_package_json(mut state: ResolutionState, context: &StageContext<'_>) -> ResolutionState {
    if let Some(package_json) = context.consumer_package_json {
        reclassify_by_declared(
            &mut state.packages,
            &package_json.peer_dependencies,
            &package_json.dependencies,
        );
    }
    state
}

fn apply_workspace_policy(
    mut state: ResolutionState,
    context: &StageContext<'_>,
) -> ResolutionState {
    reclassify_by_declared(
        &mut state.packages,
        &context.workspace_policy.peer_dependencies,
        &context.workspace_policy.dependencies,
    );
    state
}

/// A package declared as peer moves to the peer map with the declared
/// version. A package declared as regular keeps its map and takes the
/// declared version.
fn reclassify_by_declared(
    packages: &mut AllPackagesDependencies,
    declared_peers: &PackageMap,
    declared_regular: &PackageMap,
) {
    for field in DependencyField::ALL {
        let names: Vec<String> = packages.get(field).keys().cloned().collect();
        for name in names {
            if let Some(peer_version) = declared_peers.get(&name) {
                packages.set_exclusive(DependencyField::PeerDependencies, &name, peer_version);
            } else if let Some(regular_version) = declared_regular.get(&name) {
                if field != DependencyField::PeerDependencies {
                    packages.peer_package_dependencies.remove(&name);
                }
                packages
                    .get_mut(field)
                    .insert(name, regular_version.clone());
            }
        }
    }
}

fn make_legacy_as_peer(mut state: ResolutionState, _: &StageContext<'_>) -> ResolutionState {
    let regular = state.packages.package_dependencies.remove(LEGACY_PACKAGE);
    let dev = state.packages.dev_package_dependencies.remove(LEGACY_PACKAGE);
    if let Some(version) = regular.or(dev) {
        let version = match coerce(&version) {
            Some(coerced) => format!("^{}", coerced),
            None => version,
        };
        state
            .packages
            .peer_package_dependencies
            .insert(LEGACY_PACKAGE.to_string(), version);
    }
    state
}

/// Applies overrides detected from the component's aspects, but only to
/// packages the component actually uses (or reports missing), unless the
/// override asks to add the package explicitly.
fn apply_auto_detect_overrides(
    mut state: ResolutionState,
    context: &StageContext<'_>,
) -> ResolutionState {
    let auto_detect = context.auto_detect_overrides;
    if auto_detect.is_empty() {
        return state;
    }
    let missing_packages = state.issues.missing_packages();
    let mut originally_exists: Vec<String> = Vec::new();

    for field in DependencyField::ALL {
        for (name, value) in auto_detect.get(field) {
            if state.overrides.should_ignore_peer_package(name) {
                continue;
            }
            let uses_package = |deps: &[Dependency]| {
                deps.iter()
                    .any(|d| d.package_name.as_deref() == Some(name.as_str()))
            };
            let in_component_deps = uses_package(&state.dependencies.dependencies);
            let in_component_dev_deps = uses_package(&state.dependencies.dev_dependencies);
            let add_explicitly = value == MANUALLY_ADD_DEPENDENCY;
            let detected = state.origin_packages.contains(name)
                || in_component_deps
                || in_component_dev_deps
                || originally_exists.contains(name)
                || missing_packages.contains(name);
            if !detected && !add_explicitly {
                continue;
            }
            originally_exists.push(name.clone());

            state.packages.get_mut(field).remove(name);
            if field == DependencyField::PeerDependencies {
                state.packages.remove_everywhere(name);
                let not_this_package =
                    |d: &Dependency| d.package_name.as_deref() != Some(name.as_str());
                state.dependencies.dependencies.retain(not_this_package);
                state.dependencies.dev_dependencies.retain(not_this_package);
            }

            if value == MANUALLY_REMOVE_DEPENDENCY {
                continue;
            }
            // component dependencies already carry the installed version
            if (in_component_deps || in_component_dev_deps)
                && field != DependencyField::PeerDependencies
            {
                continue;
            }
            let version = if add_explicitly {
                context
                    .consumer_package_json
                    .and_then(|pkg| pkg.find_version(name))
                    .map(String::from)
            } else {
                Some(value.clone())
            };
            match version {
                Some(version) => {
                    state.packages.set_exclusive(field, name, &version);
                    state.issues.resolve_missing_package(name);
                }
                None => state.overrides.add_missing_package(name),
            }
        }
    }
    state
}

/// Adds dependencies the component's override rules declare but the files
/// never imported
fn manually_add_dependencies(
    mut state: ResolutionState,
    context: &StageContext<'_>,
) -> ResolutionState {
    let Some(to_add) = state.overrides.get_dependencies_to_add_manually() else {
        return state;
    };
    let mut added = AllPackagesDependencies::default();

    for field in DependencyField::ALL {
        for (name, value) in to_add.get(field) {
            // peers are never looked up as components
            let installed = match field {
                DependencyField::PeerDependencies => None,
                _ => Some(context.manual_packages.get(name).cloned().flatten()),
            };
            if let Some(Some(InstalledPackage {
                name: package_name,
                component_id: Some(id),
            })) = &installed
            {
                let dependencies = &mut state.dependencies;
                let in_regular = dependencies
                    .dependencies
                    .iter()
                    .any(|d| d.id.is_equal_without_version(id));
                let in_dev = dependencies
                    .dev_dependencies
                    .iter()
                    .any(|d| d.id.is_equal_without_version(id));
                let is_dev = matches!(field, DependencyField::DevDependencies);
                // a component is never in both lists; regular wins
                if in_regular || (is_dev && in_dev) {
                    continue;
                }
                let list = if is_dev {
                    &mut dependencies.dev_dependencies
                } else {
                    dependencies
                        .dev_dependencies
                        .retain(|d| !d.id.is_equal_without_version(id));
                    &mut dependencies.dependencies
                };
                list.push(Dependency::new(
                    id.clone(),
                    Vec::new(),
                    Some(package_name.clone()),
                ));
                state
                    .overrides
                    .add_manually_added_dependency(field, id.to_string());
                continue;
            }
            let version =
                state
                    .overrides
                    .manually_add_package(field, name, value, context.consumer_package_json);
            if let Some(version) = version {
                added.get_mut(field).insert(name.clone(), version);
                if matches!(installed, Some(None)) {
                    state.overrides.add_missing_package(name);
                }
            }
        }
    }

    for field in DependencyField::ALL {
        for (name, version) in added.get(field) {
            state.packages.set_exclusive(field, name, version);
            state.issues.resolve_missing_package(name);
        }
    }
    state
}

/// An environment's peers for itself are regular dependencies of the env
/// component, overriding anything set before
fn apply_env_peers_on_env_itself(
    mut state: ResolutionState,
    context: &StageContext<'_>,
) -> ResolutionState {
    let Some(env_peers) = context.env_peers.filter(|peers| !peers.is_empty()) else {
        return state;
    };
    for name in env_peers.keys() {
        state.packages.remove_everywhere(name);
    }
    state
        .packages
        .package_dependencies
        .extend(env_peers.iter().map(|(k, v)| (k.clone(), v.clone())));
    state
}

fn dedupe_core_aspects(mut state: ResolutionState, _: &StageContext<'_>) -> ResolutionState {
    let mut seen: Vec<String> = Vec::with_capacity(state.core_aspects.len());
    for aspect in state.core_aspects.drain(..) {
        if !seen.contains(&aspect) {
            seen.push(aspect);
        }
    }
    state.core_aspects = seen;
    state
}
