//! Final version pass over resolved component dependencies.

use crate::dependency_resolution::domain::{
    AllDependencies, ComponentId, ComponentModel, DebugDependencies, ExtensionEntry, VersionSource,
};
use crate::dependency_resolution::policies::get_valid_version;
use crate::ports::outbound::ComponentIdentityResolver;

/// Sources a dependency version can come from, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionStrategy {
    /// A version pinned by the component's override rule
    ComponentConfig,
    /// The version the dependency already carries
    CurrentVersion,
    /// The version the workspace currently tracks
    BitMap,
    /// The version recorded when the component was last persisted
    Model,
}

impl VersionStrategy {
    pub const ALL: [VersionStrategy; 4] = [
        VersionStrategy::ComponentConfig,
        VersionStrategy::CurrentVersion,
        VersionStrategy::BitMap,
        VersionStrategy::Model,
    ];

    fn source(self) -> Option<VersionSource> {
        match self {
            VersionStrategy::ComponentConfig => Some(VersionSource::ComponentConfig),
            VersionStrategy::CurrentVersion => None,
            VersionStrategy::BitMap => Some(VersionSource::BitMap),
            VersionStrategy::Model => Some(VersionSource::Model),
        }
    }
}

/// Gives every component dependency and extension a concrete version
pub struct VersionResolver<'a> {
    bitmap: &'a dyn ComponentIdentityResolver,
    model: Option<&'a ComponentModel>,
    pinned_versions: &'a [(String, String)],
}

impl<'a> VersionResolver<'a> {
    pub fn new(
        bitmap: &'a dyn ComponentIdentityResolver,
        model: Option<&'a ComponentModel>,
        pinned_versions: &'a [(String, String)],
    ) -> Self {
        Self {
            bitmap,
            model,
            pinned_versions,
        }
    }

    /// Rewrites dependency and extension ids in place. Ids no strategy
    /// knows a version for are left untouched.
    pub fn resolve(
        &self,
        dependencies: &mut AllDependencies,
        extensions: &mut [ExtensionEntry],
        mut debug: Option<&mut DebugDependencies>,
    ) {
        for dependency in dependencies.iter_mut() {
            if let Some((strategy, id)) = self.resolve_version(&dependency.id) {
                if let Some(debug) = debug.as_deref_mut() {
                    record_debug(debug, &dependency.id, strategy, &id);
                }
                dependency.id = id;
            }
        }
        for extension in extensions.iter_mut() {
            let Some(extension_id) = extension.extension_id.as_ref() else {
                continue;
            };
            if let Some((_, id)) = self.resolve_version(extension_id) {
                extension.extension_id = Some(id);
            }
        }
    }

    /// The first strategy that knows a version for `id`
    pub fn resolve_version(&self, id: &ComponentId) -> Option<(VersionStrategy, ComponentId)> {
        VersionStrategy::ALL
            .iter()
            .find_map(|strategy| self.try_strategy(*strategy, id).map(|found| (*strategy, found)))
    }

    fn try_strategy(&self, strategy: VersionStrategy, id: &ComponentId) -> Option<ComponentId> {
        match strategy {
            VersionStrategy::ComponentConfig => {
                let key = id.to_string_without_version();
                self.pinned_versions
                    .iter()
                    .find(|(name, _)| *name == key)
                    .and_then(|(_, version)| get_valid_version(Some(version)))
                    .map(|version| id.change_version(version))
            }
            VersionStrategy::CurrentVersion => id.has_version().then(|| id.clone()),
            VersionStrategy::BitMap => self.bitmap.get_component_id_ignore_version(id),
            VersionStrategy::Model => self
                .model
                .and_then(|model| model.search_without_version(id))
                .cloned(),
        }
    }
}

fn record_debug(
    debug: &mut DebugDependencies,
    id: &ComponentId,
    strategy: VersionStrategy,
    resolved: &ComponentId,
) {
    let Some(entry) = debug.find_mut(id) else {
        return;
    };
    if let Some(source) = strategy.source() {
        entry.version_resolved_from = Some(source);
    }
    entry.version = resolved.version().map(String::from);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dependency_resolution::domain::{DebugComponentsDependency, Dependency};

    struct Bitmap(Vec<ComponentId>);

    impl ComponentIdentityResolver for Bitmap {
        fn get_component_id_by_path(&self, _path: &str) -> Option<ComponentId> {
            None
        }

        fn get_root_dir(&self, _id: &ComponentId) -> Option<String> {
            None
        }

        fn ids_matching_without_version(&self, id: &ComponentId) -> Vec<ComponentId> {
            self.0
                .iter()
                .filter(|tracked| tracked.is_equal_without_version(id))
                .cloned()
                .collect()
        }
    }

    fn id(s: &str) -> ComponentId {
        s.parse().unwrap()
    }

    fn deps(ids: &[&str]) -> AllDependencies {
        AllDependencies {
            dependencies: ids.iter().map(|s| Dependency::new(id(s), vec![], None)).collect(),
            dev_dependencies: Vec::new(),
        }
    }

    #[test]
    fn test_strategy_priority() {
        let bitmap = Bitmap(vec![id("my.scope/card@0.0.9"), id("my.scope/list@1.0.0")]);
        let model = ComponentModel {
            dependencies: vec![id("my.scope/table@2.0.0")],
            ..Default::default()
        };
        let pinned = vec![("my.scope/card".to_string(), "0.0.5".to_string())];
        let resolver = VersionResolver::new(&bitmap, Some(&model), &pinned);

        let (strategy, resolved) = resolver.resolve_version(&id("my.scope/card@0.0.7")).unwrap();
        assert_eq!(strategy, VersionStrategy::ComponentConfig);
        assert_eq!(resolved.version(), Some("0.0.5"));

        let (strategy, _) = resolver.resolve_version(&id("my.scope/list@0.1.0")).unwrap();
        assert_eq!(strategy, VersionStrategy::CurrentVersion);

        let (strategy, resolved) = resolver.resolve_version(&id("my.scope/list")).unwrap();
        assert_eq!(strategy, VersionStrategy::BitMap);
        assert_eq!(resolved.version(), Some("1.0.0"));

        let (strategy, resolved) = resolver.resolve_version(&id("my.scope/table")).unwrap();
        assert_eq!(strategy, VersionStrategy::Model);
        assert_eq!(resolved.version(), Some("2.0.0"));

        assert!(resolver.resolve_version(&id("my.scope/unknown")).is_none());
    }

    #[test]
    fn test_resolve_updates_dependencies_extensions_and_debug() {
        let bitmap = Bitmap(vec![id("my.scope/card@0.0.9"), id("teambit.react/react@1.2.0")]);
        let resolver = VersionResolver::new(&bitmap, None, &[]);
        let mut dependencies = deps(&["my.scope/card", "my.scope/other@3.0.0"]);
        let mut extensions = vec![ExtensionEntry::from_id(id("teambit.react/react"))];
        let mut debug = DebugDependencies {
            components: vec![
                DebugComponentsDependency::new(id("my.scope/card")),
                DebugComponentsDependency::new(id("my.scope/other@3.0.0")),
            ],
            unidentified_packages: Vec::new(),
        };

        resolver.resolve(&mut dependencies, &mut extensions, Some(&mut debug));

        assert_eq!(dependencies.dependencies[0].id.to_string(), "my.scope/card@0.0.9");
        assert_eq!(dependencies.dependencies[1].id.to_string(), "my.scope/other@3.0.0");
        assert_eq!(
            extensions[0].extension_id.as_ref().unwrap().to_string(),
            "teambit.react/react@1.2.0"
        );
        assert_eq!(debug.components[0].version_resolved_from, Some(VersionSource::BitMap));
        assert_eq!(debug.components[0].version.as_deref(), Some("0.0.9"));
        assert_eq!(debug.components[1].version_resolved_from, None);
        assert_eq!(debug.components[1].version.as_deref(), Some("3.0.0"));
    }
}
