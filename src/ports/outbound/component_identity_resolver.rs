use crate::dependency_resolution::domain::ComponentId;

/// ComponentIdentityResolver port for the workspace bitmap
///
/// The bitmap maps workspace files to the component that tracks them and
/// records the version each tracked component currently has.
pub trait ComponentIdentityResolver: Send + Sync {
    /// Finds the component tracking a file
    ///
    /// # Arguments
    /// * `path` - File path relative to the workspace root, linux separators
    fn get_component_id_by_path(&self, path: &str) -> Option<ComponentId>;

    /// Root dir of a tracked component, matched ignoring version
    fn get_root_dir(&self, id: &ComponentId) -> Option<String>;

    /// All tracked ids equal to `id` when versions are ignored
    fn ids_matching_without_version(&self, id: &ComponentId) -> Vec<ComponentId>;

    /// The tracked id equal to `id` ignoring version, with its bitmap version
    fn get_component_id_ignore_version(&self, id: &ComponentId) -> Option<ComponentId> {
        self.ids_matching_without_version(id).into_iter().next()
    }
}
