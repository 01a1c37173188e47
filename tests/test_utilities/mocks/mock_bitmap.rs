use bit_deps::prelude::*;

/// Mock bitmap tracking components by root dir
#[derive(Default, Clone)]
pub struct MockBitmap {
    components: Vec<(ComponentId, String)>,
}

impl MockBitmap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_component(mut self, id: &str, root_dir: &str) -> Self {
        self.components
            .push((id.parse().unwrap(), root_dir.to_string()));
        self
    }
}

impl ComponentIdentityResolver for MockBitmap {
    fn get_component_id_by_path(&self, path: &str) -> Option<ComponentId> {
        self.components
            .iter()
            .filter(|(_, root)| path == root || path.starts_with(&format!("{}/", root)))
            .max_by_key(|(_, root)| root.len())
            .map(|(id, _)| id.clone())
    }

    fn get_root_dir(&self, id: &ComponentId) -> Option<String> {
        self.components
            .iter()
            .find(|(tracked, _)| tracked.is_equal_without_version(id))
            .map(|(_, root)| root.clone())
    }

    fn ids_matching_without_version(&self, id: &ComponentId) -> Vec<ComponentId> {
        self.components
            .iter()
            .filter(|(tracked, _)| tracked.is_equal_without_version(id))
            .map(|(tracked, _)| tracked.clone())
            .collect()
    }
}
