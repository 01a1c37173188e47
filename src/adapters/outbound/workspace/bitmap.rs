use crate::dependency_resolution::domain::{paths, ComponentId};
use crate::ports::outbound::{BitmapEntry, ComponentIdentityResolver};
use std::collections::HashMap;

/// InMemoryBitmap adapter answering bitmap queries from loaded entries
///
/// File lookups are exact first, then by the deepest component root dir
/// containing the file.
pub struct InMemoryBitmap {
    entries: Vec<BitmapEntry>,
    files: HashMap<String, usize>,
}

impl InMemoryBitmap {
    pub fn new(entries: Vec<BitmapEntry>) -> Self {
        let mut files = HashMap::new();
        for (idx, entry) in entries.iter().enumerate() {
            for file in &entry.files {
                files.insert(paths::join_normalize(&entry.root_dir, file), idx);
            }
        }
        Self { entries, files }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ComponentIdentityResolver for InMemoryBitmap {
    fn get_component_id_by_path(&self, path: &str) -> Option<ComponentId> {
        if let Some(idx) = self.files.get(path) {
            return Some(self.entries[*idx].id.clone());
        }
        self.entries
            .iter()
            .filter(|entry| !entry.root_dir.is_empty() && paths::is_within(&entry.root_dir, path))
            .max_by_key(|entry| entry.root_dir.len())
            .map(|entry| entry.id.clone())
    }

    fn get_root_dir(&self, id: &ComponentId) -> Option<String> {
        self.entries
            .iter()
            .find(|entry| entry.id.is_equal_without_version(id))
            .map(|entry| entry.root_dir.clone())
    }

    fn ids_matching_without_version(&self, id: &ComponentId) -> Vec<ComponentId> {
        self.entries
            .iter()
            .filter(|entry| entry.id.is_equal_without_version(id))
            .map(|entry| entry.id.clone())
            .collect()
    }
}
