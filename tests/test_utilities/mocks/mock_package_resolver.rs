use async_trait::async_trait;
use bit_deps::ports::outbound::InstalledPackage;
use bit_deps::prelude::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock PackageResolver answering from a fixed set of installed packages
#[derive(Default, Clone)]
pub struct MockPackageResolver {
    installed: HashMap<String, InstalledPackage>,
    lookups: Arc<Mutex<Vec<String>>>,
}

impl MockPackageResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_package(mut self, name: &str) -> Self {
        self.installed.insert(
            name.to_string(),
            InstalledPackage {
                name: name.to_string(),
                component_id: None,
            },
        );
        self
    }

    pub fn with_component_package(mut self, name: &str, id: &str) -> Self {
        self.installed.insert(
            name.to_string(),
            InstalledPackage {
                name: name.to_string(),
                component_id: Some(id.parse().unwrap()),
            },
        );
        self
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl PackageResolver for MockPackageResolver {
    async fn resolve_package(
        &self,
        package_name: &str,
        _component_root_dir: &str,
    ) -> Result<Option<InstalledPackage>> {
        self.lookups.lock().unwrap().push(package_name.to_string());
        Ok(self.installed.get(package_name).cloned())
    }
}
