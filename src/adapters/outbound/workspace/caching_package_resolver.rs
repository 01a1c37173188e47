use crate::ports::outbound::{InstalledPackage, PackageResolver};
use crate::shared::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// Cache key for package lookups
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct CacheKey {
    package_name: String,
    component_root_dir: String,
}

impl CacheKey {
    fn new(package_name: &str, component_root_dir: &str) -> Self {
        Self {
            package_name: package_name.to_string(),
            component_root_dir: component_root_dir.to_string(),
        }
    }
}

/// CachingPackageResolver wraps a PackageResolver and adds in-memory caching.
///
/// Components of a batch resolve the same packages over and over; negative
/// answers are cached too. The cache is safe for concurrent access.
pub struct CachingPackageResolver<R: PackageResolver> {
    inner: R,
    cache: Arc<DashMap<CacheKey, Option<InstalledPackage>>>,
}

impl<R: PackageResolver> CachingPackageResolver<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: Arc::new(DashMap::new()),
        }
    }

    #[cfg(test)]
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

#[async_trait]
impl<R: PackageResolver> PackageResolver for CachingPackageResolver<R> {
    async fn resolve_package(
        &self,
        package_name: &str,
        component_root_dir: &str,
    ) -> Result<Option<InstalledPackage>> {
        let key = CacheKey::new(package_name, component_root_dir);

        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached.clone());
        }

        let installed = self
            .inner
            .resolve_package(package_name, component_root_dir)
            .await?;
        self.cache.insert(key, installed.clone());

        Ok(installed)
    }
}
