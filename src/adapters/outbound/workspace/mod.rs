/// Workspace adapters backed by a captured workspace snapshot
mod bitmap;
mod caching_package_resolver;
mod package_resolver;
mod policy_provider;

pub use bitmap::InMemoryBitmap;
pub use caching_package_resolver::CachingPackageResolver;
pub use package_resolver::SnapshotPackageResolver;
pub use policy_provider::SnapshotPolicyProvider;
