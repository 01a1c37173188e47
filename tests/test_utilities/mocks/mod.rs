/// Mock implementations for testing
mod mock_bitmap;
mod mock_package_resolver;
mod mock_policy_provider;
mod mock_progress_reporter;

pub use mock_bitmap::MockBitmap;
pub use mock_package_resolver::MockPackageResolver;
pub use mock_policy_provider::MockPolicyProvider;
pub use mock_progress_reporter::MockProgressReporter;
