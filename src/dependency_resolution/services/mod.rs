pub mod dependency_resolver;
pub mod post_processing;
pub mod version_resolver;

pub use dependency_resolver::{DependencyResolver, ResolutionOutcome};
pub use post_processing::{ResolutionState, Stage, StageContext, LEGACY_PACKAGE, STAGES};
pub use version_resolver::{VersionResolver, VersionStrategy};
