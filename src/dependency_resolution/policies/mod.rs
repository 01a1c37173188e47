pub mod overrides;
pub mod overrides_dependencies;
pub mod version;
pub mod wildcard;

pub use overrides::{sort_wildcards, OverrideRule, OverridesConfig};
pub use overrides_dependencies::OverridesDependencies;
pub use version::{get_valid_version, is_snap};
pub use wildcard::WildcardPattern;
