/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to interact with external systems (bitmap, installed packages, policy
/// sources, file system, console).
pub mod component_identity_resolver;
pub mod formatter;
pub mod output_presenter;
pub mod package_resolver;
pub mod policy_provider;
pub mod progress_reporter;
pub mod snapshot_reader;

pub use component_identity_resolver::ComponentIdentityResolver;
pub use formatter::ResolutionFormatter;
pub use output_presenter::OutputPresenter;
pub use package_resolver::{InstalledPackage, PackageResolver};
pub use policy_provider::PolicyProviderSet;
pub use progress_reporter::ProgressReporter;
pub use snapshot_reader::{
    BitmapEntry, ComponentSnapshot, WorkspaceSnapshot, WorkspaceSnapshotReader,
};
