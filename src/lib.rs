//! bit-deps - dependency resolution for component workspaces
//!
//! For every component of a workspace, this library turns the raw import
//! graph found by a source extractor into classified dependency data:
//! component dependencies, package dependencies split into regular, dev and
//! peer, and the issues found along the way. Workspace policy, user override
//! rules and the component's history all take part in the result.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`dependency_resolution`): Value objects, override
//!   policies and the resolver services
//! - **Application Layer** (`application`): Batch use case, DTOs and factories
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use bit_deps::prelude::*;
//! use std::path::Path;
//!
//! # async fn example() -> Result<()> {
//! let snapshot = FileSystemSnapshotReader::new().read_snapshot(Path::new("snapshot.json"))?;
//!
//! let use_case = ResolveDependenciesUseCase::new(
//!     InMemoryBitmap::new(snapshot.bitmap_entries()),
//!     SnapshotPackageResolver::new(snapshot.installed_packages.clone()),
//!     SnapshotPolicyProvider::default().with_snapshot(&snapshot),
//!     OverridesConfig::default(),
//!     StderrProgressReporter::new(),
//! );
//!
//! let response = use_case.execute(ResolveRequest::new(snapshot.components)).await?;
//! println!("{}", JsonFormatter::new().format(&response)?);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod config;
pub mod dependency_resolution;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{
        FileSystemSnapshotReader, FileSystemWriter, StdoutPresenter,
    };
    pub use crate::adapters::outbound::formatters::{JsonFormatter, TextFormatter};
    pub use crate::adapters::outbound::workspace::{
        CachingPackageResolver, InMemoryBitmap, SnapshotPackageResolver, SnapshotPolicyProvider,
    };
    pub use crate::application::dto::{ComponentResolution, ResolveRequest, ResolveResponse};
    pub use crate::application::use_cases::ResolveDependenciesUseCase;
    pub use crate::dependency_resolution::domain::{
        ComponentId, ComponentToResolve, DependenciesData, IssueKind, IssuesList,
        RawDependencyTree,
    };
    pub use crate::dependency_resolution::policies::{OverridesConfig, WildcardPattern};
    pub use crate::dependency_resolution::services::{
        DependencyResolver, ResolutionOutcome, VersionResolver,
    };
    pub use crate::ports::inbound::DependencyResolutionPort;
    pub use crate::ports::outbound::{
        ComponentIdentityResolver, OutputPresenter, PackageResolver, PolicyProviderSet,
        ProgressReporter, ResolutionFormatter, WorkspaceSnapshot, WorkspaceSnapshotReader,
    };
    pub use crate::shared::Result;
}
