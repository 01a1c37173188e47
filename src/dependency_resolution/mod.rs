//! Dependency resolution core: the domain model, override policies and the
//! resolver services.
pub mod domain;
pub mod policies;
pub mod services;
