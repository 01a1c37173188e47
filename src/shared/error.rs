use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow CI systems to tell a blocked component set apart
/// from a broken invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - resolution finished (issues may exist but were not requested to fail)
    Success = 0,
    /// At least one component has issues and `--fail-on-issues` was given
    IssuesDetected = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (inconsistent raw tree, bad config, file I/O error, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::IssuesDetected => write!(f, "Issues Detected (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Typed failures of the dependency resolution subsystem.
///
/// Only `InternalConsistency` is raised during resolution itself; every
/// other per-file problem becomes an entry of the component's `IssuesList`.
#[derive(Debug, Error)]
pub enum ResolverError {
    #[error("DependencyResolver: a file \"{file}\" of component \"{component}\" was not returned from the driver, its dependencies are unknown\n\n💡 Hint: The dependency extractor and the component's file list have diverged. Re-run the extraction for this component.")]
    InternalConsistency { component: String, file: String },

    #[error("Invalid overrides rule \"{rule}\": {reason}\n\n💡 Hint: Fix the \"overrides\" section of the workspace configuration")]
    InvalidOverrides { rule: String, reason: String },

    #[error("Invalid component id \"{value}\": {reason}")]
    InvalidComponentId { value: String, reason: String },

    #[error("Failed to read workspace snapshot: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the snapshot file exists and contains valid JSON")]
    SnapshotReadError { path: PathBuf, details: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    /// Validation error for builder patterns and request data
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Security violation: {path}\nReason: {reason}\n\n💡 Hint: {hint}")]
    SecurityError {
        path: PathBuf,
        reason: String,
        hint: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::IssuesDetected.as_i32(), 1);
        assert_eq!(ExitCode::InvalidArguments.as_i32(), 2);
        assert_eq!(ExitCode::ApplicationError.as_i32(), 3);
    }

    #[test]
    fn test_exit_code_display() {
        assert_eq!(format!("{}", ExitCode::Success), "Success (0)");
        assert_eq!(
            format!("{}", ExitCode::IssuesDetected),
            "Issues Detected (1)"
        );
        assert_eq!(
            format!("{}", ExitCode::ApplicationError),
            "Application Error (3)"
        );
    }

    #[test]
    fn test_internal_consistency_display() {
        let error = ResolverError::InternalConsistency {
            component: "my-scope/button".to_string(),
            file: "index.ts".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("\"index.ts\""));
        assert!(display.contains("my-scope/button"));
        assert!(display.contains("its dependencies are unknown"));
        assert!(display.contains("💡 Hint:"));
    }

    #[test]
    fn test_invalid_overrides_display() {
        let error = ResolverError::InvalidOverrides {
            rule: "utils/*".to_string(),
            reason: "found a forbidden field \"name\"".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("utils/*"));
        assert!(display.contains("forbidden field"));
    }

    #[test]
    fn test_snapshot_read_error_display() {
        let error = ResolverError::SnapshotReadError {
            path: PathBuf::from("/tmp/snapshot.json"),
            details: "expected value at line 1".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("/tmp/snapshot.json"));
        assert!(display.contains("expected value"));
    }

    #[test]
    fn test_security_error_display() {
        let error = ResolverError::SecurityError {
            path: PathBuf::from("/test/symlink"),
            reason: "Symbolic links are not allowed".to_string(),
            hint: "Use a regular file instead".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Security violation"));
        assert!(display.contains("Use a regular file instead"));
    }

    #[test]
    fn test_downcast_from_anyhow() {
        let err: anyhow::Error = ResolverError::Validation {
            message: "empty".to_string(),
        }
        .into();
        assert!(matches!(
            err.downcast_ref::<ResolverError>(),
            Some(ResolverError::Validation { .. })
        ));
    }
}
