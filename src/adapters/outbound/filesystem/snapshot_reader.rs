use crate::ports::outbound::{WorkspaceSnapshot, WorkspaceSnapshotReader};
use crate::shared::error::ResolverError;
use crate::shared::security::{validate_input_file, MAX_INPUT_FILE_SIZE};
use crate::shared::Result;
use std::fs;
use std::path::Path;

/// FileSystemSnapshotReader adapter for reading workspace snapshots
///
/// The file is validated before reading: symbolic links, non-regular files
/// and oversized files are rejected.
pub struct FileSystemSnapshotReader;

impl FileSystemSnapshotReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSystemSnapshotReader {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkspaceSnapshotReader for FileSystemSnapshotReader {
    fn read_snapshot(&self, path: &Path) -> Result<WorkspaceSnapshot> {
        let snapshot_error = |details: String| ResolverError::SnapshotReadError {
            path: path.to_path_buf(),
            details,
        };

        if !path.exists() {
            return Err(snapshot_error("file does not exist".to_string()).into());
        }
        validate_input_file(path, "snapshot", MAX_INPUT_FILE_SIZE)?;

        let content = fs::read_to_string(path).map_err(|e| snapshot_error(e.to_string()))?;
        let snapshot: WorkspaceSnapshot =
            serde_json::from_str(&content).map_err(|e| snapshot_error(e.to_string()))?;
        Ok(snapshot)
    }
}
