use crate::shared::error::ResolverError;
use crate::shared::Result;
use std::fs;
use std::path::Path;

/// Maximum size of an input file (snapshot or config), 64 MB
pub const MAX_INPUT_FILE_SIZE: u64 = 64 * 1024 * 1024;

/// Validates an input file before it is read.
///
/// The path must exist, must not be a symbolic link, must be a regular
/// file and must not exceed `max_size` bytes.
///
/// # Arguments
/// * `path` - The path to validate
/// * `file_description` - Description used in error messages (e.g. "snapshot")
/// * `max_size` - Maximum allowed size in bytes
pub fn validate_input_file(path: &Path, file_description: &str, max_size: u64) -> Result<()> {
    let metadata = fs::symlink_metadata(path).map_err(|e| {
        anyhow::anyhow!(
            "Failed to read {} metadata for {}: {}",
            file_description,
            path.display(),
            e
        )
    })?;

    if metadata.is_symlink() {
        return Err(ResolverError::SecurityError {
            path: path.to_path_buf(),
            reason: format!("The {} is a symbolic link", file_description),
            hint: "Pass the real file path instead of a link".to_string(),
        }
        .into());
    }

    if !metadata.is_file() {
        anyhow::bail!("{} is not a regular file", path.display());
    }

    if metadata.len() > max_size {
        return Err(ResolverError::SecurityError {
            path: path.to_path_buf(),
            reason: format!(
                "The {} is too large ({} bytes). Maximum allowed size is {} bytes.",
                file_description,
                metadata.len(),
                max_size
            ),
            hint: "Split the workspace into smaller snapshots".to_string(),
        }
        .into());
    }

    Ok(())
}
