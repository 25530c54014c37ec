use crate::error::Error;
use crate::result::Result;
use std::path::{Path, PathBuf};

/// Name of a file inside the archive. ZIP paths always use forward slashes,
/// so backslashes are replaced explicitly rather than trusting the host's
/// separator handling.
pub fn archive_name(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// The directory to package: the given path or the current directory
pub fn resolve_base_dir(path: Option<&Path>) -> Result<PathBuf> {
    let base_dir = match path {
        Some(path) => path.to_path_buf(),
        None => std::env::current_dir()?,
    };

    if !base_dir.is_dir() {
        return Err(Error::BaseDirNotFound(base_dir.display().to_string()));
    }

    Ok(base_dir)
}
