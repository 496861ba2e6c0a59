//! Atomic file replacement.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{Error, Result};

/// Writes `contents` to `path` so that readers see either the old file or
/// the complete new one.
///
/// The data goes to a temporary file in the target directory, is synced,
/// and is then renamed over `path`. Missing parent directories are created.
/// The resulting file is readable by its owner only.
///
/// # Errors
///
/// Returns [`Error::Write`] if any step fails; the temporary file is
/// removed in that case.
///
/// # Examples
///
/// ```
/// use sprout::envfile::atomic_write;
///
/// let dir = tempfile::tempdir().unwrap();
/// let path = dir.path().join("nested/.env");
/// atomic_write(&path, "PORT=3000\n").unwrap();
/// assert_eq!(std::fs::read_to_string(&path).unwrap(), "PORT=3000\n");
/// ```
pub fn atomic_write(path: &Path, contents: &str) -> Result<()> {
    let write_error = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(write_error)?;

    let mut temp = NamedTempFile::new_in(parent).map_err(write_error)?;
    temp.write_all(contents.as_bytes()).map_err(write_error)?;
    temp.as_file().sync_all().map_err(write_error)?;
    temp.persist(path).map_err(|e| write_error(e.error))?;
    Ok(())
}
