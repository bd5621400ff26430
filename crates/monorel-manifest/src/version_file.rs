use std::path::{Path, PathBuf};

use semver::Version;
use tracing::debug;

use crate::error::ManifestError;

#[must_use]
pub fn render_version_file(version: &Version) -> String {
    format!("export default '{version}'\n")
}

/// Regenerate the version marker of one package.
///
/// Does nothing and returns `None` when `<package_dir>/<source_dir>` is not a
/// directory. Otherwise removes `<package_dir>/<file>` if present, writes it
/// afresh and returns its path. Running it twice leaves the same file.
///
/// # Errors
///
/// Returns an error if the old file cannot be removed or the new one cannot
/// be written.
pub fn write_version_file(
    package_dir: &Path,
    version: &Version,
    source_dir: &Path,
    file: &Path,
) -> Result<Option<PathBuf>, ManifestError> {
    if !package_dir.join(source_dir).is_dir() {
        debug!(package = %package_dir.display(), "no source directory, skipping version file");
        return Ok(None);
    }

    let path = package_dir.join(file);

    if path.exists() {
        std::fs::remove_file(&path).map_err(|source| ManifestError::Remove {
            path: path.clone(),
            source,
        })?;
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ManifestError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    std::fs::write(&path, render_version_file(version)).map_err(|source| ManifestError::Write {
        path: path.clone(),
        source,
    })?;

    debug!(file = %path.display(), %version, "wrote version file");
    Ok(Some(path))
}
