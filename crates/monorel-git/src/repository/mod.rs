mod commit;
mod log;
mod remote;
mod staging;
mod status;
mod tag;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{GitError, Result};

/// A non-bare repository, opened from any directory inside its working tree.
pub struct Repository {
    pub(crate) inner: git2::Repository,
    root: PathBuf,
}

impl Repository {
    /// Searches upwards from `path` for the enclosing repository.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::NotARepository`] if no repository encloses `path`
    /// or the repository is bare.
    pub fn open(path: &Path) -> Result<Self> {
        let inner = git2::Repository::discover(path).map_err(|_| GitError::NotARepository {
            path: path.to_path_buf(),
        })?;

        let root = inner.workdir().ok_or_else(|| GitError::NotARepository {
            path: path.to_path_buf(),
        })?;

        let root = dunce::simplified(root).to_path_buf();

        debug!(root = %root.display(), "opened repository");
        Ok(Self { inner, root })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `path` relative to the working directory, for pathspecs. Paths
    /// outside the repository are returned unchanged.
    pub(crate) fn workdir_relative(&self, path: &Path) -> PathBuf {
        if path.is_relative() {
            return path.to_path_buf();
        }

        let resolved = dunce::canonicalize(path).unwrap_or_else(|_| dunce::simplified(path).to_path_buf());
        let root = dunce::canonicalize(&self.root).unwrap_or_else(|_| self.root.clone());

        [(resolved.as_path(), root.as_path()), (path, self.root.as_path())]
            .into_iter()
            .find_map(|(candidate, base)| candidate.strip_prefix(base).ok())
            .map_or_else(|| path.to_path_buf(), Path::to_path_buf)
    }
}
