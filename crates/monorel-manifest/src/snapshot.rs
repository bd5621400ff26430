use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ManifestError;

/// The bytes of a file at one point in time, or its absence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSnapshot {
    path: PathBuf,
    content: Option<Vec<u8>>,
}

impl FileSnapshot {
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn capture(path: &Path) -> Result<Self, ManifestError> {
        let content = match std::fs::read(path) {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(source) => {
                return Err(ManifestError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            content,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn existed(&self) -> bool {
        self.content.is_some()
    }

    /// Put the file back as captured; a file that did not exist is removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or removed.
    pub fn restore(&self) -> Result<(), ManifestError> {
        match &self.content {
            Some(bytes) => std::fs::write(&self.path, bytes).map_err(|source| {
                ManifestError::Write {
                    path: self.path.clone(),
                    source,
                }
            })?,
            None => match std::fs::remove_file(&self.path) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(source) => {
                    return Err(ManifestError::Remove {
                        path: self.path.clone(),
                        source,
                    });
                }
            },
        }

        debug!(file = %self.path.display(), existed = self.existed(), "restored snapshot");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restore_rewrites_original_bytes() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("package.json");
        std::fs::write(&path, "before")?;

        let snapshot = FileSnapshot::capture(&path)?;
        std::fs::write(&path, "after")?;
        snapshot.restore()?;

        assert!(snapshot.existed());
        assert_eq!(std::fs::read_to_string(&path)?, "before");
        Ok(())
    }

    #[test]
    fn restore_removes_file_that_did_not_exist() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("CHANGELOG.md");

        let snapshot = FileSnapshot::capture(&path)?;
        std::fs::write(&path, "# Changelog\n")?;
        snapshot.restore()?;

        assert!(!snapshot.existed());
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn restoring_absent_file_twice_is_harmless() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let snapshot = FileSnapshot::capture(&dir.path().join("missing"))?;

        snapshot.restore()?;
        snapshot.restore()?;
        Ok(())
    }
}
