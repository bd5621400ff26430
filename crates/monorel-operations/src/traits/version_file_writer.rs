use std::path::{Path, PathBuf};

use monorel_workspace::VersionFileConfig;
use semver::Version;

use crate::Result;

pub trait VersionFileWriter: Send + Sync {
    /// The file [`VersionFileWriter::write`] would create for `package_dir`.
    fn target(&self, package_dir: &Path, config: &VersionFileConfig) -> PathBuf {
        package_dir.join(config.path())
    }

    /// Regenerates the version file. Returns `None` when the package has no
    /// source directory and nothing was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be removed or written.
    fn write(
        &self,
        package_dir: &Path,
        version: &Version,
        config: &VersionFileConfig,
    ) -> Result<Option<PathBuf>>;
}
