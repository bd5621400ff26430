use std::path::{Path, PathBuf};

use monorel_core::{BumpKind, MANIFEST_FILE, PreReleaseChannel, ReleaseInfo};
use monorel_workspace::VersionFileConfig;
use semver::Version;
use tracing::debug;

use crate::Result;
use crate::traits::{VersionBumper, VersionFileWriter};

/// Bumps the `version` field of a `package.json` in place.
pub struct ManifestVersionBumper;

impl ManifestVersionBumper {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for ManifestVersionBumper {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionBumper for ManifestVersionBumper {
    fn bump(
        &self,
        dir: &Path,
        kind: BumpKind,
        channel: Option<PreReleaseChannel>,
    ) -> Result<ReleaseInfo> {
        let manifest_path = dir.join(MANIFEST_FILE);
        let current = monorel_manifest::read_version(&manifest_path)?;
        let next = monorel_version::bump_version(&current, kind, channel)?;

        monorel_manifest::write_version(&manifest_path, &next)?;
        monorel_manifest::verify_version(&manifest_path, &next)?;
        debug!(manifest = %manifest_path.display(), from = %current, to = %next, "bumped version");

        Ok(ReleaseInfo::new(next).with_previous(current))
    }
}

pub struct FileSystemVersionFileWriter;

impl FileSystemVersionFileWriter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSystemVersionFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionFileWriter for FileSystemVersionFileWriter {
    fn write(
        &self,
        package_dir: &Path,
        version: &Version,
        config: &VersionFileConfig,
    ) -> Result<Option<PathBuf>> {
        Ok(monorel_manifest::write_version_file(
            package_dir,
            version,
            config.source_dir(),
            config.path(),
        )?)
    }
}
