use std::path::{Path, PathBuf};

use crate::error::WorkspaceError;
use crate::manifest::{ReleaseMetadata, VersionFileMetadata};

const DEFAULT_TEST_COMMAND: &[&str] = &["pnpm", "run", "test"];
const DEFAULT_BUILD_COMMAND: &[&str] = &["pnpm", "run", "build"];
const DEFAULT_PUBLISH_COMMAND: &[&str] = &[
    "pnpm",
    "-r",
    "publish",
    "--access",
    "public",
    "--no-git-checks",
];
const DEFAULT_SOURCE_DIR: &str = "src";
const DEFAULT_VERSION_FILE: &str = "src/version.ts";
const DEFAULT_CHANGELOG_FILE: &str = "CHANGELOG.md";
const DEFAULT_REMOTE: &str = "origin";

fn argv(words: &[&str]) -> Vec<String> {
    words.iter().map(ToString::to_string).collect()
}

/// Where the generated version marker lives, relative to a package directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionFileConfig {
    source_dir: PathBuf,
    path: PathBuf,
}

impl Default for VersionFileConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from(DEFAULT_SOURCE_DIR),
            path: PathBuf::from(DEFAULT_VERSION_FILE),
        }
    }
}

impl VersionFileConfig {
    /// The directory whose presence enables the version file.
    #[must_use]
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Release settings read from the `"monorel"` key of the root `package.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct ReleaseConfig {
    test_command: Vec<String>,
    build_command: Vec<String>,
    publish_command: Vec<String>,
    version_file: VersionFileConfig,
    changelog_file: PathBuf,
    remote: String,
    rollback: bool,
    require_clean_tree: bool,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            test_command: argv(DEFAULT_TEST_COMMAND),
            build_command: argv(DEFAULT_BUILD_COMMAND),
            publish_command: argv(DEFAULT_PUBLISH_COMMAND),
            version_file: VersionFileConfig::default(),
            changelog_file: PathBuf::from(DEFAULT_CHANGELOG_FILE),
            remote: String::from(DEFAULT_REMOTE),
            rollback: true,
            require_clean_tree: false,
        }
    }
}

impl ReleaseConfig {
    pub(crate) fn from_metadata(metadata: ReleaseMetadata) -> Result<Self, WorkspaceError> {
        let defaults = Self::default();
        let version_file = metadata.version_file.unwrap_or_default();

        let config = Self {
            test_command: metadata.test_command.unwrap_or(defaults.test_command),
            build_command: metadata.build_command.unwrap_or(defaults.build_command),
            publish_command: metadata.publish_command.unwrap_or(defaults.publish_command),
            version_file: merge_version_file(version_file, defaults.version_file),
            changelog_file: metadata.changelog_file.unwrap_or(defaults.changelog_file),
            remote: metadata.remote.unwrap_or(defaults.remote),
            rollback: metadata.rollback.unwrap_or(defaults.rollback),
            require_clean_tree: metadata
                .require_clean_tree
                .unwrap_or(defaults.require_clean_tree),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), WorkspaceError> {
        for (field, command) in [
            ("testCommand", &self.test_command),
            ("buildCommand", &self.build_command),
            ("publishCommand", &self.publish_command),
        ] {
            if command.first().is_none_or(|program| program.trim().is_empty()) {
                return Err(WorkspaceError::InvalidConfig {
                    field,
                    reason: "must name a program".to_string(),
                });
            }
        }

        if self.version_file.path.is_absolute() {
            return Err(WorkspaceError::InvalidConfig {
                field: "versionFile.path",
                reason: "must be relative to the package directory".to_string(),
            });
        }

        if self.remote.trim().is_empty() {
            return Err(WorkspaceError::InvalidConfig {
                field: "remote",
                reason: "must not be empty".to_string(),
            });
        }

        Ok(())
    }

    #[must_use]
    pub fn test_command(&self) -> &[String] {
        &self.test_command
    }

    #[must_use]
    pub fn build_command(&self) -> &[String] {
        &self.build_command
    }

    #[must_use]
    pub fn publish_command(&self) -> &[String] {
        &self.publish_command
    }

    #[must_use]
    pub fn version_file(&self) -> &VersionFileConfig {
        &self.version_file
    }

    #[must_use]
    pub fn changelog_file(&self) -> &Path {
        &self.changelog_file
    }

    #[must_use]
    pub fn remote(&self) -> &str {
        &self.remote
    }

    #[must_use]
    pub fn rollback(&self) -> bool {
        self.rollback
    }

    #[must_use]
    pub fn require_clean_tree(&self) -> bool {
        self.require_clean_tree
    }

    #[must_use]
    pub fn with_rollback(mut self, rollback: bool) -> Self {
        self.rollback = rollback;
        self
    }

    #[must_use]
    pub fn with_require_clean_tree(mut self, require_clean_tree: bool) -> Self {
        self.require_clean_tree = require_clean_tree;
        self
    }

    #[must_use]
    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = remote.into();
        self
    }
}

fn merge_version_file(
    metadata: VersionFileMetadata,
    defaults: VersionFileConfig,
) -> VersionFileConfig {
    VersionFileConfig {
        source_dir: metadata.source_dir.unwrap_or(defaults.source_dir),
        path: metadata.path.unwrap_or(defaults.path),
    }
}
