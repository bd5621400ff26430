use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::ValueEnum;
use semver::Version;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const MANIFEST_FILE: &str = "package.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BumpKind {
    Patch,
    Minor,
    Major,
    Prepatch,
    Preminor,
    Premajor,
    Prerelease,
}

impl BumpKind {
    /// Every bump kind, in the order they are offered to the user.
    pub const ALL: [Self; 7] = [
        Self::Patch,
        Self::Minor,
        Self::Major,
        Self::Prepatch,
        Self::Preminor,
        Self::Premajor,
        Self::Prerelease,
    ];

    /// Whether this kind produces a pre-release version and therefore needs a channel.
    #[must_use]
    pub fn is_prerelease(self) -> bool {
        matches!(
            self,
            Self::Prepatch | Self::Preminor | Self::Premajor | Self::Prerelease
        )
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Patch => "patch",
            Self::Minor => "minor",
            Self::Major => "major",
            Self::Prepatch => "prepatch",
            Self::Preminor => "preminor",
            Self::Premajor => "premajor",
            Self::Prerelease => "prerelease",
        }
    }

    #[must_use]
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|k| k.as_str()).collect()
    }
}

impl fmt::Display for BumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BumpKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::InvalidBumpKind {
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PreReleaseChannel {
    Beta,
    Alpha,
    Rc,
    Next,
}

impl PreReleaseChannel {
    pub const ALL: [Self; 4] = [Self::Beta, Self::Alpha, Self::Rc, Self::Next];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Beta => "beta",
            Self::Alpha => "alpha",
            Self::Rc => "rc",
            Self::Next => "next",
        }
    }

    #[must_use]
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|c| c.as_str()).collect()
    }
}

impl fmt::Display for PreReleaseChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PreReleaseChannel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::InvalidChannel {
                value: s.to_string(),
            })
    }
}

/// A releasable workspace member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    pub directory: PathBuf,
    pub manifest_path: PathBuf,
    /// Version string as found in the manifest when the workspace was scanned.
    pub version: Option<String>,
    pub private: bool,
}

impl Package {
    #[must_use]
    pub fn new(name: impl Into<String>, directory: impl Into<PathBuf>) -> Self {
        let directory = directory.into();
        let manifest_path = directory.join(MANIFEST_FILE);
        Self {
            name: name.into(),
            directory,
            manifest_path,
            version: None,
            private: false,
        }
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    #[must_use]
    pub fn with_private(mut self, private: bool) -> Self {
        self.private = private;
        self
    }

    #[must_use]
    pub fn is_located_at(&self, dir: &Path) -> bool {
        self.directory == dir
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{} ({version})", self.name),
            None => f.write_str(&self.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseInfo {
    pub new_version: Version,
    pub previous_version: Option<Version>,
}

impl ReleaseInfo {
    #[must_use]
    pub fn new(new_version: Version) -> Self {
        Self {
            new_version,
            previous_version: None,
        }
    }

    #[must_use]
    pub fn with_previous(mut self, previous: Version) -> Self {
        self.previous_version = Some(previous);
        self
    }
}

/// The outcome of bumping one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRelease {
    pub package: Package,
    pub info: ReleaseInfo,
}

/// The version-bump result computed against the workspace root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalReleaseInfo {
    pub new_version: Version,
    pub previous_version: Option<Version>,
}

impl From<ReleaseInfo> for GlobalReleaseInfo {
    fn from(info: ReleaseInfo) -> Self {
        Self {
            new_version: info.new_version,
            previous_version: info.previous_version,
        }
    }
}

/// A tag ready to be written, with the messages derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTag {
    pub name: String,
    pub message: String,
    pub commit_message: String,
}
