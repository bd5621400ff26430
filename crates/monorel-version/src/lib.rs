//! Version increments with the same results as `npm version <kind>`.

use monorel_core::{BumpKind, PreReleaseChannel};
use semver::{BuildMetadata, Prerelease, Version};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VersionError {
    #[error("bump kind '{kind}' requires a pre-release channel")]
    MissingChannel { kind: BumpKind },

    #[error("cannot build pre-release identifier '{value}'")]
    InvalidPrerelease {
        value: String,
        #[source]
        source: semver::Error,
    },

    #[error("cannot increment the {component} component of '{version}'")]
    Overflow {
        version: String,
        component: &'static str,
    },
}

/// Compute the version that follows `version` for `kind`.
///
/// Stable kinds ignore `channel`. A stable kind applied to a pre-release of
/// the same release line only drops the pre-release part, so `2.0.0-rc.1`
/// becomes `2.0.0` for `major`. Build metadata is always dropped.
///
/// # Errors
///
/// Returns [`VersionError::MissingChannel`] for a pre-release kind without a
/// channel and [`VersionError::Overflow`] when a component is already at
/// `u64::MAX`.
pub fn bump_version(
    version: &Version,
    kind: BumpKind,
    channel: Option<PreReleaseChannel>,
) -> Result<Version, VersionError> {
    let mut next = version.clone();
    next.build = BuildMetadata::EMPTY;

    match kind {
        BumpKind::Major => {
            let on_line = next.minor == 0 && next.patch == 0 && !next.pre.is_empty();
            if !on_line {
                next.major = increment(version, next.major, "major")?;
                next.minor = 0;
                next.patch = 0;
            }
            next.pre = Prerelease::EMPTY;
        }
        BumpKind::Minor => {
            let on_line = next.patch == 0 && !next.pre.is_empty();
            if !on_line {
                next.minor = increment(version, next.minor, "minor")?;
                next.patch = 0;
            }
            next.pre = Prerelease::EMPTY;
        }
        BumpKind::Patch => {
            if next.pre.is_empty() {
                next.patch = increment(version, next.patch, "patch")?;
            }
            next.pre = Prerelease::EMPTY;
        }
        BumpKind::Premajor => {
            next.major = increment(version, next.major, "major")?;
            next.minor = 0;
            next.patch = 0;
            next.pre = first_prerelease(require_channel(kind, channel)?)?;
        }
        BumpKind::Preminor => {
            next.minor = increment(version, next.minor, "minor")?;
            next.patch = 0;
            next.pre = first_prerelease(require_channel(kind, channel)?)?;
        }
        BumpKind::Prepatch => {
            next.patch = increment(version, next.patch, "patch")?;
            next.pre = first_prerelease(require_channel(kind, channel)?)?;
        }
        BumpKind::Prerelease => {
            let channel = require_channel(kind, channel)?;
            if next.pre.is_empty() {
                next.patch = increment(version, next.patch, "patch")?;
                next.pre = first_prerelease(channel)?;
            } else if next.pre.as_str().split('.').next() == Some(channel.as_str()) {
                next.pre = advance_prerelease(version)?;
            } else {
                next.pre = first_prerelease(channel)?;
            }
        }
    }

    Ok(next)
}

fn increment(version: &Version, value: u64, component: &'static str) -> Result<u64, VersionError> {
    value.checked_add(1).ok_or_else(|| VersionError::Overflow {
        version: version.to_string(),
        component,
    })
}

fn require_channel(
    kind: BumpKind,
    channel: Option<PreReleaseChannel>,
) -> Result<PreReleaseChannel, VersionError> {
    channel.ok_or(VersionError::MissingChannel { kind })
}

fn first_prerelease(channel: PreReleaseChannel) -> Result<Prerelease, VersionError> {
    parse_prerelease(format!("{channel}.0"))
}

/// `beta.1` -> `beta.2`, `beta` -> `beta.0`.
fn advance_prerelease(version: &Version) -> Result<Prerelease, VersionError> {
    let mut parts: Vec<String> = version.pre.as_str().split('.').map(str::to_string).collect();

    match parts.last().and_then(|last| last.parse::<u64>().ok()) {
        Some(number) => {
            let last = parts.len() - 1;
            parts[last] = increment(version, number, "pre-release")?.to_string();
        }
        None => parts.push("0".to_string()),
    }

    parse_prerelease(parts.join("."))
}

fn parse_prerelease(value: String) -> Result<Prerelease, VersionError> {
    Prerelease::new(&value).map_err(|source| VersionError::InvalidPrerelease { value, source })
}
