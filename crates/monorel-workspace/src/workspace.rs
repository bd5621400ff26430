use std::path::{Path, PathBuf};

use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};
use monorel_core::{MANIFEST_FILE, Package};
use tracing::debug;

use crate::config::ReleaseConfig;
use crate::error::WorkspaceError;
use crate::manifest::{PackageManifest, PnpmWorkspace, WorkspacesField};

pub const PNPM_WORKSPACE_FILE: &str = "pnpm-workspace.yaml";

const DEFAULT_PATTERN: &str = "**";
const IGNORED_DIRS: &[&str] = &["node_modules", ".git", "bower_components", "test", "tests"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspaceKind {
    /// Root marked by `pnpm-workspace.yaml`.
    Pnpm,
    /// Root `package.json` declares `workspaces`.
    Workspaces,
    /// No workspace marker; the nearest `package.json` is the root.
    SinglePackage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    pub root: PathBuf,
    pub kind: WorkspaceKind,
    /// Member packages in discovery order. Never contains the root.
    pub packages: Vec<Package>,
    pub config: ReleaseConfig,
}

impl Workspace {
    #[must_use]
    pub fn root_manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    #[must_use]
    pub fn find_package(&self, name: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.name == name)
    }

    #[must_use]
    pub fn package_names(&self) -> Vec<&str> {
        self.packages.iter().map(|p| p.name.as_str()).collect()
    }
}

/// # Errors
///
/// Returns `WorkspaceError` if no root can be found, a manifest cannot be
/// parsed, or the release configuration is invalid.
pub fn discover_workspace(start_dir: &Path) -> Result<Workspace, WorkspaceError> {
    let start_dir = start_dir
        .canonicalize()
        .map_err(|source| WorkspaceError::ManifestRead {
            path: start_dir.to_path_buf(),
            source,
        })?;

    let (root, kind) = find_workspace_root(&start_dir)?;
    debug!(root = %root.display(), ?kind, "found workspace root");

    let root_manifest_path = root.join(MANIFEST_FILE);
    let root_manifest = if root_manifest_path.is_file() {
        Some(read_manifest(&root_manifest_path)?)
    } else {
        None
    };

    let (workspaces, metadata) = match root_manifest {
        Some(manifest) => (manifest.workspaces, manifest.monorel),
        None => (None, None),
    };

    let patterns = member_patterns(&root, kind, workspaces)?;
    let packages = scan_packages(&root, &patterns)?;

    let config = match metadata {
        Some(metadata) => ReleaseConfig::from_metadata(metadata)?,
        None => ReleaseConfig::default(),
    };

    Ok(Workspace {
        root,
        kind,
        packages,
        config,
    })
}

/// # Errors
///
/// Returns `WorkspaceError` if the current directory is unavailable or
/// discovery fails.
pub fn discover_workspace_from_cwd() -> Result<Workspace, WorkspaceError> {
    let cwd = std::env::current_dir()?;
    discover_workspace(&cwd)
}

/// Enumerate member packages below `root`.
///
/// Directories are walked depth-first in file-name order. A directory becomes
/// a package when its root-relative path matches an include pattern, matches
/// no `!`-prefixed exclude pattern, and holds a `package.json`. The root itself
/// is never returned. No matching manifest yields an empty list.
///
/// # Errors
///
/// Returns `WorkspaceError` on an invalid pattern, an unreadable directory, or
/// a member manifest that is malformed or lacks a `name`.
pub fn scan_packages(root: &Path, patterns: &[String]) -> Result<Vec<Package>, WorkspaceError> {
    let (includes, excludes) = compile_patterns(patterns)?;
    let mut packages = Vec::new();
    walk(root, root, &includes, &excludes, &mut packages)?;
    Ok(packages)
}

fn find_workspace_root(start_dir: &Path) -> Result<(PathBuf, WorkspaceKind), WorkspaceError> {
    let mut nearest_package: Option<PathBuf> = None;

    for dir in start_dir.ancestors() {
        if dir.join(PNPM_WORKSPACE_FILE).is_file() {
            return Ok((dir.to_path_buf(), WorkspaceKind::Pnpm));
        }

        let manifest_path = dir.join(MANIFEST_FILE);
        if manifest_path.is_file() {
            let manifest = read_manifest(&manifest_path)?;
            if manifest.workspaces.is_some() {
                return Ok((dir.to_path_buf(), WorkspaceKind::Workspaces));
            }
            if nearest_package.is_none() {
                nearest_package = Some(dir.to_path_buf());
            }
        }
    }

    nearest_package
        .map(|root| (root, WorkspaceKind::SinglePackage))
        .ok_or_else(|| WorkspaceError::NotFound {
            start_dir: start_dir.to_path_buf(),
        })
}

fn member_patterns(
    root: &Path,
    kind: WorkspaceKind,
    workspaces: Option<WorkspacesField>,
) -> Result<Vec<String>, WorkspaceError> {
    let patterns = match kind {
        WorkspaceKind::Pnpm => read_pnpm_workspace(&root.join(PNPM_WORKSPACE_FILE))?.packages,
        WorkspaceKind::Workspaces => workspaces
            .map(WorkspacesField::into_patterns)
            .unwrap_or_default(),
        WorkspaceKind::SinglePackage => Vec::new(),
    };

    if patterns.iter().any(|p| !p.starts_with('!')) {
        Ok(patterns)
    } else {
        let mut with_default = vec![DEFAULT_PATTERN.to_string()];
        with_default.extend(patterns);
        Ok(with_default)
    }
}

fn read_pnpm_workspace(path: &Path) -> Result<PnpmWorkspace, WorkspaceError> {
    let content = std::fs::read_to_string(path).map_err(|source| WorkspaceError::ManifestRead {
        path: path.to_path_buf(),
        source,
    })?;

    if content.trim().is_empty() {
        return Ok(PnpmWorkspace::default());
    }

    serde_yml::from_str(&content).map_err(|source| WorkspaceError::PnpmWorkspaceParse {
        path: path.to_path_buf(),
        source,
    })
}

fn read_manifest(path: &Path) -> Result<PackageManifest, WorkspaceError> {
    let content = std::fs::read_to_string(path).map_err(|source| WorkspaceError::ManifestRead {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| WorkspaceError::ManifestParse {
        path: path.to_path_buf(),
        source,
    })
}

fn compile_patterns(patterns: &[String]) -> Result<(GlobSet, GlobSet), WorkspaceError> {
    let mut includes = GlobSetBuilder::new();
    let mut excludes = GlobSetBuilder::new();

    for pattern in patterns {
        let (negated, body) = match pattern.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, pattern.as_str()),
        };
        let body = normalize_pattern(body);
        let glob = build_glob(&body, pattern)?;
        if negated {
            excludes.add(glob);
        } else {
            includes.add(glob);
        }
    }

    let build = |builder: GlobSetBuilder| {
        builder.build().map_err(|source| WorkspaceError::GlobPattern {
            pattern: patterns.join(", "),
            source,
        })
    };

    Ok((build(includes)?, build(excludes)?))
}

fn normalize_pattern(pattern: &str) -> String {
    let trimmed = pattern.trim();
    let trimmed = trimmed.strip_prefix("./").unwrap_or(trimmed);
    trimmed.trim_end_matches('/').to_string()
}

fn build_glob(body: &str, original: &str) -> Result<Glob, WorkspaceError> {
    GlobBuilder::new(body)
        .literal_separator(true)
        .build()
        .map_err(|source| WorkspaceError::GlobPattern {
            pattern: original.to_string(),
            source,
        })
}

fn walk(
    root: &Path,
    current: &Path,
    includes: &GlobSet,
    excludes: &GlobSet,
    packages: &mut Vec<Package>,
) -> Result<(), WorkspaceError> {
    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(current)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name();
        if name.to_str().is_some_and(|n| IGNORED_DIRS.contains(&n)) {
            continue;
        }
        dirs.push(entry.path());
    }
    dirs.sort();

    for dir in dirs {
        let relative = dir.strip_prefix(root).unwrap_or(&dir);
        let manifest_path = dir.join(MANIFEST_FILE);

        if includes.is_match(relative) && !excludes.is_match(relative) && manifest_path.is_file() {
            packages.push(load_package(&dir, &manifest_path)?);
        }

        walk(root, &dir, includes, excludes, packages)?;
    }

    Ok(())
}

fn load_package(dir: &Path, manifest_path: &Path) -> Result<Package, WorkspaceError> {
    let manifest = read_manifest(manifest_path)?;
    let name = manifest.name.ok_or_else(|| WorkspaceError::MissingField {
        path: manifest_path.to_path_buf(),
        field: "name",
    })?;

    debug!(package = %name, dir = %dir.display(), "discovered package");

    let package = Package::new(name, dir).with_private(manifest.private);
    Ok(match manifest.version {
        Some(version) => package.with_version(version),
        None => package,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn normalize_strips_dot_slash_and_trailing_slash() {
        assert_eq!(normalize_pattern("./packages/*/"), "packages/*");
        assert_eq!(normalize_pattern(" apps/** "), "apps/**");
    }

    #[test]
    fn single_star_does_not_cross_directories() -> Result<(), WorkspaceError> {
        let (includes, excludes) = compile_patterns(&patterns(&["packages/*", "!packages/legacy"]))?;

        assert!(includes.is_match("packages/a"));
        assert!(!includes.is_match("packages/a/nested"));
        assert!(excludes.is_match("packages/legacy"));
        Ok(())
    }

    #[test]
    fn exclude_only_patterns_fall_back_to_default_include() -> Result<(), WorkspaceError> {
        let workspaces = WorkspacesField::Patterns(patterns(&["!examples/*"]));

        let result = member_patterns(Path::new("/repo"), WorkspaceKind::Workspaces, Some(workspaces))?;

        assert_eq!(result, patterns(&["**", "!examples/*"]));
        Ok(())
    }

    #[test]
    fn single_package_scans_everything() -> Result<(), WorkspaceError> {
        let result = member_patterns(Path::new("/repo"), WorkspaceKind::SinglePackage, None)?;

        assert_eq!(result, patterns(&["**"]));
        Ok(())
    }
}
