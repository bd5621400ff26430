use std::path::{Path, PathBuf};

use monorel_core::{Package, ReleaseInfo};

use crate::Result;

/// Everything needed to write one package's changelog section.
#[derive(Debug, Clone, Copy)]
pub struct ChangelogRequest<'a> {
    pub repository_root: &'a Path,
    pub package: &'a Package,
    pub release: &'a ReleaseInfo,
    pub changelog_path: &'a Path,
    /// Name of the tag created for this release.
    pub tag: &'a str,
    pub remote: &'a str,
}

pub trait ChangelogGenerator: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if history cannot be read or the changelog cannot be
    /// written.
    fn generate(&self, request: &ChangelogRequest<'_>) -> Result<PathBuf>;
}
