use monorel_core::{GlobalReleaseInfo, PackageRelease, ReleasePlan, ResolvedTag};
use monorel_git::{CommitInfo, TagInfo};
use monorel_manifest::FileSnapshot;
use std::path::PathBuf;

/// The value threaded through the release stages. Each stage fills in its
/// own fields and leaves the rest untouched.
#[derive(Debug, Clone)]
pub struct ReleaseSagaData {
    pub plan: ReleasePlan,
    pub root_manifest_path: PathBuf,
    pub releases: Vec<PackageRelease>,
    pub global: Option<GlobalReleaseInfo>,
    /// Version files regenerated by the bump stage.
    pub version_files: Vec<PathBuf>,
    /// Pre-bump content of every file the bump stage touched, in touch order.
    pub bump_snapshots: Vec<FileSnapshot>,
    pub tag: Option<ResolvedTag>,
    pub created_tag: Option<TagInfo>,
    pub tag_pushed: bool,
    pub changelogs: Vec<PathBuf>,
    pub changelog_snapshots: Vec<FileSnapshot>,
    pub commit: Option<CommitInfo>,
}

impl ReleaseSagaData {
    #[must_use]
    pub fn new(plan: ReleasePlan, root_manifest_path: PathBuf) -> Self {
        Self {
            plan,
            root_manifest_path,
            releases: Vec::new(),
            global: None,
            version_files: Vec::new(),
            bump_snapshots: Vec::new(),
            tag: None,
            created_tag: None,
            tag_pushed: false,
            changelogs: Vec::new(),
            changelog_snapshots: Vec::new(),
            commit: None,
        }
    }
}
