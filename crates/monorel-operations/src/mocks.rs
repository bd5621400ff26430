use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use monorel_core::{BumpKind, Package, PreReleaseChannel, ReleaseInfo, ReleasePlan};
use monorel_git::{CommitInfo, GitError, TagInfo};
use monorel_workspace::{ReleaseConfig, VersionFileConfig, Workspace, WorkspaceKind};
use semver::Version;

use crate::traits::{
    BumpSelection, ChangelogGenerator, ChangelogRequest, ChannelSelection, GitProvider,
    PackageSelection, PromptProvider, Publisher, TagVersionInput, Task, TaskOutcome, TaskRunner,
    VersionBumper, VersionFileWriter, WorkspaceProvider,
};
use crate::{OperationError, Result};

pub const MOCK_ROOT: &str = "/mock/workspace";

/// Packages under `/mock/workspace/packages/<name>`, all at `1.0.0`.
#[must_use]
pub fn mock_packages(names: &[&str]) -> Vec<Package> {
    names
        .iter()
        .map(|name| {
            Package::new(*name, Path::new(MOCK_ROOT).join("packages").join(name))
                .with_version("1.0.0")
        })
        .collect()
}

pub struct MockWorkspaceProvider {
    workspace: Workspace,
}

impl MockWorkspaceProvider {
    #[must_use]
    pub fn new(workspace: Workspace) -> Self {
        Self { workspace }
    }

    #[must_use]
    pub fn with_packages(names: &[&str]) -> Self {
        Self::new(Workspace {
            root: PathBuf::from(MOCK_ROOT),
            kind: WorkspaceKind::Pnpm,
            packages: mock_packages(names),
            config: ReleaseConfig::default(),
        })
    }

    #[must_use]
    pub fn with_config(mut self, config: ReleaseConfig) -> Self {
        self.workspace.config = config;
        self
    }
}

impl WorkspaceProvider for MockWorkspaceProvider {
    fn discover_workspace(&self, _start_path: &Path) -> Result<Workspace> {
        Ok(self.workspace.clone())
    }
}

/// How long a rendezvous waits for the other packages before giving up.
const RENDEZVOUS_TIMEOUT: Duration = Duration::from_secs(5);

/// Succeeds everywhere except for the configured failures.
pub struct MockTaskRunner {
    failures: Vec<(Task, PathBuf, String)>,
    calls: Mutex<Vec<(Task, PathBuf)>>,
    rendezvous: Option<usize>,
    arrivals: Mutex<HashMap<Task, usize>>,
    arrived: Condvar,
    overlapped: Mutex<Vec<Task>>,
}

impl MockTaskRunner {
    #[must_use]
    pub fn new() -> Self {
        Self {
            failures: Vec::new(),
            calls: Mutex::new(Vec::new()),
            rendezvous: None,
            arrivals: Mutex::new(HashMap::new()),
            arrived: Condvar::new(),
            overlapped: Mutex::new(Vec::new()),
        }
    }

    /// Holds every call until `packages` calls of the same task are in
    /// flight. A call that was released this way counts as overlapping;
    /// one that timed out does not.
    #[must_use]
    pub fn with_rendezvous(mut self, packages: usize) -> Self {
        self.rendezvous = Some(packages);
        self
    }

    /// Calls of `task` that ran at the same time as all the others.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn overlapping_calls(&self, task: Task) -> usize {
        self.overlapped
            .lock()
            .expect("lock poisoned")
            .iter()
            .filter(|t| **t == task)
            .count()
    }

    fn wait_for_others(&self, task: Task, packages: usize) {
        let mut arrivals = self.arrivals.lock().expect("lock poisoned");
        *arrivals.entry(task).or_default() += 1;
        self.arrived.notify_all();

        let (_arrivals, timeout) = self
            .arrived
            .wait_timeout_while(arrivals, RENDEZVOUS_TIMEOUT, |arrivals| {
                arrivals.get(&task).copied().unwrap_or_default() < packages
            })
            .expect("lock poisoned");
        if !timeout.timed_out() {
            self.overlapped.lock().expect("lock poisoned").push(task);
        }
    }

    /// Makes `task` fail with `output` in the directory ending in `dir`.
    #[must_use]
    pub fn with_failure(mut self, task: Task, dir: &str, output: &str) -> Self {
        self.failures
            .push((task, PathBuf::from(dir), output.to_string()));
        self
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn calls(&self, task: Task) -> Vec<PathBuf> {
        self.calls
            .lock()
            .expect("lock poisoned")
            .iter()
            .filter(|(t, _)| *t == task)
            .map(|(_, dir)| dir.clone())
            .collect()
    }
}

impl Default for MockTaskRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskRunner for MockTaskRunner {
    fn run(&self, task: Task, _command: &[String], package_dir: &Path) -> Result<TaskOutcome> {
        self.calls
            .lock()
            .expect("lock poisoned")
            .push((task, package_dir.to_path_buf()));
        if let Some(packages) = self.rendezvous {
            self.wait_for_others(task, packages);
        }

        let failure = self
            .failures
            .iter()
            .find(|(t, dir, _)| *t == task && package_dir.ends_with(dir));
        Ok(match failure {
            Some((_, _, output)) => TaskOutcome::failure(output.clone()),
            None => TaskOutcome::success(String::new()),
        })
    }
}

impl TaskRunner for Arc<MockTaskRunner> {
    fn run(&self, task: Task, command: &[String], package_dir: &Path) -> Result<TaskOutcome> {
        (**self).run(task, command, package_dir)
    }
}

/// Keeps versions in memory, starting every directory at `1.0.0`.
pub struct MockVersionBumper {
    versions: Mutex<HashMap<PathBuf, Version>>,
    failing_dir: Option<PathBuf>,
    bumped: Mutex<Vec<PathBuf>>,
}

impl MockVersionBumper {
    #[must_use]
    pub fn new() -> Self {
        Self {
            versions: Mutex::new(HashMap::new()),
            failing_dir: None,
            bumped: Mutex::new(Vec::new()),
        }
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_version(self, dir: impl Into<PathBuf>, version: Version) -> Self {
        self.versions
            .lock()
            .expect("lock poisoned")
            .insert(dir.into(), version);
        self
    }

    /// Bumping the directory ending in `dir` fails.
    #[must_use]
    pub fn with_failure(mut self, dir: &str) -> Self {
        self.failing_dir = Some(PathBuf::from(dir));
        self
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn bumped(&self) -> Vec<PathBuf> {
        self.bumped.lock().expect("lock poisoned").clone()
    }
}

impl Default for MockVersionBumper {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionBumper for MockVersionBumper {
    fn bump(
        &self,
        dir: &Path,
        kind: BumpKind,
        channel: Option<PreReleaseChannel>,
    ) -> Result<ReleaseInfo> {
        if self
            .failing_dir
            .as_ref()
            .is_some_and(|failing| dir.ends_with(failing))
        {
            return Err(OperationError::Manifest(
                monorel_manifest::ManifestError::MissingField {
                    path: dir.join("package.json"),
                    field: "version",
                },
            ));
        }

        let mut versions = self.versions.lock().expect("lock poisoned");
        let current = versions
            .get(dir)
            .cloned()
            .unwrap_or_else(|| Version::new(1, 0, 0));
        let next = monorel_version::bump_version(&current, kind, channel)?;
        versions.insert(dir.to_path_buf(), next.clone());
        self.bumped
            .lock()
            .expect("lock poisoned")
            .push(dir.to_path_buf());

        Ok(ReleaseInfo::new(next).with_previous(current))
    }
}

impl VersionBumper for Arc<MockVersionBumper> {
    fn bump(
        &self,
        dir: &Path,
        kind: BumpKind,
        channel: Option<PreReleaseChannel>,
    ) -> Result<ReleaseInfo> {
        (**self).bump(dir, kind, channel)
    }
}

pub struct MockVersionFileWriter {
    written: Mutex<Vec<(PathBuf, Version)>>,
}

impl MockVersionFileWriter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            written: Mutex::new(Vec::new()),
        }
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn written(&self) -> Vec<(PathBuf, Version)> {
        self.written.lock().expect("lock poisoned").clone()
    }
}

impl Default for MockVersionFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionFileWriter for MockVersionFileWriter {
    fn write(
        &self,
        package_dir: &Path,
        version: &Version,
        config: &VersionFileConfig,
    ) -> Result<Option<PathBuf>> {
        let target = self.target(package_dir, config);
        self.written
            .lock()
            .expect("lock poisoned")
            .push((package_dir.to_path_buf(), version.clone()));
        Ok(Some(target))
    }
}

impl VersionFileWriter for Arc<MockVersionFileWriter> {
    fn write(
        &self,
        package_dir: &Path,
        version: &Version,
        config: &VersionFileConfig,
    ) -> Result<Option<PathBuf>> {
        (**self).write(package_dir, version, config)
    }
}

/// A changelog request as seen by [`MockChangelogGenerator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedChangelog {
    pub package: String,
    pub version: Version,
    pub tag: String,
    pub path: PathBuf,
}

pub struct MockChangelogGenerator {
    failing_package: Option<String>,
    generated: Mutex<Vec<RecordedChangelog>>,
}

impl MockChangelogGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self {
            failing_package: None,
            generated: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn with_failure(mut self, package: &str) -> Self {
        self.failing_package = Some(package.to_string());
        self
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn generated(&self) -> Vec<RecordedChangelog> {
        self.generated.lock().expect("lock poisoned").clone()
    }
}

impl Default for MockChangelogGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangelogGenerator for MockChangelogGenerator {
    fn generate(&self, request: &ChangelogRequest<'_>) -> Result<PathBuf> {
        if self.failing_package.as_deref() == Some(request.package.name.as_str()) {
            return Err(OperationError::Changelog(
                monorel_changelog::ChangelogError::Write {
                    path: request.changelog_path.to_path_buf(),
                    source: std::io::Error::other("disk full"),
                },
            ));
        }

        self.generated
            .lock()
            .expect("lock poisoned")
            .push(RecordedChangelog {
                package: request.package.name.clone(),
                version: request.release.new_version.clone(),
                tag: request.tag.to_string(),
                path: request.changelog_path.to_path_buf(),
            });
        Ok(request.changelog_path.to_path_buf())
    }
}

impl ChangelogGenerator for Arc<MockChangelogGenerator> {
    fn generate(&self, request: &ChangelogRequest<'_>) -> Result<PathBuf> {
        (**self).generate(request)
    }
}

pub struct MockGitProvider {
    clean: bool,
    fail_push: bool,
    fail_commit: bool,
    tags_created: Mutex<Vec<(String, String)>>,
    tags_deleted: Mutex<Vec<String>>,
    tags_pushed: Mutex<Vec<(String, String)>>,
    stage_count: Mutex<usize>,
    commits: Mutex<Vec<String>>,
}

impl MockGitProvider {
    #[must_use]
    pub fn new() -> Self {
        Self {
            clean: true,
            fail_push: false,
            fail_commit: false,
            tags_created: Mutex::new(Vec::new()),
            tags_deleted: Mutex::new(Vec::new()),
            tags_pushed: Mutex::new(Vec::new()),
            stage_count: Mutex::new(0),
            commits: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn dirty(mut self) -> Self {
        self.clean = false;
        self
    }

    #[must_use]
    pub fn with_push_failure(mut self) -> Self {
        self.fail_push = true;
        self
    }

    #[must_use]
    pub fn with_commit_failure(mut self) -> Self {
        self.fail_commit = true;
        self
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn tags_created(&self) -> Vec<(String, String)> {
        self.tags_created.lock().expect("lock poisoned").clone()
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn tags_deleted(&self) -> Vec<String> {
        self.tags_deleted.lock().expect("lock poisoned").clone()
    }

    /// `(remote, tag)` pairs.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn tags_pushed(&self) -> Vec<(String, String)> {
        self.tags_pushed.lock().expect("lock poisoned").clone()
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        *self.stage_count.lock().expect("lock poisoned")
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn commits(&self) -> Vec<String> {
        self.commits.lock().expect("lock poisoned").clone()
    }
}

impl Default for MockGitProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl GitProvider for MockGitProvider {
    fn is_working_tree_clean(&self, _project_root: &Path) -> Result<bool> {
        Ok(self.clean)
    }

    fn create_tag(&self, _project_root: &Path, tag_name: &str, message: &str) -> Result<TagInfo> {
        self.tags_created
            .lock()
            .expect("lock poisoned")
            .push((tag_name.to_string(), message.to_string()));
        Ok(TagInfo {
            name: tag_name.to_string(),
            target_sha: "abc123def456".to_string(),
        })
    }

    fn delete_tag(&self, _project_root: &Path, tag_name: &str) -> Result<()> {
        self.tags_deleted
            .lock()
            .expect("lock poisoned")
            .push(tag_name.to_string());
        Ok(())
    }

    fn push_tag(&self, _project_root: &Path, remote: &str, tag_name: &str) -> Result<()> {
        if self.fail_push {
            return Err(GitError::PushFailed {
                remote: remote.to_string(),
                tag: tag_name.to_string(),
                output: "remote: permission denied".to_string(),
            }
            .into());
        }
        self.tags_pushed
            .lock()
            .expect("lock poisoned")
            .push((remote.to_string(), tag_name.to_string()));
        Ok(())
    }

    fn stage_all(&self, _project_root: &Path) -> Result<()> {
        *self.stage_count.lock().expect("lock poisoned") += 1;
        Ok(())
    }

    fn commit(&self, _project_root: &Path, message: &str) -> Result<CommitInfo> {
        if self.fail_commit {
            return Err(GitError::RefNotFound {
                refspec: "HEAD".to_string(),
            }
            .into());
        }
        self.commits
            .lock()
            .expect("lock poisoned")
            .push(message.to_string());
        Ok(CommitInfo {
            sha: "abc123def456".to_string(),
            message: message.to_string(),
        })
    }
}

impl GitProvider for Arc<MockGitProvider> {
    fn is_working_tree_clean(&self, project_root: &Path) -> Result<bool> {
        (**self).is_working_tree_clean(project_root)
    }

    fn create_tag(&self, project_root: &Path, tag_name: &str, message: &str) -> Result<TagInfo> {
        (**self).create_tag(project_root, tag_name, message)
    }

    fn delete_tag(&self, project_root: &Path, tag_name: &str) -> Result<()> {
        (**self).delete_tag(project_root, tag_name)
    }

    fn push_tag(&self, project_root: &Path, remote: &str, tag_name: &str) -> Result<()> {
        (**self).push_tag(project_root, remote, tag_name)
    }

    fn stage_all(&self, project_root: &Path) -> Result<()> {
        (**self).stage_all(project_root)
    }

    fn commit(&self, project_root: &Path, message: &str) -> Result<CommitInfo> {
        (**self).commit(project_root, message)
    }
}

pub struct MockPublisher {
    fail: bool,
    published: Mutex<Vec<Option<PreReleaseChannel>>>,
}

impl MockPublisher {
    #[must_use]
    pub fn new() -> Self {
        Self {
            fail: false,
            published: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    /// Distribution tags of every publish attempt.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn published(&self) -> Vec<Option<PreReleaseChannel>> {
        self.published.lock().expect("lock poisoned").clone()
    }
}

impl Default for MockPublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl Publisher for MockPublisher {
    fn publish(
        &self,
        _workspace_root: &Path,
        command: &[String],
        dist_tag: Option<PreReleaseChannel>,
    ) -> Result<()> {
        self.published
            .lock()
            .expect("lock poisoned")
            .push(dist_tag);
        if self.fail {
            return Err(OperationError::PublishFailed {
                command: command.join(" "),
                output: "npm ERR! 403 Forbidden".to_string(),
            });
        }
        Ok(())
    }
}

impl Publisher for Arc<MockPublisher> {
    fn publish(
        &self,
        workspace_root: &Path,
        command: &[String],
        dist_tag: Option<PreReleaseChannel>,
    ) -> Result<()> {
        (**self).publish(workspace_root, command, dist_tag)
    }
}

/// Replays fixed answers and counts how often each question was asked.
/// Unset answers behave like a cancelled prompt.
pub struct ScriptedPrompts {
    interactive: bool,
    selection: Option<Vec<String>>,
    bump: Option<BumpKind>,
    channel: Option<PreReleaseChannel>,
    tag_version: Option<String>,
    confirm: bool,
    package_prompts: Mutex<usize>,
    bump_prompts: Mutex<usize>,
    channel_prompts: Mutex<usize>,
    tag_defaults: Mutex<Vec<Version>>,
    confirmations: Mutex<usize>,
}

impl ScriptedPrompts {
    #[must_use]
    pub fn new() -> Self {
        Self {
            interactive: true,
            selection: None,
            bump: None,
            channel: None,
            tag_version: None,
            confirm: true,
            package_prompts: Mutex::new(0),
            bump_prompts: Mutex::new(0),
            channel_prompts: Mutex::new(0),
            tag_defaults: Mutex::new(Vec::new()),
            confirmations: Mutex::new(0),
        }
    }

    #[must_use]
    pub fn non_interactive(mut self) -> Self {
        self.interactive = false;
        self
    }

    #[must_use]
    pub fn with_selection(mut self, names: &[&str]) -> Self {
        self.selection = Some(names.iter().map(ToString::to_string).collect());
        self
    }

    #[must_use]
    pub fn with_bump(mut self, kind: BumpKind) -> Self {
        self.bump = Some(kind);
        self
    }

    #[must_use]
    pub fn with_channel(mut self, channel: PreReleaseChannel) -> Self {
        self.channel = Some(channel);
        self
    }

    #[must_use]
    pub fn with_tag_version(mut self, version: &str) -> Self {
        self.tag_version = Some(version.to_string());
        self
    }

    #[must_use]
    pub fn declining(mut self) -> Self {
        self.confirm = false;
        self
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn package_prompts(&self) -> usize {
        *self.package_prompts.lock().expect("lock poisoned")
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn bump_prompts(&self) -> usize {
        *self.bump_prompts.lock().expect("lock poisoned")
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn channel_prompts(&self) -> usize {
        *self.channel_prompts.lock().expect("lock poisoned")
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn tag_prompts(&self) -> usize {
        self.tag_defaults.lock().expect("lock poisoned").len()
    }

    /// Default offered by each tag prompt.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn tag_defaults(&self) -> Vec<Version> {
        self.tag_defaults.lock().expect("lock poisoned").clone()
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn confirmations(&self) -> usize {
        *self.confirmations.lock().expect("lock poisoned")
    }
}

impl Default for ScriptedPrompts {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptProvider for ScriptedPrompts {
    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn select_packages(&self, available: &[Package]) -> Result<PackageSelection> {
        *self.package_prompts.lock().expect("lock poisoned") += 1;
        Ok(match &self.selection {
            Some(names) => PackageSelection::Selected(
                available
                    .iter()
                    .filter(|p| names.contains(&p.name))
                    .cloned()
                    .collect(),
            ),
            None => PackageSelection::Cancelled,
        })
    }

    fn select_bump_kind(&self) -> Result<BumpSelection> {
        *self.bump_prompts.lock().expect("lock poisoned") += 1;
        Ok(self
            .bump
            .map_or(BumpSelection::Cancelled, BumpSelection::Selected))
    }

    fn select_channel(&self) -> Result<ChannelSelection> {
        *self.channel_prompts.lock().expect("lock poisoned") += 1;
        Ok(self
            .channel
            .map_or(ChannelSelection::Cancelled, ChannelSelection::Selected))
    }

    fn input_tag_version(&self, default: &Version) -> Result<TagVersionInput> {
        self.tag_defaults
            .lock()
            .expect("lock poisoned")
            .push(default.clone());
        Ok(self
            .tag_version
            .clone()
            .map_or(TagVersionInput::Cancelled, TagVersionInput::Provided))
    }

    fn confirm_release(&self, _plan: &ReleasePlan) -> Result<bool> {
        *self.confirmations.lock().expect("lock poisoned") += 1;
        Ok(self.confirm)
    }
}

impl PromptProvider for Arc<ScriptedPrompts> {
    fn is_interactive(&self) -> bool {
        (**self).is_interactive()
    }

    fn select_packages(&self, available: &[Package]) -> Result<PackageSelection> {
        (**self).select_packages(available)
    }

    fn select_bump_kind(&self) -> Result<BumpSelection> {
        (**self).select_bump_kind()
    }

    fn select_channel(&self) -> Result<ChannelSelection> {
        (**self).select_channel()
    }

    fn input_tag_version(&self, default: &Version) -> Result<TagVersionInput> {
        (**self).input_tag_version(default)
    }

    fn confirm_release(&self, plan: &ReleasePlan) -> Result<bool> {
        (**self).confirm_release(plan)
    }
}
