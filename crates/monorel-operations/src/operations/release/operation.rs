use std::path::{Path, PathBuf};
use std::sync::Arc;

use monorel_core::{GlobalReleaseInfo, PackageRelease, PreReleaseChannel, ReleasePlan, ResolvedTag};
use monorel_git::CommitInfo;
use monorel_saga::{SagaAuditLog, SagaBuilder};
use monorel_workspace::Workspace;
use tracing::{error, info};

use super::context::ReleaseSagaContext;
use super::saga_data::ReleaseSagaData;
use super::saga_steps::{
    BuildStep, BumpVersionsStep, CommitStep, CreateTagStep, RunTestsStep, WriteChangelogsStep,
};
use crate::OperationError;
use crate::operations::plan::PlanBuilder;
use crate::traits::{
    ChangelogGenerator, GitProvider, PromptProvider, Publisher, TaskRunner, VersionBumper,
    VersionFileWriter, WorkspaceProvider,
};

/// What happened to the publish stage. A failed publish does not fail the
/// release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishStatus {
    Published {
        dist_tag: Option<PreReleaseChannel>,
    },
    Failed {
        error: String,
        output: Option<String>,
    },
}

impl PublishStatus {
    #[must_use]
    pub fn is_published(&self) -> bool {
        matches!(self, Self::Published { .. })
    }
}

#[derive(Debug, Clone)]
pub struct ReleaseOutcome {
    pub workspace_root: PathBuf,
    pub plan: ReleasePlan,
    pub releases: Vec<PackageRelease>,
    pub global: GlobalReleaseInfo,
    pub tag: ResolvedTag,
    pub version_files: Vec<PathBuf>,
    pub changelogs: Vec<PathBuf>,
    pub commit: CommitInfo,
    pub publish: PublishStatus,
    pub audit: SagaAuditLog,
}

/// A release that stopped before publishing.
#[derive(Debug)]
pub struct ReleaseFailure {
    pub error: OperationError,
    /// Stage log, present once stages started running.
    pub audit: Option<SagaAuditLog>,
}

impl From<OperationError> for ReleaseFailure {
    fn from(error: OperationError) -> Self {
        Self { error, audit: None }
    }
}

pub struct ReleaseOperation<W, T, V, F, C, G, Q, P> {
    workspace_provider: W,
    task_runner: Arc<T>,
    version_bumper: Arc<V>,
    version_file_writer: Arc<F>,
    changelog_generator: Arc<C>,
    git_provider: Arc<G>,
    prompts: Arc<Q>,
    publisher: P,
}

impl<W, T, V, F, C, G, Q, P> ReleaseOperation<W, T, V, F, C, G, Q, P>
where
    W: WorkspaceProvider,
    T: TaskRunner + 'static,
    V: VersionBumper + 'static,
    F: VersionFileWriter + 'static,
    C: ChangelogGenerator + 'static,
    G: GitProvider + 'static,
    Q: PromptProvider + 'static,
    P: Publisher,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        workspace_provider: W,
        task_runner: T,
        version_bumper: V,
        version_file_writer: F,
        changelog_generator: C,
        git_provider: G,
        prompts: Q,
        publisher: P,
    ) -> Self {
        Self {
            workspace_provider,
            task_runner: Arc::new(task_runner),
            version_bumper: Arc::new(version_bumper),
            version_file_writer: Arc::new(version_file_writer),
            changelog_generator: Arc::new(changelog_generator),
            git_provider: Arc::new(git_provider),
            prompts: Arc::new(prompts),
            publisher,
        }
    }

    /// Discovers the workspace at `start_path`, builds the plan from the
    /// prompt answers and runs every stage.
    ///
    /// # Errors
    ///
    /// Returns a [`ReleaseFailure`] for input errors (before anything is
    /// touched) and for any failing stage up to and including the commit.
    /// A failing publish is reported in [`ReleaseOutcome::publish`] instead.
    pub fn execute(&self, start_path: &Path) -> Result<ReleaseOutcome, ReleaseFailure> {
        let workspace = self.workspace_provider.discover_workspace(start_path)?;
        info!(root = %workspace.root.display(), packages = workspace.packages.len(), "discovered workspace");

        let plan = self.prepare(&workspace)?;

        let ctx = ReleaseSagaContext::new(
            workspace.root.clone(),
            workspace.config.clone(),
            Arc::clone(&self.task_runner),
            Arc::clone(&self.version_bumper),
            Arc::clone(&self.version_file_writer),
            Arc::clone(&self.changelog_generator),
            Arc::clone(&self.git_provider),
            Arc::clone(&self.prompts),
        );

        let saga = SagaBuilder::<_, ReleaseSagaData, OperationError>::new()
            .step(RunTestsStep)
            .step(BuildStep)
            .step(BumpVersionsStep)
            .step(CreateTagStep)
            .step(WriteChangelogsStep)
            .step(CommitStep)
            .build();

        let input = ReleaseSagaData::new(plan, workspace.root_manifest_path());
        let (result, audit) = saga.execute_with_audit(&ctx, input);
        let data = match result {
            Ok(data) => data,
            Err(err) => {
                return Err(ReleaseFailure {
                    error: err.into(),
                    audit: Some(audit),
                });
            }
        };

        let publish = self.publish(&workspace, data.plan.channel());

        Self::into_outcome(workspace.root, data, publish, audit)
    }

    /// Input checks and plan building. Nothing is mutated here.
    fn prepare(&self, workspace: &Workspace) -> Result<ReleasePlan, OperationError> {
        if workspace.packages.is_empty() {
            return Err(OperationError::NoPackages(workspace.root.clone()));
        }

        if workspace.config.require_clean_tree()
            && !self.git_provider.is_working_tree_clean(&workspace.root)?
        {
            return Err(OperationError::DirtyWorkingTree);
        }

        let plan = PlanBuilder::new(self.prompts.as_ref()).build(&workspace.packages)?;

        if self.prompts.is_interactive() && !self.prompts.confirm_release(&plan)? {
            return Err(OperationError::Cancelled);
        }

        Ok(plan)
    }

    fn publish(&self, workspace: &Workspace, channel: Option<PreReleaseChannel>) -> PublishStatus {
        match self
            .publisher
            .publish(&workspace.root, workspace.config.publish_command(), channel)
        {
            Ok(()) => {
                info!(dist_tag = ?channel, "published");
                PublishStatus::Published { dist_tag: channel }
            }
            Err(err) => {
                error!(error = %err, "publish failed; the release itself is complete");
                PublishStatus::Failed {
                    error: err.to_string(),
                    output: err.captured_output().map(str::to_string),
                }
            }
        }
    }

    fn into_outcome(
        workspace_root: PathBuf,
        data: ReleaseSagaData,
        publish: PublishStatus,
        audit: SagaAuditLog,
    ) -> Result<ReleaseOutcome, ReleaseFailure> {
        let missing = |stage| ReleaseFailure {
            error: OperationError::MissingStageOutput { stage },
            audit: Some(audit.clone()),
        };

        let global = data.global.ok_or_else(|| missing("bump_versions"))?;
        let tag = data.tag.ok_or_else(|| missing("create_tag"))?;
        let commit = data.commit.ok_or_else(|| missing("commit"))?;

        Ok(ReleaseOutcome {
            workspace_root,
            plan: data.plan,
            releases: data.releases,
            global,
            tag,
            version_files: data.version_files,
            changelogs: data.changelogs,
            commit,
            publish,
            audit,
        })
    }
}

#[cfg(test)]
mod tests {
    use monorel_core::BumpKind;
    use monorel_saga::StepStatus;
    use monorel_workspace::ReleaseConfig;
    use semver::Version;

    use super::*;
    use crate::mocks::{
        MOCK_ROOT, MockChangelogGenerator, MockGitProvider, MockPublisher, MockTaskRunner,
        MockVersionBumper, MockVersionFileWriter, MockWorkspaceProvider, ScriptedPrompts,
    };
    use crate::traits::Task;

    struct Harness {
        workspace: MockWorkspaceProvider,
        tasks: Arc<MockTaskRunner>,
        bumper: Arc<MockVersionBumper>,
        version_files: Arc<MockVersionFileWriter>,
        changelogs: Arc<MockChangelogGenerator>,
        git: Arc<MockGitProvider>,
        prompts: Arc<ScriptedPrompts>,
        publisher: Arc<MockPublisher>,
    }

    impl Harness {
        fn new(packages: &[&str], prompts: ScriptedPrompts) -> Self {
            Self {
                workspace: MockWorkspaceProvider::with_packages(packages),
                tasks: Arc::new(MockTaskRunner::new()),
                bumper: Arc::new(MockVersionBumper::new()),
                version_files: Arc::new(MockVersionFileWriter::new()),
                changelogs: Arc::new(MockChangelogGenerator::new()),
                git: Arc::new(MockGitProvider::new()),
                prompts: Arc::new(prompts),
                publisher: Arc::new(MockPublisher::new()),
            }
        }

        fn with_config(mut self, config: ReleaseConfig) -> Self {
            self.workspace = self.workspace.with_config(config);
            self
        }

        fn with_tasks(mut self, tasks: MockTaskRunner) -> Self {
            self.tasks = Arc::new(tasks);
            self
        }

        fn with_bumper(mut self, bumper: MockVersionBumper) -> Self {
            self.bumper = Arc::new(bumper);
            self
        }

        fn with_changelogs(mut self, changelogs: MockChangelogGenerator) -> Self {
            self.changelogs = Arc::new(changelogs);
            self
        }

        fn with_git(mut self, git: MockGitProvider) -> Self {
            self.git = Arc::new(git);
            self
        }

        fn with_publisher(mut self, publisher: MockPublisher) -> Self {
            self.publisher = Arc::new(publisher);
            self
        }

        fn run(mut self) -> (Result<ReleaseOutcome, ReleaseFailure>, Self) {
            let workspace =
                std::mem::replace(&mut self.workspace, MockWorkspaceProvider::with_packages(&[]));
            let operation = ReleaseOperation::new(
                workspace,
                Arc::clone(&self.tasks),
                Arc::clone(&self.bumper),
                Arc::clone(&self.version_files),
                Arc::clone(&self.changelogs),
                Arc::clone(&self.git),
                Arc::clone(&self.prompts),
                Arc::clone(&self.publisher),
            );
            let result = operation.execute(Path::new(MOCK_ROOT));
            (result, self)
        }
    }

    fn status_of(audit: &SagaAuditLog, step: &str) -> Option<StepStatus> {
        audit
            .records()
            .iter()
            .find(|r| r.name == step)
            .map(|r| r.status)
    }

    fn failure(result: Result<ReleaseOutcome, ReleaseFailure>) -> ReleaseFailure {
        match result {
            Ok(outcome) => panic!("release should fail, got {outcome:?}"),
            Err(failure) => failure,
        }
    }

    #[test]
    fn single_package_patch_release() -> anyhow::Result<()> {
        let prompts = ScriptedPrompts::new()
            .with_selection(&["a"])
            .with_bump(BumpKind::Patch);

        let (result, h) = Harness::new(&["a", "b"], prompts).run();
        let outcome = result.map_err(|f| f.error)?;

        assert_eq!(outcome.plan.channel(), None);
        assert_eq!(outcome.releases.len(), 1);
        assert_eq!(outcome.releases[0].info.new_version, Version::new(1, 0, 1));
        assert_eq!(outcome.tag.name, "a@1.0.1");
        assert_eq!(h.git.commits(), vec!["release: va@1.0.1".to_string()]);
        assert_eq!(
            h.git.tags_created(),
            vec![("a@1.0.1".to_string(), "release: a@1.0.1".to_string())]
        );
        assert_eq!(
            h.git.tags_pushed(),
            vec![("origin".to_string(), "a@1.0.1".to_string())]
        );
        assert_eq!(h.prompts.tag_prompts(), 0);
        assert_eq!(h.changelogs.generated().len(), 1);
        assert_eq!(h.publisher.published(), vec![None]);
        assert!(outcome.publish.is_published());
        Ok(())
    }

    #[test]
    fn full_workspace_prerelease_uses_global_version() -> anyhow::Result<()> {
        let prompts = ScriptedPrompts::new()
            .with_selection(&["a", "b"])
            .with_bump(BumpKind::Prerelease)
            .with_channel(PreReleaseChannel::Beta);

        let (result, h) = Harness::new(&["a", "b"], prompts).run();
        let outcome = result.map_err(|f| f.error)?;

        let global = Version::parse("1.0.1-beta.0")?;
        assert_eq!(outcome.global.new_version, global);
        assert_eq!(outcome.tag.name, "1.0.1-beta.0");
        assert_eq!(h.git.commits(), vec!["release: v1.0.1-beta.0".to_string()]);
        assert_eq!(h.prompts.tag_prompts(), 0);
        assert_eq!(h.publisher.published(), vec![Some(PreReleaseChannel::Beta)]);

        let bumped = h.bumper.bumped();
        assert_eq!(bumped.len(), 3);
        assert_eq!(bumped.last().map(PathBuf::as_path), Some(Path::new(MOCK_ROOT)));
        Ok(())
    }

    #[test]
    fn subset_release_prompts_for_tag() -> anyhow::Result<()> {
        let prompts = ScriptedPrompts::new()
            .with_selection(&["a", "c"])
            .with_bump(BumpKind::Minor)
            .with_tag_version("3.0.0");

        let (result, h) = Harness::new(&["a", "b", "c"], prompts).run();
        let outcome = result.map_err(|f| f.error)?;

        assert_eq!(outcome.tag.name, "3.0.0");
        assert_eq!(h.prompts.tag_defaults(), vec![Version::new(1, 1, 0)]);
        let tags: Vec<_> = h.changelogs.generated().into_iter().map(|c| c.tag).collect();
        assert_eq!(tags, ["3.0.0", "3.0.0"]);
        Ok(())
    }

    #[test]
    fn build_failure_stops_before_bump() {
        let prompts = ScriptedPrompts::new()
            .with_selection(&["a", "b"])
            .with_bump(BumpKind::Patch);
        let tasks = MockTaskRunner::new().with_failure(Task::Build, "packages/b", "tsc: error TS2304");

        let (result, h) = Harness::new(&["a", "b"], prompts).with_tasks(tasks).run();
        let failure = failure(result);

        assert!(matches!(failure.error, OperationError::SagaFailed { ref step, .. } if step == "build"));
        assert_eq!(failure.error.captured_output(), Some("tsc: error TS2304"));
        assert!(h.bumper.bumped().is_empty());
        assert!(h.git.tags_created().is_empty());
        assert!(h.publisher.published().is_empty());
        assert_eq!(h.tasks.calls(Task::Build).len(), 2);

        let audit = failure.audit.expect("stages ran");
        assert_eq!(status_of(&audit, "run_tests"), Some(StepStatus::Executed));
        assert_eq!(status_of(&audit, "build"), Some(StepStatus::Failed));
        assert_eq!(status_of(&audit, "bump_versions"), None);
    }

    #[test]
    fn packages_run_each_task_at_the_same_time() -> anyhow::Result<()> {
        let prompts = ScriptedPrompts::new()
            .with_selection(&["a", "b", "c"])
            .with_bump(BumpKind::Patch);
        let tasks = MockTaskRunner::new().with_rendezvous(3);
        let harness = Harness::new(&["a", "b", "c"], prompts).with_tasks(tasks);

        let pool = rayon::ThreadPoolBuilder::new().num_threads(3).build()?;
        let (result, h) = pool.install(|| harness.run());
        result.map_err(|f| f.error)?;

        assert_eq!(h.tasks.overlapping_calls(Task::Test), 3);
        assert_eq!(h.tasks.overlapping_calls(Task::Build), 3);
        Ok(())
    }

    #[test]
    fn every_failing_package_is_named() {
        let prompts = ScriptedPrompts::new()
            .with_selection(&["a", "b", "c"])
            .with_bump(BumpKind::Patch);
        let tasks = MockTaskRunner::new()
            .with_failure(Task::Test, "packages/a", "1 failing")
            .with_failure(Task::Test, "packages/c", "2 failing");

        let (result, _h) = Harness::new(&["a", "b", "c"], prompts).with_tasks(tasks).run();
        let failure = failure(result);

        let OperationError::SagaFailed { source, .. } = failure.error else {
            panic!("expected SagaFailed");
        };
        let OperationError::TaskFailed {
            package, others, ..
        } = *source
        else {
            panic!("expected TaskFailed");
        };
        assert_eq!(package, "a");
        assert_eq!(others, vec!["c".to_string()]);
    }

    #[test]
    fn non_interactive_release_skips_tests_and_confirmation() -> anyhow::Result<()> {
        let prompts = ScriptedPrompts::new()
            .non_interactive()
            .with_selection(&["a", "b"])
            .with_bump(BumpKind::Major);

        let (result, h) = Harness::new(&["a", "b"], prompts).run();
        let outcome = result.map_err(|f| f.error)?;

        assert!(h.tasks.calls(Task::Test).is_empty());
        assert_eq!(h.tasks.calls(Task::Build).len(), 2);
        assert_eq!(h.prompts.confirmations(), 0);
        assert_eq!(
            status_of(&outcome.audit, "run_tests"),
            Some(StepStatus::Skipped)
        );
        Ok(())
    }

    #[test]
    fn declined_confirmation_touches_nothing() {
        let prompts = ScriptedPrompts::new()
            .with_bump(BumpKind::Patch)
            .declining();

        let (result, h) = Harness::new(&["a"], prompts).run();
        let failure = failure(result);

        assert!(matches!(failure.error, OperationError::Cancelled));
        assert!(failure.audit.is_none());
        assert!(h.tasks.calls(Task::Test).is_empty());
        assert!(h.bumper.bumped().is_empty());
    }

    #[test]
    fn empty_workspace_is_an_input_error() {
        let (result, h) = Harness::new(&[], ScriptedPrompts::new()).run();
        let failure = failure(result);

        assert!(matches!(failure.error, OperationError::NoPackages(_)));
        assert!(failure.error.is_input_error());
        assert_eq!(h.prompts.bump_prompts(), 0);
    }

    #[test]
    fn dirty_tree_is_rejected_when_configured() {
        let prompts = ScriptedPrompts::new().with_bump(BumpKind::Patch);

        let (result, h) = Harness::new(&["a"], prompts)
            .with_config(ReleaseConfig::default().with_require_clean_tree(true))
            .with_git(MockGitProvider::new().dirty())
            .run();

        assert!(matches!(
            failure(result).error,
            OperationError::DirtyWorkingTree
        ));
        assert_eq!(h.prompts.bump_prompts(), 0);
    }

    #[test]
    fn dirty_tree_is_allowed_by_default() {
        let prompts = ScriptedPrompts::new().with_bump(BumpKind::Patch);

        let (result, _h) = Harness::new(&["a"], prompts)
            .with_git(MockGitProvider::new().dirty())
            .run();

        assert!(result.is_ok());
    }

    #[test]
    fn commit_failure_deletes_the_tag() {
        let prompts = ScriptedPrompts::new().with_bump(BumpKind::Patch);

        let (result, h) = Harness::new(&["a"], prompts)
            .with_git(MockGitProvider::new().with_commit_failure())
            .run();
        let failure = failure(result);

        assert_eq!(h.git.tags_deleted(), vec!["a@1.0.1".to_string()]);
        let audit = failure.audit.expect("stages ran");
        assert!(audit.was_compensated());
        assert_eq!(
            status_of(&audit, "create_tag"),
            Some(StepStatus::Compensated)
        );
        assert_eq!(
            status_of(&audit, "bump_versions"),
            Some(StepStatus::Compensated)
        );
        assert!(h.publisher.published().is_empty());
    }

    #[test]
    fn push_failure_removes_local_tag() {
        let prompts = ScriptedPrompts::new().with_bump(BumpKind::Patch);

        let (result, h) = Harness::new(&["a"], prompts)
            .with_git(MockGitProvider::new().with_push_failure())
            .run();
        let failure = failure(result);

        assert!(matches!(failure.error, OperationError::SagaFailed { ref step, .. } if step == "create_tag"));
        assert_eq!(
            failure.error.captured_output(),
            Some("remote: permission denied")
        );
        assert_eq!(h.git.tags_deleted(), vec!["a@1.0.1".to_string()]);
        assert!(h.changelogs.generated().is_empty());
    }

    #[test]
    fn changelog_failure_rolls_back_tag() {
        let prompts = ScriptedPrompts::new()
            .with_selection(&["a", "b"])
            .with_bump(BumpKind::Patch);

        let (result, h) = Harness::new(&["a", "b"], prompts)
            .with_changelogs(MockChangelogGenerator::new().with_failure("b"))
            .run();
        let failure = failure(result);

        assert!(matches!(failure.error, OperationError::SagaFailed { ref step, .. } if step == "write_changelogs"));
        assert_eq!(h.git.tags_deleted(), vec!["1.0.1".to_string()]);
        assert!(h.git.commits().is_empty());
    }

    #[test]
    fn disabled_rollback_keeps_the_tag() {
        let prompts = ScriptedPrompts::new().with_bump(BumpKind::Patch);

        let (result, h) = Harness::new(&["a"], prompts)
            .with_config(ReleaseConfig::default().with_rollback(false))
            .with_git(MockGitProvider::new().with_commit_failure())
            .run();

        assert!(result.is_err());
        assert!(h.git.tags_deleted().is_empty());
    }

    #[test]
    fn bump_failure_aborts_before_tagging() {
        let prompts = ScriptedPrompts::new()
            .with_selection(&["a", "b"])
            .with_bump(BumpKind::Patch);

        let (result, h) = Harness::new(&["a", "b"], prompts)
            .with_bumper(MockVersionBumper::new().with_failure("packages/b"))
            .run();
        let failure = failure(result);

        assert!(matches!(failure.error, OperationError::SagaFailed { ref step, .. } if step == "bump_versions"));
        assert!(h.git.tags_created().is_empty());
        assert_eq!(h.version_files.written().len(), 1);
    }

    #[test]
    fn publish_failure_does_not_fail_the_release() -> anyhow::Result<()> {
        let prompts = ScriptedPrompts::new().with_bump(BumpKind::Patch);

        let (result, h) = Harness::new(&["a"], prompts)
            .with_publisher(MockPublisher::failing())
            .run();
        let outcome = result.map_err(|f| f.error)?;

        assert_eq!(h.git.commits().len(), 1);
        let PublishStatus::Failed { output, .. } = outcome.publish else {
            panic!("publish should be reported as failed");
        };
        assert_eq!(output.as_deref(), Some("npm ERR! 403 Forbidden"));
        Ok(())
    }
}
