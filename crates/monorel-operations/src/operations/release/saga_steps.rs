use indexmap::IndexMap;
use monorel_core::{PackageRelease, ReleasePlan};
use monorel_manifest::FileSnapshot;
use monorel_saga::SagaStep;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::context::ReleaseSagaContext;
use super::saga_data::ReleaseSagaData;
use crate::operations::tag::TagResolver;
use crate::traits::{
    ChangelogGenerator, ChangelogRequest, GitProvider, PromptProvider, Task, TaskRunner,
    VersionBumper, VersionFileWriter,
};
use crate::{OperationError, Result};

/// Commit message used when no tag was resolved.
pub const FALLBACK_COMMIT_MESSAGE: &str = "release: publish";

/// Restores snapshots newest first, continuing past failures. Returns the
/// first failure.
fn restore_snapshots(snapshots: &[FileSnapshot]) -> Result<()> {
    let mut first_error = None;

    for snapshot in snapshots.iter().rev() {
        match snapshot.restore() {
            Ok(()) => debug!(path = %snapshot.path().display(), existed = snapshot.existed(), "restored file"),
            Err(err) => {
                warn!(path = %snapshot.path().display(), error = %err, "failed to restore file");
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }
    }

    first_error.map_or(Ok(()), |err| Err(err.into()))
}

/// Runs `task` in every selected package at once, waits for all of them and
/// only then decides. The first failure in plan order is reported; the
/// other failing packages are listed with it.
fn run_in_parallel<T, V, F, C, G, Q>(
    ctx: &ReleaseSagaContext<T, V, F, C, G, Q>,
    task: Task,
    command: &[String],
    plan: &ReleasePlan,
) -> Result<()>
where
    T: TaskRunner,
    V: VersionBumper,
    F: VersionFileWriter,
    C: ChangelogGenerator,
    G: GitProvider,
    Q: PromptProvider,
{
    info!(%task, packages = plan.selected_packages().len(), "running stage");

    let outcomes: Vec<_> = plan
        .selected_packages()
        .par_iter()
        .map(|package| {
            let outcome = ctx.task_runner().run(task, command, &package.directory);
            (package, outcome)
        })
        .collect();

    let mut failures: IndexMap<String, String> = IndexMap::new();
    for (package, outcome) in outcomes {
        match outcome? {
            outcome if outcome.success => {
                debug!(%task, package = %package.name, "task succeeded");
            }
            outcome => {
                warn!(%task, package = %package.name, "task failed");
                failures.insert(package.name.clone(), outcome.output);
            }
        }
    }

    let mut failures = failures.into_iter();
    match failures.next() {
        None => Ok(()),
        Some((package, output)) => Err(OperationError::TaskFailed {
            task,
            package,
            output,
            others: failures.map(|(name, _)| name).collect(),
        }),
    }
}

pub struct RunTestsStep;

impl<T, V, F, C, G, Q> SagaStep<ReleaseSagaContext<T, V, F, C, G, Q>> for RunTestsStep
where
    T: TaskRunner,
    V: VersionBumper,
    F: VersionFileWriter,
    C: ChangelogGenerator,
    G: GitProvider,
    Q: PromptProvider,
{
    type Data = ReleaseSagaData;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "run_tests"
    }

    fn should_run(&self, _ctx: &ReleaseSagaContext<T, V, F, C, G, Q>, data: &Self::Data) -> bool {
        data.plan.runs_tests()
    }

    fn execute(
        &self,
        ctx: &ReleaseSagaContext<T, V, F, C, G, Q>,
        data: Self::Data,
    ) -> Result<Self::Data> {
        run_in_parallel(ctx, Task::Test, ctx.config().test_command(), &data.plan)?;
        Ok(data)
    }
}

pub struct BuildStep;

impl<T, V, F, C, G, Q> SagaStep<ReleaseSagaContext<T, V, F, C, G, Q>> for BuildStep
where
    T: TaskRunner,
    V: VersionBumper,
    F: VersionFileWriter,
    C: ChangelogGenerator,
    G: GitProvider,
    Q: PromptProvider,
{
    type Data = ReleaseSagaData;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "build"
    }

    fn execute(
        &self,
        ctx: &ReleaseSagaContext<T, V, F, C, G, Q>,
        data: Self::Data,
    ) -> Result<Self::Data> {
        run_in_parallel(ctx, Task::Build, ctx.config().build_command(), &data.plan)?;
        Ok(data)
    }
}

pub struct BumpVersionsStep;

impl BumpVersionsStep {
    fn bump_all<T, V, F, C, G, Q>(
        ctx: &ReleaseSagaContext<T, V, F, C, G, Q>,
        data: &mut ReleaseSagaData,
        snapshots: &mut Vec<FileSnapshot>,
    ) -> Result<()>
    where
        V: VersionBumper,
        F: VersionFileWriter,
    {
        let kind = data.plan.bump_kind();
        let channel = data.plan.channel();
        let version_file = ctx.config().version_file();

        for package in data.plan.selected_packages() {
            let target = ctx
                .version_file_writer()
                .target(&package.directory, version_file);
            snapshots.push(FileSnapshot::capture(&package.manifest_path)?);
            snapshots.push(FileSnapshot::capture(&target)?);

            let release = ctx
                .version_bumper()
                .bump(&package.directory, kind, channel)?;
            if let Some(path) = ctx.version_file_writer().write(
                &package.directory,
                &release.new_version,
                version_file,
            )? {
                data.version_files.push(path);
            }

            info!(package = %package.name, version = %release.new_version, "bumped package");
            data.releases.push(PackageRelease {
                package: package.clone(),
                info: release,
            });
        }

        snapshots.push(FileSnapshot::capture(&data.root_manifest_path)?);
        let global = ctx
            .version_bumper()
            .bump(ctx.workspace_root(), kind, channel)?;
        info!(version = %global.new_version, "bumped workspace root");
        data.global = Some(global.into());

        Ok(())
    }
}

impl<T, V, F, C, G, Q> SagaStep<ReleaseSagaContext<T, V, F, C, G, Q>> for BumpVersionsStep
where
    T: TaskRunner,
    V: VersionBumper,
    F: VersionFileWriter,
    C: ChangelogGenerator,
    G: GitProvider,
    Q: PromptProvider,
{
    type Data = ReleaseSagaData;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "bump_versions"
    }

    fn execute(
        &self,
        ctx: &ReleaseSagaContext<T, V, F, C, G, Q>,
        mut data: Self::Data,
    ) -> Result<Self::Data> {
        let mut snapshots = Vec::new();

        match Self::bump_all(ctx, &mut data, &mut snapshots) {
            Ok(()) => {
                data.bump_snapshots = snapshots;
                Ok(data)
            }
            Err(err) => {
                if ctx.config().rollback() {
                    if let Err(restore_err) = restore_snapshots(&snapshots) {
                        warn!(error = %restore_err, "could not fully restore files after failed bump");
                    }
                } else {
                    warn!("rollback disabled, leaving partially bumped files in place");
                }
                Err(err)
            }
        }
    }

    fn compensate(
        &self,
        ctx: &ReleaseSagaContext<T, V, F, C, G, Q>,
        output: &Self::Data,
    ) -> Result<()> {
        if !ctx.config().rollback() {
            warn!(files = output.bump_snapshots.len(), "rollback disabled, keeping bumped versions");
            return Ok(());
        }
        restore_snapshots(&output.bump_snapshots)
    }

    fn compensation_description(&self) -> String {
        "restore manifests and version files".to_string()
    }
}

pub struct CreateTagStep;

impl<T, V, F, C, G, Q> SagaStep<ReleaseSagaContext<T, V, F, C, G, Q>> for CreateTagStep
where
    T: TaskRunner,
    V: VersionBumper,
    F: VersionFileWriter,
    C: ChangelogGenerator,
    G: GitProvider,
    Q: PromptProvider,
{
    type Data = ReleaseSagaData;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "create_tag"
    }

    fn execute(
        &self,
        ctx: &ReleaseSagaContext<T, V, F, C, G, Q>,
        mut data: Self::Data,
    ) -> Result<Self::Data> {
        let global = data
            .global
            .as_ref()
            .ok_or(OperationError::MissingStageOutput {
                stage: "bump_versions",
            })?;
        let tag = TagResolver::new(ctx.prompts()).resolve(&data.plan, &data.releases, global)?;

        let root = ctx.workspace_root();
        let remote = ctx.config().remote();
        let created = ctx
            .git_provider()
            .create_tag(root, &tag.name, &tag.message)?;
        debug!(tag = %created.name, target = %created.target_sha, "created tag");

        if let Err(err) = ctx.git_provider().push_tag(root, remote, &tag.name) {
            if ctx.config().rollback() {
                if let Err(delete_err) = ctx.git_provider().delete_tag(root, &tag.name) {
                    warn!(tag = %tag.name, error = %delete_err, "could not delete tag after failed push");
                }
            }
            return Err(err);
        }
        info!(tag = %tag.name, %remote, "pushed tag");

        data.tag = Some(tag);
        data.created_tag = Some(created);
        data.tag_pushed = true;
        Ok(data)
    }

    fn compensate(
        &self,
        ctx: &ReleaseSagaContext<T, V, F, C, G, Q>,
        output: &Self::Data,
    ) -> Result<()> {
        let Some(tag) = &output.created_tag else {
            return Ok(());
        };
        if !ctx.config().rollback() {
            warn!(tag = %tag.name, "rollback disabled, keeping tag");
            return Ok(());
        }

        ctx.git_provider()
            .delete_tag(ctx.workspace_root(), &tag.name)?;
        debug!(tag = %tag.name, "deleted local tag");

        if output.tag_pushed {
            warn!(
                tag = %tag.name,
                remote = %ctx.config().remote(),
                "tag was already pushed; delete it from the remote by hand"
            );
        }
        Ok(())
    }

    fn compensation_description(&self) -> String {
        "delete local tag".to_string()
    }
}

pub struct WriteChangelogsStep;

impl WriteChangelogsStep {
    fn write_all<T, V, F, C, G, Q>(
        ctx: &ReleaseSagaContext<T, V, F, C, G, Q>,
        data: &mut ReleaseSagaData,
        snapshots: &mut Vec<FileSnapshot>,
    ) -> Result<()>
    where
        C: ChangelogGenerator,
    {
        let tag = data
            .tag
            .as_ref()
            .map(|t| t.name.clone())
            .ok_or(OperationError::MissingStageOutput {
                stage: "create_tag",
            })?;

        for release in &data.releases {
            let path = release
                .package
                .directory
                .join(ctx.config().changelog_file());
            snapshots.push(FileSnapshot::capture(&path)?);

            let written = ctx.changelog_generator().generate(&ChangelogRequest {
                repository_root: ctx.workspace_root(),
                package: &release.package,
                release: &release.info,
                changelog_path: &path,
                tag: &tag,
                remote: ctx.config().remote(),
            })?;
            data.changelogs.push(written);
        }

        Ok(())
    }
}

impl<T, V, F, C, G, Q> SagaStep<ReleaseSagaContext<T, V, F, C, G, Q>> for WriteChangelogsStep
where
    T: TaskRunner,
    V: VersionBumper,
    F: VersionFileWriter,
    C: ChangelogGenerator,
    G: GitProvider,
    Q: PromptProvider,
{
    type Data = ReleaseSagaData;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "write_changelogs"
    }

    fn execute(
        &self,
        ctx: &ReleaseSagaContext<T, V, F, C, G, Q>,
        mut data: Self::Data,
    ) -> Result<Self::Data> {
        let mut snapshots = Vec::new();

        match Self::write_all(ctx, &mut data, &mut snapshots) {
            Ok(()) => {
                info!(count = data.changelogs.len(), "wrote changelogs");
                data.changelog_snapshots = snapshots;
                Ok(data)
            }
            Err(err) => {
                if ctx.config().rollback() {
                    if let Err(restore_err) = restore_snapshots(&snapshots) {
                        warn!(error = %restore_err, "could not fully restore changelogs");
                    }
                }
                Err(err)
            }
        }
    }

    fn compensate(
        &self,
        ctx: &ReleaseSagaContext<T, V, F, C, G, Q>,
        output: &Self::Data,
    ) -> Result<()> {
        if !ctx.config().rollback() {
            warn!("rollback disabled, keeping changelogs");
            return Ok(());
        }
        restore_snapshots(&output.changelog_snapshots)
    }

    fn compensation_description(&self) -> String {
        "restore changelogs".to_string()
    }
}

pub struct CommitStep;

impl<T, V, F, C, G, Q> SagaStep<ReleaseSagaContext<T, V, F, C, G, Q>> for CommitStep
where
    T: TaskRunner,
    V: VersionBumper,
    F: VersionFileWriter,
    C: ChangelogGenerator,
    G: GitProvider,
    Q: PromptProvider,
{
    type Data = ReleaseSagaData;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "commit"
    }

    fn execute(
        &self,
        ctx: &ReleaseSagaContext<T, V, F, C, G, Q>,
        mut data: Self::Data,
    ) -> Result<Self::Data> {
        let message = data
            .tag
            .as_ref()
            .map_or(FALLBACK_COMMIT_MESSAGE, |t| t.commit_message.as_str());

        ctx.git_provider().stage_all(ctx.workspace_root())?;
        let commit = ctx.git_provider().commit(ctx.workspace_root(), message)?;
        info!(sha = %commit.sha, %message, "created release commit");

        data.commit = Some(commit);
        Ok(data)
    }
}
