use std::path::{Path, PathBuf};
use std::sync::Arc;

use monorel_workspace::ReleaseConfig;

use crate::traits::{
    ChangelogGenerator, GitProvider, PromptProvider, TaskRunner, VersionBumper, VersionFileWriter,
};

/// Shared, read-only state for every release stage.
pub struct ReleaseSagaContext<T, V, F, C, G, Q> {
    workspace_root: PathBuf,
    config: ReleaseConfig,
    task_runner: Arc<T>,
    version_bumper: Arc<V>,
    version_file_writer: Arc<F>,
    changelog_generator: Arc<C>,
    git_provider: Arc<G>,
    prompts: Arc<Q>,
}

impl<T, V, F, C, G, Q> Clone for ReleaseSagaContext<T, V, F, C, G, Q> {
    fn clone(&self) -> Self {
        Self {
            workspace_root: self.workspace_root.clone(),
            config: self.config.clone(),
            task_runner: Arc::clone(&self.task_runner),
            version_bumper: Arc::clone(&self.version_bumper),
            version_file_writer: Arc::clone(&self.version_file_writer),
            changelog_generator: Arc::clone(&self.changelog_generator),
            git_provider: Arc::clone(&self.git_provider),
            prompts: Arc::clone(&self.prompts),
        }
    }
}

impl<T, V, F, C, G, Q> ReleaseSagaContext<T, V, F, C, G, Q>
where
    T: TaskRunner,
    V: VersionBumper,
    F: VersionFileWriter,
    C: ChangelogGenerator,
    G: GitProvider,
    Q: PromptProvider,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        workspace_root: PathBuf,
        config: ReleaseConfig,
        task_runner: Arc<T>,
        version_bumper: Arc<V>,
        version_file_writer: Arc<F>,
        changelog_generator: Arc<C>,
        git_provider: Arc<G>,
        prompts: Arc<Q>,
    ) -> Self {
        Self {
            workspace_root,
            config,
            task_runner,
            version_bumper,
            version_file_writer,
            changelog_generator,
            git_provider,
            prompts,
        }
    }
}

impl<T, V, F, C, G, Q> ReleaseSagaContext<T, V, F, C, G, Q> {
    #[must_use]
    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    #[must_use]
    pub fn config(&self) -> &ReleaseConfig {
        &self.config
    }

    #[must_use]
    pub fn task_runner(&self) -> &T {
        &self.task_runner
    }

    #[must_use]
    pub fn version_bumper(&self) -> &V {
        &self.version_bumper
    }

    #[must_use]
    pub fn version_file_writer(&self) -> &F {
        &self.version_file_writer
    }

    #[must_use]
    pub fn changelog_generator(&self) -> &C {
        &self.changelog_generator
    }

    #[must_use]
    pub fn git_provider(&self) -> &G {
        &self.git_provider
    }

    #[must_use]
    pub fn prompts(&self) -> &Q {
        &self.prompts
    }
}
