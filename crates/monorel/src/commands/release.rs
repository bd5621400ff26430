use std::path::Path;

use monorel_operations::operations::ReleaseOperation;
use monorel_operations::providers::{
    ConventionalChangelogGenerator, FileSystemVersionFileWriter, FileSystemWorkspaceProvider,
    Git2Provider, ManifestVersionBumper, ShellPublisher, ShellTaskRunner,
};
use monorel_operations::traits::PromptProvider;
use tracing::{debug, info};

use crate::error::Result;
use crate::output::format_outcome;

pub(crate) fn run<Q: PromptProvider + 'static>(prompts: Q, start_path: &Path) -> Result<()> {
    info!(
        path = %start_path.display(),
        interactive = prompts.is_interactive(),
        "starting release"
    );
    let operation = ReleaseOperation::new(
        FileSystemWorkspaceProvider::new(),
        ShellTaskRunner::new(),
        ManifestVersionBumper::new(),
        FileSystemVersionFileWriter::new(),
        ConventionalChangelogGenerator::new(),
        Git2Provider::new(),
        prompts,
        ShellPublisher::new(),
    );

    let outcome = operation.execute(start_path).inspect_err(|failure| {
        debug!(error = %failure.error, "release aborted");
    })?;
    info!(
        tag = %outcome.tag.name,
        packages = outcome.releases.len(),
        published = outcome.publish.is_published(),
        "release finished"
    );
    print!("{}", format_outcome(&outcome));

    Ok(())
}
