mod changelog;
mod command;
mod git;
mod manifest;
mod publish;
mod task;
mod workspace;

pub use changelog::ConventionalChangelogGenerator;
pub use git::Git2Provider;
pub use manifest::{FileSystemVersionFileWriter, ManifestVersionBumper};
pub use publish::ShellPublisher;
pub use task::ShellTaskRunner;
pub use workspace::FileSystemWorkspaceProvider;
