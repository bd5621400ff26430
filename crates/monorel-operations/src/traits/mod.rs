mod changelog_generator;
mod git_provider;
mod interaction;
mod publisher;
mod task_runner;
mod version_bumper;
mod version_file_writer;
mod workspace_provider;

pub use changelog_generator::{ChangelogGenerator, ChangelogRequest};
pub use git_provider::GitProvider;
pub use interaction::{
    BumpSelection, ChannelSelection, PackageSelection, PromptProvider, TagVersionInput,
};
pub use publisher::Publisher;
pub use task_runner::{Task, TaskOutcome, TaskRunner};
pub use version_bumper::VersionBumper;
pub use version_file_writer::VersionFileWriter;
pub use workspace_provider::WorkspaceProvider;
