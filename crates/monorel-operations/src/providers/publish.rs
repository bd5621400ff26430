use std::path::Path;

use monorel_core::PreReleaseChannel;
use tracing::info;

use super::command::{combined_output, run_captured};
use crate::traits::Publisher;
use crate::{OperationError, Result};

/// Runs the configured publish command, appending `--tag <channel>` for
/// pre-releases.
pub struct ShellPublisher;

impl ShellPublisher {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for ShellPublisher {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn publish_command(
    command: &[String],
    dist_tag: Option<PreReleaseChannel>,
) -> Vec<String> {
    let mut argv = command.to_vec();
    if let Some(channel) = dist_tag {
        argv.push("--tag".to_string());
        argv.push(channel.to_string());
    }
    argv
}

impl Publisher for ShellPublisher {
    fn publish(
        &self,
        workspace_root: &Path,
        command: &[String],
        dist_tag: Option<PreReleaseChannel>,
    ) -> Result<()> {
        let argv = publish_command(command, dist_tag);
        info!(command = %argv.join(" "), "publishing");

        let output = run_captured(&argv, workspace_root)?;
        if output.status.success() {
            Ok(())
        } else {
            Err(OperationError::PublishFailed {
                command: argv.join(" "),
                output: combined_output(&output),
            })
        }
    }
}
