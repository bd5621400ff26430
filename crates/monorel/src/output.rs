use monorel_core::{GlobalReleaseInfo, PackageRelease};
use monorel_operations::operations::{PublishStatus, ReleaseOutcome};

use crate::error::CliError;

fn format_transition(previous: Option<&semver::Version>, next: &semver::Version) -> String {
    match previous {
        Some(previous) => format!("{previous} -> {next}"),
        None => next.to_string(),
    }
}

fn format_releases(output: &mut String, releases: &[PackageRelease]) {
    output.push_str("Released:\n");
    for release in releases {
        output.push_str(&format!(
            "  {} {}\n",
            release.package.name,
            format_transition(
                release.info.previous_version.as_ref(),
                &release.info.new_version
            )
        ));
    }
}

fn format_global(output: &mut String, global: &GlobalReleaseInfo) {
    output.push_str(&format!(
        "Workspace version: {}\n",
        format_transition(global.previous_version.as_ref(), &global.new_version)
    ));
}

fn format_publish(output: &mut String, publish: &PublishStatus) {
    match publish {
        PublishStatus::Published { dist_tag: Some(tag) } => {
            output.push_str(&format!("Published with dist-tag '{tag}'\n"));
        }
        PublishStatus::Published { dist_tag: None } => output.push_str("Published\n"),
        PublishStatus::Failed { error, output: out } => {
            output.push_str(&format!("Publish failed: {error}\n"));
            if let Some(out) = out {
                push_indented(output, out);
            }
        }
    }
}

fn push_indented(output: &mut String, text: &str) {
    for line in text.lines() {
        output.push_str(&format!("  | {line}\n"));
    }
}

pub(crate) fn format_outcome(outcome: &ReleaseOutcome) -> String {
    let mut output = String::new();
    format_releases(&mut output, &outcome.releases);
    format_global(&mut output, &outcome.global);
    output.push_str(&format!("Tag: {}\n", outcome.tag.name));
    let short_sha = outcome.commit.sha.get(..7).unwrap_or(&outcome.commit.sha);
    output.push_str(&format!(
        "Commit: {short_sha} {}\n",
        outcome.commit.message.lines().next().unwrap_or_default()
    ));
    format_publish(&mut output, &outcome.publish);
    output
}

/// `error:` and `caused by:` lines, then captured command output and the
/// stage log when the error carries them.
pub(crate) fn format_error(error: &CliError) -> String {
    let mut output = format!("error: {error}\n");

    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        output.push_str(&format!("caused by: {cause}\n"));
        source = std::error::Error::source(cause);
    }

    if let CliError::Release { source, audit } = error {
        if let Some(captured) = source.captured_output().filter(|o| !o.trim().is_empty()) {
            output.push_str("\ncommand output:\n");
            push_indented(&mut output, captured);
        }
        if let Some(audit) = audit.as_ref().filter(|a| !a.records().is_empty()) {
            output.push_str("\nstages:\n");
            push_indented(&mut output, &audit.summary());
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use monorel_core::{BumpKind, PreReleaseChannel, ReleaseInfo, ReleasePlan, ResolvedTag};
    use monorel_git::CommitInfo;
    use monorel_operations::OperationError;
    use monorel_operations::mocks::mock_packages;
    use monorel_operations::operations::ReleaseFailure;
    use monorel_operations::traits::Task;
    use monorel_saga::SagaAuditLog;
    use semver::Version;

    use super::*;

    fn outcome(publish: PublishStatus) -> anyhow::Result<ReleaseOutcome> {
        let packages = mock_packages(&["a", "b"]);
        let next = Version::parse("1.1.0-beta.0")?;
        let releases = packages
            .iter()
            .map(|package| PackageRelease {
                package: package.clone(),
                info: ReleaseInfo::new(next.clone()).with_previous(Version::new(1, 0, 0)),
            })
            .collect();

        Ok(ReleaseOutcome {
            workspace_root: PathBuf::from("/ws"),
            plan: ReleasePlan::new(packages, BumpKind::Preminor, Some(PreReleaseChannel::Beta))?,
            releases,
            global: GlobalReleaseInfo {
                new_version: next.clone(),
                previous_version: Some(Version::new(1, 0, 0)),
            },
            tag: ResolvedTag {
                name: next.to_string(),
                message: format!("release: v{next}"),
                commit_message: format!("release: v{next}"),
            },
            version_files: Vec::new(),
            changelogs: Vec::new(),
            commit: CommitInfo {
                sha: "0123456789abcdef".to_string(),
                message: format!("release: v{next}"),
            },
            publish,
            audit: SagaAuditLog::new(),
        })
    }

    #[test]
    fn outcome_lists_every_transition() -> anyhow::Result<()> {
        let text = format_outcome(&outcome(PublishStatus::Published {
            dist_tag: Some(PreReleaseChannel::Beta),
        })?);

        assert!(text.contains("  a 1.0.0 -> 1.1.0-beta.0\n"));
        assert!(text.contains("  b 1.0.0 -> 1.1.0-beta.0\n"));
        assert!(text.contains("Workspace version: 1.0.0 -> 1.1.0-beta.0\n"));
        assert!(text.contains("Tag: 1.1.0-beta.0\n"));
        assert!(text.contains("Commit: 0123456 release: v1.1.0-beta.0\n"));
        assert!(text.contains("Published with dist-tag 'beta'"));
        Ok(())
    }

    #[test]
    fn failed_publish_shows_its_output() -> anyhow::Result<()> {
        let text = format_outcome(&outcome(PublishStatus::Failed {
            error: "`pnpm publish` failed".to_string(),
            output: Some("E401 unauthorized".to_string()),
        })?);

        assert!(text.contains("Publish failed: `pnpm publish` failed\n"));
        assert!(text.contains("  | E401 unauthorized\n"));
        Ok(())
    }

    #[test]
    fn error_shows_cause_chain_and_captured_output() {
        let failure = ReleaseFailure {
            error: OperationError::SagaFailed {
                step: "build".to_string(),
                source: Box::new(OperationError::TaskFailed {
                    task: Task::Build,
                    package: "b".to_string(),
                    output: "tsc: error TS2322".to_string(),
                    others: Vec::new(),
                }),
            },
            audit: None,
        };

        let text = format_error(&CliError::from(failure));

        assert!(text.starts_with("error: release aborted\n"));
        assert!(text.contains("caused by: release failed at stage 'build'\n"));
        assert!(text.contains("caused by: build failed for package 'b'\n"));
        assert!(text.contains("  | tsc: error TS2322\n"));
        assert!(!text.contains("stages:"));
    }

    #[test]
    fn input_error_has_no_output_section() {
        let text = format_error(&CliError::from(ReleaseFailure::from(
            OperationError::MissingChannel {
                kind: BumpKind::Prerelease,
            },
        )));

        assert_eq!(
            text,
            "error: release aborted\ncaused by: bump kind 'prerelease' requires a pre-release channel\n"
        );
    }
}
