use monorel_core::{GlobalReleaseInfo, PackageRelease, ReleasePlan, ResolvedTag};
use tracing::debug;

use crate::traits::{PromptProvider, TagVersionInput};
use crate::{OperationError, Result};

/// The tag and commit message for a release of `version`.
#[must_use]
pub fn release_message(version: &str) -> String {
    format!("release: v{version}")
}

/// Works out the tag name and messages for a release.
pub struct TagResolver<'a, Q> {
    prompts: &'a Q,
}

impl<'a, Q: PromptProvider> TagResolver<'a, Q> {
    #[must_use]
    pub fn new(prompts: &'a Q) -> Self {
        Self { prompts }
    }

    /// A single package is tagged `name@version`. Several packages share one
    /// version tag: the global version for a full-workspace release, the
    /// prompted one for a subset.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::TagPromptCancelled`] or
    /// [`OperationError::EmptyTagVersion`] when the prompted version is
    /// missing, and [`OperationError::MissingStageOutput`] when no package
    /// was bumped.
    pub fn resolve(
        &self,
        plan: &ReleasePlan,
        releases: &[PackageRelease],
        global: &GlobalReleaseInfo,
    ) -> Result<ResolvedTag> {
        if let [release] = releases {
            let name = format!("{}@{}", release.package.name, release.info.new_version);
            return Ok(ResolvedTag {
                message: format!("release: {name}"),
                commit_message: release_message(&name),
                name,
            });
        }
        if releases.is_empty() {
            return Err(OperationError::MissingStageOutput {
                stage: "bump_versions",
            });
        }

        let version = if plan.is_full_workspace() {
            global.new_version.to_string()
        } else {
            self.prompt_version(global)?
        };
        debug!(%version, full = plan.is_full_workspace(), "resolved shared release tag");

        let message = release_message(&version);
        Ok(ResolvedTag {
            name: version,
            commit_message: message.clone(),
            message,
        })
    }

    fn prompt_version(&self, global: &GlobalReleaseInfo) -> Result<String> {
        match self.prompts.input_tag_version(&global.new_version)? {
            TagVersionInput::Provided(value) => {
                let value = value.trim();
                if value.is_empty() {
                    Err(OperationError::EmptyTagVersion)
                } else {
                    Ok(value.to_string())
                }
            }
            TagVersionInput::Cancelled => Err(OperationError::TagPromptCancelled),
        }
    }
}

#[cfg(test)]
mod tests {
    use monorel_core::{BumpKind, ReleaseInfo};
    use semver::Version;

    use super::*;
    use crate::mocks::{ScriptedPrompts, mock_packages};

    fn releases(names: &[&str], version: Version) -> Vec<PackageRelease> {
        mock_packages(names)
            .into_iter()
            .map(|package| PackageRelease {
                package,
                info: ReleaseInfo::new(version.clone()).with_previous(Version::new(1, 0, 0)),
            })
            .collect()
    }

    fn global(version: Version) -> GlobalReleaseInfo {
        GlobalReleaseInfo {
            new_version: version,
            previous_version: Some(Version::new(1, 0, 0)),
        }
    }

    fn plan(names: &[&str], full: bool) -> anyhow::Result<ReleasePlan> {
        Ok(ReleasePlan::new(mock_packages(names), BumpKind::Patch, None)?.with_full_workspace(full))
    }

    #[test]
    fn single_package_uses_scoped_tag() -> anyhow::Result<()> {
        let prompts = ScriptedPrompts::new();

        let tag = TagResolver::new(&prompts).resolve(
            &plan(&["a"], false)?,
            &releases(&["a"], Version::new(1, 0, 1)),
            &global(Version::new(1, 0, 1)),
        )?;

        assert_eq!(tag.name, "a@1.0.1");
        assert_eq!(tag.message, "release: a@1.0.1");
        assert_eq!(tag.commit_message, "release: va@1.0.1");
        assert_eq!(prompts.tag_prompts(), 0);
        Ok(())
    }

    #[test]
    fn full_workspace_uses_global_version_without_prompt() -> anyhow::Result<()> {
        let prompts = ScriptedPrompts::new().with_tag_version("9.9.9");
        let next = Version::parse("1.0.1-beta.0")?;

        let tag = TagResolver::new(&prompts).resolve(
            &plan(&["a", "b"], true)?,
            &releases(&["a", "b"], next.clone()),
            &global(next),
        )?;

        assert_eq!(tag.name, "1.0.1-beta.0");
        assert_eq!(tag.message, "release: v1.0.1-beta.0");
        assert_eq!(tag.commit_message, "release: v1.0.1-beta.0");
        assert_eq!(prompts.tag_prompts(), 0);
        Ok(())
    }

    #[test]
    fn subset_prompts_with_global_default() -> anyhow::Result<()> {
        let prompts = ScriptedPrompts::new().with_tag_version(" 2.1.0 ");

        let tag = TagResolver::new(&prompts).resolve(
            &plan(&["a", "b"], false)?,
            &releases(&["a", "b"], Version::new(1, 1, 0)),
            &global(Version::new(2, 0, 1)),
        )?;

        assert_eq!(tag.name, "2.1.0");
        assert_eq!(tag.commit_message, "release: v2.1.0");
        assert_eq!(prompts.tag_defaults(), vec![Version::new(2, 0, 1)]);
        Ok(())
    }

    #[test]
    fn cancelled_tag_prompt_is_an_error() -> anyhow::Result<()> {
        let prompts = ScriptedPrompts::new();

        let result = TagResolver::new(&prompts).resolve(
            &plan(&["a", "b"], false)?,
            &releases(&["a", "b"], Version::new(1, 1, 0)),
            &global(Version::new(2, 0, 1)),
        );

        assert!(matches!(result, Err(OperationError::TagPromptCancelled)));
        Ok(())
    }

    #[test]
    fn blank_tag_version_is_an_error() -> anyhow::Result<()> {
        let prompts = ScriptedPrompts::new().with_tag_version("   ");

        let result = TagResolver::new(&prompts).resolve(
            &plan(&["a", "b"], false)?,
            &releases(&["a", "b"], Version::new(1, 1, 0)),
            &global(Version::new(2, 0, 1)),
        );

        assert!(matches!(result, Err(OperationError::EmptyTagVersion)));
        Ok(())
    }
}
