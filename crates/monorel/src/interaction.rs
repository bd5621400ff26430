use std::io::IsTerminal;

use dialoguer::{Confirm, Input, MultiSelect, Select};
use monorel_core::{BumpKind, Package, PreReleaseChannel, ReleasePlan};
use monorel_operations::traits::{
    BumpSelection, ChannelSelection, PackageSelection, PromptProvider, TagVersionInput,
};
use monorel_operations::{OperationError, Result};
use semver::Version;

use crate::commands::CiArgs;

pub(crate) fn stdin_is_terminal() -> bool {
    std::io::stdin().is_terminal()
}

fn prompt_error(e: dialoguer::Error) -> OperationError {
    match e {
        dialoguer::Error::IO(io_err) => OperationError::Prompt(io_err),
    }
}

/// Asks every question on the terminal.
pub(crate) struct TerminalPromptProvider;

impl PromptProvider for TerminalPromptProvider {
    fn is_interactive(&self) -> bool {
        true
    }

    fn select_packages(&self, available: &[Package]) -> Result<PackageSelection> {
        let items: Vec<String> = available.iter().map(ToString::to_string).collect();

        let selection = MultiSelect::new()
            .with_prompt("Select packages to release (space to toggle)")
            .items(&items)
            .interact_opt()
            .map_err(prompt_error)?;

        match selection {
            Some(indices) => {
                let packages = indices
                    .into_iter()
                    .filter_map(|i| available.get(i).cloned())
                    .collect();
                Ok(PackageSelection::Selected(packages))
            }
            None => Ok(PackageSelection::Cancelled),
        }
    }

    fn select_bump_kind(&self) -> Result<BumpSelection> {
        let items = BumpKind::names();

        let selection = Select::new()
            .with_prompt("Select version increment")
            .items(&items)
            .default(0)
            .interact_opt()
            .map_err(prompt_error)?;

        Ok(selection
            .and_then(|i| BumpKind::ALL.get(i).copied())
            .map_or(BumpSelection::Cancelled, BumpSelection::Selected))
    }

    fn select_channel(&self) -> Result<ChannelSelection> {
        let items = PreReleaseChannel::names();

        let selection = Select::new()
            .with_prompt("Select pre-release channel")
            .items(&items)
            .default(0)
            .interact_opt()
            .map_err(prompt_error)?;

        Ok(selection
            .and_then(|i| PreReleaseChannel::ALL.get(i).copied())
            .map_or(ChannelSelection::Cancelled, ChannelSelection::Selected))
    }

    fn input_tag_version(&self, default: &Version) -> Result<TagVersionInput> {
        let value: String = Input::new()
            .with_prompt("Tag version")
            .default(default.to_string())
            .interact_text()
            .map_err(prompt_error)?;

        Ok(TagVersionInput::Provided(value))
    }

    fn confirm_release(&self, plan: &ReleasePlan) -> Result<bool> {
        println!();
        println!("Packages to release:");
        for package in plan.selected_packages() {
            println!("  {package}");
        }
        let channel = plan
            .channel()
            .map(|c| format!(" on channel '{c}'"))
            .unwrap_or_default();
        println!("Increment: {}{channel}", plan.bump_kind());
        println!();

        let confirmed = Confirm::new()
            .with_prompt("Run the release?")
            .default(false)
            .interact_opt()
            .map_err(prompt_error)?;

        Ok(confirmed.unwrap_or(false))
    }
}

/// Replays answers given on the command line.
pub(crate) struct ArgsPromptProvider {
    bump: BumpKind,
    channel: Option<PreReleaseChannel>,
    packages: Vec<String>,
    tag_version: Option<String>,
}

impl From<CiArgs> for ArgsPromptProvider {
    fn from(args: CiArgs) -> Self {
        Self {
            bump: args.bump,
            channel: args.preid,
            packages: args.packages,
            tag_version: args.tag_version,
        }
    }
}

impl PromptProvider for ArgsPromptProvider {
    fn is_interactive(&self) -> bool {
        false
    }

    fn select_packages(&self, available: &[Package]) -> Result<PackageSelection> {
        if self.packages.is_empty() {
            return Ok(PackageSelection::Selected(available.to_vec()));
        }

        let selected = self
            .packages
            .iter()
            .map(|name| {
                available
                    .iter()
                    .find(|p| &p.name == name)
                    .cloned()
                    .ok_or_else(|| OperationError::UnknownPackage {
                        name: name.clone(),
                        available: available
                            .iter()
                            .map(|p| p.name.as_str())
                            .collect::<Vec<_>>()
                            .join(", "),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(PackageSelection::Selected(selected))
    }

    fn select_bump_kind(&self) -> Result<BumpSelection> {
        Ok(BumpSelection::Selected(self.bump))
    }

    fn select_channel(&self) -> Result<ChannelSelection> {
        Ok(self
            .channel
            .map_or(ChannelSelection::Cancelled, ChannelSelection::Selected))
    }

    fn input_tag_version(&self, default: &Version) -> Result<TagVersionInput> {
        Ok(TagVersionInput::Provided(
            self.tag_version
                .clone()
                .unwrap_or_else(|| default.to_string()),
        ))
    }

    fn confirm_release(&self, _plan: &ReleasePlan) -> Result<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use monorel_operations::mocks::mock_packages;

    use super::*;

    fn args(bump: BumpKind) -> CiArgs {
        CiArgs {
            bump,
            preid: None,
            packages: Vec::new(),
            tag_version: None,
        }
    }

    #[test]
    fn no_package_arguments_select_every_package() -> anyhow::Result<()> {
        let provider = ArgsPromptProvider::from(args(BumpKind::Patch));
        let available = mock_packages(&["a", "b", "c"]);

        let PackageSelection::Selected(selected) = provider.select_packages(&available)? else {
            anyhow::bail!("expected a selection");
        };

        assert_eq!(selected, available);
        Ok(())
    }

    #[test]
    fn named_packages_are_selected() -> anyhow::Result<()> {
        let provider = ArgsPromptProvider::from(CiArgs {
            packages: vec!["c".to_string(), "a".to_string()],
            ..args(BumpKind::Minor)
        });

        let PackageSelection::Selected(selected) =
            provider.select_packages(&mock_packages(&["a", "b", "c"]))?
        else {
            anyhow::bail!("expected a selection");
        };

        let names: Vec<_> = selected.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["c", "a"]);
        Ok(())
    }

    #[test]
    fn unknown_package_is_rejected_with_the_available_names() {
        let provider = ArgsPromptProvider::from(CiArgs {
            packages: vec!["nope".to_string()],
            ..args(BumpKind::Patch)
        });

        let err = provider
            .select_packages(&mock_packages(&["a", "b"]))
            .expect_err("unknown package should fail");

        assert!(err.is_input_error());
        assert_eq!(err.to_string(), "unknown package 'nope' (available: a, b)");
    }

    #[test]
    fn missing_preid_cancels_channel_selection() -> anyhow::Result<()> {
        let provider = ArgsPromptProvider::from(args(BumpKind::Prerelease));

        assert!(matches!(
            provider.select_channel()?,
            ChannelSelection::Cancelled
        ));
        Ok(())
    }

    #[test]
    fn tag_version_falls_back_to_the_default() -> anyhow::Result<()> {
        let provider = ArgsPromptProvider::from(args(BumpKind::Patch));

        let TagVersionInput::Provided(value) =
            provider.input_tag_version(&Version::new(3, 1, 0))?
        else {
            anyhow::bail!("expected a tag version");
        };

        assert_eq!(value, "3.1.0");
        Ok(())
    }

    #[test]
    fn argument_answers_are_not_interactive() {
        let provider = ArgsPromptProvider::from(CiArgs {
            preid: Some(PreReleaseChannel::Rc),
            tag_version: Some("4.0.0".to_string()),
            ..args(BumpKind::Premajor)
        });

        assert!(!provider.is_interactive());
        assert!(matches!(
            provider.select_channel(),
            Ok(ChannelSelection::Selected(PreReleaseChannel::Rc))
        ));
        assert!(matches!(
            provider.input_tag_version(&Version::new(1, 0, 0)),
            Ok(TagVersionInput::Provided(v)) if v == "4.0.0"
        ));
    }
}
