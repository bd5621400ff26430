mod release;

use std::path::Path;

use clap::{Args, Subcommand};
use monorel_core::{BumpKind, PreReleaseChannel};

use crate::error::{CliError, Result};
use crate::interaction::{ArgsPromptProvider, TerminalPromptProvider, stdin_is_terminal};

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Release without prompting, taking every answer from the arguments
    Ci(CiArgs),
}

#[derive(Args, Debug)]
pub(crate) struct CiArgs {
    /// Version increment to apply
    #[arg(value_enum)]
    pub bump: BumpKind,

    /// Pre-release channel (required for pre* increments)
    #[arg(long, value_enum)]
    pub preid: Option<PreReleaseChannel>,

    /// Package to release; repeat for several (default: every package)
    #[arg(long = "package", short = 'p', value_name = "NAME")]
    pub packages: Vec<String>,

    /// Tag for a release of some but not all packages (default: the workspace version)
    #[arg(long, value_name = "VERSION")]
    pub tag_version: Option<String>,
}

/// Runs the interactive release when no subcommand is given.
pub(crate) fn execute(command: Option<Commands>, start_path: &Path) -> Result<()> {
    match command {
        None => {
            if !stdin_is_terminal() {
                return Err(CliError::NotATty);
            }
            release::run(TerminalPromptProvider, start_path)
        }
        Some(Commands::Ci(args)) => release::run(ArgsPromptProvider::from(args), start_path),
    }
}
