use std::path::Path;
use std::process::{Command, Output};

use crate::{OperationError, Result};

/// Runs an argument vector in `dir`, capturing its output.
pub(crate) fn run_captured(command: &[String], dir: &Path) -> Result<Output> {
    let (program, args) = command.split_first().ok_or(OperationError::EmptyCommand)?;

    Command::new(program)
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|source| OperationError::CommandSpawn {
            command: command.join(" "),
            dir: dir.to_path_buf(),
            source,
        })
}

/// Stdout followed by stderr, lossily decoded.
pub(crate) fn combined_output(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    match (stdout.trim().is_empty(), stderr.trim().is_empty()) {
        (true, _) => stderr.into_owned(),
        (false, true) => stdout.into_owned(),
        (false, false) => format!("{stdout}\n{stderr}"),
    }
}
