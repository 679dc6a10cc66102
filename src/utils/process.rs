//! External command execution.
//!
//! Every command goes through [`run_command`] so the debug log shows exactly
//! what was executed, and failures carry the full command line plus stderr.

use std::ffi::OsStr;
use std::path::Path;
use std::process::Output;

use tokio::process::Command;

use crate::error::{Error, Result};

/// Render a program and its arguments the way a shell user would type them.
pub fn display_command<S: AsRef<OsStr>>(program: impl AsRef<OsStr>, args: &[S]) -> String {
    let mut line = program.as_ref().to_string_lossy().into_owned();
    for arg in args {
        line.push(' ');
        line.push_str(&arg.as_ref().to_string_lossy());
    }
    line
}

/// Run `program` with `args`, optionally in `cwd`, and capture its output.
///
/// # Returns
///
/// * `Ok(Output)` - The command exited with status 0
/// * `Err(Error::CommandFailed)` - The command could not be spawned or exited non-zero
pub async fn run_command<S: AsRef<OsStr>>(
    program: impl AsRef<OsStr>,
    args: &[S],
    cwd: Option<&Path>,
) -> Result<Output> {
    let command_line = display_command(&program, args);
    log::debug!("Running: {command_line}");

    let mut command = Command::new(program.as_ref());
    command.args(args).kill_on_drop(true);
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    let output = command.output().await.map_err(|e| Error::CommandFailed {
        command: command_line.clone(),
        reason: format!("failed to execute: {e}"),
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let reason = match output.status.code() {
            Some(code) => format!("exit code {code}: {}", stderr.trim()),
            None => format!("terminated by signal: {}", stderr.trim()),
        };
        return Err(Error::CommandFailed {
            command: command_line,
            reason,
        });
    }

    log::debug!("{command_line} finished");
    Ok(output)
}
