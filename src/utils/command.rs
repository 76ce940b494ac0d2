//! Subprocess execution with `set -x` style tracing.

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};

use crate::error::{Error, Result};
use crate::utils::color::{paint, WHITEONRED};

/// Passthrough options for [`run`].
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Join the arguments into one string and run it with `/bin/sh -c`.
    pub shell: bool,
    pub cwd: Option<PathBuf>,
    pub env: Vec<(OsString, OsString)>,
}

impl RunOptions {
    pub fn shell() -> Self {
        Self {
            shell: true,
            ..Self::default()
        }
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }
}

/// Print the command, run it with inherited stdio, and wait for it.
///
/// On a non-zero exit, prints an error block naming the invoking program and
/// returns `command.failed`.
pub fn run<S: AsRef<str>>(args: &[S], options: &RunOptions) -> Result<()> {
    let command_line = join(args);
    println!("+ {}", command_line);
    io::stdout().flush().ok();

    let mut cmd = build_command(args, &command_line, options)?;
    let status = cmd
        .status()
        .map_err(|e| Error::internal_io(e.to_string(), Some(format!("run {}", command_line))))?;

    if status.success() {
        return Ok(());
    }

    print_failure(&command_line);
    Err(failure(&command_line, status))
}

/// Run a command, capturing stdout, and return it trimmed.
pub fn subprocess_text_output<S: AsRef<str>>(args: &[S]) -> Result<String> {
    let command_line = join(args);
    let output = build_command(args, &command_line, &RunOptions::default())?
        .stderr(Stdio::inherit())
        .output()
        .map_err(|e| Error::internal_io(e.to_string(), Some(format!("run {}", command_line))))?;

    if !output.status.success() {
        return Err(failure(&command_line, output.status));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn join<S: AsRef<str>>(args: &[S]) -> String {
    args.iter()
        .map(|a| a.as_ref())
        .collect::<Vec<_>>()
        .join(" ")
}

fn build_command<S: AsRef<str>>(
    args: &[S],
    command_line: &str,
    options: &RunOptions,
) -> Result<Command> {
    let mut cmd = if options.shell {
        let mut cmd = Command::new("/bin/sh");
        cmd.arg("-c").arg(command_line);
        cmd
    } else {
        let (program, rest) = args.split_first().ok_or_else(|| {
            Error::validation_invalid_argument("args", "Command must not be empty", None)
        })?;
        let mut cmd = Command::new(program.as_ref());
        cmd.args(rest.iter().map(|a| a.as_ref()));
        cmd
    };

    if let Some(dir) = &options.cwd {
        cmd.current_dir(dir);
    }
    for (key, value) in &options.env {
        cmd.env(key, value);
    }
    Ok(cmd)
}

fn print_failure(command_line: &str) {
    let program = std::env::args().next().unwrap_or_default();
    println!();
    println!(
        "{}",
        paint(
            WHITEONRED,
            &format!("Error running a subcommand of {}: {}", program, command_line)
        )
    );
    println!(
        "{}",
        paint(
            WHITEONRED,
            "Actual error output for the subcommand is just above this."
        )
    );
    println!();
}

fn failure(command_line: &str, status: ExitStatus) -> Error {
    Error::command_failed(command_line, status.code())
}
