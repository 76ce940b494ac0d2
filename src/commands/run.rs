use clap::Args;
use std::path::PathBuf;

use deploy_tools::command::{self, RunOptions};

use super::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct RunArgs {
    /// Join the arguments and run them with `sh -c`
    #[arg(long)]
    pub shell: bool,

    /// Working directory for the command
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Command and arguments (use `--` before flags meant for the command)
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Returns the child's exit status as the process exit code.
pub fn run(args: RunArgs, _global: &GlobalArgs) -> CmdResult<()> {
    let mut options = RunOptions {
        shell: args.shell,
        ..RunOptions::default()
    };
    if let Some(dir) = args.cwd {
        options = options.current_dir(dir);
    }

    match command::run(args.args.as_slice(), &options) {
        Ok(()) => Ok(((), 0)),
        Err(err) => match err.exit_code() {
            Some(code) => Ok(((), code)),
            None => Err(err),
        },
    }
}
