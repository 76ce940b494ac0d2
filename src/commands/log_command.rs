use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use deploy_tools::management_log::ManagementLog;

use super::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct LogCommandArgs {
    /// Audit log file (parent directories are created)
    pub log_path: PathBuf,

    /// Command line to record
    pub cmd: String,
}

#[derive(Serialize)]
pub struct LogCommandOutput {
    pub log_path: String,
    pub cmd: String,
}

pub fn run(args: LogCommandArgs, _global: &GlobalArgs) -> CmdResult<LogCommandOutput> {
    let mut log = ManagementLog::open(&args.log_path)?;
    log.record(&args.cmd)?;

    Ok((
        LogCommandOutput {
            log_path: log.path().display().to_string(),
            cmd: args.cmd,
        },
        0,
    ))
}
