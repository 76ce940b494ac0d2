use clap::Args;
use serde::Serialize;

use deploy_tools::lock::{get_deployment_lock_with, release_deployment_lock_with};
use deploy_tools::log_status;

use super::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct LockArgs {
    /// Command to suggest re-running if the lock cannot be taken
    pub error_rerun_script: String,
}

#[derive(Serialize)]
pub struct LockOutput {
    pub lock_dir: String,
    pub locked: bool,
}

/// Waits for the lock. On timeout the process exits with status 1 after
/// printing recovery instructions.
pub fn run(args: LockArgs, global: &GlobalArgs) -> CmdResult<LockOutput> {
    get_deployment_lock_with(&global.config, &args.error_rerun_script)?;

    let lock_dir = global.config.lock_dir().display().to_string();
    log_status!("lock", "Acquired {}", lock_dir);

    Ok((
        LockOutput {
            lock_dir,
            locked: true,
        },
        0,
    ))
}

pub fn run_unlock(global: &GlobalArgs) -> CmdResult<LockOutput> {
    release_deployment_lock_with(&global.config)?;

    Ok((
        LockOutput {
            lock_dir: global.config.lock_dir().display().to_string(),
            locked: false,
        },
        0,
    ))
}
