use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use deploy_tools::version::{get_deployment_version_with, is_invalid_upgrade};

use super::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct DeploymentVersionArgs {
    /// Directory the release tarball was extracted into
    pub extract_path: PathBuf,
}

#[derive(Args)]
pub struct CheckUpgradeArgs {
    /// Currently deployed version
    pub current_version: String,

    /// Version being deployed
    pub new_version: String,
}

#[derive(Serialize)]
pub struct DeploymentVersionOutput {
    pub extract_path: String,
    pub version: String,
}

#[derive(Serialize)]
pub struct CheckUpgradeOutput {
    pub current_version: String,
    pub new_version: String,
    pub invalid: bool,
}

pub fn run_deployment_version(
    args: DeploymentVersionArgs,
    global: &GlobalArgs,
) -> CmdResult<DeploymentVersionOutput> {
    let version = get_deployment_version_with(&global.config, &args.extract_path)?;

    Ok((
        DeploymentVersionOutput {
            extract_path: args.extract_path.display().to_string(),
            version,
        },
        0,
    ))
}

/// Exits 1 when the upgrade path is not supported, so scripts can branch on it.
pub fn run_check_upgrade(
    args: CheckUpgradeArgs,
    _global: &GlobalArgs,
) -> CmdResult<CheckUpgradeOutput> {
    let invalid = is_invalid_upgrade(&args.current_version, &args.new_version);
    let exit_code = if invalid { 1 } else { 0 };

    Ok((
        CheckUpgradeOutput {
            current_version: args.current_version,
            new_version: args.new_version,
            invalid,
        },
        exit_code,
    ))
}
