use std::path::PathBuf;

use deploy_tools::paths;

use super::GlobalArgs;

/// Path printed by `make_deploy_path`; consumed by shell scripts, so it is plain text.
pub fn run(global: &GlobalArgs) -> deploy_tools::Result<PathBuf> {
    paths::make_deploy_path_with(&global.config)
}
