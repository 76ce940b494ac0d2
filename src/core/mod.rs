pub mod defaults;
pub mod error;
pub mod lock;
pub mod management_log;
pub mod paths;
pub mod privileges;
pub mod version;

// Re-export common types for convenience
pub use defaults::DeployConfig;
pub use error::{Error, ErrorCode, Result};
pub use lock::{get_deployment_lock, release_deployment_lock};
pub use management_log::{log_management_command, ManagementLog};
pub use paths::make_deploy_path;
pub use privileges::su_to_zulip;
pub use version::{get_deployment_version, is_invalid_upgrade};
