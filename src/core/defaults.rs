use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::paths;

/// Settings shared by the deployment helpers.
///
/// Every field can be overridden from a JSON config file; missing fields
/// fall back to the built-in values below.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployConfig {
    #[serde(default = "default_deployments_dir")]
    pub deployments_dir: PathBuf,

    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,

    #[serde(default = "default_lock_timeout_secs")]
    pub lock_timeout_secs: u64,

    #[serde(default = "default_lock_poll_interval_secs")]
    pub lock_poll_interval_secs: u64,

    #[serde(default = "default_release_prefix")]
    pub release_prefix: String,

    #[serde(default = "default_version_file")]
    pub version_file: String,

    #[serde(default = "default_deploy_user")]
    pub deploy_user: String,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            deployments_dir: default_deployments_dir(),
            timestamp_format: default_timestamp_format(),
            lock_timeout_secs: default_lock_timeout_secs(),
            lock_poll_interval_secs: default_lock_poll_interval_secs(),
            release_prefix: default_release_prefix(),
            version_file: default_version_file(),
            deploy_user: default_deploy_user(),
        }
    }
}

impl DeployConfig {
    /// Directory whose existence marks a deployment in progress.
    pub fn lock_dir(&self) -> PathBuf {
        self.deployments_dir.join("lock")
    }

    pub fn lock_timeout(&self) -> Duration {
        Duration::from_secs(self.lock_timeout_secs)
    }

    pub fn lock_poll_interval(&self) -> Duration {
        Duration::from_secs(self.lock_poll_interval_secs)
    }

    fn validate(self) -> Result<Self> {
        if self.deployments_dir.as_os_str().is_empty() {
            return Err(Error::config_invalid_value(
                "deployments_dir",
                None,
                "must not be empty",
            ));
        }
        if StrftimeItems::new(&self.timestamp_format).any(|item| item == Item::Error) {
            return Err(Error::config_invalid_value(
                "timestamp_format",
                Some(self.timestamp_format.clone()),
                "is not a valid strftime format",
            ));
        }
        if self.timestamp_format.contains('/') {
            return Err(Error::config_invalid_value(
                "timestamp_format",
                Some(self.timestamp_format.clone()),
                "must not produce path separators",
            ));
        }
        if self.release_prefix.is_empty() {
            return Err(Error::config_invalid_value(
                "release_prefix",
                None,
                "must not be empty",
            ));
        }
        Ok(self)
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_deployments_dir() -> PathBuf {
    PathBuf::from("/home/zulip/deployments")
}

fn default_timestamp_format() -> String {
    "%Y-%m-%d-%H-%M-%S".to_string()
}

fn default_lock_timeout_secs() -> u64 {
    300
}

fn default_lock_poll_interval_secs() -> u64 {
    3
}

fn default_release_prefix() -> String {
    "zulip-server".to_string()
}

fn default_version_file() -> String {
    "version.py".to_string()
}

fn default_deploy_user() -> String {
    "zulip".to_string()
}

// =============================================================================
// Loading functions
// =============================================================================

/// Load the config, falling back to built-in defaults on any error.
pub fn load_config() -> DeployConfig {
    load_config_from_file().unwrap_or_default()
}

fn load_config_from_file() -> Result<DeployConfig> {
    let path = paths::config_json()?;

    if !path.exists() {
        return Err(Error::internal_unexpected("config.json not found"));
    }

    load_config_from(&path)
}

/// Load config from an explicit JSON file. Errors are reported, not swallowed.
pub fn load_config_from(path: &Path) -> Result<DeployConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        Error::internal_io(e.to_string(), Some(format!("read {}", path.display())))
    })?;

    let mut config: DeployConfig = serde_json::from_str(&content)
        .map_err(|e| Error::config_invalid_json(path.display().to_string(), e))?;

    let raw = config.deployments_dir.to_string_lossy().to_string();
    let expanded = shellexpand::full(&raw).map_err(|e| {
        Error::config_invalid_value("deployments_dir", Some(raw.clone()), e.to_string())
    })?;
    config.deployments_dir = PathBuf::from(expanded.as_ref());

    config.validate()
}
