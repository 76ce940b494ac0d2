use crate::defaults::DeployConfig;
use crate::error::{Error, Result};
use chrono::{DateTime, Local, TimeZone};
use std::env;
use std::fmt::Write;
use std::path::{Component, Path, PathBuf};

/// Env var that points at an explicit config file.
pub const CONFIG_ENV: &str = "DEPLOY_TOOLS_CONFIG";

/// Config file path: `$DEPLOY_TOOLS_CONFIG`, else `~/.config/deploy-tools/config.json`
pub fn config_json() -> Result<PathBuf> {
    if let Ok(path) = env::var(CONFIG_ENV) {
        if !path.is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    let home = env::var("HOME").map_err(|_| {
        Error::internal_unexpected("HOME environment variable not set".to_string())
    })?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("deploy-tools")
        .join("config.json"))
}

/// Deployment directory for the current local time.
pub fn make_deploy_path() -> Result<PathBuf> {
    make_deploy_path_with(&crate::defaults::load_config())
}

pub fn make_deploy_path_with(config: &DeployConfig) -> Result<PathBuf> {
    deploy_path_at(config, &Local::now())
}

/// Deployment directory for a fixed instant.
///
/// Fails with `config.invalid_value` when `timestamp_format` is not a valid
/// strftime string.
pub fn deploy_path_at<Tz: TimeZone>(config: &DeployConfig, at: &DateTime<Tz>) -> Result<PathBuf>
where
    Tz::Offset: std::fmt::Display,
{
    let mut timestamp = String::new();
    write!(timestamp, "{}", at.format(&config.timestamp_format)).map_err(|_| {
        Error::config_invalid_value(
            "timestamp_format",
            Some(config.timestamp_format.clone()),
            "is not a valid strftime format",
        )
    })?;
    Ok(config.deployments_dir.join(timestamp))
}

/// Parent of the deployments root, used as the deploy user's `HOME`.
///
/// Resolves `..` lexically the way `abspath(join(dir, '..'))` would.
pub fn deploy_home(config: &DeployConfig) -> PathBuf {
    let base = if config.deployments_dir.is_absolute() {
        config.deployments_dir.clone()
    } else {
        env::current_dir()
            .map(|cwd| cwd.join(&config.deployments_dir))
            .unwrap_or_else(|_| config.deployments_dir.clone())
    };
    normalize(&base.join(".."))
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn config_at(root: &str) -> DeployConfig {
        DeployConfig {
            deployments_dir: PathBuf::from(root),
            ..DeployConfig::default()
        }
    }

    #[test]
    fn deploy_path_uses_timestamp_format() {
        let at = NaiveDate::from_ymd_opt(2017, 3, 9)
            .unwrap()
            .and_hms_opt(7, 5, 2)
            .unwrap()
            .and_utc();

        let path = deploy_path_at(&DeployConfig::default(), &at).unwrap();
        assert_eq!(
            path,
            PathBuf::from("/home/zulip/deployments/2017-03-09-07-05-02")
        );
    }

    #[test]
    fn deploy_paths_sort_with_time() {
        let config = DeployConfig::default();
        let earlier = Utc.with_ymd_and_hms(2016, 12, 31, 23, 59, 59).unwrap();
        let later = Utc.with_ymd_and_hms(2017, 1, 1, 0, 0, 0).unwrap();

        assert!(deploy_path_at(&config, &earlier).unwrap() < deploy_path_at(&config, &later).unwrap());
    }

    #[test]
    fn make_deploy_path_matches_layout() {
        let path = make_deploy_path_with(&config_at("/srv/deployments")).unwrap();
        assert_eq!(path.parent(), Some(Path::new("/srv/deployments")));

        let name = path.file_name().unwrap().to_string_lossy().to_string();
        let re = regex::Regex::new(r"^\d{4}-\d{2}-\d{2}-\d{2}-\d{2}-\d{2}$").unwrap();
        assert!(re.is_match(&name), "unexpected name {}", name);
    }

    #[test]
    fn invalid_timestamp_format_is_an_error() {
        let config = DeployConfig {
            timestamp_format: "%Y-%Q".to_string(),
            ..DeployConfig::default()
        };

        let err = make_deploy_path_with(&config).unwrap_err();
        assert_eq!(err.code.as_str(), "config.invalid_value");
        assert_eq!(err.details["key"], "timestamp_format");
    }

    #[test]
    fn deploy_home_is_parent_of_root() {
        assert_eq!(deploy_home(&DeployConfig::default()), PathBuf::from("/home/zulip"));
        assert_eq!(deploy_home(&config_at("/srv/deployments/")), PathBuf::from("/srv"));
    }
}
