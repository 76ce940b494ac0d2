//! Release version lookup and upgrade-path validation.

use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::defaults::{self, DeployConfig};
use crate::error::{Error, Result};
use crate::utils::io;

/// Version reported when the extracted tree carries none.
pub const DEFAULT_VERSION: &str = "0.0.0";

static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"ZULIP_VERSION = "(.*)""#).expect("version pattern is valid")
});

/// Find the version of the release extracted under `extract_path`.
pub fn get_deployment_version(extract_path: &Path) -> Result<String> {
    get_deployment_version_with(&defaults::load_config(), extract_path)
}

/// Scans the immediate entries of `extract_path` for the first directory whose
/// name starts with the release prefix and reads the version from its version
/// file. Only the first such directory is considered.
pub fn get_deployment_version_with(config: &DeployConfig, extract_path: &Path) -> Result<String> {
    let list_error = |e: std::io::Error| {
        Error::internal_io(
            e.to_string(),
            Some(format!("list {}", extract_path.display())),
        )
    };

    let entries = fs::read_dir(extract_path)
        .map_err(list_error)?
        .map(|entry| entry.map(|entry| entry.path()));

    let release_dir =
        find_release_dir(entries, &config.release_prefix).map_err(list_error)?;

    let Some(release_dir) = release_dir else {
        return Ok(DEFAULT_VERSION.to_string());
    };

    let version_path = release_dir.join(&config.version_file);
    let content = io::read_file(&version_path, &format!("read {}", version_path.display()))?;

    Ok(parse_version(&content).unwrap_or_else(|| DEFAULT_VERSION.to_string()))
}

/// First directory among `entries` whose name starts with `prefix`. A failed
/// entry read stops the scan with that error.
fn find_release_dir<I>(entries: I, prefix: &str) -> std::io::Result<Option<PathBuf>>
where
    I: IntoIterator<Item = std::io::Result<PathBuf>>,
{
    for entry in entries {
        let path = entry?;
        let matches_prefix = path
            .file_name()
            .map(|name| name.to_string_lossy().starts_with(prefix))
            .unwrap_or(false);
        if matches_prefix && path.is_dir() {
            return Ok(Some(path));
        }
    }
    Ok(None)
}

/// Extract the `ZULIP_VERSION = "..."` assignment from a version file.
pub fn parse_version(content: &str) -> Option<String> {
    VERSION_PATTERN
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Upgrades from 1.3.10 or older straight past 1.4.3 are not supported.
///
/// Comparison is plain string ordering, not semver: "1.10.0" sorts before "1.9.0".
pub fn is_invalid_upgrade(current_version: &str, new_version: &str) -> bool {
    new_version > "1.4.3" && current_version <= "1.3.10"
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_release(root: &Path, dir: &str, version_py: Option<&str>) {
        let release = root.join(dir);
        fs::create_dir_all(&release).unwrap();
        if let Some(content) = version_py {
            fs::write(release.join("version.py"), content).unwrap();
        }
    }

    #[test]
    fn reads_version_from_release_dir() {
        let temp = TempDir::new().unwrap();
        write_release(
            temp.path(),
            "zulip-server-1.4.2",
            Some("ZULIP_VERSION = \"1.4.2\"\n"),
        );

        assert_eq!(get_deployment_version(temp.path()).unwrap(), "1.4.2");
    }

    #[test]
    fn capture_stays_on_assignment_line() {
        assert_eq!(
            parse_version("ZULIP_VERSION = \"1.5.0-dev+git\"\nOTHER = 1\n").as_deref(),
            Some("1.5.0-dev+git")
        );
    }

    #[test]
    fn defaults_when_no_release_dir() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("something-else")).unwrap();
        fs::write(temp.path().join("zulip-server.tar.gz"), "").unwrap();

        assert_eq!(get_deployment_version(temp.path()).unwrap(), DEFAULT_VERSION);
    }

    #[test]
    fn defaults_when_pattern_missing() {
        let temp = TempDir::new().unwrap();
        write_release(temp.path(), "zulip-server-x", Some("VERSION = '1.0'\n"));

        assert_eq!(get_deployment_version(temp.path()).unwrap(), DEFAULT_VERSION);
    }

    #[test]
    fn unreadable_version_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        write_release(temp.path(), "zulip-server-1.4.2", None);

        let err = get_deployment_version(temp.path()).unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");
    }

    #[test]
    fn missing_extract_dir_is_an_error() {
        let err = get_deployment_version(Path::new("/nonexistent/extract")).unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");
    }

    #[test]
    fn unreadable_entry_stops_the_scan() {
        let temp = TempDir::new().unwrap();
        write_release(temp.path(), "zulip-server-1.4.2", None);

        let entries = vec![
            Err(std::io::Error::other("entry vanished")),
            Ok(temp.path().join("zulip-server-1.4.2")),
        ];
        let err = find_release_dir(entries, "zulip-server").unwrap_err();
        assert_eq!(err.to_string(), "entry vanished");
    }

    #[test]
    fn scan_skips_non_matching_entries() {
        let temp = TempDir::new().unwrap();
        write_release(temp.path(), "zulip-server-1.4.2", None);
        fs::write(temp.path().join("zulip-server.tar.gz"), "").unwrap();

        let entries = vec![
            Ok(temp.path().join("zulip-server.tar.gz")),
            Ok(temp.path().join("other")),
            Ok(temp.path().join("zulip-server-1.4.2")),
        ];
        let found = find_release_dir(entries, "zulip-server").unwrap();
        assert_eq!(found, Some(temp.path().join("zulip-server-1.4.2")));
    }

    #[test]
    fn honors_configured_prefix_and_file() {
        let temp = TempDir::new().unwrap();
        let release = temp.path().join("acme-release-2");
        fs::create_dir(&release).unwrap();
        fs::write(release.join("VERSION"), "ZULIP_VERSION = \"2.0\"").unwrap();

        let config = DeployConfig {
            release_prefix: "acme-release".to_string(),
            version_file: "VERSION".to_string(),
            ..DeployConfig::default()
        };
        assert_eq!(get_deployment_version_with(&config, temp.path()).unwrap(), "2.0");
    }

    #[test]
    fn invalid_upgrade_boundaries() {
        assert!(is_invalid_upgrade("1.3.10", "1.4.4"));
        assert!(!is_invalid_upgrade("1.3.11", "1.4.4"));
        assert!(!is_invalid_upgrade("1.3.10", "1.4.3"));
    }

    #[test]
    fn invalid_upgrade_uses_string_ordering() {
        // "1.3.9" > "1.3.10" as strings, so it is not treated as old enough.
        assert!(!is_invalid_upgrade("1.3.9", "1.5.0"));
        assert!(is_invalid_upgrade("1.2.0", "1.5.0"));
        // "1.10.0" < "1.4.3" as strings.
        assert!(!is_invalid_upgrade("1.3.0", "1.10.0"));
    }
}
