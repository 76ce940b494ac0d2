use std::fs;
use std::path::Path;
use std::process::Command;
use std::thread;
use std::time::Duration;

use deploy_tools::defaults::DeployConfig;
use deploy_tools::lock::{acquire_deployment_lock, is_locked, release_deployment_lock_with};
use tempfile::TempDir;

fn write_config(dir: &Path, timeout_secs: u64) -> std::path::PathBuf {
    let config_path = dir.join("config.json");
    let config = serde_json::json!({
        "deployments_dir": dir.join("deployments"),
        "lock_timeout_secs": timeout_secs,
        "lock_poll_interval_secs": 1,
    });
    fs::create_dir_all(dir.join("deployments")).unwrap();
    fs::write(&config_path, config.to_string()).unwrap();
    config_path
}

fn config_in(dir: &Path, timeout_secs: u64) -> DeployConfig {
    DeployConfig {
        deployments_dir: dir.join("deployments"),
        lock_timeout_secs: timeout_secs,
        lock_poll_interval_secs: 1,
        ..DeployConfig::default()
    }
}

#[test]
fn waiting_process_gets_lock_after_release() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("deployments")).unwrap();
    let config = config_in(temp.path(), 10);

    acquire_deployment_lock(&config, "./rerun").unwrap();

    let holder = config.clone();
    let releaser = thread::spawn(move || {
        thread::sleep(Duration::from_millis(1500));
        release_deployment_lock_with(&holder).unwrap();
    });

    acquire_deployment_lock(&config, "./rerun").unwrap();
    releaser.join().unwrap();
    assert!(is_locked(&config));
}

#[test]
fn lock_command_exits_1_on_timeout() {
    let temp = TempDir::new().unwrap();
    let config_path = write_config(temp.path(), 1);
    fs::create_dir(temp.path().join("deployments").join("lock")).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_deploy-tools"))
        .args(["--config", config_path.to_str().unwrap()])
        .args(["lock", "./upgrade-zulip release.tar.gz"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Another deployment in progress; waiting for lock..."));
    assert!(stdout.contains("Deployment already in progress.  Please run"));
    assert!(stdout.contains("  ./upgrade-zulip release.tar.gz"));
}

#[test]
fn lock_then_unlock_via_cli() {
    let temp = TempDir::new().unwrap();
    let config_path = write_config(temp.path(), 5);
    let lock_dir = temp.path().join("deployments").join("lock");

    let lock = Command::new(env!("CARGO_BIN_EXE_deploy-tools"))
        .args(["--config", config_path.to_str().unwrap(), "lock", "./rerun"])
        .output()
        .unwrap();
    assert!(lock.status.success());
    assert!(lock_dir.is_dir());

    let unlock = Command::new(env!("CARGO_BIN_EXE_deploy-tools"))
        .args(["--config", config_path.to_str().unwrap(), "unlock"])
        .output()
        .unwrap();
    assert!(unlock.status.success());
    assert!(!lock_dir.exists());

    let again = Command::new(env!("CARGO_BIN_EXE_deploy-tools"))
        .args(["--config", config_path.to_str().unwrap(), "unlock"])
        .output()
        .unwrap();
    assert_eq!(again.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&again.stdout).contains("internal.io_error"));
}
