//! Deployment lock.
//!
//! The lock is a directory under the deployments root. `mkdir` is atomic, so
//! whichever process creates it holds the lock until the directory is removed.
//! Nothing cleans up after a crashed holder; the directory must be removed by hand.

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::thread;
use std::time::Instant;

use crate::defaults::{self, DeployConfig};
use crate::error::{Error, ErrorCode, Result};
use crate::utils::color::{paint, FAIL, WARNING};

/// Wait for the deployment lock, exiting the process with status 1 on timeout.
///
/// Errors other than a timeout (e.g. permission denied on the deployments root)
/// are returned.
pub fn get_deployment_lock(error_rerun_script: &str) -> Result<()> {
    get_deployment_lock_with(&defaults::load_config(), error_rerun_script)
}

pub fn get_deployment_lock_with(config: &DeployConfig, error_rerun_script: &str) -> Result<()> {
    match acquire_deployment_lock(config, error_rerun_script) {
        Err(e) if e.code == ErrorCode::LockTimeout => {
            println!(
                "{}",
                paint(
                    FAIL,
                    &timeout_message(&config.lock_dir(), error_rerun_script)
                )
            );
            std::process::exit(1);
        }
        other => other,
    }
}

/// Poll for the lock until the configured timeout.
///
/// Returns `lock.timeout` instead of exiting, for callers that handle it themselves.
pub fn acquire_deployment_lock(config: &DeployConfig, error_rerun_script: &str) -> Result<()> {
    let lock_dir = config.lock_dir();
    let timeout = config.lock_timeout();
    let start = Instant::now();

    while start.elapsed() < timeout {
        match try_lock(&lock_dir) {
            Ok(true) => return Ok(()),
            Ok(false) => {}
            Err(e) => return Err(e),
        }

        println!(
            "{}",
            paint(
                WARNING,
                &format!(
                    "Another deployment in progress; waiting for lock... (If no deployment is running, rmdir {})",
                    lock_dir.display()
                )
            )
        );
        io::stdout().flush().ok();
        thread::sleep(config.lock_poll_interval());
    }

    Err(Error::lock_timeout(
        lock_dir.display().to_string(),
        config.lock_timeout_secs,
        error_rerun_script,
    ))
}

/// Single attempt. `Ok(false)` means another process holds the lock.
///
/// A missing deployments root is reported as busy as well, matching a plain
/// `mkdir` failure; the poll loop then runs out the timeout.
pub fn try_lock(lock_dir: &Path) -> Result<bool> {
    match fs::create_dir(lock_dir) {
        Ok(()) => Ok(true),
        Err(e)
            if matches!(
                e.kind(),
                io::ErrorKind::AlreadyExists | io::ErrorKind::NotFound
            ) =>
        {
            Ok(false)
        }
        Err(e) => Err(Error::internal_io(
            e.to_string(),
            Some(format!("create {}", lock_dir.display())),
        )),
    }
}

pub fn is_locked(config: &DeployConfig) -> bool {
    config.lock_dir().is_dir()
}

/// Remove the lock directory under the configured deployments root. Fails
/// when no lock is held.
pub fn release_deployment_lock() -> Result<()> {
    release_deployment_lock_with(&defaults::load_config())
}

pub fn release_deployment_lock_with(config: &DeployConfig) -> Result<()> {
    let lock_dir = config.lock_dir();
    fs::remove_dir_all(&lock_dir).map_err(|e| {
        Error::internal_io(
            e.to_string(),
            Some(format!("remove {}", lock_dir.display())),
        )
    })
}

fn timeout_message(lock_dir: &Path, error_rerun_script: &str) -> String {
    format!(
        "Deployment already in progress.  Please run\n  {}\nmanually when the previous deployment finishes, or run\n  rmdir {}\nif the previous deployment crashed.",
        error_rerun_script,
        lock_dir.display()
    )
}
