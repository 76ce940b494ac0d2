//! Audit log of management commands.
//!
//! Each `ManagementLog` owns one append handle for one file. Callers that log
//! to several files hold several loggers; nothing is registered globally.

use chrono::{DateTime, Local};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::utils::io;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

#[derive(Debug)]
pub struct ManagementLog {
    path: PathBuf,
    file: File,
}

impl ManagementLog {
    /// Open `log_path` for appending, creating its parent directory if needed.
    pub fn open(log_path: impl AsRef<Path>) -> Result<Self> {
        let path = log_path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                io::mkdir_p(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                Error::internal_io(e.to_string(), Some(format!("open {}", path.display())))
            })?;

        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `<timestamp>: Ran '<cmd>'`.
    pub fn record(&mut self, cmd: &str) -> Result<()> {
        self.record_at(cmd, &Local::now())
    }

    fn record_at(&mut self, cmd: &str, at: &DateTime<Local>) -> Result<()> {
        let line = format_entry(cmd, at);
        self.file
            .write_all(line.as_bytes())
            .and_then(|_| self.file.flush())
            .map_err(|e| {
                Error::internal_io(
                    e.to_string(),
                    Some(format!("append {}", self.path.display())),
                )
            })
    }
}

/// Open `log_path`, record `cmd`, and close it again.
pub fn log_management_command(cmd: &str, log_path: impl AsRef<Path>) -> Result<()> {
    ManagementLog::open(log_path)?.record(cmd)
}

fn format_entry(cmd: &str, at: &DateTime<Local>) -> String {
    format!("{}: Ran '{}'\n", at.format(TIMESTAMP_FORMAT), cmd)
}
