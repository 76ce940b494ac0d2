//! File I/O primitives with consistent error handling.

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Read file contents with standardized error handling.
///
/// Wraps `fs::read_to_string` with consistent `Error::internal_io` formatting.
pub fn read_file(path: &Path, operation: &str) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| Error::internal_io(e.to_string(), Some(operation.to_string())))
}

/// `mkdir -p`: create `path` and any missing parents.
///
/// An existing directory is fine; an existing file at `path` is an error.
pub fn mkdir_p(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| {
        Error::internal_io(e.to_string(), Some(format!("create {}", path.display())))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn read_file_succeeds_for_existing_file() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "test content").unwrap();

        let content = read_file(temp.path(), "test read").unwrap();
        assert!(content.contains("test content"));
    }

    #[test]
    fn read_file_returns_error_for_missing_file() {
        let err = read_file(Path::new("/nonexistent/path.txt"), "test read").unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");
    }

    #[test]
    fn mkdir_p_creates_nested_dirs_and_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("a").join("b").join("c");

        mkdir_p(&nested).unwrap();
        mkdir_p(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn mkdir_p_fails_over_existing_file() {
        let temp = NamedTempFile::new().unwrap();
        let err = mkdir_p(temp.path()).unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");
    }
}
