// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::path::{Path, PathBuf};

use miette::IntoDiagnostic;

/// Scratch directory for log file tests, removed (with everything rotated into it) on
/// drop.
#[derive(Debug)]
pub struct TempDir {
    pub path: PathBuf,
}

/// Creates a uniquely named directory under [`std::env::temp_dir`].
///
/// # Errors
///
/// Returns an error if the directory can't be created.
pub fn create_temp_dir() -> miette::Result<TempDir> {
    let path = std::env::temp_dir().join(format!("termlog-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir(&path).into_diagnostic()?;
    Ok(TempDir { path })
}

impl TempDir {
    /// Path of a log file inside this directory. Intermediate directories are not
    /// created, so tests can check that the file destination creates them.
    #[must_use]
    pub fn log_file(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.path.join(relative)
    }

    /// Contents of a log file inside this directory, empty if it does not exist.
    #[must_use]
    pub fn read_log(&self, relative: impl AsRef<Path>) -> String {
        std::fs::read_to_string(self.log_file(relative)).unwrap_or_default()
    }
}

impl Drop for TempDir {
    fn drop(&mut self) { let _unused = std::fs::remove_dir_all(&self.path); }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn removed_on_drop_with_contents() {
        let temp_dir = create_temp_dir().unwrap();
        std::fs::write(temp_dir.log_file("app.log"), "line\n").unwrap();
        assert_eq!(temp_dir.read_log("app.log"), "line\n");

        let path = temp_dir.path.clone();
        drop(temp_dir);
        assert!(!path.exists());
    }

    #[test]
    fn missing_log_reads_empty() {
        let temp_dir = create_temp_dir().unwrap();
        assert_eq!(temp_dir.read_log("nested/app.log"), "");
        assert!(!temp_dir.log_file("nested").exists());
    }
}
