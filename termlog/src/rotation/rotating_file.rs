// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fs::{self, File, OpenOptions},
          io::{self, Write},
          path::{Path, PathBuf}};

use crate::{LogError, PrintLogger, RotationEvent, RotationReporter, ok};

/// Size in bytes past which a [`RotatingFile`] rotates.
pub const ROTATE_SIZE: u64 = 10 * (1 << 20);

pub const ROTATED_SUFFIX: &str = ".old";

/// An append-only log file that moves itself aside once it grows past a size limit.
///
/// On rotation the file is renamed to `<path>.old` (replacing any previous one), a fresh
/// file is opened at `path`, and the previous handle is closed on a background thread.
///
/// Rotations and failures are recorded in the [`RotationReporter`] and reach the
/// [`PrintLogger`] side channel when [`RotationReporter::deliver`] is called, outside of
/// any lock. The side channel must not write to this file. Failed writes still return
/// their error; while no file is open they fail fast with
/// [`LogError::DestinationNotOpen`].
#[derive(Debug)]
pub struct RotatingFile {
    path: PathBuf,
    file: Option<File>,
    size: u64,
    rotate_size: u64,
    reporter: RotationReporter,
}

impl RotatingFile {
    /// Opens `path` for appending, creating it and its missing parent directories.
    /// Bytes already in the file count towards the rotation size.
    ///
    /// # Errors
    ///
    /// [`LogError::CreateLogDir`] or [`LogError::OpenLogFile`].
    pub fn open(
        path: impl Into<PathBuf>,
        side_channel: impl PrintLogger + 'static,
    ) -> Result<Self, LogError> {
        let path = path.into();
        let size = match fs::metadata(&path) {
            Ok(metadata) => metadata.len(),
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                if let Some(parent) = path.parent()
                    && !parent.as_os_str().is_empty()
                {
                    fs::create_dir_all(parent).map_err(|source| LogError::CreateLogDir {
                        path: parent.to_path_buf(),
                        source,
                    })?;
                }
                0
            }
            Err(source) => return Err(LogError::OpenLogFile { path, source }),
        };

        let file = open_append(&path).map_err(|source| LogError::OpenLogFile {
            path: path.clone(),
            source,
        })?;

        Ok(Self {
            path,
            file: Some(file),
            size,
            rotate_size: ROTATE_SIZE,
            reporter: RotationReporter::new(side_channel),
        })
    }

    #[must_use]
    pub fn with_rotate_size(mut self, rotate_size: u64) -> Self {
        self.rotate_size = rotate_size;
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path { &self.path }

    /// Bytes written since the last rotation (or in the file when it was opened).
    #[must_use]
    pub fn size(&self) -> u64 { self.size }

    #[must_use]
    pub fn is_open(&self) -> bool { self.file.is_some() }

    /// Shares the event queue, so reports can be delivered after this file has moved
    /// into an [`crate::OutputDevice`].
    #[must_use]
    pub fn reporter(&self) -> RotationReporter { self.reporter.clone() }

    #[must_use]
    pub fn rotated_path(&self) -> PathBuf {
        let mut rotated = self.path.clone().into_os_string();
        rotated.push(ROTATED_SUFFIX);
        PathBuf::from(rotated)
    }

    fn rotate(&mut self) {
        if let Err(error) = fs::rename(&self.path, self.rotated_path()) {
            self.reporter.record(RotationEvent::RenameFailed {
                path: self.path.clone(),
                error,
            });
        }

        if let Some(previous) = self.file.take() {
            std::thread::spawn(move || drop(previous));
        }
        match open_append(&self.path) {
            Ok(file) => self.file = Some(file),
            Err(error) => self.reporter.record(RotationEvent::ReopenFailed {
                path: self.path.clone(),
                error,
            }),
        }

        self.reporter.record(RotationEvent::Rotated {
            path: self.path.clone(),
            size: self.size,
        });
        self.size = 0;
    }

    fn record_write_error(&self, error: &io::Error) {
        self.reporter.record(RotationEvent::WriteFailed {
            path: self.path.clone(),
            error: io::Error::new(error.kind(), error.to_string()),
        });
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new()
        .read(true)
        .append(true)
        .create(true)
        .open(path)
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let Some(file) = self.file.as_mut() else {
            self.reporter.record(RotationEvent::NotOpen {
                path: self.path.clone(),
            });
            return Err(LogError::DestinationNotOpen {
                path: self.path.clone(),
            }
            .into());
        };

        let result = file.write(buf);
        match &result {
            Ok(written) => self.size += *written as u64,
            Err(error) => self.record_write_error(error),
        }
        if self.size > self.rotate_size {
            self.rotate();
        }
        result
    }

    fn flush(&mut self) -> io::Result<()> {
        let Some(file) = self.file.as_mut() else {
            return ok!();
        };
        let result = file.flush();
        if let Err(error) = &result {
            self.record_write_error(error);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TracingPrintLogger;
    use pretty_assertions::assert_eq;
    use termlog_test_fixtures::create_temp_dir;

    #[test]
    fn creates_missing_directories_and_counts_existing_bytes() {
        let temp_dir = create_temp_dir().unwrap();
        let path = temp_dir.log_file("nested/dir/app.log");

        let mut file = RotatingFile::open(&path, TracingPrintLogger).unwrap();
        file.write_all(b"hello\n").unwrap();
        assert_eq!(file.size(), 6);
        drop(file);

        let file = RotatingFile::open(&path, TracingPrintLogger).unwrap();
        assert_eq!(file.size(), 6);
        assert!(file.is_open());
    }

    #[test]
    fn rotates_past_the_limit() {
        let temp_dir = create_temp_dir().unwrap();
        let path = temp_dir.log_file("app.log");
        let mut file = RotatingFile::open(&path, TracingPrintLogger)
            .unwrap()
            .with_rotate_size(8);

        file.write_all(b"12345\n").unwrap();
        assert!(!file.rotated_path().exists());
        assert_eq!(file.reporter().pending(), 0);
        file.write_all(b"67890\n").unwrap();
        assert_eq!(file.size(), 0);
        // Only recorded, delivery happens once no lock is held.
        assert_eq!(file.reporter().pending(), 1);
        file.write_all(b"fresh\n").unwrap();
        file.flush().unwrap();

        assert_eq!(fs::read_to_string(file.rotated_path()).unwrap(), "12345\n67890\n");
        assert_eq!(temp_dir.read_log("app.log"), "fresh\n");
    }

    #[test]
    fn rotated_path_has_the_suffix() {
        let temp_dir = create_temp_dir().unwrap();
        let file = RotatingFile::open(temp_dir.log_file("x.log"), TracingPrintLogger).unwrap();
        assert_eq!(file.rotated_path(), temp_dir.log_file("x.log.old"));
    }
}
