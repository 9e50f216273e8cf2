// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{ops::Deref,
          path::{Path, PathBuf}};

use crate::{LogError, LogFlags, Logger, OutputDevice, PrintLogger, PrintfArgs, ROTATE_SIZE,
            RotatingFile, RotationReporter};

/// Every line is stamped with its ISO 8601 time.
pub const ROTATING_LOGGER_PREFIX: &str = "@(dim:{isodate}) ";

/// A [`Logger`] writing to a [`RotatingFile`]. Files are sequential destinations, so
/// partial lines are held until they are completed.
///
/// The write methods don't return errors. Failed writes and rotations go to the
/// [`PrintLogger`] side channel once the logger is no longer locked, so a [`tracing`]
/// subscriber may write to this logger. Writes made through [`Self::logger`] leave their
/// reports for the next call here.
///
/// ```
/// use termlog::{RotatingLogger, TracingPrintLogger};
/// use termlog_test_fixtures::create_temp_dir;
///
/// let temp_dir = create_temp_dir().unwrap();
/// let path = temp_dir.log_file("logs/app.log");
/// let logger = RotatingLogger::new(&path, TracingPrintLogger).unwrap();
/// logger.println("started");
///
/// assert!(temp_dir.read_log("logs/app.log").ends_with("\x1b[0m started\n"));
/// ```
#[derive(Clone, Debug)]
pub struct RotatingLogger {
    path: PathBuf,
    logger: Logger,
    reporter: RotationReporter,
}

impl RotatingLogger {
    /// Rotates at [`ROTATE_SIZE`].
    ///
    /// # Errors
    ///
    /// If the log directory can't be created or the file can't be opened.
    pub fn new(
        path: impl Into<PathBuf>,
        side_channel: impl PrintLogger + 'static,
    ) -> miette::Result<Self> {
        Self::new_with_rotate_size(path, side_channel, ROTATE_SIZE)
    }

    /// # Errors
    ///
    /// See [`Self::new`].
    pub fn new_with_rotate_size(
        path: impl Into<PathBuf>,
        side_channel: impl PrintLogger + 'static,
        rotate_size: u64,
    ) -> miette::Result<Self> {
        let path = path.into();
        let file = RotatingFile::open(path.clone(), side_channel)?.with_rotate_size(rotate_size);
        let reporter = file.reporter();
        let device = OutputDevice::new_sequential(file);
        let logger = Logger::new(&device, ROTATING_LOGGER_PREFIX, LogFlags::empty());
        tracing::debug!(path = %path.display(), rotate_size, "opened rotating log file");
        Ok(Self {
            path,
            logger,
            reporter,
        })
    }

    pub fn print(&self, text: &str) { self.settle(self.logger.print(text)); }

    pub fn println(&self, text: &str) { self.settle(self.logger.println(text)); }

    /// Called by the [`crate::printf!`] macro.
    pub fn printf(&self, args: PrintfArgs<'_>) { self.settle(self.logger.printf(args)); }

    pub fn replace(&self, text: &str) { self.settle(self.logger.replace(text)); }

    /// Called by the [`crate::replacef!`] macro.
    pub fn replacef(&self, args: PrintfArgs<'_>) { self.settle(self.logger.replacef(args)); }

    /// Completes a pending line and closes the logger for every clone.
    pub fn close(&self) { self.settle(self.logger.close()); }

    #[must_use]
    pub fn path(&self) -> &Path { &self.path }

    #[must_use]
    pub fn logger(&self) -> &Logger { &self.logger }

    /// Failures were recorded by the file, they reach the side channel here.
    fn settle(&self, result: Result<(), LogError>) {
        let _unused = result;
        self.reporter.deliver();
    }
}

impl Deref for RotatingLogger {
    type Target = Logger;

    fn deref(&self) -> &Self::Target { &self.logger }
}

#[cfg(test)]
mod tests {
    use std::{sync::mpsc, thread, time::Duration};

    use super::*;
    use crate::{FixedWidthOracle, LogConfig, TracingPrintLogger, create_tracing_subscriber,
                printf};
    use pretty_assertions::assert_eq;
    use serial_test::serial;
    use termlog_test_fixtures::{StdoutMock, create_temp_dir};
    use tracing::{Level, subscriber::set_default};

    #[serial]
    #[test]
    fn partial_lines_wait_for_completion() {
        let temp_dir = create_temp_dir().unwrap();
        let logger =
            RotatingLogger::new(temp_dir.log_file("app.log"), TracingPrintLogger).unwrap();

        logger.print("step one...");
        assert_eq!(temp_dir.read_log("app.log"), "");
        logger.print(" done\n");

        let contents = temp_dir.read_log("app.log");
        assert!(contents.starts_with("\x1b[2m"));
        assert!(contents.ends_with("\x1b[0m step one... done\n"));
    }

    #[serial]
    #[test]
    fn rotates_by_line() {
        let temp_dir = create_temp_dir().unwrap();
        let path = temp_dir.log_file("app.log");
        let logger = RotatingLogger::new_with_rotate_size(&path, TracingPrintLogger, 1).unwrap();

        logger.println("first");
        printf!(logger, "{}\n", "second");

        assert!(temp_dir.read_log("app.log.old").ends_with("second\n"));
        assert_eq!(temp_dir.read_log("app.log"), "");
        assert_eq!(logger.path(), path.as_path());
    }

    #[serial]
    #[test]
    fn failures_go_to_the_side_channel_only() {
        let stdout_mock = StdoutMock::default();
        let side_device =
            OutputDevice::new_with_oracle(stdout_mock.clone(), FixedWidthOracle::new());
        let side_channel =
            Logger::new_with_config(&side_device, "", LogFlags::empty(), LogConfig::shared());

        let temp_dir = create_temp_dir().unwrap();
        let path = temp_dir.log_file("logs/app.log");
        let logger = RotatingLogger::new_with_rotate_size(&path, side_channel, 1).unwrap();
        std::fs::remove_dir_all(temp_dir.log_file("logs")).unwrap();

        // The write lands in the unlinked file, rotating can't recreate it.
        logger.println("first");
        // No file is open now.
        logger.println("second");

        let reports = stdout_mock.get_copy_of_buffer_as_string();
        assert!(reports.contains("Error renaming log file"));
        assert!(reports.contains("Error opening new log file"));
        assert!(reports.contains("is not open, the write was dropped"));
        assert_eq!(reports.lines().count(), 3);
    }

    #[serial]
    #[test]
    fn tracing_into_the_rotating_logger_does_not_deadlock() {
        let temp_dir = create_temp_dir().unwrap();
        let path = temp_dir.log_file("app.log");
        let (sender, receiver) = mpsc::channel();

        thread::spawn(move || {
            let logger =
                RotatingLogger::new_with_rotate_size(&path, TracingPrintLogger, 1).unwrap();
            let _drop_guard =
                set_default(create_tracing_subscriber(logger.logger(), Level::DEBUG));
            logger.println("first");
            logger.println("second");
            let _unused = sender.send(());
        });

        assert!(receiver.recv_timeout(Duration::from_secs(5)).is_ok());
        // The rotation events were written into the log itself.
        let contents = format!(
            "{}{}",
            temp_dir.read_log("app.log.old"),
            temp_dir.read_log("app.log")
        );
        assert!(contents.contains("rotated log file"));
    }
}
