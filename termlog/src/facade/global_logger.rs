// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::LazyLock;

use crate::{LogError, LogFlags, Logger, OutputDevice, PrintfArgs, RwLockRecoverExt,
            StdRwLock};

static DEFAULT_LOGGER: LazyLock<StdRwLock<Logger>> =
    LazyLock::new(|| StdRwLock::new(Logger::new(&OutputDevice::stderr(), "", LogFlags::STD)));

/// A handle to the current default logger. It keeps working (on its old destination)
/// after [`set_output`].
#[must_use]
pub fn logger() -> Logger { DEFAULT_LOGGER.read_recover().clone() }

/// Moves the default logger to `device`, keeping its prefix and flags. The previous
/// logger is closed, completing its partial line.
///
/// # Errors
///
/// If completing the previous logger's partial line fails.
pub fn set_output(device: &OutputDevice) -> Result<(), LogError> {
    let previous = {
        let mut current = DEFAULT_LOGGER.write_recover();
        let replacement = Logger::new(device, current.prefix(), current.flags());
        std::mem::replace(&mut *current, replacement)
    };
    previous.close()
}

pub fn set_flags(flags: LogFlags) { logger().set_flags(flags); }

#[must_use]
pub fn flags() -> LogFlags { logger().flags() }

pub fn set_prefix(prefix: impl Into<String>) { logger().set_prefix(prefix); }

#[must_use]
pub fn prefix() -> String { logger().prefix() }

/// # Errors
///
/// See [`Logger::print`].
pub fn print(text: &str) -> Result<(), LogError> { logger().print(text) }

/// # Errors
///
/// See [`Logger::print`].
pub fn println(text: &str) -> Result<(), LogError> { logger().println(text) }

/// Use the [`crate::global_printf!`] macro.
///
/// # Errors
///
/// See [`Logger::print`].
pub fn printf(args: PrintfArgs<'_>) -> Result<(), LogError> { logger().printf(args) }

/// Completes the default logger's partial line. Later writes are dropped until the
/// next [`set_output`].
///
/// # Errors
///
/// See [`Logger::print`].
pub fn close() -> Result<(), LogError> { logger().close() }

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FixedWidthOracle, global_printf};
    use pretty_assertions::assert_eq;
    use serial_test::serial;
    use termlog_test_fixtures::StdoutMock;

    fn redirect() -> StdoutMock {
        let stdout_mock = StdoutMock::default();
        set_output(&OutputDevice::new_with_oracle(
            stdout_mock.clone(),
            FixedWidthOracle::new(),
        ))
        .unwrap();
        set_flags(LogFlags::empty());
        set_prefix("");
        stdout_mock
    }

    #[serial]
    #[test]
    fn defaults() {
        set_output(&OutputDevice::new(Vec::new())).unwrap();
        set_flags(LogFlags::STD);
        assert_eq!(flags(), LogFlags::STD);
    }

    #[serial]
    #[test]
    fn prints_through_the_redirected_default() {
        let stdout_mock = redirect();
        set_prefix("[app] ");
        assert_eq!(prefix(), "[app] ");

        print("loading").unwrap();
        println("... ok").unwrap();
        global_printf!("{} items\n", 3).unwrap();
        assert_eq!(
            stdout_mock.get_copy_of_buffer_as_string(),
            "[app] loading... ok\n[app] 3 items\n"
        );
    }

    #[serial]
    #[test]
    fn set_output_completes_the_previous_partial_line() {
        let first = redirect();
        print("half").unwrap();
        let second = redirect();
        assert_eq!(first.get_copy_of_buffer_as_string(), "half\n");

        print("other").unwrap();
        close().unwrap();
        print("dropped").unwrap();
        assert_eq!(second.get_copy_of_buffer_as_string(), "other\n");
    }
}
