// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// Simple macro to create a [`Result`] with an [`Ok`] variant. It is just syntactic sugar
/// that helps having to write `Ok(())`.
/// - If no arg is passed in then it will return `Ok(())`.
/// - If an arg is passed in then it will return `Ok($arg)`.
#[macro_export]
macro_rules! ok {
    // No args.
    () => {
        Ok(())
    };
    // With arg.
    ($value:expr) => {
        Ok($value)
    };
}

/// Formats and prints to a [`Logger`](crate::Logger). The format string is scanned for
/// color template tags, the arguments are not: each one is wrapped in
/// [`Protected`](crate::Protected) before formatting.
///
/// ```
/// use termlog::{printf, LogFlags, LogConfig, Logger, OutputDevice};
/// use termlog_test_fixtures::StdoutMock;
///
/// let stdout_mock = StdoutMock::default();
/// let logger = Logger::new_with_config(
///     &OutputDevice::new(stdout_mock.clone()), "", LogFlags::empty(), LogConfig::shared());
/// logger.enable_color_template();
///
/// printf!(logger, "@(red:{})\n", "@(green:not green)").unwrap();
/// assert_eq!(
///     stdout_mock.get_copy_of_buffer_as_string(),
///     "\x1b[31m@(green:not green)\x1b[39m\n"
/// );
/// ```
///
/// Values captured by name from the format string can't be wrapped, so they are
/// rejected at compile time. Pass them positionally.
///
/// ```compile_fail
/// use termlog::{printf, LogFlags, Logger, OutputDevice};
///
/// let logger = Logger::new(&OutputDevice::new(Vec::new()), "", LogFlags::empty());
/// let untrusted = "@(green:x)";
/// printf!(logger, "@(red:{untrusted})\n").unwrap();
/// ```
#[macro_export]
macro_rules! printf {
    ($logger:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {{
        $crate::assert_no_implicit_capture!($fmt);
        $logger.printf($crate::PrintfArgs::__from_protected(
            ::std::format_args!($fmt $(, $crate::Protected(&$arg))*)
        ))
    }};
}

/// Same as [`printf!`] but replaces the logger's current partial line, like
/// [`Logger::replace`](crate::Logger::replace).
#[macro_export]
macro_rules! replacef {
    ($logger:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {{
        $crate::assert_no_implicit_capture!($fmt);
        $logger.replacef($crate::PrintfArgs::__from_protected(
            ::std::format_args!($fmt $(, $crate::Protected(&$arg))*)
        ))
    }};
}

/// [`printf!`] for the process-wide default logger, see [`crate::facade`].
#[macro_export]
macro_rules! global_printf {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        $crate::assert_no_implicit_capture!($fmt);
        $crate::facade::printf($crate::PrintfArgs::__from_protected(
            ::std::format_args!($fmt $(, $crate::Protected(&$arg))*)
        ))
    }};
}

/// Fails to compile if `$fmt` captures a value by name.
#[doc(hidden)]
#[macro_export]
macro_rules! assert_no_implicit_capture {
    ($fmt:literal) => {
        const {
            ::std::assert!(
                !$crate::has_implicit_capture($fmt),
                "arguments must be passed positionally, captured names are not protected"
            );
        }
    };
}
