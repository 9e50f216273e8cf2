// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::LogConfig;

/// Lets escape sequences through, for loggers that don't override it.
pub fn enable_color() { LogConfig::global().set_color(true); }

/// Strips escape sequences, template generated or literal.
pub fn disable_color() { LogConfig::global().set_color(false); }

/// Expands `@(...)` tags in printed text.
pub fn enable_color_template() { LogConfig::global().set_color_template(true); }

pub fn disable_color_template() { LogConfig::global().set_color_template(false); }

/// Ends the line after every write, as if it ended with a line terminator.
pub fn enable_auto_newlines() { LogConfig::global().set_auto_newlines(true); }

pub fn disable_auto_newlines() { LogConfig::global().set_auto_newlines(false); }

/// Makes `name` usable in templates, expanding to `ESC [ code m`. Codes 30 to 37 and 90
/// to 97 (foreground colors) are closed with `ESC [ 39 m`, anything else with a full
/// reset. Existing names, standard ones included, are overwritten.
pub fn add_ansi_color_code(name: impl Into<String>, code: u8) {
    LogConfig::global().registry.add(name, code);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FixedWidthOracle, LogFlags, Logger, OutputDevice};
    use pretty_assertions::assert_eq;
    use serial_test::serial;
    use termlog_test_fixtures::StdoutMock;

    #[serial]
    #[test]
    fn toggles_reach_loggers_without_overrides() {
        let stdout_mock = StdoutMock::default();
        let device = OutputDevice::new_with_oracle(stdout_mock.clone(), FixedWidthOracle::new());
        let logger = Logger::new(&device, "", LogFlags::empty());
        let overridden = Logger::new(&device, "", LogFlags::empty());
        overridden.disable_color_template();

        enable_color_template();
        add_ansi_color_code("toggles-test-magenta", 35);
        logger.println("@(toggles-test-magenta:m)").unwrap();
        overridden.println("@(toggles-test-magenta:m)").unwrap();

        disable_color();
        logger.println("@(red:plain)\x1b[1m").unwrap();

        enable_auto_newlines();
        logger.print("auto").unwrap();

        disable_auto_newlines();
        enable_color();
        disable_color_template();

        assert_eq!(
            stdout_mock.get_copy_of_buffer_as_string(),
            "\x1b[35mm\x1b[39m\n@(toggles-test-magenta:m)\nplain\nauto\n"
        );
    }
}
