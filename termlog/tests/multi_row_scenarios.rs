// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Loggers that each own a terminal row, redrawn with cursor movement.

use pretty_assertions::assert_eq;
use termlog::{FixedWidthOracle, LogConfig, LogFlags, Logger, OutputDevice};
use termlog_test_fixtures::StdoutMock;

#[test]
fn each_logger_keeps_its_own_row() {
    let stdout_mock = StdoutMock::default();
    let device = OutputDevice::new_with_oracle(stdout_mock.clone(), FixedWidthOracle::new());
    let config = LogConfig::shared();
    let writer1 = Logger::new_with_config(&device, "", LogFlags::empty(), config.clone());

    writer1.enable_multiline_mode().unwrap();
    assert!(device.is_multiline_mode());
    writer1.print("writer1...").unwrap();
    assert_eq!(stdout_mock.take_buffer_with_cursor_moves(), "writer1...");

    let writer2 = Logger::new_with_config(&device, "", LogFlags::empty(), config);
    writer2.print("writer2...").unwrap();
    assert_eq!(stdout_mock.take_buffer_with_cursor_moves(), "\nwriter2...");

    writer1.print(" working...").unwrap();
    assert_eq!(stdout_mock.take_buffer_with_cursor_moves(), "{UP}\rwriter1... working...{DOWN}\r");
    writer1.print("  50 percent finished...").unwrap();
    assert_eq!(
        stdout_mock.take_buffer_with_cursor_moves(),
        "{UP}\rwriter1... working...  50 percent finished...{DOWN}\r"
    );

    // The cursor is back at column 0, the bottom row is rewritten.
    writer2.print(" working... ").unwrap();
    assert_eq!(stdout_mock.take_buffer_with_cursor_moves(), "\rwriter2... working... ");
    writer2.print("done.\n").unwrap();
    assert_eq!(stdout_mock.take_buffer_with_cursor_moves(), "done.\n");
    writer2.print("working again...").unwrap();
    assert_eq!(stdout_mock.take_buffer_with_cursor_moves(), "working again...");

    // Completing a row above finalizes it in place, the cursor comes back down.
    writer1
        .print("\rwriter1... working... 100 percent. done.     \n")
        .unwrap();
    assert_eq!(
        stdout_mock.take_buffer_with_cursor_moves(),
        "{UP2}\rwriter1... working... 100 percent. done.     {DOWN2}\r"
    );

    writer1.print("Hello").unwrap();
    assert_eq!(stdout_mock.take_buffer_with_cursor_moves(), "\nHello");
    writer1.close().unwrap();
    assert_eq!(stdout_mock.take_buffer_with_cursor_moves(), "\n");
    writer2.close().unwrap();
    assert_eq!(stdout_mock.take_buffer_with_cursor_moves(), "{UP2}\rworking again...{DOWN2}\r");
}

#[test]
fn rows_are_truncated_to_the_terminal_width() {
    let stdout_mock = StdoutMock::default();
    let device = OutputDevice::new_with_oracle(stdout_mock.clone(), FixedWidthOracle::new());
    let logger = Logger::new_with_config(&device, "", LogFlags::empty(), LogConfig::shared());
    logger.enable_multiline_mode().unwrap();
    logger.set_terminal_width(10);

    logger.print("0123456789abcdef").unwrap();
    assert_eq!(stdout_mock.take_buffer_with_cursor_moves(), "01234...ef");

    // Completed lines are never truncated.
    logger.print("\n").unwrap();
    assert_eq!(stdout_mock.take_buffer_with_cursor_moves(), "\r0123456789abcdef\n");
}

#[test]
fn hiding_partial_lines_blanks_the_row() {
    let stdout_mock = StdoutMock::default();
    let device = OutputDevice::new_with_oracle(stdout_mock.clone(), FixedWidthOracle::new());
    let logger = Logger::new_with_config(&device, "", LogFlags::empty(), LogConfig::shared());
    logger.enable_multiline_mode().unwrap();

    logger.print("working").unwrap();
    assert_eq!(stdout_mock.take_buffer_with_cursor_moves(), "working");
    logger.hide_partial_lines().unwrap();
    assert_eq!(stdout_mock.take_buffer_with_cursor_moves(), "\r       \r");

    logger.print(" more").unwrap();
    assert_eq!(stdout_mock.take_buffer_with_cursor_moves(), "");
    // The completed line takes the blanked row.
    logger.close().unwrap();
    assert_eq!(stdout_mock.take_buffer_with_cursor_moves(), "working more\n");
}
