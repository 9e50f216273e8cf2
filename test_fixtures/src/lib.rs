// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! # Introduction
//!
//! This is a test fixtures library that provides reusable components for testing the
//! `termlog` crate. It is intended to be a
//! [`dev-dependency`](https://doc.rust-lang.org/cargo/reference/specifying-dependencies.html#dev-dependencies).
//!
//! 1. The output device fixtures capture everything a logger writes to its destination,
//!    so tests can assert on the exact bytes, or on the text with ANSI escapes removed.
//! 2. The temp dir fixture provides a scratch directory for rotating log file tests,
//!    which is removed when it goes out of scope.
//!
//! # stdout_fixtures
//!
//! ```
//! use std::io::Write;
//! use termlog_test_fixtures::StdoutMock;
//!
//! let mut stdout_mock = StdoutMock::default();
//! let stdout_mock_clone = stdout_mock.clone(); // Points to the same inner buffer.
//!
//! stdout_mock.write_all(b"\x1b[31mhello world\x1b[39m").unwrap();
//!
//! assert_eq!(stdout_mock_clone.get_copy_of_buffer_as_string_strip_ansi(), "hello world");
//! ```

// Attach sources.
pub mod output_device_fixtures;
pub mod temp_dir;

// Re-export.
pub use output_device_fixtures::*;
pub use temp_dir::*;
