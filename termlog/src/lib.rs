// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! # termlog
//!
//! Many independent producers ([`Logger`]s) write completed lines and live, frequently
//! overwritten "partial" status text to a shared destination, without garbling each
//! other's output. A terminal has exactly one cursor and one current line, so every
//! destination gets one [`OutputDevice`] that arbitrates which producer's unterminated
//! content is visible and how it is redrawn.
//!
//! # Table of contents
//!
//! <!-- TOC -->
//!
//! - [Quick start](#quick-start)
//! - [Partial lines](#partial-lines)
//! - [Color templates](#color-templates)
//! - [Module layout](#module-layout)
//!
//! <!-- /TOC -->
//!
//! # Quick start
//!
//! ```
//! use termlog::{LogFlags, Logger, OutputDevice};
//! use termlog_test_fixtures::StdoutMock;
//!
//! let stdout_mock = StdoutMock::default();
//! let device = OutputDevice::new(stdout_mock.clone());
//!
//! let downloads = Logger::new(&device, "[dl] ", LogFlags::empty());
//! downloads.print("fetching...").unwrap();
//! downloads.print(" done.\n").unwrap();
//!
//! assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "[dl] fetching... done.\n");
//! ```
//!
//! # Partial lines
//!
//! Text without a trailing line terminator is a partial line. It is shown immediately
//! and redrawn in place on every update. When several loggers share a destination their
//! partial lines are joined (in registration order) on the last line of the terminal, or,
//! in multi-row mode ([`Logger::enable_multiline_mode`]), each one gets its own row.
//! Partial content that does not fit the terminal width is shortened with an ellipsis,
//! keeping the front and the most recent tail visible.
//!
//! # Color templates
//!
//! When enabled, `@(red:some text)` renders `some text` in red, `@(bold,cyan)` opens
//! styles that stay on until `@(r)`, and tags with unknown names such as `@(garbage)` are
//! left alone. Arguments passed through [`printf!`] are never scanned for tags.
//!
//! # Module layout
//!
//! - [`ansi`]: SGR codes, escape-aware width measurement, the [`ColorRegistry`].
//! - [`template`]: `@(...)` expansion.
//! - [`width`]: terminal width discovery and truncation.
//! - [`coordinator`]: per-destination render state.
//! - [`logger`]: the producer facing API.
//! - [`duration`], [`rotation`], [`facade`]: elapsed time formatting, size based log
//!   file rotation, and a process-wide default logger.

// Enforce strict error handling in production library code only. Tests are allowed to
// use .unwrap() (workspace `Cargo.toml` config allows it).
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach sources.
pub mod ansi;
pub mod common;
pub mod coordinator;
pub mod duration;
pub mod facade; // Not glob re-exported, call as `termlog::facade::print()`.
pub mod logger;
pub mod rotation;
pub mod template;
pub mod width;

// Re-export.
pub use ansi::*;
pub use common::*;
pub use coordinator::*;
pub use duration::*;
pub use logger::*;
pub use rotation::*;
pub use template::*;
pub use width::*;
