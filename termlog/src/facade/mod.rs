// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! A process-wide default [`crate::Logger`] behind free functions, for programs that
//! want one logger and no plumbing. It writes to [`crate::OutputDevice::stderr`] with
//! [`crate::LogFlags::STD`] and no prefix until told otherwise.
//!
//! The toggles here change [`crate::LogConfig::global`], so they affect every logger
//! created with [`crate::Logger::new`], not just the default one.

// Attach sources.
pub mod global_logger;
pub mod global_toggles;

// Re-export.
pub use global_logger::*;
pub use global_toggles::*;
