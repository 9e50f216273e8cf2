// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod line_prefix;
pub mod log_config;
pub mod log_flags;
pub mod logger_impl;
pub mod partial_line;
pub mod tracing_bridge;

// Re-export.
pub use line_prefix::*;
pub use log_config::*;
pub use log_flags::*;
pub use logger_impl::*;
pub use partial_line::*;
pub use tracing_bridge::*;
