// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod ansi_text;
pub mod color_registry;
pub mod sgr_code;
pub mod sgr_state;

// Re-export.
pub use ansi_text::*;
pub use color_registry::*;
pub use sgr_code::*;
pub use sgr_state::*;
