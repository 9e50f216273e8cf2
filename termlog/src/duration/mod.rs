// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod format_duration;
pub mod timer;

// Re-export.
pub use format_duration::*;
pub use timer::*;
