// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod decl_macros;
pub mod log_error;
pub mod sync_ext;

// Re-export.
pub use log_error::*;
pub use sync_ext::*;
