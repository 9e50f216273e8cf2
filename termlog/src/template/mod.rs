// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod protected;
pub mod template_engine;

// Re-export.
pub use protected::*;
pub use template_engine::*;
