// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod truncate;
pub mod width_oracle;

// Re-export.
pub use truncate::*;
pub use width_oracle::*;
