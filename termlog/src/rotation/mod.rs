// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod print_logger;
pub mod rotating_file;
pub mod rotating_logger;
pub mod rotation_reporter;

// Re-export.
pub use print_logger::*;
pub use rotating_file::*;
pub use rotating_logger::*;
pub use rotation_reporter::*;
