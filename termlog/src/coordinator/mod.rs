// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod multi_row;
pub mod output_device;
pub mod render_ops;
pub mod segment_join;
pub mod single_line;

// Re-export.
pub use multi_row::*;
pub use output_device::*;
pub use render_ops::*;
pub use segment_join::*;
pub use single_line::*;
