// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io::{Error, ErrorKind, Result, Write};

/// A destination that rejects every write. Use it to check that destination failures
/// reach the caller of the operation that triggered them.
#[derive(Clone, Copy, Debug, Default)]
pub struct FailingWriter;

impl Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> Result<usize> {
        Err(Error::new(ErrorKind::BrokenPipe, "destination closed"))
    }

    fn flush(&mut self) -> Result<()> { Ok(()) }
}
