// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Small byte-level building blocks shared by the renderers. Everything is queued into
//! an in-memory buffer, which the [`crate::OutputDevice`] hands to its writer in one
//! `write_all` call.

use std::io::{self, Write};

use crossterm::{QueueableCommand,
                cursor::{MoveDown, MoveUp}};

use crate::{SgrState, ok};

pub type RenderBuffer = Vec<u8>;

/// Writes the sequence that closes every style `text` leaves open, if any.
pub fn write_close_of(text: &str, buffer: &mut RenderBuffer) -> io::Result<()> {
    if let Some(code) = SgrState::track(text).close_code() {
        write!(buffer, "{code}")?;
    }
    ok!()
}

pub fn write_padding(columns: usize, buffer: &mut RenderBuffer) {
    buffer.extend(std::iter::repeat_n(b' ', columns));
}

/// `CUU n`. `rows` is always at least 1 here; `CUU 0` moves one row on most terminals.
pub fn write_cursor_up(rows: usize, buffer: &mut RenderBuffer) -> io::Result<()> {
    buffer.queue(MoveUp(clamp_rows(rows)))?;
    ok!()
}

/// `CUD n`.
pub fn write_cursor_down(rows: usize, buffer: &mut RenderBuffer) -> io::Result<()> {
    buffer.queue(MoveDown(clamp_rows(rows)))?;
    ok!()
}

fn clamp_rows(rows: usize) -> u16 { u16::try_from(rows.max(1)).unwrap_or(u16::MAX) }

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn as_string(buffer: RenderBuffer) -> String { String::from_utf8(buffer).unwrap() }

    #[test]
    fn cursor_movement() {
        let mut buffer = RenderBuffer::new();
        write_cursor_up(2, &mut buffer).unwrap();
        write_cursor_down(1, &mut buffer).unwrap();
        assert_eq!(as_string(buffer), "\x1b[2A\x1b[1B");
    }

    #[test]
    fn close_and_padding() {
        let mut buffer = RenderBuffer::new();
        write_close_of("\x1b[31mred", &mut buffer).unwrap();
        write_padding(3, &mut buffer);
        write_close_of("plain", &mut buffer).unwrap();
        assert_eq!(as_string(buffer), "\x1b[39m   ");
    }
}
