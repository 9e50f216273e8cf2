// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{io::{Result, Write},
          sync::{Arc, Mutex}};

use strip_ansi_escapes::strip;

/// An in-memory destination. Clones share the inner buffer, so hand one clone to an
/// `OutputDevice` and keep another to read back what was written.
#[derive(Clone, Debug, Default)]
pub struct StdoutMock {
    pub buffer: Arc<Mutex<Vec<u8>>>,
}

impl StdoutMock {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// # Panics
    ///
    /// Panics if the buffer lock is poisoned.
    #[must_use]
    pub fn get_copy_of_buffer(&self) -> Vec<u8> { self.buffer.lock().unwrap().clone() }

    /// # Panics
    ///
    /// Panics if the buffer lock is poisoned or the buffer is not valid UTF-8.
    #[must_use]
    pub fn get_copy_of_buffer_as_string(&self) -> String {
        String::from_utf8(self.get_copy_of_buffer()).expect("utf8")
    }

    /// # Panics
    ///
    /// Panics if the buffer lock is poisoned or the buffer is not valid UTF-8.
    #[must_use]
    pub fn get_copy_of_buffer_as_string_strip_ansi(&self) -> String {
        String::from_utf8(strip(self.get_copy_of_buffer())).expect("utf8")
    }

    /// Returns everything written so far and empties the buffer, so the next read only
    /// sees output produced after this call.
    ///
    /// # Panics
    ///
    /// Panics if the buffer lock is poisoned or the buffer is not valid UTF-8.
    #[must_use]
    pub fn take_buffer_as_string(&self) -> String {
        let taken = std::mem::take(&mut *self.buffer.lock().unwrap());
        String::from_utf8(taken).expect("utf8")
    }

    /// Like [`Self::take_buffer_as_string`], with cursor up and down sequences spelled
    /// out: `ESC[1A` reads `{UP}`, `ESC[2A` reads `{UP2}`, `ESC[1B` reads `{DOWN}` and so
    /// on. Every other escape is left as is.
    ///
    /// # Panics
    ///
    /// See [`Self::take_buffer_as_string`].
    #[must_use]
    pub fn take_buffer_with_cursor_moves(&self) -> String {
        spell_cursor_moves(&self.take_buffer_as_string())
    }

    /// # Panics
    ///
    /// Panics if the buffer lock is poisoned.
    pub fn clear(&self) { self.buffer.lock().unwrap().clear(); }
}

fn spell_cursor_moves(text: &str) -> String {
    let mut acc = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("\x1b[") {
        acc.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let digits = after.chars().take_while(char::is_ascii_digit).count();
        let word = match after[digits..].chars().next() {
            Some('A') => Some("UP"),
            Some('B') => Some("DOWN"),
            _ => None,
        };
        match word {
            Some(word) if digits > 0 => {
                let count = &after[..digits];
                acc.push('{');
                acc.push_str(word);
                if count != "1" {
                    acc.push_str(count);
                }
                acc.push('}');
                rest = &after[digits + 1..];
            }
            _ => {
                acc.push_str("\x1b[");
                rest = after;
            }
        }
    }
    acc.push_str(rest);
    acc
}

impl Write for StdoutMock {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<()> { Ok(()) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn clones_share_the_buffer() {
        let mut stdout_mock = StdoutMock::default();
        let reader = stdout_mock.clone();

        stdout_mock.write_all(b"\x1b[31mfetching...\x1b[39m").unwrap();

        assert_eq!(reader.get_copy_of_buffer_as_string(), "\x1b[31mfetching...\x1b[39m");
        assert_eq!(reader.get_copy_of_buffer_as_string_strip_ansi(), "fetching...");
    }

    #[test]
    fn take_empties_the_buffer() {
        let mut stdout_mock = StdoutMock::default();

        stdout_mock.write_all(b"first").unwrap();
        assert_eq!(stdout_mock.take_buffer_as_string(), "first");

        stdout_mock.write_all(b"second").unwrap();
        assert_eq!(stdout_mock.take_buffer_as_string(), "second");
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "");
    }

    #[test]
    fn cursor_moves_are_spelled_out() {
        let mut stdout_mock = StdoutMock::default();

        stdout_mock
            .write_all(b"\x1b[1A\rrow\x1b[31m!\x1b[39m\x1b[1B\r\x1b[12A\x1b[2B")
            .unwrap();

        assert_eq!(
            stdout_mock.take_buffer_with_cursor_moves(),
            "{UP}\rrow\x1b[31m!\x1b[39m{DOWN}\r{UP12}{DOWN2}"
        );
    }
}
