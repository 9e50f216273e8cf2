// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io::{self, Write};

use crate::{RenderBuffer, display_width, ok, write_close_of, write_padding};

/// Tracks what is visible on the last line of a terminal when every active producer's
/// partial content is folded into that one line, and computes the minimal bytes that
/// take the screen to a new joined line.
///
/// - When the new line extends what is displayed and the cursor is still at its end,
///   only the new suffix is written.
/// - Otherwise the line is rewritten from column 0 (`\r`) and padded with spaces to
///   blank whatever the previous, longer, line left behind.
#[derive(Debug, Default)]
pub struct SingleLineRenderer {
    displayed: String,
    /// Width of `displayed`, excluding any padding written after it.
    displayed_width: usize,
    /// False after padding, the cursor then sits past the end of `displayed`.
    cursor_at_end: bool,
}

impl SingleLineRenderer {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn displayed(&self) -> &str { &self.displayed }

    /// Shows `joined` instead of what is currently displayed.
    ///
    /// # Errors
    ///
    /// Only if writing into `buffer` fails, which it does not for an in-memory buffer.
    pub fn render(&mut self, joined: &str, buffer: &mut RenderBuffer) -> io::Result<()> {
        if self.displayed.is_empty() {
            buffer.write_all(joined.as_bytes())?;
            self.set_displayed(joined, true);
        } else if self.cursor_at_end && joined.starts_with(self.displayed.as_str()) {
            buffer.write_all(joined[self.displayed.len()..].as_bytes())?;
            self.set_displayed(joined, true);
        } else {
            self.rewrite(joined, buffer)?;
        }
        ok!()
    }

    /// Finalizes `line` (which must not leave styles open) as its own terminal line,
    /// then shows `remaining`, the joined content of the producers still active, on the
    /// fresh line below.
    ///
    /// # Errors
    ///
    /// See [`Self::render`].
    pub fn complete(
        &mut self,
        line: &str,
        remaining: &str,
        buffer: &mut RenderBuffer,
    ) -> io::Result<()> {
        if self.displayed.is_empty() {
            buffer.write_all(line.as_bytes())?;
        } else if self.cursor_at_end && line.starts_with(self.displayed.as_str()) {
            buffer.write_all(line[self.displayed.len()..].as_bytes())?;
        } else {
            self.close_displayed(buffer)?;
            buffer.write_all(b"\r")?;
            buffer.write_all(line.as_bytes())?;
            write_padding(self.displayed_width.saturating_sub(display_width(line)), buffer);
        }
        buffer.write_all(b"\n")?;
        self.set_displayed("", true);
        self.render(remaining, buffer)
    }

    /// Blanks the line and returns the cursor to column 0.
    ///
    /// # Errors
    ///
    /// See [`Self::render`].
    pub fn clear(&mut self, buffer: &mut RenderBuffer) -> io::Result<()> {
        self.render("", buffer)
    }

    fn rewrite(&mut self, joined: &str, buffer: &mut RenderBuffer) -> io::Result<()> {
        self.close_displayed(buffer)?;
        buffer.write_all(b"\r")?;
        buffer.write_all(joined.as_bytes())?;

        let pad = self.displayed_width.saturating_sub(display_width(joined));
        if pad > 0 {
            write_close_of(joined, buffer)?;
            write_padding(pad, buffer);
        }

        if joined.is_empty() {
            if pad > 0 {
                buffer.write_all(b"\r")?;
            }
            self.set_displayed("", true);
        } else {
            self.set_displayed(joined, pad == 0);
        }
        ok!()
    }

    /// With the cursor at the end of the displayed text the terminal still has its
    /// trailing styles active; `\r` does not reset them.
    fn close_displayed(&self, buffer: &mut RenderBuffer) -> io::Result<()> {
        if self.cursor_at_end {
            write_close_of(&self.displayed, buffer)?;
        }
        ok!()
    }

    fn set_displayed(&mut self, text: &str, cursor_at_end: bool) {
        text.clone_into(&mut self.displayed);
        self.displayed_width = display_width(text);
        self.cursor_at_end = cursor_at_end;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(renderer: &mut SingleLineRenderer, joined: &str) -> String {
        let mut buffer = RenderBuffer::new();
        renderer.render(joined, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    fn complete(renderer: &mut SingleLineRenderer, line: &str, remaining: &str) -> String {
        let mut buffer = RenderBuffer::new();
        renderer.complete(line, remaining, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn appends_then_rewrites() {
        let mut renderer = SingleLineRenderer::new();
        assert_eq!(render(&mut renderer, "Testing..."), "Testing...");
        assert_eq!(
            render(&mut renderer, "Testing... | Writing Code..."),
            " | Writing Code..."
        );
        assert_eq!(
            complete(&mut renderer, "Writing Code... done.", "Testing..."),
            "\rWriting Code... done.       \nTesting..."
        );
        assert_eq!(complete(&mut renderer, "Testing... done.", ""), " done.\n");
        assert_eq!(renderer.displayed(), "");
    }

    #[test]
    fn shorter_text_is_padded_and_forces_a_rewrite() {
        let mut renderer = SingleLineRenderer::new();
        render(&mut renderer, "Hello Susan.");
        assert_eq!(render(&mut renderer, "Hello Bob."), "\rHello Bob.  ");
        assert_eq!(render(&mut renderer, "Hello Al."), "\rHello Al. ");
        assert_eq!(render(&mut renderer, "Hello Ala"), "\rHello Ala");
        assert_eq!(render(&mut renderer, "Hello Alan."), "n.");
    }

    #[test]
    fn unchanged_text_writes_nothing() {
        let mut renderer = SingleLineRenderer::new();
        render(&mut renderer, "same");
        assert_eq!(render(&mut renderer, "same"), "");
    }

    #[test]
    fn clearing_blanks_and_returns_to_column_zero() {
        let mut renderer = SingleLineRenderer::new();
        render(&mut renderer, "abc");
        let mut buffer = RenderBuffer::new();
        renderer.clear(&mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "\r   \r");
        assert_eq!(render(&mut renderer, "x"), "x");
    }

    #[test]
    fn open_styles_are_closed_before_a_rewrite() {
        let mut renderer = SingleLineRenderer::new();
        render(&mut renderer, "\x1b[31mred");
        assert_eq!(
            complete(&mut renderer, "other", "\x1b[31mred"),
            "\x1b[39m\rother\n\x1b[31mred"
        );
    }
}
