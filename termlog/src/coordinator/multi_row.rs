// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io::{self, Write};

use crate::{ProducerId, RenderBuffer, display_width, ok, write_close_of, write_cursor_down,
            write_cursor_up, write_padding};

#[derive(Debug)]
struct Row {
    /// [None] once the row is finalized, it is then static text that is never redrawn.
    owner: Option<ProducerId>,
    text: String,
    width: usize,
}

/// Gives every active producer its own terminal row, stacked in activation order with
/// the newest at the bottom. Rows above the bottom are redrawn with cursor-up,
/// rewrite, cursor-down; the cursor always returns to the bottom before a call ends.
///
/// ```text
/// row 0   writer1... working...  50 percent     <- CUU 1, \r, rewrite, CUD 1, \r
/// row 1   writer2... working...                  <- cursor lives here
/// ```
#[derive(Debug)]
pub struct MultiRowRenderer {
    rows: Vec<Row>,
    /// The cursor is at column 0 of an empty line below the last row.
    fresh: bool,
    /// The cursor is at the end of the last row's text (not valid when `fresh`).
    bottom_at_end: bool,
}

impl Default for MultiRowRenderer {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            fresh: true,
            bottom_at_end: true,
        }
    }
}

impl MultiRowRenderer {
    /// Starts with the cursor at column 0 of an empty line.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Number of rows that can still be redrawn, static rows between active ones
    /// included.
    #[must_use]
    pub fn row_count(&self) -> usize { self.rows.len() }

    /// Shows `text` in `id`'s row, claiming a new bottom row on first use.
    ///
    /// # Errors
    ///
    /// Only if writing into `buffer` fails, which it does not for an in-memory buffer.
    pub fn update(
        &mut self,
        id: ProducerId,
        text: &str,
        buffer: &mut RenderBuffer,
    ) -> io::Result<()> {
        let width = display_width(text);
        let Some(index) = self.row_index(id) else {
            if text.is_empty() {
                return ok!();
            }
            self.close_bottom(buffer)?;
            if !self.fresh {
                buffer.write_all(b"\n")?;
            }
            buffer.write_all(text.as_bytes())?;
            self.rows.push(Row {
                owner: Some(id),
                text: text.to_owned(),
                width,
            });
            self.fresh = false;
            self.bottom_at_end = true;
            return ok!();
        };

        if self.is_cursor_row(index) {
            let row = &self.rows[index];
            if self.bottom_at_end && text.starts_with(row.text.as_str()) {
                buffer.write_all(text[row.text.len()..].as_bytes())?;
                self.bottom_at_end = true;
            } else {
                self.close_bottom(buffer)?;
                buffer.write_all(b"\r")?;
                buffer.write_all(text.as_bytes())?;
                let pad = row.width.saturating_sub(width);
                if pad > 0 {
                    write_close_of(text, buffer)?;
                    write_padding(pad, buffer);
                }
                self.bottom_at_end = pad == 0;
            }
        } else {
            self.rewrite_above(index, text, buffer)?;
        }

        let row = &mut self.rows[index];
        text.clone_into(&mut row.text);
        row.width = width;
        ok!()
    }

    /// Finalizes `line` (which must not leave styles open) in `id`'s row. A producer
    /// without a row gets a new static row at the bottom.
    ///
    /// # Errors
    ///
    /// See [`Self::update`].
    pub fn complete(
        &mut self,
        id: ProducerId,
        line: &str,
        buffer: &mut RenderBuffer,
    ) -> io::Result<()> {
        let width = display_width(line);
        match self.row_index(id) {
            None => {
                self.close_bottom(buffer)?;
                if !self.fresh {
                    buffer.write_all(b"\n")?;
                }
                buffer.write_all(line.as_bytes())?;
                buffer.write_all(b"\n")?;
                self.rows.push(Row {
                    owner: None,
                    text: line.to_owned(),
                    width,
                });
                self.fresh = true;
            }
            Some(index) if self.is_cursor_row(index) => {
                let row = &self.rows[index];
                if self.bottom_at_end && line.starts_with(row.text.as_str()) {
                    buffer.write_all(line[row.text.len()..].as_bytes())?;
                } else {
                    self.close_bottom(buffer)?;
                    buffer.write_all(b"\r")?;
                    buffer.write_all(line.as_bytes())?;
                    write_padding(row.width.saturating_sub(width), buffer);
                }
                buffer.write_all(b"\n")?;
                self.finalize_row(index, line, width);
                self.fresh = true;
            }
            Some(index) => {
                self.rewrite_above(index, line, buffer)?;
                self.finalize_row(index, line, width);
            }
        }
        self.prune();
        ok!()
    }

    /// Blanks `id`'s row and forgets it. A bottom row is given back, so the next row
    /// or completed line takes its place; a row above stays as an empty static row.
    ///
    /// # Errors
    ///
    /// See [`Self::update`].
    pub fn release(&mut self, id: ProducerId, buffer: &mut RenderBuffer) -> io::Result<()> {
        let Some(index) = self.row_index(id) else {
            return ok!();
        };
        if self.is_cursor_row(index) {
            self.close_bottom(buffer)?;
            buffer.write_all(b"\r")?;
            let width = self.rows[index].width;
            if width > 0 {
                write_padding(width, buffer);
                buffer.write_all(b"\r")?;
            }
            self.rows.pop();
            self.fresh = true;
            self.bottom_at_end = true;
        } else {
            self.rewrite_above(index, "", buffer)?;
            self.finalize_row(index, "", 0);
        }
        self.prune();
        ok!()
    }

    /// Moves up to row `index`, rewrites it, and comes back down to column 0 of the
    /// cursor's line.
    fn rewrite_above(
        &mut self,
        index: usize,
        text: &str,
        buffer: &mut RenderBuffer,
    ) -> io::Result<()> {
        let distance = self.rows.len() - 1 - index + usize::from(self.fresh);
        self.close_bottom(buffer)?;
        write_cursor_up(distance, buffer)?;
        buffer.write_all(b"\r")?;
        buffer.write_all(text.as_bytes())?;
        write_close_of(text, buffer)?;
        write_padding(self.rows[index].width.saturating_sub(display_width(text)), buffer);
        write_cursor_down(distance, buffer)?;
        buffer.write_all(b"\r")?;
        if !self.fresh {
            self.bottom_at_end = false;
        }
        ok!()
    }

    /// With the cursor at the end of the bottom row the terminal still has that row's
    /// trailing styles active.
    fn close_bottom(&self, buffer: &mut RenderBuffer) -> io::Result<()> {
        if self.fresh || !self.bottom_at_end {
            return ok!();
        }
        if let Some(row) = self.rows.last() {
            write_close_of(&row.text, buffer)?;
        }
        ok!()
    }

    fn is_cursor_row(&self, index: usize) -> bool {
        !self.fresh && index + 1 == self.rows.len()
    }

    fn row_index(&self, id: ProducerId) -> Option<usize> {
        self.rows.iter().position(|row| row.owner == Some(id))
    }

    fn finalize_row(&mut self, index: usize, line: &str, width: usize) {
        let row = &mut self.rows[index];
        row.owner = None;
        line.clone_into(&mut row.text);
        row.width = width;
    }

    /// Static rows above the topmost active row can never be reached again.
    fn prune(&mut self) {
        let first_active = self
            .rows
            .iter()
            .position(|row| row.owner.is_some())
            .unwrap_or(self.rows.len());
        self.rows.drain(..first_active);
    }
}
