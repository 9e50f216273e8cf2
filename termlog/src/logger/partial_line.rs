// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{AnsiToken, SgrState, tokenize};

/// One visible character position: a grapheme cluster and the styles it is drawn with.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Cell {
    grapheme: String,
    style: SgrState,
}

/// The unterminated content of one logger, with terminal-like carriage return handling.
///
/// Text is appended as is. After a `\r` the write position moves back to the start of
/// the content and later text overwrites cells (grapheme and style) one by one, the way
/// a terminal would. The content is then re-rendered from the cells, so it never
/// contains the `\r` itself. Control sequences other than SGR styling do not survive an
/// overwrite.
///
/// ```
/// use termlog::PartialLine;
///
/// let mut partial_line = PartialLine::new();
/// partial_line.push("Progress:  10%");
/// partial_line.push("\rProgress:  2");
/// assert_eq!(partial_line.as_str(), "Progress:  20%");
/// ```
#[derive(Clone, Debug, Default)]
pub struct PartialLine {
    text: String,
    /// Cell index of the next write, [None] means the end of `text`.
    cursor: Option<usize>,
    /// Styles at the write position.
    pen: SgrState,
}

impl PartialLine {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn as_str(&self) -> &str { &self.text }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.text.is_empty() }

    /// Adds `fragment`, which must not contain a line terminator.
    pub fn push(&mut self, fragment: &str) {
        for (index, piece) in fragment.split('\r').enumerate() {
            if index > 0 {
                self.cursor = Some(0);
            }
            if piece.is_empty() {
                continue;
            }
            match self.cursor {
                None => {
                    self.text.push_str(piece);
                    self.pen.apply_text(piece);
                }
                Some(at) => self.overwrite(at, piece),
            }
        }
    }

    /// Empties the line and returns its content, with any styles it leaves open
    /// closed.
    pub fn take_line(&mut self) -> String {
        let mut line = std::mem::take(&mut self.text);
        SgrState::track(&line).write_close(&mut line);
        self.clear();
        line
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = None;
        self.pen.clear();
    }

    fn overwrite(&mut self, at: usize, piece: &str) {
        let mut cells = to_cells(&self.text);
        let mut cursor = at;
        for token in tokenize(piece) {
            match token {
                AnsiToken::Escape(escape) => self.pen.apply_escape(escape),
                AnsiToken::Grapheme(grapheme) => {
                    let cell = Cell {
                        grapheme: grapheme.to_owned(),
                        style: self.pen.clone(),
                    };
                    match cells.get_mut(cursor) {
                        Some(existing) => *existing = cell,
                        None => cells.push(cell),
                    }
                    cursor += 1;
                }
            }
        }

        self.cursor = (cursor < cells.len()).then_some(cursor);
        let trailing = if self.cursor.is_none() {
            self.pen.clone()
        } else {
            SgrState::new()
        };
        self.text = render_cells(&cells, &trailing);
    }
}

fn to_cells(text: &str) -> Vec<Cell> {
    let mut style = SgrState::new();
    let mut cells = Vec::new();
    for token in tokenize(text) {
        match token {
            AnsiToken::Escape(escape) => style.apply_escape(escape),
            AnsiToken::Grapheme(grapheme) => cells.push(Cell {
                grapheme: grapheme.to_owned(),
                style: style.clone(),
            }),
        }
    }
    cells
}

/// Each style run is opened where it starts and closed (or switched) where it ends.
/// `trailing` is the state the text ends in.
fn render_cells(cells: &[Cell], trailing: &SgrState) -> String {
    let mut acc = String::new();
    let mut current = SgrState::new();
    for cell in cells {
        current.write_transition(&cell.style, &mut acc);
        current.clone_from(&cell.style);
        acc.push_str(&cell.grapheme);
    }
    current.write_transition(trailing, &mut acc);
    acc
}
