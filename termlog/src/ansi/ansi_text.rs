// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Escape-aware view of a string: a sequence of grapheme clusters interleaved with ANSI
//! escape sequences. Escapes occupy no columns; grapheme clusters are never split, so a
//! base character and its combining marks are measured (and kept, or dropped) together.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::ESC;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AnsiToken<'a> {
    /// A complete escape sequence, including the leading `ESC`.
    Escape(&'a str),
    /// One extended grapheme cluster.
    Grapheme(&'a str),
}

impl AnsiToken<'_> {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            AnsiToken::Escape(it) | AnsiToken::Grapheme(it) => it,
        }
    }

    /// Number of terminal columns this token occupies.
    #[must_use]
    pub fn display_width(&self) -> usize {
        match self {
            AnsiToken::Escape(_) => 0,
            AnsiToken::Grapheme(it) => it.width(),
        }
    }
}

/// Splits `text` into escape sequences and grapheme clusters.
///
/// Recognized escapes:
/// - CSI: `ESC [` parameter bytes, intermediate bytes, one final byte.
/// - OSC: `ESC ]` up to `BEL` or `ESC \`.
/// - Any other `ESC x` pair.
///
/// An unterminated sequence runs to the end of the text.
#[must_use]
pub fn tokenize(text: &str) -> Vec<AnsiToken<'_>> {
    let mut acc = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        match rest.find(ESC) {
            Some(0) => {
                let len = escape_len(rest);
                acc.push(AnsiToken::Escape(&rest[..len]));
                rest = &rest[len..];
            }
            Some(start) => {
                acc.extend(rest[..start].graphemes(true).map(AnsiToken::Grapheme));
                rest = &rest[start..];
            }
            None => {
                acc.extend(rest.graphemes(true).map(AnsiToken::Grapheme));
                rest = "";
            }
        }
    }
    acc
}

/// Length in bytes of the escape sequence at the start of `text`, which must begin with
/// `ESC`.
fn escape_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    match bytes.get(1) {
        None => 1,
        Some(b'[') => {
            let mut index = 2;
            while let Some(&byte) = bytes.get(index) {
                match byte {
                    0x20..=0x3F => index += 1,
                    0x40..=0x7E => return index + 1,
                    _ => return index,
                }
            }
            index
        }
        Some(b']') => {
            let mut index = 2;
            while let Some(&byte) = bytes.get(index) {
                match byte {
                    0x07 => return index + 1,
                    0x1b if bytes.get(index + 1) == Some(&b'\\') => return index + 2,
                    _ => index += 1,
                }
            }
            index
        }
        Some(_) => {
            // The byte after ESC may start a multi byte char.
            1 + text[1..].chars().next().map_or(0, char::len_utf8)
        }
    }
}

/// Number of terminal columns `text` occupies, ignoring escape sequences.
#[must_use]
pub fn display_width(text: &str) -> usize {
    tokenize(text).iter().map(AnsiToken::display_width).sum()
}

/// Removes every ANSI escape sequence from `text`.
#[must_use]
pub fn strip_ansi(text: &str) -> String {
    if text.contains(ESC) {
        strip_ansi_escapes::strip_str(text)
    } else {
        text.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test]
    fn tokenize_mixed() {
        let tokens = tokenize("a\x1b[31mbc\x1b[39m");
        assert_eq!(
            tokens,
            vec![
                AnsiToken::Grapheme("a"),
                AnsiToken::Escape("\x1b[31m"),
                AnsiToken::Grapheme("b"),
                AnsiToken::Grapheme("c"),
                AnsiToken::Escape("\x1b[39m"),
            ]
        );
    }

    #[test]
    fn tokenize_keeps_combining_marks_with_their_base() {
        // Kannada "ge": consonant + vowel sign.
        let tokens = tokenize("ನಗೆ");
        assert_eq!(
            tokens,
            vec![AnsiToken::Grapheme("ನ"), AnsiToken::Grapheme("ಗೆ")]
        );
    }

    #[test]
    fn tokenize_osc_and_unterminated() {
        let tokens = tokenize("\x1b]0;title\x07x\x1b[3");
        assert_eq!(
            tokens,
            vec![
                AnsiToken::Escape("\x1b]0;title\x07"),
                AnsiToken::Grapheme("x"),
                AnsiToken::Escape("\x1b[3"),
            ]
        );
    }

    #[test_case("hello", 5 ; "ascii")]
    #[test_case("\x1b[32m$$ \x1b[39m", 3 ; "escapes are free")]
    #[test_case("我能吞下", 8 ; "wide")]
    #[test_case("ನನಗೆ", 3 ; "combining mark")]
    #[test_case("𐌸𐌸", 2 ; "astral plane")]
    fn width(text: &str, expected: usize) {
        assert_eq!(display_width(text), expected);
    }

    #[test]
    fn strip() {
        assert_eq!(strip_ansi("\x1b[31mI \x1b[32mlike\x1b[39m"), "I like");
        assert_eq!(strip_ansi("plain"), "plain");
    }
}
