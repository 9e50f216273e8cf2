// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use smallstr::SmallString;
use smallvec::SmallVec;

use crate::{AnsiToken, CSI, SGR, SgrCode, tokenize};

/// One SGR attribute as written in the escape sequence, eg `31`, `1`, or `38;5;208`.
pub type SgrAttr = SmallString<[u8; 16]>;

/// Tracks which SGR attributes are "open" at some point in a stream of text, so that
/// the stream can be closed cleanly at a line boundary, or re-opened after a redraw.
///
/// Only SGR sequences (`ESC [ ... m`) affect the state; other escape sequences are
/// ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SgrState {
    open: SmallVec<[SgrAttr; 4]>,
}

/// Returns the parameter part of an SGR escape sequence, or [None] if `escape` is some
/// other kind of sequence.
#[must_use]
pub fn sgr_params(escape: &str) -> Option<&str> {
    let params = escape.strip_prefix(CSI)?.strip_suffix(SGR)?;
    params
        .bytes()
        .all(|byte| byte.is_ascii_digit() || byte == b';' || byte == b':')
        .then_some(params)
}

impl SgrState {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Replays every SGR sequence found in `text`.
    #[must_use]
    pub fn track(text: &str) -> Self {
        let mut it = Self::new();
        it.apply_text(text);
        it
    }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.open.is_empty() }

    pub fn clear(&mut self) { self.open.clear(); }

    pub fn apply_text(&mut self, text: &str) {
        for token in tokenize(text) {
            if let AnsiToken::Escape(escape) = token {
                self.apply_escape(escape);
            }
        }
    }

    pub fn apply_escape(&mut self, escape: &str) {
        if let Some(params) = sgr_params(escape) {
            self.apply_params(params);
        }
    }

    /// `params` may hold several attributes separated by `;`, including the extended
    /// color forms `38;5;n` and `38;2;r;g;b`.
    pub fn apply_params(&mut self, params: &str) {
        if params.is_empty() {
            self.clear();
            return;
        }
        let parts: SmallVec<[&str; 8]> = params.split(';').collect();
        let mut index = 0;
        while index < parts.len() {
            let take = match (parts[index], parts.get(index + 1).copied()) {
                ("38" | "48" | "58", Some("5")) => 3,
                ("38" | "48" | "58", Some("2")) => 5,
                _ => 1,
            };
            let end = (index + take).min(parts.len());
            let attr = parts[index..end].join(";");
            self.apply_attr(&attr);
            index = end;
        }
    }

    #[rustfmt::skip]
    fn apply_attr(&mut self, attr: &str) {
        match attr {
            "" | "0" => self.clear(),
            "39"     => self.open.retain(|it| !attr_is_fg(it)),
            "49"     => self.open.retain(|it| !attr_is_bg(it)),
            "22"     => self.open.retain(|it| !matches!(it.as_str(), "1" | "2")),
            "23"     => self.open.retain(|it| it.as_str() != "3"),
            "24"     => self.open.retain(|it| it.as_str() != "4"),
            "25"     => self.open.retain(|it| !matches!(it.as_str(), "5" | "6")),
            "27"     => self.open.retain(|it| it.as_str() != "7"),
            "28"     => self.open.retain(|it| it.as_str() != "8"),
            "29"     => self.open.retain(|it| it.as_str() != "9"),
            _        => {
                self.open.retain(|it| it.as_str() != attr);
                self.open.push(SgrAttr::from(attr));
            }
        }
    }

    /// The single code that closes everything currently open: "default foreground" if
    /// only foreground colors are open, "reset all" otherwise. [None] if nothing is open.
    #[must_use]
    pub fn close_code(&self) -> Option<SgrCode> {
        if self.open.is_empty() {
            None
        } else if self.open.iter().all(|it| attr_is_fg(it)) {
            Some(SgrCode::DEFAULT_FG)
        } else {
            Some(SgrCode::RESET)
        }
    }

    pub fn write_close(&self, acc: &mut String) {
        if let Some(code) = self.close_code() {
            acc.push_str(&code.to_string());
        }
    }

    pub fn write_open(&self, acc: &mut String) {
        for attr in &self.open {
            acc.push_str(CSI);
            acc.push_str(attr);
            acc.push_str(SGR);
        }
    }

    /// Writes the escapes that take a stream from `self` to `next`. When `next` only adds
    /// attributes on top of `self` nothing is closed.
    pub fn write_transition(&self, next: &SgrState, acc: &mut String) {
        if self == next {
            return;
        }
        if next.open.starts_with(&self.open) {
            for attr in &next.open[self.open.len()..] {
                acc.push_str(CSI);
                acc.push_str(attr);
                acc.push_str(SGR);
            }
            return;
        }
        self.write_close(acc);
        next.write_open(acc);
    }
}

fn attr_is_fg(attr: &str) -> bool {
    attr.starts_with("38;") || attr.parse::<u8>().is_ok_and(|code| SgrCode(code).is_fg_color())
}

fn attr_is_bg(attr: &str) -> bool {
    attr.starts_with("48;") || attr.parse::<u8>().is_ok_and(|code| SgrCode(code).is_bg_color())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn close_of(text: &str) -> String {
        let mut acc = String::new();
        SgrState::track(text).write_close(&mut acc);
        acc
    }

    #[test]
    fn nothing_open() {
        assert_eq!(close_of("plain"), "");
        assert_eq!(close_of("\x1b[31mred\x1b[39m"), "");
        assert_eq!(close_of("\x1b[1m\x1b[31mboth\x1b[0m"), "");
    }

    #[test]
    fn fg_only_closes_with_default_fg() {
        assert_eq!(close_of("\x1b[32m$$ "), "\x1b[39m");
        assert_eq!(close_of("\x1b[38;5;208morange"), "\x1b[39m");
    }

    #[test]
    fn anything_else_closes_with_reset() {
        assert_eq!(close_of("\x1b[2mdim"), "\x1b[0m");
        assert_eq!(close_of("\x1b[1;31mbold red"), "\x1b[0m");
        assert_eq!(close_of("\x1b[41mbg"), "\x1b[0m");
    }

    #[test]
    fn attribute_off_codes() {
        assert_eq!(close_of("\x1b[1mbold\x1b[22m"), "");
        assert_eq!(close_of("\x1b[4m\x1b[31mu\x1b[24m"), "\x1b[39m");
        assert_eq!(close_of("\x1b[41m\x1b[31mx\x1b[49m"), "\x1b[39m");
    }

    #[test]
    fn non_sgr_sequences_are_ignored() {
        assert_eq!(sgr_params("\x1b[2K"), None);
        assert_eq!(sgr_params("\x1b[31m"), Some("31"));
        assert_eq!(close_of("\x1b[2K\x1b[1A"), "");
    }

    #[test]
    fn transitions() {
        let bold = SgrState::track("\x1b[1m");
        let bold_cyan = SgrState::track("\x1b[1m\x1b[36m");
        let red = SgrState::track("\x1b[31m");
        let blue = SgrState::track("\x1b[34m");

        let mut acc = String::new();
        bold.write_transition(&bold_cyan, &mut acc);
        assert_eq!(acc, "\x1b[36m");

        acc.clear();
        blue.write_transition(&red, &mut acc);
        assert_eq!(acc, "\x1b[39m\x1b[31m");

        acc.clear();
        red.write_transition(&SgrState::new(), &mut acc);
        assert_eq!(acc, "\x1b[39m");

        acc.clear();
        red.write_transition(&red.clone(), &mut acc);
        assert_eq!(acc, "");
    }
}
