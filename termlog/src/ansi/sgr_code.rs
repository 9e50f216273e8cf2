// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! More info:
//! - <https://doc.rust-lang.org/reference/tokens.html#ascii-escapes>
//! - <https://notes.burke.libbey.me/ansi-escape-codes/>

use std::fmt::{Display, Formatter, Result};

pub const ESC: char = '\x1b';
pub const CSI: &str = "\x1b[";
pub const SGR: &str = "m";

/// A single numeric SGR (select graphic rendition) code, eg `31` for a red foreground.
///
/// The closing sequence of a code is derived, never stored: the standard foreground
/// colors (`30..=37` and `90..=97`) close with "default foreground" (`39`), everything
/// else closes with "reset all attributes" (`0`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SgrCode(pub u8);

impl SgrCode {
    pub const RESET: SgrCode = SgrCode(0);
    pub const DEFAULT_FG: SgrCode = SgrCode(39);
    pub const DEFAULT_BG: SgrCode = SgrCode(49);

    #[must_use]
    pub fn is_fg_color(self) -> bool { matches!(self.0, 30..=37 | 90..=97) }

    #[must_use]
    pub fn is_bg_color(self) -> bool { matches!(self.0, 40..=47 | 100..=107) }

    /// The code that undoes this one.
    #[must_use]
    pub fn close(self) -> SgrCode {
        if self.is_fg_color() {
            Self::DEFAULT_FG
        } else {
            Self::RESET
        }
    }
}

impl Display for SgrCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result { write!(f, "{CSI}{}{SGR}", self.0) }
}

mod converters {
    use super::SgrCode;

    impl From<u8> for SgrCode {
        fn from(code: u8) -> Self { Self(code) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test]
    fn display() {
        assert_eq!(SgrCode(31).to_string(), "\x1b[31m");
        assert_eq!(SgrCode::RESET.to_string(), "\x1b[0m");
    }

    #[test_case(30, 39 ; "black")]
    #[test_case(37, 39 ; "white")]
    #[test_case(90, 39 ; "bright black")]
    #[test_case(97, 39 ; "bright white")]
    #[test_case(38, 0 ; "extended fg selector is not in the band")]
    #[test_case(1, 0 ; "bold")]
    #[test_case(2, 0 ; "dim")]
    #[test_case(41, 0 ; "background")]
    fn close_rule(code: u8, expected_close: u8) {
        assert_eq!(SgrCode(code).close(), SgrCode(expected_close));
    }
}
