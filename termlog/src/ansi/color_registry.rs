// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::collections::HashMap;

use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, EnumIter};

use crate::{RwLockRecoverExt, SgrCode, StdRwLock};

/// Names that every [`ColorRegistry`] starts with. The name used in templates is the
/// snake case form of the variant, eg `@(bright_red:...)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum StandardStyle {
    Reset,
    Bold,
    Dim,
    Italic,
    Underline,
    Blink,
    Reverse,
    Hidden,
    Strikethrough,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
    BgBlack,
    BgRed,
    BgGreen,
    BgYellow,
    BgBlue,
    BgMagenta,
    BgCyan,
    BgWhite,
}

/// Short alias for [`StandardStyle::Reset`], used as `@(r)`.
pub const RESET_ALIAS: &str = "r";

impl StandardStyle {
    #[rustfmt::skip]
    #[must_use]
    pub fn code(self) -> SgrCode {
        SgrCode(match self {
            StandardStyle::Reset         => 0,
            StandardStyle::Bold          => 1,
            StandardStyle::Dim           => 2,
            StandardStyle::Italic        => 3,
            StandardStyle::Underline     => 4,
            StandardStyle::Blink         => 5,
            StandardStyle::Reverse       => 7,
            StandardStyle::Hidden        => 8,
            StandardStyle::Strikethrough => 9,
            StandardStyle::Black         => 30,
            StandardStyle::Red           => 31,
            StandardStyle::Green         => 32,
            StandardStyle::Yellow        => 33,
            StandardStyle::Blue          => 34,
            StandardStyle::Magenta       => 35,
            StandardStyle::Cyan          => 36,
            StandardStyle::White         => 37,
            StandardStyle::BrightBlack   => 90,
            StandardStyle::BrightRed     => 91,
            StandardStyle::BrightGreen   => 92,
            StandardStyle::BrightYellow  => 93,
            StandardStyle::BrightBlue    => 94,
            StandardStyle::BrightMagenta => 95,
            StandardStyle::BrightCyan    => 96,
            StandardStyle::BrightWhite   => 97,
            StandardStyle::BgBlack       => 40,
            StandardStyle::BgRed         => 41,
            StandardStyle::BgGreen       => 42,
            StandardStyle::BgYellow      => 43,
            StandardStyle::BgBlue        => 44,
            StandardStyle::BgMagenta     => 45,
            StandardStyle::BgCyan        => 46,
            StandardStyle::BgWhite       => 47,
        })
    }
}

/// Style name to SGR code bindings used by the template engine.
///
/// Registration adds or overwrites; there is no removal. Lookups and registrations may
/// race freely, registration is expected to happen at setup time.
#[derive(Debug)]
pub struct ColorRegistry {
    codes: StdRwLock<HashMap<String, SgrCode>>,
}

impl Default for ColorRegistry {
    fn default() -> Self {
        let mut codes: HashMap<String, SgrCode> = StandardStyle::iter()
            .map(|style| (style.as_ref().to_owned(), style.code()))
            .collect();
        codes.insert(RESET_ALIAS.to_owned(), SgrCode::RESET);
        Self {
            codes: StdRwLock::new(codes),
        }
    }
}

impl ColorRegistry {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Binds `name` to `code`, replacing any previous binding.
    pub fn add(&self, name: impl Into<String>, code: u8) {
        self.codes.write_recover().insert(name.into(), SgrCode(code));
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<SgrCode> {
        self.codes.read_recover().get(name).copied()
    }

    /// Resolves every name, or returns [None] if any of them is not registered.
    #[must_use]
    pub fn get_all<'a>(
        &self,
        names: impl IntoIterator<Item = &'a str>,
    ) -> Option<smallvec::SmallVec<[SgrCode; 4]>> {
        let codes = self.codes.read_recover();
        names
            .into_iter()
            .map(|name| codes.get(name).copied())
            .collect()
    }
}
