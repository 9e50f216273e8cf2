// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{borrow::Cow,
          fmt::{self, Binary, Debug, Display, Formatter, LowerExp, LowerHex, Octal,
                UpperExp, UpperHex}};

/// Private use code points that bracket formatted arguments. Chosen from the Unicode
/// private use area so they never collide with printable text.
pub const PROTECT_START: char = '\u{E000}';
pub const PROTECT_END: char = '\u{E001}';

/// Wraps a `printf!` argument so its formatted text is bracketed by [`PROTECT_START`] and
/// [`PROTECT_END`]. The template engine copies bracketed spans verbatim, so a value like
/// `"@(green:x)"` is never turned into styling.
///
/// Formatting options (width, precision, alternate, ...) are forwarded to the inner value.
#[derive(Clone, Copy)]
pub struct Protected<T>(pub T);

macro_rules! impl_protected_fmt {
    ($($trait:ident),* $(,)?) => {
        $(
            impl<T: $trait> $trait for Protected<T> {
                fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                    fmt::Write::write_char(f, PROTECT_START)?;
                    $trait::fmt(&self.0, f)?;
                    fmt::Write::write_char(f, PROTECT_END)
                }
            }
        )*
    };
}

impl_protected_fmt!(Display, Debug, LowerHex, UpperHex, Octal, Binary, LowerExp, UpperExp);

/// Format arguments whose substituted values are wrapped in [`Protected`]. Only the
/// [`crate::printf!`], [`crate::replacef!`] and [`crate::global_printf!`] macros build
/// them, so template expansion of an argument can't be asked for by accident.
///
/// ```compile_fail
/// use termlog::{LogFlags, Logger, OutputDevice};
///
/// let logger = Logger::new(&OutputDevice::new(Vec::new()), "", LogFlags::empty());
/// let untrusted = "@(green:x)";
/// logger.printf(format_args!("@(red:{})\n", untrusted)).unwrap();
/// ```
#[derive(Clone, Copy, Debug)]
pub struct PrintfArgs<'a>(fmt::Arguments<'a>);

impl<'a> PrintfArgs<'a> {
    /// Used by the macros, after wrapping every argument.
    #[doc(hidden)]
    #[must_use]
    pub fn __from_protected(args: fmt::Arguments<'a>) -> Self { Self(args) }
}

impl Display for PrintfArgs<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result { fmt::Write::write_fmt(f, self.0) }
}

/// True if `fmt` names an argument (`{name}`), which `format_args!` would capture from
/// the surrounding scope without a [`Protected`] wrapper. Width and precision
/// parameters (`{:width$}`) are not text and are allowed.
#[doc(hidden)]
#[must_use]
pub const fn has_implicit_capture(fmt: &str) -> bool {
    let bytes = fmt.as_bytes();
    let mut index = 0;
    while index + 1 < bytes.len() {
        if bytes[index] == b'{' {
            let next = bytes[index + 1];
            if next == b'{' {
                index += 2;
                continue;
            }
            if next == b'_' || next.is_ascii_alphabetic() || next >= 0x80 {
                return true;
            }
        }
        index += 1;
    }
    false
}

/// Returns the byte index just past the protected span that starts at `start` (which
/// must hold [`PROTECT_START`]). Nested spans are balanced; an unterminated span runs to
/// the end of `text`.
#[must_use]
pub fn protected_span_end(text: &str, start: usize) -> usize {
    let mut depth = 0_usize;
    for (offset, ch) in text[start..].char_indices() {
        match ch {
            PROTECT_START => depth += 1,
            PROTECT_END => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return start + offset + ch.len_utf8();
                }
            }
            _ => {}
        }
    }
    text.len()
}

#[must_use]
pub fn remove_protect_markers(text: &str) -> Cow<'_, str> {
    if text.contains([PROTECT_START, PROTECT_END]) {
        Cow::Owned(text.replace([PROTECT_START, PROTECT_END], ""))
    } else {
        Cow::Borrowed(text)
    }
}
