// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Expands the inline color template language into ANSI SGR escape sequences.
//!
//! ```text
//! @(red:some text)        inline form, styles close automatically after the text
//! @(bold,cyan)            open form, styles stay on until ...
//! @(r)                    ... the reset marker, which always resets everything
//! @(garbage)              unknown names: left exactly as written
//! ```
//!
//! The inline form emits one opening sequence per name (in list order), the expanded
//! inner text (nested tags work), then the close sequence of the *last* name: "default
//! foreground" for a standard foreground color, "reset all" for anything else.
//!
//! A tag is recognized only when every name is registered in the [`ColorRegistry`] and,
//! for the inline form, the closing parenthesis is found (parentheses inside the text
//! must balance). Anything else is copied through untouched, so the syntax is safe to use
//! loosely in free text.
//!
//! Spans bracketed by [`PROTECT_START`] / [`PROTECT_END`] (see [`Protected`]) are never
//! scanned for tags.

use nom::{IResult, Parser,
          branch::alt,
          bytes::complete::{tag, take_while1},
          character::complete::char,
          combinator::map,
          multi::separated_list1};
use smallvec::SmallVec;

use crate::{ColorRegistry, PROTECT_START, SgrCode, protected_span_end,
            remove_protect_markers};

pub const TAG_OPEN: &str = "@(";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum TagForm {
    /// `@(names:text)`.
    Inline,
    /// `@(names)`.
    Open,
}

/// Expands every recognized tag in `text`, then removes protection markers.
#[must_use]
pub fn expand_template(text: &str, registry: &ColorRegistry) -> String {
    let mut acc = String::with_capacity(text.len());
    expand_into(text, registry, &mut acc);
    remove_protect_markers(&acc).into_owned()
}

fn expand_into(text: &str, registry: &ColorRegistry, acc: &mut String) {
    let mut rest = text;
    while let Some(start) = rest.find(['@', PROTECT_START]) {
        acc.push_str(&rest[..start]);
        let candidate = &rest[start..];

        if candidate.starts_with(PROTECT_START) {
            let end = protected_span_end(candidate, 0);
            acc.push_str(&candidate[..end]);
            rest = &candidate[end..];
            continue;
        }

        match try_expand_tag(candidate, registry, acc) {
            Some(consumed) => rest = &candidate[consumed..],
            None => {
                // Not a tag, keep the `@` and scan on from the next char.
                acc.push('@');
                rest = &candidate[1..];
            }
        }
    }
    acc.push_str(rest);
}

/// Expands the tag at the start of `input` into `acc`, and returns the number of bytes
/// it spans. Returns [None] (and writes nothing) if `input` does not start with a
/// recognized tag.
fn try_expand_tag(input: &str, registry: &ColorRegistry, acc: &mut String) -> Option<usize> {
    let (after_header, (names, form)) = parse_tag_header(input).ok()?;
    let codes = registry.get_all(names.iter().copied())?;
    let header_len = input.len() - after_header.len();

    match form {
        TagForm::Open => {
            write_codes(&codes, acc);
            Some(header_len)
        }
        TagForm::Inline => {
            let inner_len = find_closing_paren(after_header)?;
            let close = codes.last().copied().map_or(SgrCode::RESET, SgrCode::close);
            write_codes(&codes, acc);
            expand_into(&after_header[..inner_len], registry, acc);
            acc.push_str(&close.to_string());
            // Skip the inner text and the `)`.
            Some(header_len + inner_len + 1)
        }
    }
}

fn write_codes(codes: &SmallVec<[SgrCode; 4]>, acc: &mut String) {
    for code in codes {
        acc.push_str(&code.to_string());
    }
}

fn is_style_name_char(ch: char) -> bool { ch.is_alphanumeric() || ch == '_' || ch == '-' }

/// Parses `@(` + comma separated names + either `:` or `)`.
fn parse_tag_header(input: &str) -> IResult<&str, (Vec<&str>, TagForm)> {
    let (remainder, (_, names, form)) = (
        tag(TAG_OPEN),
        separated_list1(char(','), take_while1(is_style_name_char)),
        alt((
            map(char(':'), |_| TagForm::Inline),
            map(char(')'), |_| TagForm::Open),
        )),
    )
        .parse(input)?;
    Ok((remainder, (names, form)))
}

/// Byte offset of the `)` that closes inline text starting at the beginning of `text`.
/// Nested parentheses must balance, protected spans are skipped.
fn find_closing_paren(text: &str) -> Option<usize> {
    let mut depth = 0_usize;
    let mut offset = 0;
    while let Some(ch) = text[offset..].chars().next() {
        match ch {
            '(' => depth += 1,
            ')' if depth == 0 => return Some(offset),
            ')' => depth -= 1,
            PROTECT_START => {
                offset = protected_span_end(text, offset);
                continue;
            }
            _ => {}
        }
        offset += ch.len_utf8();
    }
    None
}

/// Formats `args` and expands the template in the result, leaving every [`Protected`]
/// argument untouched.
#[must_use]
pub fn expand_template_args(args: std::fmt::Arguments<'_>, registry: &ColorRegistry) -> String {
    expand_template(&std::fmt::format(args), registry)
}
