// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::time::Duration;

use chrono::{DateTime, Local, SecondsFormat};

use crate::{ColorRegistry, LogFlags, SgrState, expand_template, format_duration};

pub const PLACEHOLDER_DATE: &str = "{date}";
pub const PLACEHOLDER_TIME: &str = "{time}";
pub const PLACEHOLDER_TIME_MICROS: &str = "{time micros}";
pub const PLACEHOLDER_ISODATE: &str = "{isodate}";
pub const PLACEHOLDER_ISODATE_MICROS: &str = "{isodate micros}";
pub const PLACEHOLDER_ELAPSED: &str = "{elapsed}";

const DATE_FORMAT: &str = "%Y/%m/%d";
const TIME_FORMAT: &str = "%H:%M:%S";
const TIME_MICROS_FORMAT: &str = "%H:%M:%S%.6f";

/// When a line started, and (for completed lines) how long its logger has been alive.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LineStamp {
    pub started_at: DateTime<Local>,
    /// [None] for partial lines, which never show elapsed time.
    pub elapsed: Option<Duration>,
}

impl LineStamp {
    #[must_use]
    pub fn now() -> Self {
        Self {
            started_at: Local::now(),
            elapsed: None,
        }
    }

    #[must_use]
    pub fn with_elapsed(self, elapsed: Duration) -> Self {
        Self {
            elapsed: Some(elapsed),
            ..self
        }
    }
}

/// Renders the prefix of one line.
///
/// 1. The template is always expanded (it is programmer supplied).
/// 2. Placeholders are substituted from `stamp`.
/// 3. Anything the prefix leaves open is closed, so styles never leak into the line.
/// 4. The stamps selected by `flags` follow, each followed by a space.
#[must_use]
pub fn render_line_prefix(
    template: &str,
    flags: LogFlags,
    stamp: &LineStamp,
    registry: &ColorRegistry,
) -> String {
    let mut acc = expand_template(template, registry);
    if acc.contains('{') {
        acc = substitute_placeholders(&acc, stamp);
    }
    SgrState::track(&acc).write_close(&mut acc);

    let micros = flags.contains(LogFlags::MICROSECONDS);
    if flags.contains(LogFlags::DATE) {
        acc.push_str(&stamp.started_at.format(DATE_FORMAT).to_string());
        acc.push(' ');
    }
    if flags.contains(LogFlags::TIME) {
        let format = if micros { TIME_MICROS_FORMAT } else { TIME_FORMAT };
        acc.push_str(&stamp.started_at.format(format).to_string());
        acc.push(' ');
    }
    if flags.contains(LogFlags::ISODATE) {
        acc.push_str(&iso_date(stamp, micros));
        acc.push(' ');
    }
    if let Some(elapsed) = stamp.elapsed
        && flags.contains(LogFlags::ELAPSED)
        && !template.contains(PLACEHOLDER_ELAPSED)
    {
        acc.push('(');
        acc.push_str(&format_duration(elapsed));
        acc.push_str(") ");
    }
    acc
}

fn substitute_placeholders(text: &str, stamp: &LineStamp) -> String {
    let elapsed = stamp.elapsed.map(format_duration).unwrap_or_default();
    #[rustfmt::skip]
    let replacements = [
        (PLACEHOLDER_TIME_MICROS,    stamp.started_at.format(TIME_MICROS_FORMAT).to_string()),
        (PLACEHOLDER_ISODATE_MICROS, iso_date(stamp, true)),
        (PLACEHOLDER_DATE,           stamp.started_at.format(DATE_FORMAT).to_string()),
        (PLACEHOLDER_TIME,           stamp.started_at.format(TIME_FORMAT).to_string()),
        (PLACEHOLDER_ISODATE,        iso_date(stamp, false)),
        (PLACEHOLDER_ELAPSED,        elapsed),
    ];
    replacements
        .iter()
        .fold(text.to_owned(), |acc, (placeholder, value)| {
            acc.replace(placeholder, value)
        })
}

fn iso_date(stamp: &LineStamp, micros: bool) -> String {
    let format = if micros {
        SecondsFormat::Micros
    } else {
        SecondsFormat::Secs
    };
    stamp.started_at.to_rfc3339_opts(format, false)
}
