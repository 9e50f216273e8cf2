// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use smallvec::SmallVec;

use crate::{MIN_CONTENT_BUDGET, SgrState, allocate_budgets, display_width,
            truncate_to_width};

/// Placed between the segments of different producers in single-line mode.
pub const SEPARATOR: &str = " | ";

/// One producer's contribution to the visible partial line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Segment {
    /// Rendered line prefix, styles already closed. Never truncated.
    pub prefix: String,
    /// The partial content. Truncated to fit the terminal.
    pub content: String,
}

impl Segment {
    #[must_use]
    pub fn new(prefix: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            content: content.into(),
        }
    }
}

/// Joins `segments` (already in display order) with [`SEPARATOR`] into a line of at
/// most `width` columns, as far as the prefixes allow.
///
/// Prefixes and separators are never shortened. The columns left over are split
/// between the contents with [`allocate_budgets`], so a long segment cannot push a
/// short one off the screen. A segment that leaves styles open is closed before the
/// following separator.
#[must_use]
pub fn join_segments(segments: &[&Segment], width: usize) -> String {
    let Some(last_index) = segments.len().checked_sub(1) else {
        return String::new();
    };

    let fixed_width: usize = segments
        .iter()
        .map(|segment| display_width(&segment.prefix))
        .sum::<usize>()
        + display_width(SEPARATOR) * last_index;
    let needs: SmallVec<[usize; 8]> = segments
        .iter()
        .map(|segment| display_width(&segment.content))
        .collect();
    let budgets = allocate_budgets(&needs, width.saturating_sub(fixed_width));

    let mut acc = String::new();
    for (index, (segment, budget)) in segments.iter().zip(budgets).enumerate() {
        if index > 0 {
            acc.push_str(SEPARATOR);
        }
        acc.push_str(&segment.prefix);
        let content = truncate_to_width(&segment.content, budget.max(MIN_CONTENT_BUDGET));
        acc.push_str(&content);
        if index < last_index {
            SgrState::track(&content).write_close(&mut acc);
        }
    }
    acc
}

/// A single segment fitted to `width` columns (one row in multi-row mode).
#[must_use]
pub fn render_segment(segment: &Segment, width: usize) -> String {
    join_segments(&[segment], width)
}
