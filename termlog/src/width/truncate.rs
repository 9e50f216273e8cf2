// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::borrow::Cow;

use smallvec::{SmallVec, smallvec};

use crate::{AnsiToken, SgrState, tokenize};

pub const ELLIPSIS: &str = "...";
pub const ELLIPSIS_WIDTH: usize = 3;

/// Content budgets are never smaller than this, even when a long prefix already fills
/// the terminal, so every partial line keeps a few visible columns.
pub const MIN_CONTENT_BUDGET: usize = 6;

/// Fits `text` into `budget` display columns.
///
/// Text that fits is returned unchanged. Otherwise the result is as much of the front as
/// fits, [`ELLIPSIS`], then the tail, which gets a third of the columns left after the
/// ellipsis (at least one). When only [`ELLIPSIS_WIDTH`] columns or fewer remain, no
/// tail is shown.
///
/// Escape sequences take no columns and never count against the budget. Styles opened
/// or closed in the dropped middle are carried over to the tail. Grapheme clusters are
/// kept whole.
#[must_use]
pub fn truncate_to_width(text: &str, budget: usize) -> Cow<'_, str> {
    let tokens = tokenize(text);
    let total: usize = tokens.iter().map(AnsiToken::display_width).sum();
    if total <= budget {
        return Cow::Borrowed(text);
    }

    if budget <= ELLIPSIS_WIDTH {
        let front_end = take_front(&tokens, budget);
        let mut acc = concat(&tokens[..front_end]);
        write_style_carry(&tokens, front_end, tokens.len(), &mut acc);
        return Cow::Owned(acc);
    }

    let avail = budget - ELLIPSIS_WIDTH;
    let tail_budget = if avail <= ELLIPSIS_WIDTH {
        0
    } else {
        (avail / 3).max(1)
    };
    let front_budget = avail - tail_budget;

    let front_end = take_front(&tokens, front_budget);
    let tail_start = take_tail(&tokens, tail_budget, front_end);

    let mut acc = concat(&tokens[..front_end]);
    acc.push_str(ELLIPSIS);
    write_style_carry(&tokens, front_end, tail_start, &mut acc);
    acc.push_str(&concat(&tokens[tail_start..]));
    Cow::Owned(acc)
}

/// Index of the first token that does not fit in `budget` columns, counted from the
/// front.
fn take_front(tokens: &[AnsiToken<'_>], budget: usize) -> usize {
    let mut used = 0;
    for (index, token) in tokens.iter().enumerate() {
        let width = token.display_width();
        if used + width > budget {
            return index;
        }
        used += width;
    }
    tokens.len()
}

/// Index of the first token of the longest tail that fits in `budget` columns, never
/// reaching back past `floor`.
fn take_tail(tokens: &[AnsiToken<'_>], budget: usize, floor: usize) -> usize {
    let mut used = 0;
    let mut start = tokens.len();
    while start > floor {
        let token = &tokens[start - 1];
        let width = token.display_width();
        if matches!(token, AnsiToken::Grapheme(_)) && used + width > budget {
            break;
        }
        used += width;
        start -= 1;
    }
    // Leading escapes of the tail are re-emitted by the style carry.
    while start < tokens.len() && matches!(tokens[start], AnsiToken::Escape(_)) {
        start += 1;
    }
    start
}

/// Writes the escapes that move the style from where the front ends to where the tail
/// starts.
fn write_style_carry(tokens: &[AnsiToken<'_>], from: usize, to: usize, acc: &mut String) {
    let before = style_at(tokens, from);
    let after = style_at(tokens, to);
    before.write_transition(&after, acc);
}

fn style_at(tokens: &[AnsiToken<'_>], end: usize) -> SgrState {
    let mut state = SgrState::new();
    for token in &tokens[..end] {
        if let AnsiToken::Escape(escape) = token {
            state.apply_escape(escape);
        }
    }
    state
}

fn concat(tokens: &[AnsiToken<'_>]) -> String {
    tokens.iter().map(AnsiToken::as_str).collect()
}

/// Splits `total` columns between contents whose natural widths are `needs`.
///
/// Contents that fit in an even share keep their natural width, the columns they leave
/// unused are shared among the rest. The result has one budget per entry in `needs`.
#[must_use]
pub fn allocate_budgets(needs: &[usize], total: usize) -> SmallVec<[usize; 8]> {
    let mut budgets: SmallVec<[usize; 8]> = smallvec![0; needs.len()];
    let mut order: SmallVec<[usize; 8]> = (0..needs.len()).collect();
    order.sort_by_key(|&index| needs[index]);

    let mut remaining = total;
    let mut left = needs.len();
    for index in order {
        let share = remaining / left;
        let given = needs[index].min(share);
        budgets[index] = given;
        remaining -= given;
        left -= 1;
    }
    budgets
}
