// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Fixed-width elapsed time strings, for aligned columns of timings.
//!
//! ```text
//! below 10ms      0.1ms  9.9ms
//! below 1s         10ms  999ms
//! below 10s       1.00s  9.99s
//! below 600s      10.0s  99.9s   100s
//! below 10h       10.0m  99.9m   100m
//! from 10h on     10.0h  99.9h   100h  9999h  99999h
//! ```
//!
//! Every result is 5 characters wide, except hours beyond 9999 which grow.

use std::time::Duration;

use crate::{LogConfig, Protected, expand_template_args};

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 3600;
const TEN_MINUTES_IN_SECS: f64 = 600.0;
const TEN_HOURS_IN_SECS: f64 = 36_000.0;
const NANOS_PER_SEC: f64 = 1e9;

/// Width of the number part; the unit follows it.
const NUMBER_WIDTH: usize = 4;
const MILLIS_NUMBER_WIDTH: usize = 3;

#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let secs = in_units(duration, 1);
    if secs < TEN_MINUTES_IN_SECS {
        return format_secs(secs);
    }

    if secs < TEN_HOURS_IN_SECS {
        let mins = in_units(duration, SECS_PER_MINUTE);
        let number = if mins >= 99.95 {
            format!("{mins:4.0}")
        } else {
            format!("{mins:4.1}")
        };
        return with_unit(number, NUMBER_WIDTH, "m");
    }

    let hours = in_units(duration, SECS_PER_HOUR);
    if hours > 9999.0 {
        return format!("{hours:4.0}h");
    }
    let number = if hours >= 99.95 {
        format!("{hours:4.0}")
    } else {
        format!("{hours:4.1}")
    };
    with_unit(number, NUMBER_WIDTH, "h")
}

fn format_secs(secs: f64) -> String {
    if secs >= 0.9995 {
        let number = if secs >= 99.95 {
            format!("{secs:4.0}")
        } else {
            format!("{secs:4.2}")
        };
        return with_unit(number, NUMBER_WIDTH, "s");
    }

    let millis = 1000.0 * secs;
    let number = if secs >= 0.00995 {
        format!("{millis:3.0}")
    } else {
        format!("{millis:3.1}")
    };
    with_unit(number, MILLIS_NUMBER_WIDTH, "ms")
}

/// Whole units plus the fraction left over, computed separately so the integer part
/// stays exact.
#[allow(clippy::cast_precision_loss)]
fn in_units(duration: Duration, secs_per_unit: u64) -> f64 {
    let whole = (duration.as_secs() / secs_per_unit) as f64;
    let rest_nanos = (duration.as_secs() % secs_per_unit) as f64 * NANOS_PER_SEC
        + f64::from(duration.subsec_nanos());
    whole + rest_nanos / (secs_per_unit as f64 * NANOS_PER_SEC)
}

/// Cuts the (ASCII) number to `width` and appends `unit`.
fn with_unit(mut number: String, width: usize, unit: &str) -> String {
    number.truncate(width);
    number.push_str(unit);
    number
}

/// [`format_duration`] colored by how it compares to two thresholds: green below
/// `medium`, yellow below `long`, red otherwise. Style names come from the registry of
/// [`LogConfig::global`].
#[must_use]
pub fn format_duration_color(duration: Duration, medium: Duration, long: Duration) -> String {
    let text = format_duration(duration);
    let config = LogConfig::global();
    let registry = &config.registry;
    if duration < medium {
        expand_template_args(format_args!("@(green:{})", Protected(&text)), registry)
    } else if duration < long {
        expand_template_args(format_args!("@(yellow:{})", Protected(&text)), registry)
    } else {
        expand_template_args(format_args!("@(red:{})", Protected(&text)), registry)
    }
}
