// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::time::{Duration, Instant};

use crate::{format_duration, format_duration_color};

/// Measures time since its creation.
///
/// ```
/// use std::time::Duration;
/// use termlog::Timer;
///
/// let timer = Timer::new();
/// assert!(timer.elapsed() < Duration::from_secs(60));
/// assert_eq!(timer.format_elapsed().len(), 5);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Timer {
    started_at: Instant,
}

impl Default for Timer {
    fn default() -> Self { Self::new() }
}

impl Timer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
        }
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration { self.started_at.elapsed() }

    /// See [`format_duration`].
    #[must_use]
    pub fn format_elapsed(&self) -> String { format_duration(self.elapsed()) }

    /// See [`format_duration_color`].
    #[must_use]
    pub fn format_elapsed_color(&self, medium: Duration, long: Duration) -> String {
        format_duration_color(self.elapsed(), medium, long)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_timer_is_green() {
        let timer = Timer::new();
        let it = timer.format_elapsed_color(Duration::from_secs(60), Duration::from_secs(120));
        assert!(it.starts_with("\x1b[32m"));
        assert!(it.ends_with("ms\x1b[39m"));
    }
}
