// Copyright (c) 2023-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words winsize tcgetwinsize

use std::fmt::Debug;

/// Used when no other source knows the width. Wide enough that ordinary status lines
/// are not truncated.
pub const FALLBACK_TERM_WIDTH: usize = 200;

pub const COLUMNS_ENV_VAR: &str = "COLUMNS";

/// Which standard stream (if any) a destination writes to. Decides which terminal is
/// asked for its size.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TerminalStream {
    Stdout,
    Stderr,
    /// Any other writer. Sized by asking stderr, since a custom writer usually ends up
    /// on the same terminal; set an explicit width if it does not.
    Other,
}

/// Resolves the effective column width of a destination.
///
/// Priority:
/// 1. [`Self::env_override`].
/// 2. The explicit per destination override (`Logger::set_terminal_width`).
/// 3. [`Self::query_os`].
/// 4. [`FALLBACK_TERM_WIDTH`].
pub trait WidthOracle: Send + Sync + Debug {
    fn env_override(&self) -> Option<usize>;

    /// [None] if the stream is not a terminal, or the OS reports a width of 0.
    fn query_os(&self, stream: TerminalStream) -> Option<usize>;

    fn resolve(&self, explicit: Option<usize>, stream: TerminalStream) -> usize {
        self.env_override()
            .or(explicit)
            .or_else(|| self.query_os(stream))
            .unwrap_or(FALLBACK_TERM_WIDTH)
    }
}

/// Reads `COLUMNS` from the environment and asks the OS for the terminal size.
#[derive(Copy, Clone, Debug, Default)]
pub struct SystemWidthOracle;

impl WidthOracle for SystemWidthOracle {
    fn env_override(&self) -> Option<usize> {
        std::env::var(COLUMNS_ENV_VAR)
            .ok()?
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|columns| *columns > 0)
    }

    fn query_os(&self, stream: TerminalStream) -> Option<usize> { os::query_width(stream) }
}

mod os {
    use super::TerminalStream;

    /// Uses the [`rustix`] `tcgetwinsize` syscall on the stream's file descriptor.
    #[cfg(unix)]
    pub fn query_width(stream: TerminalStream) -> Option<usize> {
        let winsize = match stream {
            TerminalStream::Stdout => rustix::termios::tcgetwinsize(std::io::stdout()),
            TerminalStream::Stderr | TerminalStream::Other => {
                rustix::termios::tcgetwinsize(std::io::stderr())
            }
        }
        .ok()?;
        // Some containers report a width of 0.
        (winsize.ws_col > 0).then_some(usize::from(winsize.ws_col))
    }

    /// Falls back to [`crossterm`], which asks the console the process is attached to.
    #[cfg(not(unix))]
    pub fn query_width(_stream: TerminalStream) -> Option<usize> {
        let (columns, _rows) = crossterm::terminal::size().ok()?;
        (columns > 0).then_some(usize::from(columns))
    }
}

/// An oracle with fixed answers, for embedders that already know the width and for
/// tests that must not depend on the machine's terminal or environment.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FixedWidthOracle {
    pub env_columns: Option<usize>,
    pub os_columns: Option<usize>,
}

impl FixedWidthOracle {
    /// No environment override, no terminal: resolves to the explicit width, or
    /// [`FALLBACK_TERM_WIDTH`].
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn with_os_columns(self, columns: usize) -> Self {
        Self {
            os_columns: Some(columns),
            ..self
        }
    }

    #[must_use]
    pub fn with_env_columns(self, columns: usize) -> Self {
        Self {
            env_columns: Some(columns),
            ..self
        }
    }
}

impl WidthOracle for FixedWidthOracle {
    fn env_override(&self) -> Option<usize> { self.env_columns }

    fn query_os(&self, _stream: TerminalStream) -> Option<usize> { self.os_columns }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn priority_order() {
        let stream = TerminalStream::Other;

        let nothing = FixedWidthOracle::new();
        assert_eq!(nothing.resolve(None, stream), FALLBACK_TERM_WIDTH);
        assert_eq!(nothing.resolve(Some(30), stream), 30);

        let os = FixedWidthOracle::new().with_os_columns(120);
        assert_eq!(os.resolve(None, stream), 120);
        assert_eq!(os.resolve(Some(30), stream), 30);

        let env = FixedWidthOracle::new().with_os_columns(120).with_env_columns(50);
        assert_eq!(env.resolve(None, stream), 50);
        assert_eq!(env.resolve(Some(30), stream), 50);
    }

    #[test]
    fn system_oracle_always_returns_a_positive_width() {
        let width = SystemWidthOracle.resolve(None, TerminalStream::Stdout);
        assert!(width > 0);
    }
}
