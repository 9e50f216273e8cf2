// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{io::{self, Write},
          sync::Arc,
          time::Instant};

use crate::{LineStamp, LockRecoverExt, LogConfig, LogError, LogFlags, OutputDevice,
            PartialLine, PrintfArgs, ProducerId, Segment, StdMutex, TriState,
            expand_template, ok, remove_protect_markers, render_line_prefix, strip_ansi};

/// One producer of output on a shared [`OutputDevice`].
///
/// Text passed to [`Logger::print`] is split into lines. Every completed line gets the
/// rendered prefix and is written immediately; the unterminated rest is this logger's
/// partial line, drawn (and redrawn) in place together with the partial lines of the
/// other loggers on the same device until it is completed or the logger is closed.
///
/// - Cloning is cheap, clones are the same logger.
/// - The logger is closed when the last clone is dropped.
/// - Writes after [`Logger::close`] are dropped.
///
/// ```
/// use termlog::{FixedWidthOracle, LogConfig, LogFlags, Logger, OutputDevice};
/// use termlog_test_fixtures::StdoutMock;
///
/// let stdout_mock = StdoutMock::default();
/// let device = OutputDevice::new_with_oracle(stdout_mock.clone(), FixedWidthOracle::new());
/// let tests = Logger::new_with_config(&device, "", LogFlags::empty(), LogConfig::shared());
/// let build = Logger::new_with_config(&device, "", LogFlags::empty(), LogConfig::shared());
///
/// tests.print("Testing...").unwrap();
/// build.print("Writing Code...").unwrap();
/// assert_eq!(stdout_mock.take_buffer_as_string(), "Testing... | Writing Code...");
///
/// build.print(" done.\n").unwrap();
/// assert_eq!(
///     stdout_mock.take_buffer_as_string(),
///     "\rWriting Code... done.       \nTesting..."
/// );
/// ```
#[derive(Clone, Debug)]
pub struct Logger {
    inner: Arc<LoggerInner>,
}

#[derive(Debug)]
struct LoggerInner {
    device: OutputDevice,
    producer: ProducerId,
    config: Arc<LogConfig>,
    created_at: Instant,
    state: StdMutex<LoggerState>,
}

#[derive(Debug)]
struct LoggerState {
    prefix: String,
    flags: LogFlags,
    partial: PartialLine,
    /// Set when a line starts, cleared when it is completed.
    line: Option<LineInProgress>,
    color_template: TriState,
    color: TriState,
    auto_newlines: TriState,
    partial_visible: bool,
    closed: bool,
}

#[derive(Debug)]
struct LineInProgress {
    stamp: LineStamp,
    /// Prefix template and flags in effect when the line started.
    template: String,
    flags: LogFlags,
    /// Prefix shown in front of the partial line.
    partial_prefix: String,
}

/// How the text of a write is treated before it is split into lines.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Input {
    /// Scanned for color templates, if enabled.
    Template,
    /// Written as is (apart from color stripping).
    Raw,
}

/// What happens to the partial content before new text is added.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum WriteMode {
    Append,
    Replace,
}

impl Logger {
    /// A logger using the process-wide [`LogConfig::global`].
    ///
    /// `prefix` is put in front of every line. It is always template expanded, and may
    /// contain the placeholders `{date}`, `{time}`, `{time micros}`, `{isodate}`,
    /// `{isodate micros}` and `{elapsed}`.
    #[must_use]
    pub fn new(device: &OutputDevice, prefix: impl Into<String>, flags: LogFlags) -> Self {
        Self::new_with_config(device, prefix, flags, LogConfig::global())
    }

    #[must_use]
    pub fn new_with_config(
        device: &OutputDevice,
        prefix: impl Into<String>,
        flags: LogFlags,
        config: Arc<LogConfig>,
    ) -> Self {
        Self {
            inner: Arc::new(LoggerInner {
                device: device.clone(),
                producer: device.register_producer(),
                config,
                created_at: Instant::now(),
                state: StdMutex::new(LoggerState {
                    prefix: prefix.into(),
                    flags,
                    partial: PartialLine::new(),
                    line: None,
                    color_template: TriState::Unset,
                    color: TriState::Unset,
                    auto_newlines: TriState::Unset,
                    partial_visible: true,
                    closed: false,
                }),
            }),
        }
    }

    /// Appends `text`. Completed lines are written, the rest becomes (part of) the
    /// partial line.
    ///
    /// # Errors
    ///
    /// [`LogError::Io`] if the destination rejects a write.
    pub fn print(&self, text: &str) -> Result<(), LogError> {
        self.inner.write(text, Input::Template, WriteMode::Append)
    }

    /// [`Self::print`] followed by a line terminator.
    ///
    /// # Errors
    ///
    /// See [`Self::print`].
    pub fn println(&self, text: &str) -> Result<(), LogError> {
        self.inner
            .write(&format!("{text}\n"), Input::Template, WriteMode::Append)
    }

    /// Called by the [`crate::printf!`] macro, which protects the arguments from
    /// template expansion.
    ///
    /// # Errors
    ///
    /// See [`Self::print`].
    pub fn printf(&self, args: PrintfArgs<'_>) -> Result<(), LogError> {
        self.inner
            .write(&args.to_string(), Input::Template, WriteMode::Append)
    }

    /// Like [`Self::print`], but `text` replaces the current partial line instead of
    /// being appended to it.
    ///
    /// # Errors
    ///
    /// See [`Self::print`].
    pub fn replace(&self, text: &str) -> Result<(), LogError> {
        self.inner.write(text, Input::Template, WriteMode::Replace)
    }

    /// Called by the [`crate::replacef!`] macro.
    ///
    /// # Errors
    ///
    /// See [`Self::print`].
    pub fn replacef(&self, args: PrintfArgs<'_>) -> Result<(), LogError> {
        self.inner
            .write(&args.to_string(), Input::Template, WriteMode::Replace)
    }

    /// Completes a pending partial line, then stops accepting writes. Writes nothing
    /// if there is no partial line. Calling it again does nothing.
    ///
    /// # Errors
    ///
    /// See [`Self::print`].
    pub fn close(&self) -> Result<(), LogError> { self.inner.close() }

    #[must_use]
    pub fn is_closed(&self) -> bool { self.inner.state.lock_recover().closed }

    /// Stops drawing this logger's partial line. Completed lines are not affected.
    ///
    /// # Errors
    ///
    /// See [`Self::print`].
    pub fn hide_partial_lines(&self) -> Result<(), LogError> {
        self.set_partial_lines_visible(false)
    }

    /// # Errors
    ///
    /// See [`Self::print`].
    pub fn set_partial_lines_visible(&self, visible: bool) -> Result<(), LogError> {
        let mut state = self.inner.state.lock_recover();
        if state.partial_visible == visible {
            return ok!();
        }
        state.partial_visible = visible;
        if visible {
            if state.partial.is_empty() {
                return ok!();
            }
            self.inner.show_partial(&state)
        } else {
            self.inner.device.release(self.inner.producer)
        }
    }

    /// Expands `@(...)` tags in printed text, overriding [`LogConfig::color_template`].
    pub fn enable_color_template(&self) {
        self.inner.state.lock_recover().color_template = TriState::On;
    }

    pub fn disable_color_template(&self) {
        self.inner.state.lock_recover().color_template = TriState::Off;
    }

    /// Lets escape sequences through, overriding [`LogConfig::color`].
    pub fn enable_color(&self) { self.inner.state.lock_recover().color = TriState::On; }

    /// Strips every escape sequence, template generated or literal, overriding
    /// [`LogConfig::color`].
    pub fn disable_color(&self) { self.inner.state.lock_recover().color = TriState::Off; }

    /// Every following write ends its line, as if it ended with a line terminator.
    pub fn enable_auto_newlines(&self) {
        self.inner.state.lock_recover().auto_newlines = TriState::On;
    }

    pub fn disable_auto_newlines(&self) {
        self.inner.state.lock_recover().auto_newlines = TriState::Off;
    }

    /// Sets the width of the destination, for every logger that shares it.
    pub fn set_terminal_width(&self, width: usize) {
        self.inner.device.set_terminal_width(Some(width));
    }

    /// Switches the destination, for every logger that shares it, to one row per
    /// active logger.
    ///
    /// # Errors
    ///
    /// See [`Self::print`].
    pub fn enable_multiline_mode(&self) -> Result<(), LogError> {
        self.inner.device.enable_multiline_mode()
    }

    /// Used from the next line on.
    pub fn set_prefix(&self, prefix: impl Into<String>) {
        self.inner.state.lock_recover().prefix = prefix.into();
    }

    #[must_use]
    pub fn prefix(&self) -> String { self.inner.state.lock_recover().prefix.clone() }

    /// Used from the next line on.
    pub fn set_flags(&self, flags: LogFlags) { self.inner.state.lock_recover().flags = flags; }

    #[must_use]
    pub fn flags(&self) -> LogFlags { self.inner.state.lock_recover().flags }

    #[must_use]
    pub fn device(&self) -> &OutputDevice { &self.inner.device }

    #[must_use]
    pub fn config(&self) -> &Arc<LogConfig> { &self.inner.config }
}

impl LoggerInner {
    fn write(&self, text: &str, input: Input, mode: WriteMode) -> Result<(), LogError> {
        let mut state = self.state.lock_recover();
        if state.closed {
            drop(state);
            tracing::debug!(len = text.len(), "dropped a write to a closed logger");
            return ok!();
        }

        let text = self.prepare(&state, text, input);
        if mode == WriteMode::Replace {
            state.partial.clear();
        }

        let mut rest = text.as_str();
        while let Some(newline) = rest.find('\n') {
            self.start_line(&mut state);
            state.partial.push(&rest[..newline]);
            self.complete_line(&mut state)?;
            rest = &rest[newline + 1..];
        }
        if !rest.is_empty() {
            self.start_line(&mut state);
            state.partial.push(rest);
        }

        let auto_newlines = state.auto_newlines.resolve(self.config.auto_newlines());
        if auto_newlines {
            if state.partial.is_empty() {
                return ok!();
            }
            return self.complete_line(&mut state);
        }

        if (!rest.is_empty() || mode == WriteMode::Replace) && state.partial_visible {
            self.show_partial(&state)?;
        }
        ok!()
    }

    /// Template expansion and color stripping.
    fn prepare(&self, state: &LoggerState, text: &str, input: Input) -> String {
        let color_template = state.color_template.resolve(self.config.color_template());
        let text = match input {
            Input::Template if color_template => expand_template(text, &self.config.registry),
            Input::Template => remove_protect_markers(text).into_owned(),
            Input::Raw => text.to_owned(),
        };
        if self.color_enabled(state) {
            text
        } else {
            strip_ansi(&text)
        }
    }

    fn color_enabled(&self, state: &LoggerState) -> bool {
        state.color.resolve(self.config.color())
    }

    fn render_prefix(
        &self,
        state: &LoggerState,
        template: &str,
        flags: LogFlags,
        stamp: &LineStamp,
    ) -> String {
        let prefix = render_line_prefix(template, flags, stamp, &self.config.registry);
        if self.color_enabled(state) {
            prefix
        } else {
            strip_ansi(&prefix)
        }
    }

    fn start_line(&self, state: &mut LoggerState) {
        if state.line.is_some() {
            return;
        }
        let stamp = LineStamp::now();
        let partial_prefix = self.render_prefix(state, &state.prefix, state.flags, &stamp);
        state.line = Some(LineInProgress {
            stamp,
            template: state.prefix.clone(),
            flags: state.flags,
            partial_prefix,
        });
    }

    fn show_partial(&self, state: &LoggerState) -> Result<(), LogError> {
        let prefix = state
            .line
            .as_ref()
            .map(|line| line.partial_prefix.clone())
            .unwrap_or_default();
        let segment = Segment::new(prefix, state.partial.as_str());
        self.device.update_partial(self.producer, segment)
    }

    fn complete_line(&self, state: &mut LoggerState) -> Result<(), LogError> {
        let (stamp, template, flags) = match state.line.take() {
            Some(line) => (line.stamp, line.template, line.flags),
            None => (LineStamp::now(), state.prefix.clone(), state.flags),
        };
        let stamp = stamp.with_elapsed(self.created_at.elapsed());
        let mut line = self.render_prefix(state, &template, flags, &stamp);
        line.push_str(&state.partial.take_line());
        self.device.complete_line(self.producer, &line)
    }

    fn close(&self) -> Result<(), LogError> {
        let mut state = self.state.lock_recover();
        if state.closed {
            return ok!();
        }
        state.closed = true;
        if state.partial.is_empty() {
            self.device.release(self.producer)
        } else {
            self.complete_line(&mut state)
        }
    }
}

impl Drop for LoggerInner {
    fn drop(&mut self) {
        if let Err(error) = self.close() {
            tracing::debug!(?error, "failed to close a logger on drop");
        }
    }
}

/// Bytes are printed without template expansion, so a [`Logger`] can be the
/// destination of another logger's [`OutputDevice`].
impl Write for Logger {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner
            .write(&String::from_utf8_lossy(buf), Input::Raw, WriteMode::Append)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> { ok!() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FixedWidthOracle, printf, replacef};
    use pretty_assertions::assert_eq;
    use termlog_test_fixtures::{FailingWriter, StdoutMock};

    fn setup() -> (StdoutMock, OutputDevice, Arc<LogConfig>) {
        let stdout_mock = StdoutMock::default();
        let device = OutputDevice::new_with_oracle(stdout_mock.clone(), FixedWidthOracle::new());
        (stdout_mock, device, LogConfig::shared())
    }

    #[test]
    fn close_is_idempotent_and_drops_later_writes() {
        let (stdout_mock, device, config) = setup();
        let logger = Logger::new_with_config(&device, "", LogFlags::empty(), config);
        logger.print("pending").unwrap();
        logger.close().unwrap();
        logger.close().unwrap();
        logger.print("ignored\n").unwrap();
        assert!(logger.is_closed());
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "pending\n");
    }

    #[test]
    fn dropping_the_last_clone_closes() {
        let (stdout_mock, device, config) = setup();
        let logger = Logger::new_with_config(&device, "> ", LogFlags::empty(), config);
        let clone = logger.clone();
        logger.print("bye").unwrap();
        drop(logger);
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "> bye");
        drop(clone);
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "> bye\n");
    }

    #[test]
    fn replace_with_empty_text_removes_the_partial_line() {
        let (stdout_mock, device, config) = setup();
        let logger = Logger::new_with_config(&device, "", LogFlags::empty(), config);
        logger.print("abc").unwrap();
        logger.replace("").unwrap();
        assert_eq!(stdout_mock.take_buffer_as_string(), "abc\r   \r");
        logger.close().unwrap();
        assert_eq!(stdout_mock.take_buffer_as_string(), "");
    }

    #[test]
    fn hidden_partial_lines_come_back() {
        let (stdout_mock, device, config) = setup();
        let logger = Logger::new_with_config(&device, "", LogFlags::empty(), config);
        logger.hide_partial_lines().unwrap();
        logger.print("quiet").unwrap();
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "");
        logger.set_partial_lines_visible(true).unwrap();
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "quiet");
    }

    #[test]
    fn printf_macros_protect_arguments() {
        let (stdout_mock, device, config) = setup();
        let logger = Logger::new_with_config(&device, "", LogFlags::empty(), config);
        logger.enable_color_template();
        printf!(logger, "@(red:{})", "@(green:x)").unwrap();
        replacef!(logger, "@(blue:{})", "@(r)").unwrap();
        assert_eq!(
            stdout_mock.get_copy_of_buffer_as_string(),
            "\x1b[31m@(green:x)\x1b[39m\r\x1b[34m@(r)\x1b[39m      "
        );
    }

    #[test]
    fn markers_are_removed_when_templates_are_off() {
        let (stdout_mock, device, config) = setup();
        let logger = Logger::new_with_config(&device, "", LogFlags::empty(), config);
        printf!(logger, "@(red:{})\n", 42).unwrap();
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "@(red:42)\n");
    }

    #[test]
    fn write_errors_reach_the_caller() {
        let device = OutputDevice::new_with_oracle(FailingWriter, FixedWidthOracle::new());
        let logger = Logger::new_with_config(&device, "", LogFlags::empty(), LogConfig::shared());
        assert!(logger.print("line\n").is_err());
    }

    #[test]
    fn io_write_skips_template_expansion() {
        let (stdout_mock, device, config) = setup();
        let mut logger = Logger::new_with_config(&device, "", LogFlags::empty(), config);
        logger.enable_color_template();
        logger.write_all(b"@(red:raw)\n").unwrap();
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "@(red:raw)\n");
    }

    #[test]
    fn prefix_and_flags_apply_from_the_next_line() {
        let (stdout_mock, device, config) = setup();
        let logger = Logger::new_with_config(&device, "a: ", LogFlags::empty(), config);
        logger.print("one").unwrap();
        logger.set_prefix("b: ");
        logger.print(" two\nthree\n").unwrap();
        assert_eq!(logger.prefix(), "b: ");
        assert_eq!(logger.flags(), LogFlags::empty());
        assert_eq!(
            stdout_mock.get_copy_of_buffer_as_string(),
            "a: one two\nb: three\n"
        );
    }
}
