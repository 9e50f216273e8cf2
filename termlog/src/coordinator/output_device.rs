// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{collections::BTreeMap,
          fmt::{self, Debug, Formatter},
          io::{IsTerminal, Write},
          sync::{Arc, LazyLock}};

use crate::{LockRecoverExt, LogError, MultiRowRenderer, RenderBuffer, Segment,
            SingleLineRenderer, StdMutex, SystemWidthOracle, TerminalStream, WidthOracle,
            join_segments, ok, render_segment};

/// Identifies one producer on one [`OutputDevice`]. Ids grow with registration order,
/// which is also the order of segments in single-line mode.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProducerId(u64);

impl ProducerId {
    #[must_use]
    pub const fn new(id: u64) -> Self { Self(id) }
}

/// Whether partial content is drawn at all.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Interactivity {
    /// A terminal: partial content is drawn and redrawn in place.
    Interactive,
    /// A file or pipe: partial content is held back, only completed lines are written,
    /// in order, as plain sequential text.
    Sequential,
}

impl Interactivity {
    pub fn detect(stream: &impl IsTerminal) -> Self {
        if stream.is_terminal() {
            Self::Interactive
        } else {
            Self::Sequential
        }
    }
}

/// Shared handle to one destination and its render state. Every [`crate::Logger`]
/// created with the same device (or a clone of it) is coordinated with the others.
///
/// - It is cheap to clone; clones refer to the same destination.
/// - Every operation takes the device's lock for its whole duration, so concurrent
///   producers on one destination see one coherent byte sequence. Devices never lock
///   each other, unless one device's writer is a [`crate::Logger`] on another.
///
/// ```
/// use termlog::{FixedWidthOracle, OutputDevice, Segment};
/// use termlog_test_fixtures::StdoutMock;
///
/// let stdout_mock = StdoutMock::default();
/// let device = OutputDevice::new_with_oracle(stdout_mock.clone(), FixedWidthOracle::new());
/// let first = device.register_producer();
/// let second = device.register_producer();
///
/// device.update_partial(second, Segment::new("", "compiling...")).unwrap();
/// device.update_partial(first, Segment::new("", "fetching...")).unwrap();
/// assert_eq!(
///     stdout_mock.get_copy_of_buffer_as_string(),
///     "compiling...\rfetching... | compiling..."
/// );
/// ```
#[derive(Clone)]
pub struct OutputDevice {
    inner: Arc<StdMutex<WriterState>>,
}

impl Debug for OutputDevice {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let state = self.inner.lock_recover();
        f.debug_struct("OutputDevice")
            .field("interactivity", &state.interactivity)
            .field("stream", &state.stream)
            .field("active", &state.active.len())
            .field("multiline", &matches!(state.mode, RenderMode::MultiRow(_)))
            .finish_non_exhaustive()
    }
}

static STDOUT_DEVICE: LazyLock<OutputDevice> = LazyLock::new(|| {
    let stdout = std::io::stdout();
    let interactivity = Interactivity::detect(&stdout);
    OutputDevice::new_with(stdout, interactivity, TerminalStream::Stdout, SystemWidthOracle)
});

static STDERR_DEVICE: LazyLock<OutputDevice> = LazyLock::new(|| {
    let stderr = std::io::stderr();
    let interactivity = Interactivity::detect(&stderr);
    OutputDevice::new_with(stderr, interactivity, TerminalStream::Stderr, SystemWidthOracle)
});

impl OutputDevice {
    /// An interactive destination sized by the [`SystemWidthOracle`].
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self::new_with(
            writer,
            Interactivity::Interactive,
            TerminalStream::Other,
            SystemWidthOracle,
        )
    }

    /// A destination that only ever receives completed lines.
    pub fn new_sequential(writer: impl Write + Send + 'static) -> Self {
        Self::new_with(
            writer,
            Interactivity::Sequential,
            TerminalStream::Other,
            SystemWidthOracle,
        )
    }

    /// An interactive destination sized by `oracle` instead of the environment and OS.
    pub fn new_with_oracle(
        writer: impl Write + Send + 'static,
        oracle: impl WidthOracle + 'static,
    ) -> Self {
        Self::new_with(writer, Interactivity::Interactive, TerminalStream::Other, oracle)
    }

    pub fn new_with(
        writer: impl Write + Send + 'static,
        interactivity: Interactivity,
        stream: TerminalStream,
        oracle: impl WidthOracle + 'static,
    ) -> Self {
        Self {
            inner: Arc::new(StdMutex::new(WriterState {
                writer: Box::new(writer),
                interactivity,
                stream,
                oracle: Arc::new(oracle),
                explicit_width: None,
                next_producer_id: 0,
                active: BTreeMap::new(),
                mode: RenderMode::SingleLine(SingleLineRenderer::new()),
            })),
        }
    }

    /// The process-wide device for stdout, interactive if stdout is a terminal.
    #[must_use]
    pub fn stdout() -> Self { STDOUT_DEVICE.clone() }

    /// The process-wide device for stderr, interactive if stderr is a terminal.
    #[must_use]
    pub fn stderr() -> Self { STDERR_DEVICE.clone() }

    /// True if both handles refer to the same destination.
    #[must_use]
    pub fn same_destination(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    #[must_use]
    pub fn interactivity(&self) -> Interactivity { self.inner.lock_recover().interactivity }

    /// Assigns the next id; later registrations are shown further right in single-line
    /// mode.
    #[must_use]
    pub fn register_producer(&self) -> ProducerId {
        let mut state = self.inner.lock_recover();
        state.next_producer_id += 1;
        ProducerId(state.next_producer_id)
    }

    /// Replaces `id`'s visible partial content. An empty `segment.content` removes `id`
    /// from the active producers. Sequential destinations ignore partial content.
    ///
    /// # Errors
    ///
    /// [`LogError::Io`] if the destination rejects the write.
    pub fn update_partial(&self, id: ProducerId, segment: Segment) -> Result<(), LogError> {
        let mut state = self.inner.lock_recover();
        if state.interactivity == Interactivity::Sequential {
            return ok!();
        }

        let width = state.term_width();
        let mut buffer = RenderBuffer::new();
        let rendered = render_segment(&segment, width);
        if segment.content.is_empty() {
            state.active.remove(&id);
        } else {
            state.active.insert(id, segment);
        }

        let WriterState { active, mode, .. } = &mut *state;
        match mode {
            RenderMode::SingleLine(renderer) => {
                renderer.render(&join_active(active, width), &mut buffer)?;
            }
            RenderMode::MultiRow(renderer) => {
                if active.contains_key(&id) {
                    renderer.update(id, &rendered, &mut buffer)?;
                } else {
                    renderer.update(id, "", &mut buffer)?;
                }
            }
        }
        state.write_buffer(&buffer)
    }

    /// Writes `line` (without its terminator) as a finished line and removes `id` from
    /// the active producers. Completed lines are never truncated.
    ///
    /// # Errors
    ///
    /// [`LogError::Io`] if the destination rejects the write.
    pub fn complete_line(&self, id: ProducerId, line: &str) -> Result<(), LogError> {
        let mut state = self.inner.lock_recover();
        state.active.remove(&id);

        let mut buffer = RenderBuffer::new();
        if state.interactivity == Interactivity::Sequential {
            buffer.extend_from_slice(line.as_bytes());
            buffer.push(b'\n');
            return state.write_buffer(&buffer);
        }

        let width = state.term_width();
        let WriterState { active, mode, .. } = &mut *state;
        match mode {
            RenderMode::SingleLine(renderer) => {
                renderer.complete(line, &join_active(active, width), &mut buffer)?;
            }
            RenderMode::MultiRow(renderer) => renderer.complete(id, line, &mut buffer)?,
        }
        state.write_buffer(&buffer)
    }

    /// Removes `id` from the active producers without finishing its line. In
    /// single-line mode its segment disappears from the joined line; in multi-row mode
    /// its row is blanked.
    ///
    /// # Errors
    ///
    /// [`LogError::Io`] if the destination rejects the write.
    pub fn release(&self, id: ProducerId) -> Result<(), LogError> {
        let mut state = self.inner.lock_recover();
        let was_active = state.active.remove(&id).is_some();
        let width = state.term_width();

        let mut buffer = RenderBuffer::new();
        let WriterState { active, mode, .. } = &mut *state;
        match mode {
            RenderMode::SingleLine(renderer) => {
                if was_active {
                    renderer.render(&join_active(active, width), &mut buffer)?;
                }
            }
            RenderMode::MultiRow(renderer) => renderer.release(id, &mut buffer)?,
        }
        state.write_buffer(&buffer)
    }

    /// Overrides the OS reported width for every producer on this destination. [None]
    /// goes back to asking the OS. The `COLUMNS` environment variable still wins.
    pub fn set_terminal_width(&self, width: Option<usize>) {
        self.inner.lock_recover().explicit_width = width.filter(|it| *it > 0);
    }

    #[must_use]
    pub fn terminal_width(&self) -> usize { self.inner.lock_recover().term_width() }

    /// Switches to one row per active producer. Whatever single-line content is on
    /// screen is blanked and redrawn as rows, in registration order. Does nothing if the
    /// device is already in multi-row mode.
    ///
    /// # Errors
    ///
    /// [`LogError::Io`] if the destination rejects the write.
    pub fn enable_multiline_mode(&self) -> Result<(), LogError> {
        let mut state = self.inner.lock_recover();
        let width = state.term_width();

        let mut buffer = RenderBuffer::new();
        let WriterState {
            active,
            mode,
            interactivity,
            ..
        } = &mut *state;
        let RenderMode::SingleLine(single_line) = &mut *mode else {
            return ok!();
        };
        single_line.clear(&mut buffer)?;

        let mut multi_row = MultiRowRenderer::new();
        if *interactivity == Interactivity::Interactive {
            for (id, segment) in active.iter() {
                multi_row.update(*id, &render_segment(segment, width), &mut buffer)?;
            }
        }
        *mode = RenderMode::MultiRow(multi_row);
        let active_count = active.len();

        let result = state.write_buffer(&buffer);
        // Not under the lock, a subscriber may write to this very device.
        drop(state);
        tracing::debug!(active = active_count, "switched to multi-row mode");
        result
    }

    #[must_use]
    pub fn is_multiline_mode(&self) -> bool {
        matches!(self.inner.lock_recover().mode, RenderMode::MultiRow(_))
    }
}

enum RenderMode {
    SingleLine(SingleLineRenderer),
    MultiRow(MultiRowRenderer),
}

struct WriterState {
    writer: Box<dyn Write + Send>,
    interactivity: Interactivity,
    stream: TerminalStream,
    oracle: Arc<dyn WidthOracle>,
    explicit_width: Option<usize>,
    next_producer_id: u64,
    /// Producers with visible partial content, in registration order.
    active: BTreeMap<ProducerId, Segment>,
    mode: RenderMode,
}

impl WriterState {
    fn term_width(&self) -> usize { self.oracle.resolve(self.explicit_width, self.stream) }

    fn write_buffer(&mut self, buffer: &[u8]) -> Result<(), LogError> {
        if buffer.is_empty() {
            return ok!();
        }
        self.writer.write_all(buffer)?;
        self.writer.flush()?;
        ok!()
    }
}

fn join_active(active: &BTreeMap<ProducerId, Segment>, width: usize) -> String {
    let segments: Vec<&Segment> = active.values().collect();
    join_segments(&segments, width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FixedWidthOracle;
    use pretty_assertions::assert_eq;
    use termlog_test_fixtures::{FailingWriter, StdoutMock};

    fn device() -> (StdoutMock, OutputDevice) {
        let stdout_mock = StdoutMock::default();
        let device = OutputDevice::new_with_oracle(stdout_mock.clone(), FixedWidthOracle::new());
        (stdout_mock, device)
    }

    #[test]
    fn registration_order_decides_join_order() {
        let (stdout_mock, device) = device();
        let first = device.register_producer();
        let second = device.register_producer();
        assert!(first < second);

        device.update_partial(first, Segment::new("", "Testing...")).unwrap();
        device.update_partial(second, Segment::new("", "Writing Code...")).unwrap();
        device.complete_line(second, "Writing Code... done.").unwrap();
        assert_eq!(
            stdout_mock.take_buffer_as_string(),
            "Testing... | Writing Code...\rWriting Code... done.       \nTesting..."
        );

        device.complete_line(first, "Testing... done.").unwrap();
        device.update_partial(second, Segment::new("", "Writing More Code...")).unwrap();
        device.update_partial(first, Segment::new("", "Testing More...")).unwrap();
        assert_eq!(
            stdout_mock.take_buffer_as_string(),
            " done.\nWriting More Code...\rTesting More... | Writing More Code..."
        );
    }

    #[test]
    fn sequential_devices_hold_back_partial_content() {
        let stdout_mock = StdoutMock::default();
        let device = OutputDevice::new_sequential(stdout_mock.clone());
        let id = device.register_producer();
        device.update_partial(id, Segment::new("", "partial")).unwrap();
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "");
        device.complete_line(id, "partial done").unwrap();
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "partial done\n");
    }

    #[test]
    fn release_removes_the_segment() {
        let (stdout_mock, device) = device();
        let first = device.register_producer();
        let second = device.register_producer();
        device.update_partial(first, Segment::new("", "one")).unwrap();
        device.update_partial(second, Segment::new("", "two")).unwrap();
        stdout_mock.clear();
        device.release(first).unwrap();
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "\rtwo      ");
    }

    #[test]
    fn explicit_width_truncates_partial_content() {
        let (stdout_mock, device) = device();
        device.set_terminal_width(Some(10));
        assert_eq!(device.terminal_width(), 10);
        let id = device.register_producer();
        device
            .update_partial(id, Segment::new("", "0123456789abcdef"))
            .unwrap();
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "01234...ef");
    }

    #[test]
    fn switching_to_multi_row_redraws_each_producer_on_its_own_row() {
        let (stdout_mock, device) = device();
        let first = device.register_producer();
        let second = device.register_producer();
        device.update_partial(first, Segment::new("", "one")).unwrap();
        device.update_partial(second, Segment::new("", "two")).unwrap();
        stdout_mock.clear();

        device.enable_multiline_mode().unwrap();
        assert!(device.is_multiline_mode());
        assert_eq!(
            stdout_mock.get_copy_of_buffer_as_string(),
            "\r         \rone\ntwo"
        );
    }

    #[test]
    fn write_failures_are_reported() {
        let device = OutputDevice::new_with_oracle(FailingWriter, FixedWidthOracle::new());
        let id = device.register_producer();
        let result = device.complete_line(id, "lost");
        assert!(matches!(result, Err(LogError::Io { .. })));
    }

    #[test]
    fn clones_share_the_destination() {
        let (_stdout_mock, device) = device();
        let other = device.clone();
        assert!(device.same_destination(&other));
        assert!(!device.same_destination(&OutputDevice::new(Vec::new())));
    }
}
