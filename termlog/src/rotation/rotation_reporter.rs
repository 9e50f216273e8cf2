// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt::{self, Debug, Formatter},
          io,
          path::PathBuf,
          sync::Arc};

use crate::{LockRecoverExt, PrintLogger, StdMutex, printf};

/// Something a [`crate::RotatingFile`] noticed while writing.
#[derive(Debug)]
pub enum RotationEvent {
    Rotated { path: PathBuf, size: u64 },
    RenameFailed { path: PathBuf, error: io::Error },
    ReopenFailed { path: PathBuf, error: io::Error },
    WriteFailed { path: PathBuf, error: io::Error },
    NotOpen { path: PathBuf },
}

/// Collects [`RotationEvent`]s and hands them to a [`PrintLogger`] side channel (and
/// [`tracing`]) later, from [`Self::deliver`].
///
/// A [`crate::RotatingFile`] writes while its device's lock and the writing logger's
/// lock are held. A side channel or a tracing subscriber that writes to that same logger
/// would deadlock if it were called right away.
#[derive(Clone)]
pub struct RotationReporter {
    inner: Arc<ReporterInner>,
}

struct ReporterInner {
    pending: StdMutex<Vec<RotationEvent>>,
    side_channel: Box<dyn PrintLogger>,
}

impl Debug for RotationReporter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("RotationReporter")
            .field("pending", &self.inner.pending.lock_recover().len())
            .field("side_channel", &self.inner.side_channel)
            .finish()
    }
}

impl RotationReporter {
    pub fn new(side_channel: impl PrintLogger + 'static) -> Self {
        Self {
            inner: Arc::new(ReporterInner {
                pending: StdMutex::new(Vec::new()),
                side_channel: Box::new(side_channel),
            }),
        }
    }

    pub fn record(&self, event: RotationEvent) {
        self.inner.pending.lock_recover().push(event);
    }

    #[must_use]
    pub fn pending(&self) -> usize { self.inner.pending.lock_recover().len() }

    /// Reports everything recorded so far. Events recorded while delivering (a
    /// subscriber writing to the rotating file) wait for the next call.
    pub fn deliver(&self) {
        let events = std::mem::take(&mut *self.inner.pending.lock_recover());
        for event in events {
            self.deliver_one(event);
        }
    }

    fn deliver_one(&self, event: RotationEvent) {
        let side_channel = &self.inner.side_channel;
        let result = match event {
            RotationEvent::Rotated { path, size } => {
                tracing::debug!(path = %path.display(), size, "rotated log file");
                return;
            }
            RotationEvent::RenameFailed { path, error } => printf!(
                side_channel,
                "@(red:Error renaming log file {} on rotation: {})\n",
                path.display(),
                error
            ),
            RotationEvent::ReopenFailed { path, error } => printf!(
                side_channel,
                "@(red:Error opening new log file {} on rotation: {})\n",
                path.display(),
                error
            ),
            RotationEvent::WriteFailed { path, error } => printf!(
                side_channel,
                "@(red:Error writing to log file {}: {})\n",
                path.display(),
                error
            ),
            RotationEvent::NotOpen { path } => printf!(
                side_channel,
                "@(red:Log file {} is not open, the write was dropped)\n",
                path.display()
            ),
        };
        if let Err(error) = result {
            tracing::error!(?error, "failed to report a log file error");
        }
    }
}
