// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::fmt::Debug;

use crate::{LogError, Logger, PrintfArgs, ok, remove_protect_markers};

/// Where a [`crate::RotatingFile`] reports problems it can't return to its caller.
/// Messages may contain color template tags. Reports are delivered by a
/// [`crate::RotationReporter`] while no logger or device lock is held.
pub trait PrintLogger: Debug + Send + Sync {
    /// # Errors
    ///
    /// If the report itself can't be written.
    fn printf(&self, args: PrintfArgs<'_>) -> Result<(), LogError>;

    /// # Errors
    ///
    /// If the report itself can't be written.
    fn println(&self, text: &str) -> Result<(), LogError>;
}

impl PrintLogger for Logger {
    fn printf(&self, args: PrintfArgs<'_>) -> Result<(), LogError> {
        Logger::printf(self, args)
    }

    fn println(&self, text: &str) -> Result<(), LogError> { Logger::println(self, text) }
}

/// Reports as [`tracing::error!`] events, without template expansion.
#[derive(Copy, Clone, Debug, Default)]
pub struct TracingPrintLogger;

impl PrintLogger for TracingPrintLogger {
    fn printf(&self, args: PrintfArgs<'_>) -> Result<(), LogError> {
        let message = remove_protect_markers(&args.to_string()).into_owned();
        tracing::error!(message = %message.trim_end());
        ok!()
    }

    fn println(&self, text: &str) -> Result<(), LogError> {
        tracing::error!(message = %text);
        ok!()
    }
}
