// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Routes [`tracing`] events through a [`Logger`], so they take part in partial line
//! coordination like any other output on the same destination.

use tracing::{Level, Subscriber};
use tracing_subscriber::fmt::{MakeWriter, SubscriberBuilder};

use crate::Logger;

/// Every event gets its own handle; they all share one partial line buffer, and the
/// `fmt` layer writes each event in one piece ending with a line terminator.
impl<'a> MakeWriter<'a> for Logger {
    type Writer = Logger;

    fn make_writer(&'a self) -> Self::Writer { self.clone() }
}

/// A `fmt` subscriber writing every event as a completed line of `logger`. Install it
/// with [`tracing::subscriber::set_default`] (scoped) or use
/// [`try_initialize_tracing`] (process-wide).
#[must_use]
pub fn create_tracing_subscriber(
    logger: &Logger,
    max_level: Level,
) -> impl Subscriber + Send + Sync + 'static {
    SubscriberBuilder::default()
        .with_writer(logger.clone())
        .with_max_level(max_level)
        .with_target(false)
        .finish()
}

/// Makes `logger` the destination of all [`tracing`] events in the process.
///
/// # Errors
///
/// If a global subscriber is already set.
pub fn try_initialize_tracing(logger: &Logger, max_level: Level) -> miette::Result<()> {
    tracing::subscriber::set_global_default(create_tracing_subscriber(logger, max_level))
        .map_err(|error| miette::miette!("failed to set the tracing subscriber: {error}"))
}
