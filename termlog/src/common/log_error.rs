// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::path::PathBuf;

/// Every reportable failure in this crate. Malformed color templates are not errors,
/// they pass through as literal text.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum LogError {
    /// The destination rejected a write.
    #[error("failed to write to the log destination")]
    #[diagnostic(
        code(termlog::destination::io),
        help("The destination (terminal, pipe or file) may have been closed.")
    )]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// The rotating log file has no open handle, usually because reopening it after a
    /// rotation failed.
    #[error("Logfile not open: {}", path.display())]
    #[diagnostic(
        code(termlog::rotation::not_open),
        help("The next successful rotation reopens the file.")
    )]
    DestinationNotOpen { path: PathBuf },

    #[error("can't create the log directory {}", path.display())]
    #[diagnostic(
        code(termlog::rotation::create_dir),
        help("Check that the parent path exists and is writable.")
    )]
    CreateLogDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("can't open the log file {}", path.display())]
    #[diagnostic(
        code(termlog::rotation::open_file),
        help("Check the file permissions.")
    )]
    OpenLogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

mod converters {
    use super::LogError;

    impl From<LogError> for std::io::Error {
        fn from(error: LogError) -> Self {
            match error {
                LogError::Io { source } => source,
                other => std::io::Error::other(other),
            }
        }
    }
}
