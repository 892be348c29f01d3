// std imports
use std::io;

// third-party imports
use thiserror::Error;

/// Error is an error which may occur in the application.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("invalid log level {value:?}")]
    InvalidLevel { value: String },
    #[error("unknown tri-state value {value:?}")]
    InvalidTriState { value: String },
    #[error("invalid log output {value:?}, expected \"stdout\", \"stderr\", \"file:<path>\" or \"pattern:<path>\"")]
    InvalidOutput { value: String },
    #[error("unknown log format {value:?}, expected one of [\"console\", \"json\"]")]
    InvalidFormat { value: String },
    #[error("logger is already initialized")]
    AlreadyInitialized,
    #[error("failed to open file for appending: {name:?}")]
    OpenFile {
        name: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to sync file before closing: {name:?}")]
    SyncFile {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// Result is an alias for standard result with bound Error type.
pub type Result<T> = std::result::Result<T, Error>;
