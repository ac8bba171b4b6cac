use std::io;
use thiserror::Error;

use crate::client;

/// The single failure vocabulary of the keyword library.
///
/// Whatever the client or the local filesystem reports is translated into
/// one of these variants, each carrying a readable message.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Please connect to HDFS first.")]
    NotConnected,
    #[error("Invalid HDFS url '{0}', expected scheme://host:port/path")]
    InvalidUrl(String),
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
    #[error("Invalid permission '{0}', expected an octal mode such as 755")]
    InvalidPermission(String),
    #[error("HDFS operation failed: {0}")]
    Operation(String),
    #[error("I/O: {0}")]
    IO(String),
}

pub type HdfsResult<T> = Result<T, Error>;

impl From<client::error::Error> for Error {
    fn from(err: client::error::Error) -> Self {
        Self::Operation(err.to_string())
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::IO(err.to_string())
    }
}

impl From<glob::GlobError> for Error {
    fn from(err: glob::GlobError) -> Self {
        Self::IO(err.to_string())
    }
}

impl Error {
    pub(crate) fn pattern(pattern: &str, err: &glob::PatternError) -> Self {
        Self::InvalidPattern {
            pattern: pattern.to_owned(),
            message: err.msg.to_owned(),
        }
    }

    /// Returns `true` for the error raised before any successful connect
    pub const fn is_not_connected(&self) -> bool {
        matches!(self, Self::NotConnected)
    }
}
