use std::io;
use thiserror::Error;
use tokio::time::error::Elapsed as TimeElapsed;

/// Enum for errors raised by an HDFS client
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Contains a `RemoteException` reported by the NameNode
    #[error("{exception}: {message}")]
    Remote { exception: String, message: String },
    /// Any errors related to I/O
    #[error("I/O: {0}")]
    IO(String),
    /// Time limit for receiving a response exceeded
    #[error("Timeout")]
    Timeout,
    /// Occurs when the remote side behaves contrary to the protocol
    #[error("{0}")]
    UnexpectedBehavior(String),
}

impl Error {
    pub fn remote<E: Into<String>, M: Into<String>>(exception: E, message: M) -> Self {
        Self::Remote {
            exception: exception.into(),
            message: message.into(),
        }
    }

    pub fn not_found(path: &str) -> Self {
        Self::remote(
            "FileNotFoundException",
            format!("File {path} does not exist."),
        )
    }

    pub fn already_exists(path: &str) -> Self {
        Self::remote(
            "FileAlreadyExistsException",
            format!("{path} already exists"),
        )
    }

    /// Returns `true` if the remote side reported a missing path
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Remote { exception, .. } if exception == "FileNotFoundException")
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Self::IO(error.to_string())
    }
}

impl From<TimeElapsed> for Error {
    fn from(_: TimeElapsed) -> Self {
        Self::Timeout
    }
}
