//! Error types.

use std::fmt;

/// A boxed, thread-safe error, used for transport and body failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type returned by reqlog's fallible operations.
///
/// This type surfaces infrastructure failures: binding to a port, accepting
/// a connection, or an outbound round trip that produced no response.
/// Application-level failures (404, 500, ...) are ordinary responses and
/// never show up here.
#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Transport(BoxError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e)        => write!(f, "io: {e}"),
            Self::Transport(e) => write!(f, "transport: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e)        => Some(e),
            Self::Transport(e) => Some(e.as_ref()),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<hyper_util::client::legacy::Error> for Error {
    fn from(e: hyper_util::client::legacy::Error) -> Self {
        Self::Transport(Box::new(e))
    }
}

/// A logger failed to record an entry.
///
/// Every call site in this crate discards it: logging is best-effort and must
/// never change the outcome of the operation it instruments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogError(String);

impl LogError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "log: {}", self.0)
    }
}

impl std::error::Error for LogError {}
