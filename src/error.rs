//! Uniform error value shared by every stage of the invocation pipeline
//!
//! Whatever goes wrong between building a request and delivering its result,
//! the caller only ever observes a [`ServiceError`]. Lower-level failures
//! (HTTP machinery, JSON parsing, ...) are coerced into one of the five
//! variants before they cross the invoker boundary.

use thiserror::Error;

/// Classification of a [`ServiceError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid caller input, construction failure or an unimplemented
    /// service extension point
    Client,
    /// The exchange itself failed without any semantic status from the
    /// remote service
    Transport,
    /// The remote service replied with a non-success status
    Server,
    /// No reply arrived within the configured window
    Timeout,
    /// The exchange succeeded but there was nothing to analyze
    EmptyResponse,
}

/// Error reported through the failure callback of a service invocation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    /// Invalid caller input, construction failure or an unimplemented
    /// service extension point
    #[error("{0}")]
    Client(String),

    /// The exchange failed before the remote service produced a status
    #[error("request could not be delivered: {0}")]
    Transport(String),

    /// The remote service replied with a non-success status
    #[error("service responded with status {status}: {message}")]
    Server {
        /// Status code reported by the remote service
        status: u16,
        /// Error description reported by the remote service
        message: String,
    },

    /// No reply arrived within the configured window
    #[error("no response received within {0}ms")]
    Timeout(u64),

    /// The exchange succeeded but the payload was empty or unusable
    #[error("{0}")]
    EmptyResponse(String),
}

impl ServiceError {
    /// Returns the classification of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Client(_) => ErrorKind::Client,
            ServiceError::Transport(_) => ErrorKind::Transport,
            ServiceError::Server { .. } => ErrorKind::Server,
            ServiceError::Timeout(_) => ErrorKind::Timeout,
            ServiceError::EmptyResponse(_) => ErrorKind::EmptyResponse,
        }
    }

    /// Status code carried by the error, present for server-side failures only
    pub fn status(&self) -> Option<u16> {
        match self {
            ServiceError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<hyper::Error> for ServiceError {
    fn from(e: hyper::Error) -> Self {
        ServiceError::Transport(e.to_string())
    }
}
