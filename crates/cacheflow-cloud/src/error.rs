//! Cache cluster error types

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Error returned by a remote cache API call.
///
/// Values compare by content so a wrapped cause can be checked with `==`
/// after it has travelled through [`Error`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Cache cluster not found: {0}")]
    NotFound(String),

    #[error("API error ({code}): {message}")]
    Service { code: String, message: String },

    #[error("Request throttled: {0}")]
    Throttled(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Call cancelled")]
    Cancelled,

    #[error("Deadline exceeded after {0:?}")]
    DeadlineExceeded(Duration),
}

impl ApiError {
    pub fn service(code: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Service {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Check if the remote resource does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }

    /// Check if the call was aborted by the caller's context
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled | ApiError::DeadlineExceeded(_))
    }

    /// Whether a later tick has a reasonable chance of succeeding
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Throttled(_) | ApiError::Transport(_) | ApiError::DeadlineExceeded(_) => {
                true
            }
            ApiError::Service { code, .. } => {
                code.starts_with("InvalidCacheClusterState") || code == "ServiceUnavailable"
            }
            ApiError::NotFound(_) | ApiError::Cancelled => false,
        }
    }
}

/// Failure to build a client bound to the resource's account and region.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectError {
    #[error("No region configured for cache cluster {0}")]
    MissingRegion(String),

    #[error("Invalid provider configuration: {0}")]
    InvalidConfig(String),
}

/// Lifecycle call that produced an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Connect,
    Describe,
    Create,
    Modify,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Connect => write!(f, "connect"),
            Operation::Describe => write!(f, "describe"),
            Operation::Create => write!(f, "create"),
            Operation::Modify => write!(f, "modify"),
            Operation::Delete => write!(f, "delete"),
        }
    }
}

/// Error surfaced to the reconciliation scheduler.
///
/// Every variant keeps the original cause and is tagged with the lifecycle
/// call that failed, so "could not describe" and "could not delete" are
/// distinguishable without inspecting the cause.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("cannot connect to cache provider: {0}")]
    Connect(#[source] ConnectError),

    #[error("cannot describe cache cluster: {0}")]
    Describe(#[source] ApiError),

    #[error("cannot create cache cluster: {0}")]
    Create(#[source] ApiError),

    #[error("cannot modify cache cluster: {0}")]
    Modify(#[source] ApiError),

    #[error("cannot delete cache cluster: {0}")]
    Delete(#[source] ApiError),
}

impl Error {
    pub fn operation(&self) -> Operation {
        match self {
            Error::Connect(_) => Operation::Connect,
            Error::Describe(_) => Operation::Describe,
            Error::Create(_) => Operation::Create,
            Error::Modify(_) => Operation::Modify,
            Error::Delete(_) => Operation::Delete,
        }
    }

    /// The remote call error, if this failure came from a remote call
    pub fn cause(&self) -> Option<&ApiError> {
        match self {
            Error::Connect(_) => None,
            Error::Describe(e) | Error::Create(e) | Error::Modify(e) | Error::Delete(e) => Some(e),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cause().is_some_and(ApiError::is_cancelled)
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Connect(_) => false,
            _ => self.cause().is_some_and(ApiError::is_retryable),
        }
    }
}

impl From<ConnectError> for Error {
    fn from(err: ConnectError) -> Self {
        Error::Connect(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
