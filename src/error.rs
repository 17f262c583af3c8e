//! The error type for the signing and invocation pipeline.

use bytes::Bytes;
use http::StatusCode;
use thiserror::Error as ThisError;

/// Convenience type alias for results produced by this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for signing and invocation operations.
///
/// A non-success HTTP answer and a failure to reach the endpoint are distinct
/// variants on purpose: callers branch differently on each.
#[derive(ThisError, Debug)]
pub enum Error {
    /// Key material is missing or empty. Raised before any network activity.
    #[error("invalid credential: {0}")]
    CredentialInvalid(String),

    /// The request cannot be signed or assembled as described.
    #[error("invalid request: {0}")]
    RequestInvalid(String),

    /// Name resolution, connection or timeout failure. The endpoint never
    /// answered, so no request was transmitted successfully.
    #[error("transport failure: {source}")]
    Transport {
        /// The underlying client error.
        #[source]
        source: anyhow::Error,
    },

    /// The endpoint answered with a non-success status. This is an outcome to
    /// branch on, not a pipeline fault; status and body are returned verbatim.
    #[error("server returned {status}")]
    Http {
        /// Exact status code of the answer.
        status: StatusCode,
        /// Body bytes of the answer, untouched.
        body: Bytes,
    },

    /// Internal faults callers are not expected to branch on.
    #[error("unexpected error: {0}")]
    Unexpected(#[from] anyhow::Error),
}

impl Error {
    /// Wrap a client error as a transport failure.
    pub(crate) fn transport(err: impl Into<anyhow::Error>) -> Self {
        Error::Transport { source: err.into() }
    }

    /// Status code of an [`Error::Http`] outcome.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if the request never reached the endpoint.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport { .. })
    }
}

impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Error::Unexpected(anyhow::Error::new(err))
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Error::RequestInvalid(err.to_string())
    }
}

impl From<http::header::InvalidHeaderName> for Error {
    fn from(err: http::header::InvalidHeaderName) -> Self {
        Error::RequestInvalid(err.to_string())
    }
}
