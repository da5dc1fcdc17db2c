//! Failure taxonomy surfaced by the request executor.
//!
//! These errors are transport agnostic; the executor maps adapter failures
//! into them before anything reaches a caller or the per-instance error state.

/// Errors produced by [`crate::domain::FetchCache::execute`].
///
/// `Cancelled` is an expected outcome of rapid re-invocation and is never
/// written into the instance's error state; the remaining variants are.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The session was not authenticated when the request started.
    #[error("User not authenticated or token missing")]
    Auth,
    /// The backend answered with a non-success status.
    #[error("{message}")]
    Http { status: u16, message: String },
    /// The request was superseded by a newer call or by teardown.
    #[error("Request was cancelled")]
    Cancelled,
    /// Transport or decoding failure outside the HTTP status contract.
    #[error("{message}")]
    Unexpected { message: String },
}

impl ApiError {
    /// Build an HTTP failure from a status code and display message.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Build an unexpected failure from any human-readable message.
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }

    /// Whether this failure is the swallowed cancellation outcome.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
