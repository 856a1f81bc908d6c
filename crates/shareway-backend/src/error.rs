//! Error types for backend API calls.

use thiserror::Error;

/// A result type using `GatewayError`.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Errors that can occur when calling the backend API.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request never produced a response (connect, TLS, read failure).
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-2xx status.
    #[error("backend returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Error text from the response body, or a generic description.
        message: String,
    },

    /// The response body did not have the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The request could not be built.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl GatewayError {
    /// The HTTP status returned by the backend, when there was a response.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(_) | Self::Decode(_) | Self::InvalidRequest(_) => None,
        }
    }

    /// Returns `true` if the backend answered with exactly `status`.
    #[must_use]
    pub fn is_status(&self, status: u16) -> bool {
        self.status() == Some(status)
    }

    /// Returns `true` if the backend reported the resource as missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.is_status(404)
    }
}
