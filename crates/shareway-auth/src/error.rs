//! Authentication error types.

use thiserror::Error;

/// A result type using `AuthError`.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Errors that can occur while talking to the identity provider or decoding
/// session cookies.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The password grant was refused.
    #[error("login failed: {0}")]
    LoginFailed(String),

    /// The provider refused to create the account.
    #[error("signup failed: {0}")]
    SignupFailed(String),

    /// The user-info lookup failed or returned an unexpected shape.
    #[error("user info lookup failed: {0}")]
    UserInfoFailed(String),

    /// The user-info cookie could not be decoded.
    #[error("invalid user info cookie: {0}")]
    InvalidCookie(String),

    /// Too many authentication attempts, rate limited.
    #[error("rate limited")]
    RateLimited,

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Returns the appropriate HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::LoginFailed(_) | Self::UserInfoFailed(_) => 401,
            Self::SignupFailed(_) | Self::InvalidCookie(_) => 400,
            Self::RateLimited => 429,
            Self::Internal(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_error_status_codes() {
        assert_eq!(AuthError::LoginFailed("x".into()).http_status_code(), 401);
        assert_eq!(AuthError::UserInfoFailed("x".into()).http_status_code(), 401);
        assert_eq!(AuthError::SignupFailed("x".into()).http_status_code(), 400);
        assert_eq!(AuthError::RateLimited.http_status_code(), 429);
        assert_eq!(AuthError::Internal("x".into()).http_status_code(), 500);
    }
}
