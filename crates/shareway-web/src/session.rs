//! Session extractor and session cookies.
//!
//! This module provides the `CurrentSession` extractor that rebuilds the
//! browser session from its cookies, and the helpers that set and clear those
//! cookies on login and logout.

use std::convert::Infallible;
use std::ops::Deref;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;
use time::Duration;

use shareway_auth::{Session, TOKEN_COOKIE, USER_INFO_COOKIE};

use crate::error::ApiError;

/// Lifetime of both session cookies.
pub const SESSION_MAX_AGE: Duration = Duration::days(7);

/// The session of the current request.
///
/// Extraction never fails: a request without cookies, or with a user-info
/// cookie that cannot be decoded, yields an anonymous session.
#[derive(Debug, Clone, Default)]
pub struct CurrentSession(pub Session);

impl CurrentSession {
    /// The bearer credential, or `Unauthorized` when there is none.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` for anonymous sessions.
    pub fn require_token(&self) -> Result<&str, ApiError> {
        self.0.token().ok_or(ApiError::Unauthorized)
    }

    /// The bearer credential of an admin session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` without a credential and
    /// `ApiError::Forbidden` without the admin role.
    pub fn require_admin(&self) -> Result<&str, ApiError> {
        let token = self.require_token()?;
        if !self.0.is_admin() {
            return Err(ApiError::Forbidden);
        }
        Ok(token)
    }
}

impl Deref for CurrentSession {
    type Target = Session;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let session = Session::from_cookie_values(
            jar.get(TOKEN_COOKIE).map(Cookie::value),
            jar.get(USER_INFO_COOKIE).map(Cookie::value),
        );
        Ok(Self(session))
    }
}

fn session_cookie(name: &'static str, value: String, secure: bool, max_age: Duration) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(max_age)
        .build()
}

/// Add both session cookies for a freshly issued session.
///
/// # Errors
///
/// Returns `ApiError::Internal` if the claims cannot be encoded.
pub fn set_session_cookies(
    jar: CookieJar,
    session: &Session,
    secure: bool,
) -> Result<CookieJar, ApiError> {
    let user_info = session.claims().to_cookie()?;
    let token = session.token().unwrap_or_default().to_string();

    Ok(jar
        .add(session_cookie(TOKEN_COOKIE, token, secure, SESSION_MAX_AGE))
        .add(session_cookie(USER_INFO_COOKIE, user_info, secure, SESSION_MAX_AGE)))
}

/// Expire both session cookies.
#[must_use]
pub fn clear_session_cookies(jar: CookieJar, secure: bool) -> CookieJar {
    jar.add(session_cookie(TOKEN_COOKIE, String::new(), secure, Duration::ZERO))
        .add(session_cookie(USER_INFO_COOKIE, String::new(), secure, Duration::ZERO))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, Request};
    use shareway_auth::Claims;

    async fn extract(cookie: &str) -> CurrentSession {
        let request = Request::builder()
            .header(header::COOKIE, cookie)
            .body(())
            .unwrap();
        let (mut parts, ()) = request.into_parts();
        CurrentSession::from_request_parts(&mut parts, &())
            .await
            .unwrap()
    }

    fn claims() -> Claims {
        Claims {
            email: Some("ann@x.com".into()),
            name: Some("Ann".into()),
            ..Claims::default()
        }
    }

    #[tokio::test]
    async fn extracts_session_from_cookies() {
        let user_info = claims().to_cookie().unwrap();
        let session = extract(&format!("jwt_token=tok; user_info={user_info}")).await;

        assert!(session.is_authenticated());
        assert_eq!(session.require_token().unwrap(), "tok");
        assert!(matches!(session.require_admin(), Err(ApiError::Forbidden)));
    }

    #[tokio::test]
    async fn malformed_user_info_is_anonymous() {
        let session = extract("jwt_token=tok; user_info=%7Bbroken").await;

        assert!(!session.is_authenticated());
        assert_eq!(session.claims(), &Claims::default());
        assert_eq!(session.require_token().unwrap(), "tok");
    }

    #[tokio::test]
    async fn missing_cookies_are_anonymous() {
        let session = extract("other=1").await;
        assert!(matches!(session.require_token(), Err(ApiError::Unauthorized)));
    }

    #[test]
    fn cookie_attributes() {
        let session = Session::new("tok", claims());
        let jar = set_session_cookies(CookieJar::new(), &session, true).unwrap();

        let token = jar.get(TOKEN_COOKIE).unwrap();
        assert_eq!(token.value(), "tok");
        assert_eq!(token.max_age(), Some(Duration::days(7)));
        assert_eq!(token.same_site(), Some(SameSite::Lax));
        assert_eq!(token.http_only(), Some(true));
        assert_eq!(token.secure(), Some(true));

        let cleared = clear_session_cookies(jar, false);
        assert_eq!(cleared.get(USER_INFO_COOKIE).unwrap().max_age(), Some(Duration::ZERO));
        assert_eq!(cleared.get(USER_INFO_COOKIE).unwrap().value(), "");
    }
}
