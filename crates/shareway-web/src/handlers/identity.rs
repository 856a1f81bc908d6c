//! Login, signup, logout and the session probe.
//!
//! Successful logins store the provider's ID token and the user's claims in
//! two cookies; every later request rebuilds its session from them.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use shareway_auth::{Claims, IdentityProvider, SignupRequest};
use shareway_backend::BackendApi;

use crate::error::ApiError;
use crate::outcome::ActionOutcome;
use crate::session::{clear_session_cookies, set_session_cookies, CurrentSession};
use crate::state::AppState;

/// Shown when the provider rejects a login.
pub const LOGIN_FAILED: &str = "Login failed. Please check your credentials.";
/// Shown when the provider rejects a signup.
pub const SIGNUP_FAILED: &str = "Signup failed. Please try again.";

/// Fields of the login form.
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    /// Account email.
    pub email: Option<String>,
    /// Account password.
    pub password: Option<String>,
}

/// Fields of the signup form.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupForm {
    /// Account email.
    pub email: Option<String>,
    /// Account password.
    pub password: Option<String>,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
}

fn redirect(status: StatusCode, location: String) -> Response {
    (status, [(header::LOCATION, location)]).into_response()
}

/// `POST /login`
///
/// # Errors
///
/// Returns `Internal` if the session cookies cannot be written.
pub async fn login<B, I>(
    State(state): State<Arc<AppState<B, I>>>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError>
where
    B: BackendApi + 'static,
    I: IdentityProvider + 'static,
{
    let email = form.email.unwrap_or_default();
    let password = form.password.unwrap_or_default();

    let session = match state.identity.login(&email, &password).await {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!(error = %e, "Login failed");
            return Ok(ActionOutcome::failed(LOGIN_FAILED).into_response());
        }
    };

    let jar = set_session_cookies(jar, &session, state.config.cookie_secure)?;
    tracing::info!(email = %session.email(), "User logged in");

    Ok((jar, redirect(StatusCode::FOUND, "/".to_string())).into_response())
}

/// `POST /signup`
///
/// # Errors
///
/// Returns `Internal` if the session cookies cannot be written.
pub async fn signup<B, I>(
    State(state): State<Arc<AppState<B, I>>>,
    jar: CookieJar,
    Form(form): Form<SignupForm>,
) -> Result<Response, ApiError>
where
    B: BackendApi + 'static,
    I: IdentityProvider + 'static,
{
    let request = SignupRequest {
        email: form.email.unwrap_or_default(),
        password: form.password.unwrap_or_default(),
        first_name: form.first_name.filter(|n| !n.is_empty()),
        last_name: form.last_name.filter(|n| !n.is_empty()),
    };

    let session = match state.identity.signup(&request).await {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!(error = %e, "Signup failed");
            return Ok(ActionOutcome::failed(SIGNUP_FAILED).into_response());
        }
    };

    let jar = set_session_cookies(jar, &session, state.config.cookie_secure)?;
    tracing::info!(email = %session.email(), "User signed up");

    Ok((jar, redirect(StatusCode::SEE_OTHER, "/".to_string())).into_response())
}

/// `POST /logout`
///
/// Clears the session cookies and hands the browser to the provider's
/// logout page, which returns it to the site root.
pub async fn logout<B, I>(State(state): State<Arc<AppState<B, I>>>, jar: CookieJar) -> Response
where
    B: BackendApi + 'static,
    I: IdentityProvider + 'static,
{
    let jar = clear_session_cookies(jar, state.config.cookie_secure);
    let location = state
        .identity
        .logout_url(&state.config.logout_return_url());

    (jar, redirect(StatusCode::SEE_OTHER, location)).into_response()
}

/// Session summary for page layouts.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    /// Whether the viewer is logged in.
    pub is_authenticated: bool,
    /// The viewer's claims.
    pub user: Claims,
}

/// `GET /session`
pub async fn session(session: CurrentSession) -> Json<SessionView> {
    Json(SessionView {
        is_authenticated: session.is_authenticated(),
        user: session.claims().clone(),
    })
}
