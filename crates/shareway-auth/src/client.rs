//! Auth0 client for signup, login, and user-info lookups.
//!
//! Login is a resource-owner password grant followed by a user-info lookup
//! with the issued access token. The resulting [`Session`] carries the
//! provider's `id_token` as its bearer credential.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, Result};
use crate::session::{Claims, Session};
use crate::AuthConfig;

/// Account details submitted on signup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupRequest {
    /// Email address, also the login name.
    pub email: String,
    /// Password.
    pub password: String,
    /// Optional given name.
    pub first_name: Option<String>,
    /// Optional family name.
    pub last_name: Option<String>,
}

/// Trait for the external identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchange credentials for a session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::LoginFailed` if the credentials are refused and
    /// `AuthError::UserInfoFailed` if the claims cannot be fetched.
    async fn login(&self, email: &str, password: &str) -> Result<Session>;

    /// Create an account, wait for it to propagate, then log in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SignupFailed` if the account cannot be created, or
    /// any error from the follow-up login.
    async fn signup(&self, request: &SignupRequest) -> Result<Session>;

    /// The browser-redirect logout URL, returning to `return_to` afterwards.
    fn logout_url(&self, return_to: &str) -> String;
}

/// Body of the database signup endpoint.
#[derive(Debug, Clone, Serialize)]
struct SignupBody<'a> {
    client_id: &'a str,
    email: &'a str,
    password: &'a str,
    connection: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    given_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    family_name: Option<&'a str>,
}

/// Body of the password-grant token endpoint.
#[derive(Debug, Clone, Serialize)]
struct TokenBody<'a> {
    grant_type: &'static str,
    username: &'a str,
    password: &'a str,
    audience: String,
    scope: &'static str,
    client_id: &'a str,
}

/// Tokens issued by the password grant.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    id_token: String,
    access_token: String,
}

/// Error body returned by the provider. Endpoints disagree on field names.
#[derive(Debug, Default, Deserialize)]
struct ProviderErrorResponse {
    error: Option<String>,
    error_description: Option<String>,
    description: Option<String>,
    message: Option<String>,
}

impl ProviderErrorResponse {
    fn reason(self) -> Option<String> {
        self.error_description
            .or(self.description)
            .or(self.message)
            .or(self.error)
    }
}

/// Client for the Auth0 authentication API.
pub struct Auth0Client {
    config: AuthConfig,
    client: reqwest::Client,
}

impl Auth0Client {
    /// Create a new client with the given configuration.
    ///
    /// No request timeout is configured; the transport defaults apply.
    #[must_use]
    pub fn new(config: AuthConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Create a new client with a custom reqwest client.
    #[must_use]
    pub fn with_client(client: reqwest::Client, config: AuthConfig) -> Self {
        Self { config, client }
    }

    /// The client configuration.
    #[must_use]
    pub const fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Fetch the claims for an access token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserInfoFailed` on any failure.
    pub async fn user_info(&self, access_token: &str) -> Result<Claims> {
        let response = self
            .client
            .get(self.config.userinfo_url())
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::UserInfoFailed(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::UserInfoFailed(format!("HTTP {status}")));
        }

        response
            .json()
            .await
            .map_err(|e| AuthError::UserInfoFailed(format!("invalid response: {e}")))
    }

    /// Map a non-2xx provider response to an error.
    async fn provider_error(
        response: reqwest::Response,
        wrap: fn(String) -> AuthError,
    ) -> AuthError {
        let status = response.status();
        if status.as_u16() == 429 {
            return AuthError::RateLimited;
        }

        let reason = response
            .json::<ProviderErrorResponse>()
            .await
            .ok()
            .and_then(ProviderErrorResponse::reason)
            .unwrap_or_else(|| format!("HTTP {status}"));
        wrap(reason)
    }
}

#[async_trait]
impl IdentityProvider for Auth0Client {
    async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let body = TokenBody {
            grant_type: "password",
            username: email,
            password,
            audience: self.config.audience(),
            scope: "openid profile email",
            client_id: &self.config.client_id,
        };

        let response = self
            .client
            .post(self.config.token_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthError::Internal(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Self::provider_error(response, AuthError::LoginFailed).await);
        }

        let tokens: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::LoginFailed(format!("invalid token response: {e}")))?;

        let claims = self.user_info(&tokens.access_token).await?;
        tracing::info!(email = ?claims.email, "User logged in");

        Ok(Session::new(tokens.id_token, claims))
    }

    async fn signup(&self, request: &SignupRequest) -> Result<Session> {
        let body = SignupBody {
            client_id: &self.config.client_id,
            email: &request.email,
            password: &request.password,
            connection: &self.config.connection,
            given_name: request.first_name.as_deref().filter(|s| !s.is_empty()),
            family_name: request.last_name.as_deref().filter(|s| !s.is_empty()),
        };

        let response = self
            .client
            .post(self.config.signup_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthError::Internal(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Self::provider_error(response, AuthError::SignupFailed).await);
        }

        // Roles are attached asynchronously after signup; the provider gives no
        // completion signal, so wait a fixed interval before the first login.
        tracing::debug!(
            delay_ms = self.config.signup_propagation_delay.as_millis(),
            "Waiting for signup to propagate"
        );
        tokio::time::sleep(self.config.signup_propagation_delay).await;

        self.login(&request.email, &request.password).await
    }

    fn logout_url(&self, return_to: &str) -> String {
        self.config.logout_url(return_to)
    }
}
