//! Identity bridge for shareway.
//!
//! This crate owns everything the web layer knows about identity:
//!
//! - [`Session`] and [`Claims`], rebuilt from cookies on every request
//! - the cookie value codec for the user-info cookie
//! - the [`IdentityProvider`] trait and its Auth0 implementation
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐     ┌────────────────────┐
//! │  Web handlers    │────▶│  IdentityProvider  │
//! │  (login/signup)  │     │  (trait)           │
//! └──────────────────┘     └─────────┬──────────┘
//!          │                         │
//!          │ cookies       ┌─────────▼──────────┐
//!          ▼               │   Auth0Client      │
//! ┌──────────────────┐     └─────────┬──────────┘
//! │  Session         │               │ HTTPS
//! │  (per request)   │     ┌─────────▼──────────┐
//! └──────────────────┘     │  /oauth/token      │
//!                          │  /oauth/userinfo   │
//!                          │  /dbconnections/.. │
//!                          └────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use shareway_auth::{Auth0Client, AuthConfig, IdentityProvider};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AuthConfig::for_domain("shareway.eu.auth0.com", "client-id");
//! let provider = Auth0Client::new(config);
//!
//! let session = provider.login("ann@example.com", "secret").await?;
//! println!("Logged in as {}", session.email());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::time::Duration;

pub mod client;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod session;

pub use client::{Auth0Client, IdentityProvider, SignupRequest};
pub use error::{AuthError, Result};
#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockIdentityProvider;
pub use session::{Claims, Session, ADMIN_ROLE, TOKEN_COOKIE, USER_INFO_COOKIE};

/// Default database connection for password accounts.
pub const DEFAULT_CONNECTION: &str = "Username-Password-Authentication";

/// Configuration for the Auth0 tenant.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Base URL of the tenant (e.g., `https://shareway.eu.auth0.com`).
    pub base_url: String,
    /// Application client ID.
    pub client_id: String,
    /// Database connection used for signup.
    pub connection: String,
    /// Wait between account creation and the first login.
    pub signup_propagation_delay: Duration,
}

impl AuthConfig {
    /// Create a configuration for a base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client_id: client_id.into(),
            connection: DEFAULT_CONNECTION.to_string(),
            signup_propagation_delay: Duration::from_secs(2),
        }
    }

    /// Create a configuration for a tenant domain such as `tenant.auth0.com`.
    #[must_use]
    pub fn for_domain(domain: &str, client_id: impl Into<String>) -> Self {
        Self::new(format!("https://{domain}"), client_id)
    }

    /// Get the password-grant token endpoint URL.
    #[must_use]
    pub fn token_url(&self) -> String {
        format!("{}/oauth/token", self.base_url)
    }

    /// Get the user-info endpoint URL.
    #[must_use]
    pub fn userinfo_url(&self) -> String {
        format!("{}/oauth/userinfo", self.base_url)
    }

    /// Get the database signup endpoint URL.
    #[must_use]
    pub fn signup_url(&self) -> String {
        format!("{}/dbconnections/signup", self.base_url)
    }

    /// Get the browser-redirect logout URL.
    #[must_use]
    pub fn logout_url(&self, return_to: &str) -> String {
        format!(
            "{}/v2/logout?client_id={}&returnTo={}",
            self.base_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(return_to)
        )
    }

    /// Get the audience requested with the password grant.
    #[must_use]
    pub fn audience(&self) -> String {
        format!("{}/api/v2/", self.base_url)
    }
}
