//! In-memory identity provider for tests.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::client::{IdentityProvider, SignupRequest};
use crate::error::{AuthError, Result};
use crate::session::{Claims, Session};

/// Identity provider backed by an in-memory account table.
///
/// Issued tokens have the form `test-token:<email>`.
#[derive(Debug, Default)]
pub struct MockIdentityProvider {
    accounts: Mutex<HashMap<String, (String, Claims)>>,
}

impl MockIdentityProvider {
    /// Create a provider with no accounts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account.
    #[must_use]
    pub fn with_account(self, email: &str, password: &str, claims: Claims) -> Self {
        self.accounts
            .lock()
            .insert(email.to_string(), (password.to_string(), claims));
        self
    }

    /// Number of registered accounts.
    #[must_use]
    pub fn account_count(&self) -> usize {
        self.accounts.lock().len()
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let accounts = self.accounts.lock();
        match accounts.get(email) {
            Some((expected, claims)) if expected == password => {
                Ok(Session::new(format!("test-token:{email}"), claims.clone()))
            }
            _ => Err(AuthError::LoginFailed("invalid credentials".to_string())),
        }
    }

    async fn signup(&self, request: &SignupRequest) -> Result<Session> {
        {
            let mut accounts = self.accounts.lock();
            if accounts.contains_key(&request.email) {
                return Err(AuthError::SignupFailed("user already exists".to_string()));
            }

            let name = [request.first_name.as_deref(), request.last_name.as_deref()]
                .into_iter()
                .flatten()
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            let claims = Claims {
                email: Some(request.email.clone()),
                name: Some(if name.is_empty() { request.email.clone() } else { name }),
                given_name: request.first_name.clone(),
                family_name: request.last_name.clone(),
                user_roles: BTreeSet::from(["user".to_string()]),
                ..Claims::default()
            };
            accounts.insert(request.email.clone(), (request.password.clone(), claims));
        }

        self.login(&request.email, &request.password).await
    }

    fn logout_url(&self, return_to: &str) -> String {
        format!(
            "https://idp.test/v2/logout?client_id=test&returnTo={}",
            urlencoding::encode(return_to)
        )
    }
}
