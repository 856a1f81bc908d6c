//! Session values derived from the browser's cookies.
//!
//! Two cookies carry a session: [`TOKEN_COOKIE`] holds the opaque bearer
//! credential and [`USER_INFO_COOKIE`] holds the provider's user-info claims
//! as URL-encoded JSON. A [`Session`] is rebuilt from them on every request
//! and never stored.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{AuthError, Result};

/// Name of the cookie carrying the bearer credential.
pub const TOKEN_COOKIE: &str = "jwt_token";

/// Name of the cookie carrying the URL-encoded user-info claims.
pub const USER_INFO_COOKIE: &str = "user_info";

/// Role that unlocks the admin views.
pub const ADMIN_ROLE: &str = "admin";

/// Identity attributes from the provider's user-info endpoint.
///
/// Fields the web layer does not interpret are kept in `extra` so the cookie
/// round-trips unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Email address; the natural key for every ownership join.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Display name. A session without it is anonymous.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Given name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    /// Family name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    /// Roles assigned by the provider.
    #[serde(
        default,
        deserialize_with = "nullable_roles",
        skip_serializing_if = "BTreeSet::is_empty"
    )]
    pub user_roles: BTreeSet<String>,
    /// Any other provider fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn nullable_roles<'de, D>(deserializer: D) -> std::result::Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<BTreeSet<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Claims {
    /// Decode the user-info cookie value.
    ///
    /// The value must be percent-encoded JSON. A `%` that does not start a
    /// two-digit hex escape, or an escape that does not decode to UTF-8, is
    /// rejected.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCookie` if the value cannot be decoded or
    /// is not a JSON object.
    pub fn from_cookie(raw: &str) -> Result<Self> {
        let decoded = percent_decode(raw)?;
        serde_json::from_str(&decoded).map_err(|e| AuthError::InvalidCookie(e.to_string()))
    }

    /// Encode the claims as a user-info cookie value.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Internal` if the claims cannot be serialized.
    pub fn to_cookie(&self) -> Result<String> {
        let json = serde_json::to_string(self).map_err(|e| AuthError::Internal(e.to_string()))?;
        Ok(urlencoding::encode(&json).into_owned())
    }

    /// Returns `true` if the claims carry `role`.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.user_roles.contains(role)
    }
}

fn percent_decode(raw: &str) -> Result<String> {
    let bytes = raw.as_bytes();
    for (i, _) in raw.match_indices('%') {
        let escape = bytes.get(i + 1..i + 3);
        if !escape.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)) {
            return Err(AuthError::InvalidCookie(format!(
                "malformed percent escape at byte {i}"
            )));
        }
    }

    urlencoding::decode(raw)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| AuthError::InvalidCookie(e.to_string()))
}

/// The request-scoped session: bearer credential plus claims.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    token: Option<String>,
    claims: Claims,
}

impl Session {
    /// A session with no credential and empty claims.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A session for an issued credential. An empty token counts as absent.
    #[must_use]
    pub fn new(token: impl Into<String>, claims: Claims) -> Self {
        let token = token.into();
        Self {
            token: (!token.is_empty()).then_some(token),
            claims,
        }
    }

    /// Rebuild a session from raw cookie values.
    ///
    /// A user-info cookie that cannot be decoded is logged and replaced by
    /// empty claims; this never fails.
    #[must_use]
    pub fn from_cookie_values(token: Option<&str>, user_info: Option<&str>) -> Self {
        let claims = match user_info {
            Some(raw) => Claims::from_cookie(raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to parse user info cookie");
                Claims::default()
            }),
            None => Claims::default(),
        };

        Self::new(token.unwrap_or_default(), claims)
    }

    /// The bearer credential, if any.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// The identity claims.
    #[must_use]
    pub const fn claims(&self) -> &Claims {
        &self.claims
    }

    /// The email claim, or `""` for anonymous sessions.
    #[must_use]
    pub fn email(&self) -> &str {
        self.claims.email.as_deref().unwrap_or_default()
    }

    /// Both a credential and a non-empty name claim are present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.claims.name.as_deref().is_some_and(|n| !n.is_empty())
    }

    /// The claims carry the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.claims.has_role(ADMIN_ROLE)
    }
}
