//! Web server configuration types.
//!
//! This module defines the settings of the front-end server and how they are
//! read from the environment.

use serde::Deserialize;

use shareway_auth::AuthConfig;

/// Configuration for the web server.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// Listen address (e.g., "0.0.0.0:3000").
    #[serde(default = "WebConfig::default_listen_addr")]
    pub listen_addr: String,

    /// Base URL of the backend REST API.
    #[serde(default = "WebConfig::default_api_base_url")]
    pub api_base_url: String,

    /// Public origin of this server, used for the logout return URL.
    #[serde(default = "WebConfig::default_public_origin")]
    pub public_origin: String,

    /// Whether session cookies carry the `Secure` attribute.
    #[serde(default)]
    pub cookie_secure: bool,

    /// Maximum request body size in bytes.
    #[serde(default = "WebConfig::default_max_body")]
    pub max_body_bytes: usize,
}

impl WebConfig {
    fn default_listen_addr() -> String {
        "0.0.0.0:3000".to_string()
    }

    fn default_api_base_url() -> String {
        "http://localhost:8080".to_string()
    }

    fn default_public_origin() -> String {
        "http://localhost:3000".to_string()
    }

    const fn default_max_body() -> usize {
        1024 * 1024 // 1 MB
    }

    /// Read the configuration from process environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary key lookup.
    ///
    /// Recognised keys: `LISTEN_ADDR`, `API_BASE_URL`, `PUBLIC_ORIGIN`,
    /// `COOKIE_SECURE`, `APP_ENV`, `MAX_BODY_BYTES`. Missing or unparsable
    /// values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let production = lookup("APP_ENV").is_some_and(|env| env == "production");

        Self {
            listen_addr: lookup("LISTEN_ADDR").unwrap_or(defaults.listen_addr),
            api_base_url: lookup("API_BASE_URL").unwrap_or(defaults.api_base_url),
            public_origin: lookup("PUBLIC_ORIGIN")
                .map(|origin| origin.trim_end_matches('/').to_string())
                .unwrap_or(defaults.public_origin),
            cookie_secure: lookup("COOKIE_SECURE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(production),
            max_body_bytes: lookup("MAX_BODY_BYTES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_body_bytes),
        }
    }

    /// The URL the identity provider redirects to after logout.
    #[must_use]
    pub fn logout_return_url(&self) -> String {
        format!("{}/", self.public_origin)
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            listen_addr: Self::default_listen_addr(),
            api_base_url: Self::default_api_base_url(),
            public_origin: Self::default_public_origin(),
            cookie_secure: false,
            max_body_bytes: Self::default_max_body(),
        }
    }
}

/// Read the identity provider configuration from `AUTH0_DOMAIN` and
/// `AUTH0_CLIENT_ID`.
///
/// Returns `None` when the domain is not set.
pub fn auth_config_from_lookup<F>(lookup: F) -> Option<AuthConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let domain = lookup("AUTH0_DOMAIN").filter(|d| !d.is_empty())?;
    let client_id = lookup("AUTH0_CLIENT_ID").unwrap_or_default();
    Some(AuthConfig::for_domain(&domain, client_id))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config() {
        let config = WebConfig::default();
        assert_eq!(config.listen_addr, "0.0.0.0:3000");
        assert_eq!(config.api_base_url, "http://localhost:8080");
        assert!(!config.cookie_secure);
        assert_eq!(config.max_body_bytes, 1024 * 1024);
    }

    #[test]
    fn deserialize_fills_defaults() {
        let config: WebConfig =
            serde_json::from_str(r#"{"api_base_url":"http://api:9000"}"#).unwrap();
        assert_eq!(config.api_base_url, "http://api:9000");
        assert_eq!(config.public_origin, "http://localhost:3000");
    }

    #[test]
    fn reads_overrides() {
        let config = WebConfig::from_lookup(lookup(&[
            ("API_BASE_URL", "http://api:9000"),
            ("PUBLIC_ORIGIN", "https://shareway.app/"),
            ("MAX_BODY_BYTES", "nope"),
        ]));

        assert_eq!(config.api_base_url, "http://api:9000");
        assert_eq!(config.logout_return_url(), "https://shareway.app/");
        assert_eq!(config.max_body_bytes, 1024 * 1024);
    }

    #[test]
    fn production_implies_secure_cookies() {
        let config = WebConfig::from_lookup(lookup(&[("APP_ENV", "production")]));
        assert!(config.cookie_secure);

        let config = WebConfig::from_lookup(lookup(&[
            ("APP_ENV", "production"),
            ("COOKIE_SECURE", "false"),
        ]));
        assert!(!config.cookie_secure);
    }

    #[test]
    fn auth_config_requires_domain() {
        assert!(auth_config_from_lookup(lookup(&[])).is_none());

        let config =
            auth_config_from_lookup(lookup(&[("AUTH0_DOMAIN", "t.auth0.com"), ("AUTH0_CLIENT_ID", "c")]))
                .unwrap();
        assert_eq!(config.base_url, "https://t.auth0.com");
        assert_eq!(config.client_id, "c");
    }
}
