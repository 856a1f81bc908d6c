//! Shared application state.
//!
//! This module defines the state that is available to all request handlers.

use std::sync::Arc;

use shareway_auth::IdentityProvider;
use shareway_backend::BackendApi;

use crate::config::WebConfig;

/// Shared application state for the web server.
///
/// Handlers hold no other state; everything request-specific arrives with
/// the request.
pub struct AppState<B, I>
where
    B: BackendApi,
    I: IdentityProvider,
{
    /// Client for the backend REST API.
    pub backend: Arc<B>,
    /// The external identity provider.
    pub identity: Arc<I>,
    /// Server configuration.
    pub config: WebConfig,
}

impl<B, I> AppState<B, I>
where
    B: BackendApi,
    I: IdentityProvider,
{
    /// Create a new application state.
    #[must_use]
    pub fn new(backend: Arc<B>, identity: Arc<I>, config: WebConfig) -> Self {
        Self {
            backend,
            identity,
            config,
        }
    }
}

impl<B, I> Clone for AppState<B, I>
where
    B: BackendApi,
    I: IdentityProvider,
{
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            identity: Arc::clone(&self.identity),
            config: self.config.clone(),
        }
    }
}
