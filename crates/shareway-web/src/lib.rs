//! Server-side page and form handlers for the shareway ridesharing front end.
//!
//! This crate sits between the browser and the backend REST API. It handles:
//!
//! - Cookie sessions issued by the identity provider
//! - Page views assembled from one or more backend lookups
//! - Form submissions forwarded to the backend as single calls
//! - Login, signup and logout against the identity provider
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Browser                             │
//! │               (page loads / form posts)                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │ cookies
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       shareway-web                          │
//! │  ┌─────────────┐ ┌─────────────────┐ ┌─────────────────┐   │
//! │  │  Session    │ │ View aggregators│ │ Action          │   │
//! │  │  Extractor  │ │ (GET)           │ │ dispatchers     │   │
//! │  └─────────────┘ └─────────────────┘ └─────────────────┘   │
//! └─────────────────────────────────────────────────────────────┘
//!                │                               │
//!                ▼                               ▼
//!        ┌──────────────┐               ┌──────────────┐
//!        │   Identity   │               │   Backend    │
//!        │   provider   │               │   REST API   │
//!        └──────────────┘               └──────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use shareway_auth::{Auth0Client, AuthConfig};
//! use shareway_backend::HttpBackendClient;
//! use shareway_web::{create_router, AppState, WebConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = WebConfig::default();
//! let backend = Arc::new(HttpBackendClient::new(config.api_base_url.clone()));
//! let identity = Arc::new(Auth0Client::new(AuthConfig::for_domain(
//!     "shareway.eu.auth0.com",
//!     "client-id",
//! )));
//!
//! let listen_addr = config.listen_addr.clone();
//! let app = create_router(AppState::new(backend, identity, config));
//!
//! let listener = tokio::net::TcpListener::bind(listen_addr).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregate;
pub mod config;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod outcome;
pub mod routes;
pub mod session;
pub mod state;

pub use config::{auth_config_from_lookup, WebConfig};
pub use error::ApiError;
pub use outcome::ActionOutcome;
pub use routes::create_router;
pub use session::CurrentSession;
pub use state::AppState;
