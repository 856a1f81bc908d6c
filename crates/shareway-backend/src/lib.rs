//! Client for the shareway backend REST API.
//!
//! Every page and form handler in the web layer talks to the backend through
//! the [`BackendApi`] trait. The trait has one required method,
//! [`BackendApi::call`], and a typed method per backend endpoint built on it.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │          Web handlers (views, actions)       │
//! └──────────────────────────────────────────────┘
//!                       │ BackendApi
//!            ┌──────────┴──────────┐
//!            ▼                     ▼
//!   ┌──────────────────┐   ┌──────────────┐
//!   │ HttpBackendClient│   │ MockBackend  │
//!   │    (reqwest)     │   │ (test-utils) │
//!   └──────────────────┘   └──────────────┘
//!            │
//!            ▼
//!      REST backend (/api/...)
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use shareway_backend::{BackendApi, HttpBackendClient, RideQuery};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpBackendClient::new("http://localhost:8080");
//! let page = client.list_rides(None, &RideQuery::page_size(5)).await?;
//! println!("{} pages", page.total_pages);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod client;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod types;

pub use client::{BackendApi, HttpBackendClient};
pub use error::{GatewayError, Result};
#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockBackend;
pub use types::{
    ApiRequest, BookRide, NewJob, NewReview, NewRide, NewVehicle, ProfileUpdate, ReviewUpdate,
    RideQuery, RideUpdate, VerificationRequest,
};

pub use reqwest::Method;
