//! Liveness route for load balancers.
//!
//! The page layer holds no state of its own, so being able to answer is the
//! whole check. Neither the backend API nor the identity provider is called.

use axum::Json;
use serde::Serialize;

/// Reported while the server accepts requests.
pub const HEALTHY: &str = "healthy";

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always [`HEALTHY`].
    pub status: &'static str,
    /// Crate version of the running binary.
    pub version: &'static str,
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: HEALTHY,
        version: env!("CARGO_PKG_VERSION"),
    })
}
