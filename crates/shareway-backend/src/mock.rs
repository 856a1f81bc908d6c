//! In-memory backend for tests.
//!
//! `MockBackend` answers calls from a table keyed by method and path, and
//! records every request it receives. Paths without a registered reply
//! answer 404.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::Method;
use serde_json::Value;

use crate::client::BackendApi;
use crate::error::{GatewayError, Result};
use crate::types::ApiRequest;

#[derive(Debug, Clone)]
enum Reply {
    Json(Value),
    Status(u16),
    Unreachable,
}

/// A recording backend with canned replies.
#[derive(Debug, Default)]
pub struct MockBackend {
    replies: Mutex<HashMap<(Method, String), Reply>>,
    calls: Mutex<Vec<ApiRequest>>,
}

impl MockBackend {
    /// Create an empty mock where every call answers 404.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `method path` with a JSON body.
    pub fn respond(&self, method: Method, path: &str, body: Value) -> &Self {
        self.replies
            .lock()
            .insert((method, path.to_string()), Reply::Json(body));
        self
    }

    /// Answer `method path` with a non-2xx status.
    pub fn fail(&self, method: Method, path: &str, status: u16) -> &Self {
        self.replies
            .lock()
            .insert((method, path.to_string()), Reply::Status(status));
        self
    }

    /// Make `method path` fail without a response.
    pub fn unreachable(&self, method: Method, path: &str) -> &Self {
        self.replies
            .lock()
            .insert((method, path.to_string()), Reply::Unreachable);
        self
    }

    /// All requests received so far, in arrival order.
    #[must_use]
    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().clone()
    }

    /// Requests received for one method and path.
    #[must_use]
    pub fn calls_to(&self, method: &Method, path: &str) -> Vec<ApiRequest> {
        self.calls
            .lock()
            .iter()
            .filter(|c| &c.method == method && c.path == path)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl BackendApi for MockBackend {
    async fn call(&self, request: ApiRequest) -> Result<Value> {
        let key = (request.method.clone(), request.path.clone());
        self.calls.lock().push(request);

        let reply = self.replies.lock().get(&key).cloned();
        match reply {
            Some(Reply::Json(body)) => Ok(body),
            Some(Reply::Status(status)) => Err(GatewayError::Status {
                status,
                message: format!("mock status {status}"),
            }),
            Some(Reply::Unreachable) => Err(GatewayError::Transport("connection refused".into())),
            None => Err(GatewayError::Status {
                status: 404,
                message: format!("no mock reply for {} {}", key.0, key.1),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn records_calls_and_replies() {
        let mock = MockBackend::new();
        mock.respond(Method::GET, "/api/vehicles", json!([{ "id": "v1" }]));

        let vehicles = mock.list_vehicles("tok").await.unwrap();
        assert_eq!(vehicles.len(), 1);

        let calls = mock.calls_to(&Method::GET, "/api/vehicles");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].token.as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn unregistered_route_is_not_found() {
        let mock = MockBackend::new();
        let err = mock.list_bookings("tok").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn failure_modes() {
        let mock = MockBackend::new();
        mock.fail(Method::DELETE, "/api/rides/r1", 403)
            .unreachable(Method::GET, "/api/users");

        assert!(mock.delete_ride("tok", "r1").await.unwrap_err().is_status(403));
        assert_eq!(mock.list_users("tok").await.unwrap_err().status(), None);
    }
}
