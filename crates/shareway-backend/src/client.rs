//! HTTP client for communicating with the backend API.
//!
//! This module provides the `BackendApi` trait and its reqwest-backed
//! implementation. Every call is a single attempt: no retries, no caching, no
//! rate limiting.

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use shareway_core::{
    Booking, Company, DirectoryUser, FlaggedContent, Job, Page, Review, Ride, Vehicle,
};

use crate::error::{GatewayError, Result};
use crate::types::{
    resource_path, ApiRequest, BookRide, NewJob, NewReview, NewRide, NewVehicle, ProfileUpdate,
    ReviewUpdate, RideQuery, RideUpdate, VerificationRequest,
};

/// Trait for backend API communication.
///
/// Implementors provide [`call`](BackendApi::call); the typed endpoint methods
/// are built on top of it. Calls made with `token = None` carry no
/// `Authorization` header.
#[async_trait]
pub trait BackendApi: Send + Sync {
    /// Issue one request and return the decoded JSON body.
    ///
    /// An empty success body yields `Value::Null`; a non-JSON success body is
    /// returned as a JSON string.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Status` for non-2xx responses and
    /// `GatewayError::Transport` when no response arrives.
    async fn call(&self, request: ApiRequest) -> Result<Value>;

    // =========================================================================
    // Rides
    // =========================================================================

    /// `GET /api/rides` with pagination and server-side filters.
    async fn list_rides(&self, token: Option<&str>, query: &RideQuery) -> Result<Page<Ride>> {
        let request = ApiRequest::get("/api/rides")
            .bearer(token)
            .query_pairs(query.to_pairs());
        decode(self.call(request).await?)
    }

    /// `GET /api/rides/{id}`.
    async fn get_ride(&self, token: &str, ride_id: &str) -> Result<Ride> {
        let request = ApiRequest::get(resource_path("/api/rides", ride_id)).bearer(Some(token));
        decode(self.call(request).await?)
    }

    /// `POST /api/rides`.
    async fn create_ride(&self, token: &str, ride: &NewRide) -> Result<()> {
        let request = ApiRequest::post("/api/rides")
            .bearer(Some(token))
            .json(encode(ride)?);
        self.call(request).await.map(drop)
    }

    /// `PUT /api/rides/{id}`.
    async fn update_ride(&self, token: &str, ride_id: &str, update: &RideUpdate) -> Result<()> {
        let request = ApiRequest::put(resource_path("/api/rides", ride_id))
            .bearer(Some(token))
            .json(encode(update)?);
        self.call(request).await.map(drop)
    }

    /// `DELETE /api/rides/{id}`.
    async fn delete_ride(&self, token: &str, ride_id: &str) -> Result<()> {
        let request = ApiRequest::delete(resource_path("/api/rides", ride_id)).bearer(Some(token));
        self.call(request).await.map(drop)
    }

    /// `PUT /api/service/me/completeride?rideId`.
    async fn complete_ride(&self, token: &str, ride_id: &str) -> Result<()> {
        let request = ApiRequest::put("/api/service/me/completeride")
            .bearer(Some(token))
            .query("rideId", ride_id);
        self.call(request).await.map(drop)
    }

    // =========================================================================
    // Vehicles
    // =========================================================================

    /// `GET /api/vehicles`.
    async fn list_vehicles(&self, token: &str) -> Result<Vec<Vehicle>> {
        let request = ApiRequest::get("/api/vehicles").bearer(Some(token));
        decode(self.call(request).await?)
    }

    /// `POST /api/vehicles`.
    async fn create_vehicle(&self, token: &str, vehicle: &NewVehicle) -> Result<()> {
        let request = ApiRequest::post("/api/vehicles")
            .bearer(Some(token))
            .json(encode(vehicle)?);
        self.call(request).await.map(drop)
    }

    /// `DELETE /api/vehicles/{id}`.
    async fn delete_vehicle(&self, token: &str, vehicle_id: &str) -> Result<()> {
        let request =
            ApiRequest::delete(resource_path("/api/vehicles", vehicle_id)).bearer(Some(token));
        self.call(request).await.map(drop)
    }

    // =========================================================================
    // Bookings
    // =========================================================================

    /// `GET /api/bookings`.
    async fn list_bookings(&self, token: &str) -> Result<Vec<Booking>> {
        let request = ApiRequest::get("/api/bookings").bearer(Some(token));
        decode(self.call(request).await?)
    }

    /// `PUT /api/service/me/bookride`.
    async fn book_ride(&self, token: &str, booking: &BookRide) -> Result<()> {
        let request = ApiRequest::put("/api/service/me/bookride")
            .bearer(Some(token))
            .query_pairs(booking.to_pairs());
        self.call(request).await.map(drop)
    }

    /// `PUT /api/service/me/approvebooking?bookingId`.
    async fn approve_booking(&self, token: &str, booking_id: &str) -> Result<()> {
        let request = ApiRequest::put("/api/service/me/approvebooking")
            .bearer(Some(token))
            .query("bookingId", booking_id);
        self.call(request).await.map(drop)
    }

    /// `PUT /api/service/me/rejectbooking?bookingId`.
    async fn reject_booking(&self, token: &str, booking_id: &str) -> Result<()> {
        let request = ApiRequest::put("/api/service/me/rejectbooking")
            .bearer(Some(token))
            .query("bookingId", booking_id);
        self.call(request).await.map(drop)
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// `GET /api/users`.
    async fn list_users(&self, token: &str) -> Result<Vec<DirectoryUser>> {
        let request = ApiRequest::get("/api/users").bearer(Some(token));
        decode(self.call(request).await?)
    }

    /// `GET /api/users/me`, returned as the backend sent it.
    async fn current_user(&self, token: &str) -> Result<Value> {
        let request = ApiRequest::get("/api/users/me").bearer(Some(token));
        self.call(request).await
    }

    /// `PUT /api/users/me/profile`.
    async fn update_profile(&self, token: &str, profile: &ProfileUpdate) -> Result<()> {
        let request = ApiRequest::put("/api/users/me/profile")
            .bearer(Some(token))
            .json(encode(profile)?);
        self.call(request).await.map(drop)
    }

    /// `PUT /api/users/me/verification`.
    async fn request_verification(
        &self,
        token: &str,
        verification: &VerificationRequest,
    ) -> Result<()> {
        let request = ApiRequest::put("/api/users/me/verification")
            .bearer(Some(token))
            .json(encode(verification)?);
        self.call(request).await.map(drop)
    }

    /// `GET /api/users/pending`.
    async fn pending_users(&self, token: &str) -> Result<Vec<DirectoryUser>> {
        let request = ApiRequest::get("/api/users/pending").bearer(Some(token));
        decode(self.call(request).await?)
    }

    /// `PUT /api/service/admin/verify?userId`.
    async fn verify_user(&self, token: &str, user_id: &str) -> Result<()> {
        let request = ApiRequest::put("/api/service/admin/verify")
            .bearer(Some(token))
            .query("userId", user_id);
        self.call(request).await.map(drop)
    }

    /// `PUT /api/service/admin/reject?userId`.
    async fn reject_user(&self, token: &str, user_id: &str) -> Result<()> {
        let request = ApiRequest::put("/api/service/admin/reject")
            .bearer(Some(token))
            .query("userId", user_id);
        self.call(request).await.map(drop)
    }

    // =========================================================================
    // Reviews and moderation
    // =========================================================================

    /// `GET /api/reviews/ride/{rideId}`.
    async fn ride_reviews(&self, token: &str, ride_id: &str) -> Result<Vec<Review>> {
        let request =
            ApiRequest::get(resource_path("/api/reviews/ride", ride_id)).bearer(Some(token));
        decode(self.call(request).await?)
    }

    /// `POST /api/reviews`.
    async fn create_review(&self, token: &str, review: &NewReview) -> Result<()> {
        let request = ApiRequest::post("/api/reviews")
            .bearer(Some(token))
            .json(encode(review)?);
        self.call(request).await.map(drop)
    }

    /// `PUT /api/reviews/{id}`.
    async fn update_review(&self, token: &str, review_id: &str, update: &ReviewUpdate) -> Result<()> {
        let request = ApiRequest::put(resource_path("/api/reviews", review_id))
            .bearer(Some(token))
            .json(encode(update)?);
        self.call(request).await.map(drop)
    }

    /// `DELETE /api/reviews/{id}`.
    async fn delete_review(&self, token: &str, review_id: &str) -> Result<()> {
        let request =
            ApiRequest::delete(resource_path("/api/reviews", review_id)).bearer(Some(token));
        self.call(request).await.map(drop)
    }

    /// `GET /api/admin/flagged`.
    async fn flagged_content(&self, token: &str) -> Result<Vec<FlaggedContent>> {
        let request = ApiRequest::get("/api/admin/flagged").bearer(Some(token));
        decode(self.call(request).await?)
    }

    /// `DELETE /api/admin/flagged/{id}`.
    async fn delete_flagged(&self, token: &str, flagged_id: &str) -> Result<()> {
        let request =
            ApiRequest::delete(resource_path("/api/admin/flagged", flagged_id)).bearer(Some(token));
        self.call(request).await.map(drop)
    }

    // =========================================================================
    // Jobs (public)
    // =========================================================================

    /// `GET /api/job`.
    async fn list_jobs(&self) -> Result<Vec<Job>> {
        decode(self.call(ApiRequest::get("/api/job")).await?)
    }

    /// `POST /api/job`.
    async fn create_job(&self, job: &NewJob) -> Result<()> {
        let request = ApiRequest::post("/api/job").json(encode(job)?);
        self.call(request).await.map(drop)
    }

    /// `GET /api/company`.
    async fn list_companies(&self) -> Result<Vec<Company>> {
        decode(self.call(ApiRequest::get("/api/company")).await?)
    }
}

/// Decode a JSON value into a typed resource.
fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| GatewayError::Decode(e.to_string()))
}

/// Encode a payload as a JSON body.
fn encode<T: Serialize>(payload: &T) -> Result<Value> {
    serde_json::to_value(payload).map_err(|e| GatewayError::InvalidRequest(e.to_string()))
}

/// Error body returned by the backend.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(alias = "message")]
    error: String,
}

/// HTTP client for the backend API.
#[derive(Debug, Clone)]
pub struct HttpBackendClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackendClient {
    /// Create a new backend client.
    ///
    /// No request timeout is configured; the transport defaults apply.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the backend (e.g., "http://localhost:8080")
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a new backend client with a custom reqwest client.
    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Get the base URL of the backend.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl BackendApi for HttpBackendClient {
    async fn call(&self, request: ApiRequest) -> Result<Value> {
        let url = format!("{}{}", self.base_url, request.path);
        let method: Method = request.method.clone();

        let mut builder = self.client.request(method.clone(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &request.token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(method = %method, path = %request.path, error = %e, "Backend request failed");
            GatewayError::Transport(e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            let text = response
                .text()
                .await
                .map_err(|e| GatewayError::Transport(format!("failed to read body: {e}")))?;

            tracing::debug!(method = %method, path = %request.path, status = %status, "Backend call succeeded");

            if text.trim().is_empty() {
                return Ok(Value::Null);
            }
            return Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)));
        }

        let message = response
            .json::<ErrorResponse>()
            .await
            .map(|e| e.error)
            .unwrap_or_else(|_| format!("backend returned status {status}"));

        tracing::debug!(
            method = %method,
            path = %request.path,
            status = %status,
            error = %message,
            "Backend call returned an error status"
        );

        Err(GatewayError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    #[test]
    fn http_client_creation() {
        let client = HttpBackendClient::new("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[tokio::test]
    async fn attaches_bearer_and_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/rides"))
            .and(header("authorization", "Bearer tok"))
            .and(query_param("pageSize", "5"))
            .and(query_param("status", "OPEN"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [{ "id": "r1", "driverId": "d@x.com" }],
                "totalPages": 3,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpBackendClient::new(server.uri());
        let query = RideQuery {
            page_size: Some(5),
            status: Some("OPEN".into()),
            ..RideQuery::default()
        };
        let page = client.list_rides(Some("tok"), &query).await.unwrap();

        assert_eq!(page.total_pages, 3);
        assert_eq!(page.content[0].id, "r1");
    }

    #[tokio::test]
    async fn omits_authorization_without_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/rides"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "content": [] })))
            .mount(&server)
            .await;

        let client = HttpBackendClient::new(server.uri());
        let page = client.list_rides(None, &RideQuery::default()).await.unwrap();
        assert_eq!(page.total_pages, 0);

        let requests: Vec<Request> = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(!requests[0].headers.contains_key("authorization"));
    }

    #[tokio::test]
    async fn non_success_maps_to_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/reviews"))
            .respond_with(
                ResponseTemplate::new(409).set_body_json(json!({ "error": "Conflict" })),
            )
            .mount(&server)
            .await;

        let client = HttpBackendClient::new(server.uri());
        let review = NewReview {
            ride_id: "r1".into(),
            rating: Some(5),
            comment: String::new(),
        };
        let err = client.create_review("tok", &review).await.unwrap_err();

        assert!(err.is_status(409));
        assert!(err.to_string().contains("Conflict"));
    }

    #[tokio::test]
    async fn forwards_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/reviews/rev-1"))
            .and(body_json(json!({ "rating": 4, "comment": "fine" })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpBackendClient::new(server.uri());
        let update = ReviewUpdate {
            rating: Some(4),
            comment: "fine".into(),
        };
        client.update_review("tok", "rev-1", &update).await.unwrap();
    }

    #[tokio::test]
    async fn empty_and_plain_text_bodies() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/service/me/completeride"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/users/me"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = HttpBackendClient::new(server.uri());
        client.complete_ride("tok", "r1").await.unwrap();

        let me = client.current_user("tok").await.unwrap();
        assert_eq!(me, Value::String("not json".into()));
    }

    #[tokio::test]
    async fn transport_failure_has_no_status() {
        // Nothing listens on port 9 locally.
        let client = HttpBackendClient::new("http://127.0.0.1:9");
        let err = client.list_vehicles("tok").await.unwrap_err();

        assert!(matches!(err, GatewayError::Transport(_)));
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn unexpected_shape_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/vehicles"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "oops": true })))
            .mount(&server)
            .await;

        let client = HttpBackendClient::new(server.uri());
        let err = client.list_vehicles("tok").await.unwrap_err();
        assert!(matches!(err, GatewayError::Decode(_)));
    }
}
