//! End-to-end tests of the router against the in-memory backend and
//! identity provider.

use std::collections::BTreeSet;
use std::sync::Arc;

use axum::http::{header, HeaderValue, Method, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

use shareway_auth::{Claims, MockIdentityProvider};
use shareway_backend::MockBackend;
use shareway_web::{create_router, AppState, WebConfig};

struct Harness {
    server: TestServer,
    backend: Arc<MockBackend>,
}

fn harness_with(backend: MockBackend, identity: MockIdentityProvider) -> Harness {
    let backend = Arc::new(backend);
    let state = AppState::new(Arc::clone(&backend), Arc::new(identity), WebConfig::default());
    let server = TestServer::new(create_router(state)).unwrap();
    Harness { server, backend }
}

fn harness(backend: MockBackend) -> Harness {
    harness_with(backend, MockIdentityProvider::new())
}

fn claims(email: &str, roles: &[&str]) -> Claims {
    Claims {
        email: Some(email.to_string()),
        name: Some("Test User".to_string()),
        user_roles: roles.iter().map(|r| (*r).to_string()).collect::<BTreeSet<_>>(),
        ..Claims::default()
    }
}

fn session_cookie(email: &str, roles: &[&str]) -> HeaderValue {
    let user_info = claims(email, roles).to_cookie().unwrap();
    HeaderValue::from_str(&format!("jwt_token=tok-{email}; user_info={user_info}")).unwrap()
}

fn set_cookies(response: &axum_test::TestResponse) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

fn ride(id: &str, driver: &str) -> Value {
    json!({
        "id": id,
        "driverId": driver,
        "vehicleId": "v1",
        "startLocation": "Zürich",
        "endLocation": "Bern",
        "departureTime": "2025-03-01T08:00:00",
        "pricePerSeat": 12.5,
        "seatsTotal": 3,
        "status": "OPEN"
    })
}

// =============================================================================
// Views
// =============================================================================

#[tokio::test]
async fn ride_list_forwards_paging_and_forces_open_status() {
    let backend = MockBackend::new();
    backend.respond(
        Method::GET,
        "/api/rides",
        json!({ "content": [ride("r1", "d@x.com"), ride("r2", "d@x.com")], "totalPages": 3 }),
    );
    let h = harness(backend);

    let response = h
        .server
        .get("/rides?pageNumber=2&pageSize=5&maxPrice=20&status=CLOSED")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["nrOfPages"], 3);
    assert_eq!(body["currentPage"], 2);
    assert_eq!(body["rides"].as_array().unwrap().len(), 2);

    let calls = h.backend.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].token, None);
    assert_eq!(
        calls[0].query,
        vec![
            ("pageSize".to_string(), "5".to_string()),
            ("pageNumber".to_string(), "2".to_string()),
            ("status".to_string(), "OPEN".to_string()),
            ("maxPrice".to_string(), "20".to_string()),
        ]
    );
}

#[tokio::test]
async fn ride_list_degrades_to_empty() {
    let backend = MockBackend::new();
    backend.fail(Method::GET, "/api/rides", 503);
    let h = harness(backend);

    let body: Value = h.server.get("/rides").await.json();
    assert_eq!(body, json!({ "rides": [], "nrOfPages": 0, "currentPage": 1 }));
}

#[tokio::test]
async fn admin_ride_list_shows_closed_rides() {
    let mut closed = ride("r1", "d@x.com");
    closed["status"] = json!("CLOSED");
    let backend = MockBackend::new();
    backend.respond(
        Method::GET,
        "/api/rides",
        json!({ "content": [closed, ride("r2", "d@x.com")], "totalPages": 1 }),
    );
    let h = harness(backend);

    let body: Value = h
        .server
        .get("/rides?status=CLOSED")
        .add_header(header::COOKIE, session_cookie("root@x.com", &["admin"]))
        .await
        .json();

    assert_eq!(body["nrOfPages"], 1);
    assert_eq!(body["rides"][0]["status"], "CLOSED");
    assert_eq!(body["rides"][1]["status"], "OPEN");
    assert_eq!(h.backend.calls()[0].query_value("status"), Some("CLOSED"));
}

#[tokio::test]
async fn ride_list_tolerates_null_fields() {
    let mut bare = ride("r1", "d@x.com");
    bare["vehicleId"] = Value::Null;
    bare["description"] = Value::Null;
    let backend = MockBackend::new();
    backend.respond(
        Method::GET,
        "/api/rides",
        json!({ "content": [bare], "totalPages": 1 }),
    );
    let h = harness(backend);

    let body: Value = h.server.get("/rides").await.json();
    let rides = body["rides"].as_array().unwrap();
    assert_eq!(rides.len(), 1);
    assert_eq!(rides[0]["id"], "r1");
    assert_eq!(rides[0]["vehicleId"], "");
}

#[tokio::test]
async fn ride_detail_keeps_pickup_next_to_unknown_booking_status() {
    let backend = MockBackend::new();
    backend
        .respond(Method::GET, "/api/rides/r1", ride("r1", "d@x.com"))
        .respond(Method::GET, "/api/users", json!([]))
        .respond(Method::GET, "/api/vehicles", json!([]))
        .respond(Method::GET, "/api/reviews/ride/r1", json!([]))
        .respond(
            Method::GET,
            "/api/bookings",
            json!([
                { "id": "b1", "rideId": "r1", "riderId": "bob@x.com", "status": "CANCELLED" },
                {
                    "id": "b2",
                    "rideId": "r1",
                    "riderId": "ann@x.com",
                    "status": "APPROVED",
                    "pickupLocation": "Station"
                }
            ]),
        );
    let h = harness(backend);

    let body: Value = h
        .server
        .get("/rides/r1")
        .add_header(header::COOKIE, session_cookie("ann@x.com", &[]))
        .await
        .json();

    assert_eq!(body["myBooking"]["id"], "b2");
    assert_eq!(
        body["approvedBookings"],
        json!([{ "location": "Station", "riderName": "Your Pickup", "riderId": "ann@x.com" }])
    );
}

#[tokio::test]
async fn ride_detail_requires_session_and_ride() {
    let backend = MockBackend::new();
    let h = harness(backend);

    h.server
        .get("/rides/r1")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    h.server
        .get("/rides/r1")
        .add_header(header::COOKIE, session_cookie("ann@x.com", &[]))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn ride_detail_survives_failed_lookups() {
    let backend = MockBackend::new();
    backend
        .respond(Method::GET, "/api/rides/r1", ride("r1", "d@x.com"))
        .fail(Method::GET, "/api/users", 500)
        .respond(Method::GET, "/api/vehicles", json!([{ "id": "v1", "ownerId": "d@x.com" }]))
        .unreachable(Method::GET, "/api/reviews/ride/r1")
        .respond(Method::GET, "/api/bookings", json!([]));
    let h = harness(backend);

    let response = h
        .server
        .get("/rides/r1")
        .add_header(header::COOKIE, session_cookie("ann@x.com", &[]))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["ride"]["id"], "r1");
    assert_eq!(body["vehicle"]["id"], "v1");
    assert_eq!(body["driver"], Value::Null);
    assert_eq!(body["reviews"], json!([]));
    assert_eq!(body["currentUserEmail"], "ann@x.com");
}

#[tokio::test]
async fn pages_without_session_render_empty() {
    let h = harness(MockBackend::new());

    let body: Value = h.server.get("/rides/create").await.json();
    assert_eq!(body, json!({ "myVehicles": [], "myRides": [] }));

    let body: Value = h.server.get("/account").await.json();
    assert_eq!(body, json!({ "dbUser": null }));

    assert!(h.backend.calls().is_empty());
}

#[tokio::test]
async fn driver_rides_reports_batch_failure() {
    let backend = MockBackend::new();
    backend
        .respond(Method::GET, "/api/vehicles", json!([{ "id": "v1", "ownerId": "d@x.com" }]))
        .fail(Method::GET, "/api/rides", 500);
    let h = harness(backend);

    let body: Value = h
        .server
        .get("/driver/rides")
        .add_header(header::COOKIE, session_cookie("d@x.com", &[]))
        .await
        .json();

    assert_eq!(body["vehicles"], json!([]));
    assert_eq!(body["rides"], json!([]));
    assert_eq!(
        body["error"],
        "Could not load your rides and vehicles. Please try again."
    );
}

#[tokio::test]
async fn moderation_is_admin_only() {
    let backend = MockBackend::new();
    backend.respond(Method::GET, "/api/admin/flagged", json!([]));
    let h = harness(backend);

    h.server
        .get("/admin/moderation")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    h.server
        .get("/admin/moderation")
        .add_header(header::COOKIE, session_cookie("ann@x.com", &["user"]))
        .await
        .assert_status(StatusCode::FORBIDDEN);
    assert!(h.backend.calls().is_empty());

    h.server
        .get("/admin/moderation")
        .add_header(header::COOKIE, session_cookie("root@x.com", &["admin"]))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn jobs_are_public() {
    let backend = MockBackend::new();
    backend
        .respond(Method::GET, "/api/job", json!([{ "id": "j1", "title": "Courier" }]))
        .respond(Method::GET, "/api/company", json!([{ "id": "c1", "name": "Acme" }]));
    let h = harness(backend);

    let body: Value = h.server.get("/jobs").await.json();
    assert_eq!(body["jobs"][0]["title"], "Courier");
    assert_eq!(body["companies"][0]["name"], "Acme");
}

// =============================================================================
// Actions
// =============================================================================

#[tokio::test]
async fn actions_without_session_are_rejected_before_any_call() {
    let h = harness(MockBackend::new());

    let response = h
        .server
        .post("/rides/r1/book")
        .form(&[("pickupLocation", "Station")])
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "unauthorized");
    assert!(h.backend.calls().is_empty());
}

#[tokio::test]
async fn booking_needs_pickup() {
    let h = harness(MockBackend::new());

    let body: Value = h
        .server
        .post("/rides/r1/book")
        .add_header(header::COOKIE, session_cookie("ann@x.com", &[]))
        .form(&[("pickupLocation", "")])
        .await
        .json();

    assert_eq!(
        body,
        json!({ "success": false, "error": "Please select a pickup location" })
    );
    assert!(h.backend.calls().is_empty());
}

#[tokio::test]
async fn booking_sends_one_seat() {
    let backend = MockBackend::new();
    backend.respond(Method::PUT, "/api/service/me/bookride", Value::Null);
    let h = harness(backend);

    let body: Value = h
        .server
        .post("/rides/r1/book")
        .add_header(header::COOKIE, session_cookie("ann@x.com", &[]))
        .form(&[("pickupLocation", "Station"), ("message", "hi")])
        .await
        .json();

    assert_eq!(body, json!({ "success": true, "action": "booked" }));
    let call = &h.backend.calls_to(&Method::PUT, "/api/service/me/bookride")[0];
    assert_eq!(call.query_value("rideId"), Some("r1"));
    assert_eq!(call.query_value("seats"), Some("1"));
    assert_eq!(call.query_value("pickupLocation"), Some("Station"));
    assert_eq!(call.token.as_deref(), Some("tok-ann@x.com"));
}

#[tokio::test]
async fn duplicate_review_is_reported() {
    let backend = MockBackend::new();
    backend.fail(Method::POST, "/api/reviews", 409);
    let h = harness(backend);

    let response = h
        .server
        .post("/rides/r1/review")
        .add_header(header::COOKIE, session_cookie("ann@x.com", &[]))
        .form(&[("rating", "5"), ("comment", "Great")])
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(
        body,
        json!({ "success": false, "error": "You have already reviewed this ride" })
    );

    let call = &h.backend.calls_to(&Method::POST, "/api/reviews")[0];
    assert_eq!(
        call.body,
        Some(json!({ "rideId": "r1", "rating": 5, "comment": "Great" }))
    );
}

#[tokio::test]
async fn driver_ride_uses_default_radius() {
    let backend = MockBackend::new();
    backend.respond(Method::POST, "/api/rides", Value::Null);
    let h = harness(backend);

    let body: Value = h
        .server
        .post("/driver/rides")
        .add_header(header::COOKIE, session_cookie("d@x.com", &[]))
        .form(&[
            ("vehicleId", "v1"),
            ("startLocation", "Zürich"),
            ("endLocation", "Bern"),
            ("departureTime", "2025-03-01T08:00"),
            ("durationMinutes", "75"),
            ("pricePerSeat", "12.5"),
            ("seatsTotal", "3"),
            ("routeRadiusKm", ""),
        ])
        .await
        .json();

    assert_eq!(body, json!({ "success": true, "action": "ride" }));
    let sent = h.backend.calls_to(&Method::POST, "/api/rides")[0]
        .body
        .clone()
        .unwrap();
    assert_eq!(sent["driverId"], "d@x.com");
    assert_eq!(sent["routeRadiusKm"], 5.0);
    assert_eq!(sent["durationMinutes"], 75);
    assert_eq!(sent["description"], Value::Null);
}

#[tokio::test]
async fn moderation_delete_removes_review_then_flag() {
    let backend = MockBackend::new();
    backend
        .respond(Method::DELETE, "/api/reviews/rev1", Value::Null)
        .respond(Method::DELETE, "/api/admin/flagged/f1", Value::Null);
    let h = harness(backend);

    let body: Value = h
        .server
        .post("/admin/moderation/delete")
        .add_header(header::COOKIE, session_cookie("root@x.com", &["admin"]))
        .form(&[("flaggedId", "f1"), ("contentType", "REVIEW"), ("contentId", "rev1")])
        .await
        .json();

    assert_eq!(body, json!({ "success": true, "action": "deleted" }));
    let paths: Vec<String> = h.backend.calls().into_iter().map(|c| c.path).collect();
    assert_eq!(paths, vec!["/api/reviews/rev1", "/api/admin/flagged/f1"]);
}

#[tokio::test]
async fn moderation_delete_keeps_flag_when_review_delete_fails() {
    let backend = MockBackend::new();
    backend.fail(Method::DELETE, "/api/reviews/rev1", 500);
    let h = harness(backend);

    let body: Value = h
        .server
        .post("/admin/moderation/delete")
        .add_header(header::COOKIE, session_cookie("root@x.com", &["admin"]))
        .form(&[("flaggedId", "f1"), ("contentType", "REVIEW"), ("contentId", "rev1")])
        .await
        .json();

    assert_eq!(
        body,
        json!({ "success": false, "error": "Could not delete content" })
    );
    assert!(h
        .backend
        .calls_to(&Method::DELETE, "/api/admin/flagged/f1")
        .is_empty());
}

#[tokio::test]
async fn jobs_post_without_credentials() {
    let backend = MockBackend::new();
    backend.respond(Method::POST, "/api/job", Value::Null);
    let h = harness(backend);

    let body: Value = h
        .server
        .post("/jobs")
        .form(&[("title", "Courier"), ("earnings", "25.5 CHF")])
        .await
        .json();

    assert_eq!(body, json!({ "success": true }));
    let call = &h.backend.calls_to(&Method::POST, "/api/job")[0];
    assert_eq!(call.token, None);
    assert_eq!(call.body.as_ref().unwrap()["earnings"], 25.5);
}

// =============================================================================
// Identity
// =============================================================================

#[tokio::test]
async fn login_sets_cookies_and_redirects() {
    let identity =
        MockIdentityProvider::new().with_account("ann@x.com", "pw", claims("ann@x.com", &["user"]));
    let h = harness_with(MockBackend::new(), identity);

    let response = h
        .server
        .post("/login")
        .form(&[("email", "ann@x.com"), ("password", "pw")])
        .await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(response.header(header::LOCATION), "/");

    let cookies = set_cookies(&response);
    assert_eq!(cookies.len(), 2);
    let token = cookies
        .iter()
        .find(|c| c.starts_with("jwt_token="))
        .unwrap();
    assert!(token.starts_with("jwt_token=test-token"));
    assert!(cookies.iter().any(|c| c.starts_with("user_info=")));
    assert!(token.contains("HttpOnly"));
    assert!(token.contains("SameSite=Lax"));
    assert!(token.contains("Max-Age=604800"));
    assert!(token.contains("Path=/"));
}

#[tokio::test]
async fn login_failure_stays_on_page() {
    let h = harness(MockBackend::new());

    let response = h
        .server
        .post("/login")
        .form(&[("email", "ann@x.com"), ("password", "wrong")])
        .await;

    response.assert_status_ok();
    assert!(set_cookies(&response).is_empty());
    let body: Value = response.json();
    assert_eq!(
        body,
        json!({ "success": false, "error": "Login failed. Please check your credentials." })
    );
}

#[tokio::test]
async fn signup_logs_in_and_redirects() {
    let h = harness(MockBackend::new());

    let response = h
        .server
        .post("/signup")
        .form(&[
            ("email", "new@x.com"),
            ("password", "pw"),
            ("firstName", "New"),
            ("lastName", ""),
        ])
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header(header::LOCATION), "/");
    assert_eq!(set_cookies(&response).len(), 2);
}

#[tokio::test]
async fn logout_clears_cookies_and_leaves_through_provider() {
    let h = harness(MockBackend::new());

    let response = h
        .server
        .post("/logout")
        .add_header(header::COOKIE, session_cookie("ann@x.com", &[]))
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(
        response.header(header::LOCATION),
        "https://idp.test/v2/logout?client_id=test&returnTo=http%3A%2F%2Flocalhost%3A3000%2F"
    );

    let cookies = set_cookies(&response);
    assert_eq!(cookies.len(), 2);
    assert!(cookies.iter().all(|c| c.contains("Max-Age=0")));
}

#[tokio::test]
async fn session_probe() {
    let h = harness(MockBackend::new());

    let body: Value = h
        .server
        .get("/session")
        .add_header(header::COOKIE, session_cookie("ann@x.com", &[]))
        .await
        .json();
    assert_eq!(body["isAuthenticated"], true);
    assert_eq!(body["user"]["email"], "ann@x.com");

    let body: Value = h
        .server
        .get("/session")
        .add_header(
            header::COOKIE,
            HeaderValue::from_static("jwt_token=tok; user_info=%7Bbroken"),
        )
        .await
        .json();
    assert_eq!(body["isAuthenticated"], false);
}

// =============================================================================
// Middleware
// =============================================================================

#[tokio::test]
async fn cors_preflight() {
    let h = harness(MockBackend::new());

    let response = h
        .server
        .method(Method::OPTIONS, "/rides")
        .add_header(header::ORIGIN, HeaderValue::from_static("https://pages.example"))
        .add_header(
            header::ACCESS_CONTROL_REQUEST_METHOD,
            HeaderValue::from_static("POST"),
        )
        .add_header(
            header::ACCESS_CONTROL_REQUEST_HEADERS,
            HeaderValue::from_static("content-type"),
        )
        .await;

    assert_eq!(response.header(header::ACCESS_CONTROL_ALLOW_ORIGIN), "*");
    let methods = response.header(header::ACCESS_CONTROL_ALLOW_METHODS);
    let methods = methods.to_str().unwrap();
    for method in ["GET", "POST", "PUT", "DELETE", "PATCH", "OPTIONS"] {
        assert!(methods.contains(method), "missing {method} in {methods}");
    }
}

#[tokio::test]
async fn health_is_public() {
    let h = harness(MockBackend::new());

    let body: Value = h.server.get("/health").await.json();
    assert_eq!(body["status"], "healthy");
}
