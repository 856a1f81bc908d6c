//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;

use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::map_response_body::MapResponseBodyLayer;
use tower_http::trace::TraceLayer;

use shareway_auth::IdentityProvider;
use shareway_backend::BackendApi;

use crate::handlers::{
    account, admin, bookings, driver, health, identity, jobs, ride_create, ride_detail,
    ride_requests, rides, vehicles,
};
use crate::state::AppState;

/// Create the router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
/// - `GET /session` - Session summary
/// - `POST /login`, `POST /signup`, `POST /logout` - Identity
/// - `GET /rides` - Ride list
/// - `GET /jobs`, `POST /jobs` - Job board
///
/// ## Rides
/// - `GET /rides/:id` - Ride detail
/// - `POST /rides/:id/{book,review,complete,delete,update}` - Ride forms
/// - `POST /rides/:id/reviews/{update,delete}` - Review forms
/// - `GET|POST /rides/create` - Offer a ride
/// - `GET /rides/requests`, `POST /rides/requests/{approve,reject}`
///
/// ## Rider and vehicles
/// - `GET /bookings`
/// - `GET|POST /vehicles`
///
/// ## Driver area
/// - `GET /driver`
/// - `GET /driver/requests`, `POST /driver/requests/{approve,reject}`
/// - `GET|POST /driver/rides`, `POST /driver/rides/delete`
/// - `GET|POST /driver/vehicles`, `POST /driver/vehicles/delete`
///
/// ## Account and admin
/// - `GET /account`, `POST /account/{profile,verification}`
/// - `GET /admin/verifications`, `POST /admin/verifications/{verify,reject}`
/// - `GET /admin/moderation`, `POST /admin/moderation/{delete,dismiss}`
pub fn create_router<B, I>(state: AppState<B, I>) -> Router
where
    B: BackendApi + 'static,
    I: IdentityProvider + 'static,
{
    let max_body_bytes = state.config.max_body_bytes;
    let state = Arc::new(state);

    Router::new()
        // Public
        .route("/health", get(health::health))
        .route("/session", get(identity::session))
        .route("/login", post(identity::login::<B, I>))
        .route("/signup", post(identity::signup::<B, I>))
        .route("/logout", post(identity::logout::<B, I>))
        .route("/jobs", get(jobs::jobs::<B, I>).post(jobs::create_job::<B, I>))
        // Rides
        .route("/rides", get(rides::list_rides::<B, I>))
        .route(
            "/rides/create",
            get(ride_create::create_ride_page::<B, I>).post(ride_create::create_ride::<B, I>),
        )
        .route("/rides/requests", get(ride_requests::ride_requests::<B, I>))
        .route(
            "/rides/requests/approve",
            post(ride_requests::approve_request::<B, I>),
        )
        .route(
            "/rides/requests/reject",
            post(ride_requests::reject_request::<B, I>),
        )
        .route("/rides/:id", get(ride_detail::ride_detail::<B, I>))
        .route("/rides/:id/book", post(ride_detail::book_ride::<B, I>))
        .route("/rides/:id/review", post(ride_detail::submit_review::<B, I>))
        .route("/rides/:id/complete", post(ride_detail::complete_ride::<B, I>))
        .route("/rides/:id/delete", post(ride_detail::delete_ride::<B, I>))
        .route("/rides/:id/update", post(ride_detail::update_ride::<B, I>))
        .route(
            "/rides/:id/reviews/update",
            post(ride_detail::update_review::<B, I>),
        )
        .route(
            "/rides/:id/reviews/delete",
            post(ride_detail::delete_review::<B, I>),
        )
        // Rider and vehicles
        .route("/bookings", get(bookings::my_bookings::<B, I>))
        .route(
            "/vehicles",
            get(vehicles::vehicles_page::<B, I>).post(vehicles::create_vehicle::<B, I>),
        )
        // Driver area
        .route("/driver", get(driver::dashboard::<B, I>))
        .route("/driver/requests", get(driver::requests::<B, I>))
        .route(
            "/driver/requests/approve",
            post(driver::approve_request::<B, I>),
        )
        .route("/driver/requests/reject", post(driver::reject_request::<B, I>))
        .route(
            "/driver/rides",
            get(driver::rides::<B, I>).post(driver::create_ride::<B, I>),
        )
        .route("/driver/rides/delete", post(driver::delete_ride::<B, I>))
        .route(
            "/driver/vehicles",
            get(driver::vehicles::<B, I>).post(driver::create_vehicle::<B, I>),
        )
        .route(
            "/driver/vehicles/delete",
            post(driver::delete_vehicle::<B, I>),
        )
        // Account
        .route("/account", get(account::account::<B, I>))
        .route("/account/profile", post(account::update_profile::<B, I>))
        .route(
            "/account/verification",
            post(account::request_verification::<B, I>),
        )
        // Admin
        .route("/admin/verifications", get(admin::verifications::<B, I>))
        .route(
            "/admin/verifications/verify",
            post(admin::verify_user::<B, I>),
        )
        .route(
            "/admin/verifications/reject",
            post(admin::reject_user::<B, I>),
        )
        .route("/admin/moderation", get(admin::moderation::<B, I>))
        .route(
            "/admin/moderation/delete",
            post(admin::delete_content::<B, I>),
        )
        .route(
            "/admin/moderation/dismiss",
            post(admin::dismiss_flag::<B, I>),
        )
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors_layer())
                .layer(MapResponseBodyLayer::new(axum::body::Body::new))
                .layer(RequestBodyLimitLayer::new(max_body_bytes)),
        )
        .with_state(state)
}

/// Build the CORS layer: any origin, the form and API verbs, and the two
/// request headers pages send.
fn build_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
