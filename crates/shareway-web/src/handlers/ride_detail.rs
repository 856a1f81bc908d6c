//! Ride detail page and its forms.
//!
//! The page is built around one ride (a hard call: no ride, no page) and
//! enriched with the driver, vehicle, reviews and bookings, each looked up
//! independently. Pickup locations of other riders are only disclosed to the
//! driver and to admins.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::{Form, Json};
use serde::{Deserialize, Serialize};

use shareway_auth::{Claims, IdentityProvider};
use shareway_backend::{BackendApi, BookRide, NewReview, ReviewUpdate, RideUpdate};
use shareway_core::join::find_by_key;
use shareway_core::{Booking, BookingStatus, DirectoryUser, Review, Ride, Vehicle};

use crate::aggregate::soft;
use crate::error::ApiError;
use crate::forms::{parse_float, parse_int, route_radius};
use crate::outcome::ActionOutcome;
use crate::session::CurrentSession;
use crate::state::AppState;

// =============================================================================
// View
// =============================================================================

/// One pickup point shown on the ride map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupEntry {
    /// Pickup location as entered by the rider.
    pub location: String,
    /// Label shown next to the pin.
    pub rider_name: String,
    /// Rider email.
    pub rider_id: String,
}

/// View-model of the ride detail page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RideDetailView {
    /// The ride.
    pub ride: Ride,
    /// The driver's directory entry, if found.
    pub driver: Option<DirectoryUser>,
    /// The ride's vehicle, if found.
    pub vehicle: Option<Vehicle>,
    /// Reviews of the ride.
    pub reviews: Vec<Review>,
    /// The viewer's own booking on this ride.
    pub my_booking: Option<Booking>,
    /// The user directory.
    pub users: Vec<DirectoryUser>,
    /// Pickup points the viewer may see.
    pub approved_bookings: Vec<PickupEntry>,
    /// The viewer's email.
    pub current_user_email: String,
    /// The viewer's claims.
    pub user: Claims,
}

/// Label for a rider without a directory entry.
const UNKNOWN_RIDER: &str = "Rider";
/// Label for the viewer's own pickup.
const OWN_PICKUP: &str = "Your Pickup";

/// Work out the viewer's own booking and the pickup points they may see.
///
/// The driver and admins see every approved pickup on the ride. A rider with
/// an approved booking sees only their own. Everyone else sees none.
#[must_use]
pub fn visible_pickups(
    ride_id: &str,
    ride: &Ride,
    bookings: &[Booking],
    users: &[DirectoryUser],
    viewer_email: &str,
    viewer_is_admin: bool,
) -> (Option<Booking>, Vec<PickupEntry>) {
    let my_booking = bookings
        .iter()
        .find(|b| b.ride_id == ride_id && b.rider_id == viewer_email)
        .cloned();

    let is_driver = ride.driver_id == viewer_email;

    let pickups = if is_driver || viewer_is_admin {
        bookings
            .iter()
            .filter(|b| b.ride_id == ride_id && b.status == BookingStatus::Approved)
            .filter_map(|b| {
                let location = b.pickup()?;
                let rider_name = find_by_key(users, &b.rider_id, |u| u.email.as_str())
                    .map_or_else(|| UNKNOWN_RIDER.to_string(), DirectoryUser::display_name);
                Some(PickupEntry {
                    location: location.to_string(),
                    rider_name,
                    rider_id: b.rider_id.clone(),
                })
            })
            .collect()
    } else {
        my_booking
            .as_ref()
            .filter(|b| b.status == BookingStatus::Approved)
            .and_then(Booking::pickup)
            .map(|location| {
                vec![PickupEntry {
                    location: location.to_string(),
                    rider_name: OWN_PICKUP.to_string(),
                    rider_id: viewer_email.to_string(),
                }]
            })
            .unwrap_or_default()
    };

    (my_booking, pickups)
}

/// `GET /rides/:id`
///
/// # Errors
///
/// Returns `Unauthorized` without a session and `NotFound` when the ride
/// cannot be loaded.
pub async fn ride_detail<B, I>(
    State(state): State<Arc<AppState<B, I>>>,
    session: CurrentSession,
    Path(ride_id): Path<String>,
) -> Result<Json<RideDetailView>, ApiError>
where
    B: BackendApi + 'static,
    I: IdentityProvider + 'static,
{
    let token = session.require_token()?;
    let backend = &state.backend;

    let ride = backend.get_ride(token, &ride_id).await.map_err(|e| {
        tracing::warn!(ride_id = %ride_id, error = %e, "Failed to load ride");
        ApiError::NotFound("Ride".to_string())
    })?;

    let (users, vehicles, reviews, bookings) = futures::join!(
        soft("ride_detail", "users", backend.list_users(token)),
        soft("ride_detail", "vehicles", backend.list_vehicles(token)),
        soft("ride_detail", "reviews", backend.ride_reviews(token, &ride_id)),
        soft("ride_detail", "bookings", backend.list_bookings(token)),
    );

    let driver = find_by_key(&users, &ride.driver_id, |u| u.email.as_str()).cloned();
    let vehicle = find_by_key(&vehicles, &ride.vehicle_id, |v| v.id.as_str()).cloned();

    let email = session.email().to_string();
    let (my_booking, approved_bookings) = visible_pickups(
        &ride_id,
        &ride,
        &bookings,
        &users,
        &email,
        session.is_admin(),
    );

    Ok(Json(RideDetailView {
        ride,
        driver,
        vehicle,
        reviews,
        my_booking,
        users,
        approved_bookings,
        current_user_email: email,
        user: session.claims().clone(),
    }))
}

// =============================================================================
// Actions
// =============================================================================

/// Fields of the booking form.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRideForm {
    /// Where the rider wants to be picked up.
    pub pickup_location: Option<String>,
    /// Note to the driver.
    pub message: Option<String>,
    /// Promo code.
    pub promo_code: Option<String>,
}

/// `POST /rides/:id/book`
///
/// # Errors
///
/// Returns `Unauthorized` without a session.
pub async fn book_ride<B, I>(
    State(state): State<Arc<AppState<B, I>>>,
    session: CurrentSession,
    Path(ride_id): Path<String>,
    Form(form): Form<BookRideForm>,
) -> Result<ActionOutcome, ApiError>
where
    B: BackendApi + 'static,
    I: IdentityProvider + 'static,
{
    let token = session.require_token()?;

    let Some(pickup_location) = form.pickup_location.filter(|p| !p.is_empty()) else {
        return Ok(ActionOutcome::failed("Please select a pickup location"));
    };

    let booking = BookRide {
        ride_id,
        seats: 1,
        pickup_location,
        message: form.message,
        promo_code: form.promo_code,
    };

    let result = state.backend.book_ride(token, &booking).await;
    Ok(ActionOutcome::from_result("book_ride", Some("booked"), result, |_| {
        "Could not book ride"
    }))
}

/// Fields of the review form.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewForm {
    /// Review being edited or deleted.
    pub review_id: Option<String>,
    /// Stars.
    pub rating: Option<String>,
    /// Comment text.
    pub comment: Option<String>,
}

/// `POST /rides/:id/review`
///
/// # Errors
///
/// Returns `Unauthorized` without a session.
pub async fn submit_review<B, I>(
    State(state): State<Arc<AppState<B, I>>>,
    session: CurrentSession,
    Path(ride_id): Path<String>,
    Form(form): Form<ReviewForm>,
) -> Result<ActionOutcome, ApiError>
where
    B: BackendApi + 'static,
    I: IdentityProvider + 'static,
{
    let token = session.require_token()?;

    let review = NewReview {
        ride_id,
        rating: parse_int(form.rating.as_deref()),
        comment: form.comment.unwrap_or_default(),
    };

    let result = state.backend.create_review(token, &review).await;
    Ok(ActionOutcome::from_result("submit_review", Some("reviewed"), result, |e| {
        if e.is_status(409) {
            "You have already reviewed this ride"
        } else {
            "Could not submit review"
        }
    }))
}

/// `POST /rides/:id/complete`
///
/// # Errors
///
/// Returns `Unauthorized` without a session.
pub async fn complete_ride<B, I>(
    State(state): State<Arc<AppState<B, I>>>,
    session: CurrentSession,
    Path(ride_id): Path<String>,
) -> Result<ActionOutcome, ApiError>
where
    B: BackendApi + 'static,
    I: IdentityProvider + 'static,
{
    let token = session.require_token()?;

    let result = state.backend.complete_ride(token, &ride_id).await;
    Ok(ActionOutcome::from_result("complete_ride", Some("completed"), result, |_| {
        "Could not complete ride"
    }))
}

/// `POST /rides/:id/delete`
///
/// # Errors
///
/// Returns `Unauthorized` without a session.
pub async fn delete_ride<B, I>(
    State(state): State<Arc<AppState<B, I>>>,
    session: CurrentSession,
    Path(ride_id): Path<String>,
) -> Result<ActionOutcome, ApiError>
where
    B: BackendApi + 'static,
    I: IdentityProvider + 'static,
{
    let token = session.require_token()?;

    let result = state.backend.delete_ride(token, &ride_id).await;
    Ok(ActionOutcome::from_result("delete_ride", Some("deleted"), result, |e| {
        if e.is_status(403) {
            "You are not authorized to delete this ride"
        } else {
            "Could not delete ride"
        }
    }))
}

/// Fields of the ride edit form.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRideForm {
    /// New departure timestamp.
    pub departure_time: Option<String>,
    /// New price per seat.
    pub price_per_seat: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New accepted detour.
    pub route_radius_km: Option<String>,
}

/// `POST /rides/:id/update`
///
/// # Errors
///
/// Returns `Unauthorized` without a session.
pub async fn update_ride<B, I>(
    State(state): State<Arc<AppState<B, I>>>,
    session: CurrentSession,
    Path(ride_id): Path<String>,
    Form(form): Form<UpdateRideForm>,
) -> Result<ActionOutcome, ApiError>
where
    B: BackendApi + 'static,
    I: IdentityProvider + 'static,
{
    let token = session.require_token()?;

    let update = RideUpdate {
        departure_time: form.departure_time,
        price_per_seat: parse_float(form.price_per_seat.as_deref()),
        description: form.description.unwrap_or_default(),
        route_radius_km: route_radius(form.route_radius_km.as_deref()),
    };

    let result = state.backend.update_ride(token, &ride_id, &update).await;
    Ok(ActionOutcome::from_result("update_ride", Some("updated"), result, |e| {
        if e.is_status(403) {
            "You are not authorized to edit this ride"
        } else {
            "Could not update ride"
        }
    }))
}

/// `POST /rides/:id/reviews/update`
///
/// # Errors
///
/// Returns `Unauthorized` without a session.
pub async fn update_review<B, I>(
    State(state): State<Arc<AppState<B, I>>>,
    session: CurrentSession,
    Form(form): Form<ReviewForm>,
) -> Result<ActionOutcome, ApiError>
where
    B: BackendApi + 'static,
    I: IdentityProvider + 'static,
{
    let token = session.require_token()?;

    let review_id = form.review_id.unwrap_or_default();
    let update = ReviewUpdate {
        rating: parse_int(form.rating.as_deref()),
        comment: form.comment.unwrap_or_default(),
    };

    let result = state.backend.update_review(token, &review_id, &update).await;
    Ok(ActionOutcome::from_result("update_review", Some("reviewUpdated"), result, |e| {
        if e.is_status(403) {
            "You are not authorized to edit this review"
        } else {
            "Could not update review"
        }
    }))
}

/// `POST /rides/:id/reviews/delete`
///
/// # Errors
///
/// Returns `Unauthorized` without a session.
pub async fn delete_review<B, I>(
    State(state): State<Arc<AppState<B, I>>>,
    session: CurrentSession,
    Form(form): Form<ReviewForm>,
) -> Result<ActionOutcome, ApiError>
where
    B: BackendApi + 'static,
    I: IdentityProvider + 'static,
{
    let token = session.require_token()?;

    let review_id = form.review_id.unwrap_or_default();
    let result = state.backend.delete_review(token, &review_id).await;
    Ok(ActionOutcome::from_result("delete_review", Some("reviewDeleted"), result, |e| {
        if e.is_status(403) {
            "You are not authorized to delete this review"
        } else {
            "Could not delete review"
        }
    }))
}
