//! Driver area: dashboard, requests, rides and vehicles.
//!
//! Every page here needs a session. The forms mirror the standalone ride,
//! request and vehicle pages but tag their outcomes so the driver pages can
//! tell which form succeeded.

use std::sync::Arc;

use axum::extract::State;
use axum::{Form, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use shareway_auth::{Claims, IdentityProvider};
use shareway_backend::{BackendApi, RideQuery};
use shareway_core::join::filter_by_key;
use shareway_core::{Booking, BookingStatus, DirectoryUser, Ride, Vehicle};

use crate::aggregate::{batch_failed, bookings_on, owned_rides, soft, ALL_RIDES_PAGE_SIZE};
use crate::error::ApiError;
use crate::handlers::ride_create::RideForm;
use crate::handlers::ride_requests::{
    decide_booking, load_driver_requests, BookingDecisionForm, Decision,
};
use crate::handlers::vehicles::VehicleForm;
use crate::outcome::ActionOutcome;
use crate::session::CurrentSession;
use crate::state::AppState;

/// Shown on the rides page when its lookups fail.
pub const RIDES_LOAD_ERROR: &str = "Could not load your rides and vehicles. Please try again.";

// =============================================================================
// Dashboard
// =============================================================================

/// View-model of the driver dashboard.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    /// Rides the viewer drives.
    pub rides_count: usize,
    /// Booking requests awaiting a decision on those rides.
    pub pending_count: usize,
    /// Vehicles the viewer owns.
    pub vehicles_count: usize,
    /// The viewer's backend profile, `null` when unavailable.
    pub db_user: Value,
    /// Always true; the page requires a session.
    pub is_authenticated: bool,
    /// The viewer's claims.
    pub user: Claims,
}

/// Counts shown on the dashboard.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DashboardCounts {
    /// Rides driven.
    pub rides: usize,
    /// Requested bookings on those rides.
    pub pending: usize,
    /// Vehicles owned.
    pub vehicles: usize,
}

impl DashboardCounts {
    /// Count what belongs to `email`.
    #[must_use]
    pub fn tally(email: &str, vehicles: Vec<Vehicle>, rides: Vec<Ride>, bookings: Vec<Booking>) -> Self {
        let my_vehicles = filter_by_key(vehicles, email, |v| v.owner_id.as_str());
        let my_rides: Vec<Ride> = rides.into_iter().filter(|r| r.driver_id == email).collect();
        let pending = bookings_on(bookings, &my_rides)
            .iter()
            .filter(|b| b.status == BookingStatus::Requested)
            .count();

        Self {
            rides: my_rides.len(),
            pending,
            vehicles: my_vehicles.len(),
        }
    }
}

/// `GET /driver`
///
/// # Errors
///
/// Returns `Unauthorized` without a session.
pub async fn dashboard<B, I>(
    State(state): State<Arc<AppState<B, I>>>,
    session: CurrentSession,
) -> Result<Json<DashboardView>, ApiError>
where
    B: BackendApi + 'static,
    I: IdentityProvider + 'static,
{
    let token = session.require_token()?;
    let backend = &state.backend;
    let rides_query = RideQuery::page_size(ALL_RIDES_PAGE_SIZE);

    let loaded = futures::try_join!(
        backend.list_vehicles(token),
        backend.list_rides(Some(token), &rides_query),
        backend.list_bookings(token),
        backend.current_user(token),
    );

    let (counts, db_user) = match loaded {
        Ok((vehicles, rides, bookings, me)) => (
            DashboardCounts::tally(session.email(), vehicles, rides.content, bookings),
            me,
        ),
        Err(e) => {
            batch_failed("driver_dashboard", &e);
            (DashboardCounts::default(), Value::Null)
        }
    };

    Ok(Json(DashboardView {
        rides_count: counts.rides,
        pending_count: counts.pending,
        vehicles_count: counts.vehicles,
        db_user,
        is_authenticated: true,
        user: session.claims().clone(),
    }))
}

// =============================================================================
// Requests
// =============================================================================

/// View-model of the driver's requests page.
#[derive(Debug, Serialize)]
pub struct DriverRequestsView {
    /// Rides the viewer drives.
    pub rides: Vec<Ride>,
    /// Bookings on those rides.
    pub bookings: Vec<Booking>,
    /// The user directory.
    pub users: Vec<DirectoryUser>,
}

/// `GET /driver/requests`
///
/// # Errors
///
/// Returns `Unauthorized` without a session.
pub async fn requests<B, I>(
    State(state): State<Arc<AppState<B, I>>>,
    session: CurrentSession,
) -> Result<Json<DriverRequestsView>, ApiError>
where
    B: BackendApi + 'static,
    I: IdentityProvider + 'static,
{
    let token = session.require_token()?;
    let loaded =
        load_driver_requests("driver_requests", state.backend.as_ref(), token, session.email())
            .await;

    Ok(Json(DriverRequestsView {
        rides: loaded.my_rides,
        bookings: loaded.bookings,
        users: loaded.users,
    }))
}

/// `POST /driver/requests/approve`
///
/// # Errors
///
/// Returns `Unauthorized` without a session.
pub async fn approve_request<B, I>(
    State(state): State<Arc<AppState<B, I>>>,
    session: CurrentSession,
    Form(form): Form<BookingDecisionForm>,
) -> Result<ActionOutcome, ApiError>
where
    B: BackendApi + 'static,
    I: IdentityProvider + 'static,
{
    let token = session.require_token()?;
    Ok(decide_booking(state.backend.as_ref(), token, form, Decision::Approve, "approve").await)
}

/// `POST /driver/requests/reject`
///
/// # Errors
///
/// Returns `Unauthorized` without a session.
pub async fn reject_request<B, I>(
    State(state): State<Arc<AppState<B, I>>>,
    session: CurrentSession,
    Form(form): Form<BookingDecisionForm>,
) -> Result<ActionOutcome, ApiError>
where
    B: BackendApi + 'static,
    I: IdentityProvider + 'static,
{
    let token = session.require_token()?;
    Ok(decide_booking(state.backend.as_ref(), token, form, Decision::Reject, "reject").await)
}

// =============================================================================
// Rides
// =============================================================================

/// View-model of the driver's rides page.
#[derive(Debug, Default, Serialize)]
pub struct DriverRidesView {
    /// Vehicles the viewer owns.
    pub vehicles: Vec<Vehicle>,
    /// Rides the viewer drives.
    pub rides: Vec<Ride>,
    /// Load failure shown above the lists.
    pub error: Option<&'static str>,
}

/// `GET /driver/rides`
///
/// # Errors
///
/// Returns `Unauthorized` without a session.
pub async fn rides<B, I>(
    State(state): State<Arc<AppState<B, I>>>,
    session: CurrentSession,
) -> Result<Json<DriverRidesView>, ApiError>
where
    B: BackendApi + 'static,
    I: IdentityProvider + 'static,
{
    let token = session.require_token()?;
    let backend = &state.backend;
    let rides_query = RideQuery::page_size(ALL_RIDES_PAGE_SIZE);

    let loaded = futures::try_join!(
        backend.list_vehicles(token),
        backend.list_rides(Some(token), &rides_query),
    );

    let view = match loaded {
        Ok((vehicles, rides)) => DriverRidesView {
            vehicles: filter_by_key(vehicles, session.email(), |v| v.owner_id.as_str()),
            rides: owned_rides(rides, session.email()),
            error: None,
        },
        Err(e) => {
            batch_failed("driver_rides", &e);
            DriverRidesView {
                error: Some(RIDES_LOAD_ERROR),
                ..DriverRidesView::default()
            }
        }
    };

    Ok(Json(view))
}

/// `POST /driver/rides`
///
/// # Errors
///
/// Returns `Unauthorized` without a session.
pub async fn create_ride<B, I>(
    State(state): State<Arc<AppState<B, I>>>,
    session: CurrentSession,
    Form(form): Form<RideForm>,
) -> Result<ActionOutcome, ApiError>
where
    B: BackendApi + 'static,
    I: IdentityProvider + 'static,
{
    let token = session.require_token()?;

    let ride = form.into_new_ride(session.email(), true);
    let result = state.backend.create_ride(token, &ride).await;
    Ok(ActionOutcome::from_result("driver_create_ride", Some("ride"), result, |_| {
        "Could not create ride. Please try again."
    }))
}

/// Fields of the ride removal form.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RideIdForm {
    /// Ride to remove.
    pub ride_id: Option<String>,
}

/// `POST /driver/rides/delete`
///
/// # Errors
///
/// Returns `Unauthorized` without a session.
pub async fn delete_ride<B, I>(
    State(state): State<Arc<AppState<B, I>>>,
    session: CurrentSession,
    Form(form): Form<RideIdForm>,
) -> Result<ActionOutcome, ApiError>
where
    B: BackendApi + 'static,
    I: IdentityProvider + 'static,
{
    let token = session.require_token()?;

    let ride_id = form.ride_id.unwrap_or_default();
    let result = state.backend.delete_ride(token, &ride_id).await;
    Ok(ActionOutcome::from_result("driver_delete_ride", Some("deleteRide"), result, |_| {
        "Could not delete ride. Please try again."
    }))
}

// =============================================================================
// Vehicles
// =============================================================================

/// View-model of the driver's vehicles page.
#[derive(Debug, Serialize)]
pub struct DriverVehiclesView {
    /// Vehicles the viewer owns.
    pub vehicles: Vec<Vehicle>,
}

/// `GET /driver/vehicles`
///
/// # Errors
///
/// Returns `Unauthorized` without a session.
pub async fn vehicles<B, I>(
    State(state): State<Arc<AppState<B, I>>>,
    session: CurrentSession,
) -> Result<Json<DriverVehiclesView>, ApiError>
where
    B: BackendApi + 'static,
    I: IdentityProvider + 'static,
{
    let token = session.require_token()?;

    let all: Vec<Vehicle> =
        soft("driver_vehicles", "vehicles", state.backend.list_vehicles(token)).await;

    Ok(Json(DriverVehiclesView {
        vehicles: filter_by_key(all, session.email(), |v| v.owner_id.as_str()),
    }))
}

/// `POST /driver/vehicles`
///
/// # Errors
///
/// Returns `Unauthorized` without a session.
pub async fn create_vehicle<B, I>(
    State(state): State<Arc<AppState<B, I>>>,
    session: CurrentSession,
    Form(form): Form<VehicleForm>,
) -> Result<ActionOutcome, ApiError>
where
    B: BackendApi + 'static,
    I: IdentityProvider + 'static,
{
    let token = session.require_token()?;

    let vehicle = form.into_new_vehicle(session.email(), false);
    let result = state.backend.create_vehicle(token, &vehicle).await;
    Ok(ActionOutcome::from_result("driver_create_vehicle", Some("vehicle"), result, |_| {
        "Could not create vehicle"
    }))
}

/// Fields of the vehicle removal form.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleIdForm {
    /// Vehicle to remove.
    pub vehicle_id: Option<String>,
}

/// `POST /driver/vehicles/delete`
///
/// # Errors
///
/// Returns `Unauthorized` without a session.
pub async fn delete_vehicle<B, I>(
    State(state): State<Arc<AppState<B, I>>>,
    session: CurrentSession,
    Form(form): Form<VehicleIdForm>,
) -> Result<ActionOutcome, ApiError>
where
    B: BackendApi + 'static,
    I: IdentityProvider + 'static,
{
    let token = session.require_token()?;

    let vehicle_id = form.vehicle_id.unwrap_or_default();
    let result = state.backend.delete_vehicle(token, &vehicle_id).await;
    Ok(ActionOutcome::from_result(
        "driver_delete_vehicle",
        Some("deleteVehicle"),
        result,
        |_| "Could not delete vehicle",
    ))
}
