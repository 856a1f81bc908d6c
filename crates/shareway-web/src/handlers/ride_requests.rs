//! Booking requests on the viewer's rides.
//!
//! The same approve/reject forms are offered on the driver dashboard, which
//! tags its outcomes differently; both go through [`decide_booking`].

use std::sync::Arc;

use axum::extract::State;
use axum::{Form, Json};
use serde::{Deserialize, Serialize};

use shareway_auth::IdentityProvider;
use shareway_backend::{BackendApi, RideQuery};
use shareway_core::{Booking, DirectoryUser, Ride};

use crate::aggregate::{batch_failed, bookings_on, owned_rides, ALL_RIDES_PAGE_SIZE};
use crate::error::ApiError;
use crate::outcome::ActionOutcome;
use crate::session::CurrentSession;
use crate::state::AppState;

/// View-model of the requests page.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RideRequestsView {
    /// Rides driven by the viewer.
    pub my_rides: Vec<Ride>,
    /// Bookings on those rides.
    pub bookings: Vec<Booking>,
    /// The user directory, for rider names.
    pub users: Vec<DirectoryUser>,
}

/// Rides, bookings and users of a driver, loaded as one batch.
pub(crate) async fn load_driver_requests<B: BackendApi>(
    view: &'static str,
    backend: &B,
    token: &str,
    email: &str,
) -> RideRequestsView {
    let rides_query = RideQuery::page_size(ALL_RIDES_PAGE_SIZE);

    let loaded = futures::try_join!(
        backend.list_rides(Some(token), &rides_query),
        backend.list_bookings(token),
        backend.list_users(token),
    );

    match loaded {
        Ok((rides, bookings, users)) => {
            let my_rides = owned_rides(rides, email);
            let bookings = bookings_on(bookings, &my_rides);
            RideRequestsView {
                my_rides,
                bookings,
                users,
            }
        }
        Err(e) => {
            batch_failed(view, &e);
            RideRequestsView::default()
        }
    }
}

/// `GET /rides/requests`
pub async fn ride_requests<B, I>(
    State(state): State<Arc<AppState<B, I>>>,
    session: CurrentSession,
) -> Json<RideRequestsView>
where
    B: BackendApi + 'static,
    I: IdentityProvider + 'static,
{
    let Some(token) = session.token() else {
        return Json(RideRequestsView::default());
    };

    Json(load_driver_requests("ride_requests", state.backend.as_ref(), token, session.email()).await)
}

/// Fields of the approve/reject forms.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDecisionForm {
    /// Booking being decided.
    pub booking_id: Option<String>,
}

/// What the driver decided about a booking request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Accept the rider.
    Approve,
    /// Turn the rider down.
    Reject,
}

/// Forward a booking decision and map the result.
pub(crate) async fn decide_booking<B: BackendApi>(
    backend: &B,
    token: &str,
    form: BookingDecisionForm,
    decision: Decision,
    tag: &'static str,
) -> ActionOutcome {
    let booking_id = form.booking_id.unwrap_or_default();

    match decision {
        Decision::Approve => {
            let result = backend.approve_booking(token, &booking_id).await;
            ActionOutcome::from_result("approve_booking", Some(tag), result, |_| {
                "Could not approve booking"
            })
        }
        Decision::Reject => {
            let result = backend.reject_booking(token, &booking_id).await;
            ActionOutcome::from_result("reject_booking", Some(tag), result, |_| {
                "Could not reject booking"
            })
        }
    }
}

/// `POST /rides/requests/approve`
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
    Ok(decide_booking(state.backend.as_ref(), token, form, Decision::Approve, "approved").await)
}

/// `POST /rides/requests/reject`
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
    Ok(decide_booking(state.backend.as_ref(), token, form, Decision::Reject, "rejected").await)
}
