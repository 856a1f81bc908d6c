//! The rider's own bookings.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use shareway_auth::IdentityProvider;
use shareway_backend::{BackendApi, RideQuery};
use shareway_core::join::filter_by_key;
use shareway_core::{Booking, DirectoryUser, Page, Ride};

use crate::aggregate::{soft, ALL_RIDES_PAGE_SIZE};
use crate::session::CurrentSession;
use crate::state::AppState;

/// View-model of the bookings page.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingsView {
    /// Bookings made by the viewer.
    pub bookings: Vec<Booking>,
    /// Rides to resolve booking details against.
    pub rides: Vec<Ride>,
    /// The user directory, for driver names.
    pub users: Vec<DirectoryUser>,
}

/// `GET /bookings`
///
/// Each lookup degrades on its own: a failed ride lookup still shows the
/// bookings.
pub async fn my_bookings<B, I>(
    State(state): State<Arc<AppState<B, I>>>,
    session: CurrentSession,
) -> Json<BookingsView>
where
    B: BackendApi + 'static,
    I: IdentityProvider + 'static,
{
    let Some(token) = session.token() else {
        return Json(BookingsView::default());
    };
    let backend = &state.backend;
    let rides_query = RideQuery::page_size(ALL_RIDES_PAGE_SIZE);

    let (bookings, rides, users) = futures::join!(
        soft("bookings", "bookings", backend.list_bookings(token)),
        soft::<Page<Ride>, _>("bookings", "rides", backend.list_rides(Some(token), &rides_query)),
        soft("bookings", "users", backend.list_users(token)),
    );

    Json(BookingsView {
        bookings: filter_by_key(bookings, session.email(), |b| b.rider_id.as_str()),
        rides: rides.content,
        users,
    })
}
