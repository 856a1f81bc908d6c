//! Ride offering page.

use std::sync::Arc;

use axum::extract::State;
use axum::{Form, Json};
use serde::{Deserialize, Serialize};

use shareway_auth::IdentityProvider;
use shareway_backend::{BackendApi, NewRide, RideQuery};
use shareway_core::join::filter_by_key;
use shareway_core::{Ride, Vehicle};

use crate::aggregate::{batch_failed, owned_rides, ALL_RIDES_PAGE_SIZE};
use crate::error::ApiError;
use crate::forms::{optional_text, parse_float, parse_int, route_radius};
use crate::outcome::ActionOutcome;
use crate::session::CurrentSession;
use crate::state::AppState;

/// View-model of the ride offering page.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RideCreateView {
    /// Vehicles owned by the viewer.
    pub my_vehicles: Vec<Vehicle>,
    /// Rides driven by the viewer.
    pub my_rides: Vec<Ride>,
}

/// `GET /rides/create`
///
/// Vehicles and rides load as one batch; if either fails both lists are
/// empty.
pub async fn create_ride_page<B, I>(
    State(state): State<Arc<AppState<B, I>>>,
    session: CurrentSession,
) -> Json<RideCreateView>
where
    B: BackendApi + 'static,
    I: IdentityProvider + 'static,
{
    let Some(token) = session.token() else {
        return Json(RideCreateView::default());
    };
    let backend = &state.backend;
    let rides_query = RideQuery::page_size(ALL_RIDES_PAGE_SIZE);

    let loaded = futures::try_join!(
        backend.list_vehicles(token),
        backend.list_rides(Some(token), &rides_query),
    );

    match loaded {
        Ok((vehicles, rides)) => Json(RideCreateView {
            my_vehicles: filter_by_key(vehicles, session.email(), |v| v.owner_id.as_str()),
            my_rides: owned_rides(rides, session.email()),
        }),
        Err(e) => {
            batch_failed("ride_create", &e);
            Json(RideCreateView::default())
        }
    }
}

/// Fields of the ride offering form.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RideForm {
    /// Vehicle used for the ride.
    pub vehicle_id: Option<String>,
    /// Origin.
    pub start_location: Option<String>,
    /// Destination.
    pub end_location: Option<String>,
    /// Departure timestamp.
    pub departure_time: Option<String>,
    /// Expected duration.
    pub duration_minutes: Option<String>,
    /// Price per seat.
    pub price_per_seat: Option<String>,
    /// Seats offered.
    pub seats_total: Option<String>,
    /// Free text.
    pub description: Option<String>,
    /// Accepted detour for pickups.
    pub route_radius_km: Option<String>,
}

impl RideForm {
    /// The backend payload for a ride driven by `driver_id`.
    ///
    /// With `scheduling` the duration and detour fields are sent as well;
    /// the simple offering form leaves them out.
    #[must_use]
    pub fn into_new_ride(self, driver_id: &str, scheduling: bool) -> NewRide {
        let (duration_minutes, route_radius_km) = if scheduling {
            (
                parse_int(self.duration_minutes.as_deref()),
                Some(route_radius(self.route_radius_km.as_deref())),
            )
        } else {
            (None, None)
        };

        NewRide {
            driver_id: driver_id.to_string(),
            vehicle_id: self.vehicle_id,
            start_location: self.start_location,
            end_location: self.end_location,
            departure_time: self.departure_time,
            duration_minutes,
            price_per_seat: parse_float(self.price_per_seat.as_deref()),
            seats_total: parse_int(self.seats_total.as_deref()),
            description: optional_text(self.description),
            route_radius_km,
        }
    }
}

/// `POST /rides/create`
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

    let ride = form.into_new_ride(session.email(), false);
    let result = state.backend.create_ride(token, &ride).await;
    Ok(ActionOutcome::from_result("create_ride", None, result, |_| {
        "Could not create ride"
    }))
}
