//! Vehicle registration page.

use std::sync::Arc;

use axum::extract::State;
use axum::{Form, Json};
use serde::{Deserialize, Serialize};

use shareway_auth::IdentityProvider;
use shareway_backend::{BackendApi, NewVehicle};
use shareway_core::join::filter_by_key;
use shareway_core::Vehicle;

use crate::aggregate::soft;
use crate::error::ApiError;
use crate::forms::{optional_text, parse_int};
use crate::outcome::ActionOutcome;
use crate::session::CurrentSession;
use crate::state::AppState;

/// View-model of the vehicles page.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehiclesView {
    /// Every vehicle the backend returned.
    pub vehicles: Vec<Vehicle>,
    /// The viewer's vehicles.
    pub my_vehicles: Vec<Vehicle>,
}

/// `GET /vehicles`
pub async fn vehicles_page<B, I>(
    State(state): State<Arc<AppState<B, I>>>,
    session: CurrentSession,
) -> Json<VehiclesView>
where
    B: BackendApi + 'static,
    I: IdentityProvider + 'static,
{
    let Some(token) = session.token() else {
        return Json(VehiclesView::default());
    };

    let vehicles: Vec<Vehicle> =
        soft("vehicles", "vehicles", state.backend.list_vehicles(token)).await;
    let my_vehicles = filter_by_key(vehicles.clone(), session.email(), |v| v.owner_id.as_str());

    Json(VehiclesView {
        vehicles,
        my_vehicles,
    })
}

/// Fields of the vehicle registration form.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleForm {
    /// Manufacturer.
    pub make: Option<String>,
    /// Model name.
    pub model: Option<String>,
    /// Model year.
    pub year: Option<String>,
    /// Paint colour.
    pub color: Option<String>,
    /// Passenger seats.
    pub seats: Option<String>,
    /// Hashed licence plate.
    pub plate_hash: Option<String>,
}

impl VehicleForm {
    /// The backend payload for a vehicle owned by `owner_id`.
    ///
    /// With `blank_color_is_null` an empty colour is sent as `null` rather
    /// than as an empty string.
    #[must_use]
    pub fn into_new_vehicle(self, owner_id: &str, blank_color_is_null: bool) -> NewVehicle {
        let color = if blank_color_is_null {
            optional_text(self.color)
        } else {
            self.color
        };

        NewVehicle {
            owner_id: owner_id.to_string(),
            make: self.make,
            model: self.model,
            year: parse_int(self.year.as_deref()),
            color,
            seats: parse_int(self.seats.as_deref()),
            plate_hash: self.plate_hash,
        }
    }
}

/// `POST /vehicles`
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

    let vehicle = form.into_new_vehicle(session.email(), true);
    let result = state.backend.create_vehicle(token, &vehicle).await;
    Ok(ActionOutcome::from_result("create_vehicle", None, result, |_| {
        "Could not create vehicle"
    }))
}
