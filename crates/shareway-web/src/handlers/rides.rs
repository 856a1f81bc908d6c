//! Ride listing.
//!
//! `GET /rides` pages through the backend's ride collection. Status and price
//! filters are applied by the backend; origin, destination and date filters
//! are applied here to the fetched page only, so a page may show fewer rides
//! than its size even when later pages hold matches.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use shareway_auth::IdentityProvider;
use shareway_backend::{BackendApi, RideQuery};
use shareway_core::{Page, Ride, RideStatus};

use crate::aggregate::soft;
use crate::session::CurrentSession;
use crate::state::AppState;

/// Default page number.
pub const DEFAULT_PAGE_NUMBER: u32 = 1;
/// Default page size of the ride list.
pub const DEFAULT_PAGE_SIZE: u32 = 5;

/// Query parameters of the ride list.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RideListParams {
    /// 1-based page number.
    pub page_number: Option<String>,
    /// Rides per page.
    pub page_size: Option<String>,
    /// Status filter, honoured for admins only.
    pub status: Option<String>,
    /// Maximum price per seat.
    pub max_price: Option<String>,
    /// Origin substring.
    pub from: Option<String>,
    /// Destination substring.
    pub to: Option<String>,
    /// Departure date, `YYYY-MM-DD`.
    pub date: Option<String>,
}

impl RideListParams {
    fn page_number(&self) -> u32 {
        positive(self.page_number.as_deref()).unwrap_or(DEFAULT_PAGE_NUMBER)
    }

    fn page_size(&self) -> u32 {
        positive(self.page_size.as_deref()).unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// The backend query for a viewer. Non-admins only ever see open rides.
    #[must_use]
    pub fn backend_query(&self, is_admin: bool) -> RideQuery {
        let status = if is_admin {
            non_empty(self.status.as_deref())
        } else {
            Some(RideStatus::Open.as_str().to_string())
        };

        RideQuery {
            page_size: Some(self.page_size()),
            page_number: Some(self.page_number()),
            status,
            max_price: non_empty(self.max_price.as_deref()),
        }
    }

    /// Whether a ride passes the origin, destination and date filters.
    #[must_use]
    pub fn matches(&self, ride: &Ride) -> bool {
        let contains = |haystack: &str, needle: Option<&str>| match needle {
            Some(n) if !n.is_empty() => haystack.to_lowercase().contains(&n.to_lowercase()),
            _ => true,
        };

        let date = self
            .date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());

        contains(&ride.start_location, self.from.as_deref())
            && contains(&ride.end_location, self.to.as_deref())
            && date.map_or(true, |d| ride.departure_date() == Some(d))
    }
}

fn positive(value: Option<&str>) -> Option<u32> {
    value?.trim().parse().ok().filter(|n| *n > 0)
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

/// View-model of the ride list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RideListView {
    /// Rides on this page that pass the local filters.
    pub rides: Vec<Ride>,
    /// Total pages reported by the backend.
    pub nr_of_pages: u32,
    /// The requested page.
    pub current_page: u32,
}

/// `GET /rides`
///
/// Anonymous viewers are allowed; the backend call then carries no
/// credential. A failed lookup renders an empty list.
pub async fn list_rides<B, I>(
    State(state): State<Arc<AppState<B, I>>>,
    session: CurrentSession,
    Query(params): Query<RideListParams>,
) -> Json<RideListView>
where
    B: BackendApi + 'static,
    I: IdentityProvider + 'static,
{
    let query = params.backend_query(session.is_admin());

    let page: Page<Ride> = soft(
        "rides",
        "rides",
        state.backend.list_rides(session.token(), &query),
    )
    .await;

    let rides = page
        .content
        .into_iter()
        .filter(|ride| params.matches(ride))
        .collect();

    Json(RideListView {
        rides,
        nr_of_pages: page.total_pages,
        current_page: params.page_number(),
    })
}
