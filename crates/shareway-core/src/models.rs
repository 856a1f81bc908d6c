//! Resource projections returned by the backend API.
//!
//! All resources are owned by the backend. These types deserialize leniently
//! (missing or `null` fields fall back to defaults, unknown statuses are kept
//! verbatim) and keep any field they do not name in
//! `extra`, so a resource forwarded to a page comes out the way it went in.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Lifecycle status of a ride.
///
/// Statuses this layer does not act on are carried through as `Other`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RideStatus {
    /// Accepting bookings.
    #[default]
    Open,
    /// All seats booked.
    Full,
    /// Underway.
    InProgress,
    /// Finished.
    Completed,
    /// Cancelled by the driver.
    Cancelled,
    /// Closed to new bookings.
    Closed,
    /// Any other backend status, verbatim.
    Other(String),
}

impl RideStatus {
    /// The wire representation used in query parameters.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Open => "OPEN",
            Self::Full => "FULL",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
            Self::Closed => "CLOSED",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for RideStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "OPEN" => Self::Open,
            "FULL" => Self::Full,
            "IN_PROGRESS" => Self::InProgress,
            "COMPLETED" => Self::Completed,
            "CANCELLED" => Self::Cancelled,
            "CLOSED" => Self::Closed,
            _ => Self::Other(raw),
        }
    }
}

impl From<RideStatus> for String {
    fn from(status: RideStatus) -> Self {
        match status {
            RideStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// Lifecycle status of a booking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BookingStatus {
    /// Waiting for the driver.
    #[default]
    Requested,
    /// Accepted by the driver.
    Approved,
    /// Declined by the driver.
    Rejected,
    /// Withdrawn by the rider.
    Canceled,
    /// The ride took place.
    Completed,
    /// Any other backend status, verbatim.
    Other(String),
}

impl BookingStatus {
    /// The wire representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Requested => "REQUESTED",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Canceled => "CANCELED",
            Self::Completed => "COMPLETED",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for BookingStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "REQUESTED" => Self::Requested,
            "APPROVED" => Self::Approved,
            "REJECTED" => Self::Rejected,
            "CANCELED" => Self::Canceled,
            "COMPLETED" => Self::Completed,
            _ => Self::Other(raw),
        }
    }
}

impl From<BookingStatus> for String {
    fn from(status: BookingStatus) -> Self {
        match status {
            BookingStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// Read a field the backend may send as `null`, falling back to its default.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A ride offered by a driver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Ride {
    /// Ride ID.
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    /// Driver email (natural key into the user directory).
    #[serde(deserialize_with = "nullable")]
    pub driver_id: String,
    /// Vehicle ID.
    #[serde(deserialize_with = "nullable")]
    pub vehicle_id: String,
    /// Departure location.
    #[serde(deserialize_with = "nullable")]
    pub start_location: String,
    /// Destination.
    #[serde(deserialize_with = "nullable")]
    pub end_location: String,
    /// Local departure timestamp, e.g. `2025-03-01T08:30:00`.
    #[serde(deserialize_with = "nullable")]
    pub departure_time: String,
    /// Expected duration.
    pub duration_minutes: Option<i64>,
    /// Price per seat.
    #[serde(deserialize_with = "nullable")]
    pub price_per_seat: f64,
    /// Total seats offered.
    #[serde(deserialize_with = "nullable")]
    pub seats_total: i64,
    /// Seats still free.
    pub seats_free: Option<i64>,
    /// Current status.
    #[serde(deserialize_with = "nullable")]
    pub status: RideStatus,
    /// Free-text description.
    pub description: Option<String>,
    /// Detour the driver accepts for pickups.
    pub route_radius_km: Option<f64>,
    /// Fields not modelled here.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Ride {
    /// The calendar date of departure, if `departure_time` starts with one.
    #[must_use]
    pub fn departure_date(&self) -> Option<NaiveDate> {
        let date = self.departure_time.get(..10)?;
        NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
    }
}

/// A rider's request for a seat on a ride.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Booking {
    /// Booking ID.
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    /// The booked ride.
    #[serde(deserialize_with = "nullable")]
    pub ride_id: String,
    /// Rider email.
    #[serde(deserialize_with = "nullable")]
    pub rider_id: String,
    /// Seats requested.
    pub seats: Option<i64>,
    /// Current status.
    #[serde(deserialize_with = "nullable")]
    pub status: BookingStatus,
    /// Where the rider wants to be picked up.
    pub pickup_location: Option<String>,
    /// Note to the driver.
    pub message: Option<String>,
    /// Fields not modelled here.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Booking {
    /// The pickup location, treating an empty string as absent.
    #[must_use]
    pub fn pickup(&self) -> Option<&str> {
        self.pickup_location.as_deref().filter(|p| !p.is_empty())
    }
}

/// A vehicle registered by a driver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Vehicle {
    /// Vehicle ID.
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    /// Owner email.
    #[serde(deserialize_with = "nullable")]
    pub owner_id: String,
    /// Manufacturer.
    #[serde(deserialize_with = "nullable")]
    pub make: String,
    /// Model name.
    #[serde(deserialize_with = "nullable")]
    pub model: String,
    /// Model year.
    pub year: Option<i64>,
    /// Paint colour.
    pub color: Option<String>,
    /// Number of seats.
    pub seats: Option<i64>,
    /// Hashed licence plate.
    #[serde(deserialize_with = "nullable")]
    pub plate_hash: String,
    /// Fields not modelled here.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A user as listed by the backend's user directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DirectoryUser {
    /// Email, the natural key other resources reference.
    #[serde(deserialize_with = "nullable")]
    pub email: String,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Roles granted to the user.
    #[serde(rename = "user_roles")]
    #[serde(deserialize_with = "nullable")]
    pub user_roles: Vec<String>,
    /// Fields not modelled here.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DirectoryUser {
    /// First and last name joined by a space and trimmed.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or_default(),
            self.last_name.as_deref().unwrap_or_default()
        )
        .trim()
        .to_string()
    }
}

/// A rating left for a ride.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Review {
    /// Review ID.
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    /// Reviewed ride.
    #[serde(deserialize_with = "nullable")]
    pub ride_id: String,
    /// Author email.
    #[serde(deserialize_with = "nullable")]
    pub from_user_id: String,
    /// Subject email.
    #[serde(deserialize_with = "nullable")]
    pub to_user_id: String,
    /// Stars, 1 to 5.
    pub rating: Option<i64>,
    /// Comment text.
    #[serde(deserialize_with = "nullable")]
    pub comment: String,
    /// Fields not modelled here.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Content flagged by automated moderation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlaggedContent {
    /// Flag ID.
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    /// Kind of content, e.g. `REVIEW`.
    #[serde(deserialize_with = "nullable")]
    pub content_type: String,
    /// ID of the flagged resource.
    #[serde(deserialize_with = "nullable")]
    pub content_id: String,
    /// The flagged text.
    #[serde(deserialize_with = "nullable")]
    pub content: String,
    /// Why it was flagged.
    #[serde(deserialize_with = "nullable")]
    pub reason: String,
    /// Author email.
    #[serde(deserialize_with = "nullable")]
    pub user_id: String,
    /// Fields not modelled here.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A job posting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Job {
    /// Job ID.
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    /// Title.
    #[serde(deserialize_with = "nullable")]
    pub title: String,
    /// Description.
    #[serde(deserialize_with = "nullable")]
    pub description: String,
    /// Offered earnings.
    pub earnings: Option<f64>,
    /// Job type.
    #[serde(deserialize_with = "nullable")]
    pub job_type: String,
    /// Owning company.
    #[serde(deserialize_with = "nullable")]
    pub company_id: String,
    /// Fields not modelled here.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A company that posts jobs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Company {
    /// Company ID.
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    /// Display name.
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    /// Fields not modelled here.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One page of a paginated collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page.
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    /// Total number of pages; `0` when the backend omits it.
    #[serde(default, deserialize_with = "nullable")]
    pub total_pages: u32,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            content: Vec::new(),
            total_pages: 0,
        }
    }
}
