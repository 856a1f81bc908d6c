//! Request types for backend API calls.
//!
//! `ApiRequest` is the method-agnostic description of one call. The payload
//! structs are the bodies forwarded by form submissions; optional fields
//! serialize as `null` so the backend sees the same shape a browser form
//! would have produced.

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

/// A single call to the backend API.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the configured base URL, e.g. `/api/rides`.
    pub path: String,
    /// Query parameters, in the order they were added.
    pub query: Vec<(String, String)>,
    /// JSON body.
    pub body: Option<Value>,
    /// Bearer credential. `None` omits the `Authorization` header.
    pub token: Option<String>,
}

impl ApiRequest {
    /// Create a request with the given method and path.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            token: None,
        }
    }

    /// Create a `GET` request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Create a `POST` request.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Create a `PUT` request.
    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// Create a `DELETE` request.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append a query parameter.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Append several query parameters.
    #[must_use]
    pub fn query_pairs(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    /// Attach a JSON body.
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach a bearer credential. Empty tokens are ignored.
    #[must_use]
    pub fn bearer(mut self, token: Option<&str>) -> Self {
        self.token = token.filter(|t| !t.is_empty()).map(str::to_string);
        self
    }

    /// Look up the first query parameter with the given key.
    #[must_use]
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Build a path from a prefix and one percent-encoded segment.
#[must_use]
pub fn resource_path(prefix: &str, id: &str) -> String {
    format!("{prefix}/{}", urlencoding::encode(id))
}

/// Server-side filters and pagination for `GET /api/rides`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RideQuery {
    /// Page size.
    pub page_size: Option<u32>,
    /// 1-based page number.
    pub page_number: Option<u32>,
    /// Ride status filter.
    pub status: Option<String>,
    /// Maximum price per seat, forwarded verbatim.
    pub max_price: Option<String>,
}

impl RideQuery {
    /// A query that only sets the page size, as used by the "my rides" views.
    #[must_use]
    pub fn page_size(page_size: u32) -> Self {
        Self {
            page_size: Some(page_size),
            ..Self::default()
        }
    }

    /// Query parameters in wire order: `pageSize`, `pageNumber`, `status`, `maxPrice`.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(size) = self.page_size {
            pairs.push(("pageSize".to_string(), size.to_string()));
        }
        if let Some(number) = self.page_number {
            pairs.push(("pageNumber".to_string(), number.to_string()));
        }
        if let Some(status) = &self.status {
            pairs.push(("status".to_string(), status.clone()));
        }
        if let Some(max_price) = &self.max_price {
            pairs.push(("maxPrice".to_string(), max_price.clone()));
        }
        pairs
    }
}

/// Parameters of `PUT /api/service/me/bookride`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRide {
    /// Ride to book.
    pub ride_id: String,
    /// Seats to book.
    pub seats: u32,
    /// Pickup location, required.
    pub pickup_location: String,
    /// Note to the driver.
    pub message: Option<String>,
    /// Promo code for a discount.
    pub promo_code: Option<String>,
}

impl BookRide {
    /// Query parameters; empty optional values are left out.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("rideId".to_string(), self.ride_id.clone()),
            ("seats".to_string(), self.seats.to_string()),
            ("pickupLocation".to_string(), self.pickup_location.clone()),
        ];
        if let Some(message) = self.message.as_ref().filter(|m| !m.is_empty()) {
            pairs.push(("message".to_string(), message.clone()));
        }
        if let Some(code) = self.promo_code.as_ref().filter(|c| !c.is_empty()) {
            pairs.push(("promoCode".to_string(), code.clone()));
        }
        pairs
    }
}

/// Body of `POST /api/rides`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRide {
    /// Driver email, taken from the session.
    pub driver_id: String,
    /// Vehicle used for the ride.
    pub vehicle_id: Option<String>,
    /// Departure location.
    pub start_location: Option<String>,
    /// Destination.
    pub end_location: Option<String>,
    /// Departure timestamp.
    pub departure_time: Option<String>,
    /// Expected duration; omitted by forms that do not ask for it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<i64>,
    /// Price per seat.
    pub price_per_seat: Option<f64>,
    /// Seats offered.
    pub seats_total: Option<i64>,
    /// Free-text description.
    pub description: Option<String>,
    /// Accepted detour; omitted by forms that do not ask for it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_radius_km: Option<f64>,
}

/// Body of `PUT /api/rides/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RideUpdate {
    /// New departure timestamp.
    pub departure_time: Option<String>,
    /// New price per seat.
    pub price_per_seat: Option<f64>,
    /// New description.
    pub description: String,
    /// New accepted detour.
    pub route_radius_km: f64,
}

/// Body of `POST /api/vehicles`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVehicle {
    /// Owner email, taken from the session.
    pub owner_id: String,
    /// Manufacturer.
    pub make: Option<String>,
    /// Model name.
    pub model: Option<String>,
    /// Model year.
    pub year: Option<i64>,
    /// Paint colour.
    pub color: Option<String>,
    /// Number of seats.
    pub seats: Option<i64>,
    /// Hashed licence plate.
    pub plate_hash: Option<String>,
}

/// Body of `POST /api/reviews`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    /// Reviewed ride.
    pub ride_id: String,
    /// Stars.
    pub rating: Option<i64>,
    /// Comment text.
    pub comment: String,
}

/// Body of `PUT /api/reviews/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewUpdate {
    /// Stars.
    pub rating: Option<i64>,
    /// Comment text.
    pub comment: String,
}

/// Body of `PUT /api/users/me/profile`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Profile image URL or data.
    pub profile_image: Option<String>,
    /// Phone number.
    pub phone_number: Option<String>,
}

/// Body of `PUT /api/users/me/verification`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRequest {
    /// Front of the driving licence.
    pub license_image_front: Option<String>,
    /// Back of the driving licence.
    pub license_image_back: Option<String>,
}

/// Body of `POST /api/job`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    /// Title.
    pub title: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Offered earnings.
    pub earnings: Option<f64>,
    /// Job type.
    pub job_type: Option<String>,
    /// Owning company.
    pub company_id: Option<String>,
}
