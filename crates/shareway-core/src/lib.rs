//! Core types and utilities for the shareway web front end.
//!
//! This crate provides the request-scoped projections of resources owned by the
//! backend API:
//!
//! - **Resources**: rides, bookings, vehicles, directory users, reviews and
//!   flagged content, plus the paginated `Page<T>` envelope
//! - **Joins**: natural-key matching helpers used to stitch bulk-fetched
//!   collections together in memory
//!
//! Nothing here is persisted. Every value lives for one request.
//!
//! # Example
//!
//! ```
//! use shareway_core::{join, Vehicle};
//!
//! let vehicles = vec![
//!     Vehicle { owner_id: "a@x.com".into(), ..Vehicle::default() },
//!     Vehicle { owner_id: "b@x.com".into(), ..Vehicle::default() },
//! ];
//!
//! let mine = join::filter_by_key(vehicles, "a@x.com", |v| v.owner_id.as_str());
//! assert_eq!(mine.len(), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod join;
pub mod models;

pub use models::{
    Booking, BookingStatus, Company, DirectoryUser, FlaggedContent, Job, Page, Review, Ride,
    RideStatus, Vehicle,
};
