//! HTTP request handlers.
//!
//! One module per page. Each page module holds the view aggregator for its
//! `GET` route and the action dispatchers for the forms it renders.

pub mod account;
pub mod admin;
pub mod bookings;
pub mod driver;
pub mod health;
pub mod identity;
pub mod jobs;
pub mod ride_create;
pub mod ride_detail;
pub mod ride_requests;
pub mod rides;
pub mod vehicles;
