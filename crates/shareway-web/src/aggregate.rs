//! Shared pieces of the page aggregators.
//!
//! A page is built from hard calls (failure aborts the page), soft calls
//! (failure degrades one field to its default) and atomic batches (one
//! failure degrades every field of the batch). Hard calls are handled at the
//! call site; this module covers the other two.

use std::future::Future;

use shareway_backend::GatewayError;
use shareway_core::join::{filter_by_key, filter_by_keys, key_set};
use shareway_core::{Booking, Page, Ride};

/// Page size used when a page needs "all" rides to join against.
pub const ALL_RIDES_PAGE_SIZE: u32 = 100;

/// Await a supplementary lookup, substituting the default on failure.
pub async fn soft<T, F>(view: &'static str, resource: &'static str, call: F) -> T
where
    T: Default,
    F: Future<Output = shareway_backend::Result<T>>,
{
    match call.await {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(
                view,
                resource,
                status = ?e.status(),
                error = %e,
                "Lookup failed, rendering without it"
            );
            T::default()
        }
    }
}

/// Log the failure of an atomic batch.
///
/// Callers fall back to empty defaults for every member of the batch.
pub fn batch_failed(view: &'static str, err: &GatewayError) {
    tracing::warn!(
        view,
        status = ?err.status(),
        error = %err,
        "Batch lookup failed, rendering empty page"
    );
}

/// The rides on a page driven by `email`.
#[must_use]
pub fn owned_rides(page: Page<Ride>, email: &str) -> Vec<Ride> {
    filter_by_key(page.content, email, |r| r.driver_id.as_str())
}

/// The bookings made on any of `rides`.
#[must_use]
pub fn bookings_on(bookings: Vec<Booking>, rides: &[Ride]) -> Vec<Booking> {
    let ride_ids = key_set(rides, |r| r.id.as_str());
    filter_by_keys(bookings, &ride_ids, |b| b.ride_id.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bookings_follow_owned_rides() {
        let ride = |id: &str, driver: &str| Ride {
            id: id.into(),
            driver_id: driver.into(),
            ..Ride::default()
        };
        let page = Page {
            content: vec![ride("r1", "me@x.com"), ride("r2", "other@x.com")],
            total_pages: 1,
        };

        let mine = owned_rides(page, "me@x.com");
        assert_eq!(mine.len(), 1);

        let bookings = ["r1", "r2", "r1"]
            .into_iter()
            .map(|r| Booking {
                ride_id: r.into(),
                ..Booking::default()
            })
            .collect();
        assert_eq!(bookings_on(bookings, &mine).len(), 2);
    }

    #[tokio::test]
    async fn soft_degrades_to_default() {
        let failed: Vec<u8> = soft("test", "things", async {
            Err(GatewayError::Transport("down".into()))
        })
        .await;
        assert!(failed.is_empty());

        let ok: Vec<u8> = soft("test", "things", async { Ok(vec![1, 2]) }).await;
        assert_eq!(ok, vec![1, 2]);
    }
}
