//! Natural-key joins over bulk-fetched collections.
//!
//! The backend offers no server-side joins, so pages fetch whole collections and
//! match them here. Keys are compared with exact string equality: no case
//! folding, no trimming. A key with no match yields `None` or an empty
//! collection, never an error.

use std::collections::HashSet;

/// Find the first item whose key equals `key`.
pub fn find_by_key<'a, T, F>(items: &'a [T], key: &str, field: F) -> Option<&'a T>
where
    F: Fn(&T) -> &str,
{
    items.iter().find(|item| field(item) == key)
}

/// Keep the items whose key equals `key`.
///
/// This is the "mine" filter: `filter_by_key(vehicles, email, |v| v.owner_id.as_str())`.
pub fn filter_by_key<T, F>(items: Vec<T>, key: &str, field: F) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    items.into_iter().filter(|item| field(item) == key).collect()
}

/// Keep the items whose key is one of `keys`.
pub fn filter_by_keys<T, F>(items: Vec<T>, keys: &HashSet<&str>, field: F) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    items
        .into_iter()
        .filter(|item| keys.contains(field(item)))
        .collect()
}

/// Collect the keys of a collection into a set for use with [`filter_by_keys`].
pub fn key_set<T, F>(items: &[T], field: F) -> HashSet<&str>
where
    F: Fn(&T) -> &str,
{
    items.iter().map(field).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Booking, Ride, Vehicle};

    fn vehicle(owner: &str) -> Vehicle {
        Vehicle {
            owner_id: owner.to_string(),
            ..Vehicle::default()
        }
    }

    #[test]
    fn filter_is_case_sensitive() {
        let vehicles = vec![vehicle("a@x.com"), vehicle("b@x.com")];

        let mine = filter_by_key(vehicles.clone(), "A@x.com", |v| v.owner_id.as_str());
        assert!(mine.is_empty());

        let mine = filter_by_key(vehicles, "a@x.com", |v| v.owner_id.as_str());
        assert_eq!(mine.len(), 1);
    }

    #[test]
    fn find_missing_key_is_none() {
        let vehicles = vec![vehicle("a@x.com")];
        assert!(find_by_key(&vehicles, "nobody@x.com", |v| v.owner_id.as_str()).is_none());
        assert!(find_by_key(&vehicles, "a@x.com", |v| v.owner_id.as_str()).is_some());
    }

    #[test]
    fn bookings_for_my_rides() {
        let rides = vec![
            Ride {
                id: "r1".into(),
                ..Ride::default()
            },
            Ride {
                id: "r2".into(),
                ..Ride::default()
            },
        ];
        let bookings = vec![
            Booking {
                id: "b1".into(),
                ride_id: "r1".into(),
                ..Booking::default()
            },
            Booking {
                id: "b2".into(),
                ride_id: "r3".into(),
                ..Booking::default()
            },
        ];

        let ids = key_set(&rides, |r| r.id.as_str());
        let mine = filter_by_keys(bookings, &ids, |b| b.ride_id.as_str());
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, "b1");
    }
}
