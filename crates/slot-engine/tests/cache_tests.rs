//! Tests for the per-session slot board cache.

use chrono::{NaiveDate, NaiveDateTime};
use slot_engine::{AvailabilityRule, ReservedInterval, SlotCache, SlotError, SlotQuery};

fn rule(day: u8, start: &str, end: &str) -> AvailabilityRule {
    AvailabilityRule::new(day, start.parse().unwrap(), end.parse().unwrap())
}

fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 16).unwrap()
}

fn booked_flags(cache: &mut SlotCache, query: &SlotQuery) -> Vec<bool> {
    cache
        .board(query)
        .unwrap()
        .iter()
        .map(|s| s.booked)
        .collect()
}

#[test]
fn repeated_query_is_memoised() {
    let mut cache = SlotCache::new(vec![rule(1, "09:00", "10:00")], vec![]);
    let query = SlotQuery::new(monday(), 25, at(1, 8, 0));

    assert!(cache.is_empty());
    let first = cache.board(&query).unwrap().to_vec();
    let second = cache.board(&query).unwrap().to_vec();

    assert_eq!(first, second);
    assert_eq!(cache.len(), 1);
}

#[test]
fn durations_are_cached_separately() {
    let mut cache = SlotCache::new(vec![rule(1, "09:00", "10:00")], vec![]);

    assert_eq!(cache.board(&SlotQuery::new(monday(), 25, at(1, 8, 0))).unwrap().len(), 2);
    assert_eq!(cache.board(&SlotQuery::new(monday(), 50, at(1, 8, 0))).unwrap().len(), 1);
    assert_eq!(cache.len(), 2);
}

#[test]
fn new_reservations_invalidate_boards() {
    let mut cache = SlotCache::new(vec![rule(1, "09:00", "10:00")], vec![]);
    let query = SlotQuery::new(monday(), 25, at(1, 8, 0));

    assert_eq!(booked_flags(&mut cache, &query), vec![false, false]);

    let taken = vec![ReservedInterval::new(at(16, 9, 30), at(16, 10, 0))];
    cache.replace_reservations(taken.clone());
    assert!(cache.is_empty());
    assert_eq!(cache.reserved(), taken.as_slice());
    assert_eq!(booked_flags(&mut cache, &query), vec![false, true]);
}

#[test]
fn new_rules_invalidate_boards() {
    let mut cache = SlotCache::new(vec![rule(1, "09:00", "10:00")], vec![]);
    let query = SlotQuery::new(monday(), 25, at(1, 8, 0));
    assert_eq!(cache.board(&query).unwrap().len(), 2);

    cache.replace_rules(vec![rule(1, "09:00", "12:00")]);
    assert_eq!(cache.rules().len(), 1);
    assert_eq!(cache.board(&query).unwrap().len(), 6);
}

#[test]
fn todays_board_follows_the_clock() {
    let mut cache = SlotCache::new(vec![rule(1, "09:00", "12:00")], vec![]);

    let early = SlotQuery::new(monday(), 25, at(16, 8, 0));
    assert_eq!(cache.board(&early).unwrap().len(), 6);

    let later = SlotQuery::new(monday(), 25, at(16, 10, 5));
    assert_eq!(cache.board(&later).unwrap().len(), 3);
    assert_eq!(cache.len(), 1);
}

#[test]
fn errors_are_not_cached() {
    let mut cache = SlotCache::new(vec![rule(1, "09:00", "10:00")], vec![]);
    let query = SlotQuery::new(monday(), 0, at(1, 8, 0));

    assert!(matches!(cache.board(&query), Err(SlotError::InvalidArgument(_))));
    assert!(cache.is_empty());
}
