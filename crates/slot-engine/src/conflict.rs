//! Detect reservations that collide with a candidate slot.
//!
//! Intervals are half-open. A candidate overlaps a reservation when
//! `candidate.start < reserved.end && candidate.end > reserved.start`, so
//! back-to-back lessons (one ends exactly when the next starts) are NOT
//! conflicts.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};
use crate::slots::Slot;
use crate::time::TimeOfDay;

/// A time range already taken on the mentor's calendar.
///
/// Both bounds are wall-clock times in the mentor's calendar. The caller is
/// expected to have removed the viewer's own pending bookings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservedInterval {
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}

impl ReservedInterval {
    pub fn new(start_time: NaiveDateTime, end_time: NaiveDateTime) -> Self {
        Self {
            start_time,
            end_time,
        }
    }

    /// Whether `[start, end)` overlaps this reservation.
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        start < self.end_time && end > self.start_time
    }
}

/// Whether a lesson of `duration_minutes` starting at `start` on `date`
/// collides with any reservation.
///
/// An empty reservation list answers `false` without further work.
pub fn is_slot_booked(
    reserved: &[ReservedInterval],
    date: NaiveDate,
    start: TimeOfDay,
    duration_minutes: u32,
) -> bool {
    if reserved.is_empty() {
        return false;
    }
    let candidate_start = start.on(date);
    let candidate_end = candidate_start + Duration::minutes(i64::from(duration_minutes));
    reserved
        .iter()
        .any(|r| r.overlaps(candidate_start, candidate_end))
}

/// [`is_slot_booked`] with the duration checked first.
///
/// # Errors
/// Returns [`SlotError::InvalidArgument`] if `duration_minutes` is zero.
pub fn try_is_slot_booked(
    reserved: &[ReservedInterval],
    date: NaiveDate,
    start: TimeOfDay,
    duration_minutes: u32,
) -> Result<bool> {
    if duration_minutes == 0 {
        return Err(SlotError::InvalidArgument(
            "duration_minutes must be positive".to_string(),
        ));
    }
    Ok(is_slot_booked(reserved, date, start, duration_minutes))
}

/// Whether an offered slot on `date` collides with any reservation.
pub fn slot_is_booked(reserved: &[ReservedInterval], date: NaiveDate, slot: &Slot) -> bool {
    is_slot_booked(reserved, date, slot.start, slot.duration_minutes)
}
