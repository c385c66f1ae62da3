//! Offered slots annotated with their booked state, per day and per week.
//!
//! This is what a booking view renders: every offered start time, with the
//! ones that collide with a reservation flagged (shown disabled, not hidden).

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::conflict::{slot_is_booked, ReservedInterval};
use crate::error::Result;
use crate::rules::AvailabilityRule;
use crate::slots::{compute_available_slots, Slot, SlotQuery};

/// An offered slot and whether a reservation already occupies it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotStatus {
    pub slot: Slot,
    pub booked: bool,
}

/// All offered slots on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayBoard {
    pub date: NaiveDate,
    pub slots: Vec<SlotStatus>,
}

impl DayBoard {
    /// Number of slots that can still be booked.
    pub fn open_count(&self) -> usize {
        self.slots.iter().filter(|s| !s.booked).count()
    }
}

/// Seven consecutive day boards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekBoard {
    pub week_start: NaiveDate,
    pub days: Vec<DayBoard>,
}

/// Which weekday a calendar week begins on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

/// First day of the week that contains `date`.
pub fn week_start_for(date: NaiveDate, week_start: WeekStart) -> NaiveDate {
    let offset = match week_start {
        WeekStart::Sunday => date.weekday().num_days_from_sunday(),
        WeekStart::Monday => date.weekday().num_days_from_monday(),
    };
    date - Duration::days(i64::from(offset))
}

/// Offered slots for `query`, each flagged with its booked state.
pub fn slot_board(
    rules: &[AvailabilityRule],
    reserved: &[ReservedInterval],
    query: &SlotQuery,
) -> Result<Vec<SlotStatus>> {
    let slots = compute_available_slots(rules, query)?;
    Ok(slots
        .into_iter()
        .map(|slot| SlotStatus {
            booked: slot_is_booked(reserved, query.date, &slot),
            slot,
        })
        .collect())
}

/// Offered slots for `query` that no reservation occupies.
pub fn bookable_slots(
    rules: &[AvailabilityRule],
    reserved: &[ReservedInterval],
    query: &SlotQuery,
) -> Result<Vec<Slot>> {
    Ok(slot_board(rules, reserved, query)?
        .into_iter()
        .filter(|s| !s.booked)
        .map(|s| s.slot)
        .collect())
}

/// Day boards for the seven days starting at `week_start`.
///
/// Dates before `now`'s date are listed with no slots.
pub fn week_board(
    rules: &[AvailabilityRule],
    reserved: &[ReservedInterval],
    week_start: NaiveDate,
    duration_minutes: u32,
    now: NaiveDateTime,
    step_minutes: u32,
) -> Result<WeekBoard> {
    let days = (0..7)
        .map(|offset| {
            let date = week_start + Duration::days(offset);
            let query = SlotQuery::new(date, duration_minutes, now).with_step(step_minutes);
            let slots = if date < now.date() {
                query.validate()?;
                Vec::new()
            } else {
                slot_board(rules, reserved, &query)?
            };
            Ok(DayBoard { date, slots })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(
        %week_start,
        open = days.iter().map(DayBoard::open_count).sum::<usize>(),
        "built week board"
    );
    Ok(WeekBoard { week_start, days })
}
