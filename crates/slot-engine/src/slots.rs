//! Candidate lesson start times from weekly availability rules.
//!
//! Each enabled rule for the queried weekday is walked from its own start
//! time in steps of `step_minutes`. A start is offered when the whole lesson
//! fits before the window closes and, for today, when it lies strictly after
//! the current minute. Starts from all rules are unioned, deduplicated and
//! sorted. Overlapping rules are not merged into a single window first, so
//! each rule keeps its own step alignment.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{Result, SlotError};
use crate::rules::{rules_for_date, AvailabilityRule};
use crate::time::TimeOfDay;

/// Step between candidate start times when the caller does not choose one.
pub const DEFAULT_STEP_MINUTES: u32 = 30;

/// One availability lookup: which day, how long a lesson, and when "now" is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotQuery {
    /// The local calendar date being browsed.
    pub date: NaiveDate,
    /// Requested lesson length. Must be positive.
    pub duration_minutes: u32,
    /// The caller's current wall-clock time, used only for the today cutoff.
    pub now: NaiveDateTime,
    /// Spacing of candidate start times within a rule. Must be positive.
    #[serde(default = "default_step")]
    pub step_minutes: u32,
}

fn default_step() -> u32 {
    DEFAULT_STEP_MINUTES
}

impl SlotQuery {
    pub fn new(date: NaiveDate, duration_minutes: u32, now: NaiveDateTime) -> Self {
        Self {
            date,
            duration_minutes,
            now,
            step_minutes: DEFAULT_STEP_MINUTES,
        }
    }

    pub fn with_step(mut self, step_minutes: u32) -> Self {
        self.step_minutes = step_minutes;
        self
    }

    /// Whether the queried date is the calendar date of `now`.
    pub fn is_today(&self) -> bool {
        self.date == self.now.date()
    }

    /// Minutes since midnight that a slot on this date must start after, if any.
    pub fn cutoff(&self) -> Option<u32> {
        self.is_today()
            .then(|| u32::from(TimeOfDay::of(self.now).minutes()))
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.duration_minutes == 0 {
            return Err(SlotError::InvalidArgument(
                "duration_minutes must be positive".to_string(),
            ));
        }
        if self.step_minutes == 0 {
            return Err(SlotError::InvalidArgument(
                "step_minutes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// A bookable lesson start on the queried date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub start: TimeOfDay,
    pub duration_minutes: u32,
}

impl Slot {
    /// Minutes since midnight at which the lesson ends.
    pub fn end_minutes(&self) -> u32 {
        u32::from(self.start.minutes()) + self.duration_minutes
    }

    /// End as a time of day. Offered slots always end by `24:00`.
    pub fn end(&self) -> Option<TimeOfDay> {
        u16::try_from(self.end_minutes())
            .ok()
            .and_then(|m| TimeOfDay::from_minutes(m).ok())
    }

    /// Absolute `[start, end)` bounds of this slot on `date`.
    pub fn interval_on(&self, date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
        let start = self.start.on(date);
        (
            start,
            start + chrono::Duration::minutes(i64::from(self.duration_minutes)),
        )
    }
}

/// Compute the bookable start times for `query` from a mentor's weekly rules.
///
/// # Errors
/// Returns [`SlotError::InvalidArgument`] if the duration or step is zero.
/// Malformed rules are skipped, never reported.
pub fn compute_available_slots(rules: &[AvailabilityRule], query: &SlotQuery) -> Result<Vec<Slot>> {
    query.validate()?;

    let matching = rules_for_date(rules, query.date);
    if matching.is_empty() {
        debug!(date = %query.date, "no enabled availability rules for weekday");
        return Ok(Vec::new());
    }

    let cutoff = query.cutoff();
    let duration = query.duration_minutes;
    let step = query.step_minutes;

    let mut starts = BTreeSet::new();
    for rule in matching {
        let window_start = u32::from(rule.start_time.minutes());
        let window_end = u32::from(rule.end_time.minutes());

        let mut m = window_start;
        while m.checked_add(duration).is_some_and(|end| end <= window_end) {
            if cutoff.map_or(true, |c| m > c) {
                starts.insert(m);
            }
            m = match m.checked_add(step) {
                Some(next) => next,
                None => break,
            };
        }
        trace!(
            start = %rule.start_time,
            end = %rule.end_time,
            candidates = starts.len(),
            "walked availability rule"
        );
    }

    let slots: Vec<Slot> = starts
        .into_iter()
        .filter_map(|m| u16::try_from(m).ok())
        .filter_map(|m| TimeOfDay::from_minutes(m).ok())
        .map(|start| Slot {
            start,
            duration_minutes: duration,
        })
        .collect();

    debug!(
        date = %query.date,
        duration,
        step,
        cutoff = ?cutoff,
        slots = slots.len(),
        "computed available slots"
    );
    Ok(slots)
}
