//! Recurring weekly availability rules.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};
use crate::time::TimeOfDay;

/// A recurring weekly window during which a mentor accepts lessons.
///
/// The window is half-open: `[start_time, end_time)`. Rules whose start is
/// not before their end are tolerated and simply offer nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityRule {
    /// 0 = Sunday through 6 = Saturday.
    pub day_of_week: u8,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl AvailabilityRule {
    pub fn new(day_of_week: u8, start_time: TimeOfDay, end_time: TimeOfDay) -> Self {
        Self {
            day_of_week,
            start_time,
            end_time,
            enabled: true,
        }
    }

    /// Whether this rule contributes windows on `date`.
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        self.enabled && u32::from(self.day_of_week) == day_of_week(date)
    }

    /// Strict check for the settings surface.
    ///
    /// Slot computation never calls this; it skips bad rules instead.
    ///
    /// # Errors
    /// Returns [`SlotError::InvalidRule`] if the weekday is outside `0..=6` or
    /// the window is empty or inverted.
    pub fn validate(&self) -> Result<()> {
        if self.day_of_week > 6 {
            return Err(SlotError::InvalidRule(format!(
                "day_of_week {} is not in 0..=6",
                self.day_of_week
            )));
        }
        if self.start_time >= self.end_time {
            return Err(SlotError::InvalidRule(format!(
                "window {}-{} does not end after it starts",
                self.start_time, self.end_time
            )));
        }
        Ok(())
    }
}

/// Day of week for `date`, counted from Sunday = 0.
pub fn day_of_week(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_sunday()
}

/// The enabled rules that apply on `date`.
pub fn rules_for_date(rules: &[AvailabilityRule], date: NaiveDate) -> Vec<&AvailabilityRule> {
    rules.iter().filter(|r| r.applies_on(date)).collect()
}
