//! # slot-engine
//!
//! Bookable lesson slots from a mentor's weekly availability.
//!
//! Given recurring weekly availability windows, a date, a lesson duration and
//! the caller's "now", the engine lists the start times a student may book,
//! and checks candidate lessons against reservations already on the calendar.
//! Everything is a pure function of its arguments: no I/O, no clock reads,
//! no hidden state.
//!
//! ## Modules
//!
//! - [`time`] — `TimeOfDay` (minutes since midnight) and timezone helpers
//! - [`rules`] — Recurring weekly availability rules
//! - [`slots`] — Rules + date + duration → sorted, deduplicated start times
//! - [`conflict`] — Overlap checks against reserved intervals
//! - [`board`] — Slots flagged as booked, per day and per week
//! - [`cache`] — Session memo invalidated when snapshots change
//! - [`error`] — Error types

pub mod board;
pub mod cache;
pub mod conflict;
pub mod error;
pub mod rules;
pub mod slots;
pub mod time;

pub use board::{
    bookable_slots, slot_board, week_board, week_start_for, DayBoard, SlotStatus, WeekBoard,
    WeekStart,
};
pub use cache::SlotCache;
pub use conflict::{is_slot_booked, slot_is_booked, try_is_slot_booked, ReservedInterval};
pub use error::SlotError;
pub use rules::AvailabilityRule;
pub use slots::{compute_available_slots, Slot, SlotQuery, DEFAULT_STEP_MINUTES};
pub use time::TimeOfDay;
