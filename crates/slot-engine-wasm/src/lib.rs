//! WASM bindings for slot-engine.
//!
//! Exposes slot computation, booked checks and the week board to JavaScript
//! via `wasm-bindgen`. Rules and reservations are passed as JSON strings;
//! timestamps may be RFC 3339 (converted into `timezone`) or naive local
//! ISO 8601.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slot-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir pkg/ \
//!   target/wasm32-unknown-unknown/release/slot_engine_wasm.wasm
//! ```

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use slot_engine::time::{parse_date, parse_local_datetime, parse_timezone};
use slot_engine::{
    AvailabilityRule, DayBoard, ReservedInterval, SlotError, SlotQuery, SlotStatus, TimeOfDay,
    WeekStart, DEFAULT_STEP_MINUTES,
};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

/// Input format for reservations passed from JavaScript.
#[derive(Deserialize)]
struct ReservationInput {
    start: String,
    end: String,
}

#[derive(Serialize)]
struct SlotStatusDto {
    start: String,
    end: String,
    booked: bool,
}

impl From<&SlotStatus> for SlotStatusDto {
    fn from(s: &SlotStatus) -> Self {
        Self {
            start: s.slot.start.to_string(),
            end: s
                .slot
                .end()
                .map(|t| t.to_string())
                .unwrap_or_else(|| TimeOfDay::END_OF_DAY.to_string()),
            booked: s.booked,
        }
    }
}

#[derive(Serialize)]
struct DayBoardDto {
    date: String,
    slots: Vec<SlotStatusDto>,
}

impl From<&DayBoard> for DayBoardDto {
    fn from(d: &DayBoard) -> Self {
        Self {
            date: d.date.format("%Y-%m-%d").to_string(),
            slots: d.slots.iter().map(SlotStatusDto::from).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_rules_json(json: &str) -> Result<Vec<AvailabilityRule>, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid rules JSON: {}", e))
}

/// Convert a JSON array of `{start, end}` objects into reservations on the
/// wall clock of `tz`.
fn parse_reserved_json(json: &str, tz: Tz) -> Result<Vec<ReservedInterval>, String> {
    let inputs: Vec<ReservationInput> =
        serde_json::from_str(json).map_err(|e| format!("Invalid reservations JSON: {}", e))?;

    inputs
        .into_iter()
        .map(|input| {
            let start = parse_local_datetime(&input.start, tz).map_err(|e| e.to_string())?;
            let end = parse_local_datetime(&input.end, tz).map_err(|e| e.to_string())?;
            Ok(ReservedInterval::new(start, end))
        })
        .collect()
}

fn build_query(
    date: &str,
    duration_minutes: f64,
    now: &str,
    tz: Tz,
    step_minutes: Option<f64>,
) -> Result<SlotQuery, String> {
    let duration_minutes = whole_minutes(duration_minutes, "duration_minutes")?;
    let step_minutes = step_or_default(step_minutes)?;
    let date = parse_date(date).map_err(|e| e.to_string())?;
    let now = parse_local_datetime(now, tz).map_err(|e| e.to_string())?;
    Ok(SlotQuery::new(date, duration_minutes, now).with_step(step_minutes))
}

/// Convert a JS number into a positive whole count of minutes.
///
/// JS numbers may be negative, fractional or NaN; anything but a positive
/// integer that fits a `u32` is rejected rather than wrapped or truncated.
fn whole_minutes(value: f64, name: &str) -> Result<u32, String> {
    if !value.is_finite() || value.fract() != 0.0 || value < 1.0 || value > f64::from(u32::MAX) {
        return Err(SlotError::InvalidArgument(format!(
            "{} must be a positive whole number of minutes, got {}",
            name, value
        ))
        .to_string());
    }
    Ok(value as u32)
}

fn step_or_default(step_minutes: Option<f64>) -> Result<u32, String> {
    step_minutes.map_or(Ok(DEFAULT_STEP_MINUTES), |step| {
        whole_minutes(step, "step_minutes")
    })
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

// ---------------------------------------------------------------------------
// Plain-Rust entry points (testable off-wasm)
// ---------------------------------------------------------------------------

fn available_slots_json(
    rules_json: &str,
    date: &str,
    duration_minutes: f64,
    now: &str,
    timezone: &str,
    step_minutes: Option<f64>,
) -> Result<String, String> {
    let tz = parse_timezone(timezone).map_err(|e| e.to_string())?;
    let rules = parse_rules_json(rules_json)?;
    let query = build_query(date, duration_minutes, now, tz, step_minutes)?;

    let slots = slot_engine::compute_available_slots(&rules, &query).map_err(|e| e.to_string())?;
    let starts: Vec<String> = slots.iter().map(|s| s.start.to_string()).collect();
    to_json(&starts)
}

fn slot_booked(
    reserved_json: &str,
    date: &str,
    start: &str,
    duration_minutes: f64,
    timezone: &str,
) -> Result<bool, String> {
    let tz = parse_timezone(timezone).map_err(|e| e.to_string())?;
    let reserved = parse_reserved_json(reserved_json, tz)?;
    let date = parse_date(date).map_err(|e| e.to_string())?;
    let start: TimeOfDay = start.parse().map_err(|e: SlotError| e.to_string())?;
    let duration_minutes = whole_minutes(duration_minutes, "duration_minutes")?;

    slot_engine::try_is_slot_booked(&reserved, date, start, duration_minutes)
        .map_err(|e| e.to_string())
}

fn slot_board_json(
    rules_json: &str,
    reserved_json: &str,
    date: &str,
    duration_minutes: f64,
    now: &str,
    timezone: &str,
    step_minutes: Option<f64>,
) -> Result<String, String> {
    let tz = parse_timezone(timezone).map_err(|e| e.to_string())?;
    let rules = parse_rules_json(rules_json)?;
    let reserved = parse_reserved_json(reserved_json, tz)?;
    let query = build_query(date, duration_minutes, now, tz, step_minutes)?;

    let board = slot_engine::slot_board(&rules, &reserved, &query).map_err(|e| e.to_string())?;
    let dtos: Vec<SlotStatusDto> = board.iter().map(SlotStatusDto::from).collect();
    to_json(&dtos)
}

#[allow(clippy::too_many_arguments)]
fn week_board_json(
    rules_json: &str,
    reserved_json: &str,
    week_of: &str,
    duration_minutes: f64,
    now: &str,
    timezone: &str,
    step_minutes: Option<f64>,
    monday_start: bool,
) -> Result<String, String> {
    let tz = parse_timezone(timezone).map_err(|e| e.to_string())?;
    let rules = parse_rules_json(rules_json)?;
    let reserved = parse_reserved_json(reserved_json, tz)?;
    let week_of = parse_date(week_of).map_err(|e| e.to_string())?;
    let now = parse_local_datetime(now, tz).map_err(|e| e.to_string())?;
    let duration_minutes = whole_minutes(duration_minutes, "duration_minutes")?;
    let step_minutes = step_or_default(step_minutes)?;

    let week_start = if monday_start {
        WeekStart::Monday
    } else {
        WeekStart::Sunday
    };
    let board = slot_engine::week_board(
        &rules,
        &reserved,
        slot_engine::week_start_for(week_of, week_start),
        duration_minutes,
        now,
        step_minutes,
    )
    .map_err(|e| e.to_string())?;

    let dtos: Vec<DayBoardDto> = board.days.iter().map(DayBoardDto::from).collect();
    to_json(&dtos)
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Compute the bookable start times on `date`.
///
/// Returns a JSON array of `"HH:MM"` strings, ascending.
///
/// # Arguments
/// - `rules_json` -- JSON array of `{day_of_week, start_time, end_time, enabled}`
/// - `date` -- Calendar date being browsed (`YYYY-MM-DD`)
/// - `duration_minutes` -- Lesson length; must be a positive whole number
/// - `now` -- Current instant (RFC 3339) or local time
/// - `timezone` -- IANA timezone of the mentor's calendar
/// - `step_minutes` -- Optional start-time spacing (defaults to 30)
#[wasm_bindgen(js_name = "computeAvailableSlots")]
pub fn compute_available_slots(
    rules_json: &str,
    date: &str,
    duration_minutes: f64,
    now: &str,
    timezone: &str,
    step_minutes: Option<f64>,
) -> Result<String, JsValue> {
    available_slots_json(rules_json, date, duration_minutes, now, timezone, step_minutes)
        .map_err(|e| JsValue::from_str(&e))
}

/// Whether a lesson starting at `start` on `date` collides with a reservation.
///
/// `reserved_json` is a JSON array of `{start, end}` objects.
#[wasm_bindgen(js_name = "isSlotBooked")]
pub fn is_slot_booked(
    reserved_json: &str,
    date: &str,
    start: &str,
    duration_minutes: f64,
    timezone: &str,
) -> Result<bool, JsValue> {
    slot_booked(reserved_json, date, start, duration_minutes, timezone)
        .map_err(|e| JsValue::from_str(&e))
}

/// Offered slots on `date` with their booked flag.
///
/// Returns a JSON array of `{start, end, booked}` objects.
#[wasm_bindgen(js_name = "slotBoard")]
pub fn slot_board(
    rules_json: &str,
    reserved_json: &str,
    date: &str,
    duration_minutes: f64,
    now: &str,
    timezone: &str,
    step_minutes: Option<f64>,
) -> Result<String, JsValue> {
    slot_board_json(
        rules_json,
        reserved_json,
        date,
        duration_minutes,
        now,
        timezone,
        step_minutes,
    )
    .map_err(|e| JsValue::from_str(&e))
}

/// Seven day boards for the calendar week containing `week_of`.
///
/// Returns a JSON array of `{date, slots: [{start, end, booked}]}` objects.
#[wasm_bindgen(js_name = "weekBoard")]
#[allow(clippy::too_many_arguments)]
pub fn week_board(
    rules_json: &str,
    reserved_json: &str,
    week_of: &str,
    duration_minutes: f64,
    now: &str,
    timezone: &str,
    step_minutes: Option<f64>,
    monday_start: bool,
) -> Result<String, JsValue> {
    week_board_json(
        rules_json,
        reserved_json,
        week_of,
        duration_minutes,
        now,
        timezone,
        step_minutes,
        monday_start,
    )
    .map_err(|e| JsValue::from_str(&e))
}
