//! Tests for booked-state boards and the week view.

use chrono::{NaiveDate, NaiveDateTime};
use slot_engine::{
    bookable_slots, slot_board, week_board, week_start_for, AvailabilityRule, ReservedInterval,
    SlotError, SlotQuery, TimeOfDay, WeekStart,
};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn t(s: &str) -> TimeOfDay {
    s.parse().unwrap()
}

fn rule(day: u8, start: &str, end: &str) -> AvailabilityRule {
    AvailabilityRule::new(day, t(start), t(end))
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
}

fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    date(day).and_hms_opt(hour, minute, 0).unwrap()
}

fn taken(day: u32, start: (u32, u32), end: (u32, u32)) -> ReservedInterval {
    ReservedInterval::new(at(day, start.0, start.1), at(day, end.0, end.1))
}

// ── Day board ───────────────────────────────────────────────────────────────

#[test]
fn board_flags_booked_slots_without_hiding_them() {
    let rules = vec![rule(1, "09:00", "11:00")];
    let reserved = vec![taken(16, (9, 30), (10, 0))];
    let query = SlotQuery::new(date(16), 25, at(1, 8, 0));

    let board = slot_board(&rules, &reserved, &query).unwrap();
    let flags: Vec<(String, bool)> = board
        .iter()
        .map(|s| (s.slot.start.to_string(), s.booked))
        .collect();

    assert_eq!(
        flags,
        vec![
            ("09:00".to_string(), false),
            ("09:30".to_string(), true),
            ("10:00".to_string(), false),
            ("10:30".to_string(), false),
        ]
    );
}

#[test]
fn bookable_slots_drop_booked_ones() {
    let rules = vec![rule(1, "09:00", "11:00")];
    let reserved = vec![taken(16, (9, 15), (10, 5))];
    let query = SlotQuery::new(date(16), 25, at(1, 8, 0));

    let open: Vec<String> = bookable_slots(&rules, &reserved, &query)
        .unwrap()
        .iter()
        .map(|s| s.start.to_string())
        .collect();

    assert_eq!(open, vec!["10:30"]);
}

#[test]
fn board_propagates_invalid_duration() {
    let rules = vec![rule(1, "09:00", "11:00")];
    let query = SlotQuery::new(date(16), 0, at(1, 8, 0));

    assert!(matches!(
        slot_board(&rules, &[], &query),
        Err(SlotError::InvalidArgument(_))
    ));
}

// ── Week start ──────────────────────────────────────────────────────────────

#[test]
fn week_start_sunday_and_monday() {
    // 2026-03-18 is a Wednesday.
    assert_eq!(week_start_for(date(18), WeekStart::Sunday), date(15));
    assert_eq!(week_start_for(date(18), WeekStart::Monday), date(16));
    // A Sunday starts its own Sunday week but belongs to the previous Monday week.
    assert_eq!(week_start_for(date(15), WeekStart::Sunday), date(15));
    assert_eq!(week_start_for(date(15), WeekStart::Monday), date(9));
}

// ── Week board ──────────────────────────────────────────────────────────────

#[test]
fn week_board_has_seven_consecutive_days() {
    let rules = vec![rule(1, "09:00", "10:00"), rule(3, "14:00", "15:00")];
    let board = week_board(&rules, &[], date(15), 50, at(1, 8, 0), 30).unwrap();

    assert_eq!(board.week_start, date(15));
    assert_eq!(board.days.len(), 7);
    for (i, day) in board.days.iter().enumerate() {
        assert_eq!(day.date, date(15 + i as u32));
    }

    let counts: Vec<usize> = board.days.iter().map(|d| d.slots.len()).collect();
    assert_eq!(counts, vec![0, 1, 0, 1, 0, 0, 0]);
}

#[test]
fn week_board_marks_reservations_per_day() {
    let rules = vec![rule(1, "09:00", "10:00"), rule(2, "09:00", "10:00")];
    let reserved = vec![taken(17, (9, 0), (9, 25))];
    let board = week_board(&rules, &reserved, date(15), 25, at(1, 8, 0), 30).unwrap();

    let monday = &board.days[1];
    let tuesday = &board.days[2];
    assert_eq!(monday.open_count(), 2);
    assert_eq!(tuesday.open_count(), 1);
    assert!(tuesday.slots[0].booked);
}

#[test]
fn week_board_applies_today_cutoff_and_skips_past_days() {
    let rules: Vec<AvailabilityRule> = (0..7).map(|d| rule(d, "09:00", "12:00")).collect();
    // Now is Tuesday 10:10.
    let board = week_board(&rules, &[], date(15), 25, at(17, 10, 10), 30).unwrap();

    assert!(board.days[0].slots.is_empty(), "Sunday is past");
    assert!(board.days[1].slots.is_empty(), "Monday is past");
    let tuesday: Vec<String> = board.days[2]
        .slots
        .iter()
        .map(|s| s.slot.start.to_string())
        .collect();
    assert_eq!(tuesday, vec!["10:30", "11:00", "11:30"]);
    assert_eq!(board.days[3].slots.len(), 6);
}

#[test]
fn week_board_rejects_zero_duration_even_for_past_days() {
    let rules = vec![rule(1, "09:00", "10:00")];

    assert!(matches!(
        week_board(&rules, &[], date(15), 0, at(30, 8, 0), 30),
        Err(SlotError::InvalidArgument(_))
    ));
}

#[test]
fn board_serializes_for_rendering() {
    let rules = vec![rule(1, "09:00", "09:30")];
    let query = SlotQuery::new(date(16), 25, at(1, 8, 0));
    let board = slot_board(&rules, &[], &query).unwrap();

    let json = serde_json::to_string(&board).unwrap();
    assert_eq!(
        json,
        r#"[{"slot":{"start":"09:00","duration_minutes":25},"booked":false}]"#
    );
}
