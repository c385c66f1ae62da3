//! Per-session memo of slot boards.
//!
//! A browsing session re-renders the same `(date, duration)` pair many times.
//! [`SlotCache`] owns the session's rule and reservation snapshots and keeps
//! the boards computed from them. Replacing either snapshot drops every memo,
//! since the engine itself cannot tell when its inputs went stale.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::board::{slot_board, SlotStatus};
use crate::conflict::ReservedInterval;
use crate::error::Result;
use crate::rules::AvailabilityRule;
use crate::slots::SlotQuery;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    date: NaiveDate,
    duration_minutes: u32,
    step_minutes: u32,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    cutoff: Option<u32>,
    board: Vec<SlotStatus>,
}

/// Slot boards memoised against one snapshot of rules and reservations.
#[derive(Debug, Clone, Default)]
pub struct SlotCache {
    rules: Vec<AvailabilityRule>,
    reserved: Vec<ReservedInterval>,
    entries: HashMap<CacheKey, CacheEntry>,
}

impl SlotCache {
    pub fn new(rules: Vec<AvailabilityRule>, reserved: Vec<ReservedInterval>) -> Self {
        Self {
            rules,
            reserved,
            entries: HashMap::new(),
        }
    }

    pub fn rules(&self) -> &[AvailabilityRule] {
        &self.rules
    }

    pub fn reserved(&self) -> &[ReservedInterval] {
        &self.reserved
    }

    /// Number of memoised boards.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Swap in a new reservation snapshot and drop all memoised boards.
    pub fn replace_reservations(&mut self, reserved: Vec<ReservedInterval>) {
        self.reserved = reserved;
        self.invalidate();
    }

    /// Swap in a new rule set and drop all memoised boards.
    pub fn replace_rules(&mut self, rules: Vec<AvailabilityRule>) {
        self.rules = rules;
        self.invalidate();
    }

    pub fn invalidate(&mut self) {
        if !self.entries.is_empty() {
            debug!(dropped = self.entries.len(), "invalidated slot cache");
        }
        self.entries.clear();
    }

    /// The board for `query`, computed at most once per snapshot.
    ///
    /// For today's date the memo is also tied to the current minute, so the
    /// cutoff keeps moving as the clock does.
    pub fn board(&mut self, query: &SlotQuery) -> Result<&[SlotStatus]> {
        let key = CacheKey {
            date: query.date,
            duration_minutes: query.duration_minutes,
            step_minutes: query.step_minutes,
        };
        let cutoff = query.cutoff();

        let fresh = self
            .entries
            .get(&key)
            .is_some_and(|entry| entry.cutoff == cutoff);
        if !fresh {
            let board = slot_board(&self.rules, &self.reserved, query)?;
            self.entries.insert(key, CacheEntry { cutoff, board });
        }

        Ok(self
            .entries
            .get(&key)
            .map(|entry| entry.board.as_slice())
            .unwrap_or_default())
    }
}
