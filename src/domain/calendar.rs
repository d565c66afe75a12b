//! The per-subject collections the resolution engine works on.
//!
//! A [`Calendar`] holds direct entries, recurrence rules keyed by their start
//! date, and the exception dates that suppress individual occurrences. It is
//! the unit of work for both halves of the engine: [`Calendar::resolve`]
//! reads it, and the pattern operations keep its three collections
//! consistent with each other.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::domain::{CalendarDate, RecurrenceRule, TimeWindow};

mod patterns;
mod resolve;

pub use patterns::{AddedPattern, ExceptionToggle, PatternError};
pub use resolve::EffectiveState;

/// An explicit, non-recurring statement about one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectEntry {
    /// Whether the subject is unavailable / scheduled on this date.
    pub active: bool,
    /// The part of the day the entry covers; `None` is the whole day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_window: Option<TimeWindow>,
}

impl DirectEntry {
    /// An entry covering the whole day.
    #[must_use]
    pub const fn full_day(active: bool) -> Self {
        Self {
            active,
            time_window: None,
        }
    }
}

/// Direct entries, recurrence rules and exceptions for one subject.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    direct_entries: BTreeMap<CalendarDate, DirectEntry>,

    /// Rules keyed by start date, iterated in chronological order.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    recurrence_rules: BTreeMap<CalendarDate, RecurrenceRule>,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    exceptions: BTreeSet<CalendarDate>,
}

impl Calendar {
    /// Creates an empty calendar.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The direct entry for `date`, if any.
    #[must_use]
    pub fn entry(&self, date: CalendarDate) -> Option<&DirectEntry> {
        self.direct_entries.get(&date)
    }

    /// All direct entries in date order.
    pub fn entries(&self) -> impl Iterator<Item = (CalendarDate, &DirectEntry)> {
        self.direct_entries.iter().map(|(&date, entry)| (date, entry))
    }

    /// Sets the direct entry for `date`, returning the entry it replaced.
    ///
    /// Rules and exceptions are untouched.
    pub fn set_entry(&mut self, date: CalendarDate, entry: DirectEntry) -> Option<DirectEntry> {
        self.direct_entries.insert(date, entry)
    }

    /// Removes the direct entry for `date`, returning it if there was one.
    pub fn remove_entry(&mut self, date: CalendarDate) -> Option<DirectEntry> {
        self.direct_entries.remove(&date)
    }

    /// The rule starting on `start`, if any.
    #[must_use]
    pub fn rule(&self, start: CalendarDate) -> Option<&RecurrenceRule> {
        self.recurrence_rules.get(&start)
    }

    /// All rules with their start dates, in start date order.
    pub fn rules(&self) -> impl Iterator<Item = (CalendarDate, &RecurrenceRule)> {
        self.recurrence_rules.iter().map(|(&start, rule)| (start, rule))
    }

    /// All exception dates in order.
    pub fn exceptions(&self) -> impl Iterator<Item = CalendarDate> + '_ {
        self.exceptions.iter().copied()
    }

    /// Whether `date` is an exception.
    #[must_use]
    pub fn is_exception(&self, date: CalendarDate) -> bool {
        self.exceptions.contains(&date)
    }

    /// Whether the calendar holds nothing at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.direct_entries.is_empty()
            && self.recurrence_rules.is_empty()
            && self.exceptions.is_empty()
    }
}
