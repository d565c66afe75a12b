use std::ops::Bound;

use serde::Serialize;

use super::{Calendar, DirectEntry};
use crate::domain::{CalendarDate, RecurrenceRule, TimeWindow};

/// The resolved state of one subject on one date.
///
/// This is computed on demand and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EffectiveState {
    /// Whether the subject is unavailable / scheduled.
    pub active: bool,
    /// The part of the day the state covers; `None` is the whole day.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_window: Option<TimeWindow>,
    /// The state comes from a rule occurrence after the rule's start.
    pub is_repeated: bool,
    /// The date is the start date of a rule.
    pub is_repeat_origin: bool,
    /// The date is a rule's start date whose state has been overridden by a
    /// direct entry.
    pub is_reset_origin: bool,
    /// The start date of the rule this state belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_of: Option<CalendarDate>,
    /// The rule has at least one suppressed occurrence after today.
    pub future_repeats_stopped: bool,
    /// A direct entry is masking an occurrence of some rule.
    pub was_broken_from_pattern: bool,
}

impl EffectiveState {
    const fn from_entry(entry: &DirectEntry) -> Self {
        Self {
            active: entry.active,
            time_window: entry.time_window,
            is_repeated: false,
            is_repeat_origin: false,
            is_reset_origin: false,
            origin_of: None,
            future_repeats_stopped: false,
            was_broken_from_pattern: false,
        }
    }
}

impl Calendar {
    /// Resolves the effective state on `date`.
    ///
    /// The first of these that applies decides the result:
    ///
    /// 1. `date` starts a rule and has a direct entry: the entry, reported as
    ///    a reset origin.
    /// 2. `date` has a direct entry: the entry.
    /// 3. `date` is an exception: no state.
    /// 4. `date` is an occurrence of a rule: the rule's state. Rules are
    ///    tried in start date order and the first occurrence wins.
    /// 5. Otherwise no state.
    ///
    /// `today` only affects [`EffectiveState::future_repeats_stopped`].
    #[must_use]
    pub fn resolve(&self, date: CalendarDate, today: CalendarDate) -> Option<EffectiveState> {
        if let Some(entry) = self.direct_entries.get(&date) {
            if self.recurrence_rules.contains_key(&date) {
                return Some(EffectiveState {
                    is_repeat_origin: true,
                    is_reset_origin: true,
                    origin_of: Some(date),
                    future_repeats_stopped: self.has_future_exception(date, today),
                    ..EffectiveState::from_entry(entry)
                });
            }

            return Some(EffectiveState {
                was_broken_from_pattern: self.masks_repeat(date),
                ..EffectiveState::from_entry(entry)
            });
        }

        if self.exceptions.contains(&date) {
            return None;
        }

        self.recurrence_rules
            .iter()
            .find(|(start, rule)| rule.occurs_on(**start, date))
            .map(|(&start, rule)| self.occurrence(start, rule, date, today))
    }

    /// Resolves every date from `from` to `until`, both inclusive.
    pub fn resolve_range(
        &self,
        from: CalendarDate,
        until: CalendarDate,
        today: CalendarDate,
    ) -> impl Iterator<Item = (CalendarDate, Option<EffectiveState>)> + '_ {
        from.iter_until(until)
            .map(move |date| (date, self.resolve(date, today)))
    }

    /// Whether the rule starting on `start` has an exception after `today`
    /// that suppresses one of its repeats.
    ///
    /// Returns `false` when no rule starts on `start`.
    #[must_use]
    pub fn has_future_exception(&self, start: CalendarDate, today: CalendarDate) -> bool {
        let Some(rule) = self.recurrence_rules.get(&start) else {
            return false;
        };

        self.exceptions
            .range((Bound::Excluded(today), Bound::Unbounded))
            .any(|&exception| rule.matches(start, exception))
    }

    fn masks_repeat(&self, date: CalendarDate) -> bool {
        self.recurrence_rules
            .iter()
            .any(|(&start, rule)| rule.matches(start, date))
    }

    fn occurrence(
        &self,
        start: CalendarDate,
        rule: &RecurrenceRule,
        date: CalendarDate,
        today: CalendarDate,
    ) -> EffectiveState {
        EffectiveState {
            active: rule.active(),
            time_window: rule.time_window(),
            is_repeated: date != start,
            is_repeat_origin: date == start,
            is_reset_origin: false,
            origin_of: Some(start),
            future_repeats_stopped: self.has_future_exception(start, today),
            was_broken_from_pattern: false,
        }
    }
}
