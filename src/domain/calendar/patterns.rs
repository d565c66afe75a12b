use super::Calendar;
use crate::domain::{CalendarDate, RecurrenceRule};

/// Error returned when an operation names a rule that does not exist.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PatternError {
    /// No rule starts on the given date.
    #[error("No recurring pattern starts on {0}")]
    NotFound(CalendarDate),
}

/// The outcome of [`Calendar::add_pattern`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedPattern {
    /// The rule previously starting on the same date, if it was replaced.
    pub replaced: Option<RecurrenceRule>,
    /// Exception dates removed because the new rule generates them.
    pub restored: Vec<CalendarDate>,
}

/// What [`Calendar::toggle_exception`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExceptionToggle {
    /// The date was added to the exceptions.
    Suppressed,
    /// The date was removed from the exceptions.
    Restored,
}

impl Calendar {
    /// Adds a rule starting on `start`, replacing any rule already starting
    /// there.
    ///
    /// Every exception that the new rule would generate is removed, so the
    /// rule takes full effect. Direct entries are not touched.
    pub fn add_pattern(&mut self, start: CalendarDate, rule: RecurrenceRule) -> AddedPattern {
        let replaced = self.recurrence_rules.insert(start, rule);
        let restored = self.take_exceptions(|date| rule.matches(start, date));

        AddedPattern { replaced, restored }
    }

    /// Removes the rule starting on `start`.
    ///
    /// Exceptions are left in place.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::NotFound`] if no rule starts on `start`.
    pub fn remove_pattern(&mut self, start: CalendarDate) -> Result<RecurrenceRule, PatternError> {
        self.recurrence_rules
            .remove(&start)
            .ok_or(PatternError::NotFound(start))
    }

    /// Adds `date` to the exceptions, or removes it if already present.
    pub fn toggle_exception(&mut self, date: CalendarDate) -> ExceptionToggle {
        if self.exceptions.remove(&date) {
            ExceptionToggle::Restored
        } else {
            self.exceptions.insert(date);
            ExceptionToggle::Suppressed
        }
    }

    /// Suppresses the repeats of the rule starting on `start` from `from`
    /// (default: the day after `today`) up to `months_ahead` months after
    /// `today`.
    ///
    /// Repeats beyond that horizon are still generated by the rule. Returns
    /// the newly added exception dates.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::NotFound`] if no rule starts on `start`.
    pub fn stop_future_repeats(
        &mut self,
        start: CalendarDate,
        today: CalendarDate,
        months_ahead: u32,
        from: Option<CalendarDate>,
    ) -> Result<Vec<CalendarDate>, PatternError> {
        let rule = *self.rule(start).ok_or(PatternError::NotFound(start))?;

        let from = from.or_else(|| today.next_day());
        let (Some(from), Some(until)) = (from, today.add_months(months_ahead)) else {
            return Ok(Vec::new());
        };

        let added = rule
            .repeats_between(start, from, until)
            .filter(|date| self.exceptions.insert(*date))
            .collect();

        Ok(added)
    }

    /// Removes every exception that suppresses a repeat of the rule starting
    /// on `start`, returning the removed dates.
    ///
    /// Exceptions belonging to other rules, and any on or before `start`, are
    /// kept.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::NotFound`] if no rule starts on `start`.
    pub fn clear_exceptions(
        &mut self,
        start: CalendarDate,
    ) -> Result<Vec<CalendarDate>, PatternError> {
        let rule = *self.rule(start).ok_or(PatternError::NotFound(start))?;
        Ok(self.take_exceptions(|date| rule.matches(start, date)))
    }

    fn take_exceptions(
        &mut self,
        mut predicate: impl FnMut(CalendarDate) -> bool,
    ) -> Vec<CalendarDate> {
        let mut taken = Vec::new();
        self.exceptions.retain(|&date| {
            let take = predicate(date);
            if take {
                taken.push(date);
            }
            !take
        });
        taken
    }
}
