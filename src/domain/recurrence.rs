//! Recurrence rules and the predicate deciding which dates they generate.

use std::{fmt, num::NonZeroU32, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::domain::{CalendarDate, TimeWindow};

/// The unit a recurrence period is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Every N days.
    Day,
    /// Every N weeks (N * 7 days).
    Week,
    /// Every N months, on the same day of the month.
    Month,
}

impl Unit {
    /// The lowercase name of the unit.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            _ => Err(Error::Unit(s.to_string())),
        }
    }
}

/// Errors constructing a recurrence rule.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// The period must be at least one unit.
    #[error("Invalid recurrence interval {0}: must be at least 1")]
    Interval(u32),

    /// The unit is not one of day, week or month.
    #[error("Invalid recurrence unit '{0}': expected one of day, week, month")]
    Unit(String),
}

/// A pattern of period `every × unit`, keyed elsewhere by its start date.
///
/// The rule itself does not know its start date; a [`Calendar`] stores rules
/// in a map from start date to rule.
///
/// [`Calendar`]: crate::domain::Calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    every: NonZeroU32,
    unit: Unit,
    active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    time_window: Option<TimeWindow>,
}

impl RecurrenceRule {
    /// Creates a rule.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Interval`] if `every` is zero.
    pub fn new(
        every: u32,
        unit: Unit,
        active: bool,
        time_window: Option<TimeWindow>,
    ) -> Result<Self, Error> {
        let every = NonZeroU32::new(every).ok_or(Error::Interval(every))?;
        Ok(Self {
            every,
            unit,
            active,
            time_window,
        })
    }

    /// The number of units between occurrences.
    #[must_use]
    pub const fn every(&self) -> NonZeroU32 {
        self.every
    }

    /// The unit of the period.
    #[must_use]
    pub const fn unit(&self) -> Unit {
        self.unit
    }

    /// The state each occurrence carries.
    #[must_use]
    pub const fn active(&self) -> bool {
        self.active
    }

    /// The window each occurrence carries; `None` is a full day.
    #[must_use]
    pub const fn time_window(&self) -> Option<TimeWindow> {
        self.time_window
    }

    /// Whether `date` is a repeat of a rule starting on `start`.
    ///
    /// The start date itself, and every date before it, never match. Monthly
    /// rules match only on the start's day of the month; months without that
    /// day are skipped rather than clamped.
    #[must_use]
    pub fn matches(&self, start: CalendarDate, date: CalendarDate) -> bool {
        if date <= start {
            return false;
        }

        let every = i64::from(self.every.get());
        match self.unit {
            Unit::Day => start.days_until(date) % every == 0,
            Unit::Week => start.days_until(date) % (every * 7) == 0,
            Unit::Month => date.day() == start.day() && start.months_until(date) % every == 0,
        }
    }

    /// Whether `date` is an occurrence of a rule starting on `start`, the
    /// start date included.
    #[must_use]
    pub fn occurs_on(&self, start: CalendarDate, date: CalendarDate) -> bool {
        date == start || self.matches(start, date)
    }

    /// The repeats of a rule starting on `start` that fall within
    /// `from..=until`.
    pub fn repeats_between(
        self,
        start: CalendarDate,
        from: CalendarDate,
        until: CalendarDate,
    ) -> impl Iterator<Item = CalendarDate> {
        from.iter_until(until)
            .filter(move |date| self.matches(start, *date))
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.every.get() == 1 {
            write!(f, "every {}", self.unit)?;
        } else {
            write!(f, "every {} {}s", self.every, self.unit)?;
        }
        if let Some(window) = self.time_window {
            write!(f, " ({window})")?;
        }
        Ok(())
    }
}
