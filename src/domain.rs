//! Domain models for availability and scheduling calendars.
//!
//! This module contains the resolution engine (recurrence matching, effective
//! state resolution and the pattern operations) together with the value types
//! it works on, subject identity and configuration.

/// Calendar dates.
pub mod date;
pub use date::{CalendarDate, InvalidDateError};

/// Times of day and time windows.
pub mod time_window;
pub use time_window::{Error as TimeWindowError, TimeOfDay, TimeWindow};

pub mod recurrence;
pub use recurrence::{Error as RecurrenceError, RecurrenceRule, Unit};

pub mod calendar;
pub use calendar::{
    AddedPattern, Calendar, DirectEntry, EffectiveState, ExceptionToggle, PatternError,
};

/// Subject identifiers and kinds.
pub mod subject_id;
pub use subject_id::{Error as SubjectIdError, SubjectId, SubjectKind};

pub(crate) mod subject;
pub use subject::Subject;

mod config;
pub use config::{Config, MissingReferences};
