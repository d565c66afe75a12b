//! Plain-text availability and scheduling calendars.
//!
//! Each subject (a person, mission or rule) is a YAML document stored in a
//! directory. A subject's state on any date is resolved from its direct
//! entries, recurring patterns and exceptions.

pub mod domain;
pub use domain::{
    Calendar, CalendarDate, Config, DirectEntry, EffectiveState, RecurrenceRule, Subject,
    SubjectId, SubjectKind, TimeWindow, Unit,
};

/// Filesystem storage for subjects.
pub mod storage;
pub use storage::{Directory, StoreError};
