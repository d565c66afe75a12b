use std::{fmt, str::FromStr};

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// A wall-clock time with minute precision, written `HH:MM` (24-hour).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    /// The hour component.
    #[must_use]
    pub fn hour(self) -> u32 {
        self.0.hour()
    }

    /// The minute component.
    #[must_use]
    pub fn minute(self) -> u32 {
        self.0.minute()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl FromStr for TimeOfDay {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        let well_formed = bytes.len() == 5
            && bytes[2] == b':'
            && bytes
                .iter()
                .enumerate()
                .all(|(i, b)| i == 2 || b.is_ascii_digit());

        if !well_formed {
            return Err(Error::Time(s.to_string()));
        }

        NaiveTime::parse_from_str(s, "%H:%M")
            .map(Self)
            .map_err(|_| Error::Time(s.to_string()))
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(time: TimeOfDay) -> Self {
        time.to_string()
    }
}

/// The part of a day a state applies to.
///
/// A state without a window covers the whole day. Windows are never empty and
/// never wrap past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawWindow")]
pub struct TimeWindow {
    start: TimeOfDay,
    end: TimeOfDay,
}

#[derive(Deserialize)]
struct RawWindow {
    start: TimeOfDay,
    end: TimeOfDay,
}

impl TryFrom<RawWindow> for TimeWindow {
    type Error = Error;

    fn try_from(raw: RawWindow) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl TimeWindow {
    /// Creates a window.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Inverted`] if `end` is not after `start`.
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Result<Self, Error> {
        if end <= start {
            return Err(Error::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// This window, or `None` if it is the alternate whole-day spelling
    /// `00:00-23:59`.
    ///
    /// "No window" is the only stored form of a whole-day state, so every
    /// user-supplied window passes through here before it is stored.
    #[must_use]
    pub fn canonical(self) -> Option<Self> {
        (!self.is_full_day_spelling()).then_some(self)
    }

    /// The start of the window.
    #[must_use]
    pub const fn start(&self) -> TimeOfDay {
        self.start
    }

    /// The end of the window.
    #[must_use]
    pub const fn end(&self) -> TimeOfDay {
        self.end
    }

    /// Whether this window is the literal `00:00-23:59`.
    #[must_use]
    pub fn is_full_day_spelling(&self) -> bool {
        (self.start.hour(), self.start.minute()) == (0, 0)
            && (self.end.hour(), self.end.minute()) == (23, 59)
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl FromStr for TimeWindow {
    type Err = Error;

    /// Parses `HH:MM-HH:MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once('-')
            .ok_or_else(|| Error::Window(s.to_string()))?;
        Self::new(start.trim().parse()?, end.trim().parse()?)
    }
}

/// Errors from parsing or constructing times and windows.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// Not a `HH:MM` time.
    #[error("Invalid time '{0}': expected HH:MM (24-hour)")]
    Time(String),

    /// Not a `HH:MM-HH:MM` window.
    #[error("Invalid time window '{0}': expected HH:MM-HH:MM")]
    Window(String),

    /// The end of the window is not after its start.
    #[error("Invalid time window: end {end} is not after start {start}")]
    Inverted {
        /// Start of the rejected window.
        start: TimeOfDay,
        /// End of the rejected window.
        end: TimeOfDay,
    },
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn time(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    #[test_case("9:00"; "single digit hour")]
    #[test_case("24:00"; "hour out of range")]
    #[test_case("12:60"; "minute out of range")]
    #[test_case("12-30"; "wrong separator")]
    #[test_case("12:30:00"; "seconds")]
    fn rejects_malformed_times(input: &str) {
        assert_eq!(
            input.parse::<TimeOfDay>(),
            Err(Error::Time(input.to_string()))
        );
    }

    #[test]
    fn parses_window() {
        let window: TimeWindow = "09:00-17:30".parse().unwrap();
        assert_eq!(window.start(), time("09:00"));
        assert_eq!(window.end(), time("17:30"));
        assert_eq!(window.to_string(), "09:00-17:30");
    }

    #[test]
    fn inverted_window_is_rejected() {
        assert_eq!(
            "17:00-09:00".parse::<TimeWindow>(),
            Err(Error::Inverted {
                start: time("17:00"),
                end: time("09:00")
            })
        );
        assert!(TimeWindow::new(time("09:00"), time("09:00")).is_err());
    }

    #[test_case("00:00-23:59", None; "whole day spelling")]
    #[test_case("00:00-23:58", Some("00:00-23:58"); "one minute short")]
    #[test_case("00:01-23:59", Some("00:01-23:59"); "late start")]
    #[test_case("09:00-12:00", Some("09:00-12:00"); "morning")]
    fn canonical_folds_whole_day(input: &str, expected: Option<&str>) {
        let window: TimeWindow = input.parse().unwrap();
        assert_eq!(
            window.canonical().map(|window| window.to_string()).as_deref(),
            expected
        );
    }

    #[test]
    fn deserializing_validates_window() {
        let ok: TimeWindow = serde_json::from_str(r#"{"start":"08:00","end":"10:00"}"#).unwrap();
        assert_eq!(ok.to_string(), "08:00-10:00");
        assert!(serde_json::from_str::<TimeWindow>(r#"{"start":"10:00","end":"08:00"}"#).is_err());
    }
}
