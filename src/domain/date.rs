use std::{fmt, str::FromStr};

use chrono::{Datelike, Local, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// A calendar date with no time or time zone component.
///
/// Dates are written as `YYYY-MM-DD` everywhere: on the command line, in
/// stored subject documents and in JSON output. Parsing is strict; anything
/// that is not exactly a four digit year, two digit month and two digit day
/// naming a real date is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Wraps a [`NaiveDate`].
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Creates a date from its year, month and day, if it exists.
    #[must_use]
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// The current date in the local time zone.
    #[must_use]
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    /// The underlying [`NaiveDate`].
    #[must_use]
    pub const fn naive(self) -> NaiveDate {
        self.0
    }

    /// The day of the month, starting at 1.
    #[must_use]
    pub fn day(self) -> u32 {
        self.0.day()
    }

    /// Whole calendar days from `self` to `other`.
    ///
    /// Negative when `other` is earlier than `self`.
    #[must_use]
    pub fn days_until(self, other: Self) -> i64 {
        other.0.signed_duration_since(self.0).num_days()
    }

    /// The signed difference in `year * 12 + month` from `self` to `other`.
    ///
    /// Days of the month are ignored: 2024-01-31 to 2024-02-01 is one month.
    #[must_use]
    pub fn months_until(self, other: Self) -> i64 {
        month_index(other.0) - month_index(self.0)
    }

    /// The following day, or `None` at the end of the representable range.
    #[must_use]
    pub fn next_day(self) -> Option<Self> {
        self.0.succ_opt().map(Self)
    }

    /// This date moved forward by `months` months.
    ///
    /// When the day does not exist in the target month the result is clamped
    /// to the last day of that month. This is only used to bound ranges; it
    /// plays no part in deciding which dates a monthly rule matches.
    #[must_use]
    pub fn add_months(self, months: u32) -> Option<Self> {
        self.0.checked_add_months(Months::new(months)).map(Self)
    }

    /// Iterates over every date from `self` to `until`, both inclusive.
    ///
    /// Yields nothing when `until` is before `self`.
    pub fn iter_until(self, until: Self) -> impl Iterator<Item = Self> {
        std::iter::successors(Some(self), |d| d.next_day()).take_while(move |d| *d <= until)
    }
}

fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Error returned when a string is not a valid `YYYY-MM-DD` date.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid date '{0}': expected a calendar date in YYYY-MM-DD format")]
pub struct InvalidDateError(String);

impl FromStr for CalendarDate {
    type Err = InvalidDateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        let well_formed = bytes.len() == 10
            && bytes[4] == b'-'
            && bytes[7] == b'-'
            && bytes
                .iter()
                .enumerate()
                .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());

        if !well_formed {
            return Err(InvalidDateError(s.to_string()));
        }

        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self)
            .map_err(|_| InvalidDateError(s.to_string()))
    }
}

impl TryFrom<String> for CalendarDate {
    type Error = InvalidDateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<&str> for CalendarDate {
    type Error = InvalidDateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CalendarDate> for String {
    fn from(date: CalendarDate) -> Self {
        date.to_string()
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn date(s: &str) -> CalendarDate {
        s.parse().unwrap()
    }

    #[test]
    fn parses_and_displays_iso_dates() {
        let d = date("2024-03-04");
        assert_eq!(d, CalendarDate::from_ymd(2024, 3, 4).unwrap());
        assert_eq!(d.to_string(), "2024-03-04");
    }

    #[test_case("2024-3-4"; "missing zero padding")]
    #[test_case("2024/03/04"; "wrong separator")]
    #[test_case("2024-02-30"; "nonexistent day")]
    #[test_case("2024-13-01"; "nonexistent month")]
    #[test_case("24-03-04xx"; "short year")]
    #[test_case(" 2024-03-04"; "leading whitespace")]
    #[test_case(""; "empty")]
    fn rejects_malformed_dates(input: &str) {
        let error = input.parse::<CalendarDate>().unwrap_err();
        assert_eq!(error, InvalidDateError(input.to_string()));
    }

    #[test_case("2024-01-01", "2024-01-15", 14)]
    #[test_case("2024-01-15", "2024-01-01", -14)]
    #[test_case("2024-02-28", "2024-03-01", 2; "leap year")]
    #[test_case("2023-02-28", "2023-03-01", 1; "common year")]
    fn days_until_counts_calendar_days(from: &str, to: &str, expected: i64) {
        assert_eq!(date(from).days_until(date(to)), expected);
    }

    #[test_case("2024-01-31", "2024-02-01", 1)]
    #[test_case("2023-11-15", "2024-02-15", 3; "across year boundary")]
    #[test_case("2024-05-01", "2024-01-01", -4)]
    fn months_until_ignores_day_of_month(from: &str, to: &str, expected: i64) {
        assert_eq!(date(from).months_until(date(to)), expected);
    }

    #[test]
    fn add_months_clamps_to_month_end() {
        assert_eq!(date("2024-01-31").add_months(1), Some(date("2024-02-29")));
        assert_eq!(date("2024-10-18").add_months(24), Some(date("2026-10-18")));
    }

    #[test]
    fn iter_until_is_inclusive() {
        let days: Vec<_> = date("2024-02-27").iter_until(date("2024-03-01")).collect();
        assert_eq!(
            days,
            vec![
                date("2024-02-27"),
                date("2024-02-28"),
                date("2024-02-29"),
                date("2024-03-01")
            ]
        );
        assert_eq!(date("2024-03-02").iter_until(date("2024-03-01")).count(), 0);
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&date("2024-03-04")).unwrap();
        assert_eq!(json, "\"2024-03-04\"");
        let back: CalendarDate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, date("2024-03-04"));
        assert!(serde_json::from_str::<CalendarDate>("\"2024-3-4\"").is_err());
    }
}
