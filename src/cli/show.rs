use std::{fmt::Write as _, path::PathBuf, str::FromStr};

use anyhow::Context;
use chrono::{Datelike, Months};
use clap::{Parser, ValueEnum};
use rota::{CalendarDate, Directory, EffectiveState, SubjectId, SubjectKind};
use serde::Serialize;
use tracing::instrument;

use super::{
    describe_state,
    terminal::{Colorize, is_narrow},
};

#[derive(Debug, Parser)]
#[command(about = "Display the resolved calendar of a subject")]
pub struct Show {
    /// The subject to display
    id: SubjectId,

    /// The month to display (YYYY-MM, default: the current month)
    #[arg(long, value_name = "YYYY-MM", conflicts_with_all = ["from", "to"])]
    month: Option<Month>,

    /// The first date to display
    #[arg(long, value_name = "DATE", requires = "to")]
    from: Option<CalendarDate>,

    /// The last date to display
    #[arg(long, value_name = "DATE", requires = "from")]
    to: Option<CalendarDate>,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    /// A month grid (falls back to a list on narrow terminals)
    #[default]
    Calendar,
    /// One line per date
    List,
    Json,
}

/// A calendar month, given as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Month {
    first: CalendarDate,
    last: CalendarDate,
}

impl Month {
    fn containing(date: CalendarDate) -> Option<Self> {
        let date = date.naive();
        Self::new(date.year(), date.month())
    }

    fn new(year: i32, month: u32) -> Option<Self> {
        let first = chrono::NaiveDate::from_ymd_opt(year, month, 1)?;
        let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
        Some(Self {
            first: first.into(),
            last: last.into(),
        })
    }
}

impl FromStr for Month {
    type Err = InvalidMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let first: CalendarDate = format!("{s}-01")
            .parse()
            .map_err(|_| InvalidMonthError(s.to_string()))?;
        Self::containing(first).ok_or_else(|| InvalidMonthError(s.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid month '{0}': expected YYYY-MM")]
struct InvalidMonthError(String);

#[derive(Debug, Serialize)]
struct Day {
    date: CalendarDate,
    state: Option<EffectiveState>,
}

impl Show {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf, today: CalendarDate) -> anyhow::Result<()> {
        let directory = Directory::new(root);
        let subject = directory.load(&self.id)?;

        let (from, to) = self.range(today)?;
        let days: Vec<_> = subject
            .calendar()
            .resolve_range(from, to, today)
            .map(|(date, state)| Day { date, state })
            .collect();

        if let OutputFormat::Json = self.output {
            println!("{}", serde_json::to_string_pretty(&days)?);
            return Ok(());
        }

        println!("# {}", subject.id());
        if let Some(title) = subject.title() {
            println!("{title}");
        }
        println!(
            "{}\n",
            format!(
                "UUID {}, created {}",
                subject.uuid(),
                subject.created().format("%Y-%m-%d")
            )
            .dim()
        );

        match self.output {
            OutputFormat::Calendar if !is_narrow() => {
                print!("{}", render_calendar(subject.kind(), &days, today));
            }
            _ => print!("{}", render_list(subject.kind(), &days)),
        }
        Ok(())
    }

    fn range(&self, today: CalendarDate) -> anyhow::Result<(CalendarDate, CalendarDate)> {
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if to < from {
                anyhow::bail!("--to ({to}) is before --from ({from})");
            }
            return Ok((from, to));
        }

        let month = match self.month {
            Some(month) => month,
            None => Month::containing(today).context("Today is outside the supported range")?,
        };
        Ok((month.first, month.last))
    }
}

/// One character summarising how a state came about.
const fn marker(state: Option<&EffectiveState>) -> char {
    match state {
        Some(state) if state.is_reset_origin => '!',
        Some(state) if state.is_repeat_origin => '^',
        Some(state) if state.is_repeated => '*',
        Some(state) if state.was_broken_from_pattern => '~',
        _ => ' ',
    }
}

fn colour(text: &str, state: Option<&EffectiveState>) -> String {
    match state {
        Some(state) if state.active => text.active(),
        Some(_) => text.inactive(),
        None => text.dim(),
    }
}

fn notes(state: &EffectiveState) -> Vec<String> {
    let mut notes = Vec::new();
    if state.is_reset_origin {
        notes.push("pattern start, overridden".to_string());
    } else if state.is_repeat_origin {
        notes.push("pattern start".to_string());
    } else if let (true, Some(origin)) = (state.is_repeated, state.origin_of) {
        notes.push(format!("repeat of {origin}"));
    }
    if state.was_broken_from_pattern {
        notes.push("overrides a repeat".to_string());
    }
    if state.future_repeats_stopped {
        notes.push("future repeats stopped".to_string());
    }
    notes
}

fn render_list(kind: SubjectKind, days: &[Day]) -> String {
    let mut out = String::new();
    for day in days {
        let state = day.state.as_ref();
        let weekday = day.date.naive().format("%a");
        let description = format!("{:<24}", describe_state(kind, state));
        let mut line = format!("{} {weekday}  {}", day.date, colour(&description, state));
        if let Some(state) = state {
            let notes = notes(state);
            if !notes.is_empty() {
                let _ = write!(line, " {}", format!("({})", notes.join(", ")).dim());
            }
        }
        let _ = writeln!(out, "{}", line.trim_end());
    }
    out
}

fn render_calendar(kind: SubjectKind, days: &[Day], today: CalendarDate) -> String {
    let mut out = String::new();

    for month in days.chunk_by(|a, b| same_month(a.date, b.date)) {
        let Some(first) = month.first() else {
            continue;
        };
        let _ = writeln!(out, "{}", first.date.naive().format("%B %Y"));
        let _ = writeln!(out, "{}", " Mo  Tu  We  Th  Fr  Sa  Su".dim());

        let offset = first.date.naive().weekday().num_days_from_monday();
        for _ in 0..offset {
            out.push_str("    ");
        }

        for day in month {
            let state = day.state.as_ref();
            let cell = format!("{:>3}{}", day.date.day(), marker(state));
            let cell = colour(&cell, state);
            if day.date == today {
                out.push_str(&cell.highlight());
            } else {
                out.push_str(&cell);
            }

            if day.date.naive().weekday().num_days_from_monday() == 6 {
                out.push('\n');
            }
        }
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out.push('\n');
    }

    let legend = format!(
        "{} {}  {} {}  {}",
        kind.active_label(),
        "■".active(),
        kind.inactive_label(),
        "■".inactive(),
        "^ pattern start  * repeat  ! overridden start  ~ overrides a repeat".dim()
    );
    let _ = writeln!(out, "{legend}");
    out
}

fn same_month(a: CalendarDate, b: CalendarDate) -> bool {
    let (a, b) = (a.naive(), b.naive());
    (a.year(), a.month()) == (b.year(), b.month())
}

#[cfg(test)]
mod tests {
    use rota::{Calendar, DirectEntry, RecurrenceRule, Unit};
    use test_case::test_case;

    use super::*;

    fn date(s: &str) -> CalendarDate {
        s.parse().unwrap()
    }

    fn days(calendar: &Calendar, from: &str, to: &str) -> Vec<Day> {
        calendar
            .resolve_range(date(from), date(to), date(from))
            .map(|(date, state)| Day { date, state })
            .collect()
    }

    #[test_case("2024-02", "2024-02-01", "2024-02-29"; "leap february")]
    #[test_case("2023-02", "2023-02-01", "2023-02-28"; "february")]
    #[test_case("2024-12", "2024-12-01", "2024-12-31"; "december")]
    fn month_bounds(input: &str, first: &str, last: &str) {
        let month: Month = input.parse().unwrap();
        assert_eq!(month.first, date(first));
        assert_eq!(month.last, date(last));
    }

    #[test_case("2024-13")]
    #[test_case("2024-1")]
    #[test_case("2024")]
    fn invalid_months(input: &str) {
        assert!(input.parse::<Month>().is_err());
    }

    #[test]
    fn explicit_range_wins_over_month() {
        let show = Show::try_parse_from([
            "show",
            "person/alice",
            "--from",
            "2024-03-10",
            "--to",
            "2024-03-12",
        ])
        .unwrap();
        assert_eq!(
            show.range(date("2024-01-01")).unwrap(),
            (date("2024-03-10"), date("2024-03-12"))
        );

        let show = Show::try_parse_from(["show", "person/alice"]).unwrap();
        assert_eq!(
            show.range(date("2024-02-14")).unwrap(),
            (date("2024-02-01"), date("2024-02-29"))
        );
    }

    #[test]
    fn month_conflicts_with_range() {
        let args = [
            "show",
            "person/alice",
            "--month",
            "2024-03",
            "--from",
            "2024-03-01",
            "--to",
            "2024-03-02",
        ];
        assert!(Show::try_parse_from(args).is_err());
        assert!(Show::try_parse_from(["show", "person/alice", "--from", "2024-03-01"]).is_err());
    }

    #[test]
    fn inverted_range_is_rejected() {
        let show = Show::try_parse_from([
            "show",
            "person/alice",
            "--from",
            "2024-03-12",
            "--to",
            "2024-03-10",
        ])
        .unwrap();
        assert!(show.range(date("2024-01-01")).is_err());
    }

    #[test]
    fn list_describes_each_day() {
        let mut calendar = Calendar::new();
        calendar.add_pattern(
            date("2024-01-01"),
            RecurrenceRule::new(1, Unit::Week, true, None).unwrap(),
        );
        calendar.set_entry(date("2024-01-09"), DirectEntry::full_day(false));

        let days = days(&calendar, "2024-01-08", "2024-01-10");
        let rendered = render_list(SubjectKind::Person, &days);
        let lines: Vec<_> = rendered.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("2024-01-08 Mon"));
        assert!(lines[0].contains("unavailable"));
        assert!(lines[0].contains("repeat of 2024-01-01"));
        assert!(lines[1].contains("available"));
        assert!(lines[2].contains('–'));
    }

    #[test]
    fn calendar_lays_out_weeks() {
        let mut calendar = Calendar::new();
        calendar.add_pattern(
            date("2024-01-01"),
            RecurrenceRule::new(1, Unit::Week, true, None).unwrap(),
        );

        let rendered = render_calendar(
            SubjectKind::Mission,
            &days(&calendar, "2024-01-01", "2024-02-29"),
            date("2030-01-01"),
        );

        assert!(rendered.contains("January 2024"));
        assert!(rendered.contains("February 2024"));
        // January 2024 starts on a Monday with the pattern origin
        assert!(rendered.contains("  1^"));
        assert!(rendered.contains("  8*"));
        assert!(rendered.contains("scheduled"));
    }

    #[test]
    fn markers_follow_precedence() {
        let state = EffectiveState {
            active: true,
            time_window: None,
            is_repeated: false,
            is_repeat_origin: true,
            is_reset_origin: true,
            origin_of: None,
            future_repeats_stopped: false,
            was_broken_from_pattern: false,
        };
        assert_eq!(marker(Some(&state)), '!');
        assert_eq!(marker(None), ' ');
    }
}
