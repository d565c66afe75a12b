use std::{collections::BTreeMap, path::PathBuf};

use clap::Parser;
use rota::{CalendarDate, Directory, Subject, SubjectKind};
use serde::Serialize;
use tracing::instrument;

use super::terminal::{Colorize, is_narrow};

#[derive(Debug, Parser, Default)]
#[command(about = "Show subject counts and today's states")]
pub struct Status {
    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Suppress headers and format for scripting
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Per-kind totals.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
struct KindSummary {
    count: usize,
    active_today: usize,
    patterns: usize,
    exceptions: usize,
}

impl KindSummary {
    fn record(&mut self, subject: &Subject, today: CalendarDate) {
        let calendar = subject.calendar();
        self.count += 1;
        self.patterns += calendar.rules().count();
        self.exceptions += calendar.exceptions().count();
        if calendar
            .resolve(today, today)
            .is_some_and(|state| state.active)
        {
            self.active_today += 1;
        }
    }

    fn merge(self, other: Self) -> Self {
        Self {
            count: self.count + other.count,
            active_today: self.active_today + other.active_today,
            patterns: self.patterns + other.patterns,
            exceptions: self.exceptions + other.exceptions,
        }
    }
}

fn summarise(subjects: &[Subject], today: CalendarDate) -> BTreeMap<SubjectKind, KindSummary> {
    let mut summaries: BTreeMap<_, KindSummary> = SubjectKind::ALL
        .into_iter()
        .map(|kind| (kind, KindSummary::default()))
        .collect();
    for subject in subjects {
        summaries
            .entry(subject.kind())
            .or_default()
            .record(subject, today);
    }
    summaries
}

impl Status {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf, today: CalendarDate) -> anyhow::Result<()> {
        let directory = Directory::new(root);
        let subjects = directory.load_all()?;

        if subjects.is_empty() {
            println!("No subjects found yet. Create one with 'rota create'.");
            return Ok(());
        }

        let summaries = summarise(&subjects, today);
        let total = summaries
            .values()
            .fold(KindSummary::default(), |acc, summary| acc.merge(*summary));

        match self.output {
            OutputFormat::Json => Self::output_json(&summaries, total, today)?,
            OutputFormat::Table if self.quiet => Self::output_quiet(total),
            OutputFormat::Table => Self::output_table(&summaries, total, today),
        }

        Ok(())
    }

    fn output_json(
        summaries: &BTreeMap<SubjectKind, KindSummary>,
        total: KindSummary,
        today: CalendarDate,
    ) -> anyhow::Result<()> {
        use serde_json::json;

        let kinds: Vec<_> = summaries
            .iter()
            .map(|(kind, summary)| {
                json!({
                    "kind": kind,
                    "count": summary.count,
                    "active_today": summary.active_today,
                    "patterns": summary.patterns,
                    "exceptions": summary.exceptions,
                })
            })
            .collect();

        let output = json!({
            "today": today,
            "kinds": kinds,
            "total": total,
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    fn output_quiet(total: KindSummary) {
        println!(
            "total={} active={} patterns={} exceptions={}",
            total.count, total.active_today, total.patterns, total.exceptions
        );
    }

    fn output_table(
        summaries: &BTreeMap<SubjectKind, KindSummary>,
        total: KindSummary,
        today: CalendarDate,
    ) {
        println!("Subjects on {today}");
        println!("{}", "──────────────────────".dim());

        if is_narrow() {
            for (kind, summary) in summaries {
                println!(
                    "{kind}: {} ({} {})",
                    summary.count,
                    summary.active_today,
                    kind.active_label()
                );
            }
            println!("Total: {}", total.count);
        } else {
            println!(
                "{:<10} {:<6} {:<18} {:<9} Exceptions",
                "Kind", "Count", "Today", "Patterns"
            );
            for (kind, summary) in summaries {
                let today = format!("{} {}", summary.active_today, kind.active_label());
                println!(
                    "{:<10} {:<6} {today:<18} {:<9} {}",
                    kind.as_str(),
                    summary.count,
                    summary.patterns,
                    summary.exceptions
                );
            }
            println!(
                "{:<10} {:<6} {:<18} {:<9} {}",
                "Total", total.count, "", total.patterns, total.exceptions
            );
        }

        println!();

        if total.patterns == 0 {
            println!("{}", "No recurring patterns yet. Add one with 'rota pattern add'.".dim());
        } else {
            println!("Patterns: {} ✅", total.patterns.to_string().success());
        }
    }
}

#[cfg(test)]
mod tests {
    use rota::{DirectEntry, RecurrenceRule, SubjectId, Unit};

    use super::*;

    fn date(s: &str) -> CalendarDate {
        s.parse().unwrap()
    }

    fn subject(id: &str) -> Subject {
        let id: SubjectId = id.parse().unwrap();
        Subject::new(id, None)
    }

    #[test]
    fn summarises_per_kind_with_todays_state() {
        let mut alice = subject("person/alice");
        alice.calendar_mut().add_pattern(
            date("2024-01-01"),
            RecurrenceRule::new(1, Unit::Week, true, None).unwrap(),
        );
        alice.calendar_mut().toggle_exception(date("2024-01-22"));

        let mut bob = subject("person/bob");
        bob.calendar_mut()
            .set_entry(date("2024-01-15"), DirectEntry::full_day(false));

        let patrol = subject("mission/patrol");

        let summaries = summarise(&[alice, bob, patrol], date("2024-01-15"));

        assert_eq!(
            summaries[&SubjectKind::Person],
            KindSummary {
                count: 2,
                active_today: 1,
                patterns: 1,
                exceptions: 1,
            }
        );
        assert_eq!(summaries[&SubjectKind::Mission].count, 1);
        assert_eq!(summaries[&SubjectKind::Rule], KindSummary::default());
    }

    #[test]
    fn suppressed_repeat_is_not_active() {
        let mut alice = subject("person/alice");
        alice.calendar_mut().add_pattern(
            date("2024-01-01"),
            RecurrenceRule::new(1, Unit::Week, true, None).unwrap(),
        );
        alice.calendar_mut().toggle_exception(date("2024-01-22"));

        let summaries = summarise(&[alice], date("2024-01-22"));
        assert_eq!(summaries[&SubjectKind::Person].active_today, 0);
    }
}
