use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use rota::{CalendarDate, Directory, EffectiveState, Subject, SubjectKind};
use serde::Serialize;
use tracing::instrument;

use super::{describe_state, terminal::Colorize};

/// Command arguments for `rota list`.
#[derive(Debug, Parser)]
#[command(about = "List subjects with their state today")]
pub struct List {
    /// Filter by subject kind (comma-separated)
    #[arg(long, value_delimiter = ',', value_name = "KIND")]
    kind: Vec<SubjectKind>,

    /// Output format (default: table).
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,

    /// Suppress headers and format rows for scripting.
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Serialize)]
struct Row {
    id: String,
    kind: SubjectKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    entries: usize,
    patterns: usize,
    exceptions: usize,
    today: Option<EffectiveState>,
}

impl Row {
    fn new(subject: &Subject, today: CalendarDate) -> Self {
        let calendar = subject.calendar();
        Self {
            id: subject.id().to_string(),
            kind: subject.kind(),
            title: subject.title().map(ToString::to_string),
            entries: calendar.entries().count(),
            patterns: calendar.rules().count(),
            exceptions: calendar.exceptions().count(),
            today: calendar.resolve(today, today),
        }
    }
}

impl List {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf, today: CalendarDate) -> anyhow::Result<()> {
        let directory = Directory::new(root);
        let rows = self.rows(directory.load_all()?, today);

        match self.output {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
            OutputFormat::Table => self.output_table(&rows),
        }
        Ok(())
    }

    fn rows(&self, subjects: Vec<Subject>, today: CalendarDate) -> Vec<Row> {
        let mut subjects: Vec<_> = subjects
            .into_iter()
            .filter(|subject| self.kind.is_empty() || self.kind.contains(&subject.kind()))
            .collect();
        subjects.sort_by(|a, b| a.id().cmp(b.id()));
        subjects
            .iter()
            .map(|subject| Row::new(subject, today))
            .collect()
    }

    fn output_table(&self, rows: &[Row]) {
        if rows.is_empty() {
            if !self.quiet {
                println!("{}", "No subjects match.".dim());
            }
            return;
        }

        if !self.quiet {
            println!(
                "{:<28} {:<24} {:<8} {:<9} {:<11} Title",
                "Id", "Today", "Entries", "Patterns", "Exceptions"
            );
        }
        for row in rows {
            let today = describe_state(row.kind, row.today.as_ref());
            if self.quiet {
                println!("{}\t{today}", row.id);
                continue;
            }
            println!(
                "{:<28} {today:<24} {:<8} {:<9} {:<11} {}",
                row.id,
                row.entries,
                row.patterns,
                row.exceptions,
                row.title.as_deref().unwrap_or("").dim()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use rota::{DirectEntry, SubjectId};

    use super::*;

    fn subject(id: &str) -> Subject {
        let id: SubjectId = id.parse().unwrap();
        Subject::new(id.clone(), Some(format!("Title of {id}")))
    }

    #[test]
    fn filters_by_kind_and_sorts() {
        let list = List::try_parse_from(["list", "--kind", "person"]).unwrap();
        let subjects = vec![
            subject("person/zoe"),
            subject("mission/apollo"),
            subject("person/adam"),
        ];

        let rows = list.rows(subjects, "2024-01-01".parse().unwrap());
        let ids: Vec<_> = rows.iter().map(|row| row.id.as_str()).collect();
        assert_eq!(ids, ["person/adam", "person/zoe"]);
    }

    #[test]
    fn rows_carry_todays_state() {
        let list = List::try_parse_from(["list"]).unwrap();
        let today: CalendarDate = "2024-01-01".parse().unwrap();
        let mut alice = subject("person/alice");
        alice
            .calendar_mut()
            .set_entry(today, DirectEntry::full_day(true));

        let rows = list.rows(vec![alice], today);
        assert_eq!(rows[0].entries, 1);
        assert!(rows[0].today.is_some_and(|state| state.active));
    }
}
