use std::path::PathBuf;

use clap::Parser;
use rota::{
    CalendarDate, DirectEntry, Directory, RecurrenceRule, SubjectId, TimeWindow, Unit,
    domain::AddedPattern,
};
use tracing::instrument;

use super::{Colorize, confirm_or_exit, describe, report_ignored};

#[derive(Debug, Parser)]
pub struct Pattern {
    #[command(subcommand)]
    command: PatternCommand,
}

#[derive(Debug, Parser)]
enum PatternCommand {
    /// Add a recurring pattern, replacing any pattern with the same start date
    ///
    /// Exceptions on dates the new pattern generates are removed.
    Add(Add),

    /// Remove the pattern starting on a date
    Remove(Remove),

    /// List a subject's patterns
    List(ListPatterns),

    /// Suppress the future repeats of a pattern
    ///
    /// Repeats are suppressed from tomorrow (or --from) up to --months
    /// months ahead; later repeats still occur.
    Stop(Stop),

    /// Remove every exception suppressing repeats of a pattern
    Clear(Clear),
}

impl Pattern {
    pub fn run(self, root: PathBuf, today: CalendarDate) -> anyhow::Result<()> {
        let directory = Directory::new(root);
        match self.command {
            PatternCommand::Add(command) => command.run(&directory),
            PatternCommand::Remove(command) => command.run(&directory),
            PatternCommand::List(command) => command.run(&directory, today),
            PatternCommand::Stop(command) => command.run(&directory, today),
            PatternCommand::Clear(command) => command.run(&directory),
        }
    }
}

#[derive(Debug, Parser)]
struct Add {
    /// The subject
    id: SubjectId,

    /// The first date of the pattern (YYYY-MM-DD)
    start: CalendarDate,

    /// Repeat every N units
    #[arg(long, default_value_t = 1)]
    every: u32,

    /// The unit of repetition (day, week, month)
    #[arg(long)]
    unit: Unit,

    /// The pattern marks the inactive state (available / unscheduled)
    #[arg(long)]
    off: bool,

    /// Limit the state to part of the day (HH:MM-HH:MM)
    #[arg(long, value_name = "WINDOW")]
    window: Option<TimeWindow>,

    /// Also record the start date as a direct entry
    #[arg(long)]
    pin_origin: bool,
}

impl Add {
    #[instrument(skip(directory))]
    fn run(self, directory: &Directory) -> anyhow::Result<()> {
        let rule = RecurrenceRule::new(
            self.every,
            self.unit,
            !self.off,
            self.window.and_then(TimeWindow::canonical),
        )?;

        let outcome = if self.pin_origin {
            directory.update(&self.id, |subject| {
                let calendar = subject.calendar_mut();
                let added = calendar.add_pattern(self.start, rule);
                calendar.set_entry(
                    self.start,
                    DirectEntry {
                        active: rule.active(),
                        time_window: rule.time_window(),
                    },
                );
                Ok(added)
            })?
        } else {
            directory.add_pattern(&self.id, self.start, rule)?
        };

        let Some(AddedPattern { replaced, restored }) = outcome else {
            report_ignored(&self.id);
            return Ok(());
        };

        println!(
            "{}",
            format!("✅ {} repeats {rule} from {}", self.id, self.start).success()
        );
        if let Some(replaced) = replaced {
            println!("{}", format!("  Replaced: {replaced}").dim());
        }
        if !restored.is_empty() {
            println!(
                "{}",
                format!("  Removed {} conflicting exception(s)", restored.len()).dim()
            );
        }
        Ok(())
    }
}

#[derive(Debug, Parser)]
struct Remove {
    /// The subject
    id: SubjectId,

    /// The start date of the pattern
    start: CalendarDate,

    /// Skip confirmation prompts
    #[arg(long, short)]
    yes: bool,
}

impl Remove {
    #[instrument(skip(directory))]
    fn run(self, directory: &Directory) -> anyhow::Result<()> {
        if !self.yes {
            confirm_or_exit(&format!(
                "Remove the pattern of {} starting {}?",
                self.id, self.start
            ))?;
        }

        let Some(removed) = directory.remove_pattern(&self.id, self.start)? else {
            report_ignored(&self.id);
            return Ok(());
        };

        println!(
            "{}",
            format!("✅ Removed {} from {}", removed.rule, self.id).success()
        );
        if !removed.pruned.is_empty() {
            println!(
                "{}",
                format!("  Pruned {} exception(s)", removed.pruned.len()).dim()
            );
        }
        Ok(())
    }
}

#[derive(Debug, Parser)]
struct ListPatterns {
    /// The subject
    id: SubjectId,
}

impl ListPatterns {
    #[instrument(skip(directory))]
    fn run(self, directory: &Directory, today: CalendarDate) -> anyhow::Result<()> {
        let subject = directory.load(&self.id)?;
        let calendar = subject.calendar();

        if calendar.rules().next().is_none() {
            println!("{} has no patterns.", self.id);
            return Ok(());
        }

        println!("{:<12} {:<28} {:<24} Exceptions", "Start", "Repeats", "State");
        for (start, rule) in calendar.rules() {
            let exceptions = calendar
                .exceptions()
                .filter(|date| rule.matches(start, *date))
                .count();
            let state = describe(self.id.kind(), Some(rule.active()), rule.time_window());
            let stopped = if calendar.has_future_exception(start, today) {
                " (future repeats stopped)".active()
            } else {
                String::new()
            };
            println!(
                "{:<12} {:<28} {state:<24} {exceptions}{stopped}",
                start.to_string(),
                format!("every {} {}", rule.every(), rule.unit()),
            );
        }
        Ok(())
    }
}

#[derive(Debug, Parser)]
struct Stop {
    /// The subject
    id: SubjectId,

    /// The start date of the pattern
    start: CalendarDate,

    /// How many months ahead to suppress (defaults to the configured horizon)
    #[arg(long)]
    months: Option<u32>,

    /// Suppress repeats from this date instead of tomorrow
    #[arg(long, value_name = "DATE")]
    from: Option<CalendarDate>,
}

impl Stop {
    #[instrument(skip(directory))]
    fn run(self, directory: &Directory, today: CalendarDate) -> anyhow::Result<()> {
        let Some(added) =
            directory.stop_future_repeats(&self.id, self.start, today, self.months, self.from)?
        else {
            report_ignored(&self.id);
            return Ok(());
        };

        println!(
            "{}",
            format!(
                "✅ Stopped {} repeat(s) of the {} pattern starting {}",
                added.len(),
                self.id,
                self.start
            )
            .success()
        );
        if let (Some(first), Some(last)) = (added.first(), added.last()) {
            println!("{}", format!("  {first} to {last}").dim());
        }
        Ok(())
    }
}

#[derive(Debug, Parser)]
struct Clear {
    /// The subject
    id: SubjectId,

    /// The start date of the pattern
    start: CalendarDate,
}

impl Clear {
    #[instrument(skip(directory))]
    fn run(self, directory: &Directory) -> anyhow::Result<()> {
        let Some(removed) = directory.clear_exceptions(&self.id, self.start)? else {
            report_ignored(&self.id);
            return Ok(());
        };

        println!(
            "{}",
            format!(
                "✅ Restored {} repeat(s) of the {} pattern starting {}",
                removed.len(),
                self.id,
                self.start
            )
            .success()
        );
        Ok(())
    }
}
