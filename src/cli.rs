use std::path::{Path, PathBuf};

mod list;
mod pattern;
mod show;
mod status;
mod terminal;

use clap::ArgAction;
use list::List;
use pattern::Pattern;
use rota::{
    CalendarDate, Config, DirectEntry, Directory, EffectiveState, SubjectId, SubjectKind,
    TimeWindow, domain::ExceptionToggle, storage::META_DIR,
};
use show::Show;
use status::Status;
use terminal::Colorize;
use tracing::instrument;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The path to the root of the calendar directory
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    /// Resolve as if today were this date (YYYY-MM-DD)
    #[arg(long, global = true, value_name = "DATE")]
    today: Option<CalendarDate>,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let today = self.today.unwrap_or_else(CalendarDate::today);
        self.command
            .unwrap_or_else(|| Command::Status(Status::default()))
            .run(self.root, today)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Show subject counts and today's states (default)
    Status(Status),

    /// Initialize a new calendar directory
    Init,

    /// Create a new subject
    Create(Create),

    /// Delete a subject
    Delete(Delete),

    /// List subjects
    List(List),

    /// Set the state of a subject on one date
    ///
    /// A direct entry overrides any recurring pattern on that date.
    Set(Set),

    /// Remove the direct entry of a subject on one date
    Unset(Unset),

    /// Suppress (or restore) a pattern repeat on one date
    Toggle(Toggle),

    /// Manage recurring patterns
    Pattern(Pattern),

    /// Show the resolved calendar of a subject
    Show(Show),
}

impl Command {
    fn run(self, root: PathBuf, today: CalendarDate) -> anyhow::Result<()> {
        match self {
            Self::Status(command) => command.run(root, today)?,
            Self::Init => Init::run(&root)?,
            Self::Create(command) => command.run(root)?,
            Self::Delete(command) => command.run(root)?,
            Self::List(command) => command.run(root, today)?,
            Self::Set(command) => command.run(root)?,
            Self::Unset(command) => command.run(root)?,
            Self::Toggle(command) => command.run(root)?,
            Self::Pattern(command) => command.run(root, today)?,
            Self::Show(command) => command.run(root, today)?,
        }
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Init {}

impl Init {
    #[instrument]
    fn run(root: &Path) -> anyhow::Result<()> {
        let meta_dir = root.join(META_DIR);
        if meta_dir.exists() {
            anyhow::bail!("Directory already initialized (found existing {META_DIR} directory)");
        }

        std::fs::create_dir_all(&meta_dir)
            .map_err(|e| anyhow::anyhow!("Failed to create {META_DIR} directory: {e}"))?;

        Config::default()
            .save(&meta_dir.join("config.toml"))
            .map_err(|e| anyhow::anyhow!("Failed to create config.toml: {e}"))?;

        println!("Initialized calendar directory in {}", root.display());
        println!("  Created: {META_DIR}/config.toml");
        println!();
        println!("Next steps:");
        println!("  rota create person/alice --title \"Alice\"");

        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Create {
    /// The id of the subject, as kind/name (e.g. person/alice)
    id: SubjectId,

    /// A human-readable title
    #[clap(long, short)]
    title: Option<String>,
}

impl Create {
    #[instrument]
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let directory = Directory::new(root);
        let subject = directory.create(&self.id, self.title)?;
        println!(
            "Added {} {}",
            subject.kind(),
            subject.id().to_string().highlight()
        );
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Delete {
    /// The id of the subject to delete
    id: SubjectId,

    /// Skip confirmation prompts
    #[arg(long, short)]
    yes: bool,
}

impl Delete {
    #[instrument]
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let directory = Directory::new(root);

        if !self.yes {
            let subject = directory.load(&self.id)?;
            let calendar = subject.calendar();
            println!(
                "{} has {} direct entries, {} patterns and {} exceptions.",
                self.id,
                calendar.entries().count(),
                calendar.rules().count(),
                calendar.exceptions().count()
            );
            confirm_or_exit(&format!("Delete {}?", self.id))?;
        }

        match directory.delete(&self.id)? {
            Some(()) => println!("{}", format!("✅ Deleted {}", self.id).success()),
            None => report_ignored(&self.id),
        }
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Set {
    /// The subject
    id: SubjectId,

    /// The date (YYYY-MM-DD)
    date: CalendarDate,

    /// Record the inactive state (available / unscheduled) instead
    #[arg(long)]
    off: bool,

    /// Limit the state to part of the day (HH:MM-HH:MM)
    #[arg(long, value_name = "WINDOW")]
    window: Option<TimeWindow>,
}

impl Set {
    #[instrument]
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let directory = Directory::new(root);
        let entry = DirectEntry {
            active: !self.off,
            time_window: self.window.and_then(TimeWindow::canonical),
        };

        match directory.set_entry(&self.id, self.date, entry)? {
            Some(()) => println!(
                "{}",
                format!(
                    "✅ {} is {} on {}",
                    self.id,
                    describe(self.id.kind(), Some(entry.active), entry.time_window),
                    self.date
                )
                .success()
            ),
            None => report_ignored(&self.id),
        }
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Unset {
    /// The subject
    id: SubjectId,

    /// The date (YYYY-MM-DD)
    date: CalendarDate,
}

impl Unset {
    #[instrument]
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let directory = Directory::new(root);

        match directory.remove_entry(&self.id, self.date)? {
            Some(true) => println!(
                "{}",
                format!("✅ Removed the entry for {} on {}", self.id, self.date).success()
            ),
            Some(false) => println!(
                "{}",
                format!("{} has no entry on {}", self.id, self.date).dim()
            ),
            None => report_ignored(&self.id),
        }
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Toggle {
    /// The subject
    id: SubjectId,

    /// The date (YYYY-MM-DD)
    date: CalendarDate,
}

impl Toggle {
    #[instrument]
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let directory = Directory::new(root);

        match directory.toggle_exception(&self.id, self.date)? {
            Some(ExceptionToggle::Suppressed) => println!(
                "{}",
                format!("✅ Suppressed repeats of {} on {}", self.id, self.date).success()
            ),
            Some(ExceptionToggle::Restored) => println!(
                "{}",
                format!("✅ Restored repeats of {} on {}", self.id, self.date).success()
            ),
            None => report_ignored(&self.id),
        }
        Ok(())
    }
}

/// A short description of a state, e.g. "unavailable 09:00-12:00".
fn describe(kind: SubjectKind, active: Option<bool>, window: Option<TimeWindow>) -> String {
    let label = match active {
        Some(true) => kind.active_label(),
        Some(false) => kind.inactive_label(),
        None => return "–".to_string(),
    };
    window.map_or_else(|| label.to_string(), |window| format!("{label} {window}"))
}

fn describe_state(kind: SubjectKind, state: Option<&EffectiveState>) -> String {
    describe(
        kind,
        state.map(|state| state.active),
        state.and_then(|state| state.time_window),
    )
}

fn confirm_or_exit(prompt: &str) -> anyhow::Result<()> {
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?;

    if !confirmed {
        println!("Cancelled");
        std::process::exit(130);
    }
    Ok(())
}

fn report_ignored(id: &SubjectId) {
    println!(
        "{}",
        format!("Nothing changed: {id} or the referenced pattern does not exist").dim()
    );
}
