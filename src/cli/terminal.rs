//! Terminal capability detection and colouring

use owo_colors::{OwoColorize, Style};

/// Detects whether colored output should be enabled
pub fn supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// Detects terminal width, returning None if not available
pub fn terminal_width() -> Option<u16> {
    terminal_size::terminal_size().map(|(w, _)| w.0)
}

/// Whether the terminal is too narrow for month grids (< 60 columns)
pub fn is_narrow() -> bool {
    terminal_width().is_some_and(|w| w < 60)
}

/// How a piece of output should stand out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// A completed action.
    Success,
    /// An active state: unavailable or scheduled.
    Active,
    /// An inactive state: available or unscheduled.
    Inactive,
    /// Today's date.
    Highlight,
    /// Secondary detail.
    Muted,
}

impl Tone {
    fn style(self) -> Style {
        match self {
            Self::Success | Self::Inactive => Style::new().green(),
            Self::Active => Style::new().yellow(),
            Self::Highlight => Style::new().bright_blue().bold().underline(),
            Self::Muted => Style::new().dimmed(),
        }
    }
}

/// Extension trait for colorizing output
///
/// Text is returned unchanged when stdout does not support colour.
pub trait Colorize {
    /// Paints the text in the given tone.
    fn paint(&self, tone: Tone) -> String;

    /// Color as success
    fn success(&self) -> String {
        self.paint(Tone::Success)
    }

    /// Color as an active state
    fn active(&self) -> String {
        self.paint(Tone::Active)
    }

    /// Color as an inactive state
    fn inactive(&self) -> String {
        self.paint(Tone::Inactive)
    }

    /// Emphasise
    fn highlight(&self) -> String {
        self.paint(Tone::Highlight)
    }

    /// Dim the text
    fn dim(&self) -> String {
        self.paint(Tone::Muted)
    }
}

impl Colorize for str {
    fn paint(&self, tone: Tone) -> String {
        if supports_color() {
            self.style(tone.style()).to_string()
        } else {
            self.to_string()
        }
    }
}

impl Colorize for String {
    fn paint(&self, tone: Tone) -> String {
        self.as_str().paint(tone)
    }
}
