use std::{fmt, str::FromStr, sync::LazyLock};

use non_empty_string::NonEmptyString;
use regex::Regex;
use serde::{Deserialize, Serialize};

static NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9_-]*$").expect("name pattern is valid"));

/// The three kinds of subject the engine is applied to.
///
/// They behave identically; only the label for an active state differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectKind {
    /// A team member. Active means unavailable.
    Person,
    /// A mission. Active means scheduled.
    Mission,
    /// A rule. Active means scheduled.
    Rule,
}

impl SubjectKind {
    /// Every kind, in display order.
    pub const ALL: [Self; 3] = [Self::Person, Self::Mission, Self::Rule];

    /// The lowercase name, also used as the storage folder.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Mission => "mission",
            Self::Rule => "rule",
        }
    }

    /// What an active state means for this kind.
    #[must_use]
    pub const fn active_label(self) -> &'static str {
        match self {
            Self::Person => "unavailable",
            Self::Mission | Self::Rule => "scheduled",
        }
    }

    /// What an inactive state means for this kind.
    #[must_use]
    pub const fn inactive_label(self) -> &'static str {
        match self {
            Self::Person => "available",
            Self::Mission | Self::Rule => "unscheduled",
        }
    }
}

impl fmt::Display for SubjectKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubjectKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::Kind(s.to_string()))
    }
}

/// Identifies a subject: its kind and a lowercase name, written
/// `kind/name`.
///
/// # Examples
///
/// ```
/// use rota::{SubjectId, SubjectKind};
///
/// let id: SubjectId = "Person/Alice".parse().unwrap();
/// assert_eq!(id.kind(), SubjectKind::Person);
/// assert_eq!(id.name(), "alice");
/// assert_eq!(id.to_string(), "person/alice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubjectId {
    kind: SubjectKind,
    name: NonEmptyString,
}

impl SubjectId {
    /// Creates an id, validating and lowercasing the name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Name`] unless the name is ASCII letters, digits, `-`
    /// and `_`, starting with a letter or digit.
    pub fn new(kind: SubjectKind, name: &str) -> Result<Self, Error> {
        let lowercase = name.to_ascii_lowercase();
        if !NAME.is_match(&lowercase) {
            return Err(Error::Name(name.to_string()));
        }
        let name = NonEmptyString::new(lowercase).map_err(|_| Error::Name(name.to_string()))?;
        Ok(Self { kind, name })
    }

    /// The kind of subject.
    #[must_use]
    pub const fn kind(&self) -> SubjectKind {
        self.kind
    }

    /// The subject's name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.name)
    }
}

impl FromStr for SubjectId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, name) = s
            .split_once('/')
            .ok_or_else(|| Error::Syntax(s.to_string()))?;
        Self::new(kind.parse()?, name)
    }
}

impl TryFrom<&str> for SubjectId {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Errors from parsing a subject id.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// Not of the form `kind/name`.
    #[error("Invalid subject id '{0}': expected kind/name, e.g. person/alice")]
    Syntax(String),

    /// Unknown kind.
    #[error("Invalid subject kind '{0}': expected one of person, mission, rule")]
    Kind(String),

    /// Name contains characters outside `[a-z0-9_-]`.
    #[error(
        "Invalid subject name '{0}': use letters, digits, '-' and '_', starting with a letter or \
         digit"
    )]
    Name(String),
}
