use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Calendar, SubjectId, SubjectKind};

/// A person, mission or rule together with its calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub(crate) id: SubjectId,
    pub(crate) metadata: Metadata,
    pub(crate) calendar: Calendar,
}

/// Subject metadata.
///
/// Never consulted when resolving states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Metadata {
    /// Globally unique, perpetually stable identifier.
    pub(crate) uuid: Uuid,
    /// When the subject was created.
    pub(crate) created: DateTime<Utc>,
    /// Optional human readable title, e.g. a full name.
    pub(crate) title: Option<String>,
}

impl Subject {
    /// Creates a subject with an empty calendar and a fresh UUID.
    #[must_use]
    pub fn new(id: SubjectId, title: Option<String>) -> Self {
        Self {
            id,
            metadata: Metadata {
                uuid: Uuid::new_v4(),
                created: Utc::now(),
                title,
            },
            calendar: Calendar::new(),
        }
    }

    /// The subject's id.
    #[must_use]
    pub const fn id(&self) -> &SubjectId {
        &self.id
    }

    /// The subject's kind.
    #[must_use]
    pub const fn kind(&self) -> SubjectKind {
        self.id.kind()
    }

    /// The stable identifier of this subject.
    #[must_use]
    pub const fn uuid(&self) -> Uuid {
        self.metadata.uuid
    }

    /// When the subject was created.
    #[must_use]
    pub const fn created(&self) -> DateTime<Utc> {
        self.metadata.created
    }

    /// The subject's title, if set.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.metadata.title.as_deref()
    }

    /// The subject's calendar.
    #[must_use]
    pub const fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    /// Mutable access to the subject's calendar.
    pub const fn calendar_mut(&mut self) -> &mut Calendar {
        &mut self.calendar
    }
}
