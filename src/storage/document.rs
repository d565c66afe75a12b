// Storage layer representation of a subject.
//
// This is the on-disk YAML document. It is versioned separately from the
// domain type so either can change without breaking the other.

use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::Path,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use uuid::Uuid;

use crate::domain::{Calendar, Subject, SubjectId, subject::Metadata};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "_version")]
pub(crate) enum SubjectDocument {
    #[serde(rename = "1")]
    V1 {
        uuid: Uuid,
        created: DateTime<Utc>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, skip_serializing_if = "Calendar::is_empty")]
        calendar: Calendar,
    },
}

impl SubjectDocument {
    pub(crate) fn read(path: &Path) -> Result<Self, ReadError> {
        let file = File::open(path)?;
        Ok(serde_yaml::from_reader(BufReader::new(file))?)
    }

    /// Writes the document to a temporary file in the same folder, syncs it,
    /// then renames it over `path`, so readers never observe a partially
    /// written document.
    ///
    /// The temporary file is removed if any step fails.
    pub(crate) fn write_atomic(&self, path: &Path) -> io::Result<()> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent)?;

        let mut temp = NamedTempFile::new_in(parent)?;
        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            serde_yaml::to_writer(&mut writer, self).map_err(io::Error::other)?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    pub(crate) fn into_subject(self, id: SubjectId) -> Subject {
        match self {
            Self::V1 {
                uuid,
                created,
                title,
                calendar,
            } => Subject {
                id,
                metadata: Metadata {
                    uuid,
                    created,
                    title,
                },
                calendar,
            },
        }
    }
}

impl From<&Subject> for SubjectDocument {
    fn from(subject: &Subject) -> Self {
        Self::V1 {
            uuid: subject.metadata.uuid,
            created: subject.metadata.created,
            title: subject.metadata.title.clone(),
            calendar: subject.calendar.clone(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum ReadError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}
