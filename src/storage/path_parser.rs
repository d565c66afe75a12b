//! Path parsing utilities for subjects
//!
//! Every subject lives at `<root>/<kind>/<name>.yaml`; the kind folder and
//! the file stem together form the [`SubjectId`].

use std::{
    ffi::OsStr,
    path::{Component, Path, PathBuf},
};

use crate::domain::{SubjectId, SubjectIdError, SubjectKind};

/// File extension of subject documents.
pub const EXTENSION: &str = "yaml";

/// Parse a subject id from a file path below `root`.
///
/// # Errors
///
/// Returns an error if:
/// - The path is not below `root`, or is not a `.yaml` file
/// - The path is not exactly one folder deep
/// - The folder is not a subject kind, or the stem is not a valid name
pub fn parse_id_from_path(path: &Path, root: &Path) -> Result<SubjectId, ParseError> {
    let rel_path = path
        .strip_prefix(root)
        .map_err(|_| ParseError::InvalidPath)?;

    if rel_path.extension() != Some(OsStr::new(EXTENSION)) {
        return Err(ParseError::InvalidPath);
    }

    let components: Vec<&str> = rel_path
        .components()
        .map(|c| match c {
            Component::Normal(s) => s.to_str().ok_or(ParseError::InvalidPath),
            _ => Err(ParseError::InvalidPath),
        })
        .collect::<Result<_, _>>()?;

    let [kind, _] = components.as_slice() else {
        return Err(ParseError::Depth(components.len()));
    };

    let stem = rel_path
        .file_stem()
        .and_then(OsStr::to_str)
        .ok_or(ParseError::InvalidPath)?;

    let kind: SubjectKind = kind.parse()?;
    let id = SubjectId::new(kind, stem)?;

    // Names are stored lowercase; a mixed-case file would not round-trip.
    if id.name() != stem {
        return Err(ParseError::NotCanonical(path.to_path_buf()));
    }

    Ok(id)
}

/// Construct the file path of a subject.
#[must_use]
pub fn construct_path_from_id(root: &Path, id: &SubjectId) -> PathBuf {
    root.join(id.kind().as_str())
        .join(id.name())
        .with_extension(EXTENSION)
}

/// Errors that can occur during path parsing
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    /// Not a `.yaml` file below the root.
    #[error("Invalid file path")]
    InvalidPath,

    /// Subjects are exactly one folder deep.
    #[error("Expected <kind>/<name>.yaml, found a path {0} component(s) deep")]
    Depth(usize),

    /// The file name is not lowercase.
    #[error("File name is not lowercase: {}", .0.display())]
    NotCanonical(PathBuf),

    /// The kind folder or name is invalid.
    #[error("Subject id parsing error: {0}")]
    Id(#[from] SubjectIdError),
}
