//! A filesystem backed store of subjects
//!
//! The [`Directory`] keeps one YAML document per subject and applies every
//! change as a locked read-modify-write of that single document. The
//! resolution engine itself knows nothing about the filesystem; it only sees
//! the [`Calendar`] inside each subject.

use std::{
    ffi::OsStr,
    fs::{File, OpenOptions},
    io,
    path::{Path, PathBuf},
};

use fs2::FileExt;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use tracing::instrument;
use walkdir::WalkDir;

use crate::{
    domain::{
        AddedPattern, Calendar, CalendarDate, Config, DirectEntry, ExceptionToggle,
        MissingReferences, PatternError, RecurrenceRule, Subject, SubjectId,
    },
    storage::{
        document::{ReadError, SubjectDocument},
        path_parser::{EXTENSION, construct_path_from_id, parse_id_from_path},
    },
};

/// Name of the folder below the root holding configuration.
pub const META_DIR: &str = ".rota";

/// A filesystem backed store of subjects.
#[derive(Debug, Clone)]
pub struct Directory {
    /// The root of the directory subjects are stored in.
    root: PathBuf,
    config: Config,
}

/// The outcome of [`Directory::remove_pattern`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedPattern {
    /// The rule that was removed.
    pub rule: RecurrenceRule,
    /// Exceptions removed along with the rule, when configured to prune them.
    pub pruned: Vec<CalendarDate>,
}

impl Directory {
    /// Opens a directory at the given path.
    ///
    /// Configuration is read from `.rota/config.toml`. If that file is missing
    /// the defaults are used; if it is invalid a warning is logged and the
    /// defaults are used.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        let config = load_config(&root);
        Self { root, config }
    }

    /// Opens a directory with an explicit configuration.
    #[must_use]
    pub const fn with_config(root: PathBuf, config: Config) -> Self {
        Self { root, config }
    }

    /// The root folder.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The path of the document for `id`.
    #[must_use]
    pub fn path_for(&self, id: &SubjectId) -> PathBuf {
        construct_path_from_id(&self.root, id)
    }

    /// The ids of every subject in the directory, sorted.
    ///
    /// Files that are not `<kind>/<name>.yaml` are skipped.
    #[must_use]
    pub fn ids(&self) -> Vec<SubjectId> {
        let mut ids: Vec<_> = WalkDir::new(&self.root)
            .min_depth(2)
            .max_depth(2)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| entry.path().extension() == Some(OsStr::new(EXTENSION)))
            .filter_map(|entry| match parse_id_from_path(entry.path(), &self.root) {
                Ok(id) => Some(id),
                Err(e) => {
                    tracing::debug!("Skipping {}: {e}", entry.path().display());
                    None
                }
            })
            .collect();
        ids.sort();
        ids
    }

    /// Loads one subject.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if there is no such subject, or an
    /// error if its document cannot be read or parsed.
    pub fn load(&self, id: &SubjectId) -> Result<Subject, StoreError> {
        let path = self.path_for(id);
        match SubjectDocument::read(&path) {
            Ok(document) => Ok(document.into_subject(id.clone())),
            Err(ReadError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(id.clone()))
            }
            Err(ReadError::Io(e)) => Err(StoreError::Io(e)),
            Err(ReadError::Yaml(source)) => Err(StoreError::Parse { path, source }),
        }
    }

    /// Loads every subject, reading documents in parallel.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered reading any document.
    pub fn load_all(&self) -> Result<Vec<Subject>, StoreError> {
        self.ids().par_iter().map(|id| self.load(id)).collect()
    }

    /// Creates a new subject with an empty calendar.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AlreadyExists`] if a subject with this id exists,
    /// or an error if the document cannot be written.
    #[instrument(skip(self))]
    pub fn create(&self, id: &SubjectId, title: Option<String>) -> Result<Subject, StoreError> {
        let path = self.path_for(id);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let _lock = RecordLock::acquire(&path)?;
        if path.exists() {
            return Err(StoreError::AlreadyExists(id.clone()));
        }

        let subject = Subject::new(id.clone(), title);
        SubjectDocument::from(&subject).write_atomic(&path)?;

        tracing::info!("Created subject: {id}");
        Ok(subject)
    }

    /// Deletes a subject.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if there is no such subject (unless
    /// missing references are ignored), or an error if the file cannot be
    /// removed.
    #[instrument(skip(self))]
    pub fn delete(&self, id: &SubjectId) -> Result<Option<()>, StoreError> {
        let path = self.path_for(id);
        let result = if path.exists() {
            remove_locked(&path)
        } else {
            Err(StoreError::NotFound(id.clone()))
        };

        let outcome = self.tolerate_missing(result)?;
        if outcome.is_some() {
            tracing::info!("Deleted subject: {id}");
        }
        Ok(outcome)
    }

    /// Applies `op` to one subject as a single read-modify-write.
    ///
    /// The subject's lock file is held from before the read until after the
    /// write, and the document is replaced atomically. Nothing is written if
    /// `op` fails.
    ///
    /// Returns `Ok(None)` when the subject or a pattern it names is missing and
    /// the configuration says to ignore missing references.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] if another writer holds the lock,
    /// [`StoreError::NotFound`] or [`StoreError::Pattern`] for missing
    /// references, or an error if the document cannot be read or written.
    pub fn update<T>(
        &self,
        id: &SubjectId,
        op: impl FnOnce(&mut Subject) -> Result<T, PatternError>,
    ) -> Result<Option<T>, StoreError> {
        let result = self.read_modify_write(id, op);
        self.tolerate_missing(result)
    }

    fn read_modify_write<T>(
        &self,
        id: &SubjectId,
        op: impl FnOnce(&mut Subject) -> Result<T, PatternError>,
    ) -> Result<T, StoreError> {
        let path = self.path_for(id);
        if !path.exists() {
            return Err(StoreError::NotFound(id.clone()));
        }

        let _lock = RecordLock::acquire(&path)?;
        let mut subject = self.load(id)?;
        let value = op(&mut subject)?;
        SubjectDocument::from(&subject).write_atomic(&path)?;
        Ok(value)
    }

    fn tolerate_missing<T>(&self, result: Result<T, StoreError>) -> Result<Option<T>, StoreError> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_not_found() && self.ignores_missing_references() => {
                tracing::warn!("Ignoring missing reference: {e}");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn ignores_missing_references(&self) -> bool {
        self.config.missing_references == MissingReferences::Ignore
    }

    fn update_calendar<T>(
        &self,
        id: &SubjectId,
        op: impl FnOnce(&mut Calendar) -> Result<T, PatternError>,
    ) -> Result<Option<T>, StoreError> {
        self.update(id, |subject| op(subject.calendar_mut()))
    }

    /// Sets the direct entry for `date`.
    ///
    /// # Errors
    ///
    /// See [`Directory::update`].
    #[instrument(skip(self))]
    pub fn set_entry(
        &self,
        id: &SubjectId,
        date: CalendarDate,
        entry: DirectEntry,
    ) -> Result<Option<()>, StoreError> {
        let outcome = self.update_calendar(id, |calendar| {
            calendar.set_entry(date, entry);
            Ok(())
        })?;
        if outcome.is_some() {
            tracing::info!("Set {id} on {date}");
        }
        Ok(outcome)
    }

    /// Removes the direct entry for `date`.
    ///
    /// Returns whether there was an entry to remove.
    ///
    /// # Errors
    ///
    /// See [`Directory::update`].
    #[instrument(skip(self))]
    pub fn remove_entry(
        &self,
        id: &SubjectId,
        date: CalendarDate,
    ) -> Result<Option<bool>, StoreError> {
        self.update_calendar(id, |calendar| Ok(calendar.remove_entry(date).is_some()))
    }

    /// Adds a recurring pattern starting on `start`.
    ///
    /// # Errors
    ///
    /// See [`Directory::update`].
    #[instrument(skip(self))]
    pub fn add_pattern(
        &self,
        id: &SubjectId,
        start: CalendarDate,
        rule: RecurrenceRule,
    ) -> Result<Option<AddedPattern>, StoreError> {
        let outcome = self.update_calendar(id, |calendar| Ok(calendar.add_pattern(start, rule)))?;
        if let Some(added) = &outcome {
            tracing::info!(
                "Added pattern to {id} from {start}: {rule} ({} exception(s) restored)",
                added.restored.len()
            );
        }
        Ok(outcome)
    }

    /// Removes the pattern starting on `start`.
    ///
    /// When `prune_orphaned_exceptions` is configured, the exceptions that
    /// suppressed its repeats are removed too.
    ///
    /// # Errors
    ///
    /// See [`Directory::update`].
    #[instrument(skip(self))]
    pub fn remove_pattern(
        &self,
        id: &SubjectId,
        start: CalendarDate,
    ) -> Result<Option<RemovedPattern>, StoreError> {
        let prune = self.config.prune_orphaned_exceptions;
        let outcome = self.update_calendar(id, |calendar| {
            let pruned = if prune {
                calendar.clear_exceptions(start)?
            } else {
                Vec::new()
            };
            let rule = calendar.remove_pattern(start)?;
            Ok(RemovedPattern { rule, pruned })
        })?;
        if let Some(removed) = &outcome {
            tracing::info!(
                "Removed pattern from {id} starting {start} ({} exception(s) pruned)",
                removed.pruned.len()
            );
        }
        Ok(outcome)
    }

    /// Toggles the exception on `date`.
    ///
    /// # Errors
    ///
    /// See [`Directory::update`].
    #[instrument(skip(self))]
    pub fn toggle_exception(
        &self,
        id: &SubjectId,
        date: CalendarDate,
    ) -> Result<Option<ExceptionToggle>, StoreError> {
        self.update_calendar(id, |calendar| Ok(calendar.toggle_exception(date)))
    }

    /// Suppresses the repeats of the pattern starting on `start`.
    ///
    /// `months_ahead` defaults to the configured stop horizon.
    ///
    /// # Errors
    ///
    /// See [`Directory::update`].
    #[instrument(skip(self))]
    pub fn stop_future_repeats(
        &self,
        id: &SubjectId,
        start: CalendarDate,
        today: CalendarDate,
        months_ahead: Option<u32>,
        from: Option<CalendarDate>,
    ) -> Result<Option<Vec<CalendarDate>>, StoreError> {
        let months_ahead = months_ahead.unwrap_or_else(|| self.config.stop_horizon_months());
        let outcome = self.update_calendar(id, |calendar| {
            calendar.stop_future_repeats(start, today, months_ahead, from)
        })?;
        if let Some(added) = &outcome {
            tracing::info!(
                "Stopped repeats of {id} pattern {start}: {} exception(s) added",
                added.len()
            );
        }
        Ok(outcome)
    }

    /// Removes the exceptions suppressing repeats of the pattern starting on
    /// `start`.
    ///
    /// # Errors
    ///
    /// See [`Directory::update`].
    #[instrument(skip(self))]
    pub fn clear_exceptions(
        &self,
        id: &SubjectId,
        start: CalendarDate,
    ) -> Result<Option<Vec<CalendarDate>>, StoreError> {
        self.update_calendar(id, |calendar| calendar.clear_exceptions(start))
    }
}

fn remove_locked(path: &Path) -> Result<(), StoreError> {
    let lock = RecordLock::acquire(path)?;
    std::fs::remove_file(path)?;
    lock.remove();
    Ok(())
}

fn load_config(root: &Path) -> Config {
    let path = root.join(META_DIR).join("config.toml");
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Config::default();
    }
    Config::load(&path).unwrap_or_else(|e| {
        tracing::warn!("Ignoring {}: {e}", path.display());
        Config::default()
    })
}

/// An exclusive advisory lock on one subject document, taken on a `.lock`
/// file next to it.
///
/// The lock is released when this is dropped, or by the OS if the process
/// dies, so a lock file left on disk never blocks later writers.
struct RecordLock {
    file: File,
    path: PathBuf,
}

impl RecordLock {
    fn acquire(document: &Path) -> Result<Self, StoreError> {
        let path = document.with_extension(format!("{EXTENSION}.lock"));
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&path)?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(Self { file, path }),
            Err(e) if is_contended(&e) => Err(StoreError::Conflict(document.to_path_buf())),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    /// Releases the lock and removes its file, once the document itself is gone.
    fn remove(self) {
        let path = self.path.clone();
        drop(self);
        if let Err(e) = std::fs::remove_file(&path) {
            tracing::debug!("Failed to remove lock file {}: {e}", path.display());
        }
    }
}

impl Drop for RecordLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::debug!("Failed to release lock {}: {e}", self.path.display());
        }
    }
}

fn is_contended(error: &io::Error) -> bool {
    error.kind() == io::ErrorKind::WouldBlock
        || error.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}

/// Errors from store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No subject with this id exists.
    #[error("Subject {0} not found")]
    NotFound(SubjectId),

    /// A subject with this id already exists.
    #[error("Subject {0} already exists")]
    AlreadyExists(SubjectId),

    /// Another writer holds the subject's lock.
    #[error("{} is being modified by another process", .0.display())]
    Conflict(PathBuf),

    /// An operation named a pattern the subject does not have.
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// A subject document is not valid.
    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        /// The document that failed to parse.
        path: PathBuf,
        /// The underlying YAML error.
        source: serde_yaml::Error,
    },

    /// Filesystem failure.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl StoreError {
    /// Whether the error is a missing subject or pattern.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Pattern(PatternError::NotFound(_)))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::domain::Unit;

    fn date(s: &str) -> CalendarDate {
        s.parse().unwrap()
    }

    fn id(s: &str) -> SubjectId {
        s.parse().unwrap()
    }

    fn weekly() -> RecurrenceRule {
        RecurrenceRule::new(1, Unit::Week, true, None).unwrap()
    }

    fn setup_temp_directory() -> (TempDir, Directory) {
        let tmp = TempDir::new().expect("failed to create temp dir");
        let dir = Directory::new(tmp.path().to_path_buf());
        (tmp, dir)
    }

    fn ignoring_directory(tmp: &TempDir) -> Directory {
        let mut config = Config::default();
        config.missing_references = MissingReferences::Ignore;
        Directory::with_config(tmp.path().to_path_buf(), config)
    }

    #[test]
    fn create_writes_document_and_load_reads_it() {
        let (tmp, dir) = setup_temp_directory();
        let created = dir
            .create(&id("person/alice"), Some("Alice".to_string()))
            .unwrap();

        assert!(tmp.path().join("person/alice.yaml").exists());
        let loaded = dir.load(&id("person/alice")).unwrap();
        assert_eq!(loaded, created);
        assert_eq!(loaded.title(), Some("Alice"));
    }

    #[test]
    fn create_twice_fails() {
        let (_tmp, dir) = setup_temp_directory();
        dir.create(&id("rule/weekends"), None).unwrap();
        assert!(matches!(
            dir.create(&id("rule/weekends"), None),
            Err(StoreError::AlreadyExists(_))
        ));
    }

    #[test]
    fn ids_lists_subjects_and_skips_other_files() {
        let (tmp, dir) = setup_temp_directory();
        dir.create(&id("person/bob"), None).unwrap();
        dir.create(&id("mission/apollo"), None).unwrap();
        std::fs::create_dir_all(tmp.path().join(META_DIR)).unwrap();
        std::fs::write(tmp.path().join(META_DIR).join("notes.yaml"), "x").unwrap();
        std::fs::write(tmp.path().join("person/readme.md"), "x").unwrap();

        assert_eq!(dir.ids(), vec![id("person/bob"), id("mission/apollo")]);
        assert_eq!(dir.load_all().unwrap().len(), 2);
    }

    #[test]
    fn load_all_reports_corrupt_documents() {
        let (tmp, dir) = setup_temp_directory();
        dir.create(&id("person/bob"), None).unwrap();
        std::fs::write(tmp.path().join("person/carol.yaml"), "_version: '1'\n").unwrap();

        assert!(matches!(dir.load_all(), Err(StoreError::Parse { .. })));
    }

    #[test]
    fn mutations_are_persisted() {
        let (_tmp, dir) = setup_temp_directory();
        let alice = id("person/alice");
        dir.create(&alice, None).unwrap();

        dir.toggle_exception(&alice, date("2024-04-08")).unwrap();
        let added = dir
            .add_pattern(&alice, date("2024-04-01"), weekly())
            .unwrap()
            .unwrap();
        assert_eq!(added.restored, vec![date("2024-04-08")]);

        dir.set_entry(&alice, date("2024-04-02"), DirectEntry::full_day(true))
            .unwrap();

        let subject = dir.load(&alice).unwrap();
        let calendar = subject.calendar();
        assert!(!calendar.is_exception(date("2024-04-08")));
        assert!(calendar.rule(date("2024-04-01")).is_some());
        assert!(calendar.entry(date("2024-04-02")).is_some());
    }

    #[test]
    fn stop_uses_configured_horizon_and_clear_undoes_it() {
        let (_tmp, dir) = setup_temp_directory();
        let alice = id("person/alice");
        dir.create(&alice, None).unwrap();
        dir.add_pattern(&alice, date("2024-01-01"), weekly()).unwrap();

        let added = dir
            .stop_future_repeats(&alice, date("2024-01-01"), date("2024-01-01"), None, None)
            .unwrap()
            .unwrap();
        // 24 months of weekly repeats
        assert!(added.len() > 100);

        let removed = dir
            .clear_exceptions(&alice, date("2024-01-01"))
            .unwrap()
            .unwrap();
        assert_eq!(removed, added);
        assert_eq!(dir.load(&alice).unwrap().calendar().exceptions().count(), 0);
    }

    #[test]
    fn failed_operation_writes_nothing() {
        let (tmp, dir) = setup_temp_directory();
        let alice = id("person/alice");
        dir.create(&alice, None).unwrap();
        let before = std::fs::read_to_string(tmp.path().join("person/alice.yaml")).unwrap();

        let error = dir.remove_pattern(&alice, date("2024-01-01")).unwrap_err();
        assert!(matches!(
            error,
            StoreError::Pattern(PatternError::NotFound(_))
        ));

        let after = std::fs::read_to_string(tmp.path().join("person/alice.yaml")).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn missing_subject_is_not_found() {
        let (_tmp, dir) = setup_temp_directory();
        assert!(matches!(
            dir.toggle_exception(&id("person/ghost"), date("2024-01-01")),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            dir.load(&id("person/ghost")),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn ignore_policy_turns_missing_references_into_no_ops() {
        let tmp = TempDir::new().unwrap();
        let dir = ignoring_directory(&tmp);
        let alice = id("person/alice");

        assert_eq!(
            dir.toggle_exception(&alice, date("2024-01-01")).unwrap(),
            None
        );

        dir.create(&alice, None).unwrap();
        assert_eq!(dir.clear_exceptions(&alice, date("2024-01-01")).unwrap(), None);
        assert_eq!(dir.remove_pattern(&alice, date("2024-01-01")).unwrap(), None);
        assert_eq!(dir.delete(&id("person/ghost")).unwrap(), None);
    }

    #[test]
    fn held_lock_is_a_conflict_until_released() {
        let (tmp, dir) = setup_temp_directory();
        let alice = id("person/alice");
        dir.create(&alice, None).unwrap();

        let lock = RecordLock::acquire(&tmp.path().join("person/alice.yaml")).unwrap();
        assert!(matches!(
            dir.toggle_exception(&alice, date("2024-01-01")),
            Err(StoreError::Conflict(_))
        ));

        drop(lock);
        assert_eq!(
            dir.toggle_exception(&alice, date("2024-01-01")).unwrap(),
            Some(ExceptionToggle::Suppressed)
        );
    }

    #[test]
    fn stale_lock_file_does_not_block_writers() {
        let (tmp, dir) = setup_temp_directory();
        let alice = id("person/alice");
        dir.create(&alice, None).unwrap();
        // left behind by a writer that was killed mid-update
        std::fs::write(tmp.path().join("person/alice.yaml.lock"), "").unwrap();

        let fresh = Directory::new(tmp.path().to_path_buf());
        assert!(fresh.toggle_exception(&alice, date("2024-01-01")).is_ok());
        assert!(fresh.load(&alice).unwrap().calendar().is_exception(date("2024-01-01")));
    }

    #[test]
    fn remove_pattern_keeps_or_prunes_exceptions_per_config() {
        let tmp = TempDir::new().unwrap();
        let alice = id("person/alice");
        let start = date("2024-01-01");

        let keep = Directory::new(tmp.path().to_path_buf());
        keep.create(&alice, None).unwrap();
        keep.add_pattern(&alice, start, weekly()).unwrap();
        keep.toggle_exception(&alice, date("2024-01-15")).unwrap();
        let removed = keep.remove_pattern(&alice, start).unwrap().unwrap();
        assert!(removed.pruned.is_empty());
        assert!(keep.load(&alice).unwrap().calendar().is_exception(date("2024-01-15")));

        let mut config = Config::default();
        config.prune_orphaned_exceptions = true;
        let prune = Directory::with_config(tmp.path().to_path_buf(), config);
        prune.add_pattern(&alice, start, weekly()).unwrap();
        // adding the pattern again already restores the stale exception
        assert!(!prune.load(&alice).unwrap().calendar().is_exception(date("2024-01-15")));
        prune.toggle_exception(&alice, date("2024-01-22")).unwrap();
        let removed = prune.remove_pattern(&alice, start).unwrap().unwrap();
        assert_eq!(removed.pruned, vec![date("2024-01-22")]);
        assert_eq!(prune.load(&alice).unwrap().calendar().exceptions().count(), 0);
    }

    #[test]
    fn delete_removes_document() {
        let (tmp, dir) = setup_temp_directory();
        let alice = id("person/alice");
        dir.create(&alice, None).unwrap();
        assert_eq!(dir.delete(&alice).unwrap(), Some(()));
        assert!(!tmp.path().join("person/alice.yaml").exists());
        assert!(!tmp.path().join("person/alice.yaml.lock").exists());
        assert!(matches!(dir.delete(&alice), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn config_is_read_from_meta_dir() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join(META_DIR)).unwrap();
        std::fs::write(
            tmp.path().join(META_DIR).join("config.toml"),
            "_version = \"1\"\nstop_horizon_months = 3\n",
        )
        .unwrap();

        let dir = Directory::new(tmp.path().to_path_buf());
        assert_eq!(dir.config().stop_horizon_months(), 3);
    }

    #[test]
    fn invalid_config_falls_back_to_defaults() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join(META_DIR)).unwrap();
        std::fs::write(
            tmp.path().join(META_DIR).join("config.toml"),
            "_version = \"1\"\nstop_horizon_months = 0\nprune_orphaned_exceptions = true\n",
        )
        .unwrap();

        let dir = Directory::new(tmp.path().to_path_buf());
        assert_eq!(dir.config(), &Config::default());
    }
}
