use std::{num::NonZeroU32, path::Path};

use serde::{Deserialize, Serialize};

/// How operations treat references to subjects or patterns that do not exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingReferences {
    /// Fail with a not-found error.
    #[default]
    Error,
    /// Log a warning and leave the subject untouched.
    Ignore,
}

/// Configuration for a calendar store.
///
/// This struct holds the settings that decide how pattern operations behave
/// where more than one behaviour is reasonable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// How many months ahead "stop future repeats" materialises exceptions
    /// when no horizon is given explicitly.
    stop_horizon_months: NonZeroU32,

    /// Whether a missing subject or pattern is an error or a silent no-op.
    pub missing_references: MissingReferences,

    /// Whether removing a pattern also removes the exceptions that suppress
    /// its repeats.
    ///
    /// When `false` (default) those exceptions are kept. They stay inert
    /// unless a later pattern happens to generate the same dates.
    pub prune_orphaned_exceptions: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stop_horizon_months: default_stop_horizon_months(),
            missing_references: MissingReferences::default(),
            prune_orphaned_exceptions: false,
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// The default number of months "stop future repeats" looks ahead.
    #[must_use]
    pub const fn stop_horizon_months(&self) -> u32 {
        self.stop_horizon_months.get()
    }

    /// Sets the default stop horizon.
    ///
    /// Returns `false`, leaving the horizon unchanged, if `months` is zero.
    pub const fn set_stop_horizon_months(&mut self, months: u32) -> bool {
        match NonZeroU32::new(months) {
            Some(months) => {
                self.stop_horizon_months = months;
                true
            }
            None => false,
        }
    }
}

const DEFAULT_STOP_HORIZON_MONTHS: NonZeroU32 = NonZeroU32::new(24).unwrap();

const fn default_stop_horizon_months() -> NonZeroU32 {
    DEFAULT_STOP_HORIZON_MONTHS
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_stop_horizon_months")]
        stop_horizon_months: NonZeroU32,

        #[serde(default)]
        missing_references: MissingReferences,

        #[serde(default)]
        prune_orphaned_exceptions: bool,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                stop_horizon_months,
                missing_references,
                prune_orphaned_exceptions,
            } => Self {
                stop_horizon_months,
                missing_references,
                prune_orphaned_exceptions,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            stop_horizon_months: config.stop_horizon_months,
            missing_references: config.missing_references,
            prune_orphaned_exceptions: config.prune_orphaned_exceptions,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\nstop_horizon_months = 6\nmissing_references = \"ignore\"\nprune_orphaned_exceptions = true\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.stop_horizon_months(), 6);
        assert_eq!(config.missing_references, MissingReferences::Ignore);
        assert!(config.prune_orphaned_exceptions);
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(error.starts_with("Failed to read config file:"));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nmissing_references = \"panic\"\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.starts_with("Failed to parse config file:"));
    }

    #[test]
    fn zero_stop_horizon_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nstop_horizon_months = 0\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.starts_with("Failed to parse config file:"));
    }

    #[test]
    fn empty_file_returns_default() {
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
        assert_eq!(actual.stop_horizon_months(), 24);
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");

        let mut config = Config::default();
        assert!(config.set_stop_horizon_months(12));
        assert!(!config.set_stop_horizon_months(0));
        config.prune_orphaned_exceptions = true;
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }
}
