use std::path::PathBuf;

use crate::storage::DEFAULT_STORAGE_KEY;

pub const DEFAULT_DATABASE_PATH: &str = "fintrack.db";

/// Runtime settings, resolved once by the front-end and passed down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// SQLite file holding the key-value table
    pub database_path: PathBuf,
    /// Key the ledger blob lives under
    pub storage_key: String,
    /// 0 = warnings only, 1 = info, 2+ = debug
    pub verbosity: u8,
}

impl Config {
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            verbosity: 0,
        }
    }

    pub fn with_storage_key(mut self, storage_key: impl Into<String>) -> Self {
        self.storage_key = storage_key.into();
        self
    }

    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// SQLite URL that creates the file on first use.
    pub fn database_url(&self) -> String {
        format!("sqlite:{}?mode=rwc", self.database_path.display())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_DATABASE_PATH)
    }
}
