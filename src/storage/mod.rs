mod repository;

pub use repository::*;

/// SQL migration for the key-value table
pub const MIGRATION_001_INITIAL: &str = include_str!("migrations/001_initial.sql");

/// Key the ledger blob is stored under unless configured otherwise
pub const DEFAULT_STORAGE_KEY: &str = "financial_tracker_data";
