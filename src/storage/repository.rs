use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use crate::domain::Ledger;

use super::MIGRATION_001_INITIAL;

/// Repository persisting whole ledgers as JSON blobs in a SQLite key-value
/// table. Every save overwrites the entire blob for its key.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .with_context(|| format!("Failed to connect to database: {database_url}"))?;
        Ok(Self::new(pool))
    }

    /// Create the key-value table if missing.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Connect and migrate.
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    /// Load the ledger stored under `key`.
    ///
    /// Repeated budget categories collapse into one, the last amount winning.
    /// A missing row, an unreadable blob and one with repeated transaction
    /// ids all come back as `None`; only database failures are errors.
    pub async fn load_ledger(&self, key: &str) -> Result<Option<Ledger>> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to read ledger")?;

        let Some(row) = row else {
            tracing::debug!(key, "no stored ledger");
            return Ok(None);
        };

        let value: String = row.get("value");
        let mut ledger = match serde_json::from_str::<Ledger>(&value) {
            Ok(ledger) => ledger,
            Err(err) => {
                tracing::warn!(key, "discarding unreadable stored ledger: {err}");
                return Ok(None);
            }
        };

        let budgets = ledger.budgets.len();
        ledger.dedup_budgets();
        if ledger.budgets.len() != budgets {
            tracing::warn!(
                key,
                collapsed = budgets - ledger.budgets.len(),
                "stored ledger had repeated budget categories"
            );
        }
        if let Err(err) = ledger.validate() {
            tracing::warn!(key, "discarding inconsistent stored ledger: {err}");
            return Ok(None);
        }

        tracing::debug!(
            key,
            transactions = ledger.transactions.len(),
            budgets = ledger.budgets.len(),
            "loaded ledger"
        );
        Ok(Some(ledger))
    }

    /// Serialize and store the whole ledger under `key`.
    pub async fn save_ledger(&self, key: &str, ledger: &Ledger) -> Result<()> {
        let value = serde_json::to_string(ledger).context("Failed to serialize ledger")?;
        self.put_raw(key, &value)
            .await
            .context("Failed to save ledger")?;

        tracing::debug!(key, bytes = value.len(), "saved ledger");
        Ok(())
    }

    /// When the blob under `key` was last written.
    pub async fn last_saved(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        let row = sqlx::query("SELECT updated_at FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to read ledger metadata")?;

        row.map(|row| {
            let updated_at: String = row.get("updated_at");
            DateTime::parse_from_rfc3339(&updated_at)
                .map(|dt| dt.with_timezone(&Utc))
                .context("Invalid updated_at timestamp")
        })
        .transpose()
    }

    /// Store raw text under `key`, bypassing serialization.
    pub async fn put_raw(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to write key {key}"))?;
        Ok(())
    }
}
