use chrono::NaiveDate;

use crate::config::Config;
use crate::domain::{
    Budget, Cents, Ledger, Summary, Transaction, TransactionFilter, TransactionType,
    TransactionUpdate, YearMonth, compute_budget_progress, compute_monthly_category_totals,
    compute_summary, compute_yearly_series, distinct_categories, filter_categories,
    filter_transactions, is_valid_amount,
};
use crate::io::{ExportFormat, Exporter, ImportSummary, Snapshot, parse_snapshot};
use crate::storage::Repository;

use super::{AppError, BudgetReport, MonthlyReport, YearlyReport};

/// Application service providing high-level operations for the ledger.
/// This is the primary interface for any front-end.
///
/// The service owns the loaded ledger. Each mutation is applied to a copy,
/// the copy is persisted in full, and only then does it replace the
/// in-memory ledger, so a failed save leaves both sides unchanged.
pub struct LedgerService {
    repo: Repository,
    storage_key: String,
    ledger: Ledger,
}

impl LedgerService {
    /// Create a service around an already loaded ledger.
    pub fn new(repo: Repository, storage_key: impl Into<String>, ledger: Ledger) -> Self {
        Self {
            repo,
            storage_key: storage_key.into(),
            ledger,
        }
    }

    /// Open (creating if needed) the configured database and load the ledger.
    pub async fn open(config: &Config) -> Result<Self, AppError> {
        let repo = Repository::init(&config.database_url()).await?;
        Self::load(repo, &config.storage_key).await
    }

    /// Load the ledger under `storage_key`, starting empty when none is stored.
    pub async fn load(repo: Repository, storage_key: &str) -> Result<Self, AppError> {
        let ledger = repo.load_ledger(storage_key).await?.unwrap_or_default();
        tracing::info!(
            storage_key,
            transactions = ledger.transactions.len(),
            budgets = ledger.budgets.len(),
            "ledger ready"
        );
        Ok(Self::new(repo, storage_key, ledger))
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Persist the current ledger as is.
    pub async fn save(&self) -> Result<(), AppError> {
        self.repo.save_ledger(&self.storage_key, &self.ledger).await?;
        Ok(())
    }

    async fn commit<T, F>(&mut self, mutate: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut Ledger) -> Result<T, AppError>,
    {
        let mut next = self.ledger.clone();
        let outcome = mutate(&mut next)?;
        self.repo.save_ledger(&self.storage_key, &next).await?;
        self.ledger = next;
        Ok(outcome)
    }

    // ========================
    // Transaction operations
    // ========================

    /// Record a new transaction with a fresh id and creation timestamp.
    pub async fn add_transaction(
        &mut self,
        kind: TransactionType,
        description: impl Into<String>,
        amount_cents: Cents,
        category: impl Into<String>,
        date: NaiveDate,
    ) -> Result<Transaction, AppError> {
        let transaction = Transaction::new(kind, description, amount_cents, category, date);
        self.record_transaction(transaction).await
    }

    /// Record a fully built transaction. Its id must not already exist.
    pub async fn record_transaction(
        &mut self,
        transaction: Transaction,
    ) -> Result<Transaction, AppError> {
        check_amount(transaction.amount_cents)?;
        let added = self
            .commit(|ledger| Ok(ledger.add_transaction(transaction)?.clone()))
            .await?;
        tracing::info!(id = %added.id, kind = %added.kind, amount_cents = added.amount_cents, "transaction added");
        Ok(added)
    }

    pub fn get_transaction(&self, id: &str) -> Result<&Transaction, AppError> {
        self.ledger
            .find_transaction(id)
            .ok_or_else(|| AppError::TransactionNotFound(id.to_string()))
    }

    /// Change the supplied fields of an existing transaction.
    pub async fn edit_transaction(
        &mut self,
        id: &str,
        update: TransactionUpdate,
    ) -> Result<Transaction, AppError> {
        if update.is_empty() {
            return Err(AppError::InvalidInput("nothing to change".to_string()));
        }
        if let Some(amount_cents) = update.amount_cents {
            check_amount(amount_cents)?;
        }
        let edited = self
            .commit(|ledger| Ok(ledger.edit_transaction(id, update)?.clone()))
            .await?;
        tracing::info!(id, "transaction edited");
        Ok(edited)
    }

    /// Delete a transaction. Unknown ids are a no-op and nothing is written.
    pub async fn delete_transaction(&mut self, id: &str) -> Result<Option<Transaction>, AppError> {
        if self.ledger.find_transaction(id).is_none() {
            tracing::debug!(id, "delete of unknown transaction ignored");
            return Ok(None);
        }
        let removed = self
            .commit(|ledger| Ok(ledger.delete_transaction(id)))
            .await?;
        tracing::info!(id, "transaction deleted");
        Ok(removed)
    }

    // ========================
    // Budget operations
    // ========================

    /// Set the monthly limit for a category, replacing any existing one.
    pub async fn upsert_budget(
        &mut self,
        category: &str,
        amount_cents: Cents,
    ) -> Result<Budget, AppError> {
        if category.trim().is_empty() {
            return Err(AppError::InvalidInput("budget category is empty".to_string()));
        }
        check_amount(amount_cents)?;
        let budget = self
            .commit(|ledger| Ok(ledger.upsert_budget(category, amount_cents).clone()))
            .await?;
        tracing::info!(category, amount_cents, "budget set");
        Ok(budget)
    }

    pub async fn remove_budget(&mut self, category: &str) -> Result<Budget, AppError> {
        let removed = self
            .commit(|ledger| {
                ledger
                    .remove_budget(category)
                    .ok_or_else(|| AppError::BudgetNotFound(category.to_string()))
            })
            .await?;
        tracing::info!(category, "budget removed");
        Ok(removed)
    }

    pub fn list_budgets(&self) -> &[Budget] {
        &self.ledger.budgets
    }

    // ========================
    // Views
    // ========================

    pub fn summary(&self) -> Summary {
        compute_summary(&self.ledger.transactions)
    }

    pub fn list_transactions(&self, filter: &TransactionFilter) -> Vec<&Transaction> {
        filter_transactions(&self.ledger.transactions, filter)
    }

    pub fn categories(&self, kind: TransactionType) -> Vec<String> {
        distinct_categories(&self.ledger.transactions, kind)
    }

    pub fn filter_categories(&self) -> Vec<String> {
        filter_categories(&self.ledger.transactions)
    }

    pub fn budget_report(&self, month: YearMonth) -> BudgetReport {
        BudgetReport {
            month,
            budgets: compute_budget_progress(&self.ledger.budgets, &self.ledger.transactions, month),
        }
    }

    pub fn monthly_report(&self, month: YearMonth) -> MonthlyReport {
        let transactions = &self.ledger.transactions;
        MonthlyReport {
            month,
            summary: compute_summary(transactions.iter().filter(|t| t.in_month(month))),
            categories: compute_monthly_category_totals(transactions, month),
        }
    }

    pub fn yearly_report(&self, year: i32) -> YearlyReport {
        use chrono::Datelike;

        let transactions = &self.ledger.transactions;
        YearlyReport {
            series: compute_yearly_series(transactions, year),
            summary: compute_summary(transactions.iter().filter(|t| t.date.year() == year)),
        }
    }

    // ========================
    // Import / export
    // ========================

    pub fn export_snapshot(&self, format: ExportFormat) -> Result<Snapshot, AppError> {
        Ok(Exporter::new(&self.ledger).snapshot(format)?)
    }

    /// Replace the whole ledger with a JSON snapshot. With `dry_run` the
    /// snapshot is only validated.
    pub async fn import_snapshot(
        &mut self,
        content: &str,
        dry_run: bool,
    ) -> Result<ImportSummary, AppError> {
        let imported = parse_snapshot(content)
            .map_err(|e| AppError::InvalidInput(format!("{e:#}")))?;
        let summary = ImportSummary::of(&imported);
        if dry_run {
            return Ok(summary);
        }

        self.commit(|ledger| {
            *ledger = imported;
            Ok(())
        })
        .await?;
        tracing::info!(
            transactions = summary.transactions,
            budgets = summary.budgets,
            "ledger replaced from snapshot"
        );
        Ok(summary)
    }
}

fn check_amount(amount_cents: Cents) -> Result<(), AppError> {
    if is_valid_amount(amount_cents) {
        Ok(())
    } else {
        Err(AppError::InvalidInput(format!(
            "amount out of range: {amount_cents} cents"
        )))
    }
}
