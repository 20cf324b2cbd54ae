use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Budget, Cents, Transaction, TransactionUpdate};

/// The full collection of transactions and budgets.
///
/// Serialized as `{"transactions": [...], "budgets": [...]}`, the single blob
/// kept in storage. Transactions stay in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub budgets: Vec<Budget>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty() && self.budgets.is_empty()
    }

    pub fn find_transaction(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    pub fn find_budget(&self, category: &str) -> Option<&Budget> {
        self.budgets.iter().find(|b| b.category == category)
    }

    /// Append a transaction. Ids must stay unique.
    pub fn add_transaction(&mut self, transaction: Transaction) -> Result<&Transaction, LedgerError> {
        if self.find_transaction(&transaction.id).is_some() {
            return Err(LedgerError::DuplicateTransactionId(transaction.id));
        }
        self.transactions.push(transaction);
        Ok(&self.transactions[self.transactions.len() - 1])
    }

    pub fn edit_transaction(
        &mut self,
        id: &str,
        update: TransactionUpdate,
    ) -> Result<&Transaction, LedgerError> {
        let transaction = self
            .transactions
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| LedgerError::TransactionNotFound(id.to_string()))?;
        transaction.apply(update);
        Ok(&*transaction)
    }

    /// Remove exactly the transaction with this id. Unknown ids are a no-op.
    pub fn delete_transaction(&mut self, id: &str) -> Option<Transaction> {
        let index = self.transactions.iter().position(|t| t.id == id)?;
        Some(self.transactions.remove(index))
    }

    /// Set the monthly limit for a category, overwriting any existing budget.
    pub fn upsert_budget(&mut self, category: &str, amount_cents: Cents) -> &Budget {
        match self.budgets.iter().position(|b| b.category == category) {
            Some(index) => {
                self.budgets[index].amount_cents = amount_cents;
                &self.budgets[index]
            }
            None => {
                self.budgets.push(Budget::new(category, amount_cents));
                &self.budgets[self.budgets.len() - 1]
            }
        }
    }

    pub fn remove_budget(&mut self, category: &str) -> Option<Budget> {
        let index = self.budgets.iter().position(|b| b.category == category)?;
        Some(self.budgets.remove(index))
    }

    /// Collapse budgets sharing a category into one, keeping the position of
    /// the first and the amount of the last.
    pub fn dedup_budgets(&mut self) {
        let mut merged: Vec<Budget> = Vec::with_capacity(self.budgets.len());
        for budget in self.budgets.drain(..) {
            match merged.iter_mut().find(|b| b.category == budget.category) {
                Some(existing) => existing.amount_cents = budget.amount_cents,
                None => merged.push(budget),
            }
        }
        self.budgets = merged;
    }

    /// Check the collection invariants.
    pub fn validate(&self) -> Result<(), LedgerError> {
        let mut seen = HashSet::with_capacity(self.transactions.len());
        for transaction in &self.transactions {
            if !seen.insert(transaction.id.as_str()) {
                return Err(LedgerError::DuplicateTransactionId(transaction.id.clone()));
            }
        }

        let mut categories = HashSet::with_capacity(self.budgets.len());
        for budget in &self.budgets {
            if !categories.insert(budget.category.as_str()) {
                return Err(LedgerError::DuplicateBudget(budget.category.clone()));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    #[error("Duplicate transaction id: {0}")]
    DuplicateTransactionId(String),

    #[error("More than one budget for category: {0}")]
    DuplicateBudget(String),
}
