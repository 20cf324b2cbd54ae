use thiserror::Error;

use crate::domain::{FilterError, LedgerError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    #[error("Budget not found: {0}")]
    BudgetNotFound(String),

    #[error("Duplicate transaction id: {0}")]
    DuplicateTransactionId(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::TransactionNotFound(id) => AppError::TransactionNotFound(id),
            LedgerError::DuplicateTransactionId(id) => AppError::DuplicateTransactionId(id),
            other @ LedgerError::DuplicateBudget(_) => AppError::InvalidInput(other.to_string()),
        }
    }
}

impl From<FilterError> for AppError {
    fn from(err: FilterError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}
