// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::NaiveDate;
use fintrack::Config;
use fintrack::application::LedgerService;
use fintrack::domain::{Transaction, TransactionType};
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let service = LedgerService::open(&test_config(&temp_dir)).await?;
    Ok((service, temp_dir))
}

/// Config pointing at a database inside the temporary directory
pub fn test_config(temp_dir: &TempDir) -> Config {
    Config::new(temp_dir.path().join("test.db"))
}

/// Reopen the database a service was created on, as a fresh process would
pub async fn reopen(temp_dir: &TempDir) -> Result<LedgerService> {
    Ok(LedgerService::open(&test_config(temp_dir)).await?)
}

/// Helper to parse a date string into NaiveDate
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Test fixture: a small ledger spanning two years
pub struct StandardLedger;

impl StandardLedger {
    /// Salary and food in January 2024, rent and freelance in February 2024,
    /// one late-December 2023 expense
    pub async fn create(service: &mut LedgerService) -> Result<()> {
        let entries = [
            (TransactionType::Income, "Paycheck", 100000, "Salary", "2024-01-05"),
            (TransactionType::Expense, "Groceries", 30000, "Food", "2024-01-10"),
            (TransactionType::Expense, "Rent", 120000, "Housing", "2024-02-01"),
            (TransactionType::Income, "Logo design", 25000, "Freelance", "2024-02-14"),
            (TransactionType::Expense, "New year party", 4550, "Entertainment", "2023-12-31"),
        ];
        for (kind, description, amount, category, date) in entries {
            service
                .add_transaction(kind, description, amount, category, parse_date(date))
                .await?;
        }
        Ok(())
    }

    /// Expense record with a fixed id, for tests that need to refer to it
    pub fn expense(id: &str, amount: i64, category: &str, date: &str) -> Transaction {
        Transaction::new(TransactionType::Expense, id, amount, category, parse_date(date)).with_id(id)
    }
}
