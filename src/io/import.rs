use std::io::Read;

use anyhow::{Context, Result};

use crate::domain::Ledger;

/// What an import would bring in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub transactions: usize,
    pub budgets: usize,
}

impl ImportSummary {
    pub fn of(ledger: &Ledger) -> Self {
        Self {
            transactions: ledger.transactions.len(),
            budgets: ledger.budgets.len(),
        }
    }
}

/// Parse a JSON snapshot into a ledger ready to replace the current one.
///
/// Repeated budget categories are collapsed (last amount wins); repeated
/// transaction ids are rejected.
pub fn parse_snapshot(content: &str) -> Result<Ledger> {
    let mut ledger: Ledger =
        serde_json::from_str(content).context("Snapshot is not a valid ledger JSON document")?;

    let before = ledger.budgets.len();
    ledger.dedup_budgets();
    if ledger.budgets.len() != before {
        tracing::warn!(
            collapsed = before - ledger.budgets.len(),
            "snapshot had repeated budget categories"
        );
    }

    ledger.validate().context("Snapshot failed validation")?;
    Ok(ledger)
}

/// Read and parse a JSON snapshot.
pub fn read_snapshot<R: Read>(mut reader: R) -> Result<Ledger> {
    let mut content = String::new();
    reader
        .read_to_string(&mut content)
        .context("Failed to read snapshot")?;
    parse_snapshot(&content)
}
