use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Cents, YearMonth, decimal_units};

/// Transaction ids are opaque strings. New records get a UUID, but ledgers
/// imported from elsewhere may carry any unique string.
pub type TransactionId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "income" => Some(TransactionType::Income),
            "expense" => Some(TransactionType::Expense),
            _ => None,
        }
    }

    /// Capitalized name used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// A single dated income or expense record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(default)]
    pub description: String,
    /// Serialized as decimal currency units under `amount`
    #[serde(rename = "amount", with = "decimal_units")]
    pub amount_cents: Cents,
    #[serde(default)]
    pub category: String,
    /// Calendar date the money moved, no time of day
    pub date: NaiveDate,
    /// When the record was created, serialized as epoch milliseconds.
    /// Records without one sort as the oldest of their date.
    #[serde(default, with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        kind: TransactionType,
        description: impl Into<String>,
        amount_cents: Cents,
        category: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            description: description.into(),
            amount_cents,
            category: category.into(),
            date,
            // Millisecond precision, matching what gets persisted
            timestamp: Utc::now().trunc_subsecs(3),
        }
    }

    pub fn with_id(mut self, id: impl Into<TransactionId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }

    pub fn in_month(&self, month: YearMonth) -> bool {
        month.contains(self.date)
    }

    /// Apply the supplied fields of an update. Id, type and creation
    /// timestamp never change.
    pub fn apply(&mut self, update: TransactionUpdate) {
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(amount_cents) = update.amount_cents {
            self.amount_cents = amount_cents;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(date) = update.date {
            self.date = date;
        }
    }
}

/// Editable fields of a transaction; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionUpdate {
    pub description: Option<String>,
    pub amount_cents: Option<Cents>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
}

impl TransactionUpdate {
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.amount_cents.is_none()
            && self.category.is_none()
            && self.date.is_none()
    }
}
