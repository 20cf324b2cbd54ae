use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};

use crate::domain::{Ledger, compute_summary, format_cents, format_usd, newest_first};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Text,
    Csv,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Text => "text",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(ExportFormat::Json),
            "text" | "txt" => Some(ExportFormat::Text),
            "csv" => Some(ExportFormat::Csv),
            _ => None,
        }
    }

    pub fn filename(&self) -> &'static str {
        match self {
            ExportFormat::Json => "financial_data.json",
            ExportFormat::Text => "financial_data.txt",
            ExportFormat::Csv => "financial_data.csv",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Text => "text/plain",
            ExportFormat::Csv => "text/csv",
        }
    }
}

/// An exported rendition of the ledger, ready to be written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub content: String,
    pub filename: &'static str,
    pub mime_type: &'static str,
}

impl Snapshot {
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer
            .write_all(self.content.as_bytes())
            .with_context(|| format!("Failed to write {}", self.filename))?;
        writer.flush()?;
        Ok(())
    }
}

/// Renders a ledger in the supported export formats. Never mutates it.
pub struct Exporter<'a> {
    ledger: &'a Ledger,
}

impl<'a> Exporter<'a> {
    pub fn new(ledger: &'a Ledger) -> Self {
        Self { ledger }
    }

    pub fn snapshot(&self, format: ExportFormat) -> Result<Snapshot> {
        let content = match format {
            ExportFormat::Json => self.to_json()?,
            ExportFormat::Text => self.to_text()?,
            ExportFormat::Csv => self.to_csv()?,
        };
        Ok(Snapshot {
            content,
            filename: format.filename(),
            mime_type: format.mime_type(),
        })
    }

    /// Direct serialization of the ledger.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self.ledger).context("Failed to serialize ledger")
    }

    /// Human-readable report: totals, every transaction newest first, then
    /// budgets when there are any.
    pub fn to_text(&self) -> Result<String> {
        let summary = compute_summary(&self.ledger.transactions);
        let mut out = String::new();

        writeln!(out, "FINANCIAL TRACKER SUMMARY")?;
        writeln!(out, "=======================")?;
        writeln!(out)?;
        writeln!(out, "Total Income: {}", format_usd(summary.income_total))?;
        writeln!(out, "Total Expenses: {}", format_usd(summary.expense_total))?;
        writeln!(out, "Balance: {}", format_usd(summary.balance))?;
        writeln!(out)?;
        writeln!(out, "TRANSACTIONS")?;
        writeln!(out, "===========")?;
        writeln!(out)?;

        let mut transactions: Vec<_> = self.ledger.transactions.iter().collect();
        transactions.sort_by(|a, b| newest_first(a, b));
        for t in transactions {
            writeln!(out, "Date: {}", t.date.format("%Y-%m-%d"))?;
            writeln!(out, "Type: {}", t.kind.label())?;
            writeln!(out, "Description: {}", t.description)?;
            writeln!(out, "Category: {}", t.category)?;
            writeln!(out, "Amount: {}", format_usd(t.amount_cents))?;
            writeln!(out)?;
        }

        if !self.ledger.budgets.is_empty() {
            writeln!(out, "BUDGETS")?;
            writeln!(out, "=======")?;
            writeln!(out)?;
            for b in &self.ledger.budgets {
                writeln!(out, "Category: {}", b.category)?;
                writeln!(out, "Monthly Limit: {}", format_usd(b.amount_cents))?;
                writeln!(out)?;
            }
        }

        Ok(out)
    }

    /// Transaction listing in insertion order.
    pub fn to_csv(&self) -> Result<String> {
        let mut csv_writer = csv::Writer::from_writer(Vec::new());

        csv_writer.write_record([
            "id",
            "type",
            "date",
            "description",
            "category",
            "amount",
            "timestamp",
        ])?;

        for t in &self.ledger.transactions {
            csv_writer.write_record([
                t.id.as_str(),
                t.kind.as_str(),
                &t.date.format("%Y-%m-%d").to_string(),
                &t.description,
                &t.category,
                &format_cents(t.amount_cents),
                &t.timestamp.to_rfc3339(),
            ])?;
        }

        let bytes = csv_writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush CSV: {e}"))?;
        String::from_utf8(bytes).context("CSV output is not UTF-8")
    }
}
