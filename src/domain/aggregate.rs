//! Derived views over a ledger: totals, filtered listings, budget progress
//! and chart series. Every function here is pure and total; none of them
//! mutate their input.

use std::cmp::Ordering;

use serde::Serialize;

use super::{Budget, Cents, Transaction, TransactionType, YearMonth, default_categories};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub income_total: Cents,
    pub expense_total: Cents,
    pub balance: Cents,
}

/// Income and expense totals, and their difference.
pub fn compute_summary<'a, I>(transactions: I) -> Summary
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let (income_total, expense_total) =
        transactions
            .into_iter()
            .fold((0, 0), |(income, expense), t| match t.kind {
                TransactionType::Income => (add_cents(income, t.amount_cents), expense),
                TransactionType::Expense => (income, add_cents(expense, t.amount_cents)),
            });

    Summary {
        income_total,
        expense_total,
        balance: income_total.saturating_sub(expense_total),
    }
}

/// Saturating sum. Input amounts are range-checked, so only ledgers built in
/// code can reach the bounds.
fn add_cents(total: Cents, amount: Cents) -> Cents {
    total.saturating_add(amount)
}

/// Criteria for the transaction listing. `None` passes everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub kind: Option<TransactionType>,
    pub category: Option<String>,
    pub month: Option<YearMonth>,
}

impl TransactionFilter {
    /// Build a filter from selector values, where `"all"` (or an empty
    /// month) means no restriction.
    pub fn from_selectors(kind: &str, category: &str, month: &str) -> Result<Self, FilterError> {
        let kind = match kind.trim() {
            "" | "all" => None,
            other => Some(
                TransactionType::from_str(other)
                    .ok_or_else(|| FilterError::UnknownType(other.to_string()))?,
            ),
        };
        let category = match category {
            "" | "all" => None,
            other => Some(other.to_string()),
        };
        let month = match month.trim() {
            "" => None,
            other => Some(
                other
                    .parse()
                    .map_err(|_| FilterError::InvalidMonth(other.to_string()))?,
            ),
        };
        Ok(Self {
            kind,
            category,
            month,
        })
    }

    pub fn matches(&self, transaction: &Transaction) -> bool {
        self.kind.is_none_or(|kind| transaction.kind == kind)
            && self
                .category
                .as_deref()
                .is_none_or(|category| transaction.category == category)
            && self.month.is_none_or(|month| transaction.in_month(month))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("unknown transaction type '{0}', expected all, income or expense")]
    UnknownType(String),

    #[error("invalid month '{0}', expected YYYY-MM")]
    InvalidMonth(String),
}

/// Listing order: newest date first, then most recently created, then id.
pub fn newest_first(a: &Transaction, b: &Transaction) -> Ordering {
    b.date
        .cmp(&a.date)
        .then_with(|| b.timestamp.cmp(&a.timestamp))
        .then_with(|| a.id.cmp(&b.id))
}

/// Transactions passing every criterion of the filter, newest first.
pub fn filter_transactions<'a>(
    transactions: &'a [Transaction],
    filter: &TransactionFilter,
) -> Vec<&'a Transaction> {
    let mut matched: Vec<&Transaction> = transactions.iter().filter(|t| filter.matches(t)).collect();
    matched.sort_by(|a, b| newest_first(a, b));
    matched
}

/// Selectable categories for a type: the defaults, then any others seen in
/// the data in first-seen order.
pub fn distinct_categories(transactions: &[Transaction], kind: TransactionType) -> Vec<String> {
    let mut categories: Vec<String> = default_categories(kind)
        .iter()
        .map(|c| c.to_string())
        .collect();

    for transaction in transactions.iter().filter(|t| t.kind == kind) {
        if !categories.contains(&transaction.category) {
            categories.push(transaction.category.clone());
        }
    }
    categories
}

/// Categories for the listing selector: every income category, followed by
/// the expense categories not already present.
pub fn filter_categories(transactions: &[Transaction]) -> Vec<String> {
    let mut categories = distinct_categories(transactions, TransactionType::Income);
    for category in distinct_categories(transactions, TransactionType::Expense) {
        if !categories.contains(&category) {
            categories.push(category);
        }
    }
    categories
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetProgress {
    pub category: String,
    pub limit: Cents,
    pub spent: Cents,
    /// Share of the limit used, rounded, always within 0..=100
    pub percentage: u32,
    /// May be negative once overspent
    pub remaining: Cents,
}

impl BudgetProgress {
    pub fn is_over(&self) -> bool {
        self.remaining < 0
    }
}

/// Spending against each budget within a month, in budget order.
pub fn compute_budget_progress(
    budgets: &[Budget],
    transactions: &[Transaction],
    month: YearMonth,
) -> Vec<BudgetProgress> {
    budgets
        .iter()
        .map(|budget| {
            let spent: Cents = transactions
                .iter()
                .filter(|t| t.is_expense() && t.category == budget.category && t.in_month(month))
                .fold(0, |total, t| add_cents(total, t.amount_cents));

            BudgetProgress {
                category: budget.category.clone(),
                limit: budget.amount_cents,
                spent,
                percentage: percentage_used(spent, budget.amount_cents),
                remaining: budget.amount_cents.saturating_sub(spent),
            }
        })
        .collect()
}

/// round(spent / limit * 100), half up, clamped to 0..=100.
/// A limit of zero or less counts as fully used once anything is spent.
fn percentage_used(spent: Cents, limit: Cents) -> u32 {
    if limit <= 0 {
        return if spent > 0 { 100 } else { 0 };
    }
    let (spent, limit) = (i128::from(spent), i128::from(limit));
    let rounded = (spent * 200 + limit).div_euclid(2 * limit);
    rounded.clamp(0, 100) as u32
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Cents,
    pub count: usize,
    /// Share of the total for the same transaction type
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonthlyCategoryTotals {
    pub income: Vec<CategoryTotal>,
    pub expense: Vec<CategoryTotal>,
}

/// Per-category sums for one month, split by type, categories in
/// first-seen order.
pub fn compute_monthly_category_totals(
    transactions: &[Transaction],
    month: YearMonth,
) -> MonthlyCategoryTotals {
    let in_month = |kind: TransactionType| {
        transactions
            .iter()
            .filter(move |t| t.kind == kind && t.in_month(month))
    };

    MonthlyCategoryTotals {
        income: totals_by_category(in_month(TransactionType::Income)),
        expense: totals_by_category(in_month(TransactionType::Expense)),
    }
}

fn totals_by_category<'a>(transactions: impl Iterator<Item = &'a Transaction>) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for transaction in transactions {
        match totals.iter_mut().find(|c| c.category == transaction.category) {
            Some(entry) => {
                entry.total = add_cents(entry.total, transaction.amount_cents);
                entry.count += 1;
            }
            None => totals.push(CategoryTotal {
                category: transaction.category.clone(),
                total: transaction.amount_cents,
                count: 1,
                percentage: 0.0,
            }),
        }
    }

    let grand_total = totals.iter().fold(0, |sum, c| add_cents(sum, c.total));
    if grand_total != 0 {
        for entry in &mut totals {
            entry.percentage = entry.total as f64 * 100.0 / grand_total as f64;
        }
    }
    totals
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearlySeries {
    pub year: i32,
    /// Index 0 is January
    pub income: [Cents; 12],
    pub expense: [Cents; 12],
}

impl YearlySeries {
    pub fn net(&self) -> [Cents; 12] {
        std::array::from_fn(|i| self.income[i].saturating_sub(self.expense[i]))
    }
}

/// Monthly income and expense totals for one calendar year.
pub fn compute_yearly_series(transactions: &[Transaction], year: i32) -> YearlySeries {
    use chrono::Datelike;

    let mut series = YearlySeries {
        year,
        income: [0; 12],
        expense: [0; 12],
    };

    for transaction in transactions.iter().filter(|t| t.date.year() == year) {
        let index = transaction.date.month0() as usize;
        let slot = match transaction.kind {
            TransactionType::Income => &mut series.income[index],
            TransactionType::Expense => &mut series.expense[index],
        };
        *slot = add_cents(*slot, transaction.amount_cents);
    }
    series
}
