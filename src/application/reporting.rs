use serde::Serialize;

use crate::domain::{BudgetProgress, MonthlyCategoryTotals, Summary, YearMonth, YearlySeries};

/// Everything shown for one month: totals and per-category breakdowns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyReport {
    pub month: YearMonth,
    pub summary: Summary,
    pub categories: MonthlyCategoryTotals,
}

/// Month-by-month series for one year, plus the year's totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearlyReport {
    pub series: YearlySeries,
    pub summary: Summary,
}

/// Budget progress for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetReport {
    pub month: YearMonth,
    pub budgets: Vec<BudgetProgress>,
}
