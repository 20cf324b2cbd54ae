use super::TransactionType;

pub const DEFAULT_EXPENSE_CATEGORIES: [&str; 9] = [
    "Food",
    "Housing",
    "Transportation",
    "Entertainment",
    "Utilities",
    "Healthcare",
    "Personal",
    "Education",
    "Other",
];

pub const DEFAULT_INCOME_CATEGORIES: [&str; 5] =
    ["Salary", "Freelance", "Investments", "Gifts", "Other"];

/// Categories offered for a transaction type before any data exists.
pub fn default_categories(kind: TransactionType) -> &'static [&'static str] {
    match kind {
        TransactionType::Income => &DEFAULT_INCOME_CATEGORIES,
        TransactionType::Expense => &DEFAULT_EXPENSE_CATEGORIES,
    }
}
