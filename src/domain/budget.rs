use serde::{Deserialize, Serialize};

use super::{Cents, decimal_units};

/// A monthly spending limit for one expense category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    /// Unique within a ledger
    pub category: String,
    /// Monthly limit, serialized as decimal currency units under `amount`
    #[serde(rename = "amount", with = "decimal_units")]
    pub amount_cents: Cents,
}

impl Budget {
    pub fn new(category: impl Into<String>, amount_cents: Cents) -> Self {
        Self {
            category: category.into(),
            amount_cents,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_serialized_layout() {
        let budget = Budget::new("Food", 50000);
        let json = serde_json::to_string(&budget).unwrap();
        assert_eq!(json, r#"{"category":"Food","amount":500}"#);

        let parsed: Budget = serde_json::from_str(r#"{"category":"Food","amount":499.99}"#).unwrap();
        assert_eq!(parsed.amount_cents, 49999);
    }
}
