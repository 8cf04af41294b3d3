use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Expense,
    Income,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category: String,
    pub amount: f64,
}

/// Expense totals per category, sorted by category name.
pub fn spending_by_category(transactions: &[Transaction]) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();
    for t in transactions {
        if t.kind != TransactionKind::Expense {
            continue;
        }
        let category = t.category.trim();
        let category = if category.is_empty() {
            "uncategorized"
        } else {
            category
        };
        *totals.entry(category.to_string()).or_insert(0.0) += t.amount;
    }
    totals
}
