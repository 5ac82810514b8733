use crate::schema::{Transaction, TransactionKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

/// Sums `kind` records per exact category label, largest first. Records
/// without a category are left out; there is no "Uncategorized" bucket.
/// Equal totals keep category name order.
pub fn category_breakdown(filtered: &[Transaction], kind: TransactionKind) -> Vec<CategoryTotal> {
    let mut groups: BTreeMap<&str, f64> = BTreeMap::new();

    for tx in filtered.iter().filter(|tx| tx.kind == kind) {
        if let Some(category) = tx.category.as_deref() {
            *groups.entry(category).or_insert(0.0) += tx.amount;
        }
    }

    let mut breakdown: Vec<CategoryTotal> = groups
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_string(),
            total,
        })
        .collect();

    breakdown.sort_by(|a, b| b.total.total_cmp(&a.total));
    breakdown
}
