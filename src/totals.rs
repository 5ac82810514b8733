use crate::schema::{Transaction, TransactionKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub revenue: f64,
    pub expenses: f64,
    pub net_profit: f64,
    /// Percentage of revenue kept as profit; 0 when there is no revenue.
    pub profit_margin: f64,
    pub transaction_count: usize,
}

pub fn totals(filtered: &[Transaction]) -> Totals {
    let (revenue, expenses) =
        filtered
            .iter()
            .fold((0.0, 0.0), |(revenue, expenses), tx| match tx.kind {
                TransactionKind::Income => (revenue + tx.amount, expenses),
                TransactionKind::Expense => (revenue, expenses + tx.amount),
            });

    let net_profit = revenue - expenses;

    Totals {
        revenue,
        expenses,
        net_profit,
        profit_margin: profit_margin(revenue, net_profit),
        transaction_count: filtered.len(),
    }
}

pub fn profit_margin(revenue: f64, net_profit: f64) -> f64 {
    if revenue > 0.0 {
        net_profit / revenue * 100.0
    } else {
        0.0
    }
}
