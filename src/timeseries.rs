use crate::schema::{Transaction, TransactionKind};
use crate::utils::MonthKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPoint {
    pub month: MonthKey,
    /// Display label such as "Jan 2025". Not used for ordering.
    pub label: String,
    pub revenue: f64,
    pub expenses: f64,
    pub profit: f64,
}

pub type MonthlySeries = Vec<MonthlyPoint>;

#[derive(Default)]
struct MonthAccumulator {
    revenue: f64,
    expenses: f64,
}

/// One point per calendar month that has at least one dated record, oldest
/// first. Undated records are skipped.
pub fn monthly_series(filtered: &[Transaction]) -> MonthlySeries {
    let mut months: BTreeMap<MonthKey, MonthAccumulator> = BTreeMap::new();

    for tx in filtered {
        let Some(date) = tx.date else {
            continue;
        };

        let slot = months.entry(MonthKey::from_date(date)).or_default();
        match tx.kind {
            TransactionKind::Income => slot.revenue += tx.amount,
            TransactionKind::Expense => slot.expenses += tx.amount,
        }
    }

    months
        .into_iter()
        .map(|(month, acc)| MonthlyPoint {
            month,
            label: month.label(),
            revenue: acc.revenue,
            expenses: acc.expenses,
            profit: acc.revenue - acc.expenses,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tx(
        id: i64,
        kind: TransactionKind,
        amount: f64,
        date: Option<(i32, u32, u32)>,
    ) -> Transaction {
        let tx = Transaction::new(id, 1, kind, amount);
        match date {
            Some((y, m, d)) => tx.with_date(NaiveDate::from_ymd_opt(y, m, d).unwrap()),
            None => tx,
        }
    }

    #[test]
    fn test_months_sorted_chronologically() {
        let txs = vec![
            tx(1, TransactionKind::Income, 100.0, Some((2025, 2, 3))),
            tx(2, TransactionKind::Income, 50.0, Some((2024, 12, 31))),
            tx(3, TransactionKind::Expense, 30.0, Some((2025, 1, 15))),
            tx(4, TransactionKind::Income, 70.0, Some((2025, 1, 1))),
        ];

        let series = monthly_series(&txs);
        let labels: Vec<&str> = series.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Dec 2024", "Jan 2025", "Feb 2025"]);

        let jan = &series[1];
        assert_eq!(jan.revenue, 70.0);
        assert_eq!(jan.expenses, 30.0);
        assert_eq!(jan.profit, 40.0);
    }

    #[test]
    fn test_undated_records_are_excluded() {
        let txs = vec![
            tx(1, TransactionKind::Income, 100.0, None),
            tx(2, TransactionKind::Expense, 40.0, Some((2025, 3, 9))),
        ];

        let series = monthly_series(&txs);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].revenue, 0.0);
        assert_eq!(series[0].expenses, 40.0);
        assert_eq!(series[0].profit, -40.0);
    }

    #[test]
    fn test_zero_activity_month_is_kept() {
        let txs = vec![
            tx(1, TransactionKind::Income, 200.0, Some((2025, 4, 1))),
            tx(2, TransactionKind::Expense, 200.0, Some((2025, 4, 20))),
            tx(3, TransactionKind::Income, 0.0, Some((2025, 5, 2))),
        ];

        let series = monthly_series(&txs);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].profit, 0.0);
        assert_eq!(series[1].month, MonthKey::new(2025, 5).unwrap());
        assert_eq!(series[1].revenue, 0.0);
    }

    #[test]
    fn test_empty_input() {
        assert!(monthly_series(&[]).is_empty());
    }
}
