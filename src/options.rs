use crate::ingestion::LedgerSnapshot;
use crate::schema::{Entity, TransactionKind};
use crate::utils::months_between;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The values a caller can offer in each filter control for a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    /// Sorted by name.
    pub entities: Vec<Entity>,
    pub income_categories: Vec<String>,
    pub expense_categories: Vec<String>,
    pub earliest_date: Option<NaiveDate>,
    pub latest_date: Option<NaiveDate>,
    /// Number of calendar months between the earliest and latest dates, inclusive.
    pub months_covered: usize,
}

impl FilterOptions {
    pub fn from_snapshot(snapshot: &LedgerSnapshot) -> Self {
        let mut income_categories = BTreeSet::new();
        let mut expense_categories = BTreeSet::new();

        for tx in &snapshot.transactions {
            if let Some(category) = &tx.category {
                match tx.kind {
                    TransactionKind::Income => income_categories.insert(category.clone()),
                    TransactionKind::Expense => expense_categories.insert(category.clone()),
                };
            }
        }

        let dates = snapshot.transactions.iter().filter_map(|tx| tx.date);
        let earliest_date = dates.clone().min();
        let latest_date = dates.max();

        let months_covered = match (earliest_date, latest_date) {
            (Some(start), Some(end)) => months_between(start, end) as usize + 1,
            _ => 0,
        };

        let mut entities = snapshot.entities.clone();
        entities.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

        Self {
            entities,
            income_categories: income_categories.into_iter().collect(),
            expense_categories: expense_categories.into_iter().collect(),
            earliest_date,
            latest_date,
            months_covered,
        }
    }

    pub fn categories_for(&self, kind: TransactionKind) -> &[String] {
        match kind {
            TransactionKind::Income => &self.income_categories,
            TransactionKind::Expense => &self.expense_categories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Transaction;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_options_from_snapshot() {
        let snapshot = LedgerSnapshot::new(
            1,
            vec![
                Transaction::new(1, 2, TransactionKind::Income, 10.0)
                    .with_category("Rent")
                    .with_date(date(2024, 11, 3)),
                Transaction::new(2, 1, TransactionKind::Expense, 5.0)
                    .with_category("Cleaning")
                    .with_date(date(2025, 2, 14)),
                Transaction::new(3, 1, TransactionKind::Expense, 5.0).with_category("Cleaning"),
                Transaction::new(4, 1, TransactionKind::Income, 5.0).with_category("Deposits"),
                Transaction::new(5, 1, TransactionKind::Income, 5.0),
            ],
            vec![Entity::new(2, "Villa B"), Entity::new(1, "Villa A")],
        );

        let options = FilterOptions::from_snapshot(&snapshot);

        let names: Vec<&str> = options.entities.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Villa A", "Villa B"]);
        assert_eq!(options.income_categories, vec!["Deposits", "Rent"]);
        assert_eq!(options.categories_for(TransactionKind::Expense), ["Cleaning"]);
        assert_eq!(options.earliest_date, Some(date(2024, 11, 3)));
        assert_eq!(options.latest_date, Some(date(2025, 2, 14)));
        assert_eq!(options.months_covered, 4);
    }

    #[test]
    fn test_options_for_empty_snapshot() {
        let options = FilterOptions::from_snapshot(&LedgerSnapshot::default());
        assert_eq!(options, FilterOptions::default());
        assert_eq!(options.months_covered, 0);
    }
}
