use crate::breakdown::{category_breakdown, CategoryTotal};
use crate::config::AnalyticsConfig;
use crate::error::Result;
use crate::filter::{filter, FilterState};
use crate::ingestion::LedgerSnapshot;
use crate::ranking::{top_entities_labeled, EntityRevenue};
use crate::schema::TransactionKind;
use crate::timeseries::{monthly_series, MonthlySeries};
use crate::totals::{totals, Totals};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Every derived view for one snapshot under one filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub snapshot_version: u64,
    pub filter: FilterState,
    pub totals: Totals,
    pub monthly: MonthlySeries,
    pub income_by_category: Vec<CategoryTotal>,
    pub expenses_by_category: Vec<CategoryTotal>,
    pub top_entities: Vec<EntityRevenue>,
    /// False when the filter pins a single property, making the ranking trivial.
    pub ranking_applicable: bool,
}

impl DashboardView {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn monthly_to_csv(&self) -> String {
        let mut output = String::new();
        output.push_str("Month,Label,Revenue,Expenses,Profit\n");

        for point in &self.monthly {
            output.push_str(&format!(
                "{},{},{:.2},{:.2},{:.2}\n",
                point.month, point.label, point.revenue, point.expenses, point.profit
            ));
        }

        output
    }
}

pub struct Dashboard {
    config: AnalyticsConfig,
}

impl Dashboard {
    pub fn new(config: AnalyticsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    pub fn compute(&self, snapshot: &LedgerSnapshot, state: &FilterState) -> DashboardView {
        let filtered = filter(&snapshot.transactions, state);

        debug!(
            "Filter {:?} kept {} of {} transactions",
            state,
            filtered.len(),
            snapshot.transactions.len()
        );

        let view = DashboardView {
            snapshot_version: snapshot.version,
            filter: state.clone(),
            totals: totals(&filtered),
            monthly: monthly_series(&filtered),
            income_by_category: category_breakdown(&filtered, TransactionKind::Income),
            expenses_by_category: category_breakdown(&filtered, TransactionKind::Expense),
            top_entities: top_entities_labeled(
                &filtered,
                &snapshot.entities,
                self.config.ranking_limit,
                &self.config.unknown_entity_label,
            ),
            ranking_applicable: state.entity_id.is_none(),
        };

        info!(
            "Computed dashboard for snapshot v{}: revenue {:.2}, expenses {:.2}, {} months",
            snapshot.version,
            view.totals.revenue,
            view.totals.expenses,
            view.monthly.len()
        );

        view
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(AnalyticsConfig::default())
    }
}

/// Memoizes dashboard views by `(snapshot version, filter)`. Callers must bump
/// the snapshot version whenever its contents change.
///
/// Views for older versions are dropped on the next miss. Within one version
/// the cache holds one view per distinct filter and is not bounded; call
/// [`DashboardCache::invalidate`] to release them.
pub struct DashboardCache {
    dashboard: Dashboard,
    views: HashMap<(u64, FilterState), DashboardView>,
    hits: u64,
    misses: u64,
}

impl DashboardCache {
    pub fn new(dashboard: Dashboard) -> Self {
        Self {
            dashboard,
            views: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    pub fn get_or_compute(
        &mut self,
        snapshot: &LedgerSnapshot,
        state: &FilterState,
    ) -> &DashboardView {
        let key = (snapshot.version, state.clone());

        if self.views.contains_key(&key) {
            self.hits += 1;
            debug!("Dashboard cache hit for snapshot v{}", snapshot.version);
        } else {
            self.misses += 1;
            // Views for older snapshot versions can never be requested again
            self.views.retain(|(version, _), _| *version == snapshot.version);
        }

        let dashboard = &self.dashboard;
        self.views
            .entry(key)
            .or_insert_with(|| dashboard.compute(snapshot, state))
    }

    pub fn invalidate(&mut self) {
        self.views.clear();
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Entity, Transaction};
    use chrono::NaiveDate;

    fn snapshot(version: u64) -> LedgerSnapshot {
        let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        LedgerSnapshot::new(
            version,
            vec![
                Transaction::new(1, 1, TransactionKind::Income, 1000.0)
                    .with_category("Rent")
                    .with_date(date(2025, 1, 5)),
                Transaction::new(2, 1, TransactionKind::Expense, 200.0)
                    .with_category("Cleaning")
                    .with_date(date(2025, 1, 10)),
                Transaction::new(3, 2, TransactionKind::Income, 500.0)
                    .with_category("Rent")
                    .with_date(date(2025, 2, 1)),
            ],
            vec![Entity::new(1, "Villa A"), Entity::new(2, "Villa B")],
        )
    }

    #[test]
    fn test_compute_all_views() {
        let view = Dashboard::default().compute(&snapshot(1), &FilterState::new());

        assert_eq!(view.totals.revenue, 1500.0);
        assert_eq!(view.monthly.len(), 2);
        assert_eq!(view.income_by_category.len(), 1);
        assert_eq!(view.expenses_by_category[0].category, "Cleaning");
        assert_eq!(view.top_entities[0].entity_name, "Villa A");
        assert!(view.ranking_applicable);
    }

    #[test]
    fn test_entity_filter_marks_ranking_trivial() {
        let state = FilterState::new().with_entity(2);
        let view = Dashboard::default().compute(&snapshot(1), &state);

        assert!(!view.ranking_applicable);
        assert_eq!(view.top_entities.len(), 1);
        assert_eq!(view.top_entities[0].entity_name, "Villa B");
        assert_eq!(view.totals.expenses, 0.0);
        assert_eq!(view.totals.profit_margin, 100.0);
    }

    #[test]
    fn test_config_limits_ranking() {
        let config = AnalyticsConfig {
            ranking_limit: 1,
            ..Default::default()
        };
        let dashboard = Dashboard::new(config);
        assert_eq!(dashboard.config().ranking_limit, 1);

        let view = dashboard.compute(&snapshot(1), &FilterState::new());
        assert_eq!(view.top_entities.len(), 1);
    }

    #[test]
    fn test_cache_matches_uncached_compute() {
        let snap = snapshot(7);
        let state = FilterState::new().with_kind(TransactionKind::Income);
        let expected = Dashboard::default().compute(&snap, &state);

        let mut cache = DashboardCache::new(Dashboard::default());
        assert_eq!(cache.get_or_compute(&snap, &state), &expected);
        assert_eq!(cache.get_or_compute(&snap, &state), &expected);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_drops_stale_versions() {
        let mut cache = DashboardCache::new(Dashboard::default());
        let state = FilterState::new();

        cache.get_or_compute(&snapshot(1), &state);
        cache.get_or_compute(&snapshot(1), &FilterState::new().with_entity(1));
        assert_eq!(cache.len(), 2);

        let view = cache.get_or_compute(&snapshot(2), &state);
        assert_eq!(view.snapshot_version, 2);
        assert_eq!(cache.len(), 1);

        cache.invalidate();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_keeps_one_view_per_filter_within_a_version() {
        let mut cache = DashboardCache::new(Dashboard::default());
        let snap = snapshot(3);

        for month in 1..=2 {
            let state = FilterState::new()
                .with_period(&format!("2025-{:02}", month))
                .unwrap();
            cache.get_or_compute(&snap, &state);
            cache.get_or_compute(&snap, &state);
        }
        cache.get_or_compute(&snap, &FilterState::new());

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.misses(), 3);
        assert_eq!(cache.hits(), 2);

        cache.invalidate();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_monthly_csv_export() {
        let view = Dashboard::default().compute(&snapshot(1), &FilterState::new());
        let csv = view.monthly_to_csv();

        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("Month,Label,Revenue,Expenses,Profit"));
        assert_eq!(lines.next(), Some("2025-01,Jan 2025,1000.00,200.00,800.00"));
        assert_eq!(lines.next(), Some("2025-02,Feb 2025,500.00,0.00,500.00"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_json_export() {
        let view = Dashboard::default().compute(&snapshot(1), &FilterState::new());
        let json = view.to_json().unwrap();
        assert!(json.contains("\"netProfit\": 1300.0"));
        assert!(json.contains("\"month\": \"2025-01\""));

        let back: DashboardView = serde_json::from_str(&json).unwrap();
        assert_eq!(back, view);
    }
}
