//! # Property Finance Analytics
//!
//! Aggregation engine behind a property-management financial report. It takes
//! a snapshot of dated, categorized income/expense transactions plus the list
//! of properties, applies a caller-owned filter, and derives the summary views
//! a reporting dashboard shows.
//!
//! ## Core Concepts
//!
//! - **Snapshot**: transactions and properties as read at one point in time, never mutated here
//! - **Filter State**: optional property, kind, category and inclusive date bounds
//! - **Derivations**: totals and margin, monthly series, category breakdown, property ranking
//! - **Total functions**: malformed amounts count as 0, bad dates and blank categories are
//!   excluded where they cannot be placed, unknown properties rank as "Unknown"
//!
//! ## Example
//!
//! ```rust,ignore
//! use property_finance_analytics::*;
//!
//! let (snapshot, report) = LedgerSnapshot::from_json(&json)?;
//! let state = FilterState::new()
//!     .with_kind(TransactionKind::Income)
//!     .with_period("2025-01:2025-03")?;
//!
//! let view = Dashboard::default().compute(&snapshot, &state);
//! println!("Margin: {:.2}%", view.totals.profit_margin);
//! ```

pub mod breakdown;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod ingestion;
pub mod options;
pub mod ranking;
pub mod schema;
pub mod timeseries;
pub mod totals;
pub mod utils;

pub use breakdown::{category_breakdown, CategoryTotal};
pub use config::AnalyticsConfig;
pub use dashboard::{Dashboard, DashboardCache, DashboardView};
pub use error::{AnalyticsError, Result};
pub use filter::{filter, FilterState};
pub use ingestion::{IngestionReport, LedgerSnapshot};
pub use options::FilterOptions;
pub use ranking::{
    top_entities, top_entities_labeled, EntityRevenue, DEFAULT_RANKING_LIMIT,
    UNKNOWN_ENTITY_LABEL,
};
pub use schema::*;
pub use timeseries::{monthly_series, MonthlyPoint, MonthlySeries};
pub use totals::{totals, Totals};
pub use utils::MonthKey;

/// Loads a JSON snapshot and computes every view under `state` with default settings.
pub fn dashboard_from_json(json: &str, state: &FilterState) -> Result<DashboardView> {
    let (snapshot, _report) = LedgerSnapshot::from_json(json)?;
    Ok(Dashboard::default().compute(&snapshot, state))
}
