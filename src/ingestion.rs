use crate::error::Result;
use crate::schema::{
    normalize_category, Entity, EntityId, RawAmount, RawLedgerSnapshot, RawTransaction,
    Transaction,
};
use crate::utils::parse_iso_date;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::collections::HashSet;
use std::io::{BufReader, Read};
use std::path::Path;

/// Counts of fields that were recovered with a default while loading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionReport {
    pub total_records: usize,
    /// Amount did not parse; stored as 0.
    pub malformed_amounts: usize,
    /// Date missing or unparsable; excluded from date filters and monthly series.
    pub undated: usize,
    /// Category missing or blank; excluded from category breakdowns.
    pub uncategorized: usize,
    /// Entity id not present in the snapshot's entity list; ranked under the
    /// unknown-entity label.
    pub unknown_entities: usize,
}

impl IngestionReport {
    pub fn has_degraded_records(&self) -> bool {
        self.malformed_amounts > 0
            || self.undated > 0
            || self.uncategorized > 0
            || self.unknown_entities > 0
    }
}

/// The transaction and entity collections as read at one point in time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: u64,
    pub transactions: Vec<Transaction>,
    pub entities: Vec<Entity>,
}

impl LedgerSnapshot {
    pub fn new(version: u64, transactions: Vec<Transaction>, entities: Vec<Entity>) -> Self {
        Self {
            version,
            transactions,
            entities,
        }
    }

    pub fn from_raw(raw: RawLedgerSnapshot) -> (Self, IngestionReport) {
        let mut report = IngestionReport {
            total_records: raw.transactions.len(),
            ..Default::default()
        };

        let known: HashSet<&EntityId> = raw.entities.iter().map(|e| &e.id).collect();

        let transactions: Vec<Transaction> = raw
            .transactions
            .into_iter()
            .map(|record| {
                if !known.contains(&record.entity_id) {
                    debug!(
                        "Transaction {} references unknown entity {}",
                        record.id, record.entity_id
                    );
                    report.unknown_entities += 1;
                }
                convert_raw_transaction(record, &mut report)
            })
            .collect();

        info!(
            "Loaded snapshot v{} with {} transactions and {} entities",
            raw.version,
            transactions.len(),
            raw.entities.len()
        );

        if report.has_degraded_records() {
            warn!(
                "Snapshot v{} contains degraded records: {} malformed amounts, {} undated, {} uncategorized, {} unknown entities",
                raw.version,
                report.malformed_amounts,
                report.undated,
                report.uncategorized,
                report.unknown_entities
            );
        }

        (
            Self {
                version: raw.version,
                transactions,
                entities: raw.entities,
            },
            report,
        )
    }

    pub fn from_json(json: &str) -> Result<(Self, IngestionReport)> {
        let raw: RawLedgerSnapshot = serde_json::from_str(json)?;
        Ok(Self::from_raw(raw))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<(Self, IngestionReport)> {
        let raw: RawLedgerSnapshot = serde_json::from_reader(reader)?;
        Ok(Self::from_raw(raw))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<(Self, IngestionReport)> {
        let file = File::open(path.as_ref())?;
        debug!("Reading snapshot from {}", path.as_ref().display());
        Self::from_reader(BufReader::new(file))
    }

    pub fn entity_name(&self, id: &EntityId) -> Option<&str> {
        self.entities
            .iter()
            .find(|e| &e.id == id)
            .map(|e| e.name.as_str())
    }
}

pub fn convert_raw_transaction(raw: RawTransaction, report: &mut IngestionReport) -> Transaction {
    let amount = match parse_amount(&raw.amount) {
        Some(value) => value,
        None => {
            debug!(
                "Transaction {} has unparsable amount {:?}; counting it as 0",
                raw.id, raw.amount
            );
            report.malformed_amounts += 1;
            0.0
        }
    };

    let date = raw.date.as_deref().and_then(parse_iso_date);
    if date.is_none() {
        debug!(
            "Transaction {} has missing or unparsable date {:?}",
            raw.id, raw.date
        );
        report.undated += 1;
    }

    let category = normalize_category(raw.category.as_deref());
    if category.is_none() {
        debug!(
            "Transaction {} has missing or blank category {:?}",
            raw.id, raw.category
        );
        report.uncategorized += 1;
    }

    Transaction {
        id: raw.id,
        entity_id: raw.entity_id,
        kind: raw.kind,
        category,
        amount,
        date,
    }
}

/// Parses a decimal amount. Returns `None` for anything that is not a finite
/// number, including `"NaN"` and `"inf"`.
pub fn parse_amount(raw: &RawAmount) -> Option<f64> {
    let value = match raw {
        RawAmount::Number(n) => *n,
        RawAmount::Text(text) => text.trim().parse::<f64>().ok()?,
        RawAmount::Missing => return None,
    };

    value.is_finite().then_some(value)
}
