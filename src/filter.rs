use crate::error::Result;
use crate::schema::{normalize_category, EntityId, Transaction, TransactionKind};
use crate::utils::parse_period_string;
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

/// The currently selected predicate. Every field is optional and an unset
/// field matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Restrict to a single property")]
    pub entity_id: Option<EntityId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Restrict to income or expense records")]
    pub kind: Option<TransactionKind>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_category"
    )]
    #[schemars(
        with = "Option<String>",
        description = "Restrict to one exact category label. Blank means no restriction."
    )]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Inclusive lower date bound (YYYY-MM-DD)")]
    pub date_from: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Inclusive upper date bound (YYYY-MM-DD)")]
    pub date_to: Option<NaiveDate>,
}

fn deserialize_category<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(normalize_category(raw.as_deref()))
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entity(mut self, entity_id: impl Into<EntityId>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    pub fn with_kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = normalize_category(Some(category));
        self
    }

    pub fn with_date_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    /// Sets both date bounds from a "YYYY-MM" or "YYYY-MM:YYYY-MM" period,
    /// covering whole months.
    pub fn with_period(self, period: &str) -> Result<Self> {
        let (from, to) = parse_period_string(period)?;
        Ok(self.with_date_range(Some(from), Some(to)))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn is_unfiltered(&self) -> bool {
        self == &Self::default()
    }

    pub fn has_date_bound(&self) -> bool {
        self.date_from.is_some() || self.date_to.is_some()
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        if let Some(entity_id) = &self.entity_id {
            if &tx.entity_id != entity_id {
                return false;
            }
        }

        if let Some(kind) = self.kind {
            if tx.kind != kind {
                return false;
            }
        }

        if let Some(category) = &self.category {
            if tx.category.as_ref() != Some(category) {
                return false;
            }
        }

        if self.has_date_bound() {
            let Some(date) = tx.date else {
                return false;
            };

            if self.date_from.is_some_and(|from| date < from) {
                return false;
            }

            if self.date_to.is_some_and(|to| date > to) {
                return false;
            }
        }

        true
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(FilterState)
    }
}

/// Returns the transactions passing `state`, in input order.
pub fn filter(transactions: &[Transaction], state: &FilterState) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|tx| state.matches(tx))
        .cloned()
        .collect()
}
