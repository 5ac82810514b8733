use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    #[schemars(description = "Money received, e.g. rent, booking fees, deposits kept")]
    Income,

    #[schemars(description = "Money spent, e.g. cleaning, maintenance, payroll, utilities")]
    Expense,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "income"),
            Self::Expense => write!(f, "expense"),
        }
    }
}

/// Reference to a managed property. Sources send either numeric or string ids;
/// both are normalized to their string form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct EntityId(
    #[serde(deserialize_with = "deserialize_id")]
    #[schemars(with = "String")]
    pub String,
);

/// Opaque transaction identifier, normalized the same way as [`EntityId`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct RecordId(
    #[serde(deserialize_with = "deserialize_id")]
    #[schemars(with = "String")]
    pub String,
);

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Text(String),
    Integer(i64),
}

fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match IdRepr::deserialize(deserializer)? {
        IdRepr::Text(text) => text,
        IdRepr::Integer(n) => n.to_string(),
    })
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl From<i32> for EntityId {
    fn from(value: i32) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl From<i32> for RecordId {
    fn from(value: i32) -> Self {
        Self(value.to_string())
    }
}

/// A managed property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Entity {
    #[schemars(description = "Property identifier referenced by transactions")]
    pub id: EntityId,

    #[schemars(description = "Display name of the property, e.g. 'Villa A'")]
    pub name: String,
}

impl Entity {
    pub fn new(id: impl Into<EntityId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A validated financial record. Produced by the ingestion boundary and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: RecordId,
    pub entity_id: EntityId,
    pub kind: TransactionKind,
    /// `None` when the source category was missing or blank.
    pub category: Option<String>,
    /// Always finite; unparsable source amounts are stored as `0.0`.
    pub amount: f64,
    /// `None` when the source date was missing or unparsable.
    pub date: Option<NaiveDate>,
}

impl Transaction {
    pub fn new(
        id: impl Into<RecordId>,
        entity_id: impl Into<EntityId>,
        kind: TransactionKind,
        amount: f64,
    ) -> Self {
        Self {
            id: id.into(),
            entity_id: entity_id.into(),
            kind,
            category: None,
            amount: if amount.is_finite() { amount } else { 0.0 },
            date: None,
        }
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = normalize_category(Some(category));
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }
}

/// Blank or whitespace-only labels count as missing.
pub fn normalize_category(category: Option<&str>) -> Option<String> {
    category
        .filter(|c| !c.trim().is_empty())
        .map(|c| c.to_string())
}

/// Amount as delivered by the data-access layer: usually text, sometimes a
/// bare JSON number, occasionally `null` or absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum RawAmount {
    Text(String),
    Number(f64),
    #[default]
    Missing,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    #[schemars(description = "Opaque unique identifier of the transaction (string or integer)")]
    pub id: RecordId,

    #[serde(alias = "entity_id", alias = "propertyId", alias = "property_id")]
    #[schemars(
        description = "Identifier of the property this transaction belongs to. May reference a property that is not in the entity list."
    )]
    pub entity_id: EntityId,

    #[schemars(description = "Either 'income' or 'expense'")]
    pub kind: TransactionKind,

    #[serde(default)]
    #[schemars(
        description = "Free-form category label such as 'Rent' or 'Cleaning'. Missing or blank categories are left out of category breakdowns but still count toward totals."
    )]
    pub category: Option<String>,

    #[serde(default)]
    #[schemars(
        description = "Decimal amount, normally as text (e.g. '1250.50'). Missing, null or unparsable values count as 0."
    )]
    pub amount: RawAmount,

    #[serde(default)]
    #[schemars(
        description = "ISO calendar date (YYYY-MM-DD) or ISO date-time. Missing or unparsable dates exclude the record from date filters and the monthly series."
    )]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RawLedgerSnapshot {
    #[serde(default)]
    #[schemars(
        description = "Monotonic version of the data set. Bump it whenever transactions or entities change so cached views are not reused."
    )]
    pub version: u64,

    #[serde(default)]
    #[schemars(description = "All financial records, unfiltered")]
    pub transactions: Vec<RawTransaction>,

    #[serde(default, alias = "properties")]
    #[schemars(description = "Known properties used to resolve display names")]
    pub entities: Vec<Entity>,
}

impl RawLedgerSnapshot {
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(RawLedgerSnapshot)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}
