use crate::schema::{Entity, EntityId, Transaction, TransactionKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

pub const DEFAULT_RANKING_LIMIT: usize = 5;
pub const UNKNOWN_ENTITY_LABEL: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRevenue {
    pub entity_id: EntityId,
    pub entity_name: String,
    pub revenue: f64,
}

/// Ranks properties by income, highest first, keeping at most `limit`.
/// Properties missing from `entities` are still ranked under "Unknown".
pub fn top_entities(
    filtered: &[Transaction],
    entities: &[Entity],
    limit: usize,
) -> Vec<EntityRevenue> {
    top_entities_labeled(filtered, entities, limit, UNKNOWN_ENTITY_LABEL)
}

pub fn top_entities_labeled(
    filtered: &[Transaction],
    entities: &[Entity],
    limit: usize,
    unknown_label: &str,
) -> Vec<EntityRevenue> {
    let mut revenue_by_entity: BTreeMap<&EntityId, f64> = BTreeMap::new();
    for tx in filtered
        .iter()
        .filter(|tx| tx.kind == TransactionKind::Income)
    {
        *revenue_by_entity.entry(&tx.entity_id).or_insert(0.0) += tx.amount;
    }

    // First name wins if the entity list carries duplicate ids
    let mut names: HashMap<&EntityId, &str> = HashMap::with_capacity(entities.len());
    for entity in entities {
        names.entry(&entity.id).or_insert(entity.name.as_str());
    }

    let mut ranking: Vec<EntityRevenue> = revenue_by_entity
        .into_iter()
        .map(|(entity_id, revenue)| EntityRevenue {
            entity_id: entity_id.clone(),
            entity_name: names
                .get(entity_id)
                .copied()
                .unwrap_or(unknown_label)
                .to_string(),
            revenue,
        })
        .collect();

    ranking.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
    ranking.truncate(limit);
    ranking
}
