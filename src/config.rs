use crate::error::{AnalyticsError, Result};
use crate::ranking::{DEFAULT_RANKING_LIMIT, UNKNOWN_ENTITY_LABEL};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsConfig {
    /// Maximum number of properties in the revenue ranking.
    #[serde(default = "default_ranking_limit")]
    pub ranking_limit: usize,

    /// Display name for properties referenced by transactions but missing
    /// from the property list.
    #[serde(default = "default_unknown_entity_label")]
    pub unknown_entity_label: String,
}

fn default_ranking_limit() -> usize {
    DEFAULT_RANKING_LIMIT
}

fn default_unknown_entity_label() -> String {
    UNKNOWN_ENTITY_LABEL.to_string()
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            ranking_limit: default_ranking_limit(),
            unknown_entity_label: default_unknown_entity_label(),
        }
    }
}

impl AnalyticsConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.unknown_entity_label.trim().is_empty() {
            return Err(AnalyticsError::InvalidConfig(
                "unknownEntityLabel must not be blank".to_string(),
            ));
        }
        Ok(())
    }
}
